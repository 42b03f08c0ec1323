use super::*;

const VALID: &str = r#"
[services]
host = "127.0.0.1"
port = 4444

[modes]
mode_object = "mode"

[[modes.modes]]
name = "Home"
code = 0
sensor_names = ["window"]

[[modes.modes]]
name = "Away"
code = 1
sensor_names = ["window", "door"]

[[alerts.alerts]]
name = "Intrusion"
persistence_object = "persist-intrusion"

[[alerts.alerts.event_bindings]]
event = "alert_activated"

[[alerts.alerts.event_bindings.actions]]
type = "send-email"
to = ["a@example.com"]
subject = "Intrusion"
body = "{alert.name} active"

[[sensors]]
name = "window"
alert = "Intrusion"
enabled_object = "enabled-window"
watched_object = "watched-window"
activation_delay = { default = 0.0 }
prealert_duration = { default = 5.0 }
alert_duration = { default = 30.0 }

[sensors.kind]
kind = "boolean"
trigger_value = true

[[sensors]]
name = "door"
alert = "Intrusion"
enabled_object = "enabled-door"
watched_object = "watched-door"
activation_delay = { default = 0.0 }
prealert_duration = { default = 2.0 }
alert_duration = { default = 20.0 }

[sensors.kind]
kind = "boolean"
trigger_value = true
"#;

#[test]
fn parses_a_complete_document() {
    let config = parse(VALID, "valid.toml").unwrap();
    assert_eq!(config.services.port, 4444);
    assert_eq!(config.modes.modes.len(), 2);
    assert_eq!(config.sensors.len(), 2);
    assert_eq!(config.alerts.alerts[0].event_bindings.len(), 1);
}

#[test]
fn rejects_sensor_with_unknown_alert() {
    let text = VALID.replace(r#"alert = "Intrusion""#, r#"alert = "Ghost""#);
    let err = parse(&text, "bad.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_mode_referencing_unknown_sensor() {
    let text = VALID.replace(r#"sensor_names = ["window", "door"]"#, r#"sensor_names = ["window", "garage"]"#);
    let err = parse(&text, "bad.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_duplicate_mode_codes() {
    let text = VALID.replacen("code = 1", "code = 0", 1);
    let err = parse(&text, "bad.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_malformed_toml() {
    let err = parse("not valid toml :::", "bad.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID).unwrap();
    let config = load(&path).unwrap();
    assert_eq!(config.sensors.len(), 2);
}

#[test]
fn load_reports_io_error_for_missing_file() {
    let err = load("/nonexistent/path/config.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
