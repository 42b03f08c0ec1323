use super::*;
use sv_bus::FakeBusClient;
use sv_core::{
    AlertConfig, AlertsConfig, ModeConfig, ModesConfig, ObjectValue, ResolvedConfig, SensorConfig, SensorKind,
    ServicesConfig,
};
use std::time::Duration;

async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

fn config() -> ResolvedConfig {
    ResolvedConfig {
        services: ServicesConfig { host: "127.0.0.1".into(), port: 4444 },
        modes: ModesConfig {
            mode_object: "mode".into(),
            modes: vec![ModeConfig {
                name: "Away".into(),
                code: 1,
                sensor_names: vec!["hall".into()],
                event_bindings: Vec::new(),
            }],
            repository_bindings: Vec::new(),
        },
        alerts: AlertsConfig {
            alerts: vec![AlertConfig {
                name: "Intrusion".into(),
                persistence_object: Some("persist-intrusion".into()),
                inhibition_object: None,
                event_bindings: Vec::new(),
            }],
            repository_bindings: Vec::new(),
        },
        sensors: vec![SensorConfig {
            name: "hall".into(),
            alert: "Intrusion".into(),
            kind: SensorKind::Boolean { trigger_value: true },
            enabled_object: "enabled-hall".into(),
            watched_object: "watched-hall".into(),
            persistence_object: None,
            activation_delay: sv_core::ModeDependentValue::new(0.0),
            prealert_duration: sv_core::ModeDependentValue::new(1.0),
            alert_duration: sv_core::ModeDependentValue::new(2.0),
            activation_criterion: None,
            description: None,
        }],
    }
}

#[tokio::test(start_paused = true)]
async fn mode_switch_enables_its_required_sensor() {
    let bus = Arc::new(FakeBusClient::new());
    let engine = Engine::new(config(), bus.clone()).unwrap();

    engine.on_object_changed("mode".into(), ObjectValue::Int(1)).await;
    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;

    assert!(engine.is_sensor_enabled(&"hall".into()));
    assert_eq!(engine.current_mode(), Some("Away".into()));
}

#[tokio::test(start_paused = true)]
async fn full_trigger_to_active_flow() {
    let bus = Arc::new(FakeBusClient::new());
    let engine = Engine::new(config(), bus.clone()).unwrap();

    engine.on_object_changed("mode".into(), ObjectValue::Int(1)).await;
    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;
    assert!(engine.is_sensor_enabled(&"hall".into()));

    engine.on_object_changed("watched-hall".into(), ObjectValue::Bool(true)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Initializing));

    tokio::time::advance(Duration::from_millis(1200)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Active));

    // Releasing the trigger does not end the alert by itself (spec §4.2):
    // only the alert timer expiring does. It was started at prealert expiry
    // for alert_duration=2s.
    engine.on_object_changed("watched-hall".into(), ObjectValue::Bool(false)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Active));

    tokio::time::advance(Duration::from_millis(2200)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Paused));
}

#[tokio::test(start_paused = true)]
async fn alert_timer_expiry_without_persistence_stops() {
    let bus = Arc::new(FakeBusClient::new());
    let mut cfg = config();
    cfg.alerts.alerts[0].persistence_object = None;
    let engine = Engine::new(cfg, bus.clone()).unwrap();

    engine.on_object_changed("mode".into(), ObjectValue::Int(1)).await;
    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;

    engine.on_object_changed("watched-hall".into(), ObjectValue::Bool(true)).await;
    tokio::time::advance(Duration::from_millis(1200)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Active));

    // Alert timer (2s) expires with the sensor still triggered but no
    // external removal: the alert's own countdown drives it to STOPPED.
    tokio::time::advance(Duration::from_millis(2200)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Stopped));
}

#[tokio::test(start_paused = true)]
async fn external_persistence_clear_stops_a_paused_alert() {
    let bus = Arc::new(FakeBusClient::new());
    let engine = Engine::new(config(), bus.clone()).unwrap();

    engine.on_object_changed("mode".into(), ObjectValue::Int(1)).await;
    tokio::time::advance(Duration::from_millis(300)).await;
    settle().await;

    engine.on_object_changed("watched-hall".into(), ObjectValue::Bool(true)).await;
    tokio::time::advance(Duration::from_millis(1200)).await;
    settle().await;
    // Let the 2s alert timer expire on its own; persistence was set true on
    // entry to ACTIVE, so this lands in PAUSED rather than STOPPED.
    tokio::time::advance(Duration::from_millis(2200)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Paused));

    // Simulates LKD reporting that something external cleared the
    // persistence object while the alert sat PAUSED.
    engine.on_object_changed("persist-intrusion".into(), ObjectValue::Bool(false)).await;
    settle().await;
    assert_eq!(engine.alert_status(&"Intrusion".into()), Some(sv_core::AlertStatus::Stopped));
}
