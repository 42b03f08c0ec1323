use super::*;

#[test]
fn name_identifies_variant_for_logging() {
    let effect = Effect::WriteObject {
        object: "enabled-K".into(),
        value: ObjectValue::Bool(true),
    };
    assert_eq!(effect.name(), "write_object");
}
