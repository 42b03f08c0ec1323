use super::*;
use std::collections::HashSet;

fn lookup(triggered: &HashSet<&str>) -> impl Fn(&SensorName) -> bool + '_ {
    move |name: &SensorName| triggered.contains(name.as_str())
}

#[test]
fn and_short_circuits_on_first_false() {
    let crit = ActivationCriterion::And {
        children: vec![
            ActivationCriterion::Sensor { sensor: "D".into(), triggered: true },
            ActivationCriterion::Sensor { sensor: "W".into(), triggered: true },
        ],
    };
    let triggered = HashSet::from(["D"]);
    assert!(!crit.evaluate(&lookup(&triggered)));
}

#[test]
fn or_is_true_if_any_child_true() {
    let crit = ActivationCriterion::Or {
        children: vec![
            ActivationCriterion::Sensor { sensor: "D".into(), triggered: true },
            ActivationCriterion::Sensor { sensor: "W".into(), triggered: true },
        ],
    };
    let triggered = HashSet::from(["W"]);
    assert!(crit.evaluate(&lookup(&triggered)));
}

#[test]
fn leaf_can_require_absence_of_trigger() {
    let crit = ActivationCriterion::Sensor { sensor: "D".into(), triggered: false };
    let triggered = HashSet::new();
    assert!(crit.evaluate(&lookup(&triggered)));
}
