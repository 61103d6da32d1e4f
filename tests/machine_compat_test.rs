// ==========================================
// 机型兼容性校验集成测试
// ==========================================
// 测试目标: 自由文本机型归一化、兼容性判定、派工校验、批量筛选
// ==========================================

mod test_helpers;

use garment_wip::domain::types::{Confidence, MachineType, Severity};
use garment_wip::domain::AssignmentChecks;
use garment_wip::engine::{display_label, normalize_machine_type, MachineCompatibility};
use test_helpers::{create_test_operator, create_test_work_item};

#[test]
fn test_alias_match_is_compatible() {
    let result = MachineCompatibility::is_compatible(
        &create_test_operator("OP1", Some("Single Needle")),
        &create_test_work_item("W1", Some("single-needle")),
    );
    assert!(result.compatible);
    assert_eq!(result.severity, None);
}

#[test]
fn test_different_machines_incompatible_high() {
    let result = MachineCompatibility::is_compatible(
        &create_test_operator("OP1", Some("overlock")),
        &create_test_work_item("W1", Some("flatlock")),
    );
    assert!(!result.compatible);
    assert_eq!(result.severity, Some(Severity::High));
}

#[test]
fn test_alias_symmetry() {
    let spellings = [
        "Single Needle",
        "single-needle",
        "SNLS",
        "Lockstitch",
        "Overlock",
        "4 Thread",
        "Flat Lock",
        "Coverstitch",
        "Kansai Special",
        "Button Hole",
        "Double Needle",
        "Pressing",
        "QC",
        "Bar Tack",
    ];

    for a in spellings {
        for b in spellings {
            let ab = MachineCompatibility::is_compatible(
                &create_test_operator("OP", Some(a)),
                &create_test_work_item("W", Some(b)),
            );
            let ba = MachineCompatibility::is_compatible(
                &create_test_operator("OP", Some(b)),
                &create_test_work_item("W", Some(a)),
            );
            assert_eq!(ab.compatible, ba.compatible, "{} vs {}", a, b);
            assert_eq!(
                ab.compatible,
                normalize_machine_type(a) == normalize_machine_type(b),
                "{} vs {}",
                a,
                b
            );
        }
    }
}

#[test]
fn test_unrecognized_machine_matches_itself_only() {
    let bar_tack = normalize_machine_type("Bar-Tack").unwrap();
    assert!(!bar_tack.is_recognized());
    assert_eq!(display_label(&bar_tack), "bartack");

    let same = MachineCompatibility::is_compatible(
        &create_test_operator("OP1", Some("bar tack")),
        &create_test_work_item("W1", Some("BAR_TACK")),
    );
    assert!(same.compatible);
    assert_eq!(same.confidence, Some(Confidence::Medium));

    let other = MachineCompatibility::is_compatible(
        &create_test_operator("OP1", Some("bar tack")),
        &create_test_work_item("W1", Some("overlock")),
    );
    assert!(!other.compatible);
}

#[test]
fn test_multi_skill_operator() {
    let operator = create_test_operator("OP1", Some("Multi Skill"));
    for machine in MachineType::CANONICAL.iter() {
        let result = MachineCompatibility::is_compatible(
            &operator,
            &create_test_work_item("W1", Some(machine.as_str())),
        );
        assert!(result.compatible, "{}", machine);
        assert_eq!(result.confidence, Some(Confidence::High));
    }
}

#[test]
fn test_validate_assignment_full_operator() {
    let mut operator = create_test_operator("OP1", Some("flatlock"));
    operator.current_load = 4;
    let item = create_test_work_item("W1", Some("Flat Lock"));

    let validation =
        MachineCompatibility::validate_assignment(&operator, &item, &AssignmentChecks::default());
    assert!(validation.valid);
    assert!(validation.errors.is_empty());
    assert_eq!(validation.warnings.len(), 1);
    assert!(validation.compatibility.compatible);
}

#[test]
fn test_validate_assignment_unavailable_and_incompatible() {
    let mut operator = create_test_operator("OP1", Some("kansai"));
    operator.status = "busy".to_string();
    let item = create_test_work_item("W1", Some("buttonhole"));

    let validation =
        MachineCompatibility::validate_assignment(&operator, &item, &AssignmentChecks::default());
    assert!(!validation.valid);
    assert_eq!(validation.errors.len(), 2);
    assert_eq!(validation.compatibility.severity, Some(Severity::High));
}

#[test]
fn test_filter_helpers() {
    let operators = vec![
        create_test_operator("OP1", Some("SN")),
        create_test_operator("OP2", None),
        create_test_operator("OP3", Some("lockstitch")),
        create_test_operator("OP4", Some("overlock")),
    ];
    let item = create_test_work_item("W1", Some("Single Needle"));

    let ids: Vec<&str> = MachineCompatibility::filter_compatible_operators(&operators, &item)
        .into_iter()
        .map(|op| op.id.as_str())
        .collect();
    assert_eq!(ids, vec!["OP1", "OP3"]);

    let items = vec![
        create_test_work_item("W1", Some("overlock")),
        create_test_work_item("W2", None),
        create_test_work_item("W3", Some("serger")),
    ];
    let ids: Vec<&str> = MachineCompatibility::filter_compatible_work_items(&operators[3], &items)
        .into_iter()
        .map(|item| item.id.as_str())
        .collect();
    assert_eq!(ids, vec!["W1", "W3"]);
}
