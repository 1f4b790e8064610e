//! Controller operations.

mod support;

use knitled_core::{
    ControllerOptions, InputAction, KnitController, KnitError, KnitSettings, Pattern, PatternId,
    RowDelta, SettingsPatch, StorageError,
};
use support::{MemoryPatterns, MemorySettings, pattern};

type Controller = KnitController<MemorySettings, MemoryPatterns>;

fn controller_with(settings: KnitSettings, rows: Pattern) -> (Controller, MemorySettings, MemoryPatterns) {
    let store = MemorySettings::with(settings.clone());
    let patterns = MemoryPatterns::with(settings.pattern_id.as_str(), rows);
    let controller = KnitController::restore(store.clone(), patterns.clone(), ControllerOptions::default());
    (controller, store, patterns)
}

fn controller(height: u8) -> (Controller, MemorySettings, MemoryPatterns) {
    let rows = vec![0b1010u16; usize::from(height)];
    controller_with(KnitSettings::default(), pattern(4, height, &rows))
}

fn id(name: &str) -> PatternId {
    PatternId::normalize(name).unwrap()
}

// -----------------------------------------------------------------------------
// Restore
// -----------------------------------------------------------------------------

#[test]
fn first_boot_uses_defaults_and_stores_default_pattern() {
    let store = MemorySettings::default();
    let patterns = MemoryPatterns::default();

    let knit = KnitController::restore(store, patterns.clone(), ControllerOptions::default());

    assert_eq!(knit.settings(), &KnitSettings::default());
    assert_eq!(knit.pattern(), &Pattern::default_pattern());
    assert!(patterns.contains("default"));
    assert!(!knit.warn_blink_active());
}

#[test]
fn restore_clamps_active_row_into_pattern() {
    let settings = KnitSettings {
        active_row: 20,
        ..KnitSettings::default()
    };
    let (knit, _, _) = controller_with(settings, pattern(4, 3, &[0, 0, 0]));

    assert_eq!(knit.active_row(), 2);
}

#[test]
fn restore_falls_back_to_default_when_pattern_missing() {
    let settings = KnitSettings {
        pattern_id: id("gone"),
        ..KnitSettings::default()
    };
    let store = MemorySettings::with(settings);

    let knit = KnitController::restore(store, MemoryPatterns::default(), ControllerOptions::default());

    assert!(knit.settings().pattern_id.is_default());
    assert_eq!(knit.pattern().height(), 24);
}

#[test]
fn pulse_count_restored_only_when_enabled() {
    let settings = KnitSettings {
        total_pulses: 41,
        ..KnitSettings::default()
    };
    let store = MemorySettings::with(settings);

    let forgetful = KnitController::restore(store.clone(), MemoryPatterns::default(), ControllerOptions::default());
    assert_eq!(forgetful.settings().total_pulses, 0);

    store.stored.borrow_mut().as_mut().unwrap().total_pulses = 41;
    let options = ControllerOptions {
        persist_pulse_count: true,
    };
    let keeping = KnitController::restore(store, MemoryPatterns::default(), options);
    assert_eq!(keeping.settings().total_pulses, 41);
}

// -----------------------------------------------------------------------------
// Row step and confirm
// -----------------------------------------------------------------------------

#[test]
fn row_step_wraps_and_persists() {
    let settings = KnitSettings {
        active_row: 23,
        ..KnitSettings::default()
    };
    let (mut knit, store, _) = controller_with(settings, Pattern::default_pattern());

    assert_eq!(knit.row_step(RowDelta::Forward), 0);
    assert_eq!(store.last().unwrap().active_row, 0);
}

#[test]
fn row_step_from_bottom_wraps_backwards() {
    let settings = KnitSettings {
        row_from_bottom: true,
        ..KnitSettings::default()
    };
    let (mut knit, _, _) = controller_with(settings, Pattern::default_pattern());

    knit.row_step(RowDelta::Forward);

    assert_eq!(knit.active_row(), 23);
    assert_eq!(knit.view().display_row(), 1);
}

#[test]
fn confirm_without_auto_advance_keeps_row() {
    let (mut knit, store, _) = controller(3);
    knit.update_config(&SettingsPatch {
        auto_advance: Some(false),
        ..SettingsPatch::default()
    });
    let saves = store.saves.get();

    assert_eq!(knit.confirm(), 0);
    assert!(knit.confirmations().is_confirmed(0));
    assert_eq!(store.saves.get(), saves + 1);
}

#[test]
fn confirm_with_auto_advance_moves_like_a_row_step() {
    for from_bottom in [false, true] {
        let (mut stepped, _, _) = controller(5);
        let (mut confirmed, _, _) = controller(5);
        let patch = SettingsPatch {
            row_from_bottom: Some(from_bottom),
            ..SettingsPatch::default()
        };
        stepped.update_config(&patch);
        confirmed.update_config(&patch);

        assert_eq!(confirmed.confirm(), stepped.row_step(RowDelta::Forward));
    }
}

#[test]
fn confirming_row_zero_of_small_pattern_advances() {
    let (mut knit, _, _) = controller(3);

    knit.confirm();

    assert_eq!(knit.confirmations().rows(3), &[true, false, false]);
    assert_eq!(knit.active_row(), 1);
}

// -----------------------------------------------------------------------------
// Carriage pulse and warning
// -----------------------------------------------------------------------------

#[test]
fn carriage_pulse_on_unconfirmed_row_raises_warning() {
    let (mut knit, _, _) = controller(4);

    knit.carriage_pulse();

    assert_eq!(knit.settings().total_pulses, 1);
    assert!(knit.warn_blink_active());
    assert_eq!(knit.active_row(), 1);
}

#[test]
fn carriage_pulse_on_confirmed_row_stays_quiet() {
    let (mut knit, _, _) = controller(4);
    knit.update_config(&SettingsPatch {
        auto_advance: Some(false),
        ..SettingsPatch::default()
    });
    knit.confirm();

    knit.carriage_pulse();

    assert!(!knit.warn_blink_active());
    assert_eq!(knit.active_row(), 1);
}

#[test]
fn carriage_pulse_without_blink_warning_never_warns() {
    let (mut knit, _, _) = controller(4);
    knit.update_config(&SettingsPatch {
        blink_warning: Some(false),
        ..SettingsPatch::default()
    });

    knit.carriage_pulse();

    assert!(!knit.warn_blink_active());
    assert_eq!(knit.settings().total_pulses, 1);
}

#[test]
fn carriage_pulse_advances_even_without_auto_advance() {
    let (mut knit, _, _) = controller(4);
    knit.update_config(&SettingsPatch {
        auto_advance: Some(false),
        ..SettingsPatch::default()
    });

    knit.carriage_pulse();

    assert_eq!(knit.active_row(), 1);
}

#[test]
fn row_step_clears_warning() {
    let (mut knit, _, _) = controller(4);
    knit.carriage_pulse();

    knit.row_step(RowDelta::Back);

    assert!(!knit.warn_blink_active());
}

#[test]
fn confirm_clears_warning() {
    let (mut knit, _, _) = controller(4);
    knit.carriage_pulse();

    knit.confirm();

    assert!(!knit.warn_blink_active());
}

#[test]
fn pulse_counter_wraps_on_overflow() {
    let settings = KnitSettings {
        total_pulses: u32::MAX,
        ..KnitSettings::default()
    };
    let store = MemorySettings::with(settings);
    let options = ControllerOptions {
        persist_pulse_count: true,
    };
    let mut knit = KnitController::restore(store, MemoryPatterns::default(), options);

    knit.carriage_pulse();

    assert_eq!(knit.settings().total_pulses, 0);
}

// -----------------------------------------------------------------------------
// Patterns
// -----------------------------------------------------------------------------

#[test]
fn load_pattern_resets_confirmations_and_clamps_row() {
    let settings = KnitSettings {
        active_row: 10,
        auto_advance: false,
        ..KnitSettings::default()
    };
    let (mut knit, store, _) = controller_with(settings, Pattern::default_pattern());
    knit.confirm();

    knit.load_pattern(id("small"), pattern(4, 3, &[1, 2, 4]));

    assert!(knit.confirmations().rows(24).iter().all(|confirmed| !confirmed));
    assert_eq!(knit.active_row(), 2);
    assert_eq!(store.last().unwrap().pattern_id, id("small"));
}

#[test]
fn select_missing_pattern_creates_it_from_current() {
    let (mut knit, _, patterns) = controller(3);

    knit.select_pattern(id("fresh")).unwrap();

    assert!(patterns.contains("fresh"));
    assert_eq!(knit.settings().pattern_id, id("fresh"));
    assert_eq!(knit.pattern().height(), 3);
}

#[test]
fn save_pattern_stores_and_activates() {
    let (mut knit, _, patterns) = controller(3);
    let heart = pattern(4, 2, &[0b0110, 0b1001]);

    knit.save_pattern(id("heart"), heart.clone()).unwrap();

    assert!(patterns.contains("heart"));
    assert_eq!(knit.pattern(), &heart);
}

#[test]
fn store_pattern_leaves_active_pattern_alone() {
    let (mut knit, _, patterns) = controller(3);
    let before = knit.pattern().clone();

    knit.store_pattern(&id("upload"), &pattern(2, 2, &[1, 2])).unwrap();

    assert!(patterns.contains("upload"));
    assert_eq!(knit.pattern(), &before);
}

#[test]
fn default_pattern_cannot_be_deleted() {
    let (mut knit, _, patterns) = controller(3);

    let result = knit.delete_pattern(&PatternId::default_id());

    assert_eq!(result, Err(KnitError::ProtectedPattern));
    assert!(patterns.contains("default"));
}

#[test]
fn deleting_unknown_pattern_reports_not_found() {
    let (mut knit, _, _) = controller(3);

    let result = knit.delete_pattern(&id("nope"));

    assert_eq!(result, Err(KnitError::Storage(StorageError::NotFound)));
}

#[test]
fn list_patterns_reports_stored_ids() {
    let (mut knit, _, patterns) = controller(3);
    patterns.insert("extra", pattern(1, 1, &[1]));

    let list = knit.list_patterns().unwrap();

    assert_eq!(list.len(), 2);
    assert!(list.iter().any(|stored| stored.as_str() == "/patterns/extra.json"));
}

// -----------------------------------------------------------------------------
// Configuration and network entry points
// -----------------------------------------------------------------------------

#[test]
fn update_config_applies_only_present_fields_and_clamps_brightness() {
    let (mut knit, _, _) = controller(3);

    let config = knit.update_config(&SettingsPatch {
        brightness: Some(900),
        color_active: Some(0xFF12_3456),
        ..SettingsPatch::default()
    });

    assert_eq!(config.brightness, 255);
    assert_eq!(config.color_active.packed(), 0x12_3456);
    assert!(config.auto_advance);
    assert_eq!(config.color_confirmed.packed(), 0x0000FF);

    let config = knit.update_config(&SettingsPatch {
        brightness: Some(-3),
        ..SettingsPatch::default()
    });
    assert_eq!(config.brightness, 0);
}

#[test]
fn network_step_rejects_out_of_range_delta() {
    let (mut knit, store, _) = controller(3);
    let saves = store.saves.get();

    assert_eq!(knit.step_from_network(2), Err(KnitError::InvalidDelta));
    assert_eq!(knit.active_row(), 0);
    assert_eq!(store.saves.get(), saves);
}

#[test]
fn network_step_matches_button_step() {
    let (mut from_network, _, _) = controller(3);
    let (mut from_button, _, _) = controller(3);

    from_button.handle_input(InputAction::PreviousRow);

    assert_eq!(from_network.step_from_network(-1), Ok(from_button.active_row()));
}

#[test]
fn input_actions_map_to_operations() {
    let (mut knit, _, _) = controller(4);

    knit.handle_input(InputAction::NextRow);
    assert_eq!(knit.active_row(), 1);
    knit.handle_input(InputAction::CarriagePulse);
    assert_eq!(knit.settings().total_pulses, 1);
    assert!(knit.warn_blink_active());
    knit.handle_input(InputAction::Confirm);
    assert!(knit.confirmations().is_confirmed(2));
    assert!(!knit.warn_blink_active());
}

#[test]
fn storage_failure_keeps_in_memory_state() {
    let (mut knit, store, _) = controller(4);
    store.fail_writes.set(true);

    knit.row_step(RowDelta::Forward);

    assert_eq!(knit.active_row(), 1);
    assert_eq!(store.last().unwrap().active_row, 0);
}

#[test]
fn snapshot_mirrors_state() {
    let (mut knit, _, _) = controller(4);
    knit.carriage_pulse();

    let snapshot = knit.snapshot();

    assert_eq!(snapshot.active_row, 1);
    assert_eq!(snapshot.display_row, 2);
    assert_eq!(snapshot.total_pulses, 1);
    assert_eq!((snapshot.w, snapshot.h), (4, 4));
    assert!(snapshot.warn);
    assert!(snapshot.file.is_default());
}
