// Host-side tests for the global sound shortcuts.

#![allow(dead_code)]
mod keymap {
    include!("../src/events/keymap.rs");
}

use garden_core::{MemoryStorage, PreferenceStore, DEFAULT_VOLUME, VOLUME_STEP};
use keymap::*;

#[test]
fn maps_sound_shortcuts() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleSound));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleSound));
    assert_eq!(action_for_key("+"), Some(KeyAction::VolumeUp));
    assert_eq!(action_for_key("="), Some(KeyAction::VolumeUp));
    assert_eq!(action_for_key("-"), Some(KeyAction::VolumeDown));
    assert_eq!(action_for_key("_"), Some(KeyAction::VolumeDown));
    assert_eq!(action_for_key("h"), None);
}

#[test]
fn toggle_flips_and_persists() {
    let mut prefs = PreferenceStore::load(MemoryStorage::new());
    assert!(prefs.sound_enabled());
    assert!(apply_action(&mut prefs, KeyAction::ToggleSound));
    assert!(!prefs.sound_enabled());
    assert!(apply_action(&mut prefs, KeyAction::ToggleSound));
    assert!(prefs.sound_enabled());
}

#[test]
fn volume_steps_by_fixed_increment() {
    let mut prefs = PreferenceStore::load(MemoryStorage::new());
    assert!(apply_action(&mut prefs, KeyAction::VolumeUp));
    assert!((prefs.sound_volume() - (DEFAULT_VOLUME + VOLUME_STEP)).abs() < 1e-5);
    assert!(apply_action(&mut prefs, KeyAction::VolumeDown));
    assert!(apply_action(&mut prefs, KeyAction::VolumeDown));
    assert!((prefs.sound_volume() - (DEFAULT_VOLUME - VOLUME_STEP)).abs() < 1e-5);
}

#[test]
fn volume_up_at_max_reports_no_change() {
    let mut prefs = PreferenceStore::load(MemoryStorage::new());
    prefs.set_sound_volume(1.0);
    assert!(!apply_action(&mut prefs, KeyAction::VolumeUp));
    assert!((prefs.sound_volume() - 1.0).abs() < 1e-6);
}

#[test]
fn scroll_and_tab_keys_never_touch_volume() {
    let cx = KeyContext::default();
    for key in ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight", "PageUp", "PageDown", " "] {
        assert_eq!(action_for_event(key, &cx), None, "{key}");
    }
}

#[test]
fn consumed_or_foreign_keydowns_are_skipped() {
    let skipped = [
        KeyContext {
            default_prevented: true,
            ..Default::default()
        },
        KeyContext {
            on_tab: true,
            ..Default::default()
        },
        KeyContext {
            in_text_input: true,
            ..Default::default()
        },
        KeyContext {
            modified: true,
            ..Default::default()
        },
    ];
    for cx in skipped {
        assert_eq!(action_for_event("-", &cx), None, "{cx:?}");
        assert_eq!(action_for_event("m", &cx), None, "{cx:?}");
    }
    assert_eq!(
        action_for_event("-", &KeyContext::default()),
        Some(KeyAction::VolumeDown)
    );
}

#[test]
fn held_keys_repeat_volume_but_not_toggle() {
    let held = KeyContext {
        repeat: true,
        ..Default::default()
    };
    assert_eq!(action_for_event("m", &held), None);
    assert_eq!(action_for_event("+", &held), Some(KeyAction::VolumeUp));
}
