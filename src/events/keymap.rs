use garden_core::{KeyValueStorage, PreferenceStore, VOLUME_STEP};

/// Global sound shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleSound,
    VolumeUp,
    VolumeDown,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "m" | "M" => Some(KeyAction::ToggleSound),
        "+" | "=" => Some(KeyAction::VolumeUp),
        "-" | "_" => Some(KeyAction::VolumeDown),
        _ => None,
    }
}

/// What the global listener knows about a keydown besides its key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub modified: bool,
    pub repeat: bool,
    /// Another handler (e.g. tab navigation) already consumed the key.
    pub default_prevented: bool,
    pub in_text_input: bool,
    pub on_tab: bool,
}

/// Sound shortcut for a keydown, or `None` when the key belongs to someone
/// else: modified chords, text entry, focused tabs and consumed events.
pub fn action_for_event(key: &str, cx: &KeyContext) -> Option<KeyAction> {
    if cx.modified || cx.default_prevented || cx.in_text_input || cx.on_tab {
        return None;
    }
    let action = action_for_key(key)?;
    // holding `m` would flip the setting on every repeat
    if cx.repeat && action == KeyAction::ToggleSound {
        return None;
    }
    Some(action)
}

/// Apply `action` to the preference store; returns true if anything changed.
pub fn apply_action<S: KeyValueStorage>(
    prefs: &mut PreferenceStore<S>,
    action: KeyAction,
) -> bool {
    let before = prefs.revision();
    match action {
        KeyAction::ToggleSound => prefs.toggle_sound(),
        KeyAction::VolumeUp => prefs.nudge_volume(VOLUME_STEP),
        KeyAction::VolumeDown => prefs.nudge_volume(-VOLUME_STEP),
    }
    prefs.revision() != before
}
