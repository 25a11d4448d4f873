use crate::constants::SECTION_TAB_ATTR;
use crate::dom;
use crate::events::keymap::{action_for_event, apply_action, KeyAction, KeyContext};
use crate::storage::PageStorage;
use garden_core::PreferenceStore;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Arrow keys on a focused tab move between tabs, not the volume.
fn target_is_tab(ev: &web::KeyboardEvent) -> bool {
    let Some(el) = ev.target().and_then(|t| t.dyn_into::<web::Element>().ok()) else {
        return false;
    };
    let selector = format!("[{}], [role=\"tab\"]", SECTION_TAB_ATTR);
    matches!(el.closest(&selector), Ok(Some(_)))
}

pub fn handle_global_keydown(
    ev: &web::KeyboardEvent,
    prefs: &Rc<RefCell<PreferenceStore<PageStorage>>>,
) {
    let cx = KeyContext {
        modified: ev.ctrl_key() || ev.meta_key() || ev.alt_key(),
        repeat: ev.repeat(),
        default_prevented: ev.default_prevented(),
        in_text_input: dom::window_document().is_some_and(|d| dom::focus_in_text_input(&d)),
        on_tab: target_is_tab(ev),
    };
    let Some(action) = action_for_event(&ev.key(), &cx) else {
        return;
    };
    let mut store = prefs.borrow_mut();
    if apply_action(&mut store, action) {
        match action {
            KeyAction::ToggleSound => {
                log::info!(
                    "[keys] sound {}",
                    if store.sound_enabled() { "on" } else { "off" }
                );
            }
            KeyAction::VolumeUp | KeyAction::VolumeDown => {
                log::info!("[keys] volume {:.2}", store.sound_volume());
            }
        }
    }
}

pub fn wire_global_keydown(prefs: Rc<RefCell<PreferenceStore<PageStorage>>>) {
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &prefs);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
