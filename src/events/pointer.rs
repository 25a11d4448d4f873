use crate::audio::AudioSlot;
use crate::camera::Camera;
use crate::constants::PICK_RADIUS_SLACK;
use crate::input::{self, PickTarget};
use crate::storage::PageStorage;
use garden_core::{ClickOutcome, Garden, PreferenceStore, ShapeId};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub garden: Rc<RefCell<Garden>>,
    pub audio: Rc<RefCell<AudioSlot>>,
    pub prefs: Rc<RefCell<PreferenceStore<PageStorage>>>,
    pub camera: Camera,
}

pub fn wire_pointer_handlers(w: PointerWiring) {
    wire_pointermove(&w);
    wire_pointerup(&w);
}

fn pick(w: &PointerWiring, ev: &web::PointerEvent) -> Option<ShapeId> {
    let pos = input::pointer_canvas_px(ev, &w.canvas);
    let (ro, rd) = w.camera.screen_ray(
        pos.x,
        pos.y,
        w.canvas.width() as f32,
        w.canvas.height() as f32,
    );
    let targets: Vec<PickTarget> = w
        .garden
        .borrow()
        .shapes()
        .filter(|s| s.is_visible())
        .map(|s| PickTarget {
            index: s.id.0,
            center: s.position,
            radius: s.pick_radius() * PICK_RADIUS_SLACK,
        })
        .collect();
    input::pick_nearest(ro, rd, &targets).map(ShapeId)
}

fn wire_pointermove(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();
    let hovering = Rc::new(RefCell::new(false));

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let hit = pick(&w, &ev).is_some();
        if *hovering.borrow() != hit {
            *hovering.borrow_mut() = hit;
            let cursor = if hit { "pointer" } else { "" };
            _ = w.canvas.style().set_property("cursor", cursor);
        }
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerup(w: &PointerWiring) {
    let w = w.clone();
    let canvas_for_listener = w.canvas.clone();

    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(id) = pick(&w, &ev) else {
            return;
        };
        let outcome = w.garden.borrow_mut().click(id);
        match outcome {
            ClickOutcome::Collected {
                chord, collected, ..
            } => {
                log::info!("[garden] collected shape {} ({} so far)", id.0, collected);
                let prefs = w.prefs.borrow().snapshot();
                let mut audio = w.audio.borrow_mut();
                if let Some(inst) = audio.instrument(&prefs) {
                    if let Err(e) = inst.play_request(&chord) {
                        log::warn!("[audio] chord not played: {}", e);
                    }
                }
            }
            ClickOutcome::AlreadyCollected | ClickOutcome::Ignored => {}
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas_for_listener
        .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
    closure.forget();
}
