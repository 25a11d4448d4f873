#![cfg(target_arch = "wasm32")]
use crate::audio::AudioSlot;
use crate::camera::Camera;
use crate::constants::*;
use crate::overlay::GardenOverlay;
use crate::storage::PageStorage;
use garden_core::{Garden, GardenParams, PreferenceStore, ShapeKind};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod camera;
mod constants;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod storage;

// Canvas data attributes override the default round layout.
fn garden_params(canvas: &web::HtmlCanvasElement) -> GardenParams {
    let mut params = GardenParams::default();
    if let Some(size) = dom::data_attr::<usize>(canvas, POOL_SIZE_ATTR) {
        params.pool_size = size.clamp(1, MAX_POOL_SIZE);
    }
    if let Some(seed) = dom::data_attr::<u64>(canvas, SEED_ATTR) {
        params.seed = seed;
    }
    if let Some(label) = canvas.get_attribute(SHAPE_ATTR) {
        match ShapeKind::ALL.iter().find(|k| k.label() == label.trim()) {
            Some(kind) => params.kind = *kind,
            None => log::warn!("[garden] unknown {}={:?}, using torus", SHAPE_ATTR, label),
        }
    }
    params
}

// Release the audio graph when the page goes away.
fn wire_pagehide(audio: Rc<RefCell<AudioSlot>>) {
    let closure = Closure::wrap(Box::new(move || {
        audio.borrow_mut().dispose();
        log::info!("[audio] disposed on pagehide");
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("garden-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let prefs = Rc::new(RefCell::new(PreferenceStore::load(PageStorage::open())));
    events::wire_global_keydown(prefs.clone());

    // The About page has no hero canvas, so the scroll-spy is wired first.
    if let Err(e) = events::wire_scroll_spy(&document) {
        log::warn!("[spy] disabled: {:?}", e);
    }

    let Some(canvas_el) = document.get_element_by_id(CANVAS_ID) else {
        log::info!("[garden] no #{} on this page", CANVAS_ID);
        return Ok(());
    };
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    _ = canvas.set_attribute("aria-label", &format!("{}. {}", GARDEN_TITLE, GARDEN_HINT));

    let params = garden_params(&canvas);
    let kind = params.kind;
    log::info!(
        "[garden] {} {}s, seed {}",
        params.pool_size,
        kind.label(),
        params.seed
    );
    let garden = Rc::new(RefCell::new(Garden::new(params)));
    let audio = Rc::new(RefCell::new(AudioSlot::default()));
    let camera = Camera::new(CAMERA_Z);

    dom::wire_canvas_resize(&canvas);
    events::wire_pointer_handlers(events::PointerWiring {
        canvas: canvas.clone(),
        garden: garden.clone(),
        audio: audio.clone(),
        prefs: prefs.clone(),
        camera,
    });
    wire_pagehide(audio.clone());

    let mesh = render::build_mesh(&kind.mesh_params());
    let gpu = frame::init_gpu(&canvas, &mesh, camera).await;
    let prefs_revision = prefs.borrow().revision();
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        garden,
        audio,
        prefs,
        canvas,
        camera,
        gpu,
        overlay: GardenOverlay::attach(&document),
        started: Instant::now(),
        events: Vec::new(),
        batch: render::InstanceBatch::default(),
        prefs_revision,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
