use crate::audio::AudioSlot;
use crate::camera::Camera;
use crate::constants::TRANSITIONING_ATTR;
use crate::overlay::GardenOverlay;
use crate::render::{self, InstanceBatch};
use crate::storage::PageStorage;
use garden_core::{Garden, GardenEvent, PreferenceStore};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub garden: Rc<RefCell<Garden>>,
    pub audio: Rc<RefCell<AudioSlot>>,
    pub prefs: Rc<RefCell<PreferenceStore<PageStorage>>>,

    pub canvas: web::HtmlCanvasElement,
    pub camera: Camera,
    pub gpu: Option<render::GpuState<'a>>,
    pub overlay: GardenOverlay,

    pub started: Instant,
    pub events: Vec<GardenEvent>,
    pub batch: InstanceBatch,
    pub prefs_revision: u64,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f32();
        let transitioning = self
            .canvas
            .get_attribute(TRANSITIONING_ATTR)
            .is_some_and(|v| v != "false");

        {
            let mut garden = self.garden.borrow_mut();
            if garden.is_transitioning() != transitioning {
                garden.set_transitioning(transitioning);
            }
            garden.tick(elapsed, &mut self.events);
            self.overlay.update(
                garden.collected(),
                garden.pool_size(),
                garden.show_completion_message(),
            );
        }
        for ev in self.events.drain(..) {
            match ev {
                GardenEvent::Revealed(id) => log::debug!("[garden] shape {} visible", id.0),
                GardenEvent::RoundReset => log::info!("[garden] replaying"),
            }
        }

        self.sync_preferences();

        if let Some(g) = &mut self.gpu {
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            render::build_instances(
                self.garden.borrow().shapes(),
                self.camera.eye,
                &mut self.batch,
            );
            if let Err(e) = g.render(&self.batch) {
                log::error!("render error: {:?}", e);
            }
        }
    }

    // Follow preference changes from any source with a gain ramp.
    fn sync_preferences(&mut self) {
        let prefs = self.prefs.borrow();
        if prefs.revision() == self.prefs_revision {
            return;
        }
        self.prefs_revision = prefs.revision();
        if let Some(inst) = self.audio.borrow_mut().existing() {
            inst.apply_preferences(&prefs.snapshot());
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    mesh: &render::MeshData,
    camera: Camera,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, mesh, camera).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
