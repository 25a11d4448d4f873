//! DOM side of the About-section scroll-spy.
//!
//! An `IntersectionObserver` rooted at the scroll container reports
//! visibility ratios; section geometry is read fresh on each update so the
//! proximity score follows the scroll position between observer callbacks.

use crate::constants::{ABOUT_SCROLL_ID, SECTION_ATTR, SECTION_TAB_ATTR};
use crate::dom;
use garden_core::{tab_for_key, ScrollMetrics, ScrollSpy, ScrollSpyConfig, SectionSample};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

const TICK_INTERVAL_MS: i32 = 50;
const OBSERVER_THRESHOLDS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[inline]
fn now_ms() -> f64 {
    js_sys::Date::now()
}

struct SpyDom {
    container: web::HtmlElement,
    sections: Vec<web::HtmlElement>,
    tabs: Vec<(usize, web::HtmlElement)>,
    spy: RefCell<ScrollSpy>,
    // (intersecting, ratio) per section, as last reported by the observer
    visibility: RefCell<Vec<(bool, f32)>>,
}

impl SpyDom {
    fn section_index(&self, el: &web::Element) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.unchecked_ref::<web::Element>() == el)
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.container.scroll_top() as f32,
            scroll_height: self.container.scroll_height() as f32,
            client_height: self.container.client_height() as f32,
        }
    }

    fn samples(&self) -> (Vec<SectionSample>, f32) {
        let root = self.container.get_bounding_client_rect();
        let visibility = self.visibility.borrow();
        let samples = self
            .sections
            .iter()
            .enumerate()
            .map(|(index, el)| {
                let rect = el.get_bounding_client_rect();
                let (intersecting, ratio) =
                    visibility.get(index).copied().unwrap_or_default();
                SectionSample {
                    index,
                    intersecting,
                    intersection_ratio: ratio,
                    top: (rect.top() - root.top()) as f32,
                    height: rect.height() as f32,
                }
            })
            .collect();
        (samples, root.height() as f32)
    }

    fn refresh(&self) {
        let (samples, vh) = self.samples();
        let switched = self.spy.borrow_mut().observe(&samples, vh, now_ms());
        if let Some(index) = switched {
            self.render_active(index);
        }
    }

    fn on_scroll(&self) {
        let switched = self.spy.borrow_mut().on_scroll(self.metrics(), now_ms());
        if let Some(index) = switched {
            self.render_active(index);
        }
        self.refresh();
    }

    fn on_scroll_end(&self) {
        self.spy.borrow_mut().scroll_end();
        self.refresh();
    }

    fn tick(&self) {
        let (was_programmatic, settled, is_programmatic) = {
            let mut spy = self.spy.borrow_mut();
            let was = spy.is_programmatic();
            let settled = spy.tick(now_ms());
            (was, settled, spy.is_programmatic())
        };
        if let Some(index) = settled {
            _ = self
                .container
                .set_attribute("data-active-tab", &index.to_string());
            log::debug!("[spy] tab settled on {}", index);
        }
        if was_programmatic && !is_programmatic {
            self.refresh();
        }
    }

    fn select(&self, index: usize) {
        let command = self.spy.borrow_mut().select(index, now_ms());
        let Some(command) = command else {
            return;
        };
        self.render_active(index);
        let Some(section) = self.sections.get(command.section) else {
            return;
        };
        let root = self.container.get_bounding_client_rect();
        let rect = section.get_bounding_client_rect();
        let top = self.container.scroll_top() as f64 + (rect.top() - root.top());
        let opts = web::ScrollToOptions::new();
        opts.set_top(top.max(0.0));
        opts.set_behavior(web::ScrollBehavior::Smooth);
        self.container.scroll_to_with_scroll_to_options(&opts);
        log::info!("[spy] scrolling to section {}", command.section);
    }

    fn render_active(&self, active: usize) {
        for (index, tab) in &self.tabs {
            let selected = *index == active;
            _ = tab.set_attribute("aria-selected", if selected { "true" } else { "false" });
            _ = tab.set_attribute("tabindex", if selected { "0" } else { "-1" });
            let cl = tab.class_list();
            _ = if selected {
                cl.add_1("active")
            } else {
                cl.remove_1("active")
            };
        }
    }

    fn on_tab_key(&self, ev: &web::KeyboardEvent, focused: usize) {
        let Some(target) = tab_for_key(&ev.key(), focused, self.sections.len()) else {
            return;
        };
        ev.prevent_default();
        ev.stop_propagation();
        if target != focused {
            if let Some((_, tab)) = self.tabs.iter().find(|(i, _)| *i == target) {
                _ = tab.focus();
            }
        }
        self.select(target);
    }
}

fn observe_sections(shared: &Rc<SpyDom>) -> Result<(), JsValue> {
    let shared_cb = shared.clone();
    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
            {
                let mut visibility = shared_cb.visibility.borrow_mut();
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() else {
                        continue;
                    };
                    if let Some(i) = shared_cb.section_index(&entry.target()) {
                        let ratio = entry.intersection_ratio() as f32;
                        visibility[i] = (entry.is_intersecting(), ratio);
                    }
                }
            }
            shared_cb.refresh();
        },
    )
        as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

    let thresholds = js_sys::Array::new();
    for t in OBSERVER_THRESHOLDS {
        thresholds.push(&JsValue::from_f64(t));
    }
    let init = web::IntersectionObserverInit::new();
    init.set_root(Some(shared.container.unchecked_ref::<web::Element>()));
    init.set_threshold(&thresholds);
    let observer =
        web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for section in &shared.sections {
        observer.observe(section);
    }
    callback.forget();
    Ok(())
}

fn wire_container(shared: &Rc<SpyDom>) {
    let on_scroll = shared.clone();
    let scroll = Closure::wrap(Box::new(move || on_scroll.on_scroll()) as Box<dyn FnMut()>);
    _ = shared
        .container
        .add_event_listener_with_callback("scroll", scroll.as_ref().unchecked_ref());
    scroll.forget();

    let on_end = shared.clone();
    let scroll_end = Closure::wrap(Box::new(move || on_end.on_scroll_end()) as Box<dyn FnMut()>);
    _ = shared
        .container
        .add_event_listener_with_callback("scrollend", scroll_end.as_ref().unchecked_ref());
    scroll_end.forget();

    let on_tick = shared.clone();
    let tick = Closure::wrap(Box::new(move || on_tick.tick()) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS,
        );
    }
    tick.forget();
}

fn wire_tabs(shared: &Rc<SpyDom>) {
    for (index, tab) in &shared.tabs {
        let index = *index;
        let on_click = shared.clone();
        dom::add_click_listener(tab, move || on_click.select(index));

        let on_key = shared.clone();
        let keydown = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            on_key.on_tab_key(&ev, index);
        }) as Box<dyn FnMut(_)>);
        _ = tab.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
        keydown.forget();
    }
}

/// Attach the scroll-spy to `#about-scroll` if the page has one.
pub fn wire_scroll_spy(document: &web::Document) -> anyhow::Result<()> {
    let Some(container) = document.get_element_by_id(ABOUT_SCROLL_ID) else {
        log::info!("[spy] no #{} on this page", ABOUT_SCROLL_ID);
        return Ok(());
    };
    let container: web::HtmlElement = container.dyn_into().map_err(|e| {
        anyhow::anyhow!(format!("#{} is not an element: {:?}", ABOUT_SCROLL_ID, e))
    })?;

    let sections: Vec<web::HtmlElement> = dom::indexed_elements(&container, SECTION_ATTR)
        .into_iter()
        .map(|(_, el)| el)
        .collect();
    if sections.is_empty() {
        log::warn!("[spy] #{} has no [{}] sections", ABOUT_SCROLL_ID, SECTION_ATTR);
        return Ok(());
    }
    let root = document
        .document_element()
        .ok_or_else(|| anyhow::anyhow!("no document element"))?;
    let tabs: Vec<(usize, web::HtmlElement)> = dom::indexed_elements(&root, SECTION_TAB_ATTR)
        .into_iter()
        .filter(|(i, _)| {
            let ok = *i < sections.len();
            if !ok {
                log::warn!("[spy] tab {} has no matching section", i);
            }
            ok
        })
        .collect();

    let count = sections.len();
    let shared = Rc::new(SpyDom {
        container,
        sections,
        tabs,
        spy: RefCell::new(ScrollSpy::new(count, 0, ScrollSpyConfig::default())),
        visibility: RefCell::new(vec![(false, 0.0); count]),
    });
    shared.render_active(0);

    observe_sections(&shared).map_err(|e| anyhow::anyhow!(format!("observer: {:?}", e)))?;
    wire_container(&shared);
    wire_tabs(&shared);
    log::info!("[spy] tracking {} sections, {} tabs", count, shared.tabs.len());
    Ok(())
}
