use crate::constants::{COMPLETE_BODY, COMPLETE_ID, COMPLETE_TITLE, HIDDEN_CLASS, PROGRESS_ID};
use web_sys as web;

pub fn progress_text(collected: usize, total: usize) -> String {
    format!("Progress: {} / {}", collected.min(total), total)
}

#[inline]
pub fn show(el: &web::Element) {
    _ = el.class_list().remove_1(HIDDEN_CLASS);
    // fallback for pages without the CSS class
    _ = el.set_attribute("style", "");
}

#[inline]
pub fn hide(el: &web::Element) {
    _ = el.class_list().add_1(HIDDEN_CLASS);
    _ = el.set_attribute("style", "display:none");
}

/// Progress line and completion banner, updated only when they change.
pub struct GardenOverlay {
    progress: Option<web::Element>,
    complete: Option<web::Element>,
    last_progress: Option<(usize, usize)>,
    last_complete: Option<bool>,
}

impl GardenOverlay {
    pub fn attach(document: &web::Document) -> Self {
        let progress = document.get_element_by_id(PROGRESS_ID);
        let complete = document.get_element_by_id(COMPLETE_ID);
        if progress.is_none() {
            log::warn!("[garden] missing #{}; progress is not shown", PROGRESS_ID);
        }
        if let Some(el) = &complete {
            if el.inner_html().trim().is_empty() {
                el.set_inner_html(&format!(
                    "<strong>{}</strong><div>{}</div>",
                    COMPLETE_TITLE, COMPLETE_BODY
                ));
            }
            hide(el);
        }
        Self {
            progress,
            complete,
            last_progress: None,
            last_complete: None,
        }
    }

    pub fn update(&mut self, collected: usize, total: usize, complete: bool) {
        if self.last_progress != Some((collected, total)) {
            if let Some(el) = &self.progress {
                el.set_text_content(Some(&progress_text(collected, total)));
            }
            self.last_progress = Some((collected, total));
        }
        if self.last_complete != Some(complete) {
            if let Some(el) = &self.complete {
                if complete {
                    show(el);
                } else {
                    hide(el);
                }
            }
            self.last_complete = Some(complete);
        }
    }
}
