use glam::{Vec2, Vec3};
use web_sys as web;

/// A pickable target: shape index, world-space center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickTarget {
    pub index: usize,
    pub center: Vec3,
    pub radius: f32,
}

#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Index of the closest target hit by the ray, if any.
pub fn pick_nearest(ray_origin: Vec3, ray_dir: Vec3, targets: &[PickTarget]) -> Option<usize> {
    let mut best = None::<(usize, f32)>;
    for target in targets {
        if let Some(t) = ray_sphere(ray_origin, ray_dir, target.center, target.radius) {
            match best {
                Some((_, bt)) if t >= bt => {}
                _ => best = Some((target.index, t)),
            }
        }
    }
    best.map(|(i, _)| i)
}

/// Pointer position in canvas backing-store pixels.
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    css_to_backing(
        Vec2::new(x_css, y_css),
        Vec2::new(rect.width() as f32, rect.height() as f32),
        Vec2::new(canvas.width() as f32, canvas.height() as f32),
    )
}

#[inline]
pub fn css_to_backing(css: Vec2, css_size: Vec2, backing_size: Vec2) -> Vec2 {
    if css_size.x <= 0.0 || css_size.y <= 0.0 {
        return backing_size * 0.5;
    }
    css / css_size * backing_size
}
