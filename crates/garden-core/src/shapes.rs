//! Shape records and the fixed-size arena that owns them.
//!
//! Shapes are plain data: the animator produces updated copies each frame and
//! the garden decides when they are revealed, clicked or reset. Nothing here
//! touches the renderer; the web frontend maps [`ShapeKind`] to mesh geometry
//! through [`ShapeKind::mesh_params`].

use crate::constants::*;
use glam::Vec3;
use rand::Rng;

/// Index of a shape inside its [`ShapePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub usize);

/// Decorative primitive families the scene knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Torus,
    Sphere,
    Octahedron,
}

/// Geometry parameters handed to the mesh builder for a [`ShapeKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeshParams {
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Octahedron {
        radius: f32,
    },
}

impl MeshParams {
    /// Radius of a sphere enclosing the unscaled mesh; used for picking.
    pub fn bounding_radius(&self) -> f32 {
        match *self {
            MeshParams::Torus { radius, tube, .. } => radius + tube,
            MeshParams::Sphere { radius, .. } => radius,
            MeshParams::Octahedron { radius } => radius,
        }
    }
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Torus, ShapeKind::Sphere, ShapeKind::Octahedron];

    pub const fn mesh_params(self) -> MeshParams {
        match self {
            ShapeKind::Torus => MeshParams::Torus {
                radius: 1.0,
                tube: 0.3,
                radial_segments: 8,
                tubular_segments: 16,
            },
            ShapeKind::Sphere => MeshParams::Sphere {
                radius: 1.0,
                width_segments: 16,
                height_segments: 12,
            },
            ShapeKind::Octahedron => MeshParams::Octahedron { radius: 1.0 },
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ShapeKind::Torus => "torus",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Octahedron => "octahedron",
        }
    }
}

/// Per-shape lifecycle: `Hidden → Visible → Clicked`. Only a round reset moves
/// a shape back to `Hidden`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ShapeState {
    #[default]
    Hidden,
    Visible,
    Clicked,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub position: Vec3,
    /// Euler angles (radians) applied in XYZ order.
    pub rotation: Vec3,
    pub base_scale: f32,
    pub scale: f32,
    pub target_scale: f32,
    pub rotation_speed: f32,
    pub pulse_phase: f32,
    /// Degree of the pentatonic scale this shape plays.
    pub scale_index: usize,
    pub state: ShapeState,
}

impl Shape {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.state != ShapeState::Hidden
    }

    #[inline]
    pub fn is_clicked(&self) -> bool {
        self.state == ShapeState::Clicked
    }

    /// World-space radius used for hit testing at the current scale.
    pub fn pick_radius(&self) -> f32 {
        self.kind.mesh_params().bounding_radius() * self.scale.max(self.base_scale)
    }

    fn reset(&mut self) {
        self.state = ShapeState::Hidden;
        self.scale = GROW_IN_SCALE;
        self.target_scale = self.base_scale;
        self.rotation = Vec3::ZERO;
    }
}

/// Arena of shapes generated once and reused across rounds.
#[derive(Clone, Debug)]
pub struct ShapePool {
    shapes: Vec<Shape>,
    revealed: usize,
}

impl ShapePool {
    /// Lay `size` shapes out on a rising ring around the origin.
    pub fn generate<R: Rng + ?Sized>(size: usize, kind: ShapeKind, rng: &mut R) -> Self {
        let n = size.max(1) as f32;
        let shapes = (0..size)
            .map(|i| {
                let angle = (i as f32 / n) * std::f32::consts::TAU;
                let radius = RING_RADIUS_MIN + rng.gen::<f32>() * RING_RADIUS_SPAN;
                let height = (i as f32 / n) * RING_HEIGHT_SPAN - RING_HEIGHT_SPAN * 0.5;
                let base_scale = BASE_SCALE_MIN + rng.gen::<f32>() * BASE_SCALE_SPAN;
                Shape {
                    id: ShapeId(i),
                    kind,
                    position: Vec3::new(angle.cos() * radius, height, angle.sin() * radius),
                    rotation: Vec3::ZERO,
                    base_scale,
                    scale: GROW_IN_SCALE,
                    target_scale: 1.0,
                    rotation_speed: ROTATION_SPEED_MIN + rng.gen::<f32>() * ROTATION_SPEED_SPAN,
                    pulse_phase: rng.gen::<f32>() * std::f32::consts::TAU,
                    scale_index: i % crate::music::PENTATONIC_SCALE.len(),
                    state: ShapeState::Hidden,
                }
            })
            .collect();
        Self {
            shapes,
            revealed: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.shapes.iter_mut()
    }

    /// Number of shapes revealed since the last reset.
    #[inline]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    pub fn visible_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_visible()).count()
    }

    pub fn clicked_count(&self) -> usize {
        self.shapes.iter().filter(|s| s.is_clicked()).count()
    }

    /// Reveal the next hidden shape in id order. Returns `None` once every
    /// shape has been revealed.
    pub fn reveal_next(&mut self) -> Option<ShapeId> {
        let shape = self.shapes.get_mut(self.revealed)?;
        self.revealed += 1;
        if shape.state == ShapeState::Hidden {
            shape.state = ShapeState::Visible;
            shape.target_scale = shape.base_scale;
        }
        Some(shape.id)
    }

    /// Hide and unclick every shape, keeping its layout.
    pub fn reset_all(&mut self) {
        for s in &mut self.shapes {
            s.reset();
        }
        self.revealed = 0;
    }
}
