use garden_core::MeshParams;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

pub fn build_mesh(params: &MeshParams) -> MeshData {
    match *params {
        MeshParams::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        } => torus(radius, tube, radial_segments.max(3), tubular_segments.max(3)),
        MeshParams::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere(radius, width_segments.max(3), height_segments.max(2)),
        MeshParams::Octahedron { radius } => octahedron(radius),
    }
}

/// Ring in the XY plane around the Z axis; `radius` to the tube center.
fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = radius + tube * v.cos();
            let p = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.vertices.push(Vertex::new(p, p - center));
        }
    }
    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (row * j + i - 1) as u16;
            let b = (row * (j - 1) + i - 1) as u16;
            let c = (row * (j - 1) + i) as u16;
            let d = (row * j + i) as u16;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

fn sphere(radius: f32, width: u32, height: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for y in 0..=height {
        let v = y as f32 / height as f32;
        let theta = v * PI;
        for x in 0..=width {
            let u = x as f32 / width as f32;
            let phi = u * TAU;
            let n = Vec3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            mesh.vertices.push(Vertex::new(n * radius, n));
        }
    }
    let row = width + 1;
    for y in 0..height {
        for x in 0..width {
            let a = (y * row + x + 1) as u16;
            let b = (y * row + x) as u16;
            let c = ((y + 1) * row + x) as u16;
            let d = ((y + 1) * row + x + 1) as u16;
            if y != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if y != height - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

// Flat-shaded: three unique vertices per face.
fn octahedron(radius: f32) -> MeshData {
    let axes = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let faces: [[usize; 3]; 8] = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    let mut mesh = MeshData::default();
    for face in faces {
        let [a, b, c] = face.map(|i| axes[i] * radius);
        let normal = (b - a).cross(c - a);
        let base = mesh.vertices.len() as u16;
        for p in [a, b, c] {
            mesh.vertices.push(Vertex::new(p, normal));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
    mesh
}
