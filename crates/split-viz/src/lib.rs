//! Shared visualization utilities for the polygon split viewer.

use std::hash::{Hash, Hasher};

use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};
use plane_split::{Plane, Polygon, SplitResult};

pub const ABOVE_TINT: Color = Color::new(0.95, 0.55, 0.25, 1.0);
pub const ON_TINT: Color = Color::new(0.55, 0.85, 0.45, 1.0);
pub const BELOW_TINT: Color = Color::new(0.30, 0.55, 0.95, 1.0);

/// Shade of `tint` picked from a hash of the fragment's vertices, so
/// sibling fragments in one bucket stay distinguishable and stable.
pub fn fragment_color(polygon: &Polygon, tint: Color) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in polygon.vertices() {
        for c in v.iter() {
            c.to_bits().hash(&mut hasher);
        }
    }
    let shade = 0.6 + 0.4 * (hasher.finish() % 256) as f32 / 255.0;
    Color::new(tint.r * shade, tint.g * shade, tint.b * shade, 0.85)
}

fn to_vec3(p: Point3<f64>, offset: Vec3) -> Vec3 {
    vec3(p.x as f32, p.y as f32, p.z as f32) + offset
}

/// Draws a polygon's boundary as a closed line loop, shifted by `offset`.
pub fn draw_outline(polygon: &Polygon, offset: Vec3, color: Color) {
    let verts = polygon.vertices();
    for (i, p) in verts.iter().enumerate() {
        let q = verts[(i + 1) % verts.len()];
        draw_line_3d(to_vec3(*p, offset), to_vec3(q, offset), color);
    }
}

/// Draws a polygon filled (fan triangulation) when it is convex, plus its outline.
///
/// Concave fragments only get the outline, since a fan would spill outside them.
pub fn draw_polygon(polygon: &Polygon, offset: Vec3, tint: Color) {
    let verts = polygon.vertices();
    let color = fragment_color(polygon, tint);

    if verts.len() >= 3 && polygon.is_convex() {
        let mesh_vertices: Vec<Vertex> = verts
            .iter()
            .map(|p| Vertex::new2(to_vec3(*p, offset), vec2(0.0, 0.0), color))
            .collect();

        // Fan triangulation: vertex 0 connects to all edges
        let mut indices: Vec<u16> = Vec::with_capacity((verts.len() - 2) * 3);
        for i in 1..verts.len() - 1 {
            indices.push(0);
            indices.push(i as u16);
            indices.push((i + 1) as u16);
        }

        draw_mesh(&Mesh {
            vertices: mesh_vertices,
            indices,
            texture: None,
        });
    }

    draw_outline(polygon, offset, WHITE);
}

/// Draws a square patch of the cutting plane of half-size `extent`, centered
/// on the projection of `center` onto the plane.
pub fn draw_cut_plane(plane: &Plane, center: Point3<f64>, extent: f64, color: Color) {
    let n = plane.normal();
    let origin = center - n * plane.signed_distance(center);

    // Any vector not parallel to the normal gives a tangent basis.
    let helper = if n.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    let u = n.cross(&helper).normalize() * extent;
    let v = n.cross(&u);

    let corners = [origin - u - v, origin + u - v, origin + u + v, origin - u + v];
    let mesh_vertices: Vec<Vertex> = corners
        .iter()
        .map(|p| Vertex::new2(to_vec3(*p, Vec3::ZERO), vec2(0.0, 0.0), color))
        .collect();

    draw_mesh(&Mesh {
        vertices: mesh_vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
        texture: None,
    });
}

/// Where each bucket of a split result is drawn.
#[derive(Debug, Clone, Copy)]
pub struct BucketOffsets {
    pub above: Vec3,
    pub on: Vec3,
    pub below: Vec3,
}

impl BucketOffsets {
    /// Places the fragments behind the input drawn at `input`, pulling the
    /// above and below buckets apart by `gap`. Coplanar polygons go to the side.
    pub fn around(input: Vec3, gap: f32) -> Self {
        Self {
            above: input + vec3(0.0, gap, -2.0),
            on: input + vec3(10.0, 0.0, 0.0),
            below: input + vec3(0.0, -gap, -2.0),
        }
    }
}

/// Draws every fragment of a split, each bucket shifted by its offset.
pub fn draw_split(result: &SplitResult, offsets: &BucketOffsets) {
    for polygon in &result.above {
        draw_polygon(polygon, offsets.above, ABOVE_TINT);
    }
    for polygon in &result.on {
        draw_polygon(polygon, offsets.on, ON_TINT);
    }
    for polygon in &result.below {
        draw_polygon(polygon, offsets.below, BELOW_TINT);
    }
}

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 50.0;

/// Mouse-driven camera orbiting the split scene.
///
/// Dragging with the left button turns it, the wheel zooms.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn looking_at(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            yaw: 0.3,
            pitch: 0.5,
        }
    }

    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch = (self.pitch - delta.y * 2.0).clamp(-1.5, 1.5);
        }
        self.distance = (self.distance - mouse_wheel().1).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn to_camera3d(&self) -> Camera3D {
        let offset = vec3(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        ) * self.distance;
        Camera3D {
            position: self.target + offset,
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
