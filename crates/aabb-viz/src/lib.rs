//! Shared visualization utilities for the AABB tree demos.

use std::hash::{Hash, Hasher};

use aabb_tree::{AabbNode, BoundingBox};
use macroquad::models::{Mesh, Vertex, draw_mesh};
use macroquad::prelude::*;
use nalgebra::{Point2, Point3};
use ::rand::Rng;

pub mod navigator;
pub use navigator::TreeNavigator;

/// Generates a deterministic color from a primitive index using hashing.
/// The same primitive keeps its color across frames and rebuilds.
pub fn primitive_color(primitive: usize) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    primitive.hash(&mut hasher);
    let hash = hasher.finish();

    // Extract RGB from hash bytes
    let r = ((hash >> 16) & 0xFF) as u8;
    let g = ((hash >> 8) & 0xFF) as u8;
    let b = (hash & 0xFF) as u8;

    // Ensure colors aren't too dark by adding a minimum brightness
    Color::from_rgba(r.max(40), g.max(40), b.max(40), 255)
}

/// Color of a box at the given depth below the current navigator node.
pub fn depth_color(depth: usize) -> Color {
    const PALETTE: [Color; 5] = [YELLOW, ORANGE, PINK, SKYBLUE, LIME];
    PALETTE[depth % PALETTE.len()]
}

#[inline]
pub fn to_vec3(p: &Point3<f32>) -> Vec3 {
    vec3(p.x, p.y, p.z)
}

/// Draws the triangles of a 3D mesh, one color per primitive.
///
/// Primitives are drawn in chunks so that every draw call stays within
/// macroquad's 16-bit index range.
pub fn draw_triangles_3d(vertices: &[Point3<f32>], elements: &[[usize; 3]]) {
    for (chunk_index, chunk) in elements.chunks(4096).enumerate() {
        let mut mesh_vertices = Vec::with_capacity(3 * chunk.len());
        let mut indices = Vec::with_capacity(3 * chunk.len());
        for (offset, element) in chunk.iter().enumerate() {
            let color = primitive_color(chunk_index * 4096 + offset);
            for &v in element {
                indices.push(mesh_vertices.len() as u16);
                mesh_vertices.push(Vertex::new2(to_vec3(&vertices[v]), vec2(0.0, 0.0), color));
            }
        }
        draw_mesh(&Mesh {
            vertices: mesh_vertices,
            indices,
            texture: None,
        });
    }
}

/// Draws a 3D box as a wireframe.
pub fn draw_box_3d(bbox: &BoundingBox<f32, 3>, color: Color) {
    if bbox.is_empty() {
        return;
    }
    let size = bbox.diagonal();
    draw_cube_wires(
        to_vec3(&bbox.center()),
        vec3(size.x, size.y, size.z),
        color,
    );
}

/// Draws the boxes of a subtree down to `max_depth` levels below `node`.
pub fn draw_subtree_boxes_3d(node: &AabbNode<f32, 3>, max_depth: usize) {
    draw_subtree_boxes(node, 0, max_depth, &mut |bbox, depth| {
        draw_box_3d(bbox, depth_color(depth))
    });
}

/// Walks a subtree down to `max_depth`, calling `draw` with each box and its
/// depth below `node`.
pub fn draw_subtree_boxes<const D: usize>(
    node: &AabbNode<f32, D>,
    depth: usize,
    max_depth: usize,
    draw: &mut impl FnMut(&BoundingBox<f32, D>, usize),
) {
    draw(node.bbox(), depth);
    if depth == max_depth {
        return;
    }
    if let AabbNode::Internal { left, right, .. } = node {
        draw_subtree_boxes(left, depth + 1, max_depth, draw);
        draw_subtree_boxes(right, depth + 1, max_depth, draw);
    }
}

/// Maps a 2D world rectangle onto the screen, keeping the aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct ScreenMap {
    scale: f32,
    offset: Vec2,
}

impl ScreenMap {
    /// Fits `world` into the current screen with a margin in pixels.
    pub fn fit(world: &BoundingBox<f32, 2>, margin: f32) -> Self {
        let extent = world.diagonal();
        let available = vec2(screen_width() - 2.0 * margin, screen_height() - 2.0 * margin);
        let scale = (available.x / extent.x).min(available.y / extent.y);
        let used = vec2(extent.x * scale, extent.y * scale);
        let offset = vec2(
            margin + (available.x - used.x) / 2.0 - world.min().x * scale,
            margin + (available.y - used.y) / 2.0 + world.max().y * scale,
        );
        Self { scale, offset }
    }

    /// Converts a world point to screen coordinates (y axis pointing up).
    pub fn to_screen(&self, p: &Point2<f32>) -> Vec2 {
        vec2(self.offset.x + p.x * self.scale, self.offset.y - p.y * self.scale)
    }

    /// Converts screen coordinates back to a world point.
    pub fn to_world(&self, screen: Vec2) -> Point2<f32> {
        Point2::new(
            (screen.x - self.offset.x) / self.scale,
            (self.offset.y - screen.y) / self.scale,
        )
    }

    /// Draws a 2D box outline.
    pub fn draw_box(&self, bbox: &BoundingBox<f32, 2>, thickness: f32, color: Color) {
        if bbox.is_empty() {
            return;
        }
        let top_left = self.to_screen(&Point2::new(bbox.min().x, bbox.max().y));
        let size = bbox.diagonal() * self.scale;
        draw_rectangle_lines(top_left.x, top_left.y, size.x, size.y, thickness, color);
    }

    /// Fills a 2D triangle.
    pub fn fill_triangle(&self, corners: [&Point2<f32>; 3], color: Color) {
        let [a, b, c] = corners.map(|p| self.to_screen(p));
        draw_triangle(a, b, c, color);
    }

    /// Outlines a 2D triangle.
    pub fn outline_triangle(&self, corners: [&Point2<f32>; 3], thickness: f32, color: Color) {
        let [a, b, c] = corners.map(|p| self.to_screen(p));
        draw_triangle_lines(a, b, c, thickness, color);
    }
}

/// Generates a jittered triangulated grid in `[0, width] x [0, height]`.
pub fn generate_jittered_grid(
    rng: &mut impl Rng,
    columns: usize,
    rows: usize,
    width: f32,
    height: f32,
) -> (Vec<Point2<f32>>, Vec<[usize; 3]>) {
    let (dx, dy) = (width / columns as f32, height / rows as f32);
    let mut vertices = Vec::with_capacity((columns + 1) * (rows + 1));
    for j in 0..=rows {
        for i in 0..=columns {
            // Keep the border straight so the mesh stays a rectangle
            let jitter_x = if i == 0 || i == columns { 0.0 } else { rng.random_range(-0.3f32..0.3) * dx };
            let jitter_y = if j == 0 || j == rows { 0.0 } else { rng.random_range(-0.3f32..0.3) * dy };
            vertices.push(Point2::new(i as f32 * dx + jitter_x, j as f32 * dy + jitter_y));
        }
    }

    let row = columns + 1;
    let mut elements = Vec::with_capacity(2 * columns * rows);
    for j in 0..rows {
        for i in 0..columns {
            let a = j * row + i;
            elements.push([a, a + 1, a + row + 1]);
            elements.push([a, a + row + 1, a + row]);
        }
    }
    (vertices, elements)
}

/// Generates a wavy height field over `[-size/2, size/2]^2` in the xz plane.
pub fn generate_height_field(n: usize, size: f32, amplitude: f32) -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let x = (i as f32 / n as f32 - 0.5) * size;
            let z = (j as f32 / n as f32 - 0.5) * size;
            let y = amplitude * (x * 1.7).sin() * (z * 1.3).cos();
            vertices.push(Point3::new(x, y, z));
        }
    }

    let row = n + 1;
    let mut elements = Vec::with_capacity(2 * n * n);
    for j in 0..n {
        for i in 0..n {
            let a = j * row + i;
            elements.push([a, a + row, a + 1]);
            elements.push([a + 1, a + row, a + row + 1]);
        }
    }
    (vertices, elements)
}

/// Appends the 12 triangles of an axis-aligned cube to a mesh.
pub fn append_cube(
    vertices: &mut Vec<Point3<f32>>,
    elements: &mut Vec<[usize; 3]>,
    center: Point3<f32>,
    size: f32,
) {
    let half = size / 2.0;
    let base = vertices.len();
    for corner in 0..8 {
        let sign = |bit: usize| if corner & bit == 0 { -half } else { half };
        vertices.push(center + nalgebra::Vector3::new(sign(1), sign(2), sign(4)));
    }

    // Two triangles per face, corners indexed by their x/y/z bits
    let faces: [[usize; 4]; 6] = [
        [0, 1, 3, 2], // -z
        [4, 6, 7, 5], // +z
        [0, 4, 5, 1], // -y
        [2, 3, 7, 6], // +y
        [0, 2, 6, 4], // -x
        [1, 5, 7, 3], // +x
    ];
    for [a, b, c, d] in faces {
        elements.push([base + a, base + b, base + c]);
        elements.push([base + a, base + c, base + d]);
    }
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    /// Minimum distance from target
    pub min_distance: f32,
    /// Maximum distance from target
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Creates a new orbit camera with the given configuration.
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 5.0,
            min_distance: 10.0,
            max_distance: 200.0,
        }
    }

    /// Sets the zoom configuration (speed and distance limits).
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Updates camera state from user input (mouse drag, scroll, arrow keys).
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        // Clamp pitch to avoid gimbal lock
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance -= scroll * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }
    }

    /// Returns the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    /// Converts to macroquad's Camera3D for rendering.
    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aabb_tree::AabbTree;
    use ::rand::SeedableRng;
    use ::rand::rngs::StdRng;

    #[test]
    fn jittered_grid_is_a_valid_mesh() {
        let mut rng = StdRng::seed_from_u64(3);
        let (vertices, elements) = generate_jittered_grid(&mut rng, 6, 4, 3.0, 2.0);

        assert_eq!(vertices.len(), 7 * 5);
        assert_eq!(elements.len(), 2 * 6 * 4);

        // Every cell center lies in exactly one triangle
        let tree = AabbTree::build(&vertices, &elements);
        let center = Point2::new(1.5, 1.0);
        assert!(!tree.find(&vertices, &elements, &center, false).is_empty());
        assert!(tree.find(&vertices, &elements, &Point2::new(4.0, 1.0), false).is_empty());
    }

    #[test]
    fn cube_is_closed_and_hit_twice() {
        let mut vertices = Vec::new();
        let mut elements = Vec::new();
        append_cube(&mut vertices, &mut elements, Point3::new(0.0, 0.0, 0.0), 2.0);
        assert_eq!(elements.len(), 12);

        let tree = AabbTree::build(&vertices, &elements);
        let hits = tree.ray_all_hits(
            &vertices,
            &elements,
            &Point3::new(0.3, 0.2, -5.0),
            &nalgebra::Vector3::new(0.0, 0.0, 1.0),
        );
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn orbit_camera_looks_at_target() {
        let camera = OrbitCamera::new(8.0, 0.4, 0.5).with_zoom(0.5, 2.0, 20.0);
        assert!((camera.position().distance(camera.target) - 8.0).abs() < 1e-5);

        let view = camera.to_camera3d();
        assert_eq!(view.target, camera.target);
        assert_eq!(view.position, camera.position());
    }

    #[test]
    fn height_field_size() {
        let (vertices, elements) = generate_height_field(8, 4.0, 0.5);
        assert_eq!(vertices.len(), 81);
        assert_eq!(elements.len(), 128);
    }
}
