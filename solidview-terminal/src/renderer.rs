/// ASCII rasterizer for terminal rendering
use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use solidview_core::{Camera, CameraTransform, Material, Mesh, ProjectionMode, Renderer, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Handle for a mesh held by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(u64);

struct Uploaded {
    mesh: Mesh,
    material: Material,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    camera: Camera,
    meshes: HashMap<MeshId, Uploaded>,
    next_id: u64,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            camera: Camera::new(width as u32, height as u32 * CELL_ASPECT),
            meshes: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Number of meshes currently held
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn toggle_projection(&mut self) {
        self.camera.mode = match self.camera.mode {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        };
    }

    /// Rendered characters of one row
    pub fn row(&self, y: usize) -> &[char] {
        &self.char_buffer[y * self.width..(y + 1) * self.width]
    }

    fn render_mesh(&mut self, mesh: &Mesh, material: &Material, model_matrix: &Matrix4<f32>) {
        let light_dir = (self.camera.transform.eye - self.camera.transform.target)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::z);
        for triangle in mesh.triangles() {
            self.render_triangle(&triangle, material, model_matrix, &light_dir);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &Triangle,
        material: &Material,
        model_matrix: &Matrix4<f32>,
        light_dir: &Vector3<f32>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match self.camera.project_to_screen(
                &vertex.position,
                model_matrix,
                self.width as u32,
                self.height as u32,
            ) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        // Face normal in world space for shading
        let normal = model_matrix.transform_vector(&triangle.calculate_normal());
        let facing = normal.dot(light_dir);
        let brightness = if material.double_sided {
            facing.abs()
        } else {
            facing.max(0.0)
        };

        // Map brightness to character
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let char_index = char_index.clamp(1, LUMINOSITY_RAMP.len() - 1);
        let character = LUMINOSITY_RAMP[char_index];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                        }
                    }
                }
            }
        }
    }

    /// Write the last drawn frame, starting at row `top`
    pub fn present<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top + y as u16))?;
            for &c in self.row(y) {
                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::DarkCyan,
                    '+' | '*' => Color::Cyan,
                    '#' | '%' | '@' => Color::White,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    type MeshHandle = MeshId;

    fn upload(&mut self, mesh: &Mesh, material: &Material) -> MeshId {
        self.next_id += 1;
        let id = MeshId(self.next_id);
        self.meshes.insert(
            id,
            Uploaded {
                mesh: mesh.clone(),
                material: *material,
            },
        );
        id
    }

    fn release(&mut self, handle: MeshId) {
        self.meshes.remove(&handle);
    }

    fn set_camera(&mut self, camera: &CameraTransform) {
        self.camera.transform = *camera;
    }

    fn draw(&mut self, handle: &MeshId, model: &Matrix4<f32>) {
        self.clear();
        // Taken out for the duration of the pass so the buffers can be borrowed mutably
        if let Some(uploaded) = self.meshes.remove(handle) {
            self.render_mesh(&uploaded.mesh, &uploaded.material, model);
            self.meshes.insert(*handle, uploaded);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width as usize;
        self.height = height as usize;
        let size = self.width * self.height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        self.camera.resize(width, height * CELL_ASPECT);
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use solidview_core::{generate, OrbitCamera, ShapeParameters};

    fn cuboid() -> Mesh {
        generate(&ShapeParameters::Cuboid {
            width: 6.0,
            height: 6.0,
            depth: 6.0,
        })
        .unwrap()
        .mesh
    }

    fn filled(renderer: &AsciiRenderer) -> usize {
        (0..renderer.height())
            .flat_map(|y| renderer.row(y).iter())
            .filter(|&&c| c != ' ')
            .count()
    }

    #[test]
    fn test_upload_and_release() {
        let mut renderer = AsciiRenderer::new(40, 20);
        let first = renderer.upload(&cuboid(), &solidview_core::view::SOLID_MATERIAL);
        let second = renderer.upload(&cuboid(), &solidview_core::view::SOLID_MATERIAL);
        assert_ne!(first, second);
        renderer.release(first);
        assert_eq!(renderer.mesh_count(), 1);
    }

    #[test]
    fn test_draw_fills_center() {
        let mut renderer = AsciiRenderer::new(60, 30);
        renderer.set_camera(&OrbitCamera::default().transform());
        let id = renderer.upload(&cuboid(), &solidview_core::view::SOLID_MATERIAL);
        renderer.draw(&id, &Matrix4::identity());
        assert!(filled(&renderer) > 0);
        assert_ne!(renderer.row(15)[30], ' ');
    }

    #[test]
    fn test_released_mesh_draws_nothing() {
        let mut renderer = AsciiRenderer::new(60, 30);
        let id = renderer.upload(&cuboid(), &solidview_core::view::SOLID_MATERIAL);
        renderer.release(id);
        renderer.draw(&id, &Matrix4::identity());
        assert_eq!(filled(&renderer), 0);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.resize(80, 24);
        assert_eq!(renderer.width(), 80);
        assert_eq!(renderer.row(23).len(), 80);
        assert!((renderer.camera().aspect - 80.0 / 48.0).abs() < 1e-6);
    }

    #[test]
    fn test_barycentric_inside() {
        let w = barycentric((0.0, 0.0), (4.0, 0.0), (0.0, 4.0), (1.0, 1.0)).unwrap();
        assert!(w.0 > 0.0 && w.1 > 0.0 && w.2 > 0.0);
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (1.0, 1.0)).is_none());
    }
}
