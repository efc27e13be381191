/// Mesh primitives: indexed triangle surfaces with per-vertex normals
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from the winding of the vertices. Degenerate faces get a zero normal.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        face_normal(
            &self.vertices[0].position,
            &self.vertices[1].position,
            &self.vertices[2].position,
        )
    }
}

fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    (b - a)
        .cross(&(c - a))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// An indexed triangle mesh.
///
/// Faces index into `vertices` with counter-clockwise winding seen from
/// outside the solid. Generated meshes are values: a parameter change builds
/// a new mesh instead of editing the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_face(&mut self, a: u32, b: u32, c: u32) {
        self.faces.push([a, b, c]);
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        let [v0, v1, v2] = triangle.vertices;
        let a = self.push_vertex(v0);
        let b = self.push_vertex(v1);
        let c = self.push_vertex(v2);
        self.push_face(a, b, c);
    }

    /// Add a triangle whose vertices all carry the face normal
    pub fn add_flat_triangle(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
        let normal = face_normal(&a, &b, &c);
        self.add_triangle(Triangle::new(
            Vertex::from_parts(a, normal),
            Vertex::from_parts(b, normal),
            Vertex::from_parts(c, normal),
        ));
    }

    /// Add a planar quad `a b c d` (counter-clockwise) as two flat triangles
    pub fn add_flat_quad(&mut self, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>, d: Point3<f32>) {
        let normal = face_normal(&a, &b, &c);
        self.add_quad([
            Vertex::from_parts(a, normal),
            Vertex::from_parts(b, normal),
            Vertex::from_parts(c, normal),
            Vertex::from_parts(d, normal),
        ]);
    }

    /// Add a quad with caller-supplied normals (e.g. smooth cylinder sides)
    pub fn add_quad(&mut self, corners: [Vertex; 4]) {
        let [a, b, c, d] = corners.map(|v| self.push_vertex(v));
        self.push_face(a, b, c);
        self.push_face(a, c, d);
    }

    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let [a, b, c] = *self.faces.get(index)?;
        Some(Triangle::new(
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?.position;
        let bounds = self.vertices.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |acc, v| Bounds {
                min: acc.min.inf(&v.position),
                max: acc.max.sup(&v.position),
            },
        );
        Some(bounds)
    }

    /// Positions as a flat `x, y, z` buffer for GPU upload
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x, v.position.y, v.position.z])
            .collect()
    }

    /// Normals as a flat `nx, ny, nz` buffer for GPU upload
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x, v.normal.y, v.normal.z])
            .collect()
    }

    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flatten().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_flat_quad(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        mesh
    }

    #[test]
    fn test_quad_is_two_faces() {
        let mesh = unit_square();
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertices().len(), 4);
        assert_eq!(mesh.index_buffer(), vec![0, 1, 2, 0, 2, 3]);
        for triangle in mesh.triangles() {
            assert!((triangle.calculate_normal() - Vector3::z()).norm() < 1e-6);
        }
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let triangle = Triangle::new(
            Vertex::from_parts(p, Vector3::zeros()),
            Vertex::from_parts(p, Vector3::zeros()),
            Vertex::from_parts(p, Vector3::zeros()),
        );
        assert_eq!(triangle.calculate_normal(), Vector3::zeros());
    }

    #[test]
    fn test_bounds_and_translate() {
        let mut mesh = unit_square();
        mesh.translate(Vector3::new(-0.5, -0.5, 2.0));
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Point3::new(-0.5, -0.5, 2.0));
        assert_eq!(bounds.max, Point3::new(0.5, 0.5, 2.0));
        assert_eq!(bounds.center(), Point3::new(0.0, 0.0, 2.0));
        assert_eq!(bounds.extents(), Vector3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
        assert!(Mesh::new().is_empty());
    }

    #[test]
    fn test_buffers_are_flat() {
        let mesh = unit_square();
        assert_eq!(mesh.position_buffer().len(), 12);
        assert_eq!(mesh.normal_buffer()[2], 1.0);
    }
}
