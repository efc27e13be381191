/// Tessellation of the supported solids.
///
/// Every builder returns a closed, outward-wound mesh whose height axis is +Y
/// and whose vertical midpoint sits at y = 0.
use std::f32::consts::TAU;

use nalgebra::{Point3, Vector3};

use crate::geometry::{Mesh, Vertex};

/// Radial segments used for cylinders and cones
pub const RADIAL_SEGMENTS: u32 = 32;

/// Extrude a convex profile lying in the XZ plane along +Y by `height`,
/// then move it down so the extrusion midpoint is at the origin.
///
/// The profile is `(x, z)` pairs wound so that stepping along it turns from
/// +X towards +Z.
pub fn prism(profile: &[(f32, f32)], height: f32) -> Mesh {
    let n = profile.len();
    let mut mesh = Mesh::with_capacity(n * 4 + (n - 2) * 6, n * 2 + (n - 2) * 2);
    let bottom: Vec<Point3<f32>> = profile.iter().map(|&(x, z)| Point3::new(x, 0.0, z)).collect();
    let top: Vec<Point3<f32>> = profile.iter().map(|&(x, z)| Point3::new(x, height, z)).collect();

    // Caps (fan triangulation, valid for convex profiles)
    for i in 1..n - 1 {
        mesh.add_flat_triangle(bottom[0], bottom[i], bottom[i + 1]);
        mesh.add_flat_triangle(top[0], top[i + 1], top[i]);
    }

    // Sides
    for i in 0..n {
        let j = (i + 1) % n;
        mesh.add_flat_quad(bottom[i], top[i], top[j], bottom[j]);
    }

    mesh.translate(Vector3::new(0.0, -height / 2.0, 0.0));
    mesh
}

/// Trapezoidal prism: parallel sides `side_a` (at -length/2) and `side_b`
/// (at +length/2) extruded vertically by `height`.
pub fn trapezoid(height: f32, side_a: f32, side_b: f32, length: f32) -> Mesh {
    prism(
        &[
            (-side_a / 2.0, -length / 2.0),
            (side_a / 2.0, -length / 2.0),
            (side_b / 2.0, length / 2.0),
            (-side_b / 2.0, length / 2.0),
        ],
        height,
    )
}

/// Axis-aligned box: `width` along X, `height` along Y, `depth` along Z
pub fn cuboid(width: f32, height: f32, depth: f32) -> Mesh {
    let (hw, hd) = (width / 2.0, depth / 2.0);
    prism(&[(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)], height)
}

fn ring_point(radius: f32, angle: f32, y: f32) -> Point3<f32> {
    Point3::new(radius * angle.cos(), y, radius * angle.sin())
}

fn segment_angle(i: u32, segments: u32) -> f32 {
    TAU * i as f32 / segments as f32
}

/// Right circular cylinder around the Y axis, capped at both ends
pub fn cylinder(radius: f32, height: f32, segments: u32) -> Mesh {
    let half = height / 2.0;
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(n * 10, n * 4);
    let bottom_center = Point3::new(0.0, -half, 0.0);
    let top_center = Point3::new(0.0, half, 0.0);

    for i in 0..segments {
        let (a0, a1) = (segment_angle(i, segments), segment_angle(i + 1, segments));
        let (b0, b1) = (ring_point(radius, a0, -half), ring_point(radius, a1, -half));
        let (t0, t1) = (ring_point(radius, a0, half), ring_point(radius, a1, half));
        let (n0, n1) = (
            Vector3::new(a0.cos(), 0.0, a0.sin()),
            Vector3::new(a1.cos(), 0.0, a1.sin()),
        );

        mesh.add_quad([
            Vertex::from_parts(b0, n0),
            Vertex::from_parts(t0, n0),
            Vertex::from_parts(t1, n1),
            Vertex::from_parts(b1, n1),
        ]);
        mesh.add_flat_triangle(bottom_center, b0, b1);
        mesh.add_flat_triangle(top_center, t1, t0);
    }

    mesh
}

/// Right circular cone: base disc at y = -height/2, apex at y = +height/2
pub fn cone(radius: f32, height: f32, segments: u32) -> Mesh {
    let half = height / 2.0;
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(n * 6, n * 2);
    let apex = Point3::new(0.0, half, 0.0);
    let base_center = Point3::new(0.0, -half, 0.0);
    let slant = |angle: f32| {
        Vector3::new(height * angle.cos(), radius, height * angle.sin())
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::y)
    };

    for i in 0..segments {
        let (a0, a1) = (segment_angle(i, segments), segment_angle(i + 1, segments));
        let (b0, b1) = (ring_point(radius, a0, -half), ring_point(radius, a1, -half));

        let first = mesh.push_vertex(Vertex::from_parts(b0, slant(a0)));
        let tip = mesh.push_vertex(Vertex::from_parts(apex, slant((a0 + a1) / 2.0)));
        let second = mesh.push_vertex(Vertex::from_parts(b1, slant(a1)));
        mesh.push_face(first, tip, second);

        mesh.add_flat_triangle(base_center, b0, b1);
    }

    mesh
}

/// Volume enclosed by a closed mesh (divergence theorem), for checking
/// tessellations against the closed-form volumes.
#[cfg(test)]
pub(crate) fn enclosed_volume(mesh: &Mesh) -> f64 {
    mesh.triangles()
        .map(|t| {
            let [a, b, c] = t.vertices.map(|v| v.position.coords.cast::<f64>());
            a.dot(&b.cross(&c)) / 6.0
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_centered(mesh: &Mesh, half_height: f32) {
        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.min.y, -half_height, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.y, half_height, epsilon = 1e-5);
    }

    #[test]
    fn test_trapezoid_encloses_analytic_volume() {
        let mesh = trapezoid(2.0, 3.0, 5.0, 4.0);
        assert_eq!(mesh.triangle_count(), 12);
        assert_relative_eq!(enclosed_volume(&mesh), 4.0 * 2.0 * 4.0, epsilon = 1e-4);
        assert_centered(&mesh, 1.0);
    }

    #[test]
    fn test_trapezoid_profile_extents() {
        let bounds = trapezoid(2.0, 3.0, 5.0, 4.0).bounds().unwrap();
        // The wider side sets the X extent, the length sets Z
        assert_relative_eq!(bounds.max.x, 2.5);
        assert_relative_eq!(bounds.min.z, -2.0);
        assert_relative_eq!(bounds.max.z, 2.0);
    }

    #[test]
    fn test_cuboid_encloses_analytic_volume() {
        let mesh = cuboid(2.0, 3.0, 4.0);
        assert_relative_eq!(enclosed_volume(&mesh), 24.0, epsilon = 1e-4);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.extents(), Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(bounds.center(), Point3::origin());
    }

    #[test]
    fn test_cylinder_tessellation() {
        let mesh = cylinder(1.5, 4.0, RADIAL_SEGMENTS);
        assert_eq!(mesh.triangle_count(), RADIAL_SEGMENTS as usize * 4);
        assert_centered(&mesh, 2.0);

        // Inscribed polygon: slightly below the ideal solid
        let ideal = std::f64::consts::PI * 1.5 * 1.5 * 4.0;
        let volume = enclosed_volume(&mesh);
        assert!(volume < ideal);
        assert!(volume > ideal * 0.99);
    }

    #[test]
    fn test_cone_tessellation() {
        let mesh = cone(2.0, 3.0, RADIAL_SEGMENTS);
        assert_eq!(mesh.triangle_count(), RADIAL_SEGMENTS as usize * 2);
        assert_centered(&mesh, 1.5);

        let ideal = std::f64::consts::PI * 4.0 * 3.0 / 3.0;
        let volume = enclosed_volume(&mesh);
        assert!(volume < ideal);
        assert!(volume > ideal * 0.99);
    }

    #[test]
    fn test_cone_apex_on_axis() {
        let mesh = cone(1.0, 2.0, 8);
        let top = mesh
            .vertices()
            .iter()
            .filter(|v| (v.position.y - 1.0).abs() < 1e-6)
            .count();
        assert_eq!(top, 8);
        assert!(mesh
            .vertices()
            .iter()
            .filter(|v| v.position.y > 0.0)
            .all(|v| v.position.x.abs() < 1e-6 && v.position.z.abs() < 1e-6));
    }
}
