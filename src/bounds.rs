use glam::Vec3;

/// Axis-aligned box in the owner's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        0.5 * (self.min + self.max)
    }

    pub fn half_extents(&self) -> Vec3 {
        0.5 * (self.max - self.min)
    }

    /// Squared radius of the tightest sphere containing the box.
    pub fn squared_radius(&self) -> f32 {
        self.half_extents().length_squared()
    }
}

/// Sphere stored with its squared radius; the square root is deferred until
/// a sort actually needs the geometric radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius_sq: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius_sq: f32) -> Self {
        Self { center, radius_sq }
    }

    pub fn from_aabb(aabb: &Aabb) -> Self {
        Self::new(aabb.center(), aabb.squared_radius())
    }

    pub fn translated(self, offset: Vec3) -> Self {
        Self::new(self.center + offset, self.radius_sq)
    }

    pub fn radius(&self) -> f32 {
        self.radius_sq.sqrt()
    }

    /// The sphere point reaching furthest against `direction`, i.e. the
    /// closest point to a viewer looking along `direction`.
    pub fn negative_vertex(&self, direction: Vec3) -> Vec3 {
        self.center - direction * self.radius()
    }
}

/// Plane in normal/offset form: `normal . p + d == 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, -normal.dot(point))
    }

    /// Positive on the side the normal points into.
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn aabb_center_and_radius() {
        let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert!(aabb.center().abs_diff_eq(Vec3::ZERO, EPS));
        assert!((aabb.squared_radius() - 14.0).abs() < EPS);
    }

    #[test]
    fn negative_vertex_faces_the_viewer() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 0.0, -10.0), 4.0);
        let toward_scene = Vec3::NEG_Z;
        let nearest = sphere.negative_vertex(toward_scene);
        assert!(nearest.abs_diff_eq(Vec3::new(0.0, 0.0, -8.0), EPS));
    }

    #[test]
    fn plane_distance_signs() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_Z);
        assert!(plane.signed_distance(Vec3::new(0.0, 0.0, -5.0)) > 0.0);
        assert!(plane.signed_distance(Vec3::ZERO) < 0.0);
        assert!(plane.signed_distance(Vec3::new(3.0, 4.0, -1.0)).abs() < EPS);
    }
}
