use glam::Vec3;

/// Sun-style light affecting the whole frame.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    /// Cone angles in radians; falloff runs between them.
    pub inner_angle: f32,
    pub outer_angle: f32,
}

/// Lights submitted for the current frame, drained on every queue clear.
#[derive(Clone, Default)]
pub struct FrameLights {
    directional: Vec<DirectionalLight>,
    point: Vec<PointLight>,
    spot: Vec<SpotLight>,
}

impl FrameLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directional(&mut self, light: DirectionalLight) {
        self.directional.push(light);
    }

    pub fn add_point(&mut self, light: PointLight) {
        self.point.push(light);
    }

    pub fn add_spot(&mut self, light: SpotLight) {
        self.spot.push(light);
    }

    pub fn directional_lights(&self) -> &[DirectionalLight] {
        &self.directional
    }

    pub fn point_lights(&self) -> &[PointLight] {
        &self.point
    }

    pub fn spot_lights(&self) -> &[SpotLight] {
        &self.spot
    }

    pub fn clear(&mut self) {
        self.directional.clear();
        self.point.clear();
        self.spot.clear();
    }
}
