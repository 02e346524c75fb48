use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use log::error;

use crate::bounds::Aabb;
use crate::color::Color;
use crate::queue::RenderQueue;
use crate::resource::Material;

/// Vertex of an expanded sprite quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: Vec3,
    pub color: Color,
    pub uv: Vec2,
}

/// A contiguous run of expanded quads, four vertices per sprite, shared
/// with the queue without copying.
#[derive(Clone)]
pub struct SpriteChain {
    vertices: Rc<[SpriteVertex]>,
    sprite_count: usize,
}

impl SpriteChain {
    pub fn new(vertices: Rc<[SpriteVertex]>, sprite_count: usize) -> Self {
        assert!(
            vertices.len() >= sprite_count * 4,
            "sprite chain holds {} vertices, needs {} for {} sprites",
            vertices.len(),
            sprite_count * 4,
            sprite_count
        );
        Self {
            vertices,
            sprite_count,
        }
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices[..self.sprite_count * 4]
    }

    pub fn sprite_count(&self) -> usize {
        self.sprite_count
    }
}

/// A textured quad lying in the XY plane, expanded lazily from size, color,
/// texture rectangle, and world transform.
///
/// The local quad spans from the origin rightward along +X and downward
/// along -Y, so a screen-space scene graph can treat sprite positions as
/// top-left corners.
pub struct Sprite {
    material: Option<Rc<Material>>,
    size: Vec2,
    color: Color,
    uv_min: Vec2,
    uv_max: Vec2,
    transform: Mat4,
    vertices: Rc<[SpriteVertex]>,
    bounds: Aabb,
    dirty: bool,
}

impl Sprite {
    pub fn new(material: Rc<Material>) -> Self {
        Self {
            material: Some(material),
            size: Vec2::new(64.0, 64.0),
            color: Color::WHITE,
            uv_min: Vec2::ZERO,
            uv_max: Vec2::ONE,
            transform: Mat4::IDENTITY,
            vertices: Vec::new().into(),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ZERO),
            dirty: true,
        }
    }

    pub fn set_material(&mut self, material: Option<Rc<Material>>) {
        self.material = material;
    }

    pub fn set_size(&mut self, size: Vec2) {
        self.size = size;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty = true;
    }

    /// Sets the sampled texture rectangle, top-left to bottom-right.
    pub fn set_texture_rect(&mut self, uv_min: Vec2, uv_max: Vec2) {
        self.uv_min = uv_min;
        self.uv_max = uv_max;
        self.dirty = true;
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
        self.dirty = true;
    }

    pub fn material(&self) -> Option<&Rc<Material>> {
        self.material.as_ref()
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Rebuilds the expanded quad if any setter ran since the last update.
    pub fn update(&mut self) {
        if !self.dirty {
            return;
        }
        let corners = [
            (Vec3::ZERO, self.uv_min),
            (
                self.size.x * Vec3::X,
                Vec2::new(self.uv_max.x, self.uv_min.y),
            ),
            (
                self.size.y * Vec3::NEG_Y,
                Vec2::new(self.uv_min.x, self.uv_max.y),
            ),
            (
                self.size.x * Vec3::X + self.size.y * Vec3::NEG_Y,
                self.uv_max,
            ),
        ];
        let vertices: Vec<SpriteVertex> = corners
            .iter()
            .map(|&(corner, uv)| SpriteVertex {
                position: self.transform.transform_point3(corner),
                color: self.color,
                uv,
            })
            .collect();
        self.vertices = vertices.into();
        self.bounds = Aabb::new(
            Vec3::new(0.0, -self.size.y, 0.0),
            Vec3::new(self.size.x, 0.0, 0.0),
        );
        self.dirty = false;
    }

    /// Expanded vertices as of the last [`Sprite::update`].
    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    /// Local bounds as of the last [`Sprite::update`].
    pub fn local_bounds(&self) -> Aabb {
        self.bounds
    }

    /// Refreshes the quad and submits it. A sprite with no material cannot
    /// be drawn; the submission is logged and skipped.
    pub fn add_to_queue(&mut self, queue: &mut RenderQueue, layer: i32) {
        let Some(material) = self.material.clone() else {
            error!("sprite submitted without a material, skipping");
            return;
        };
        self.update();
        queue.add_sprites(layer, &material, Rc::clone(&self.vertices), 1, None);
    }
}
