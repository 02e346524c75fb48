//! Per-frame submission queue: batching, ordering, and layer lifecycle.

mod invalidation;
mod keys;
mod layer;
mod sort;

pub use keys::{MaterialKey, MeshKey};
pub use layer::{
    BillboardBatch, Layer, MeshBatch, ModelBatch, OverlayBatch, SpriteBatch, TransparentDraw,
};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use log::debug;

use crate::billboard::{
    BillboardColor, BillboardData, BillboardRotation, BillboardSize, NO_ROTATION,
};
use crate::bounds::{Aabb, BoundingSphere};
use crate::color::Color;
use crate::drawable::Drawable;
use crate::lights::{DirectionalLight, FrameLights, PointLight, SpotLight};
use crate::resource::{InvalidationSink, Material, MeshData, Texture};
use crate::settings::QueueSettings;
use crate::sprite::{SpriteChain, SpriteVertex};
use crate::viewer::Viewer;

/// Collects one frame's draw submissions and hands them back as batches.
///
/// Submissions land in layers keyed by a signed render order; layers draw in
/// ascending key order. Within a layer, meshes group by material then
/// geometry, sprites by material then overlay texture, billboards by
/// material. Alpha-blended meshes skip batching and are depth ordered by
/// [`RenderQueue::sort`].
///
/// Resource releases observed between frames are applied lazily: every
/// public operation first drains pending release notifications and removes
/// the buckets keyed on them.
pub struct RenderQueue {
    settings: QueueSettings,
    layers: BTreeMap<i32, Layer>,
    lights: FrameLights,
    pending: InvalidationSink,
}

impl RenderQueue {
    pub fn new() -> Self {
        Self::with_settings(QueueSettings::default())
    }

    pub fn with_settings(settings: QueueSettings) -> Self {
        Self {
            settings: settings.validate(),
            layers: BTreeMap::new(),
            lights: FrameLights::new(),
            pending: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn settings(&self) -> &QueueSettings {
        &self.settings
    }

    /// Submits one mesh instance.
    ///
    /// Opaque meshes accumulate per material and geometry; alpha-blending
    /// materials push an individual draw onto the layer's transparent list
    /// instead, with its bounding sphere moved to world space for depth
    /// sorting.
    pub fn add_mesh(
        &mut self,
        layer: i32,
        material: &Material,
        mesh: MeshData<'_>,
        local_bounds: Aabb,
        transform: Mat4,
    ) {
        self.flush_invalidations();
        let threshold = self.settings.instancing_threshold;
        let sink = Rc::clone(&self.pending);
        let layer = self.layer_mut(layer);

        if material.is_alpha_blending() {
            let translation = transform.w_axis.truncate();
            layer
                .transparent_order
                .push(layer.transparent.len() as u32);
            layer.transparent.push(TransparentDraw {
                material: MaterialKey::standard(material),
                mesh: MeshKey::of(&mesh),
                transform,
                bounds: BoundingSphere::from_aabb(&local_bounds).translated(translation),
            });
            layer.transparent_sorted = false;
            return;
        }

        let batch = layer
            .opaque
            .entry(MaterialKey::standard(material))
            .or_insert_with(|| ModelBatch {
                enabled: false,
                instancing: false,
                meshes: BTreeMap::new(),
                _material_slot: material.connect_release(&sink),
            });
        batch.enabled = true;

        let entry = batch
            .meshes
            .entry(MeshKey::of(&mesh))
            .or_insert_with(|| MeshBatch {
                instances: Vec::new(),
                bounds: BoundingSphere::from_aabb(&local_bounds),
                _vertex_slot: mesh.vertex_buffer.connect_release(&sink),
                _index_slot: mesh.index_buffer.map(|buffer| buffer.connect_release(&sink)),
            });
        entry.instances.push(transform);
        if entry.instances.len() >= threshold {
            batch.instancing = true;
        }
    }

    /// Submits a chain of pre-expanded sprite quads sharing a material and
    /// an optional overlay texture.
    ///
    /// `vertices` must hold at least four vertices per sprite. A zero
    /// `sprite_count` is accepted and ignored.
    pub fn add_sprites(
        &mut self,
        layer: i32,
        material: &Material,
        vertices: Rc<[SpriteVertex]>,
        sprite_count: usize,
        overlay: Option<&Texture>,
    ) {
        self.flush_invalidations();
        if sprite_count == 0 {
            return;
        }
        let chain = SpriteChain::new(vertices, sprite_count);
        let sink = Rc::clone(&self.pending);
        let layer = self.layer_mut(layer);

        let batch = layer
            .sprites
            .entry(MaterialKey::standard(material))
            .or_insert_with(|| SpriteBatch {
                enabled: false,
                overlays: BTreeMap::new(),
                _material_slot: material.connect_release(&sink),
            });
        batch.enabled = true;

        batch
            .overlays
            .entry(overlay.map(Texture::id))
            .or_insert_with(|| OverlayBatch {
                chains: Vec::new(),
                _texture_slot: overlay.map(|texture| texture.connect_release(&sink)),
            })
            .chains
            .push(chain);
    }

    /// Submits one billboard with explicit rotation and color.
    pub fn add_billboard(
        &mut self,
        layer: i32,
        material: &Material,
        center: Vec3,
        size: Vec2,
        sin_cos: Vec2,
        color: Color,
    ) {
        self.flush_invalidations();
        let sink = Rc::clone(&self.pending);
        let layer = self.layer_mut(layer);
        Self::billboard_batch(layer, material, &sink)
            .billboards
            .push(BillboardData {
                color,
                center,
                sin_cos,
                size,
            });
    }

    /// Submits one billboard per entry of `centers`.
    ///
    /// Sizes are mandatory; rotation defaults to none and color to opaque
    /// white. Every provided source must cover `centers`.
    pub fn add_billboards(
        &mut self,
        layer: i32,
        material: &Material,
        centers: &[Vec3],
        sizes: BillboardSize<'_>,
        rotations: Option<BillboardRotation<'_>>,
        colors: Option<BillboardColor<'_>>,
    ) {
        sizes.assert_covers(centers.len());
        if let Some(rotations) = rotations {
            rotations.assert_covers(centers.len());
        }
        if let Some(colors) = colors {
            colors.assert_covers(centers.len());
        }
        self.flush_invalidations();
        if centers.is_empty() {
            return;
        }
        let sink = Rc::clone(&self.pending);
        let layer = self.layer_mut(layer);

        let batch = Self::billboard_batch(layer, material, &sink);
        batch.billboards.reserve(centers.len());
        for (index, &center) in centers.iter().enumerate() {
            batch.billboards.push(BillboardData {
                color: colors.map_or(Color::WHITE, |colors| colors.at(index)),
                center,
                sin_cos: rotations.map_or(NO_ROTATION, |rotations| rotations.at(index)),
                size: sizes.at(index),
            });
        }
    }

    /// Submits caller-owned draw work, replayed in submission order after
    /// the layer's batched content.
    pub fn add_drawable(&mut self, layer: i32, drawable: Rc<dyn Drawable>) {
        self.flush_invalidations();
        self.layer_mut(layer).drawables.push(drawable);
    }

    pub fn add_directional_light(&mut self, light: DirectionalLight) {
        self.lights.add_directional(light);
    }

    pub fn add_point_light(&mut self, light: PointLight) {
        self.lights.add_point(light);
    }

    pub fn add_spot_light(&mut self, light: SpotLight) {
        self.lights.add_spot(light);
    }

    pub fn lights(&self) -> &FrameLights {
        &self.lights
    }

    /// Ends the frame.
    ///
    /// A full clear drops every layer outright. A lightweight clear drains
    /// per-frame contents but keeps the batch maps, and retires layers that
    /// have now gone unpopulated for the configured number of consecutive
    /// clears.
    pub fn clear(&mut self, fully: bool) {
        self.flush_invalidations();
        self.lights.clear();
        if fully {
            self.layers.clear();
            return;
        }
        let limit = self.settings.layer_idle_limit;
        self.layers.retain(|&key, layer| {
            layer.idle_clears += 1;
            if layer.idle_clears >= limit {
                debug!("dropping render layer {} after {} idle clears", key, limit);
                return false;
            }
            layer.drain();
            true
        });
    }

    /// Orders depth-dependent content for `viewer`: transparent draws per
    /// layer, and billboards within batches whose material asks for it.
    /// Must run after the frame's last insertion and before iteration.
    pub fn sort(&mut self, viewer: &dyn Viewer) {
        self.flush_invalidations();
        let near_plane = viewer.frustum_near_plane();
        let eye = viewer.eye_position();
        let forward = viewer.forward();
        for layer in self.layers.values_mut() {
            sort::sort_layer(layer, near_plane, eye, forward);
        }
    }

    /// Iterates layers in ascending render order.
    pub fn layers(&mut self) -> impl Iterator<Item = (i32, &Layer)> + '_ {
        self.flush_invalidations();
        self.layers.iter().map(|(&key, layer)| (key, layer))
    }

    /// Looks up a single layer by render order.
    pub fn layer(&mut self, key: i32) -> Option<&Layer> {
        self.flush_invalidations();
        self.layers.get(&key)
    }

    /// Number of live layers, counting idle ones not yet retired.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_mut(&mut self, key: i32) -> &mut Layer {
        let layer = self.layers.entry(key).or_insert_with(|| {
            debug!("creating render layer {}", key);
            Layer::new()
        });
        layer.idle_clears = 0;
        layer
    }

    fn billboard_batch<'a>(
        layer: &'a mut Layer,
        material: &Material,
        sink: &InvalidationSink,
    ) -> &'a mut BillboardBatch {
        layer
            .billboards
            .entry(MaterialKey::billboard(material))
            .or_insert_with(|| BillboardBatch {
                depth_sorted: material.is_billboard_depth_sort_enabled(),
                billboards: Vec::new(),
                _material_slot: material.connect_release(sink),
            })
    }

    /// Applies release notifications gathered since the last operation.
    fn flush_invalidations(&mut self) {
        let pending = mem::take(&mut *self.pending.borrow_mut());
        for event in pending {
            invalidation::apply(&mut self.layers, event);
        }
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}
