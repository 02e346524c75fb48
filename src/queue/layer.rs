use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Mat4;

use crate::billboard::BillboardData;
use crate::bounds::BoundingSphere;
use crate::drawable::Drawable;
use crate::resource::{ReleaseSlot, TextureId};
use crate::sprite::SpriteChain;

use super::keys::{MaterialKey, MeshKey};

/// One render-order bucket of a queue.
///
/// Batch maps persist across lightweight clears so a steady scene pays the
/// grouping cost once; only per-frame contents are drained. Buckets whose
/// keyed resource was released are removed when the owning queue applies
/// pending invalidations.
pub struct Layer {
    pub(crate) opaque: BTreeMap<MaterialKey, ModelBatch>,
    pub(crate) transparent: Vec<TransparentDraw>,
    pub(crate) transparent_order: Vec<u32>,
    pub(crate) transparent_sorted: bool,
    pub(crate) sprites: BTreeMap<MaterialKey, SpriteBatch>,
    pub(crate) billboards: BTreeMap<MaterialKey, BillboardBatch>,
    pub(crate) drawables: Vec<Rc<dyn Drawable>>,
    pub(crate) idle_clears: u32,
}

impl Layer {
    pub(crate) fn new() -> Self {
        Self {
            opaque: BTreeMap::new(),
            transparent: Vec::new(),
            transparent_order: Vec::new(),
            transparent_sorted: true,
            sprites: BTreeMap::new(),
            billboards: BTreeMap::new(),
            drawables: Vec::new(),
            idle_clears: 0,
        }
    }

    /// Drains per-frame contents while keeping batch maps and their release
    /// subscriptions alive.
    pub(crate) fn drain(&mut self) {
        self.transparent.clear();
        self.transparent_order.clear();
        self.transparent_sorted = true;
        self.drawables.clear();
        for batch in self.opaque.values_mut() {
            batch.enabled = false;
            for mesh in batch.meshes.values_mut() {
                mesh.instances.clear();
            }
        }
        for batch in self.sprites.values_mut() {
            batch.enabled = false;
            for overlay in batch.overlays.values_mut() {
                overlay.chains.clear();
            }
        }
        for batch in self.billboards.values_mut() {
            batch.billboards.clear();
        }
    }

    /// Opaque material batches touched this frame, in draw-state order.
    pub fn opaque_batches(&self) -> impl Iterator<Item = (&MaterialKey, &ModelBatch)> {
        self.opaque.iter().filter(|(_, batch)| batch.enabled)
    }

    /// Blended draws, furthest first. Only meaningful after the owning
    /// queue sorted the frame's insertions.
    pub fn transparent_draws(&self) -> impl Iterator<Item = &TransparentDraw> {
        debug_assert!(
            self.transparent_sorted,
            "transparent draws iterated before sorting this frame's insertions"
        );
        self.transparent_order
            .iter()
            .map(move |&index| &self.transparent[index as usize])
    }

    /// Sprite material batches touched this frame, in draw-state order.
    pub fn sprite_batches(&self) -> impl Iterator<Item = (&MaterialKey, &SpriteBatch)> {
        self.sprites.iter().filter(|(_, batch)| batch.enabled)
    }

    /// Billboard batches holding at least one billboard this frame.
    pub fn billboard_batches(&self) -> impl Iterator<Item = (&MaterialKey, &BillboardBatch)> {
        self.billboards
            .iter()
            .filter(|(_, batch)| !batch.billboards.is_empty())
    }

    pub fn drawables(&self) -> &[Rc<dyn Drawable>] {
        &self.drawables
    }
}

/// Per-material bucket of opaque mesh submissions.
pub struct ModelBatch {
    pub(crate) enabled: bool,
    pub(crate) instancing: bool,
    pub(crate) meshes: BTreeMap<MeshKey, MeshBatch>,
    pub(crate) _material_slot: ReleaseSlot,
}

impl ModelBatch {
    /// True once any mesh entry accumulated enough instances this bucket's
    /// lifetime to justify instanced submission. Sticky until the bucket is
    /// dropped.
    pub fn instancing_enabled(&self) -> bool {
        self.instancing
    }

    /// Mesh entries populated this frame, in buffer/topology order.
    pub fn meshes(&self) -> impl Iterator<Item = (&MeshKey, &MeshBatch)> {
        self.meshes
            .iter()
            .filter(|(_, mesh)| !mesh.instances.is_empty())
    }
}

/// Per-mesh instance list inside a [`ModelBatch`].
pub struct MeshBatch {
    pub(crate) instances: Vec<Mat4>,
    pub(crate) bounds: BoundingSphere,
    pub(crate) _vertex_slot: ReleaseSlot,
    pub(crate) _index_slot: Option<ReleaseSlot>,
}

impl MeshBatch {
    /// World transforms submitted this frame, in insertion order.
    pub fn instances(&self) -> &[Mat4] {
        &self.instances
    }

    /// Local bounding sphere shared by every instance.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounds
    }
}

/// One blended submission, kept out of batching and ordered by depth.
#[derive(Clone, Copy)]
pub struct TransparentDraw {
    pub material: MaterialKey,
    pub mesh: MeshKey,
    pub transform: Mat4,
    pub bounds: BoundingSphere,
}

/// Per-material bucket of sprite chains, split by overlay texture.
pub struct SpriteBatch {
    pub(crate) enabled: bool,
    pub(crate) overlays: BTreeMap<Option<TextureId>, OverlayBatch>,
    pub(crate) _material_slot: ReleaseSlot,
}

impl SpriteBatch {
    /// Overlay buckets holding at least one chain this frame; the
    /// overlay-less bucket comes first.
    pub fn overlays(&self) -> impl Iterator<Item = (Option<TextureId>, &OverlayBatch)> {
        self.overlays
            .iter()
            .filter(|(_, overlay)| !overlay.chains.is_empty())
            .map(|(&texture, overlay)| (texture, overlay))
    }
}

/// Sprite chains sharing material and overlay texture.
pub struct OverlayBatch {
    pub(crate) chains: Vec<SpriteChain>,
    pub(crate) _texture_slot: Option<ReleaseSlot>,
}

impl OverlayBatch {
    pub fn chains(&self) -> &[SpriteChain] {
        &self.chains
    }

    pub fn sprite_count(&self) -> usize {
        self.chains.iter().map(SpriteChain::sprite_count).sum()
    }
}

/// Per-material billboard list, optionally depth sorted.
pub struct BillboardBatch {
    pub(crate) depth_sorted: bool,
    pub(crate) billboards: Vec<BillboardData>,
    pub(crate) _material_slot: ReleaseSlot,
}

impl BillboardBatch {
    /// Whether this batch is reordered furthest-first on sort.
    pub fn is_depth_sorted(&self) -> bool {
        self.depth_sorted
    }

    pub fn billboards(&self) -> &[BillboardData] {
        &self.billboards
    }
}
