use std::collections::BTreeMap;

use log::debug;

use crate::resource::{BufferId, Invalidation, MaterialId, TextureId};

use super::layer::Layer;

/// Removes every bucket keyed on a released resource, across all layers.
pub(crate) fn apply(layers: &mut BTreeMap<i32, Layer>, event: Invalidation) {
    match event {
        Invalidation::Material(id) => on_material_released(layers, id),
        Invalidation::VertexBuffer(id) => on_vertex_buffer_released(layers, id),
        Invalidation::IndexBuffer(id) => on_index_buffer_released(layers, id),
        Invalidation::Texture(id) => on_texture_released(layers, id),
    }
}

fn on_material_released(layers: &mut BTreeMap<i32, Layer>, id: MaterialId) {
    debug!("dropping batches of released material {}", id);
    for layer in layers.values_mut() {
        layer.opaque.retain(|key, _| key.material() != id);
        layer.sprites.retain(|key, _| key.material() != id);
        layer.billboards.retain(|key, _| key.material() != id);
    }
}

fn on_vertex_buffer_released(layers: &mut BTreeMap<i32, Layer>, id: BufferId) {
    debug!("dropping mesh entries of released vertex buffer {}", id);
    for layer in layers.values_mut() {
        for batch in layer.opaque.values_mut() {
            batch.meshes.retain(|key, _| key.vertex_buffer() != id);
        }
    }
}

fn on_index_buffer_released(layers: &mut BTreeMap<i32, Layer>, id: BufferId) {
    debug!("dropping mesh entries of released index buffer {}", id);
    for layer in layers.values_mut() {
        for batch in layer.opaque.values_mut() {
            batch.meshes.retain(|key, _| key.index_buffer() != Some(id));
        }
    }
}

fn on_texture_released(layers: &mut BTreeMap<i32, Layer>, id: TextureId) {
    debug!("dropping overlay buckets of released texture {}", id);
    for layer in layers.values_mut() {
        for batch in layer.sprites.values_mut() {
            batch.overlays.remove(&Some(id));
        }
    }
}
