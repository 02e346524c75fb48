use glam::Vec3;

use crate::bounds::Plane;

use super::layer::Layer;

/// Orders one layer's depth-dependent content for the given view.
///
/// Opaque and sprite batches are left untouched; their map ordering is the
/// draw order. Sorts are stable, so equal depths keep insertion order.
pub(crate) fn sort_layer(layer: &mut Layer, near_plane: Plane, eye: Vec3, forward: Vec3) {
    sort_transparent(layer, near_plane, forward);
    sort_billboards(layer, eye);
}

/// Reorders the index vector over transparent draws, furthest first. Depth
/// is the near-plane distance of the sphere point closest to the viewer, so
/// a large object poking toward the camera sorts as near as its surface.
fn sort_transparent(layer: &mut Layer, near_plane: Plane, forward: Vec3) {
    let keys: Vec<f32> = layer
        .transparent
        .iter()
        .map(|draw| near_plane.signed_distance(draw.bounds.negative_vertex(forward)))
        .collect();
    layer
        .transparent_order
        .sort_by(|&a, &b| keys[b as usize].total_cmp(&keys[a as usize]));
    layer.transparent_sorted = true;
}

/// Reorders billboards furthest-from-eye first within every batch whose
/// material asked for depth sorting.
fn sort_billboards(layer: &mut Layer, eye: Vec3) {
    for batch in layer.billboards.values_mut() {
        if !batch.depth_sorted {
            continue;
        }
        batch.billboards.sort_by(|a, b| {
            eye.distance_squared(b.center)
                .total_cmp(&eye.distance_squared(a.center))
        });
    }
}
