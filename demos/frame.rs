//! Submits one mixed frame and walks the resulting draw order.
//!
//! Run with `RUST_LOG=debug` to watch layer creation and retirement.

use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use log::info;

use render_queue::{
    Aabb, BillboardColor, BillboardSize, Camera, Color, DirectionalLight, Drawable, IndexBuffer,
    Material, MeshData, ProgramId, QueueSettings, RenderQueue, Sprite, VertexBuffer,
};

struct DebugOverlay;

impl Drawable for DebugOverlay {
    fn draw(&self) {
        info!("      drawable: debug overlay");
    }
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut queue = RenderQueue::with_settings(QueueSettings {
        instancing_threshold: 8,
        ..QueueSettings::default()
    });

    // Shared geometry and draw state.
    let cube_vertices = VertexBuffer::new().with_label("cube.vb");
    let cube_indices = IndexBuffer::new().with_label("cube.ib");
    let cube = MeshData::indexed(&cube_vertices, &cube_indices);
    let cube_bounds = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));

    let stone = Material::new(ProgramId::new()).with_label("stone");
    let glass = Material::new(ProgramId::new())
        .with_label("glass")
        .with_alpha_blending();
    let smoke = Material::new(ProgramId::new())
        .with_label("smoke")
        .with_billboard_depth_sort();
    let ui_material = Rc::new(Material::new(ProgramId::new()).with_label("ui"));

    // A 4x4 grid of cubes crosses the instancing threshold.
    for x in 0..4 {
        for z in 0..4 {
            queue.add_mesh(
                0,
                &stone,
                cube,
                cube_bounds,
                Mat4::from_translation(Vec3::new(x as f32 * 2.0, 0.0, -2.0 * z as f32 - 4.0)),
            );
        }
    }

    // A few glass panes at mixed depths.
    for z in [-3.0, -12.0, -7.5] {
        queue.add_mesh(
            0,
            &glass,
            cube,
            cube_bounds,
            Mat4::from_translation(Vec3::new(3.0, 1.0, z)),
        );
    }

    // Smoke puffs, depth sorted per batch, fading with distance.
    let centers = [
        Vec3::new(1.0, 2.0, -6.0),
        Vec3::new(1.5, 2.5, -14.0),
        Vec3::new(0.5, 2.0, -9.0),
    ];
    queue.add_billboards(
        0,
        &smoke,
        &centers,
        BillboardSize::Uniform(&[3.0, 3.0, 3.0]),
        None,
        Some(BillboardColor::Alphas(&[0.9, 0.3, 0.6])),
    );

    // A HUD sprite on its own layer, above the 3D content.
    let mut hud = Sprite::new(Rc::clone(&ui_material));
    hud.set_size(Vec2::new(200.0, 50.0));
    hud.set_color(Color::rgba(255, 255, 255, 200));
    hud.add_to_queue(&mut queue, 10);
    queue.add_drawable(10, Rc::new(DebugOverlay));

    queue.add_directional_light(DirectionalLight::default());

    let camera = Camera {
        eye: Vec3::new(0.0, 3.0, 6.0),
        target: Vec3::new(2.0, 0.0, -8.0),
        ..Camera::default()
    };
    queue.sort(&camera);

    // What a render technique would consume.
    for (key, layer) in queue.layers() {
        info!("layer {}", key);
        for (material, batch) in layer.opaque_batches() {
            for (mesh, entry) in batch.meshes() {
                info!(
                    "   opaque material {} / buffer {}: {} instance(s), instancing {}",
                    material.material(),
                    mesh.vertex_buffer(),
                    entry.instances().len(),
                    batch.instancing_enabled(),
                );
            }
        }
        for draw in layer.transparent_draws() {
            info!(
                "   transparent material {} at z {:.1}",
                draw.material.material(),
                draw.transform.w_axis.z,
            );
        }
        for (material, batch) in layer.billboard_batches() {
            info!(
                "   billboards material {}: {} entries, depth sorted {}",
                material.material(),
                batch.billboards().len(),
                batch.is_depth_sorted(),
            );
        }
        for (texture, bucket) in layer.sprite_batches().flat_map(|(_, batch)| batch.overlays()) {
            info!(
                "   sprites overlay {:?}: {} sprite(s)",
                texture,
                bucket.sprite_count(),
            );
        }
        for drawable in layer.drawables() {
            drawable.draw();
        }
    }

    // Releasing draw state scrubs its batches before the next frame.
    drop(stone);
    queue.clear(false);
    info!("{} layer(s) alive after clear", queue.layer_count());
}
