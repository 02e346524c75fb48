use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use render_queue::{
    Aabb, BillboardColor, BillboardRotation, BillboardSize, BufferId, Camera, Color,
    DirectionalLight, Drawable, Material, MaterialId, MeshData, ProgramId, QueueSettings,
    RenderQueue, SpriteVertex, Texture, TextureId, VertexBuffer,
};

const NO_ROTATION: Vec2 = Vec2::new(0.0, 1.0);

fn unit_bounds() -> Aabb {
    Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
}

fn at(x: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, 0.0, 0.0))
}

fn quad() -> Rc<[SpriteVertex]> {
    vec![
        SpriteVertex {
            position: Vec3::ZERO,
            color: Color::WHITE,
            uv: Vec2::ZERO,
        };
        4
    ]
    .into()
}

fn white_billboard(queue: &mut RenderQueue, layer: i32, material: &Material) {
    queue.add_billboard(layer, material, Vec3::ZERO, Vec2::ONE, NO_ROTATION, Color::WHITE);
}

#[test]
fn opaque_meshes_group_by_material_then_geometry() {
    let mut queue = RenderQueue::new();
    let buffer_a = VertexBuffer::new();
    let buffer_b = VertexBuffer::new();
    let material_a = Material::new(ProgramId::new());
    let material_b = Material::new(ProgramId::new());

    queue.add_mesh(0, &material_a, MeshData::unindexed(&buffer_a), unit_bounds(), at(0.0));
    queue.add_mesh(0, &material_b, MeshData::unindexed(&buffer_a), unit_bounds(), at(1.0));
    queue.add_mesh(0, &material_a, MeshData::unindexed(&buffer_b), unit_bounds(), at(2.0));
    queue.add_mesh(0, &material_a, MeshData::unindexed(&buffer_a), unit_bounds(), at(3.0));

    let layer = queue.layer(0).unwrap();
    assert_eq!(layer.opaque_batches().count(), 2);

    let (_, batch) = layer
        .opaque_batches()
        .find(|(key, _)| key.material() == material_a.id())
        .unwrap();
    assert_eq!(batch.meshes().count(), 2);

    let instances: usize = batch.meshes().map(|(_, mesh)| mesh.instances().len()).sum();
    assert_eq!(instances, 3);
}

/// Snapshot of one layer's opaque grouping with per-mesh instances
/// normalized, since instance order within an entry follows submission.
fn opaque_snapshot(queue: &mut RenderQueue) -> Vec<(MaterialId, Vec<(BufferId, Vec<i32>)>)> {
    queue
        .layer(0)
        .unwrap()
        .opaque_batches()
        .map(|(key, batch)| {
            let meshes = batch
                .meshes()
                .map(|(mesh_key, mesh)| {
                    let mut xs: Vec<i32> =
                        mesh.instances().iter().map(|m| m.w_axis.x as i32).collect();
                    xs.sort_unstable();
                    (mesh_key.vertex_buffer(), xs)
                })
                .collect();
            (key.material(), meshes)
        })
        .collect()
}

#[test]
fn submission_order_does_not_change_the_batch_structure() {
    let buffers: Vec<VertexBuffer> = (0..2).map(|_| VertexBuffer::new()).collect();
    let materials: Vec<Material> = (0..3).map(|_| Material::new(ProgramId::new())).collect();

    let mut submissions = Vec::new();
    let mut x = 0;
    for material in 0..materials.len() {
        for buffer in 0..buffers.len() {
            for _ in 0..3 {
                submissions.push((material, buffer, x as f32));
                x += 1;
            }
        }
    }

    let mut ordered = RenderQueue::new();
    for &(material, buffer, x) in &submissions {
        ordered.add_mesh(
            0,
            &materials[material],
            MeshData::unindexed(&buffers[buffer]),
            unit_bounds(),
            at(x),
        );
    }

    let mut rng = SmallRng::seed_from_u64(7);
    let mut shuffled_submissions = submissions.clone();
    shuffled_submissions.shuffle(&mut rng);

    let mut shuffled = RenderQueue::new();
    for &(material, buffer, x) in &shuffled_submissions {
        shuffled.add_mesh(
            0,
            &materials[material],
            MeshData::unindexed(&buffers[buffer]),
            unit_bounds(),
            at(x),
        );
    }

    assert_eq!(opaque_snapshot(&mut ordered), opaque_snapshot(&mut shuffled));
}

fn instancing_flag(queue: &mut RenderQueue) -> bool {
    let layer = queue.layer(0).unwrap();
    let (_, batch) = layer.opaque_batches().next().unwrap();
    batch.instancing_enabled()
}

#[test]
fn instancing_flag_trips_at_the_threshold_and_sticks() {
    let mut queue = RenderQueue::with_settings(QueueSettings {
        instancing_threshold: 4,
        ..QueueSettings::default()
    });
    let buffer = VertexBuffer::new();
    let material = Material::new(ProgramId::new());

    for i in 0..3 {
        queue.add_mesh(0, &material, MeshData::unindexed(&buffer), unit_bounds(), at(i as f32));
    }
    assert!(!instancing_flag(&mut queue));

    queue.add_mesh(0, &material, MeshData::unindexed(&buffer), unit_bounds(), at(3.0));
    assert!(instancing_flag(&mut queue));

    // The flag survives lightweight clears for as long as the bucket lives.
    queue.clear(false);
    queue.add_mesh(0, &material, MeshData::unindexed(&buffer), unit_bounds(), at(0.0));
    assert!(instancing_flag(&mut queue));
}

#[test]
fn alpha_blended_meshes_skip_batching() {
    let mut queue = RenderQueue::new();
    let buffer = VertexBuffer::new();
    let blended = Material::new(ProgramId::new()).with_alpha_blending();

    queue.add_mesh(0, &blended, MeshData::unindexed(&buffer), unit_bounds(), at(0.0));
    queue.add_mesh(0, &blended, MeshData::unindexed(&buffer), unit_bounds(), at(1.0));

    queue.sort(&Camera::default());
    let layer = queue.layer(0).unwrap();
    assert_eq!(layer.opaque_batches().count(), 0);
    assert_eq!(layer.transparent_draws().count(), 2);
}

#[test]
fn sprites_group_by_material_then_overlay() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());
    let overlay = Texture::new();

    queue.add_sprites(0, &material, quad(), 1, Some(&overlay));
    queue.add_sprites(0, &material, quad(), 1, None);
    queue.add_sprites(0, &material, quad(), 1, Some(&overlay));

    let layer = queue.layer(0).unwrap();
    assert_eq!(layer.sprite_batches().count(), 1);

    let (_, batch) = layer.sprite_batches().next().unwrap();
    let overlays: Vec<(Option<TextureId>, usize)> = batch
        .overlays()
        .map(|(texture, bucket)| (texture, bucket.sprite_count()))
        .collect();

    // The overlay-less bucket iterates first.
    assert_eq!(overlays, vec![(None, 1), (Some(overlay.id()), 2)]);
}

#[test]
fn lightweight_clear_drains_but_keeps_the_layer() {
    let mut queue = RenderQueue::new();
    let buffer = VertexBuffer::new();
    let material = Material::new(ProgramId::new());

    queue.add_mesh(0, &material, MeshData::unindexed(&buffer), unit_bounds(), at(0.0));
    queue.add_sprites(0, &material, quad(), 1, None);
    white_billboard(&mut queue, 0, &material);
    queue.clear(false);

    assert_eq!(queue.layer_count(), 1);
    let layer = queue.layer(0).unwrap();
    assert_eq!(layer.opaque_batches().count(), 0);
    assert_eq!(layer.sprite_batches().count(), 0);
    assert_eq!(layer.billboard_batches().count(), 0);
    assert_eq!(layer.transparent_draws().count(), 0);
    assert!(layer.drawables().is_empty());
}

#[test]
fn idle_layers_retire_after_the_configured_limit() {
    let mut queue = RenderQueue::with_settings(QueueSettings {
        layer_idle_limit: 3,
        ..QueueSettings::default()
    });
    let material = Material::new(ProgramId::new());

    white_billboard(&mut queue, 0, &material);
    queue.clear(false);
    queue.clear(false);
    assert_eq!(queue.layer_count(), 1);

    // Repopulating restarts the countdown.
    white_billboard(&mut queue, 0, &material);
    queue.clear(false);
    queue.clear(false);
    assert_eq!(queue.layer_count(), 1);

    queue.clear(false);
    assert_eq!(queue.layer_count(), 0);
}

#[test]
fn idle_layers_retire_after_one_hundred_clears_by_default() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());
    white_billboard(&mut queue, 3, &material);

    for _ in 0..99 {
        queue.clear(false);
    }
    assert_eq!(queue.layer_count(), 1);

    queue.clear(false);
    assert_eq!(queue.layer_count(), 0);
}

#[test]
fn full_clear_drops_every_layer() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());
    white_billboard(&mut queue, -2, &material);
    white_billboard(&mut queue, 9, &material);

    queue.clear(true);
    assert_eq!(queue.layer_count(), 0);

    // The queue stays usable afterwards.
    white_billboard(&mut queue, 0, &material);
    assert_eq!(queue.layer_count(), 1);
}

#[test]
fn billboard_defaults_are_upright_opaque_white() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());

    queue.add_billboards(
        0,
        &material,
        &[Vec3::ZERO, Vec3::ONE],
        BillboardSize::Uniform(&[1.0, 2.0]),
        None,
        None,
    );

    let layer = queue.layer(0).unwrap();
    let (_, batch) = layer.billboard_batches().next().unwrap();
    for billboard in batch.billboards() {
        assert_eq!(billboard.sin_cos, NO_ROTATION);
        assert_eq!(billboard.color, Color::WHITE);
    }
    assert_eq!(batch.billboards()[1].size, Vec2::splat(2.0));
}

#[test]
fn billboard_alphas_fold_into_white() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());
    let centers = [Vec3::ZERO, Vec3::X, Vec3::Y];

    queue.add_billboards(
        0,
        &material,
        &centers,
        BillboardSize::Uniform(&[1.0; 3]),
        None,
        Some(BillboardColor::Alphas(&[0.0, 0.5, 1.0])),
    );

    let layer = queue.layer(0).unwrap();
    let (_, batch) = layer.billboard_batches().next().unwrap();
    let alphas: Vec<u8> = batch.billboards().iter().map(|b| b.color.a).collect();
    assert_eq!(alphas, vec![0, 128, 255]);
    assert!(batch.billboards().iter().all(|b| b.color.r == 255));
}

#[test]
fn billboard_angles_convert_on_submission() {
    let mut queue = RenderQueue::new();
    let material = Material::new(ProgramId::new());

    queue.add_billboards(
        0,
        &material,
        &[Vec3::ZERO],
        BillboardSize::Extents(&[Vec2::new(4.0, 2.0)]),
        Some(BillboardRotation::Angles(&[90.0])),
        None,
    );

    let layer = queue.layer(0).unwrap();
    let (_, batch) = layer.billboard_batches().next().unwrap();
    let billboard = batch.billboards()[0];
    assert!(billboard.sin_cos.abs_diff_eq(Vec2::new(1.0, 0.0), 1e-6));
    assert_eq!(billboard.size, Vec2::new(4.0, 2.0));
}

struct Probe {
    log: Rc<RefCell<Vec<u32>>>,
    tag: u32,
}

impl Drawable for Probe {
    fn draw(&self) {
        self.log.borrow_mut().push(self.tag);
    }
}

#[test]
fn drawables_replay_in_submission_order() {
    let mut queue = RenderQueue::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    for tag in [1, 2, 3] {
        queue.add_drawable(
            0,
            Rc::new(Probe {
                log: Rc::clone(&log),
                tag,
            }),
        );
    }

    for drawable in queue.layer(0).unwrap().drawables() {
        drawable.draw();
    }
    assert_eq!(*log.borrow(), vec![1, 2, 3]);
}

#[test]
fn lights_clear_with_the_frame() {
    let mut queue = RenderQueue::new();
    queue.add_directional_light(DirectionalLight::default());
    assert_eq!(queue.lights().directional_lights().len(), 1);

    queue.clear(false);
    assert!(queue.lights().directional_lights().is_empty());
}
