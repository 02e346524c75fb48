//! Frame submission batching and ordering for a forward renderer.
//!
//! Scene traversal pushes meshes, sprites, billboards, and custom drawables
//! into a [`RenderQueue`]. The queue groups them into GPU-friendly batches
//! keyed by shared draw state, orders alpha-blended geometry back to front
//! for a given [`Viewer`], and hands everything back as read-only layer
//! iteration. Batch maps persist across frames, so a steady scene pays the
//! grouping cost once; released resources scrub their buckets automatically.

pub mod billboard;
pub mod bounds;
pub mod color;
pub mod drawable;
pub mod lights;
pub mod queue;
pub mod resource;
pub mod settings;
pub mod sprite;
pub mod viewer;

pub use billboard::{BillboardColor, BillboardData, BillboardRotation, BillboardSize};
pub use bounds::{Aabb, BoundingSphere, Plane};
pub use color::Color;
pub use drawable::Drawable;
pub use lights::{DirectionalLight, FrameLights, PointLight, SpotLight};
pub use queue::{
    BillboardBatch, Layer, MaterialKey, MeshBatch, MeshKey, ModelBatch, OverlayBatch, RenderQueue,
    SpriteBatch, TransparentDraw,
};
pub use resource::{
    BufferId, IndexBuffer, Material, MaterialFlags, MaterialId, MeshData, ProgramId, ShaderFlags,
    ShaderId, Texture, TextureId, Topology, VertexBuffer,
};
pub use settings::QueueSettings;
pub use sprite::{Sprite, SpriteChain, SpriteVertex};
pub use viewer::{Camera, Viewer};
