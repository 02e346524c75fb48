//! Resource shells the queue batches against: identity, release
//! notification, and the draw-state descriptions built on both.

mod events;
mod id;
mod material;
mod mesh;
mod texture;

pub use id::{BufferId, MaterialId, ProgramId, ShaderId, TextureId};
pub use material::{Material, MaterialFlags, ShaderFlags};
pub use mesh::{IndexBuffer, MeshData, Topology, VertexBuffer};
pub use texture::Texture;

pub(crate) use events::{Invalidation, InvalidationSink, ReleaseSlot};
