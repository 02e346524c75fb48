use crate::resource::{
    BufferId, Material, MaterialId, MeshData, ProgramId, ShaderFlags, ShaderId, TextureId,
    Topology,
};

/// Grouping key for material-batched submissions.
///
/// Derived ordering doubles as the draw-state tie-break chain: program,
/// then compiled shader instance, then diffuse texture (absent first),
/// then the material itself. Adjacent map entries therefore share as much
/// bind state as possible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MaterialKey {
    program: ProgramId,
    shader: ShaderId,
    diffuse: Option<TextureId>,
    material: MaterialId,
}

impl MaterialKey {
    /// Key for mesh and sprite submissions, drawn with the base permutation.
    pub(crate) fn standard(material: &Material) -> Self {
        Self::with_variant(material, ShaderFlags::empty())
    }

    /// Key for billboard submissions, which request the billboard
    /// permutation of the same material.
    pub(crate) fn billboard(material: &Material) -> Self {
        Self::with_variant(material, ShaderFlags::BILLBOARD | ShaderFlags::VERTEX_COLOR)
    }

    fn with_variant(material: &Material, flags: ShaderFlags) -> Self {
        Self {
            program: material.program(),
            shader: material.shader_instance(flags),
            diffuse: material.diffuse_map(),
            material: material.id(),
        }
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    pub fn diffuse(&self) -> Option<TextureId> {
        self.diffuse
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

/// Grouping key for mesh entries inside a material batch: index buffer
/// (unindexed first), then vertex buffer, then topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct MeshKey {
    index_buffer: Option<BufferId>,
    vertex_buffer: BufferId,
    topology: Topology,
}

impl MeshKey {
    pub(crate) fn of(mesh: &MeshData<'_>) -> Self {
        Self {
            index_buffer: mesh.index_buffer.map(|buffer| buffer.id()),
            vertex_buffer: mesh.vertex_buffer.id(),
            topology: mesh.topology,
        }
    }

    pub fn index_buffer(&self) -> Option<BufferId> {
        self.index_buffer
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }
}
