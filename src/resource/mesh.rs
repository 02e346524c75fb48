use super::events::{Invalidation, InvalidationSink, ReleaseSignal, ReleaseSlot};
use super::BufferId;

/// Primitive assembly mode of a vertex range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

/// GPU vertex buffer shell. Dropping it notifies every queue still holding
/// mesh entries keyed on it.
pub struct VertexBuffer {
    id: BufferId,
    release: ReleaseSignal,
    label: Option<String>,
}

impl VertexBuffer {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            id: BufferId::new(),
            release: ReleaseSignal::new(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn connect_release(&self, sink: &InvalidationSink) -> ReleaseSlot {
        self.release.connect(sink, Invalidation::VertexBuffer(self.id))
    }
}

impl Drop for VertexBuffer {
    fn drop(&mut self) {
        self.release.notify();
    }
}

/// GPU index buffer shell, optional on a mesh.
pub struct IndexBuffer {
    id: BufferId,
    release: ReleaseSignal,
    label: Option<String>,
}

impl IndexBuffer {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            id: BufferId::new(),
            release: ReleaseSignal::new(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn connect_release(&self, sink: &InvalidationSink) -> ReleaseSlot {
        self.release.connect(sink, Invalidation::IndexBuffer(self.id))
    }
}

impl Drop for IndexBuffer {
    fn drop(&mut self) {
        self.release.notify();
    }
}

/// Geometry range submitted for drawing: a vertex buffer, an optional index
/// buffer, and how primitives assemble from it.
#[derive(Clone, Copy)]
pub struct MeshData<'a> {
    pub vertex_buffer: &'a VertexBuffer,
    pub index_buffer: Option<&'a IndexBuffer>,
    pub topology: Topology,
}

impl<'a> MeshData<'a> {
    pub fn indexed(vertex_buffer: &'a VertexBuffer, index_buffer: &'a IndexBuffer) -> Self {
        Self {
            vertex_buffer,
            index_buffer: Some(index_buffer),
            topology: Topology::default(),
        }
    }

    pub fn unindexed(vertex_buffer: &'a VertexBuffer) -> Self {
        Self {
            vertex_buffer,
            index_buffer: None,
            topology: Topology::default(),
        }
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }
}
