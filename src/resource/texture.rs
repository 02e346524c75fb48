use super::events::{Invalidation, InvalidationSink, ReleaseSignal, ReleaseSlot};
use super::TextureId;

/// GPU texture shell, used both as material diffuse map and sprite overlay.
pub struct Texture {
    id: TextureId,
    release: ReleaseSignal,
    label: Option<String>,
}

impl Texture {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            id: TextureId::new(),
            release: ReleaseSignal::new(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn connect_release(&self, sink: &InvalidationSink) -> ReleaseSlot {
        self.release.connect(sink, Invalidation::Texture(self.id))
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.release.notify();
    }
}
