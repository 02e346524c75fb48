use std::collections::BTreeMap;

use bitflags::bitflags;

use super::events::{Invalidation, InvalidationSink, ReleaseSignal, ReleaseSlot};
use super::{MaterialId, ProgramId, ShaderId, TextureId};

bitflags! {
    /// Permutation of a material's uber-shader requested by a draw path.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct ShaderFlags: u32 {
        const BILLBOARD       = 1 << 0;
        const INSTANCING      = 1 << 1;
        const TEXTURE_OVERLAY = 1 << 2;
        const VERTEX_COLOR    = 1 << 3;
    }
}

bitflags! {
    /// Rendering behavior toggles carried by a material.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MaterialFlags: u32 {
        /// Geometry drawn with this material blends with what is behind it
        /// and must be ordered back to front instead of batched.
        const ALPHA_BLEND = 1 << 0;
        /// Billboards drawn with this material are depth sorted per batch.
        const BILLBOARD_DEPTH_SORT = 1 << 1;
    }
}

/// Draw-state description submissions are grouped by.
///
/// A material resolves shader permutations to compiled instances: variants
/// registered through [`Material::with_shader_instance`] win, anything else
/// falls back to the material's base instance. Dropping a material notifies
/// every queue still holding batches keyed on it.
pub struct Material {
    id: MaterialId,
    program: ProgramId,
    base_instance: ShaderId,
    variants: BTreeMap<ShaderFlags, ShaderId>,
    diffuse: Option<TextureId>,
    flags: MaterialFlags,
    release: ReleaseSignal,
    label: Option<String>,
}

impl Material {
    pub fn new(program: ProgramId) -> Self {
        Self {
            id: MaterialId::new(),
            program,
            base_instance: ShaderId::new(),
            variants: BTreeMap::new(),
            diffuse: None,
            flags: MaterialFlags::empty(),
            release: ReleaseSignal::new(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_diffuse_map(mut self, texture: TextureId) -> Self {
        self.diffuse = Some(texture);
        self
    }

    /// Registers the compiled instance serving one shader permutation.
    pub fn with_shader_instance(mut self, flags: ShaderFlags, shader: ShaderId) -> Self {
        self.variants.insert(flags, shader);
        self
    }

    pub fn with_alpha_blending(mut self) -> Self {
        self.flags |= MaterialFlags::ALPHA_BLEND;
        self
    }

    pub fn with_billboard_depth_sort(mut self) -> Self {
        self.flags |= MaterialFlags::BILLBOARD_DEPTH_SORT;
        self
    }

    pub fn id(&self) -> MaterialId {
        self.id
    }

    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn shader_instance(&self, flags: ShaderFlags) -> ShaderId {
        self.variants.get(&flags).copied().unwrap_or(self.base_instance)
    }

    pub fn diffuse_map(&self) -> Option<TextureId> {
        self.diffuse
    }

    pub fn is_alpha_blending(&self) -> bool {
        self.flags.contains(MaterialFlags::ALPHA_BLEND)
    }

    pub fn is_billboard_depth_sort_enabled(&self) -> bool {
        self.flags.contains(MaterialFlags::BILLBOARD_DEPTH_SORT)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn connect_release(&self, sink: &InvalidationSink) -> ReleaseSlot {
        self.release.connect(sink, Invalidation::Material(self.id))
    }
}

impl Drop for Material {
    fn drop(&mut self) {
        self.release.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_instance_falls_back_to_base() {
        let billboard_shader = ShaderId::new();
        let material = Material::new(ProgramId::new())
            .with_shader_instance(ShaderFlags::BILLBOARD, billboard_shader);

        assert_eq!(material.shader_instance(ShaderFlags::BILLBOARD), billboard_shader);
        let base = material.shader_instance(ShaderFlags::empty());
        assert_eq!(material.shader_instance(ShaderFlags::INSTANCING), base);
        assert_ne!(base, billboard_shader);
    }

    #[test]
    fn builder_flags_accumulate() {
        let material = Material::new(ProgramId::new())
            .with_alpha_blending()
            .with_billboard_depth_sort();
        assert!(material.is_alpha_blending());
        assert!(material.is_billboard_depth_sort_enabled());
    }
}
