use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::color::Color;

/// Rotation used when no source is given: sin(0) = 0, cos(0) = 1.
pub(crate) const NO_ROTATION: Vec2 = Vec2::new(0.0, 1.0);

/// Per-billboard payload, laid out for direct instance-buffer upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct BillboardData {
    pub color: Color,
    pub center: Vec3,
    /// Rotation around the view axis as (sin, cos).
    pub sin_cos: Vec2,
    pub size: Vec2,
}

/// Extents source for a batched billboard submission.
#[derive(Clone, Copy, Debug)]
pub enum BillboardSize<'a> {
    /// Per-billboard width/height pairs.
    Extents(&'a [Vec2]),
    /// Per-billboard side length, expanded to a square.
    Uniform(&'a [f32]),
}

impl BillboardSize<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Extents(sizes) => sizes.len(),
            Self::Uniform(sizes) => sizes.len(),
        }
    }

    pub(crate) fn at(&self, index: usize) -> Vec2 {
        match self {
            Self::Extents(sizes) => sizes[index],
            Self::Uniform(sizes) => Vec2::splat(sizes[index]),
        }
    }

    pub(crate) fn assert_covers(&self, count: usize) {
        assert!(
            self.len() >= count,
            "billboard size source covers {} entries, {} submitted",
            self.len(),
            count
        );
    }
}

/// Rotation source for a batched billboard submission.
#[derive(Clone, Copy, Debug)]
pub enum BillboardRotation<'a> {
    /// Precomputed (sin, cos) pairs.
    SinCos(&'a [Vec2]),
    /// Angles in degrees, converted on submission.
    Angles(&'a [f32]),
}

impl BillboardRotation<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::SinCos(rotations) => rotations.len(),
            Self::Angles(rotations) => rotations.len(),
        }
    }

    pub(crate) fn at(&self, index: usize) -> Vec2 {
        match self {
            Self::SinCos(rotations) => rotations[index],
            Self::Angles(rotations) => {
                let (sin, cos) = rotations[index].to_radians().sin_cos();
                Vec2::new(sin, cos)
            }
        }
    }

    pub(crate) fn assert_covers(&self, count: usize) {
        assert!(
            self.len() >= count,
            "billboard rotation source covers {} entries, {} submitted",
            self.len(),
            count
        );
    }
}

/// Color source for a batched billboard submission.
#[derive(Clone, Copy, Debug)]
pub enum BillboardColor<'a> {
    Colors(&'a [Color]),
    /// Opacity only, folded into white.
    Alphas(&'a [f32]),
}

impl BillboardColor<'_> {
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Colors(colors) => colors.len(),
            Self::Alphas(alphas) => alphas.len(),
        }
    }

    pub(crate) fn at(&self, index: usize) -> Color {
        match self {
            Self::Colors(colors) => colors[index],
            Self::Alphas(alphas) => Color::from_alpha(alphas[index]),
        }
    }

    pub(crate) fn assert_covers(&self, count: usize) {
        assert!(
            self.len() >= count,
            "billboard color source covers {} entries, {} submitted",
            self.len(),
            count
        );
    }
}
