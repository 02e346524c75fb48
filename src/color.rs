use bytemuck::{Pod, Zeroable};

/// 8-bit RGBA color, laid out for direct vertex/instance buffer upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// White with the given opacity, rounded to the nearest 8-bit step.
    pub fn from_alpha(alpha: f32) -> Self {
        Self::rgba(255, 255, 255, (alpha * 255.0).round() as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
