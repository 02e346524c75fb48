/// Caller-owned draw work replayed by the consumer after a layer's batched
/// content.
pub trait Drawable {
    fn draw(&self);
}
