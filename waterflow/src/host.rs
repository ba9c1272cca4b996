use crate::{Axis, Span, SpanError};

/// Implemented by host item handles that carry their own span.
///
/// Spans are reported in flow coordinates: `main_span` counts lines along the scroll axis.
pub trait HasSpan {
    fn main_span(&self) -> usize;
    fn cross_span(&self) -> usize;

    fn span(&self) -> Span {
        Span::new(self.main_span(), self.cross_span())
    }
}

/// The host side of a water flow: creates, releases and describes items by index.
///
/// The engine never holds UI objects of its own. It only keeps the handles returned by
/// `build_child` until it hands them back through `delete_child`.
pub trait FlowHost {
    type Item: HasSpan;

    /// Creates the item at `index`. `None` means the index is out of range or the build failed;
    /// the cell is retried on a later pass.
    fn build_child(&mut self, index: usize) -> Option<Self::Item>;

    /// Releases the item at `index`. Called for resident items only, but hosts should tolerate
    /// stale indices.
    fn delete_child(&mut self, index: usize);

    /// Reports the span of an item that is not resident yet.
    fn child_span(&mut self, index: usize, main_axis: Axis) -> Result<Span, SpanError>;
}
