use core::fmt;

use waterflow::{HasSpan, WaterFlow};

/// A scroll anchor that preserves the visual position of an item across data changes.
///
/// Typical use cases:
/// - feeds that load newer items above the viewport without content jumping
/// - replacing the data source while keeping the viewport on the same item
#[derive(Clone, PartialEq)]
pub struct FlowAnchor<K> {
    pub key: K,
    /// How far the anchor item's line starts above the viewport start.
    pub offset_in_viewport: f64,
}

impl<K: fmt::Debug> fmt::Debug for FlowAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowAnchor")
            .field("key", &self.key)
            .field("offset_in_viewport", &self.offset_in_viewport)
            .finish()
    }
}

/// Captures an anchor for the first item of the line at the viewport start.
///
/// Returns `None` before the first layout or when nothing is placed there.
pub fn capture_first_visible_anchor<T: HasSpan, K>(
    flow: &WaterFlow<T>,
    key_for: impl FnOnce(usize) -> K,
) -> Option<FlowAnchor<K>> {
    let state = flow.viewport_state();
    let index = flow.matrix().first_item_in_line(state.start_index)?;
    Some(FlowAnchor {
        key: key_for(index),
        offset_in_viewport: state.first_item_offset,
    })
}

/// Applies a previously captured anchor. Takes effect at the next layout.
///
/// The adapter must provide a `key_to_index` mapping for the *current* dataset.
///
/// Returns `true` when the anchor's item still exists.
pub fn apply_anchor<T: HasSpan, K>(
    flow: &mut WaterFlow<T>,
    anchor: &FlowAnchor<K>,
    mut key_to_index: impl FnMut(&K) -> Option<usize>,
) -> bool {
    let Some(index) = key_to_index(&anchor.key) else {
        return false;
    };
    flow.jump_to_item(index, anchor.offset_in_viewport);
    true
}
