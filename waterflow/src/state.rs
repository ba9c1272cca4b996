/// A lightweight, serializable snapshot of the window position along the main axis.
///
/// `current_offset` is the scroll distance still waiting to be applied by the next layout pass,
/// positive toward the head. With `feature = "serde"`, this type implements
/// `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub current_offset: f64,
    /// First line at least partially visible.
    pub start_index: usize,
    /// Number of lines known to the viewport.
    pub main_count: usize,
    /// How far the start line is scrolled out of view.
    pub first_item_offset: f64,
    pub reach_head: bool,
    pub reach_tail: bool,
}

/// Scrollbar sizing derived from the lines laid out so far.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    /// Extent of the known lines.
    pub scroll_bar_extent: f64,
    /// Extrapolated extent of the whole data source, computed when the total count changes.
    pub main_scroll_extent: f64,
    /// Current estimate of the total extent. Never shrinks until the tail is reached.
    pub estimate_height: f64,
}
