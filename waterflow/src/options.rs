use crate::FlowDirection;

/// Configuration for [`crate::WaterFlow`].
///
/// Values are taken as given and clamped by [`WaterFlowOptions::sanitized`] when the engine
/// applies them, so adapters can forward raw user input.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterFlowOptions {
    /// Number of tracks on the cross axis.
    pub cross_count: usize,
    /// Line extent along the main axis. `None` derives square cells from the cross cell length.
    pub main_length: Option<f64>,
    pub main_gap: f64,
    pub cross_gap: f64,
    /// Lines kept resident on each side of the visible window.
    pub cache_count: usize,
    /// Total item count, when the data source knows it. Enables scrollbar estimation and stops
    /// ranking at the end of the data.
    pub total_count: Option<usize>,
    /// Right-to-left: mirrors the cross axis of vertical flows and the horizontal focus keys.
    pub rtl: bool,
    pub direction: FlowDirection,
    /// Minimum time left before the frame deadline for the predict pass to do any work.
    pub predict_margin_ns: u64,
}

impl Default for WaterFlowOptions {
    fn default() -> Self {
        Self {
            cross_count: 1,
            main_length: None,
            main_gap: 0.0,
            cross_gap: 0.0,
            cache_count: 10,
            total_count: None,
            rtl: false,
            direction: FlowDirection::Column,
            predict_margin_ns: 3_000_000,
        }
    }
}

impl WaterFlowOptions {
    pub fn new(cross_count: usize) -> Self {
        Self {
            cross_count,
            ..Self::default()
        }
    }

    pub fn with_cross_count(mut self, cross_count: usize) -> Self {
        self.cross_count = cross_count;
        self
    }

    pub fn with_main_length(mut self, main_length: Option<f64>) -> Self {
        self.main_length = main_length;
        self
    }

    pub fn with_gaps(mut self, main_gap: f64, cross_gap: f64) -> Self {
        self.main_gap = main_gap;
        self.cross_gap = cross_gap;
        self
    }

    pub fn with_cache_count(mut self, cache_count: usize) -> Self {
        self.cache_count = cache_count;
        self
    }

    pub fn with_total_count(mut self, total_count: Option<usize>) -> Self {
        self.total_count = total_count;
        self
    }

    pub fn with_rtl(mut self, rtl: bool) -> Self {
        self.rtl = rtl;
        self
    }

    pub fn with_direction(mut self, direction: FlowDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_predict_margin_ns(mut self, predict_margin_ns: u64) -> Self {
        self.predict_margin_ns = predict_margin_ns;
        self
    }

    /// Returns a copy with every value inside its valid range.
    ///
    /// - `cross_count` is at least 1
    /// - negative or non-finite gaps become 0
    /// - a non-positive or non-finite `main_length` falls back to derived square cells
    pub fn sanitized(&self) -> Self {
        let clean_gap = |g: f64| if g.is_finite() && g > 0.0 { g } else { 0.0 };
        Self {
            cross_count: self.cross_count.max(1),
            main_length: self.main_length.filter(|l| l.is_finite() && *l > 0.0),
            main_gap: clean_gap(self.main_gap),
            cross_gap: clean_gap(self.cross_gap),
            ..self.clone()
        }
    }

    /// Cross extent of a single track for a viewport `cross_size` wide.
    pub fn cross_cell_length(&self, cross_size: f64) -> f64 {
        let n = self.cross_count.max(1) as f64;
        let len = (cross_size - (n - 1.0) * self.cross_gap) / n;
        if len > 0.0 { len } else { 0.0 }
    }
}
