use crate::ScrollMetrics;

/// Estimates the scrollable extent of a flow whose lines are only partly known.
#[derive(Clone, Debug, Default)]
pub struct ScrollMetricsEstimator {
    metrics: ScrollMetrics,
    total_dirty: bool,
}

impl ScrollMetricsEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    /// The total item count became known or changed. The next update re-extrapolates.
    pub fn mark_total_dirty(&mut self) {
        self.total_dirty = true;
    }

    pub fn reset(&mut self) {
        self.metrics = ScrollMetrics::default();
    }

    /// Refreshes the metrics after a layout pass.
    ///
    /// `line_count` is the number of ranked lines, `main_count` the number of lines known to
    /// the viewport.
    pub fn update(
        &mut self,
        line_count: usize,
        main_count: usize,
        line_len: f64,
        main_gap: f64,
        reach_tail: bool,
    ) {
        if self.total_dirty && line_count > 0 {
            let last_row = line_count as f64;
            let total_rows = ((main_count + 1) as f64).max(last_row);
            let total_len = total_rows * line_len + (total_rows - 1.0) * main_gap;
            self.metrics.main_scroll_extent = last_row * total_len / total_rows;
            self.metrics.estimate_height = self.metrics.main_scroll_extent;
            self.total_dirty = false;
            vdebug!(
                extent = self.metrics.main_scroll_extent,
                "extrapolated scroll extent"
            );
        }

        let lines = main_count as f64;
        self.metrics.scroll_bar_extent = if main_count == 0 {
            0.0
        } else {
            lines * line_len + (lines - 1.0) * main_gap
        };
        self.refresh_estimate(reach_tail);
    }

    /// Exact extent once the tail was reached; otherwise the larger of the estimate and the
    /// known extent.
    pub fn estimated_total_extent(&self) -> f64 {
        self.metrics.estimate_height
    }

    fn refresh_estimate(&mut self, reach_tail: bool) {
        self.metrics.estimate_height = if reach_tail {
            self.metrics.scroll_bar_extent
        } else {
            self.metrics
                .estimate_height
                .max(self.metrics.scroll_bar_extent)
        };
    }

    pub fn is_scrollable(&self, main_size: f64) -> bool {
        self.metrics.estimate_height > main_size
    }
}
