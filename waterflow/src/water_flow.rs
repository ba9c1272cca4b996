use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::focus::FocusNavigator;
use crate::lifecycle::ItemLifecycleManager;
use crate::matrix::PlacementMatrix;
use crate::metrics::ScrollMetricsEstimator;
use crate::packer::PackOutcome;
use crate::predict::{IncrementalLoader, Predict};
use crate::span_cache::SpanCache;
use crate::viewport::ViewportController;
use crate::{
    Axis, FlowChild, FlowHost, HasSpan, ItemRect, KeyDirection, Placement, ScrollEdge,
    ScrollMetrics, Size, ViewportState, WaterFlowOptions,
};

/// Wheel travel per notch, in vp, for each degree of rotation.
const WHEEL_VP_PER_DEGREE: f64 = 40.0 * 3.0 / 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Jump {
    index: usize,
    offset: f64,
}

/// A headless water-flow layout engine.
///
/// The engine is UI-agnostic:
/// - Items are opaque handles created and released through a [`FlowHost`].
/// - Your adapter drives it with viewport sizes, scroll deltas and frame deadlines.
/// - Each [`WaterFlow::layout`] returns the positioned visible items.
///
/// Scroll deltas are positive toward the tail (content moves up in a top-to-bottom flow).
///
/// For tween-driven scrolling and anchors, see the `waterflow-adapter` crate.
#[derive(Debug)]
pub struct WaterFlow<T> {
    options: WaterFlowOptions,
    viewport_size: Size,
    cross_len: f64,

    items: ItemLifecycleManager<T>,
    viewport: ViewportController,
    loader: IncrementalLoader,
    focus: FocusNavigator,
    metrics: ScrollMetricsEstimator,
    children: Vec<FlowChild>,

    needs_rebuild: bool,
    /// First item of the start line, restored by the next rebuild.
    restore_item: usize,
    pending_reset: bool,
    pending_invalidation: Option<Option<usize>>,
    pending_jump: Option<Jump>,
}

impl<T: HasSpan> WaterFlow<T> {
    pub fn new(options: WaterFlowOptions) -> Self {
        let options = options.sanitized();
        vdebug!(
            cross_count = options.cross_count,
            total_count = ?options.total_count,
            "WaterFlow::new"
        );
        let mut metrics = ScrollMetricsEstimator::new();
        if options.total_count.is_some() {
            metrics.mark_total_dirty();
        }
        Self {
            items: ItemLifecycleManager::new(
                options.cross_count,
                options.direction.main_axis(),
                options.total_count,
            ),
            options,
            viewport_size: Size::default(),
            cross_len: 0.0,
            viewport: ViewportController::new(),
            loader: IncrementalLoader::new(),
            focus: FocusNavigator::new(),
            metrics,
            children: Vec::new(),
            needs_rebuild: true,
            restore_item: 0,
            pending_reset: false,
            pending_invalidation: None,
            pending_jump: None,
        }
    }

    pub fn options(&self) -> &WaterFlowOptions {
        &self.options
    }

    /// Applies new options, deciding what has to be rebuilt.
    ///
    /// A new cross count or scroll axis discards all placements at the next layout. Gaps,
    /// line length and mirroring only re-position. A smaller total count drops the items past
    /// the new end.
    pub fn set_options(&mut self, options: WaterFlowOptions) {
        let next = options.sanitized();
        let structural = next.cross_count != self.options.cross_count
            || next.direction.main_axis() != self.options.direction.main_axis();
        let total = next.total_count;
        let total_changed = total != self.options.total_count;
        self.options = WaterFlowOptions {
            total_count: self.options.total_count,
            ..next
        };
        vtrace!(structural, total_changed, "WaterFlow::set_options");

        if structural {
            self.pending_reset = true;
        }
        if total_changed {
            self.set_total_count(total);
        }
        self.viewport.request_recalc();
    }

    /// Clones the current options, applies `f`, then delegates to `set_options`.
    pub fn update_options(&mut self, f: impl FnOnce(&mut WaterFlowOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    /// Updates the known item count. The next layout re-extrapolates the scroll extent.
    pub fn set_total_count(&mut self, total_count: Option<usize>) {
        if self.options.total_count == total_count {
            return;
        }
        vdebug!(from = ?self.options.total_count, to = ?total_count, "set_total_count");
        self.options.total_count = total_count;
        self.items.set_total_count(total_count);
        self.metrics.mark_total_dirty();
        self.viewport.clear_edges();

        if let Some(total) = total_count {
            if self
                .items
                .matrix()
                .last_item()
                .is_some_and(|(last, _)| last >= total)
            {
                self.schedule_invalidation(Some(total));
            }
        }
    }

    fn schedule_invalidation(&mut self, from: Option<usize>) {
        self.pending_invalidation = Some(match (self.pending_invalidation, from) {
            (Some(None), _) | (_, None) => None,
            (Some(Some(a)), Some(b)) => Some(a.min(b)),
            (None, Some(b)) => Some(b),
        });
    }

    /// Runs one layout pass and returns the positioned visible items.
    pub fn layout<H: FlowHost<Item = T>>(&mut self, host: &mut H, viewport: Size) -> &[FlowChild] {
        self.loader.cancel();
        self.apply_pending(host);
        self.apply_geometry(viewport);
        if self.needs_rebuild {
            self.rebuild(host);
        }

        let shifted = self.viewport.calculate(host, &mut self.items);
        if shifted > 0 {
            self.focus.shift_lines(shifted);
        }
        self.position_children(host);

        self.metrics.update(
            self.items.matrix().line_count(),
            self.viewport.main_count(),
            self.viewport.line_len(),
            self.viewport.main_gap(),
            self.viewport.state().reach_tail,
        );
        vtrace!(
            start = self.viewport.start_index(),
            end = self.viewport.end_index(),
            children = self.children.len(),
            "WaterFlow::layout"
        );
        &self.children
    }

    fn apply_pending<H: FlowHost<Item = T>>(&mut self, host: &mut H) {
        if self.pending_reset {
            self.pending_reset = false;
            self.pending_invalidation = None;
            self.invalidate(host, None);
            self.items.reset(
                host,
                self.options.cross_count,
                self.options.direction.main_axis(),
            );
        } else if let Some(from) = self.pending_invalidation.take() {
            self.invalidate(host, from);
        }

        if let Some(jump) = self.pending_jump.take() {
            vdebug!(index = jump.index, "jump_to_item");
            self.invalidate(host, None);
            self.items.set_head_item(jump.index);
            self.restore_item = jump.index;
            self.viewport.clear(-jump.offset);
        }
    }

    fn apply_geometry(&mut self, viewport: Size) {
        let axis = self.options.direction.main_axis();
        let main_size = viewport.along(axis);
        let cross_len = self.options.cross_cell_length(viewport.across(axis));
        let line_len = self.options.main_length.unwrap_or(cross_len);

        let changed = viewport != self.viewport_size
            || cross_len != self.cross_len
            || line_len != self.viewport.line_len()
            || self.options.main_gap != self.viewport.main_gap();
        self.viewport_size = viewport;
        self.cross_len = cross_len;
        if changed {
            vdebug!(main_size, cross_len, line_len, "viewport geometry changed");
            self.viewport
                .set_geometry(main_size, line_len, self.options.main_gap);
            self.viewport.request_recalc();
        }
    }

    /// Forgets placements from `from` on and schedules a rebuild that restores the current
    /// start item.
    fn invalidate<H: FlowHost<Item = T>>(&mut self, host: &mut H, from: Option<usize>) {
        let state = self.viewport.state();
        if let Some(first) = self.items.matrix().first_item_in_line(state.start_index) {
            self.restore_item = first;
        }
        self.loader.cancel();
        self.items.invalidate(host, from);
        match (from, self.focus.focused()) {
            (None, _) => self.focus.clear(),
            (Some(from), Some(focused)) if focused >= from => self.focus.clear(),
            _ => {}
        }
        self.viewport.clear(-state.first_item_offset);
        self.metrics.reset();
        if self.options.total_count.is_some() {
            self.metrics.mark_total_dirty();
        }
        self.children.clear();
        self.needs_rebuild = true;
    }

    /// Ranks lines from the last surviving placement until the restore item is placed.
    fn rebuild<H: FlowHost<Item = T>>(&mut self, host: &mut H) {
        self.needs_rebuild = false;
        let target = self.restore_item;
        let (first_line, first_item) = match self.items.matrix().last_item() {
            Some((index, p)) => (p.main, index + 1),
            None => (0, self.items.head_item()),
        };

        let mut main_count = first_line;
        let mut start_item = Some(first_item);
        loop {
            let outcome = match self.items.rank(host, main_count, start_item.take()) {
                Ok(outcome) => outcome,
                Err(_err) => {
                    vwarn!(line = main_count, error = %_err, "rebuild interrupted");
                    break;
                }
            };
            if !self.items.matrix().has_line(main_count) {
                break;
            }
            main_count += 1;
            let reached = self
                .items
                .matrix()
                .max_item_in_line(main_count - 1)
                .is_some_and(|max| max >= target);
            if reached || outcome != PackOutcome::Filled {
                break;
            }
        }

        let last = main_count.saturating_sub(1);
        let start = self
            .items
            .matrix()
            .placement(target)
            .map_or(last, |p| p.main.min(last));
        self.items.materialize(host, start);
        self.viewport.reset_window(main_count, start);
        self.restore_item = 0;
        vdebug!(main_count, start, target, "rebuild");
    }

    fn position_children<H: FlowHost<Item = T>>(&mut self, host: &mut H) {
        self.children.clear();
        let state = self.viewport.state();
        let ext = self.viewport.line_extent();
        let main_size = self.viewport.main_size();

        let mut shown: BTreeSet<usize> = BTreeSet::new();
        let mut drawn = -state.first_item_offset;
        let mut main = state.start_index.saturating_sub(1);
        let mut end = main;
        while main < state.main_count {
            if !self.items.is_cached(main) || !self.items.is_line_complete(main) {
                self.items.materialize(host, main);
            }
            for index in self.items.matrix().line_items(main) {
                if !shown.insert(index) {
                    continue;
                }
                if self.items.ensure_resident(host, index).is_none() {
                    continue;
                }
                if let Some(placement) = self.items.matrix().placement(index) {
                    let rect = self.rect_for(&placement);
                    self.children.push(FlowChild {
                        index,
                        placement,
                        rect,
                    });
                }
            }
            end = main;
            if main >= state.start_index {
                drawn += ext;
            }
            if drawn >= main_size {
                break;
            }
            main += 1;
        }
        self.viewport
            .set_end_index(end.min(state.main_count.saturating_sub(1)));
    }

    /// Physical rectangle of a placement, relative to the viewport.
    pub fn rect_for(&self, p: &Placement) -> ItemRect {
        let state = self.viewport.state();
        let line_len = self.viewport.line_len();
        let gap = self.viewport.main_gap();
        let axis = self.options.direction.main_axis();

        let mut main_pos = (p.main as f64 - state.start_index as f64) * (line_len + gap)
            - state.first_item_offset;
        let main_len = p.main_span as f64 * line_len + (p.main_span - 1) as f64 * gap;
        let cross_gap = self.options.cross_gap;
        let mut cross_pos = p.cross as f64 * (self.cross_len + cross_gap);
        let cross_len =
            p.cross_span as f64 * self.cross_len + (p.cross_span - 1) as f64 * cross_gap;

        if self.options.rtl && axis == Axis::Vertical {
            cross_pos = self.viewport_size.across(axis) - cross_pos - cross_len;
        }
        if self.options.direction.is_reverse() {
            main_pos = self.viewport.main_size() - main_pos - main_len;
        }

        match axis {
            Axis::Vertical => ItemRect {
                x: cross_pos,
                y: main_pos,
                width: cross_len,
                height: main_len,
            },
            Axis::Horizontal => ItemRect {
                x: main_pos,
                y: cross_pos,
                width: main_len,
                height: cross_len,
            },
        }
    }

    /// Queues a scroll by `delta`, positive toward the tail. Applied by the next layout.
    ///
    /// Returns `false` when the grid is already at the edge in that direction, or when every
    /// item fits in the viewport.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        if self.fits_viewport() {
            return false;
        }
        self.viewport.push_offset(-delta)
    }

    /// Queues a scroll for a mouse wheel rotation. Positive degrees scroll toward the tail.
    pub fn scroll_by_wheel(&mut self, degrees: f64, px_per_vp: f64) -> bool {
        self.scroll_by(WHEEL_VP_PER_DEGREE * degrees * px_per_vp)
    }

    /// Queues a scroll to an absolute offset along the main axis.
    pub fn scroll_to(&mut self, position: f64) -> bool {
        let delta = position - self.current_offset();
        self.scroll_by(delta)
    }

    /// Scrolls to an edge. Only [`ScrollEdge::Start`] is supported; `End` is ignored.
    pub fn scroll_to_edge(&mut self, edge: ScrollEdge) -> bool {
        match edge {
            ScrollEdge::Start => {
                self.jump_to_item(0, 0.0);
                true
            }
            ScrollEdge::End => {
                vwarn!("scroll_to_edge(End) is not supported");
                false
            }
        }
    }

    /// Moves the window so the line holding `index` starts `offset` before the viewport start.
    ///
    /// An item that is not ranked yet becomes the head of a fresh window. Items in front of it
    /// are ranked lazily when scrolling back toward the head.
    pub fn jump_to_item(&mut self, index: usize, offset: f64) {
        let head = self.items.head_item();
        match self.items.matrix().placement(index) {
            Some(p)
                if index >= head
                    && !self.pending_reset
                    && self.pending_invalidation.is_none()
                    && self.pending_jump.is_none() =>
            {
                self.viewport.jump_to_line(p.main, -offset);
            }
            _ => {
                self.pending_jump = Some(Jump { index, offset });
            }
        }
    }

    /// Current scroll offset from the head of the data, including pending distance.
    ///
    /// Lines in front of an unranked head are counted as if every item spanned one cell.
    pub fn current_offset(&self) -> f64 {
        let state = self.viewport.state();
        let ext = self.viewport.line_extent();
        let lines = (state.start_index + self.head_lines()) as f64;
        lines * ext + state.first_item_offset - state.current_offset
    }

    fn head_lines(&self) -> usize {
        self.items.head_item().div_ceil(self.options.cross_count)
    }

    /// Estimated extent of the whole flow along the main axis.
    pub fn estimated_total_extent(&self) -> f64 {
        let head = self.head_lines() as f64 * self.viewport.line_extent();
        self.metrics.estimated_total_extent() + head
    }

    /// Whether a scroll toward the tail (`true`) or head (`false`) can move the grid.
    pub fn can_scroll(&self, toward_tail: bool) -> bool {
        let state = self.viewport.state();
        if toward_tail {
            !state.reach_tail
        } else {
            !state.reach_head
        }
    }

    pub fn is_scrollable(&self) -> bool {
        self.metrics.is_scrollable(self.viewport.main_size())
    }

    fn fits_viewport(&self) -> bool {
        self.viewport.state().reach_tail
            && self.viewport.main_size() > 0.0
            && !self.is_scrollable()
    }

    /// The host's data changed from `from` on (`None`: everything).
    ///
    /// Resident items past the change are released now. The next layout re-ranks and restores
    /// the item that was at the start of the viewport.
    pub fn notify_data_source_changed<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        from: Option<usize>,
    ) {
        vdebug!(from = ?from, "notify_data_source_changed");
        self.invalidate(host, from);
    }

    /// Runs one predict step between frames. See [`Predict`].
    ///
    /// Skipped while a rebuild is pending. After [`Predict::LoadedForward`] the window moved and
    /// the host should lay out again.
    pub fn predict_layout<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        now_ns: u64,
        deadline_ns: u64,
    ) -> Predict {
        if self.needs_rebuild
            || self.pending_reset
            || self.pending_invalidation.is_some()
            || self.pending_jump.is_some()
        {
            return Predict::Idle;
        }
        let result = self.loader.predict(
            host,
            &mut self.items,
            &mut self.viewport,
            self.options.cache_count,
            self.options.predict_margin_ns,
            now_ns,
            deadline_ns,
        );
        if let Predict::LoadedForward { lines } = result {
            self.focus.shift_lines(lines);
        }
        result
    }

    /// Moves focus for a directional request. Returns the newly focused item.
    pub fn request_next_focus(&mut self, vertical: bool, reverse: bool) -> Option<usize> {
        let key = KeyDirection::resolve(self.options.rtl, vertical, reverse);
        self.focus.move_focus(
            self.items.matrix(),
            key,
            self.options.direction.main_axis(),
            self.viewport.main_count(),
        )
    }

    pub fn update_focus_info(&mut self, index: usize) {
        self.focus.update_focus_info(self.items.matrix(), index);
    }

    pub fn focused(&self) -> Option<usize> {
        self.focus.focused()
    }

    pub fn children(&self) -> &[FlowChild] {
        &self.children
    }

    /// Lowest and highest item index positioned by the last layout.
    pub fn shown_range(&self) -> Option<(usize, usize)> {
        let first = self.children.iter().map(|c| c.index).min()?;
        let last = self.children.iter().map(|c| c.index).max()?;
        Some((first, last))
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport_size
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics.metrics()
    }

    pub fn start_index(&self) -> usize {
        self.viewport.start_index()
    }

    pub fn end_index(&self) -> usize {
        self.viewport.end_index()
    }

    pub fn line_extent(&self) -> f64 {
        self.viewport.line_extent()
    }

    pub fn cross_cell_length(&self) -> f64 {
        self.cross_len
    }

    pub fn matrix(&self) -> &PlacementMatrix {
        self.items.matrix()
    }

    pub fn span_cache(&self) -> &SpanCache {
        self.items.spans()
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.items.matrix().placement(index)
    }

    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.item(index)
    }

    pub fn resident_indices(&self) -> Vec<usize> {
        self.items.resident_indices()
    }

    pub fn cached_lines(&self) -> Vec<usize> {
        self.items.cached_lines().collect()
    }

    pub fn head_item(&self) -> usize {
        self.items.head_item()
    }

    pub fn loading_line(&self) -> Option<usize> {
        self.loader.loading_line()
    }
}
