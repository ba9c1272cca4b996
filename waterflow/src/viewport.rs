use crate::lifecycle::ItemLifecycleManager;
use crate::{FlowHost, HasSpan, ViewportState};

const EPSILON: f64 = 1e-3;

pub(crate) fn near_zero(v: f64) -> bool {
    v > -EPSILON && v < EPSILON
}

enum TailStep {
    Done,
    Continue,
}

/// Resolves pending scroll distance into a start line plus an offset into it.
///
/// Lines are uniform: every line is `line_len` long and separated by `main_gap`.
#[derive(Clone, Debug, Default)]
pub struct ViewportController {
    state: ViewportState,
    end_index: usize,
    needs_recalc: bool,
    tail_deferred: bool,
    main_size: f64,
    line_len: f64,
    main_gap: f64,
}

impl ViewportController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn start_index(&self) -> usize {
        self.state.start_index
    }

    pub fn end_index(&self) -> usize {
        self.end_index
    }

    pub fn main_count(&self) -> usize {
        self.state.main_count
    }

    pub fn main_size(&self) -> f64 {
        self.main_size
    }

    pub fn line_len(&self) -> f64 {
        self.line_len
    }

    pub fn main_gap(&self) -> f64 {
        self.main_gap
    }

    /// Distance from one line start to the next.
    pub fn line_extent(&self) -> f64 {
        self.line_len + self.main_gap
    }

    pub(crate) fn set_geometry(&mut self, main_size: f64, line_len: f64, main_gap: f64) {
        self.main_size = main_size;
        self.line_len = line_len;
        self.main_gap = main_gap;
    }

    pub(crate) fn set_end_index(&mut self, end: usize) {
        self.end_index = end;
    }

    pub(crate) fn request_recalc(&mut self) {
        self.needs_recalc = true;
    }

    pub(crate) fn clear_edges(&mut self) {
        self.state.reach_head = false;
        self.state.reach_tail = false;
        self.needs_recalc = true;
    }

    /// Re-bases the window after the lines were re-ranked.
    pub(crate) fn reset_window(&mut self, main_count: usize, start: usize) {
        self.state.main_count = main_count;
        self.state.start_index = start;
        self.end_index = start;
        if near_zero(self.state.current_offset) {
            self.needs_recalc = true;
        }
    }

    /// Forgets the window position. `pending` becomes the distance still to apply.
    pub(crate) fn clear(&mut self, pending: f64) {
        self.state = ViewportState {
            current_offset: pending,
            ..ViewportState::default()
        };
        self.end_index = 0;
    }

    /// Places the window at `start` with `first_item_offset = 0`.
    pub(crate) fn jump_to_line(&mut self, start: usize, pending: f64) {
        self.state.start_index = start;
        self.state.main_count = self.state.main_count.max(start);
        self.state.first_item_offset = 0.0;
        self.state.current_offset = pending;
        self.state.reach_head = false;
        self.state.reach_tail = false;
        self.needs_recalc = true;
    }

    /// Queues a scroll distance, positive toward the head.
    ///
    /// Returns `false` when the grid is already at the edge in that direction.
    pub(crate) fn push_offset(&mut self, offset: f64) -> bool {
        if near_zero(offset) {
            return true;
        }
        let s = &mut self.state;
        if s.reach_head && s.reach_tail {
            return false;
        }
        if offset > 0.0 {
            if s.reach_head {
                return false;
            }
            s.reach_tail = false;
        } else {
            if s.reach_tail {
                return false;
            }
            s.reach_head = false;
        }
        s.current_offset += offset;
        true
    }

    /// Applies the pending offset. Returns how many lines the window was re-based by when
    /// earlier items had to be ranked in front of it.
    pub fn calculate<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
    ) -> usize {
        let mut shifted = 0usize;
        if self.tail_deferred {
            self.tail_deferred = false;
            self.needs_recalc = true;
        }
        if self.line_extent() <= 0.0 {
            self.state.current_offset = 0.0;
            self.needs_recalc = false;
            return shifted;
        }
        while !near_zero(self.state.current_offset) || self.needs_recalc {
            if self.state.current_offset > 0.0 {
                shifted += self.scroll_toward_head(host, items);
                continue;
            }
            match self.scroll_toward_tail(host, items, &mut shifted) {
                TailStep::Continue => continue,
                TailStep::Done => break,
            }
        }
        self.state.current_offset = 0.0;
        shifted
    }

    fn scroll_toward_head<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
    ) -> usize {
        let ext = self.line_extent();
        let mut shifted = 0usize;

        self.state.current_offset -= self.state.first_item_offset;
        self.state.first_item_offset = 0.0;

        while self.state.current_offset > 0.0 {
            if self.state.start_index > 0 {
                let above = self.state.start_index - 1;
                if !items.is_cached(above) {
                    items.materialize(host, above);
                }
                self.state.current_offset -= ext;
                self.state.start_index = above;
            }
            if self.state.start_index == 0
                && items.head_item() > 0
                && self.state.current_offset > 0.0
            {
                shifted += self.load_forward(host, items);
            }
            if self.state.start_index == 0 {
                break;
            }
        }

        if self.state.current_offset < 0.0 {
            self.state.first_item_offset = -self.state.current_offset;
        } else if self.state.start_index == 0 && items.head_item() == 0 {
            self.state.reach_head = true;
        }
        self.state.current_offset = 0.0;
        vtrace!(
            start = self.state.start_index,
            first_item_offset = self.state.first_item_offset,
            "scroll_toward_head"
        );
        shifted
    }

    fn scroll_toward_tail<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
        shifted: &mut usize,
    ) -> TailStep {
        let ext = self.line_extent();

        if !near_zero(self.state.first_item_offset) {
            self.state.current_offset -= self.state.first_item_offset;
        }
        self.state.first_item_offset = 0.0;

        while self.state.start_index < self.state.main_count
            && (self.state.current_offset < 0.0 || self.needs_recalc)
        {
            self.state.current_offset += ext;
            self.state.start_index += 1;
            self.needs_recalc = false;
        }
        self.needs_recalc = false;

        if self.state.current_offset > 0.0 {
            self.state.first_item_offset = ext - self.state.current_offset;
            self.state.start_index = self.state.start_index.saturating_sub(1);
        } else if self.build_lazy(host, items, self.state.main_count, -self.state.current_offset)
            > 0.0
        {
            return TailStep::Continue;
        }
        self.state.current_offset = 0.0;

        let mut blank = self.blank_of_end();
        if blank <= 0.0 {
            return TailStep::Done;
        }
        blank -= self.build_lazy(host, items, self.state.main_count, blank);
        if blank <= 0.0 {
            return TailStep::Done;
        }
        if !items.is_exhausted() {
            // A line could not be ranked yet. Keep the window and retry on the next pass.
            if self.state.main_count > 0 && self.state.start_index >= self.state.main_count {
                self.state.start_index = self.state.main_count - 1;
                self.state.first_item_offset = 0.0;
            }
            self.tail_deferred = true;
            vdebug!(
                start = self.state.start_index,
                main_count = self.state.main_count,
                "tail deferred"
            );
            return TailStep::Done;
        }

        // Out of lines: pull the window back until the viewport is filled again.
        blank -= self.state.first_item_offset;
        self.state.first_item_offset = 0.0;
        while blank > 0.0 {
            if self.state.start_index == 0 && items.head_item() > 0 {
                *shifted += self.load_forward(host, items);
            }
            if self.state.start_index == 0 {
                break;
            }
            let above = self.state.start_index - 1;
            if !items.is_cached(above) {
                items.materialize(host, above);
            }
            blank -= ext;
            self.state.start_index = above;
        }
        self.state.first_item_offset = if blank < 0.0 { -blank } else { 0.0 };
        self.state.reach_tail = true;
        vtrace!(
            start = self.state.start_index,
            first_item_offset = self.state.first_item_offset,
            "reached tail"
        );
        TailStep::Done
    }

    /// Space left below the last known line, given the current window position.
    pub fn blank_of_end(&self) -> f64 {
        let ext = self.line_extent();
        let mut drawn = -self.state.first_item_offset;
        for _ in self.state.start_index..self.state.main_count {
            drawn += ext;
            if drawn >= self.main_size {
                break;
            }
        }
        self.main_size - drawn
    }

    /// Materializes lines from `from` until `needed` extent is covered or the lines run out.
    /// Returns the extent produced.
    pub fn build_lazy<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
        from: usize,
        needed: f64,
    ) -> f64 {
        if needed <= 0.0 || near_zero(needed) {
            return 0.0;
        }
        let mut size = 0.0;
        let mut line = from;
        while size < needed {
            if !items.materialize(host, line).exists {
                break;
            }
            line += 1;
            self.state.main_count = line;
            size += self.line_extent();
        }
        size
    }

    /// Ranks the items in front of the window and re-bases the window by the produced lines.
    pub fn load_forward<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
    ) -> usize {
        let count = items.load_forward(host);
        if count > 0 {
            self.state.start_index += count;
            self.state.main_count += count;
            self.end_index += count;
        }
        count
    }
}
