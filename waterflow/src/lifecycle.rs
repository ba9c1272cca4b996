use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::key::ItemMap;
use crate::matrix::PlacementMatrix;
use crate::packer::{PackOutcome, Packer};
use crate::span_cache::SpanCache;
use crate::{Axis, FlowHost, HasSpan, LayoutError, LayoutResult};

/// Result of materializing one line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Supply {
    /// The line has at least one placed item.
    pub exists: bool,
    /// At least one item was created by this call.
    pub built: bool,
}

/// Owns the placement matrix and the resident items, and decides which lines are ranked,
/// built and released.
///
/// A line is "in cache" once every distinct item occupying it is resident.
#[derive(Debug)]
pub struct ItemLifecycleManager<T> {
    matrix: PlacementMatrix,
    spans: SpanCache,
    resident: ItemMap<T>,
    in_cache: BTreeSet<usize>,
    main_axis: Axis,
    total_count: Option<usize>,
    /// First item of the ranked window. Items below it are only ranked by `load_forward`.
    head_item: usize,
    /// Set once ranking ran into the end of the data source.
    exhausted: bool,
}

impl<T: HasSpan> ItemLifecycleManager<T> {
    pub fn new(cross_count: usize, main_axis: Axis, total_count: Option<usize>) -> Self {
        Self {
            matrix: PlacementMatrix::new(cross_count),
            spans: SpanCache::new(),
            resident: ItemMap::default(),
            in_cache: BTreeSet::new(),
            main_axis,
            total_count,
            head_item: 0,
            exhausted: false,
        }
    }

    pub fn matrix(&self) -> &PlacementMatrix {
        &self.matrix
    }

    pub fn spans(&self) -> &SpanCache {
        &self.spans
    }

    pub fn item(&self, index: usize) -> Option<&T> {
        self.resident.get(&index)
    }

    pub fn is_resident(&self, index: usize) -> bool {
        self.resident.contains_key(&index)
    }

    pub fn resident_count(&self) -> usize {
        self.resident.len()
    }

    /// Resident item indices in ascending order.
    pub fn resident_indices(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.resident.keys().copied().collect();
        out.sort_unstable();
        out
    }

    pub fn is_cached(&self, line: usize) -> bool {
        self.in_cache.contains(&line)
    }

    pub fn cached_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.in_cache.iter().copied()
    }

    pub fn head_item(&self) -> usize {
        self.head_item
    }

    pub(crate) fn set_head_item(&mut self, head: usize) {
        self.head_item = head;
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub(crate) fn set_total_count(&mut self, total_count: Option<usize>) {
        self.total_count = total_count;
        self.exhausted = false;
    }

    /// No further item can ever be added to `line`.
    pub fn is_line_complete(&self, line: usize) -> bool {
        if self.matrix.is_line_full(line) {
            return true;
        }
        if self
            .matrix
            .last_item()
            .is_some_and(|(_, p)| p.main > line)
        {
            return true;
        }
        self.exhausted && self.matrix.last_line().is_none_or(|last| line >= last)
    }

    /// The line is ranked for good and every item on it is resident.
    pub fn is_line_settled(&self, line: usize) -> bool {
        if self.exhausted && self.matrix.last_line().is_none_or(|last| line > last) {
            return true;
        }
        self.is_cached(line) && self.is_line_complete(line)
    }

    /// Ranks `line` through the packer.
    pub fn rank<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        line: usize,
        start_item: Option<usize>,
    ) -> LayoutResult<PackOutcome> {
        self.rank_until(host, line, start_item, None)
    }

    fn rank_until<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        line: usize,
        start_item: Option<usize>,
        stop_at: Option<usize>,
    ) -> LayoutResult<PackOutcome> {
        let mut packer = Packer {
            matrix: &mut self.matrix,
            spans: &mut self.spans,
            resident: &self.resident,
            main_axis: self.main_axis,
            total_count: self.total_count,
            stop_at,
        };
        let outcome = packer.place(host, line, start_item)?;
        if outcome == PackOutcome::Exhausted {
            self.exhausted = true;
        }
        Ok(outcome)
    }

    /// Ranks `line` if it may still take items, then builds every item on it that is not
    /// resident yet.
    pub fn materialize<H: FlowHost<Item = T>>(&mut self, host: &mut H, line: usize) -> Supply {
        if !self.is_line_complete(line) {
            let start_item = self.matrix.is_empty().then_some(self.head_item);
            match self.rank(host, line, start_item) {
                Ok(_) => {}
                Err(LayoutError::NoResumeItem { .. }) => {}
                Err(_err) => {
                    vwarn!(line, error = %_err, "ranking deferred");
                }
            }
        }

        let items = self.matrix.line_items(line);
        if items.is_empty() {
            return Supply::default();
        }
        let mut built = false;
        let mut backed = true;
        for index in items {
            match self.ensure_resident(host, index) {
                Some(fresh) => built |= fresh,
                None => backed = false,
            }
        }
        if backed {
            self.in_cache.insert(line);
        }
        vtrace!(line, built, backed, "materialize");
        Supply {
            exists: true,
            built,
        }
    }

    /// Builds `index` unless it is already resident. Returns `Some(true)` when a new item was
    /// created and `None` when the build failed.
    pub fn ensure_resident<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        index: usize,
    ) -> Option<bool> {
        if self.resident.contains_key(&index) {
            return Some(false);
        }
        match host.build_child(index) {
            Some(item) => {
                self.resident.insert(index, item);
                Some(true)
            }
            None => {
                vwarn!(index, "build_child failed");
                None
            }
        }
    }

    /// Releases every resident item occupying `line`.
    ///
    /// Lines covered by the released items leave the cache as well.
    pub fn evict<H: FlowHost<Item = T>>(&mut self, host: &mut H, line: usize) {
        for index in self.matrix.line_items(line) {
            if self.resident.remove(&index).is_some() {
                host.delete_child(index);
            }
            if let Some(p) = self.matrix.placement(index) {
                for covered in p.main..p.main_end() {
                    self.in_cache.remove(&covered);
                }
            }
        }
        self.in_cache.remove(&line);
    }

    /// Releases cached lines outside `[start - cache_count, end + cache_count]` and returns the
    /// nearest line inside the band that still needs work.
    ///
    /// A line is kept when any item occupying it reaches into the band. Lines that never made
    /// it into the cache because a sibling failed to build are released too.
    pub fn deal_cache<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        start: usize,
        end: usize,
        cache_count: usize,
    ) -> Option<usize> {
        let lower = start.saturating_sub(cache_count);
        let upper = end.saturating_add(cache_count);

        let mut candidates: BTreeSet<usize> = self.in_cache.clone();
        candidates.extend(
            self.resident
                .keys()
                .filter_map(|&index| self.matrix.placement(index))
                .map(|p| p.main),
        );
        let stale: Vec<usize> = candidates
            .into_iter()
            .filter(|&line| line < lower || line > upper)
            .filter(|&line| {
                self.matrix.line_items(line).into_iter().all(|index| {
                    self.matrix
                        .placement(index)
                        .is_none_or(|p| p.main > upper || p.main_end() - 1 < lower)
                })
            })
            .collect();
        if !stale.is_empty() {
            vdebug!(count = stale.len(), lower, upper, "evicting lines");
        }
        for line in stale {
            self.evict(host, line);
        }

        for i in 1..=cache_count {
            let ahead = end + i;
            if !self.is_line_settled(ahead) {
                return Some(ahead);
            }
            if start >= i && !self.is_line_settled(start - i) {
                return Some(start - i);
            }
        }
        None
    }

    /// Ranks items `[0, head_item)` into fresh lines above the window and moves every existing
    /// line down by the number of lines produced. Returns that number.
    ///
    /// An interrupted pass leaves the matrix untouched so it can be retried.
    pub fn load_forward<H: FlowHost<Item = T>>(&mut self, host: &mut H) -> usize {
        let head = self.head_item;
        if head == 0 {
            return 0;
        }
        let cross_count = self.matrix.cross_count();
        let old = core::mem::replace(&mut self.matrix, PlacementMatrix::new(cross_count));

        let mut line = 0usize;
        loop {
            let start_item = (line == 0).then_some(0);
            let outcome = self.rank_until(host, line, start_item, Some(head));
            match outcome {
                Ok(PackOutcome::Filled) if self.matrix.has_line(line) => line += 1,
                Ok(_) => break,
                Err(_err) => {
                    vwarn!(line, error = %_err, "load forward interrupted");
                    self.matrix = old;
                    return 0;
                }
            }
        }

        let count = self.matrix.line_count();
        if count == 0 {
            self.matrix = old;
            return 0;
        }
        let fresh = core::mem::replace(&mut self.matrix, old);
        self.matrix.shift_lines(count);
        self.matrix.absorb(fresh);

        let cached = core::mem::take(&mut self.in_cache);
        self.in_cache = cached.into_iter().map(|l| l + count).collect();
        self.head_item = 0;
        vdebug!(head, lines = count, "load_forward");
        count
    }

    /// Releases every resident item at or after `from`.
    pub fn clear_items<H: FlowHost<Item = T>>(&mut self, host: &mut H, from: usize) {
        let doomed: Vec<usize> = self
            .resident
            .keys()
            .copied()
            .filter(|&i| i >= from)
            .collect();
        for index in doomed {
            self.resident.remove(&index);
            host.delete_child(index);
        }
    }

    /// Forgets placements and spans of items at or after `from` (everything for `None`), and
    /// releases their resident items.
    pub fn invalidate<H: FlowHost<Item = T>>(&mut self, host: &mut H, from: Option<usize>) {
        let from_index = from.unwrap_or(0);
        self.clear_items(host, from_index);
        self.exhausted = false;
        match from {
            Some(index) => {
                if let Some(first_line) = self.matrix.truncate_from(index) {
                    self.in_cache.retain(|&l| l < first_line);
                }
                self.spans.truncate_from(index);
                if index <= self.head_item {
                    self.head_item = index;
                }
            }
            None => {
                self.matrix.clear();
                self.spans.clear();
                self.in_cache.clear();
                self.head_item = 0;
            }
        }
    }

    /// Drops all layout state and starts a fresh matrix, e.g. after the cross count changed.
    pub(crate) fn reset<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        cross_count: usize,
        main_axis: Axis,
    ) {
        self.invalidate(host, None);
        self.matrix = PlacementMatrix::new(cross_count);
        self.main_axis = main_axis;
    }
}
