use alloc::vec::Vec;

use crate::key::ItemMap;
use crate::matrix::PlacementMatrix;
use crate::span_cache::SpanCache;
use crate::{Axis, FlowHost, HasSpan, LayoutError, LayoutResult, Placement, Span, SpanError};

/// How a ranking pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackOutcome {
    /// The cursor moved past the requested line.
    Filled,
    /// The data source ran out of items.
    Exhausted,
    /// The configured stop index was reached.
    Stopped,
}

/// Greedy placement of items into the matrix, one line at a time.
///
/// Items are taken in index order and dropped into the first free cell, scanning cross
/// positions left to right. An item whose cross span does not fit in the free run at that cell
/// is trimmed to the run, and the trimmed span is remembered.
pub(crate) struct Packer<'a, T> {
    pub matrix: &'a mut PlacementMatrix,
    pub spans: &'a mut SpanCache,
    pub resident: &'a ItemMap<T>,
    pub main_axis: Axis,
    pub total_count: Option<usize>,
    /// Stop before placing this item (exclusive).
    pub stop_at: Option<usize>,
}

impl<T: HasSpan> Packer<'_, T> {
    /// Ranks `line`, starting from `start_item` or from the item following the previous lines.
    ///
    /// A span lookup that fails with [`SpanError::Unavailable`] undoes every placement and span
    /// trim made by this call.
    pub fn place<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        line: usize,
        start_item: Option<usize>,
    ) -> LayoutResult<PackOutcome> {
        if self.matrix.is_line_full(line) {
            return Ok(PackOutcome::Filled);
        }
        let mut item = match start_item {
            Some(i) => i,
            None => self
                .matrix
                .resume_item(line)
                .ok_or(LayoutError::NoResumeItem { line })?,
        };
        vtrace!(line, item, "Packer::place");

        let cross_count = self.matrix.cross_count();
        let mut placed: Vec<usize> = Vec::new();
        let mut trims: Vec<(usize, Option<Span>)> = Vec::new();
        let mut main = line;
        let mut cross = 0usize;

        loop {
            if self.total_count.is_some_and(|total| item >= total) {
                return Ok(PackOutcome::Exhausted);
            }
            if self.stop_at.is_some_and(|stop| item >= stop) {
                return Ok(PackOutcome::Stopped);
            }
            if self.matrix.contains_item(item) {
                item += 1;
                continue;
            }

            let span = match self.span_of(host, item, cross_count) {
                Ok(span) => span,
                Err(SpanError::OutOfRange { .. }) => return Ok(PackOutcome::Exhausted),
                Err(err) => {
                    vwarn!(item, line, "span unavailable, rolling back line");
                    self.rollback(&placed, &trims);
                    return Err(err.into());
                }
            };

            loop {
                if let Some(placement) = self.fit(item, main, cross, span, &mut trims) {
                    self.matrix.insert(item, placement);
                    placed.push(item);
                    break;
                }
                cross += 1;
                if cross >= cross_count {
                    cross = 0;
                    main += 1;
                }
                if main > line {
                    return Ok(PackOutcome::Filled);
                }
            }
            item += 1;
        }
    }

    fn span_of<H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        index: usize,
        cross_count: usize,
    ) -> Result<Span, SpanError> {
        if let Some(span) = self.spans.get(index) {
            return Ok(span);
        }
        let span = match self.resident.get(&index) {
            Some(item) => item.span(),
            None => host.child_span(index, self.main_axis)?,
        };
        Ok(self.spans.insert_if_absent(index, span.clamped(cross_count)))
    }

    /// Checks whether `index` can be anchored at `(main, cross)`, trimming its cross span to the
    /// free run over every line it covers.
    fn fit(
        &mut self,
        index: usize,
        main: usize,
        cross: usize,
        span: Span,
        trims: &mut Vec<(usize, Option<Span>)>,
    ) -> Option<Placement> {
        if !self.matrix.is_free(main, cross) {
            return None;
        }
        let run = (main..main + span.main)
            .map(|m| self.matrix.free_run(m, cross, span.cross))
            .min()
            .unwrap_or(0);
        if run == 0 {
            return None;
        }
        if run < span.cross {
            let trimmed = Span::new(span.main, run);
            vtrace!(index, from = span.cross, to = run, "trimmed cross span");
            trims.push((index, self.spans.trim(index, trimmed)));
        }
        Some(Placement {
            main,
            cross,
            main_span: span.main,
            cross_span: run,
        })
    }

    fn rollback(&mut self, placed: &[usize], trims: &[(usize, Option<Span>)]) {
        for &index in placed {
            self.matrix.remove_item(index);
        }
        for &(index, prev) in trims.iter().rev() {
            self.spans.restore(index, prev);
        }
    }
}
