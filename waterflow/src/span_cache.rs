use alloc::collections::BTreeMap;

use crate::Span;

/// Spans seen so far, keyed by item index.
///
/// An entry is written once when the span is first resolved. The packer may overwrite it with a
/// narrower cross span when the item had to be trimmed to fit.
#[derive(Clone, Debug, Default)]
pub struct SpanCache {
    spans: BTreeMap<usize, Span>,
}

impl SpanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<Span> {
        self.spans.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub(crate) fn insert_if_absent(&mut self, index: usize, span: Span) -> Span {
        *self.spans.entry(index).or_insert(span)
    }

    /// Records a trimmed cross span. Returns the previous entry.
    pub(crate) fn trim(&mut self, index: usize, span: Span) -> Option<Span> {
        self.spans.insert(index, span)
    }

    pub(crate) fn restore(&mut self, index: usize, prev: Option<Span>) {
        match prev {
            Some(span) => {
                self.spans.insert(index, span);
            }
            None => {
                self.spans.remove(&index);
            }
        }
    }

    /// Forgets every span at or after `index`.
    pub(crate) fn truncate_from(&mut self, index: usize) {
        self.spans.split_off(&index);
    }

    pub(crate) fn clear(&mut self) {
        self.spans.clear();
    }
}
