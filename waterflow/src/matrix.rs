use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::Placement;

/// Bidirectional placement index: `line -> (cross -> item)` and `item -> Placement`.
///
/// Every cell covered by an item's placement maps back to that item and nothing else. Both
/// directions are always written together.
#[derive(Clone, Debug, Default)]
pub struct PlacementMatrix {
    cells: BTreeMap<usize, BTreeMap<usize, usize>>,
    items: BTreeMap<usize, Placement>,
    cross_count: usize,
}

impl PlacementMatrix {
    pub fn new(cross_count: usize) -> Self {
        Self {
            cells: BTreeMap::new(),
            items: BTreeMap::new(),
            cross_count: cross_count.max(1),
        }
    }

    pub fn cross_count(&self) -> usize {
        self.cross_count
    }

    pub fn item_at(&self, main: usize, cross: usize) -> Option<usize> {
        self.cells.get(&main)?.get(&cross).copied()
    }

    pub fn placement(&self, index: usize) -> Option<Placement> {
        self.items.get(&index).copied()
    }

    pub fn contains_item(&self, index: usize) -> bool {
        self.items.contains_key(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn has_line(&self, main: usize) -> bool {
        self.cells.contains_key(&main)
    }

    /// Occupied cells of a line, ordered by cross position.
    pub fn line(&self, main: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .get(&main)
            .into_iter()
            .flat_map(|row| row.iter().map(|(&c, &i)| (c, i)))
    }

    /// Distinct items occupying a line, in cross order.
    pub fn line_items(&self, main: usize) -> Vec<usize> {
        let mut out: Vec<usize> = Vec::new();
        for (_, index) in self.line(main) {
            if !out.contains(&index) {
                out.push(index);
            }
        }
        out
    }

    pub fn line_len(&self, main: usize) -> usize {
        self.cells.get(&main).map_or(0, BTreeMap::len)
    }

    pub fn is_line_full(&self, main: usize) -> bool {
        self.line_len(main) >= self.cross_count
    }

    pub fn is_free(&self, main: usize, cross: usize) -> bool {
        cross < self.cross_count && self.item_at(main, cross).is_none()
    }

    /// Contiguous free cells on `main` starting at `cross`, capped at `max`.
    pub fn free_run(&self, main: usize, cross: usize, max: usize) -> usize {
        let limit = max.min(self.cross_count.saturating_sub(cross));
        (0..limit)
            .take_while(|&k| self.item_at(main, cross + k).is_none())
            .count()
    }

    pub fn last_line(&self) -> Option<usize> {
        self.cells.keys().next_back().copied()
    }

    /// Number of lines up to and including the last occupied one.
    pub fn line_count(&self) -> usize {
        self.last_line().map_or(0, |l| l + 1)
    }

    /// The highest placed item index and its placement.
    pub fn last_item(&self) -> Option<(usize, Placement)> {
        self.items.iter().next_back().map(|(&i, &p)| (i, p))
    }

    pub fn max_item_in_line(&self, main: usize) -> Option<usize> {
        self.line(main).map(|(_, i)| i).max()
    }

    pub fn first_item_in_line(&self, main: usize) -> Option<usize> {
        self.line(main).next().map(|(_, i)| i)
    }

    /// Finds the item ranking should continue from when filling `main`.
    ///
    /// Scans earlier lines backward and takes the highest index seen plus one, stopping after
    /// the first line that is completely filled.
    pub fn resume_item(&self, main: usize) -> Option<usize> {
        let mut next: Option<usize> = None;
        for (_, row) in self.cells.range(..main).rev() {
            if let Some(&max) = row.values().max() {
                next = Some(next.map_or(max + 1, |n| n.max(max + 1)));
            }
            if row.len() >= self.cross_count {
                break;
            }
        }
        next
    }

    pub(crate) fn insert(&mut self, index: usize, placement: Placement) {
        debug_assert!(!self.items.contains_key(&index), "item placed twice");
        for main in placement.main..placement.main_end() {
            let row = self.cells.entry(main).or_default();
            for cross in placement.cross..placement.cross_end() {
                let prev = row.insert(cross, index);
                debug_assert!(prev.is_none(), "cell already occupied");
            }
        }
        self.items.insert(index, placement);
    }

    pub(crate) fn remove_item(&mut self, index: usize) -> Option<Placement> {
        let placement = self.items.remove(&index)?;
        for main in placement.main..placement.main_end() {
            if let Some(row) = self.cells.get_mut(&main) {
                for cross in placement.cross..placement.cross_end() {
                    row.remove(&cross);
                }
                if row.is_empty() {
                    self.cells.remove(&main);
                }
            }
        }
        Some(placement)
    }

    /// Removes every item at or after `index`. Returns the first line that lost a cell.
    pub(crate) fn truncate_from(&mut self, index: usize) -> Option<usize> {
        let removed = self.items.split_off(&index);
        let mut first_line: Option<usize> = None;
        for placement in removed.values() {
            first_line = Some(first_line.map_or(placement.main, |l| l.min(placement.main)));
            for main in placement.main..placement.main_end() {
                if let Some(row) = self.cells.get_mut(&main) {
                    row.retain(|_, i| *i < index);
                    if row.is_empty() {
                        self.cells.remove(&main);
                    }
                }
            }
        }
        first_line
    }

    /// Moves every line down by `by`.
    pub(crate) fn shift_lines(&mut self, by: usize) {
        if by == 0 {
            return;
        }
        let cells = core::mem::take(&mut self.cells);
        self.cells = cells.into_iter().map(|(m, row)| (m + by, row)).collect();
        for placement in self.items.values_mut() {
            placement.main += by;
        }
    }

    /// Moves all placements of `other` into `self`. The two must not overlap.
    pub(crate) fn absorb(&mut self, other: PlacementMatrix) {
        for (index, placement) in other.items {
            self.insert(index, placement);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.cells.clear();
        self.items.clear();
    }

    pub fn placements(&self) -> impl Iterator<Item = (usize, Placement)> + '_ {
        self.items.iter().map(|(&i, &p)| (i, p))
    }
}
