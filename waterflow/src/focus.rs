use crate::matrix::PlacementMatrix;
use crate::{Axis, KeyDirection};

/// Tracks the focused item and its cell, and steps focus across the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusNavigator {
    index: Option<usize>,
    main: usize,
    cross: usize,
}

impl FocusNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<usize> {
        self.index
    }

    /// The cell focus moves from, as `(main, cross)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.main, self.cross)
    }

    /// Focus moved to `index` from elsewhere (pointer, host focus manager).
    pub fn update_focus_info(&mut self, matrix: &PlacementMatrix, index: usize) {
        if self.index == Some(index) {
            return;
        }
        vtrace!(from = ?self.index, to = index, "update_focus_info");
        self.index = Some(index);
        if let Some(p) = matrix.placement(index) {
            self.main = p.main;
            self.cross = p.cross;
        }
    }

    /// Steps one cell at a time in `direction` until a different item is found.
    ///
    /// Returns `None` and leaves focus untouched when the walk leaves the grid.
    pub fn move_focus(
        &mut self,
        matrix: &PlacementMatrix,
        direction: KeyDirection,
        main_axis: Axis,
        main_count: usize,
    ) -> Option<usize> {
        let cross_count = matrix.cross_count();
        let (mut main, mut cross) = (self.main, self.cross);
        loop {
            let (along_main, forward) = match (main_axis, direction) {
                (Axis::Vertical, KeyDirection::Up) => (true, false),
                (Axis::Vertical, KeyDirection::Down) => (true, true),
                (Axis::Vertical, KeyDirection::Left) => (false, false),
                (Axis::Vertical, KeyDirection::Right) => (false, true),
                (Axis::Horizontal, KeyDirection::Up) => (false, false),
                (Axis::Horizontal, KeyDirection::Down) => (false, true),
                (Axis::Horizontal, KeyDirection::Left) => (true, false),
                (Axis::Horizontal, KeyDirection::Right) => (true, true),
            };
            let slot = if along_main { &mut main } else { &mut cross };
            *slot = if forward {
                *slot + 1
            } else {
                slot.checked_sub(1)?
            };
            if main >= main_count || cross >= cross_count {
                return None;
            }
            match matrix.item_at(main, cross) {
                Some(next) if Some(next) != self.index => {
                    vtrace!(from = ?self.index, to = next, "focus moved");
                    self.index = Some(next);
                    self.main = main;
                    self.cross = cross;
                    return Some(next);
                }
                _ => {}
            }
        }
    }

    /// Follows a re-base of the line numbering.
    pub(crate) fn shift_lines(&mut self, by: usize) {
        if self.index.is_some() {
            self.main += by;
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
