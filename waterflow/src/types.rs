/// How many lines (main axis) and tracks (cross axis) an item covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub main: usize,
    pub cross: usize,
}

impl Span {
    pub const UNIT: Self = Self { main: 1, cross: 1 };

    pub fn new(main: usize, cross: usize) -> Self {
        Self { main, cross }
    }

    /// Clamps the span into `main >= 1` and `1 <= cross <= cross_count`.
    pub(crate) fn clamped(self, cross_count: usize) -> Self {
        Self {
            main: self.main.max(1),
            cross: self.cross.clamp(1, cross_count.max(1)),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Where an item sits in the grid: its anchor cell plus the extent it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub main: usize,
    pub cross: usize,
    pub main_span: usize,
    pub cross_span: usize,
}

impl Placement {
    pub fn span(&self) -> Span {
        Span::new(self.main_span, self.cross_span)
    }

    /// First line after the item (exclusive).
    pub fn main_end(&self) -> usize {
        self.main + self.main_span
    }

    pub fn cross_end(&self) -> usize {
        self.cross + self.cross_span
    }

    pub fn covers(&self, main: usize, cross: usize) -> bool {
        (self.main..self.main_end()).contains(&main)
            && (self.cross..self.cross_end()).contains(&cross)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Flow direction of the grid. `Column*` scrolls vertically, `Row*` horizontally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FlowDirection {
    Row,
    RowReverse,
    #[default]
    Column,
    ColumnReverse,
}

impl FlowDirection {
    pub fn main_axis(self) -> Axis {
        match self {
            Self::Row | Self::RowReverse => Axis::Horizontal,
            Self::Column | Self::ColumnReverse => Axis::Vertical,
        }
    }

    pub fn is_vertical(self) -> bool {
        self.main_axis() == Axis::Vertical
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// Physical viewport size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub(crate) fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub(crate) fn across(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.height,
            Axis::Vertical => self.width,
        }
    }
}

/// Physical rectangle of a positioned item, relative to the viewport origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A visible item produced by a layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowChild {
    pub index: usize,
    pub placement: Placement,
    pub rect: ItemRect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollEdge {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyDirection {
    Up,
    Down,
    Left,
    Right,
}

impl KeyDirection {
    /// Maps a focus request to a key direction. RTL mirrors the horizontal keys only.
    pub fn resolve(rtl: bool, vertical: bool, reverse: bool) -> Self {
        match (vertical, reverse) {
            (true, false) => Self::Down,
            (true, true) => Self::Up,
            (false, false) if rtl => Self::Left,
            (false, false) => Self::Right,
            (false, true) if rtl => Self::Right,
            (false, true) => Self::Left,
        }
    }
}
