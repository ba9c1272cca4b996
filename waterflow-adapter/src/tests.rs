use crate::*;

use alloc::vec::Vec;
use std::collections::HashMap;

use waterflow::{
    Axis, FlowHost, HasSpan, ScrollEdge, Size, Span, SpanError, WaterFlow, WaterFlowOptions,
};

struct Tile;

impl HasSpan for Tile {
    fn main_span(&self) -> usize {
        1
    }

    fn cross_span(&self) -> usize {
        1
    }
}

struct ListHost {
    count: usize,
}

impl FlowHost for ListHost {
    type Item = Tile;

    fn build_child(&mut self, index: usize) -> Option<Tile> {
        (index < self.count).then_some(Tile)
    }

    fn delete_child(&mut self, _index: usize) {}

    fn child_span(&mut self, index: usize, _main_axis: Axis) -> Result<Span, SpanError> {
        if index < self.count {
            Ok(Span::UNIT)
        } else {
            Err(SpanError::OutOfRange { index })
        }
    }
}

fn single_column() -> WaterFlowOptions {
    WaterFlowOptions::new(1).with_main_length(Some(100.0))
}

fn assert_close(actual: f64, expected: f64) {
    let diff = actual - expected;
    assert!(
        diff > -1e-6 && diff < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn controller_tween_drives_scroll_offset() {
    let mut host = ListHost { count: 100 };
    let size = Size::new(100.0, 500.0);
    let mut c = Controller::new(single_column());
    c.layout(&mut host, size);

    let to = c.animate_to(2000.0, 0, 100, Easing::SmoothStep);
    assert_close(to, 2000.0);
    assert!(c.is_animating());

    let mut last = 0.0;
    for now_ms in [0u64, 10, 20, 40, 80, 100, 120] {
        if let Some(off) = c.tick(now_ms) {
            assert!(off >= last);
            last = off;
        }
        c.layout(&mut host, size);
        assert_close(c.flow().current_offset(), last);
    }
    assert!(!c.is_animating());
    assert_close(c.flow().current_offset(), 2000.0);
    assert_eq!(c.flow().start_index(), 20);
}

#[test]
fn tween_stops_at_tail() {
    let mut host = ListHost { count: 12 };
    let size = Size::new(100.0, 500.0);
    let mut c = Controller::new(single_column());
    c.layout(&mut host, size);

    c.animate_to(5000.0, 0, 100, Easing::Linear);
    for now_ms in [10u64, 20, 30] {
        c.tick(now_ms);
        c.layout(&mut host, size);
    }
    assert!(!c.is_animating());
    assert!(c.flow().viewport_state().reach_tail);
    assert_close(c.flow().current_offset(), 700.0);
}

#[test]
fn user_scroll_cancels_tween() {
    let mut host = ListHost { count: 100 };
    let size = Size::new(100.0, 500.0);
    let mut c = Controller::new(single_column());
    c.layout(&mut host, size);

    c.animate_to(3000.0, 0, 200, Easing::EaseInOutCubic);
    c.tick(50);
    assert!(c.scroll_by(10.0));
    assert!(!c.is_animating());
    assert_eq!(c.tick(60), None);
}

#[test]
fn controller_scroll_to_edge_returns_to_head() {
    let mut host = ListHost { count: 100 };
    let size = Size::new(100.0, 500.0);
    let mut c = Controller::new(single_column());
    c.layout(&mut host, size);
    c.scroll_by(1234.0);
    c.layout(&mut host, size);

    assert!(c.scroll_to_edge(ScrollEdge::Start));
    c.layout(&mut host, size);
    assert_close(c.flow().current_offset(), 0.0);
}

#[test]
fn anchor_preserves_position_across_prepend() {
    let mut host = ListHost { count: 100 };
    let size = Size::new(100.0, 500.0);
    let mut flow: WaterFlow<Tile> = WaterFlow::new(single_column());
    flow.layout(&mut host, size);
    flow.scroll_by(550.0);
    flow.layout(&mut host, size);

    let anchor = capture_first_visible_anchor(&flow, |i| 1000u64 + i as u64).unwrap();
    assert_eq!(anchor.key, 1005);
    assert_close(anchor.offset_in_viewport, 50.0);

    // Prepend 10 items: old items shift by +10 indexes.
    host.count = 110;
    let key_for = |i: usize| {
        if i < 10 {
            2000u64 + i as u64
        } else {
            1000u64 + (i - 10) as u64
        }
    };
    let map: HashMap<u64, usize> = (0..110usize).map(|i| (key_for(i), i)).collect();
    flow.notify_data_source_changed(&mut host, None);

    assert!(apply_anchor(&mut flow, &anchor, |k| map.get(k).copied()));
    let children = flow.layout(&mut host, size);
    assert_eq!(children.first().map(|c| c.index), Some(15));
    assert_close(children[0].rect.y, -50.0);

    let again = capture_first_visible_anchor(&flow, key_for).unwrap();
    assert_eq!(again.key, 1005);
    assert_close(again.offset_in_viewport, 50.0);
}

#[test]
fn anchor_for_removed_item_is_rejected() {
    let mut flow: WaterFlow<Tile> = WaterFlow::new(single_column());
    let anchor = FlowAnchor {
        key: 7u64,
        offset_in_viewport: 0.0,
    };
    assert!(!apply_anchor(&mut flow, &anchor, |_| None));
    assert!(capture_first_visible_anchor(&flow, |i| i).is_none());
}

#[test]
fn easing_hits_endpoints() {
    for easing in [Easing::Linear, Easing::SmoothStep, Easing::EaseInOutCubic] {
        assert_close(easing.sample(0.0), 0.0);
        assert_close(easing.sample(1.0), 1.0);
        assert_close(easing.sample(0.5), 0.5);
    }

    let tween = Tween::new(100.0, 0.0, 10, 0, Easing::Linear);
    assert_eq!(tween.duration_ms, 1);
    assert_close(tween.sample(0), 100.0);
    assert!(tween.is_done(11));
    assert_close(tween.sample(11), 0.0);

    let mut tween = Tween::new(0.0, 1000.0, 0, 100, Easing::Linear);
    tween.retarget(50, 200.0, 100);
    let samples: Vec<f64> = [50u64, 100, 150].iter().map(|&t| tween.sample(t)).collect();
    assert_close(samples[0], 500.0);
    assert_close(samples[1], 350.0);
    assert_close(samples[2], 200.0);
}
