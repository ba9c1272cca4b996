// Example: a masonry feed where every seventh tile is wide and every fifth one is tall.
use waterflow::{Axis, FlowHost, HasSpan, Size, Span, SpanError, WaterFlow, WaterFlowOptions};

struct Card {
    span: Span,
}

impl HasSpan for Card {
    fn main_span(&self) -> usize {
        self.span.main
    }

    fn cross_span(&self) -> usize {
        self.span.cross
    }
}

struct Feed {
    len: usize,
    live: usize,
}

impl Feed {
    fn span_of(index: usize) -> Span {
        match (index % 7, index % 5) {
            (0, _) => Span::new(1, 2),
            (_, 0) => Span::new(2, 1),
            _ => Span::UNIT,
        }
    }
}

impl FlowHost for Feed {
    type Item = Card;

    fn build_child(&mut self, index: usize) -> Option<Card> {
        if index >= self.len {
            return None;
        }
        self.live += 1;
        Some(Card {
            span: Self::span_of(index),
        })
    }

    fn delete_child(&mut self, _index: usize) {
        self.live -= 1;
    }

    fn child_span(&mut self, index: usize, _main_axis: Axis) -> Result<Span, SpanError> {
        if index >= self.len {
            return Err(SpanError::OutOfRange { index });
        }
        Ok(Self::span_of(index))
    }
}

fn main() {
    let mut feed = Feed {
        len: 10_000,
        live: 0,
    };
    let viewport = Size::new(360.0, 640.0);
    let mut flow = WaterFlow::new(
        WaterFlowOptions::new(3)
            .with_gaps(8.0, 8.0)
            .with_cache_count(4),
    );

    let children = flow.layout(&mut feed, viewport);
    println!("first frame: {} tiles", children.len());
    for child in children.iter().take(6) {
        println!("  #{} {:?} -> {:?}", child.index, child.placement, child.rect);
    }

    // Fill the cache band between frames, 16ms per frame.
    let mut now_ns = 0u64;
    loop {
        let deadline_ns = now_ns + 16_000_000;
        let step = flow.predict_layout(&mut feed, now_ns, deadline_ns);
        if !step.wants_more() {
            break;
        }
        now_ns = deadline_ns;
    }
    println!("after predict: live={} cached_lines={:?}", feed.live, flow.cached_lines());

    flow.scroll_by(5_000.0);
    flow.layout(&mut feed, viewport);
    println!(
        "after scroll: offset={} shown={:?} live={}",
        flow.current_offset(),
        flow.shown_range(),
        feed.live
    );

    flow.jump_to_item(9_000, 0.0);
    flow.layout(&mut feed, viewport);
    println!(
        "after jump: start_line={} head_item={} shown={:?}",
        flow.start_index(),
        flow.head_item(),
        flow.shown_range()
    );
}
