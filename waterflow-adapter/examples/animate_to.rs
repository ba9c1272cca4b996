use waterflow::{Axis, FlowHost, HasSpan, Size, Span, SpanError, WaterFlowOptions};
use waterflow_adapter::{Controller, Easing};

struct Photo;

impl HasSpan for Photo {
    fn main_span(&self) -> usize {
        1
    }

    fn cross_span(&self) -> usize {
        1
    }
}

struct Gallery {
    len: usize,
}

impl FlowHost for Gallery {
    type Item = Photo;

    fn build_child(&mut self, index: usize) -> Option<Photo> {
        (index < self.len).then_some(Photo)
    }

    fn delete_child(&mut self, _index: usize) {}

    fn child_span(&mut self, index: usize, _main_axis: Axis) -> Result<Span, SpanError> {
        if index < self.len {
            Ok(Span::UNIT)
        } else {
            Err(SpanError::OutOfRange { index })
        }
    }
}

fn main() {
    // Example: a controller driving a tween without holding any UI objects.
    //
    // An adapter would:
    // - start a tween (e.g. in response to a "back to top" or "scroll to" command)
    // - call tick(now_ms) and then layout in its frame loop
    // - render the returned children
    let mut gallery = Gallery { len: 5_000 };
    let viewport = Size::new(400.0, 800.0);
    let mut c = Controller::new(WaterFlowOptions::new(4).with_main_length(Some(120.0)));
    c.layout(&mut gallery, viewport);

    let target = c.animate_to(12_000.0, 0, 240, Easing::SmoothStep);
    println!("target_offset={target}");

    let mut now_ms = 0u64;
    while c.is_animating() {
        now_ms += 16;
        let off = c.tick(now_ms);
        c.layout(&mut gallery, viewport);
        if now_ms % 80 == 0 {
            println!("t={now_ms} off={off:?} shown={:?}", c.flow().shown_range());
        }
    }

    println!(
        "done: off={} start_line={}",
        c.flow().current_offset(),
        c.flow().start_index()
    );
}
