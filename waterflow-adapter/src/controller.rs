use waterflow::{FlowChild, FlowHost, HasSpan, ScrollEdge, Size, WaterFlow, WaterFlowOptions};

use crate::{Easing, FlowAnchor, Tween, apply_anchor, capture_first_visible_anchor};

/// A framework-neutral controller that wraps a `waterflow::WaterFlow` and provides common
/// adapter workflows (tween-driven scrolling, anchoring).
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `scroll_by` when the user drags or flings
/// - `tick(now_ms)` each frame, before `layout`
/// - `layout` with the host and the current viewport size
#[derive(Debug)]
pub struct Controller<T> {
    flow: WaterFlow<T>,
    tween: Option<Tween>,
}

impl<T: HasSpan> Controller<T> {
    pub fn new(options: WaterFlowOptions) -> Self {
        Self {
            flow: WaterFlow::new(options),
            tween: None,
        }
    }

    pub fn from_flow(flow: WaterFlow<T>) -> Self {
        Self { flow, tween: None }
    }

    pub fn flow(&self) -> &WaterFlow<T> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut WaterFlow<T> {
        &mut self.flow
    }

    pub fn into_flow(self) -> WaterFlow<T> {
        self.flow
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    pub fn layout<H: FlowHost<Item = T>>(&mut self, host: &mut H, viewport: Size) -> &[FlowChild] {
        self.flow.layout(host, viewport)
    }

    /// Call this for user-driven scrolling. Cancels any active tween.
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.cancel_animation();
        self.flow.scroll_by(delta)
    }

    /// Advances the controller.
    ///
    /// If a tween is active, queues a scroll to its current sample and returns that offset.
    /// The scroll is applied by the next `layout`.
    pub fn tick(&mut self, now_ms: u64) -> Option<f64> {
        let tween = self.tween?;
        let off = tween.sample(now_ms);
        let moved = self.flow.scroll_to(off);
        vtrace!(now_ms, off, moved, "Controller::tick");

        // `moved` is false once an edge was reached.
        if tween.is_done(now_ms) || !moved {
            self.tween = None;
        }
        Some(off)
    }

    /// Starts a tween from the current offset to `position`.
    ///
    /// Returns the target offset (never negative).
    pub fn animate_to(
        &mut self,
        position: f64,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> f64 {
        let to = position.max(0.0);
        let from = self.flow.current_offset();
        vdebug!(from, to, duration_ms, "Controller::animate_to");
        self.tween = Some(Tween::new(from, to, now_ms, duration_ms, easing));
        to
    }

    /// Cancels any active tween and scrolls to an edge. See [`WaterFlow::scroll_to_edge`].
    pub fn scroll_to_edge(&mut self, edge: ScrollEdge) -> bool {
        self.cancel_animation();
        self.flow.scroll_to_edge(edge)
    }

    /// Cancels any active tween and jumps to an item. See [`WaterFlow::jump_to_item`].
    pub fn jump_to_item(&mut self, index: usize, offset: f64) {
        self.cancel_animation();
        self.flow.jump_to_item(index, offset);
    }

    pub fn capture_first_visible_anchor<K>(
        &self,
        key_for: impl FnOnce(usize) -> K,
    ) -> Option<FlowAnchor<K>> {
        capture_first_visible_anchor(&self.flow, key_for)
    }

    /// Applies a previously captured anchor. Cancels any active tween.
    pub fn apply_anchor<K>(
        &mut self,
        anchor: &FlowAnchor<K>,
        key_to_index: impl FnMut(&K) -> Option<usize>,
    ) -> bool {
        self.cancel_animation();
        apply_anchor(&mut self.flow, anchor, key_to_index)
    }
}
