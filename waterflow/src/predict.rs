use crate::lifecycle::ItemLifecycleManager;
use crate::viewport::ViewportController;
use crate::{FlowHost, HasSpan};

/// What a predict pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predict {
    /// Nothing left to prepare.
    Idle,
    /// Work is pending but the frame budget is spent. Call again next frame.
    Deferred,
    /// New items were built for `line`. Call again next frame.
    Loaded { line: usize },
    /// Items in front of the window were ranked and the window moved down by `lines`.
    LoadedForward { lines: usize },
}

impl Predict {
    /// The host should schedule another predict pass.
    pub fn wants_more(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Prepares off-screen lines between frames, one line per pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncrementalLoader {
    loading: Option<usize>,
}

impl IncrementalLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Line scheduled for the next pass.
    pub fn loading_line(&self) -> Option<usize> {
        self.loading
    }

    pub fn cancel(&mut self) {
        self.loading = None;
    }

    pub(crate) fn shift_lines(&mut self, by: usize) {
        if let Some(line) = self.loading.as_mut() {
            *line += by;
        }
    }

    /// Runs one predict step.
    ///
    /// `now_ns` and `deadline_ns` share a clock. No line is built when fewer than `margin_ns`
    /// remain before the deadline.
    #[allow(clippy::too_many_arguments)]
    pub fn predict<T: HasSpan, H: FlowHost<Item = T>>(
        &mut self,
        host: &mut H,
        items: &mut ItemLifecycleManager<T>,
        viewport: &mut ViewportController,
        cache_count: usize,
        margin_ns: u64,
        now_ns: u64,
        deadline_ns: u64,
    ) -> Predict {
        if self.loading.is_none() {
            self.loading = items.deal_cache(
                host,
                viewport.start_index(),
                viewport.end_index(),
                cache_count,
            );
            if self.loading.is_none() {
                if viewport.start_index() == 0 && items.head_item() > 0 {
                    let lines = viewport.load_forward(host, items);
                    if lines > 0 {
                        return Predict::LoadedForward { lines };
                    }
                }
                return Predict::Idle;
            }
        }

        if now_ns.saturating_add(margin_ns) > deadline_ns {
            vtrace!(line = ?self.loading, "predict deferred");
            return Predict::Deferred;
        }

        let Some(line) = self.loading.take() else {
            return Predict::Idle;
        };
        let supply = items.materialize(host, line);
        vtrace!(line, built = supply.built, "predict");
        if supply.built {
            Predict::Loaded { line }
        } else {
            Predict::Idle
        }
    }
}
