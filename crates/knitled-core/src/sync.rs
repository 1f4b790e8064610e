use crate::controller::KnitView;

/// Tracks the last rendered [`KnitView`] so outputs are refreshed only when
/// something visible changed.
///
/// Mutations made anywhere (buttons, HTTP handlers) become visible on the
/// next comparison without the mutator calling into the renderers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputSynchronizer {
    shadow: Option<KnitView>,
}

impl OutputSynchronizer {
    pub const fn new() -> Self {
        Self { shadow: None }
    }

    /// Whether `view` differs from what was last rendered.
    pub fn is_stale(&self, view: &KnitView) -> bool {
        self.shadow.as_ref() != Some(view)
    }

    /// Record `view` as rendered.
    pub fn commit(&mut self, view: &KnitView) {
        self.shadow = Some(*view);
    }

    /// Force a full render on the next comparison.
    pub fn invalidate(&mut self) {
        self.shadow = None;
    }
}
