use crate::{CounterPosition, CounterState, SurfaceId, ThresholdLevel};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerViewModel {
    pub counters: Vec<CounterView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterView {
    pub surface_id: SurfaceId,
    pub status_text: String,
    pub threshold: ThresholdLevel,
    pub position: CounterPosition,
    pub current_length: usize,
    pub remaining: i64,
}

/// Fills the `{max}`, `{used}` and `{remaining}` placeholders of `template`.
pub fn render_status(template: &str, max_length: usize, counter: &CounterState) -> String {
    template
        .replace("{max}", &max_length.to_string())
        .replace("{used}", &counter.current_length().to_string())
        .replace("{remaining}", &counter.remaining().to_string())
}
