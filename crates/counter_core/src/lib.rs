//! Counter core: pure per-surface state machine and view-model helpers.
mod config;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use config::{ConfigError, CounterPosition, FieldCounterConfig, DEFAULT_STATUS_TEMPLATE};
pub use effect::{Effect, ReadTiming};
pub use msg::Msg;
pub use state::{
    threshold_for, BindingId, ControllerState, CounterState, FormId, SubmissionGate, SurfaceId,
    SurfaceKind, ThresholdLevel, WARNING_THRESHOLD,
};
pub use update::update;
pub use view_model::{render_status, ControllerViewModel, CounterView};
