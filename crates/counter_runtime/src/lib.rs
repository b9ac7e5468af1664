//! Counter runtime: drives the counter state machine against host input
//! surfaces and display sinks on a single cooperative event loop.
mod controller;
mod effects;
mod scheduler;
mod surface;

pub use controller::{Attachment, CounterController};
pub use scheduler::{DeferredRead, DeferredReads};
pub use surface::{ChangeNotifier, DisplaySink, InputSurface, SurfaceError};

pub use counter_core::{
    CounterPosition, CounterState, FieldCounterConfig, FormId, SubmissionGate, SurfaceId,
    SurfaceKind, ThresholdLevel,
};
