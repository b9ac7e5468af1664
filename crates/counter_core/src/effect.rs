use crate::{BindingId, CounterPosition, FormId, SurfaceId, ThresholdLevel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start listening for change notifications on a newly bound surface.
    Subscribe { surface_id: SurfaceId },
    MountCounter {
        surface_id: SurfaceId,
        position: CounterPosition,
    },
    ReadContent {
        surface_id: SurfaceId,
        binding: BindingId,
        timing: ReadTiming,
    },
    RenderStatus {
        surface_id: SurfaceId,
        text: String,
        threshold: ThresholdLevel,
    },
    CancelDeferredRead { surface_id: SurfaceId },
    /// Drop the host handles of a detached surface.
    Release { surface_id: SurfaceId },
    BlockSubmission {
        form_id: FormId,
        focus: SurfaceId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTiming {
    /// Read while handling the notification.
    Immediate,
    /// Read on the next scheduler turn, once the editor has applied the edit.
    Deferred,
}
