use std::sync::Arc;

use crate::{BindingId, FieldCounterConfig, FormId, SurfaceId, SurfaceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Host bound a surface to a field; `content` is `None` when unreadable.
    Attach {
        surface_id: SurfaceId,
        form_id: FormId,
        kind: SurfaceKind,
        config: Arc<FieldCounterConfig>,
        content: Option<String>,
    },
    /// Surface reported an edit. May fire more than once per edit.
    ContentChanged { surface_id: SurfaceId },
    /// Content read back from a surface for the given binding.
    ContentRead {
        surface_id: SurfaceId,
        binding: BindingId,
        content: Option<String>,
    },
    /// Surface was removed from the page.
    Detach { surface_id: SurfaceId },
    /// Host form is about to submit.
    SubmitRequested { form_id: FormId },
}
