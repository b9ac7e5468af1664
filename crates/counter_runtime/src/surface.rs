use std::sync::mpsc;

use counter_core::{CounterPosition, Msg, SurfaceId, SurfaceKind, ThresholdLevel};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("surface has no content accessor")]
    NoAccessor,
    #[error("content is not text: {0}")]
    NotText(String),
    #[error("content read failed: {0}")]
    ReadFailed(String),
}

/// An editable control provided by the host page.
pub trait InputSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::PlainText
    }

    fn content(&self) -> Result<String, SurfaceError>;

    /// Called once per attachment. The surface keeps the notifier and calls
    /// [`ChangeNotifier::notify`] after every edit.
    fn subscribe(&self, notifier: ChangeNotifier);
}

/// Where a counter is shown. Setters are last-write-wins.
pub trait DisplaySink {
    fn mount(&self, _position: CounterPosition) {}

    fn set_status_text(&self, text: &str);

    fn set_threshold_class(&self, level: ThresholdLevel);

    /// Bring the surface into view, e.g. after a blocked submission.
    fn focus(&self) {}

    fn unmount(&self) {}
}

/// Handle a surface uses to report edits back to its controller.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    surface_id: SurfaceId,
    msg_tx: mpsc::Sender<Msg>,
}

impl ChangeNotifier {
    pub(crate) fn new(surface_id: SurfaceId, msg_tx: mpsc::Sender<Msg>) -> Self {
        Self { surface_id, msg_tx }
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    /// Queues a change notification; a dropped controller is ignored.
    pub fn notify(&self) {
        let _ = self.msg_tx.send(Msg::ContentChanged {
            surface_id: self.surface_id.clone(),
        });
    }
}
