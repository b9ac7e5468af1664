use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc;

use counter_core::{BindingId, Effect, Msg, ReadTiming, SurfaceId};
use counter_logging::{counter_debug, counter_trace, counter_warn};

use crate::scheduler::{DeferredRead, DeferredReads};
use crate::surface::{ChangeNotifier, DisplaySink, InputSurface};

pub(crate) struct SurfaceHost {
    pub(crate) surface: Rc<dyn InputSurface>,
    pub(crate) sink: Rc<dyn DisplaySink>,
}

/// Executes core effects against the host's surfaces and sinks.
pub(crate) struct EffectRunner {
    hosts: HashMap<SurfaceId, SurfaceHost>,
    deferred: DeferredReads,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub(crate) fn new(msg_tx: mpsc::Sender<Msg>) -> Self {
        Self {
            hosts: HashMap::new(),
            deferred: DeferredReads::new(),
            msg_tx,
        }
    }

    pub(crate) fn register(&mut self, surface_id: SurfaceId, host: SurfaceHost) {
        self.hosts.insert(surface_id, host);
    }

    pub(crate) fn unregister(&mut self, surface_id: &SurfaceId) {
        self.hosts.remove(surface_id);
    }

    pub(crate) fn is_read_pending(&self, surface_id: &SurfaceId) -> bool {
        self.deferred.is_pending(surface_id)
    }

    pub(crate) fn has_pending_reads(&self) -> bool {
        !self.deferred.is_empty()
    }

    pub(crate) fn take_due_reads(&mut self) -> Vec<DeferredRead> {
        self.deferred.take_due()
    }

    /// Reads a surface now, producing the message that feeds the result back.
    pub(crate) fn read(&self, surface_id: SurfaceId, binding: BindingId) -> Option<Msg> {
        let host = self.hosts.get(&surface_id)?;
        let content = read_content(&surface_id, host.surface.as_ref());
        Some(Msg::ContentRead {
            surface_id,
            binding,
            content,
        })
    }

    /// Runs `effects` in order and returns any follow-up messages.
    pub(crate) fn run(&mut self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut follow_ups = Vec::new();
        for effect in effects {
            match effect {
                Effect::Subscribe { surface_id } => {
                    if let Some(host) = self.hosts.get(&surface_id) {
                        let notifier = ChangeNotifier::new(surface_id, self.msg_tx.clone());
                        host.surface.subscribe(notifier);
                    }
                }
                Effect::MountCounter {
                    surface_id,
                    position,
                } => {
                    if let Some(host) = self.hosts.get(&surface_id) {
                        host.sink.mount(position);
                    }
                }
                Effect::ReadContent {
                    surface_id,
                    binding,
                    timing: ReadTiming::Immediate,
                } => {
                    follow_ups.extend(self.read(surface_id, binding));
                }
                Effect::ReadContent {
                    surface_id,
                    binding,
                    timing: ReadTiming::Deferred,
                } => {
                    counter_trace!("Deferring read of surface {}", surface_id);
                    self.deferred.schedule(surface_id, binding);
                }
                Effect::RenderStatus {
                    surface_id,
                    text,
                    threshold,
                } => {
                    if let Some(host) = self.hosts.get(&surface_id) {
                        host.sink.set_status_text(&text);
                        host.sink.set_threshold_class(threshold);
                    }
                }
                Effect::CancelDeferredRead { surface_id } => {
                    let dropped = self.deferred.cancel(&surface_id);
                    if dropped > 0 {
                        counter_debug!(
                            "Cancelled {} pending read(s) of surface {}",
                            dropped,
                            surface_id
                        );
                    }
                }
                Effect::Release { surface_id } => {
                    if let Some(host) = self.hosts.remove(&surface_id) {
                        host.sink.unmount();
                    }
                }
                Effect::BlockSubmission { form_id, focus } => {
                    counter_trace!("Focusing surface {} of blocked form {}", focus, form_id);
                    if let Some(host) = self.hosts.get(&focus) {
                        host.sink.focus();
                    }
                }
            }
        }
        follow_ups
    }
}

/// Unreadable content is treated as empty so a broken editor never breaks the form.
pub(crate) fn read_content(surface_id: &SurfaceId, surface: &dyn InputSurface) -> Option<String> {
    match surface.content() {
        Ok(text) => Some(text),
        Err(err) => {
            counter_warn!(
                "Could not read surface {}: {}; counting it as empty",
                surface_id,
                err
            );
            None
        }
    }
}
