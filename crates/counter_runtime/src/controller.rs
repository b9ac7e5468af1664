use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::{mpsc, Arc};

use counter_core::{
    update, ControllerState, ControllerViewModel, CounterState, FieldCounterConfig, FormId, Msg,
    SubmissionGate, SurfaceId,
};
use counter_logging::counter_trace;

use crate::effects::{read_content, EffectRunner, SurfaceHost};
use crate::surface::{DisplaySink, InputSurface};

/// A surface the host wants counted, with the sink that displays its counter.
pub struct Attachment {
    pub surface_id: SurfaceId,
    pub form_id: FormId,
    pub surface: Rc<dyn InputSurface>,
    pub sink: Rc<dyn DisplaySink>,
}

/// Owns every counter of a page and keeps them in step with their surfaces.
///
/// Notifications from surfaces are queued and handled by [`Self::pump`].
/// Rich-text reads are held until [`Self::run_deferred`] runs the next
/// scheduler turn; [`Self::run_until_idle`] does both until nothing is left.
pub struct CounterController {
    state: ControllerState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl CounterController {
    pub fn new() -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            state: ControllerState::new(),
            runner: EffectRunner::new(msg_tx),
            msg_rx,
        }
    }

    /// Binds a surface and renders its initial counter.
    ///
    /// Attaching a surface that is already bound returns its current counter
    /// and keeps the existing listeners. Returns `None` when the field's
    /// counter is disabled.
    pub fn attach(
        &mut self,
        attachment: Attachment,
        config: Arc<FieldCounterConfig>,
    ) -> Option<CounterState> {
        let Attachment {
            surface_id,
            form_id,
            surface,
            sink,
        } = attachment;

        if let Some(existing) = self.state.counter(&surface_id) {
            counter_trace!("Surface {} already attached", surface_id);
            return Some(existing.clone());
        }

        let kind = surface.kind();
        let content = read_content(&surface_id, surface.as_ref());
        self.runner
            .register(surface_id.clone(), SurfaceHost { surface, sink });
        self.dispatch(Msg::Attach {
            surface_id: surface_id.clone(),
            form_id,
            kind,
            config,
            content,
        });

        let counter = self.state.counter(&surface_id).cloned();
        if counter.is_none() {
            self.runner.unregister(&surface_id);
        }
        counter
    }

    /// Handles a change notification right away, as a host callback would.
    pub fn on_content_changed(&mut self, surface_id: &SurfaceId) {
        self.dispatch(Msg::ContentChanged {
            surface_id: surface_id.clone(),
        });
    }

    pub fn detach(&mut self, surface_id: &SurfaceId) {
        self.dispatch(Msg::Detach {
            surface_id: surface_id.clone(),
        });
    }

    /// Decides whether `form_id` may submit, focusing the first offending
    /// surface when it may not.
    pub fn gate_submission(&mut self, form_id: &FormId) -> SubmissionGate {
        let gate = self.state.gate_submission(form_id);
        self.dispatch(Msg::SubmitRequested {
            form_id: form_id.clone(),
        });
        gate
    }

    /// Handles queued surface notifications, returning how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut inbox = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            inbox.push(msg);
        }
        let handled = inbox.len();
        for msg in inbox {
            self.dispatch(msg);
        }
        handled
    }

    /// Runs one scheduler turn of deferred reads, returning how many ran.
    pub fn run_deferred(&mut self) -> usize {
        let due = self.runner.take_due_reads();
        let ran = due.len();
        for read in due {
            if let Some(msg) = self.runner.read(read.surface_id, read.binding) {
                self.dispatch(msg);
            }
        }
        ran
    }

    pub fn run_until_idle(&mut self) {
        loop {
            self.pump();
            if !self.runner.has_pending_reads() {
                break;
            }
            self.run_deferred();
        }
    }

    pub fn counter(&self, surface_id: &SurfaceId) -> Option<&CounterState> {
        self.state.counter(surface_id)
    }

    pub fn is_read_pending(&self, surface_id: &SurfaceId) -> bool {
        self.runner.is_read_pending(surface_id)
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn view(&self) -> ControllerViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (next, effects) = update(state, msg);
            self.state = next;
            pending.extend(self.runner.run(effects));
        }
    }
}

impl Default for CounterController {
    fn default() -> Self {
        Self::new()
    }
}
