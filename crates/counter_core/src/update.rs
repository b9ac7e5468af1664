use counter_logging::{counter_debug, counter_info, counter_trace};

use crate::state::Binding;
use crate::{ControllerState, Effect, Msg, ReadTiming, SurfaceKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ControllerState, msg: Msg) -> (ControllerState, Vec<Effect>) {
    let effects = match msg {
        Msg::Attach {
            surface_id,
            form_id,
            kind,
            config,
            content,
        } => {
            if state.is_attached(&surface_id) {
                counter_trace!(
                    "Surface {} already attached; keeping existing counter",
                    surface_id
                );
                return (state, Vec::new());
            }
            if !config.is_enabled() {
                counter_debug!("Counter disabled for surface {}", surface_id);
                return (state, Vec::new());
            }

            let position = config.position();
            let binding =
                state.insert(surface_id.clone(), form_id, kind, config, content.as_deref());
            counter_debug!(
                "Attached surface={} binding={} length={}",
                surface_id,
                binding.id,
                binding.counter.current_length()
            );
            let render = render_effect(binding);
            vec![
                Effect::Subscribe {
                    surface_id: surface_id.clone(),
                },
                Effect::MountCounter {
                    surface_id,
                    position,
                },
                render,
            ]
        }
        Msg::ContentChanged { surface_id } => match state.binding(&surface_id) {
            Some(binding) => {
                let timing = match binding.kind {
                    SurfaceKind::PlainText => ReadTiming::Immediate,
                    SurfaceKind::RichText => ReadTiming::Deferred,
                };
                vec![Effect::ReadContent {
                    binding: binding.id,
                    surface_id,
                    timing,
                }]
            }
            None => Vec::new(),
        },
        Msg::ContentRead {
            surface_id,
            binding,
            content,
        } => state
            .apply_content(&surface_id, binding, content.as_deref())
            .map(render_effect)
            .into_iter()
            .collect(),
        Msg::Detach { surface_id } => {
            if state.remove(&surface_id).is_some() {
                counter_debug!("Detached surface {}", surface_id);
                vec![
                    Effect::CancelDeferredRead {
                        surface_id: surface_id.clone(),
                    },
                    Effect::Release { surface_id },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitRequested { form_id } => {
            match state.gate_submission(&form_id).first_offending_surface {
                Some(focus) => {
                    counter_info!(
                        "Blocked submission of form {}: {} is over its limit",
                        form_id,
                        focus
                    );
                    vec![Effect::BlockSubmission { form_id, focus }]
                }
                None => Vec::new(),
            }
        }
    };

    (state, effects)
}

fn render_effect(binding: &Binding) -> Effect {
    Effect::RenderStatus {
        surface_id: binding.counter.surface_id().clone(),
        text: binding.status_text(),
        threshold: binding.counter.threshold(),
    }
}
