use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use counter_engine::normalize;

use crate::view_model::{render_status, ControllerViewModel, CounterView};
use crate::FieldCounterConfig;

/// Remaining-character count at or below which a counter turns to `Warning`.
pub const WARNING_THRESHOLD: i64 = 5;

/// Sequence number of one attachment. Orders surfaces and tags deferred reads.
pub type BindingId = u64;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SurfaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormId(String);

impl FormId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FormId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FormId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    /// Content is current as soon as the change notification fires.
    #[default]
    PlainText,
    /// Embedded editor whose content accessor lags its change notification.
    RichText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ThresholdLevel {
    #[default]
    Normal,
    Warning,
    Over,
}

pub fn threshold_for(remaining: i64) -> ThresholdLevel {
    if remaining < 0 {
        ThresholdLevel::Over
    } else if remaining <= WARNING_THRESHOLD {
        ThresholdLevel::Warning
    } else {
        ThresholdLevel::Normal
    }
}

/// Live counter of one bound surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    surface_id: SurfaceId,
    current_length: usize,
    remaining: i64,
    threshold: ThresholdLevel,
}

impl CounterState {
    /// The only constructor, so `remaining` and `threshold` never lag the length.
    pub fn measured(surface_id: SurfaceId, max_length: usize, current_length: usize) -> Self {
        let remaining = max_length as i64 - current_length as i64;
        Self {
            surface_id,
            current_length,
            remaining,
            threshold: threshold_for(remaining),
        }
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    pub fn current_length(&self) -> usize {
        self.current_length
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn threshold(&self) -> ThresholdLevel {
        self.threshold
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionGate {
    pub allow: bool,
    pub first_offending_surface: Option<SurfaceId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Binding {
    pub(crate) id: BindingId,
    pub(crate) form_id: FormId,
    pub(crate) kind: SurfaceKind,
    pub(crate) config: Arc<FieldCounterConfig>,
    pub(crate) counter: CounterState,
}

impl Binding {
    pub(crate) fn status_text(&self) -> String {
        render_status(
            self.config.status_template(),
            self.config.max_length(),
            &self.counter,
        )
    }
}

/// Every attached counter, keyed by attachment order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    next_binding: BindingId,
    bindings: BTreeMap<BindingId, Binding>,
    index: HashMap<SurfaceId, BindingId>,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self, surface_id: &SurfaceId) -> bool {
        self.index.contains_key(surface_id)
    }

    pub fn counter(&self, surface_id: &SurfaceId) -> Option<&CounterState> {
        self.binding(surface_id).map(|binding| &binding.counter)
    }

    pub fn binding_id(&self, surface_id: &SurfaceId) -> Option<BindingId> {
        self.index.get(surface_id).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Counters in attachment order.
    pub fn counters(&self) -> impl Iterator<Item = &CounterState> {
        self.bindings.values().map(|binding| &binding.counter)
    }

    /// Blocks when any surface of `form_id` is over its limit and its field
    /// prevents submission. The first such surface in attachment order is
    /// reported for focusing.
    pub fn gate_submission(&self, form_id: &FormId) -> SubmissionGate {
        let first_offending_surface = self
            .bindings
            .values()
            .filter(|binding| &binding.form_id == form_id)
            .find(|binding| {
                binding.counter.threshold() == ThresholdLevel::Over
                    && binding.config.prevent_submit_on_overflow()
            })
            .map(|binding| binding.counter.surface_id().clone());
        SubmissionGate {
            allow: first_offending_surface.is_none(),
            first_offending_surface,
        }
    }

    pub fn view(&self) -> ControllerViewModel {
        ControllerViewModel {
            counters: self
                .bindings
                .values()
                .map(|binding| CounterView {
                    surface_id: binding.counter.surface_id().clone(),
                    status_text: binding.status_text(),
                    threshold: binding.counter.threshold(),
                    position: binding.config.position(),
                    current_length: binding.counter.current_length(),
                    remaining: binding.counter.remaining(),
                })
                .collect(),
        }
    }

    pub(crate) fn binding(&self, surface_id: &SurfaceId) -> Option<&Binding> {
        self.index
            .get(surface_id)
            .and_then(|id| self.bindings.get(id))
    }

    pub(crate) fn insert(
        &mut self,
        surface_id: SurfaceId,
        form_id: FormId,
        kind: SurfaceKind,
        config: Arc<FieldCounterConfig>,
        content: Option<&str>,
    ) -> &Binding {
        self.next_binding += 1;
        let id = self.next_binding;
        let length = measure(&config, content);
        let counter = CounterState::measured(surface_id.clone(), config.max_length(), length);
        self.index.insert(surface_id, id);
        self.bindings.entry(id).or_insert(Binding {
            id,
            form_id,
            kind,
            config,
            counter,
        })
    }

    /// Re-measures a surface. Returns the binding only when its counter changed;
    /// reads for an unknown surface or a superseded binding are dropped.
    pub(crate) fn apply_content(
        &mut self,
        surface_id: &SurfaceId,
        binding_id: BindingId,
        content: Option<&str>,
    ) -> Option<&Binding> {
        if self.index.get(surface_id) != Some(&binding_id) {
            return None;
        }
        let binding = self.bindings.get_mut(&binding_id)?;
        let length = measure(&binding.config, content);
        let next = CounterState::measured(surface_id.clone(), binding.config.max_length(), length);
        if next == binding.counter {
            return None;
        }
        binding.counter = next;
        Some(&*binding)
    }

    pub(crate) fn remove(&mut self, surface_id: &SurfaceId) -> Option<Binding> {
        let id = self.index.remove(surface_id)?;
        self.bindings.remove(&id)
    }
}

fn measure(config: &FieldCounterConfig, content: Option<&str>) -> usize {
    normalize(content.unwrap_or_default(), config.count_markup())
}
