use std::collections::VecDeque;

use counter_core::{BindingId, SurfaceId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredRead {
    pub surface_id: SurfaceId,
    pub binding: BindingId,
}

/// Zero-delay reads waiting for the current turn of the event loop to finish.
#[derive(Debug, Default)]
pub struct DeferredReads {
    queue: VecDeque<DeferredRead>,
}

impl DeferredReads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, surface_id: SurfaceId, binding: BindingId) {
        self.queue.push_back(DeferredRead {
            surface_id,
            binding,
        });
    }

    /// Drops every pending read of `surface_id`, returning how many were dropped.
    pub fn cancel(&mut self, surface_id: &SurfaceId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|read| &read.surface_id != surface_id);
        before - self.queue.len()
    }

    /// Takes the reads that are due this turn. Reads scheduled while running
    /// them wait for the next turn.
    pub fn take_due(&mut self) -> Vec<DeferredRead> {
        self.queue.drain(..).collect()
    }

    pub fn is_pending(&self, surface_id: &SurfaceId) -> bool {
        self.queue.iter().any(|read| &read.surface_id == surface_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
