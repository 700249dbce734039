//! Pending relocations keyed by surface.
//!
//! Each entry moves through `AwaitingReady → Dispatched` exactly once and is
//! removed when its injection runs or its surface disappears, so the registry
//! only ever holds relocations that are still in flight.
//!
//! Opens run concurrently with event delivery, so a host may report "load
//! complete" or "removed" for a surface before its open has been recorded.
//! Such events are held while any open is in flight and dropped once none is.

use serde::Serialize;
use std::collections::HashMap;

use crate::types::{RelocationRequest, RequestId, SurfaceId, TargetAddress};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationState {
    /// Waiting for the surface's first "load complete".
    AwaitingReady,
    /// Ready signal consumed; waiting out the settle delay before injection.
    Dispatched,
}

#[derive(Debug, Clone)]
pub struct PendingRelocation {
    pub request: RelocationRequest,
    pub state: RelocationState,
}

/// Read-only view of a registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSnapshot {
    pub surface: SurfaceId,
    pub request_id: RequestId,
    pub target: TargetAddress,
    pub state: RelocationState,
}

/// What a finished open turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// Registered, waiting for "load complete".
    Waiting,
    /// The surface was already loaded; the settle delay starts now.
    Ready(RequestId),
    /// The surface was closed while opening; nothing registered.
    Closed,
}

/// Event seen for a surface whose open had not finished yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EarlyEvent {
    Ready,
    Removed,
}

#[derive(Debug, Default)]
pub struct ReadinessRegistry {
    entries: HashMap<SurfaceId, PendingRelocation>,
    early: HashMap<SurfaceId, EarlyEvent>,
    opening: usize,
}

impl ReadinessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start waiting for `surface` to load. Returns any entry it replaced.
    pub fn register(
        &mut self,
        surface: SurfaceId,
        request: RelocationRequest,
    ) -> Option<PendingRelocation> {
        self.entries.insert(
            surface,
            PendingRelocation {
                request,
                state: RelocationState::AwaitingReady,
            },
        )
    }

    /// Note that an open has started.
    pub fn begin_open(&mut self) {
        self.opening += 1;
    }

    /// Record a surface opened after [`begin_open`](Self::begin_open),
    /// applying any event that arrived for it first.
    pub fn finish_open(&mut self, surface: SurfaceId, request: RelocationRequest) -> OpenOutcome {
        let early = self.early.remove(&surface);
        self.end_open();
        match early {
            Some(EarlyEvent::Removed) => OpenOutcome::Closed,
            Some(EarlyEvent::Ready) => {
                let id = request.id;
                self.entries.insert(
                    surface,
                    PendingRelocation {
                        request,
                        state: RelocationState::Dispatched,
                    },
                );
                OpenOutcome::Ready(id)
            }
            None => {
                self.register(surface, request);
                OpenOutcome::Waiting
            }
        }
    }

    /// Note that an open failed.
    pub fn abandon_open(&mut self) {
        self.end_open();
    }

    fn end_open(&mut self) {
        self.opening = self.opening.saturating_sub(1);
        if self.opening == 0 {
            self.early.clear();
        }
    }

    /// Consume the ready signal for `surface`.
    ///
    /// Returns the request id only on the `AwaitingReady → Dispatched`
    /// transition; unknown surfaces and repeated signals yield `None`.
    pub fn mark_ready(&mut self, surface: SurfaceId) -> Option<RequestId> {
        let Some(entry) = self.entries.get_mut(&surface) else {
            if self.opening > 0 {
                self.early.entry(surface).or_insert(EarlyEvent::Ready);
            }
            return None;
        };
        if entry.state != RelocationState::AwaitingReady {
            return None;
        }
        entry.state = RelocationState::Dispatched;
        Some(entry.request.id)
    }

    /// Remove a dispatched entry so its injection can run.
    pub fn take_dispatched(&mut self, surface: SurfaceId) -> Option<PendingRelocation> {
        match self.entries.get(&surface) {
            Some(entry) if entry.state == RelocationState::Dispatched => {
                self.entries.remove(&surface)
            }
            _ => None,
        }
    }

    /// Drop whatever is pending for a surface that went away.
    pub fn evict(&mut self, surface: SurfaceId) -> Option<PendingRelocation> {
        let evicted = self.entries.remove(&surface);
        if evicted.is_none() && self.opening > 0 {
            self.early.insert(surface, EarlyEvent::Removed);
        }
        evicted
    }

    pub fn state(&self, surface: SurfaceId) -> Option<RelocationState> {
        self.entries.get(&surface).map(|e| e.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by surface.
    pub fn snapshot(&self) -> Vec<PendingSnapshot> {
        let mut out: Vec<PendingSnapshot> = self
            .entries
            .iter()
            .map(|(surface, entry)| PendingSnapshot {
                surface: *surface,
                request_id: entry.request.id,
                target: entry.request.target.clone(),
                state: entry.state,
            })
            .collect();
        out.sort_by_key(|s| s.surface);
        out
    }
}
