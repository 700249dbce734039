//! Content surface host seam.
//!
//! A host owns the content surfaces (browser tabs, webviews) the orchestrator
//! opens and injects into. Hosts report lifecycle changes through an
//! [`EventSink`]; the orchestrator never polls.
//!
//! [`MemoryHost`] keeps every surface as an in-process [`Document`] and runs
//! the [`Relocator`] directly on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::orchestrator::Mail;
use crate::relocator::{RelocationOutcome, Relocator};
use crate::types::{Injection, SurfaceId, TargetAddress};

/// Load progress of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// Lifecycle notification from a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurfaceEvent {
    Updated { surface: SurfaceId, status: LoadStatus },
    Removed { surface: SurfaceId },
}

impl SurfaceEvent {
    pub fn surface(&self) -> SurfaceId {
        match self {
            SurfaceEvent::Updated { surface, .. } | SurfaceEvent::Removed { surface } => *surface,
        }
    }
}

/// Where a host delivers [`SurfaceEvent`]s.
///
/// The sink does not keep the orchestrator alive: a host owned by the
/// orchestrator would otherwise never let it stop.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::WeakUnboundedSender<Mail>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::WeakUnboundedSender<Mail>) -> Self {
        Self { tx }
    }

    /// Deliver an event. Returns false once the orchestrator has stopped.
    pub fn send(&self, event: SurfaceEvent) -> bool {
        self.tx
            .upgrade()
            .is_some_and(|tx| tx.send(Mail::Surface(event)).is_ok())
    }

    pub fn loaded(&self, surface: SurfaceId) -> bool {
        self.send(SurfaceEvent::Updated {
            surface,
            status: LoadStatus::Complete,
        })
    }

    pub fn removed(&self, surface: SurfaceId) -> bool {
        self.send(SurfaceEvent::Removed { surface })
    }
}

/// Operations the orchestrator needs from a surface host.
#[async_trait]
pub trait SurfaceHost: Send + Sync + 'static {
    /// Open a new surface on `address`, optionally bringing it to the foreground.
    async fn open(&self, address: &TargetAddress, active: bool) -> Result<SurfaceId>;

    /// The surface currently in the foreground.
    async fn active_surface(&self) -> Result<SurfaceId>;

    /// Run the relocator inside `surface`.
    ///
    /// Fails with [`Error::StaleTarget`] if the surface no longer exists.
    async fn inject(&self, surface: SurfaceId, injection: Injection) -> Result<RelocationOutcome>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory host
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct MemorySurface {
    address: TargetAddress,
    document: Document,
}

/// Host that serves pages from an in-process catalogue.
pub struct MemoryHost {
    pages: HashMap<TargetAddress, Document>,
    surfaces: Mutex<HashMap<SurfaceId, MemorySurface>>,
    active: Mutex<Option<SurfaceId>>,
    next_id: AtomicU64,
    inject_calls: AtomicUsize,
    auto_complete: bool,
    relocator: Relocator,
    events: EventSink,
}

impl MemoryHost {
    pub fn new(events: EventSink, relocator: Relocator) -> Self {
        Self {
            pages: HashMap::new(),
            surfaces: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            next_id: AtomicU64::new(1),
            inject_calls: AtomicUsize::new(0),
            auto_complete: false,
            relocator,
            events,
        }
    }

    /// Report "load complete" right after every open.
    pub fn with_auto_complete(mut self) -> Self {
        self.auto_complete = true;
        self
    }

    /// Add a page to the catalogue.
    pub fn with_page(mut self, address: impl Into<TargetAddress>, document: Document) -> Self {
        self.pages.insert(address.into(), document);
        self
    }

    /// Report that `surface` finished loading.
    pub fn finish_loading(&self, surface: SurfaceId) {
        if !self.events.loaded(surface) {
            warn!("Orchestrator gone, dropping load event for {}", surface);
        }
    }

    /// Close a surface and tell the orchestrator.
    pub async fn close(&self, surface: SurfaceId) -> bool {
        let existed = self.discard(surface).await;
        if existed {
            self.events.removed(surface);
        }
        existed
    }

    /// Drop a surface without any notification, as when a page navigates away.
    pub async fn discard(&self, surface: SurfaceId) -> bool {
        let existed = self.surfaces.lock().await.remove(&surface).is_some();
        let mut active = self.active.lock().await;
        if *active == Some(surface) {
            *active = None;
        }
        existed
    }

    /// Open surfaces, ordered by id.
    pub async fn surfaces(&self) -> Vec<(SurfaceId, TargetAddress)> {
        let surfaces = self.surfaces.lock().await;
        let mut out: Vec<_> = surfaces
            .iter()
            .map(|(id, s)| (*id, s.address.clone()))
            .collect();
        out.sort_by_key(|(id, _)| *id);
        out
    }

    /// Copy of the live document of a surface.
    pub async fn document(&self, surface: SurfaceId) -> Option<Document> {
        self.surfaces
            .lock()
            .await
            .get(&surface)
            .map(|s| s.document.clone())
    }

    /// Number of `inject` calls, including ones into stale surfaces.
    pub fn inject_calls(&self) -> usize {
        self.inject_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SurfaceHost for MemoryHost {
    async fn open(&self, address: &TargetAddress, active: bool) -> Result<SurfaceId> {
        let document = self
            .pages
            .get(address)
            .cloned()
            .ok_or_else(|| Error::SurfaceNotFound(address.to_string()))?;

        let id = SurfaceId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.surfaces.lock().await.insert(
            id,
            MemorySurface {
                address: address.clone(),
                document,
            },
        );
        if active {
            *self.active.lock().await = Some(id);
        }
        debug!(surface = %id, address = %address, "Opened surface");

        self.events.send(SurfaceEvent::Updated {
            surface: id,
            status: LoadStatus::Loading,
        });
        if self.auto_complete {
            self.events.loaded(id);
        }
        Ok(id)
    }

    async fn active_surface(&self) -> Result<SurfaceId> {
        self.active.lock().await.ok_or(Error::NoActiveSurface)
    }

    async fn inject(&self, surface: SurfaceId, injection: Injection) -> Result<RelocationOutcome> {
        let mut surfaces = self.surfaces.lock().await;
        self.inject_calls.fetch_add(1, Ordering::SeqCst);
        let target = surfaces
            .get_mut(&surface)
            .ok_or(Error::StaleTarget(surface))?;
        Ok(self
            .relocator
            .locate(&mut target.document, &injection.snippet_text, injection.scope))
    }
}
