//! Relocation orchestrator.
//!
//! The orchestrator turns a [`RelocationRequest`] into a highlight on a newly
//! opened surface. Opening is asynchronous: the surface reports "load
//! complete" some time later, and client-rendered pages keep filling in after
//! that. The flow per request is therefore:
//!
//! 1. open the target and register the request against the new surface
//! 2. on the first "load complete" for that surface, start the settle timer
//! 3. when the timer elapses, inject the relocator once
//!
//! One task owns the registry and is fed by a single [`Inbox`]. Host calls
//! never run on that task: opens, injections and active-surface highlights
//! are spawned and report back through the same mailbox, so a slow host never
//! holds up events for other surfaces.
//!
//! The task stops on [`OrchestratorHandle::shutdown`] or once every handle has
//! been dropped.

mod mailbox;
mod registry;

pub(crate) use mailbox::Mail;
pub use mailbox::{mailbox, Inbox};
pub use registry::{
    OpenOutcome, PendingRelocation, PendingSnapshot, ReadinessRegistry, RelocationState,
};

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::{EventSink, LoadStatus, SurfaceEvent, SurfaceHost};
use crate::relocator::RelocationOutcome;
use crate::types::{Ack, HighlightScope, Injection, Message, RelocationRequest, SurfaceId};

/// An orchestrator that has not started yet.
///
/// Holds the only strong sender of its mailbox until [`run`](Self::run) is
/// called; take a [`handle`](Self::handle) first, or use
/// [`spawn`](Self::spawn).
pub struct Orchestrator<H: SurfaceHost> {
    worker: Worker<H>,
    keepalive: mpsc::UnboundedSender<Mail>,
}

impl<H: SurfaceHost> Orchestrator<H> {
    pub fn new(host: Arc<H>, config: &Config, inbox: Inbox) -> Self {
        let Inbox { tx, rx } = inbox;
        Self {
            worker: Worker {
                host,
                registry: ReadinessRegistry::new(),
                tx: tx.downgrade(),
                rx,
                settle_delay: config.settle_delay(),
                activate: config.orchestrator.activate,
                scope: config.orchestrator.scope,
                active_scope: config.relocator.active_scope,
            },
            keepalive: tx,
        }
    }

    pub fn handle(&self) -> OrchestratorHandle {
        OrchestratorHandle {
            tx: self.keepalive.clone(),
        }
    }

    /// Start the task and return a handle to it.
    pub fn spawn(self) -> OrchestratorHandle {
        let handle = self.handle();
        tokio::spawn(self.run());
        handle
    }

    /// Process mail until shut down or until no handle is left.
    pub async fn run(self) {
        let Self { worker, keepalive } = self;
        drop(keepalive);
        worker.run().await;
    }
}

struct Worker<H: SurfaceHost> {
    host: Arc<H>,
    registry: ReadinessRegistry,
    tx: mpsc::WeakUnboundedSender<Mail>,
    rx: mpsc::UnboundedReceiver<Mail>,
    settle_delay: Duration,
    activate: bool,
    scope: HighlightScope,
    active_scope: HighlightScope,
}

impl<H: SurfaceHost> Worker<H> {
    async fn run(mut self) {
        debug!(
            settle_delay_ms = self.settle_delay.as_millis() as u64,
            "Orchestrator started"
        );
        while let Some(mail) = self.rx.recv().await {
            match mail {
                Mail::Relocate(request) => self.handle_relocate(request),
                Mail::Opened { request, result } => self.handle_opened(request, result),
                Mail::HighlightActive {
                    snippet_text,
                    reply,
                } => self.highlight_active(snippet_text, reply),
                Mail::Surface(event) => self.handle_surface_event(event),
                Mail::SettleElapsed(surface) => self.handle_settled(surface),
                Mail::Pending(reply) => {
                    let _ = reply.send(self.registry.snapshot());
                }
                Mail::Shutdown => break,
            }
        }
        if !self.registry.is_empty() {
            info!(
                pending = self.registry.len(),
                "Orchestrator stopped with relocations in flight"
            );
        }
        debug!("Orchestrator stopped");
    }

    fn handle_relocate(&mut self, request: RelocationRequest) {
        self.registry.begin_open();
        let host = self.host.clone();
        let tx = self.tx.clone();
        let activate = self.activate;
        tokio::spawn(async move {
            let result = host.open(&request.target, activate).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Mail::Opened { request, result });
            }
        });
    }

    fn handle_opened(&mut self, request: RelocationRequest, result: Result<SurfaceId>) {
        let surface = match result {
            Ok(surface) => surface,
            Err(e) => {
                self.registry.abandon_open();
                warn!(
                    request_id = %request.id,
                    target = %request.target,
                    "Failed to open surface: {}",
                    e
                );
                return;
            }
        };
        let request_id = request.id;
        let target = request.target.clone();
        match self.registry.finish_open(surface, request) {
            OpenOutcome::Waiting => info!(
                request_id = %request_id,
                surface = %surface,
                target = %target,
                "Opened surface for relocation"
            ),
            OpenOutcome::Ready(_) => {
                debug!(request_id = %request_id, surface = %surface, "Surface ready, settling");
                self.schedule_settle(surface);
            }
            OpenOutcome::Closed => info!(
                request_id = %request_id,
                surface = %surface,
                "Surface closed before highlight"
            ),
        }
    }

    fn handle_surface_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Updated {
                surface,
                status: LoadStatus::Complete,
            } => match self.registry.mark_ready(surface) {
                Some(request_id) => {
                    debug!(request_id = %request_id, surface = %surface, "Surface ready, settling");
                    self.schedule_settle(surface);
                }
                None => debug!(surface = %surface, "Ignoring load event"),
            },
            SurfaceEvent::Updated { .. } => {}
            SurfaceEvent::Removed { surface } => {
                if let Some(evicted) = self.registry.evict(surface) {
                    info!(
                        request_id = %evicted.request.id,
                        surface = %surface,
                        "Surface closed before highlight"
                    );
                }
            }
        }
    }

    fn schedule_settle(&self, surface: SurfaceId) {
        let tx = self.tx.clone();
        let delay = self.settle_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Mail::SettleElapsed(surface));
            }
        });
    }

    fn handle_settled(&mut self, surface: SurfaceId) {
        let Some(pending) = self.registry.take_dispatched(surface) else {
            debug!(surface = %surface, "Nothing left to inject");
            return;
        };
        let request_id = pending.request.id;
        let injection = Injection {
            snippet_text: pending.request.snippet_text,
            scope: self.scope,
        };

        let host = self.host.clone();
        tokio::spawn(async move {
            match host.inject(surface, injection).await {
                Ok(outcome) => info!(
                    request_id = %request_id,
                    surface = %surface,
                    found = outcome.is_found(),
                    phrase = outcome.phrase().unwrap_or(""),
                    "Relocation injected"
                ),
                Err(Error::StaleTarget(_)) => debug!(
                    request_id = %request_id,
                    surface = %surface,
                    "Surface gone at injection"
                ),
                Err(e) => warn!(
                    request_id = %request_id,
                    surface = %surface,
                    "Injection failed: {}",
                    e
                ),
            }
        });
    }

    fn highlight_active(
        &self,
        snippet_text: String,
        reply: oneshot::Sender<Result<RelocationOutcome>>,
    ) {
        let host = self.host.clone();
        let scope = self.active_scope;
        tokio::spawn(async move {
            let _ = reply.send(inject_active(host.as_ref(), snippet_text, scope).await);
        });
    }
}

async fn inject_active<H: SurfaceHost>(
    host: &H,
    snippet_text: String,
    scope: HighlightScope,
) -> Result<RelocationOutcome> {
    let surface = host.active_surface().await?;
    let injection = Injection {
        snippet_text,
        scope,
    };
    match host.inject(surface, injection).await {
        Err(Error::StaleTarget(_)) => {
            debug!(surface = %surface, "Active surface went away");
            Ok(RelocationOutcome::NotFound)
        }
        other => other,
    }
}

/// Cloneable handle for talking to a running orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Mail>,
}

impl OrchestratorHandle {
    /// Queue a relocation. The ack only means the request was received.
    pub fn relocate(&self, request: RelocationRequest) -> Ack {
        debug!(request_id = %request.id, target = %request.target, "Relocation requested");
        if self.tx.send(Mail::Relocate(request)).is_ok() {
            Ack::received()
        } else {
            Ack::rejected()
        }
    }

    /// Handle an inbound [`Message`].
    pub fn dispatch(&self, message: Message) -> Ack {
        self.relocate(message.into())
    }

    /// Highlight `snippet_text` on the foreground surface right away.
    pub async fn highlight_active(
        &self,
        snippet_text: impl Into<String>,
    ) -> Result<RelocationOutcome> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Mail::HighlightActive {
                snippet_text: snippet_text.into(),
                reply,
            })
            .map_err(|_| Error::OrchestratorClosed)?;
        rx.await.map_err(|_| Error::OrchestratorClosed)?
    }

    /// Relocations still waiting for their surface.
    pub async fn pending(&self) -> Result<Vec<PendingSnapshot>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Mail::Pending(reply))
            .map_err(|_| Error::OrchestratorClosed)?;
        rx.await.map_err(|_| Error::OrchestratorClosed)
    }

    /// Sink for host events, for hosts created after the orchestrator.
    pub fn event_sink(&self) -> EventSink {
        EventSink::new(self.tx.downgrade())
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(Mail::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ContentDocument, Document};
    use crate::host::MemoryHost;
    use crate::relocator::Relocator;
    use crate::types::TargetAddress;
    use tokio::time::{sleep, timeout};

    const A: &str = "https://a.test/mills";
    const B: &str = "https://b.test/rivers";
    const MILL_SNIPPET: &str = "The mill was built in 1821 and ground grain for the village.";

    fn page_a() -> Document {
        Document::from_text(
            "Mills",
            "# Mills\n\nThe mill was built in 1821 and ground grain for the village.\n\nIt closed in 1950.",
        )
    }

    fn page_b() -> Document {
        Document::from_text(
            "Rivers",
            "The mill was built in 1821 and ground grain for the village.\n\nRivers powered it.",
        )
    }

    fn memory_host(sink: EventSink, config: &Config) -> MemoryHost {
        MemoryHost::new(sink, Relocator::new(&config.relocator))
            .with_page(A, page_a())
            .with_page(B, page_b())
    }

    fn setup(config: &Config) -> (Arc<MemoryHost>, OrchestratorHandle) {
        let (sink, inbox) = mailbox();
        let host = Arc::new(memory_host(sink, config));
        let handle = Orchestrator::new(host.clone(), config, inbox).spawn();
        (host, handle)
    }

    /// Host whose calls for one address take `delay` before reaching the
    /// in-memory host.
    struct SlowHost {
        inner: Arc<MemoryHost>,
        slow: TargetAddress,
        open_delay: Duration,
        inject_delay: Duration,
    }

    #[async_trait::async_trait]
    impl SurfaceHost for SlowHost {
        async fn open(&self, address: &TargetAddress, active: bool) -> Result<SurfaceId> {
            if *address == self.slow {
                sleep(self.open_delay).await;
            }
            self.inner.open(address, active).await
        }

        async fn active_surface(&self) -> Result<SurfaceId> {
            self.inner.active_surface().await
        }

        async fn inject(
            &self,
            surface: SurfaceId,
            injection: Injection,
        ) -> Result<RelocationOutcome> {
            let slow = self
                .inner
                .surfaces()
                .await
                .iter()
                .any(|(id, address)| *id == surface && *address == self.slow);
            if slow {
                sleep(self.inject_delay).await;
            }
            self.inner.inject(surface, injection).await
        }
    }

    fn setup_slow(
        slow: &str,
        open_delay: Duration,
        inject_delay: Duration,
    ) -> (Arc<MemoryHost>, OrchestratorHandle) {
        let config = Config::default();
        let (sink, inbox) = mailbox();
        let inner = Arc::new(memory_host(sink, &config));
        let host = Arc::new(SlowHost {
            inner: inner.clone(),
            slow: TargetAddress::from(slow),
            open_delay,
            inject_delay,
        });
        let handle = Orchestrator::new(host, &config, inbox).spawn();
        (inner, handle)
    }

    /// Let spawned opens report back, then read the registry.
    async fn opened(handle: &OrchestratorHandle) -> Vec<PendingSnapshot> {
        sleep(Duration::from_millis(1)).await;
        handle.pending().await.unwrap()
    }

    async fn surface_for(host: &MemoryHost, target: &str) -> SurfaceId {
        host.surfaces()
            .await
            .into_iter()
            .find(|(_, address)| address.as_str() == target)
            .map(|(id, _)| id)
            .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_relocate_acks_before_load() {
        let (host, handle) = setup(&Config::default());

        let ack = handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        assert!(ack.success);

        let pending = opened(&handle).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].state, RelocationState::AwaitingReady);
        assert_eq!(pending[0].target.as_str(), A);
        assert_eq!(host.inject_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_injects_after_settle_delay() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        host.finish_loading(surface);
        sleep(Duration::from_millis(1900)).await;
        assert_eq!(host.inject_calls(), 0);
        let pending = handle.pending().await.unwrap();
        assert_eq!(pending[0].state, RelocationState::Dispatched);

        sleep(Duration::from_millis(200)).await;
        assert_eq!(host.inject_calls(), 1);
        assert!(handle.pending().await.unwrap().is_empty());

        let doc = host.document(surface).await.unwrap();
        let marks = doc.marks();
        assert_eq!(marks.len(), 1);
        assert_eq!(doc.text_content(marks[0]), &MILL_SNIPPET[4..]);
        assert!(doc.scrolled_to().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_load_events_inject_once() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        host.finish_loading(surface);
        host.finish_loading(surface);
        sleep(Duration::from_millis(2500)).await;
        host.finish_loading(surface);
        sleep(Duration::from_millis(2500)).await;

        assert_eq!(host.inject_calls(), 1);
        assert_eq!(host.document(surface).await.unwrap().marks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_surface_load_does_not_trigger() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        handle.relocate(RelocationRequest::new(B, MILL_SNIPPET));
        opened(&handle).await;
        let a = surface_for(&host, A).await;
        let b = surface_for(&host, B).await;

        host.finish_loading(b);
        sleep(Duration::from_millis(2500)).await;

        assert_eq!(host.inject_calls(), 1);
        assert_eq!(host.document(b).await.unwrap().marks().len(), 1);
        assert!(host.document(a).await.unwrap().marks().is_empty());

        let pending = handle.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].surface, a);
        assert_eq!(pending[0].state, RelocationState::AwaitingReady);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_before_load_is_evicted() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        assert!(host.close(surface).await);
        assert!(handle.pending().await.unwrap().is_empty());

        host.finish_loading(surface);
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(host.inject_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_during_settle_skips_injection() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        host.finish_loading(surface);
        sleep(Duration::from_millis(500)).await;
        host.close(surface).await;
        assert!(handle.pending().await.unwrap().is_empty());

        sleep(Duration::from_millis(2000)).await;
        assert_eq!(host.inject_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_injection_is_swallowed() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        host.finish_loading(surface);
        sleep(Duration::from_millis(500)).await;
        // No Removed event: the injection itself discovers the surface is gone.
        host.discard(surface).await;
        sleep(Duration::from_millis(2000)).await;
        assert_eq!(host.inject_calls(), 1);

        // Still serving.
        assert!(handle.relocate(RelocationRequest::new(B, MILL_SNIPPET)).success);
        opened(&handle).await;
        let b = surface_for(&host, B).await;
        host.finish_loading(b);
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(host.inject_calls(), 2);
        assert_eq!(host.document(b).await.unwrap().marks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_failure_registers_nothing() {
        let (host, handle) = setup(&Config::default());

        let ack = handle.relocate(RelocationRequest::new("https://missing.test", MILL_SNIPPET));
        assert!(ack.success);
        assert!(opened(&handle).await.is_empty());
        assert!(host.surfaces().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_message_from_json() {
        let (host, handle) = setup(&Config::default());
        let message: Message = serde_json::from_str(&format!(
            r#"{{"action":"open_and_highlight","url":"{A}","snippet":"{MILL_SNIPPET}"}}"#
        ))
        .unwrap();

        assert!(handle.dispatch(message).success);
        opened(&handle).await;
        let surface = surface_for(&host, A).await;
        host.finish_loading(surface);
        sleep(Duration::from_millis(2500)).await;
        assert_eq!(host.document(surface).await.unwrap().marks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_settle_delay_and_scope() {
        let mut config = Config::default();
        config.orchestrator.settle_delay_ms = 100;
        config.orchestrator.scope = HighlightScope::ContainingBlock;
        let (host, handle) = setup(&config);
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        host.finish_loading(surface);
        sleep(Duration::from_millis(150)).await;
        assert_eq!(host.inject_calls(), 1);

        let doc = host.document(surface).await.unwrap();
        assert!(doc.marks().is_empty());
        let highlighted = doc.highlighted();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(doc.tag_name(highlighted[0]), Some("P"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_active_uses_block_scope() {
        let (host, handle) = setup(&Config::default());
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let surface = surface_for(&host, A).await;

        let outcome = handle.highlight_active("It closed in 1950").await.unwrap();
        assert!(matches!(outcome, RelocationOutcome::Block { .. }));
        let doc = host.document(surface).await.unwrap();
        let node = outcome.node().unwrap();
        assert_eq!(doc.style(node, "background-color"), Some("#faec5a"));
        assert_eq!(doc.style(node, "padding"), Some("4px"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_highlight_active_without_surface() {
        let (_host, handle) = setup(&Config::default());
        let result = handle.highlight_active(MILL_SNIPPET).await;
        assert!(matches!(result, Err(Error::NoActiveSurface)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_open_does_not_block_other_surfaces() {
        let (host, handle) = setup_slow(B, Duration::from_secs(10), Duration::ZERO);
        handle.relocate(RelocationRequest::new(B, MILL_SNIPPET));
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let a = surface_for(&host, A).await;

        host.finish_loading(a);
        sleep(Duration::from_millis(2100)).await;
        assert_eq!(host.inject_calls(), 1);
        assert_eq!(host.document(a).await.unwrap().marks().len(), 1);
        assert_eq!(host.surfaces().await.len(), 1);

        sleep(Duration::from_secs(8)).await;
        let pending = handle.pending().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].target.as_str(), B);
        assert_eq!(pending[0].state, RelocationState::AwaitingReady);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_injection_does_not_block_other_surfaces() {
        let (host, handle) = setup_slow(B, Duration::ZERO, Duration::from_secs(10));
        handle.relocate(RelocationRequest::new(B, MILL_SNIPPET));
        opened(&handle).await;
        let b = surface_for(&host, B).await;
        host.finish_loading(b);

        sleep(Duration::from_millis(2100)).await;
        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&handle).await;
        let a = surface_for(&host, A).await;
        host.finish_loading(a);

        sleep(Duration::from_millis(2100)).await;
        assert_eq!(host.inject_calls(), 1);
        assert_eq!(host.document(a).await.unwrap().marks().len(), 1);
        assert!(host.document(b).await.unwrap().marks().is_empty());

        sleep(Duration::from_secs(8)).await;
        assert_eq!(host.inject_calls(), 2);
        assert_eq!(host.document(b).await.unwrap().marks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_reported_during_open_still_counts() {
        let config = Config::default();
        let (sink, inbox) = mailbox();
        let host = Arc::new(memory_host(sink, &config).with_auto_complete());
        let handle = Orchestrator::new(host.clone(), &config, inbox).spawn();

        handle.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        let pending = opened(&handle).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].state, RelocationState::Dispatched);

        sleep(Duration::from_millis(2100)).await;
        let surface = surface_for(&host, A).await;
        assert_eq!(host.inject_calls(), 1);
        assert_eq!(host.document(surface).await.unwrap().marks().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_handles_dropped() {
        let config = Config::default();
        let (sink, inbox) = mailbox();
        let host = Arc::new(memory_host(sink, &config));
        let orchestrator = Orchestrator::new(host.clone(), &config, inbox);
        let handle = orchestrator.handle();
        let task = tokio::spawn(orchestrator.run());

        let second = handle.clone();
        second.relocate(RelocationRequest::new(A, MILL_SNIPPET));
        opened(&second).await;
        let surface = surface_for(&host, A).await;
        host.finish_loading(surface);
        drop(handle);
        assert_eq!(opened(&second).await[0].state, RelocationState::Dispatched);

        drop(second);
        assert!(timeout(Duration::from_secs(1), task).await.is_ok());

        // The pending settle timer finds nobody to deliver to.
        sleep(Duration::from_secs(3)).await;
        assert_eq!(host.inject_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_rejects_further_requests() {
        let (_host, handle) = setup(&Config::default());
        handle.shutdown();
        sleep(Duration::from_millis(1)).await;

        assert!(!handle.relocate(RelocationRequest::new(A, MILL_SNIPPET)).success);
        assert!(matches!(handle.pending().await, Err(Error::OrchestratorClosed)));
    }
}
