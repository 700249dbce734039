//! Single inbound channel of the orchestrator task.
//!
//! Commands from handles, surface events from the host, finished opens and
//! settle timers all arrive on the same unbounded channel, so they are handled
//! in the order they were sent.
//!
//! Only handles hold the channel open. Hosts, timers and open tasks keep weak
//! senders, so the orchestrator stops once the last handle is dropped.

use tokio::sync::{mpsc, oneshot};

use super::registry::PendingSnapshot;
use crate::error::Result;
use crate::host::{EventSink, SurfaceEvent};
use crate::relocator::RelocationOutcome;
use crate::types::{RelocationRequest, SurfaceId};

#[derive(Debug)]
pub(crate) enum Mail {
    Relocate(RelocationRequest),
    Opened {
        request: RelocationRequest,
        result: Result<SurfaceId>,
    },
    HighlightActive {
        snippet_text: String,
        reply: oneshot::Sender<Result<RelocationOutcome>>,
    },
    Surface(SurfaceEvent),
    SettleElapsed(SurfaceId),
    Pending(oneshot::Sender<Vec<PendingSnapshot>>),
    Shutdown,
}

/// Receiving end of the orchestrator mailbox.
///
/// Holds the one strong sender until the orchestrator hands it to a handle.
#[derive(Debug)]
pub struct Inbox {
    pub(super) tx: mpsc::UnboundedSender<Mail>,
    pub(super) rx: mpsc::UnboundedReceiver<Mail>,
}

/// Create a mailbox: the sink goes to the host, the inbox to the orchestrator.
pub fn mailbox() -> (EventSink, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink::new(tx.downgrade()), Inbox { tx, rx })
}

#[cfg(test)]
impl Inbox {
    /// Surface events queued so far, other mail discarded.
    pub(crate) fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        let mut events = Vec::new();
        while let Ok(mail) = self.rx.try_recv() {
            if let Mail::Surface(event) = mail {
                events.push(event);
            }
        }
        events
    }
}
