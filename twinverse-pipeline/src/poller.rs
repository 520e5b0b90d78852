//! Status poller
//!
//! Owns the repeated status query for one submitted job. The poller is an
//! owned resource: whoever starts it holds a [`StatusPoller`] handle, and
//! dropping or stopping that handle deterministically ends the polling
//! session. A stale query resolving after `stop()` is a no-op.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

use twinverse_client::{ClientError, StageService};
use twinverse_core::domain::JobHandle;

/// Default cadence between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Events emitted by a polling session, in query order.
///
/// A session emits zero or more `Update`s followed by at most one of
/// `Terminal` or `QueryError`, then closes the channel. `QueryError` means
/// the status query itself failed (network/protocol). A job whose reported
/// status is `failed` is a different failure class and arrives as
/// `Terminal` with a failed handle.
#[derive(Debug)]
pub enum PollEvent {
    Update(JobHandle),
    Terminal(JobHandle),
    QueryError(ClientError),
}

/// Handle to one polling task.
///
/// Queries are strictly sequential: the next query is not issued until the
/// previous response (or error) has been applied, so statuses can never
/// regress out of order within a session.
pub struct StatusPoller {
    task: JoinHandle<()>,
    stopped: Arc<AtomicBool>,
}

impl StatusPoller {
    /// Starts polling `handle`'s job every `interval`.
    ///
    /// The first query fires one full interval after the call, matching the
    /// behavior of the creation views this replaces. Returns the poller
    /// handle and the event stream for the session.
    pub fn start(
        service: Arc<dyn StageService>,
        handle: JobHandle,
        interval: Duration,
    ) -> (Self, UnboundedReceiver<PollEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let stopped = Arc::new(AtomicBool::new(false));

        let task = tokio::spawn(poll_loop(
            service,
            handle,
            interval,
            events,
            Arc::clone(&stopped),
        ));

        (Self { task, stopped }, receiver)
    }

    /// Cancels the polling session.
    ///
    /// Idempotent and safe after natural termination. The loop re-checks
    /// the stop flag before every send, so at most one event already past
    /// that check can still reach a receiver that is kept open; dropping
    /// the receiver alongside this call closes the session completely.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.task.is_finished()
    }
}

impl Drop for StatusPoller {
    // Every exit path releases the timer, including panics and early returns
    // in the owning view.
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    service: Arc<dyn StageService>,
    mut handle: JobHandle,
    interval: Duration,
    events: UnboundedSender<PollEvent>,
    stopped: Arc<AtomicBool>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; consume it so the first query
    // lands one interval after submission.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if stopped.load(Ordering::SeqCst) {
            break;
        }

        debug!(stage = %handle.stage(), job = %handle.id(), "querying job status");
        let outcome = service.get_status(handle.stage(), handle.id()).await;

        // A response that lands after cancellation belongs to a superseded
        // session and must not surface.
        if stopped.load(Ordering::SeqCst) {
            break;
        }

        let report = match outcome {
            Ok(report) => report,
            Err(err) => {
                warn!(job = %handle.id(), error = %err, "status query failed, ending session");
                send_unless_stopped(&events, &stopped, PollEvent::QueryError(err));
                break;
            }
        };

        if let Err(err) = handle.apply(&report) {
            warn!(job = %handle.id(), error = %err, "malformed status report, ending session");
            send_unless_stopped(
                &events,
                &stopped,
                PollEvent::QueryError(ClientError::ParseError(err.to_string())),
            );
            break;
        }

        if handle.is_terminal() {
            debug!(job = %handle.id(), status = %handle.status(), "job reached terminal status");
            send_unless_stopped(&events, &stopped, PollEvent::Terminal(handle.clone()));
            break;
        }

        send_unless_stopped(&events, &stopped, PollEvent::Update(handle.clone()));
    }
}

// An abort only lands at the next await point, so on a multi-threaded
// runtime `stop()` can race a send that already passed the post-query
// check. Re-reading the flag here keeps that window to a single load.
fn send_unless_stopped(
    events: &UnboundedSender<PollEvent>,
    stopped: &AtomicBool,
    event: PollEvent,
) {
    if !stopped.load(Ordering::SeqCst) {
        let _ = events.send(event);
    }
}
