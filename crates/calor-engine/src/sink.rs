//! Snapshot consumers.
//!
//! The runner hands every per-step [`Snapshot`] to a [`SnapshotSink`], then
//! the final one to [`on_complete`](SnapshotSink::on_complete). Sinks are
//! the seam between the engine and reporting: the CLI's writers implement
//! this trait, as do the in-memory and channel sinks here.

use crate::snapshot::Snapshot;
use crate::status::StopReason;
use crossbeam_channel::{Receiver, Sender};
use std::error::Error;
use std::fmt;
use std::io;

// ── SinkError ──────────────────────────────────────────────────────

/// A sink could not accept a snapshot. Fails the run.
#[derive(Debug)]
pub enum SinkError {
    /// Writing to the output failed.
    Io(io::Error),
    /// The receiving end of a channel is gone.
    Disconnected,
    /// Any other sink-specific failure.
    Other {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "output error: {e}"),
            Self::Disconnected => write!(f, "snapshot receiver disconnected"),
            Self::Other { reason } => write!(f, "{reason}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SinkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── SnapshotSink ───────────────────────────────────────────────────

/// Consumer of snapshots produced by a run.
pub trait SnapshotSink {
    /// Called after every successful step.
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError>;

    /// Called once with the final snapshot when the run completes.
    ///
    /// Not called when the run fails.
    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        let _ = (snapshot, reason);
        Ok(())
    }
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &mut S {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        (**self).on_step(snapshot)
    }

    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        (**self).on_complete(snapshot, reason)
    }
}

// ── NullSink ───────────────────────────────────────────────────────

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn on_step(&mut self, _snapshot: &Snapshot) -> Result<(), SinkError> {
        Ok(())
    }
}

// ── VecSink ────────────────────────────────────────────────────────

/// Keeps every snapshot in memory.
#[derive(Clone, Debug, Default)]
pub struct VecSink {
    /// Per-step snapshots in order.
    pub steps: Vec<Snapshot>,
    /// Final snapshot and reason, once the run completes.
    pub completed: Option<(Snapshot, StopReason)>,
}

impl VecSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotSink for VecSink {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.steps.push(snapshot.clone());
        Ok(())
    }

    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        self.completed = Some((snapshot.clone(), reason));
        Ok(())
    }
}

// ── ChannelSink ────────────────────────────────────────────────────

/// Message delivered by a [`ChannelSink`].
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotEvent {
    /// A per-step snapshot.
    Step(Snapshot),
    /// The final snapshot of a completed run.
    Complete(Snapshot, StopReason),
}

/// Forwards snapshots over a crossbeam channel, for observing a run from
/// another thread.
///
/// A bounded channel applies backpressure: the runner blocks until the
/// consumer catches up. A dropped receiver fails the run with
/// [`SinkError::Disconnected`].
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: Sender<SnapshotEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(tx: Sender<SnapshotEvent>) -> Self {
        Self { tx }
    }

    /// A sink and receiver over a channel holding at most `cap` events.
    pub fn bounded(cap: usize) -> (Self, Receiver<SnapshotEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(cap);
        (Self { tx }, rx)
    }

    /// A sink and receiver over an unbounded channel.
    pub fn unbounded() -> (Self, Receiver<SnapshotEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl SnapshotSink for ChannelSink {
    fn on_step(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.tx
            .send(SnapshotEvent::Step(snapshot.clone()))
            .map_err(|_| SinkError::Disconnected)
    }

    fn on_complete(&mut self, snapshot: &Snapshot, reason: StopReason) -> Result<(), SinkError> {
        self.tx
            .send(SnapshotEvent::Complete(snapshot.clone(), reason))
            .map_err(|_| SinkError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calor_core::Iteration;
    use calor_grid::GridDims;

    fn snap(i: u64) -> Snapshot {
        Snapshot {
            iteration: Iteration(i),
            elapsed_time: i as f64,
            dims: GridDims::line(2),
            field: vec![0.0, i as f64],
        }
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink = VecSink::new();
        sink.on_step(&snap(1)).unwrap();
        sink.on_step(&snap(2)).unwrap();
        sink.on_complete(&snap(2), StopReason::MaxIterations).unwrap();
        assert_eq!(sink.steps.len(), 2);
        assert_eq!(sink.steps[1].iteration, Iteration(2));
        assert_eq!(sink.completed.unwrap().1, StopReason::MaxIterations);
    }

    #[test]
    fn channel_sink_forwards_events() {
        let (mut sink, rx) = ChannelSink::unbounded();
        sink.on_step(&snap(1)).unwrap();
        sink.on_complete(&snap(1), StopReason::SteadyState).unwrap();
        assert_eq!(rx.recv().unwrap(), SnapshotEvent::Step(snap(1)));
        assert_eq!(
            rx.recv().unwrap(),
            SnapshotEvent::Complete(snap(1), StopReason::SteadyState)
        );
    }

    #[test]
    fn channel_sink_reports_disconnect() {
        let (mut sink, rx) = ChannelSink::bounded(1);
        drop(rx);
        assert!(matches!(
            sink.on_step(&snap(1)),
            Err(SinkError::Disconnected)
        ));
    }

    #[test]
    fn io_error_is_the_source() {
        let err = SinkError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("pipe"));
    }
}
