use crate::error::NegotiationError;
use std::collections::VecDeque;
use tandem_core::IceCandidate;
use tracing::warn;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub applied: usize,
    pub failed: usize,
}

/// Remote candidates that arrived before the remote description was set.
/// Owned by one session instance.
#[derive(Debug, Default)]
pub struct CandidateBuffer {
    pending: VecDeque<IceCandidate>,
    flushed: bool,
}

impl CandidateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, candidate: IceCandidate) {
        self.pending.push_back(candidate);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    /// Hand every buffered candidate to `apply` in arrival order, then clear.
    /// Only the first call per instance does anything.
    pub fn flush<F>(&mut self, mut apply: F) -> FlushReport
    where
        F: FnMut(IceCandidate) -> Result<(), NegotiationError>,
    {
        let mut report = FlushReport::default();
        if self.flushed {
            return report;
        }
        self.flushed = true;

        for candidate in self.pending.drain(..) {
            match apply(candidate) {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    warn!("Buffered candidate rejected: {}", e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
