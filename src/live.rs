//! Live dashboard
//!
//! Keeps a `DashboardReport` current by recomputing it from a fresh snapshot
//! whenever the store announces a change. There is no incremental merge:
//! each refresh is "fetch snapshot, aggregate".

use std::ops::ControlFlow;

use crate::error::FintrackResult;
use crate::models::{DateRange, Transaction};
use crate::reports::DashboardReport;
use crate::storage::{ChangeEvent, Storage, Subscription};

/// Anything that can hand out a full, ordered transaction snapshot
pub trait SnapshotSource {
    fn snapshot(&self) -> FintrackResult<Vec<Transaction>>;
}

impl SnapshotSource for Storage {
    fn snapshot(&self) -> FintrackResult<Vec<Transaction>> {
        self.transactions.get_all()
    }
}

impl SnapshotSource for Vec<Transaction> {
    fn snapshot(&self) -> FintrackResult<Vec<Transaction>> {
        Ok(self.clone())
    }
}

/// A dashboard that follows a change feed
pub struct LiveDashboard<'a, S: SnapshotSource + ?Sized> {
    source: &'a S,
    range: DateRange,
    report: DashboardReport,
    refreshes: usize,
}

impl<'a, S: SnapshotSource + ?Sized> LiveDashboard<'a, S> {
    /// Build the initial report
    pub fn new(source: &'a S, range: DateRange) -> FintrackResult<Self> {
        let report = DashboardReport::generate(&source.snapshot()?, range);
        Ok(Self {
            source,
            range,
            report,
            refreshes: 1,
        })
    }

    pub fn report(&self) -> &DashboardReport {
        &self.report
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// Number of recomputations so far, including the initial one
    pub fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// Recompute from a fresh snapshot
    pub fn refresh(&mut self) -> FintrackResult<&DashboardReport> {
        let snapshot = self.source.snapshot()?;
        self.report = DashboardReport::generate(&snapshot, self.range);
        self.refreshes += 1;
        Ok(&self.report)
    }

    /// Switch to another range and recompute
    pub fn set_range(&mut self, range: DateRange) -> FintrackResult<&DashboardReport> {
        self.range = range;
        self.refresh()
    }

    /// Apply any queued events with at most one recomputation
    ///
    /// Returns the events that were consumed.
    pub fn catch_up(&mut self, subscription: &Subscription) -> FintrackResult<Vec<ChangeEvent>> {
        let events = subscription.drain();
        if !events.is_empty() {
            tracing::debug!(events = events.len(), "Catching up with store changes");
            self.refresh()?;
        }
        Ok(events)
    }

    /// Block on the subscription, recomputing after each burst of events
    ///
    /// Stops when `on_update` breaks or the feed goes away.
    pub fn run<F>(&mut self, subscription: &Subscription, mut on_update: F) -> FintrackResult<()>
    where
        F: FnMut(&DashboardReport) -> ControlFlow<()>,
    {
        while let Some(first) = subscription.recv() {
            let coalesced = 1 + subscription.drain().len();
            tracing::debug!(?first, coalesced, "Store changed");

            self.refresh()?;
            if on_update(&self.report).is_break() {
                break;
            }
        }
        Ok(())
    }
}
