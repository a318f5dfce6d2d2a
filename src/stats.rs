// src/stats.rs
use crate::lifecycle::Request;
use tracing::debug;

/// Timing of one completed request, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestStats {
    pub block: u32,
    pub index: usize,
    pub seek: u64,
    pub rotate: u64,
    pub transfer: u64,
    pub total: u64,
}

impl RequestStats {
    /// `None` until the request is done.
    pub fn from_request(req: &Request) -> Option<Self> {
        let completed = req.completed_at?;
        Some(RequestStats {
            block: req.block,
            index: req.index,
            seek: req.rotate_start - req.seek_start,
            rotate: req.xfer_start - req.rotate_start,
            transfer: completed - req.xfer_start,
            total: completed - req.seek_start,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AggregateStats {
    pub seek: u64,
    pub rotate: u64,
    pub transfer: u64,
    pub total: u64,
}

impl AggregateStats {
    fn add(&mut self, stats: &RequestStats) {
        self.seek += stats.seek;
        self.rotate += stats.rotate;
        self.transfer += stats.transfer;
        self.total += stats.total;
    }
}

/// Per-request records in completion order, plus running totals.
#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    records: Vec<RequestStats>,
    totals: AggregateStats,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, req: &Request) -> Option<RequestStats> {
        let stats = RequestStats::from_request(req)?;
        debug!(
            block = stats.block,
            seek = stats.seek,
            rotate = stats.rotate,
            transfer = stats.transfer,
            total = stats.total,
            "request complete"
        );
        self.totals.add(&stats);
        self.records.push(stats);
        Some(stats)
    }

    pub fn totals(&self) -> AggregateStats {
        self.totals
    }

    pub fn completed(&self) -> usize {
        self.records.len()
    }

    pub fn into_parts(self) -> (Vec<RequestStats>, AggregateStats) {
        (self.records, self.totals)
    }
}
