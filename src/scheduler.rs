// src/scheduler.rs
//! Next-request selection for FIFO, SSTF, SATF and BSATF.

use crate::config::{Policy, WindowSize};
use crate::geometry::GeometryModel;
use crate::lifecycle::Request;
use crate::mechanics::{normalize_angle, ArmController, RotationController};
use tracing::trace;

/// Read-only view of the mechanism a cost estimate is computed against.
#[derive(Clone, Copy)]
pub struct DiskView<'a> {
    pub geometry: &'a GeometryModel,
    pub arm: &'a ArmController,
    pub rotation: &'a RotationController,
}

/// Predicted cost of servicing a block from the current mechanism state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessEstimate {
    pub seek: f64,
    pub rotate: f64,
    pub transfer: f64,
}

impl AccessEstimate {
    pub fn total(&self) -> f64 {
        self.seek + self.rotate + self.transfer
    }
}

pub fn estimate_access(view: &DiskView<'_>, block: u32) -> AccessEstimate {
    let block = view.geometry.block(block);
    let track = view.geometry.track(block.track);
    let speed = view.rotation.speed();

    let seek = (track.arm_position() - view.arm.position()).abs() / view.arm.base_speed();
    let angle_at_arrival = normalize_angle(view.rotation.angle() + seek * speed);
    let rotate_distance = normalize_angle((block.angle - track.half_width) - angle_at_arrival);

    AccessEstimate {
        seek,
        rotate: rotate_distance / speed,
        transfer: track.sector_width() / speed,
    }
}

/// The request the scheduler picked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub block: u32,
    pub index: usize,
    pub estimate: f64,
}

/// Lowest total estimate among the pending requests; the first one seen wins ties.
pub fn shortest_access<'r>(
    view: &DiskView<'_>,
    requests: impl IntoIterator<Item = &'r Request>,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for req in requests.into_iter().filter(|r| r.is_pending()) {
        let estimate = estimate_access(view, req.block).total();
        if best.map_or(true, |b| estimate < b.estimate) {
            best = Some(Candidate { block: req.block, index: req.index, estimate });
        }
    }
    best
}

/// Pending requests whose track is closest to the arm's track.
pub fn shortest_seek<'r>(
    view: &DiskView<'_>,
    requests: impl IntoIterator<Item = &'r Request>,
) -> Vec<&'r Request> {
    let arm_track = view.arm.track();
    let mut min_distance = usize::MAX;
    let mut nearest = Vec::new();
    for req in requests.into_iter().filter(|r| r.is_pending()) {
        let distance = view.geometry.block(req.block).track.abs_diff(arm_track);
        if distance < min_distance {
            min_distance = distance;
            nearest.clear();
        }
        if distance == min_distance {
            nearest.push(req);
        }
    }
    nearest
}

/// How many queue slots selection may look at.
#[derive(Debug, Clone)]
pub struct SchedulingWindow {
    /// `None` when every queued request is visible.
    current: Option<usize>,
    /// BSATF batch size.
    fair: Option<usize>,
    last_admission: usize,
}

impl SchedulingWindow {
    pub fn new(window: WindowSize, policy: Policy) -> Self {
        let current = match window {
            WindowSize::Unbounded => None,
            WindowSize::Bounded(n) => Some(n),
        };
        let fair = if policy == Policy::Bsatf { current } else { None };
        SchedulingWindow { current, fair, last_admission: 0 }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn fair_window(&self) -> Option<usize> {
        self.fair
    }

    /// True when `completed` closes a BSATF batch and the next one should be admitted.
    pub fn is_window_admission_tick(&self, completed: usize) -> bool {
        match self.fair {
            Some(w) => completed > 0 && completed % w == 0 && completed != self.last_admission,
            None => false,
        }
    }

    /// Number of leading queue slots visible to selection, admitting the next
    /// BSATF batch first if one is due.
    pub fn visible(&mut self, completed: usize, queue_len: usize) -> usize {
        if self.is_window_admission_tick(completed) {
            if let (Some(current), Some(fair)) = (self.current, self.fair) {
                self.current = Some(current + fair);
                self.last_admission = completed;
                trace!(completed, window = current + fair, "fair window advanced");
            }
        }
        self.current.map_or(queue_len, |w| w.min(queue_len))
    }

    /// Outside BSATF the window widens by one per completion until it covers the queue.
    pub fn on_completion(&mut self, queue_len: usize) {
        if self.fair.is_some() {
            return;
        }
        if let Some(w) = self.current {
            if w < queue_len {
                self.current = Some(w + 1);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    policy: Policy,
    window: SchedulingWindow,
}

impl Scheduler {
    pub fn new(policy: Policy, window: WindowSize) -> Self {
        Scheduler { policy, window: SchedulingWindow::new(window, policy) }
    }

    /// Picks the next request to dispatch. `None` only when nothing visible is pending.
    pub fn select_next(
        &mut self,
        view: &DiskView<'_>,
        queue: &[Request],
        completed: usize,
    ) -> Option<Candidate> {
        let choice = match self.policy {
            Policy::Fifo => {
                let oldest = queue.iter().find(|r| r.is_pending())?;
                shortest_access(view, [oldest])
            }
            Policy::Satf | Policy::Bsatf => {
                let end = self.window.visible(completed, queue.len());
                shortest_access(view, &queue[..end])
            }
            Policy::Sstf => {
                let end = self.window.visible(completed, queue.len());
                shortest_access(view, shortest_seek(view, &queue[..end]))
            }
        };
        if let Some(c) = choice {
            trace!(policy = %self.policy, block = c.block, index = c.index, estimate = c.estimate, "selected");
        }
        choice
    }

    pub fn on_completion(&mut self, queue_len: usize) {
        self.window.on_completion(queue_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Event;

    struct Rig {
        geometry: GeometryModel,
        arm: ArmController,
        rotation: RotationController,
    }

    impl Rig {
        fn new() -> Self {
            Rig {
                geometry: GeometryModel::new([30, 30, 30], 0).unwrap(),
                arm: ArmController::new(1.0),
                rotation: RotationController::new(1.0),
            }
        }

        fn view(&self) -> DiskView<'_> {
            DiskView { geometry: &self.geometry, arm: &self.arm, rotation: &self.rotation }
        }
    }

    fn queue(blocks: &[u32]) -> Vec<Request> {
        blocks.iter().enumerate().map(|(i, &b)| Request::new(b, i)).collect()
    }

    fn finish(req: &mut Request) {
        req.apply(Event::AdjacentSector, 0).unwrap();
        req.apply(Event::TransferAligned, 0).unwrap();
    }

    #[test]
    fn estimate_from_park_position() {
        let rig = Rig::new();
        // block 8 sits on track 0 at 60 degrees, sector starts at 45
        let est = estimate_access(&rig.view(), 8);
        assert_eq!(est.seek, 120.0);
        assert_eq!(est.rotate, 285.0);
        assert_eq!(est.transfer, 30.0);
        assert_eq!(est.total(), 435.0);
    }

    #[test]
    fn fifo_takes_the_oldest_pending() {
        let rig = Rig::new();
        let mut q = queue(&[20, 3, 7]);
        finish(&mut q[0]);
        let mut sched = Scheduler::new(Policy::Fifo, WindowSize::Unbounded);
        let c = sched.select_next(&rig.view(), &q, 1).unwrap();
        assert_eq!((c.block, c.index), (3, 1));
        assert_eq!(c.estimate, estimate_access(&rig.view(), 3).total());
    }

    #[test]
    fn satf_ties_go_to_the_first_request() {
        let rig = Rig::new();
        let q = queue(&[5, 5, 5]);
        let mut sched = Scheduler::new(Policy::Satf, WindowSize::Unbounded);
        assert_eq!(sched.select_next(&rig.view(), &q, 0).unwrap().index, 0);
    }

    #[test]
    fn satf_respects_the_window() {
        let rig = Rig::new();
        let q = queue(&[30, 20, 1, 0]);
        let mut unbounded = Scheduler::new(Policy::Satf, WindowSize::Unbounded);
        let best = unbounded.select_next(&rig.view(), &q, 0).unwrap();
        let mut windowed = Scheduler::new(Policy::Satf, WindowSize::Bounded(1));
        let first = windowed.select_next(&rig.view(), &q, 0).unwrap();
        assert_eq!(first.index, 0);
        assert!(best.estimate <= first.estimate);
    }

    #[test]
    fn sstf_prefers_the_nearest_track() {
        let rig = Rig::new();
        // arm is logically on track 0
        let q = queue(&[30, 14, 9, 2]);
        let mut sched = Scheduler::new(Policy::Sstf, WindowSize::Unbounded);
        let c = sched.select_next(&rig.view(), &q, 0).unwrap();
        assert!(c.block == 9 || c.block == 2);
        let nearest = shortest_seek(&rig.view(), &q);
        assert_eq!(nearest.iter().map(|r| r.block).collect::<Vec<_>>(), vec![9, 2]);
        let expected = shortest_access(&rig.view(), nearest).unwrap();
        assert_eq!(c, expected);
    }

    #[test]
    fn done_requests_are_never_candidates() {
        let rig = Rig::new();
        let mut q = queue(&[4, 6]);
        finish(&mut q[0]);
        finish(&mut q[1]);
        let mut sched = Scheduler::new(Policy::Satf, WindowSize::Unbounded);
        assert_eq!(sched.select_next(&rig.view(), &q, 2), None);
    }

    #[test]
    fn plain_window_grows_one_per_completion() {
        let mut w = SchedulingWindow::new(WindowSize::Bounded(2), Policy::Satf);
        assert_eq!(w.visible(0, 5), 2);
        w.on_completion(5);
        assert_eq!(w.visible(1, 5), 3);
        w.on_completion(5);
        w.on_completion(5);
        w.on_completion(5);
        assert_eq!(w.current(), Some(5));
        assert_eq!(w.visible(4, 3), 3);
    }

    #[test]
    fn fair_window_advances_in_batches() {
        let mut w = SchedulingWindow::new(WindowSize::Bounded(3), Policy::Bsatf);
        assert_eq!(w.fair_window(), Some(3));
        for completed in 0..3 {
            w.on_completion(9);
            assert!(!w.is_window_admission_tick(completed));
            assert_eq!(w.visible(completed, 9), 3);
        }
        assert!(w.is_window_admission_tick(3));
        assert_eq!(w.visible(3, 9), 6);
        // asking again for the same completion count does not advance twice
        assert!(!w.is_window_admission_tick(3));
        assert_eq!(w.visible(3, 9), 6);
        assert_eq!(w.visible(6, 9), 9);
    }

    #[test]
    fn unbounded_bsatf_has_no_fair_window() {
        let w = SchedulingWindow::new(WindowSize::Unbounded, Policy::Bsatf);
        assert_eq!(w.fair_window(), None);
        assert!(!w.is_window_admission_tick(4));
    }
}
