// src/simulation.rs
//! Discrete-tick driver tying the mechanism, scheduler and bookkeeping together.

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::geometry::GeometryModel;
use crate::lifecycle::{Event, Request, RequestState};
use crate::mechanics::{ArmController, RotationController, SeekPlan};
use crate::requests::RequestGenerator;
use crate::scheduler::{DiskView, Scheduler};
use crate::stats::{AggregateStats, RequestStats, StatsAggregator};
use tracing::{debug, info};

/// One dispatch decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchRecord {
    pub tick: u64,
    pub block: u32,
    pub index: usize,
    /// Access-time estimate the scheduler computed for this request.
    pub estimate: f64,
    /// Dispatched straight into transfer because it follows the previous sector.
    pub shortcut: bool,
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub requests: Vec<u32>,
    pub late_requests: Vec<u32>,
    pub dispatch_order: Vec<DispatchRecord>,
    /// Per-request timing in completion order.
    pub stats: Vec<RequestStats>,
    pub totals: AggregateStats,
    pub elapsed_ticks: u64,
    pub late_admitted: usize,
    /// Final queue, late arrivals included, in enqueue order.
    pub queue: Vec<Request>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Done,
}

/// State of one simulated disk. Nothing here is shared between simulations.
pub struct Simulation {
    geometry: GeometryModel,
    arm: ArmController,
    rotation: RotationController,
    scheduler: Scheduler,
    stats: StatsAggregator,
    queue: Vec<Request>,
    requests: Vec<u32>,
    late_requests: Vec<u32>,
    late_admitted: usize,
    current: Option<usize>,
    dispatches: Vec<DispatchRecord>,
    clock: u64,
    finished: bool,
}

impl Simulation {
    /// Validates `config`, lays out the disk, resolves the request lists and
    /// performs the first dispatch at tick 0.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let geometry = GeometryModel::new(config.zoning, config.skew)?;

        let mut generator = RequestGenerator::new(config.seed);
        let requests = generator.generate(&config.requests, &geometry)?;
        let late_requests = generator.generate(&config.late_requests, &geometry)?;

        let queue = requests.iter().enumerate().map(|(i, &b)| Request::new(b, i)).collect();

        info!(
            policy = %config.policy,
            window = config.window.as_raw(),
            requests = requests.len(),
            late = late_requests.len(),
            max_block = geometry.max_block(),
            "simulation configured"
        );

        let mut sim = Simulation {
            arm: ArmController::new(config.seek_speed),
            rotation: RotationController::new(config.rotation_speed),
            scheduler: Scheduler::new(config.policy, config.window),
            stats: StatsAggregator::new(),
            geometry,
            queue,
            requests,
            late_requests,
            late_admitted: 0,
            current: None,
            dispatches: Vec::new(),
            clock: 0,
            finished: false,
        };
        sim.dispatch(None)?;
        Ok(sim)
    }

    pub fn geometry(&self) -> &GeometryModel {
        &self.geometry
    }

    pub fn arm(&self) -> &ArmController {
        &self.arm
    }

    pub fn angle(&self) -> f64 {
        self.rotation.angle()
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    pub fn queue(&self) -> &[Request] {
        &self.queue
    }

    pub fn completed(&self) -> usize {
        self.stats.completed()
    }

    pub fn is_done(&self) -> bool {
        self.finished
    }

    /// The request being serviced, if any.
    pub fn current(&self) -> Option<&Request> {
        self.current.map(|i| &self.queue[i])
    }

    pub fn dispatches(&self) -> &[DispatchRecord] {
        &self.dispatches
    }

    /// Advances the clock by one tick.
    pub fn step(&mut self) -> Result<TickOutcome> {
        if self.finished {
            return Ok(TickOutcome::Done);
        }
        self.clock += 1;
        self.rotation.advance();

        let index = self.current.ok_or(SimError::NoCandidate {
            pending: self.queue.len() - self.completed(),
            tick: self.clock,
        })?;
        let block = *self.geometry.block(self.queue[index].block);
        let half_width = self.geometry.track(block.track).half_width;
        let tick = self.clock;

        // a phase that completes lets the next phase be tested on the same tick
        if self.queue[index].state() == RequestState::Seek && self.arm.tick() {
            self.queue[index].apply(Event::ArmArrived, tick)?;
        }
        if self.queue[index].state() == RequestState::Rotate
            && self.rotation.done_with_rotation(&block, half_width)
        {
            self.queue[index].apply(Event::RotationAligned, tick)?;
        }
        if self.queue[index].state() == RequestState::Xfer
            && self.rotation.done_with_transfer(&block, half_width)
        {
            self.queue[index].apply(Event::TransferAligned, tick)?;
            self.complete(index)?;
        }

        Ok(if self.finished { TickOutcome::Done } else { TickOutcome::Running })
    }

    /// Steps until every enqueued request is done.
    pub fn run(mut self) -> Result<SimulationReport> {
        while self.step()? == TickOutcome::Running {}
        Ok(self.into_report())
    }

    pub fn into_report(self) -> SimulationReport {
        let (stats, totals) = self.stats.into_parts();
        SimulationReport {
            requests: self.requests,
            late_requests: self.late_requests,
            dispatch_order: self.dispatches,
            stats,
            totals,
            elapsed_ticks: self.clock,
            late_admitted: self.late_admitted,
            queue: self.queue,
        }
    }

    fn complete(&mut self, index: usize) -> Result<()> {
        self.stats
            .record(&self.queue[index])
            .ok_or(SimError::Unrecorded { index })?;
        self.scheduler.on_completion(self.queue.len());
        self.current = None;
        let block = self.queue[index].block;
        self.dispatch(Some(block))
    }

    /// Picks and starts the next request, then admits one late arrival.
    fn dispatch(&mut self, previous: Option<u32>) -> Result<()> {
        let completed = self.completed();
        if completed == self.queue.len() {
            self.finished = true;
            info!(
                ticks = self.clock,
                completed,
                seek = self.stats.totals().seek,
                rotate = self.stats.totals().rotate,
                transfer = self.stats.totals().transfer,
                "simulation done"
            );
            return Ok(());
        }

        let view = DiskView { geometry: &self.geometry, arm: &self.arm, rotation: &self.rotation };
        let choice = self.scheduler.select_next(&view, &self.queue, completed).ok_or(
            SimError::NoCandidate { pending: self.queue.len() - completed, tick: self.clock },
        )?;

        let tick = self.clock;
        let shortcut =
            previous.map_or(false, |prev| self.geometry.is_adjacent_sector(prev, choice.block));
        let request = &mut self.queue[choice.index];
        if shortcut {
            request.apply(Event::AdjacentSector, tick)?;
        } else {
            request.apply(Event::Dispatched, tick)?;
            let track = self.geometry.track_for(choice.block);
            if self.arm.plan_seek(track) == SeekPlan::AlreadyThere {
                request.apply(Event::SameTrack, tick)?;
            }
        }
        debug!(tick, block = choice.block, index = choice.index, shortcut, "dispatched");

        self.current = Some(choice.index);
        self.dispatches.push(DispatchRecord {
            tick,
            block: choice.block,
            index: choice.index,
            estimate: choice.estimate,
            shortcut,
        });
        self.admit_late();
        Ok(())
    }

    fn admit_late(&mut self) {
        if let Some(&block) = self.late_requests.get(self.late_admitted) {
            let index = self.queue.len();
            self.queue.push(Request::new(block, index));
            self.late_admitted += 1;
            debug!(block, index, "late request admitted");
        }
    }
}

/// Builds and runs a simulation in one call.
pub fn simulate(config: &SimConfig) -> Result<SimulationReport> {
    Simulation::new(config)?.run()
}
