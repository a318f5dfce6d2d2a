// src/mechanics/arm.rs
use crate::geometry::{Track, ARM_PARK_POSITION};
use tracing::trace;

/// Outcome of planning a seek.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekPlan {
    /// The arm is already over the target track; the seek takes no time.
    AlreadyThere,
    /// The arm has to travel; call [`ArmController::tick`] until it arrives.
    Moving,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SeekTarget {
    track: usize,
    position: f64,
}

/// Radial arm model. The arm covers `[position, position + TRACK_WIDTH]`.
#[derive(Debug, Clone)]
pub struct ArmController {
    track: usize,
    position: f64,
    base_speed: f64,
    speed: f64,
    target: Option<SeekTarget>,
}

impl ArmController {
    /// Arm parked over track 0 at the radial origin.
    pub fn new(base_speed: f64) -> Self {
        ArmController {
            track: 0,
            position: ARM_PARK_POSITION,
            base_speed,
            speed: base_speed,
            target: None,
        }
    }

    pub fn track(&self) -> usize {
        self.track
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn base_speed(&self) -> f64 {
        self.base_speed
    }

    /// Signed speed of the seek in progress.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn plan_seek(&mut self, target: &Track) -> SeekPlan {
        if target.index == self.track {
            self.target = None;
            return SeekPlan::AlreadyThere;
        }
        let position = target.arm_position();
        self.speed = if position >= self.position { self.base_speed } else { -self.base_speed };
        self.target = Some(SeekTarget { track: target.index, position });
        trace!(from = self.track, to = target.index, speed = self.speed, "seek planned");
        SeekPlan::Moving
    }

    /// Moves the arm one tick. Returns true once it has reached the target
    /// track, at which point the position is exactly the track's arm position.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return true;
        };
        self.position += self.speed;
        let arrived = (self.speed > 0.0 && self.position >= target.position)
            || (self.speed < 0.0 && self.position <= target.position);
        if arrived {
            self.position = target.position;
            self.track = target.track;
            self.target = None;
        }
        arrived
    }
}
