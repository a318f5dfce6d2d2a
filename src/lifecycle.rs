// src/lifecycle.rs
//! Per-request lifecycle: `Null → Seek → Rotate → Xfer → Done`.

use crate::error::{Result, SimError};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestState {
    Null,
    Seek,
    Rotate,
    Xfer,
    Done,
}

/// Something the simulation observed about the active request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Chosen by the scheduler; the arm starts toward the block's track.
    Dispatched,
    /// The block is on the arm's current track, so the seek is empty.
    SameTrack,
    ArmArrived,
    /// The start of the sector reached the arm.
    RotationAligned,
    /// The end of the sector reached the arm.
    TransferAligned,
    /// The block directly follows the one just transferred on the same track.
    AdjacentSector,
}

/// Pure transition table. `None` means the event is not legal in `state`.
pub fn transition(state: RequestState, event: Event) -> Option<RequestState> {
    use Event::*;
    use RequestState::*;
    match (state, event) {
        (Null, Dispatched) => Some(Seek),
        (Null, AdjacentSector) => Some(Xfer),
        (Seek, SameTrack) | (Seek, ArmArrived) => Some(Rotate),
        (Rotate, RotationAligned) => Some(Xfer),
        (Xfer, TransferAligned) => Some(Done),
        _ => None,
    }
}

/// One queued block request and the ticks at which it entered each phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub block: u32,
    /// Position in the queue; also the request's identity.
    pub index: usize,
    state: RequestState,
    history: Vec<RequestState>,
    pub seek_start: u64,
    pub rotate_start: u64,
    pub xfer_start: u64,
    pub completed_at: Option<u64>,
}

impl Request {
    pub fn new(block: u32, index: usize) -> Self {
        Request {
            block,
            index,
            state: RequestState::Null,
            history: vec![RequestState::Null],
            seek_start: 0,
            rotate_start: 0,
            xfer_start: 0,
            completed_at: None,
        }
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Every state this request has been in, in order.
    pub fn history(&self) -> &[RequestState] {
        &self.history
    }

    pub fn is_done(&self) -> bool {
        self.state == RequestState::Done
    }

    pub fn is_pending(&self) -> bool {
        self.state != RequestState::Done
    }

    /// Applies `event` at `tick`, stamping the phase boundary it marks.
    pub fn apply(&mut self, event: Event, tick: u64) -> Result<RequestState> {
        let next = transition(self.state, event).ok_or(SimError::InvalidTransition {
            index: self.index,
            from: self.state,
            event,
        })?;
        match event {
            Event::Dispatched => self.seek_start = tick,
            Event::SameTrack | Event::ArmArrived => self.rotate_start = tick,
            Event::RotationAligned => self.xfer_start = tick,
            Event::TransferAligned => self.completed_at = Some(tick),
            Event::AdjacentSector => {
                self.seek_start = tick;
                self.rotate_start = tick;
                self.xfer_start = tick;
            }
        }
        trace!(index = self.index, block = self.block, tick, from = ?self.state, to = ?next, "transition");
        self.state = next;
        self.history.push(next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Event::*;
    use RequestState::*;

    const STATES: [RequestState; 5] = [Null, Seek, Rotate, Xfer, Done];
    const EVENTS: [Event; 6] =
        [Dispatched, SameTrack, ArmArrived, RotationAligned, TransferAligned, AdjacentSector];

    #[test]
    fn transition_table_is_exhaustive_and_forward_only() {
        let mut legal = 0;
        for state in STATES {
            for event in EVENTS {
                if let Some(next) = transition(state, event) {
                    assert!(next > state, "{state:?} --{event:?}--> {next:?} goes backwards");
                    legal += 1;
                }
            }
        }
        assert_eq!(legal, 6);
        for event in EVENTS {
            assert_eq!(transition(Done, event), None);
        }
    }

    #[test]
    fn full_lifecycle_stamps_each_phase() {
        let mut req = Request::new(15, 3);
        req.apply(Dispatched, 10).unwrap();
        req.apply(ArmArrived, 50).unwrap();
        req.apply(RotationAligned, 90).unwrap();
        req.apply(TransferAligned, 120).unwrap();
        assert!(req.is_done());
        assert_eq!((req.seek_start, req.rotate_start, req.xfer_start), (10, 50, 90));
        assert_eq!(req.completed_at, Some(120));
        assert_eq!(req.history(), &[Null, Seek, Rotate, Xfer, Done]);
    }

    #[test]
    fn adjacent_sector_skips_to_transfer() {
        let mut req = Request::new(12, 1);
        req.apply(AdjacentSector, 75).unwrap();
        assert_eq!((req.seek_start, req.rotate_start, req.xfer_start), (75, 75, 75));
        req.apply(TransferAligned, 105).unwrap();
        assert_eq!(req.history(), &[Null, Xfer, Done]);
    }

    #[test]
    fn illegal_event_is_an_error() {
        let mut req = Request::new(1, 0);
        assert_eq!(
            req.apply(RotationAligned, 0),
            Err(SimError::InvalidTransition { index: 0, from: Null, event: RotationAligned })
        );
        assert_eq!(req.state(), Null);
    }
}
