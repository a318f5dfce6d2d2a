// src/error.rs
use crate::lifecycle::{Event, RequestState};
use thiserror::Error;

/// Fatal conditions raised while configuring or running a simulation.
///
/// Configuration variants are reported before any simulation state is built.
/// `NoCandidate` is an internal invariant violation: the scheduler found no
/// eligible request while requests were still pending.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("bad zoning ({0}): zoning must be exactly 3 comma-separated values, each at least 2 and at most 360")]
    Zoning(String),

    #[error("bad address description ({0}): expected `count,max,min` (e.g. \"10,100,0\"); a max of -1 means use the highest block")]
    AddressDesc(String),

    #[error("bad address list ({0}): expected comma-separated block numbers")]
    AddressList(String),

    #[error("block {block} does not exist (highest block is {max_block})")]
    BlockOutOfRange { block: u32, max_block: u32 },

    #[error("policy ({0}) not implemented")]
    UnknownPolicy(String),

    #[error("scheduling window ({0}) must be positive or -1 (which means a full window)")]
    Window(i64),

    #[error("seek speed ({speed}) must divide evenly into track width ({width})")]
    SeekSpeed { speed: f64, width: f64 },

    #[error("{what} ({value}) must be a finite number")]
    NotFinite { what: &'static str, value: f64 },

    #[error("rotation speed ({0}) must be less than a full turn (360) per tick")]
    RotationSpeed(f64),

    #[error("{what} ({value}) must be positive")]
    NonPositive { what: &'static str, value: f64 },

    #[error("request {index} cannot take {event:?} while in {from:?}")]
    InvalidTransition { index: usize, from: RequestState, event: Event },

    #[error("request {index} finished without a completion tick")]
    Unrecorded { index: usize },

    #[error("scheduler produced no candidate with {pending} request(s) pending at tick {tick}")]
    NoCandidate { pending: usize, tick: u64 },
}

pub type Result<T> = std::result::Result<T, SimError>;
