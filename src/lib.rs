// src/lib.rs
//! Tick-based simulation of a three-track rotating disk for comparing
//! FIFO, SSTF, SATF and BSATF request scheduling.

pub mod config;
pub mod error;
pub mod geometry;
pub mod lifecycle;
pub mod mechanics;
pub mod report;
pub mod requests;
pub mod scheduler;
pub mod simulation;
pub mod stats;

pub use config::{AddressSpec, Policy, SimConfig, WindowSize};
pub use error::SimError;
pub use simulation::{simulate, Simulation, SimulationReport};
