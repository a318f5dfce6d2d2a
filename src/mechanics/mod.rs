// src/mechanics/mod.rs

pub mod arm;
pub mod rotation;

pub use arm::{ArmController, SeekPlan};
pub use rotation::{arc_distance, is_aligned, normalize_angle, RotationController};
