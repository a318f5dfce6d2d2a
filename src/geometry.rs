// src/geometry.rs
//! Block layout of the simulated platter.
//!
//! Three concentric tracks, outermost first. Each track is divided into
//! sectors of a fixed angular width taken from the zoning descriptor; block ids
//! are numbered contiguously from the outer track inwards.

use crate::config::validate_zoning;
use crate::error::Result;
use tracing::{debug, trace};

pub const TRACK_COUNT: usize = 3;
/// Radial width of one track.
pub const TRACK_WIDTH: f64 = 40.0;
/// Radial center of track 0; each deeper track sits one track width further in.
pub const OUTER_TRACK_CENTER: f64 = 140.0;
/// Radial position of the arm before its first seek.
pub const ARM_PARK_POSITION: f64 = 0.0;
/// Added to every block angle so rotate/transfer targets line up with the
/// platter's reference start angle of 0.
pub const CALIBRATION_OFFSET: i64 = 180;
/// Skew multiplier per track depth.
const SKEW_DEPTH: [i64; TRACK_COUNT] = [0, 1, 2];

/// One addressable sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub id: u32,
    pub track: usize,
    /// Center angle of the sector in degrees, `[0, 360)`.
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub index: usize,
    /// Radial center of the track.
    pub center: f64,
    /// Half of the angular width of one sector on this track.
    pub half_width: f64,
    pub first_block: u32,
    pub last_block: u32,
}

impl Track {
    /// Radial position the arm snaps to when it settles on this track.
    pub fn arm_position(&self) -> f64 {
        self.center - TRACK_WIDTH / 2.0
    }

    pub fn sector_width(&self) -> f64 {
        2.0 * self.half_width
    }

    pub fn contains(&self, block: u32) -> bool {
        (self.first_block..=self.last_block).contains(&block)
    }
}

/// Block ↔ track ↔ angle mapping built from a zoning descriptor and a skew.
#[derive(Debug, Clone)]
pub struct GeometryModel {
    blocks: Vec<Block>,
    tracks: [Track; TRACK_COUNT],
}

impl GeometryModel {
    pub fn new(zoning: [u32; TRACK_COUNT], skew: i32) -> Result<Self> {
        validate_zoning(&zoning)?;

        let mut blocks = Vec::new();
        let mut tracks = [Track {
            index: 0,
            center: 0.0,
            half_width: 0.0,
            first_block: 0,
            last_block: 0,
        }; TRACK_COUNT];

        for (index, &zone) in zoning.iter().enumerate() {
            let half_width = i64::from(zone / 2);
            let width = 2 * half_width;
            let skew_offset = width * i64::from(skew) * SKEW_DEPTH[index];
            let first_block = blocks.len() as u32;

            let mut angle = 0;
            while angle < 360 {
                let placed = (angle + skew_offset + CALIBRATION_OFFSET).rem_euclid(360);
                let block = Block { id: blocks.len() as u32, track: index, angle: placed as f64 };
                trace!(track = index, block = block.id, angle = block.angle, "placed block");
                blocks.push(block);
                angle += width;
            }

            tracks[index] = Track {
                index,
                center: OUTER_TRACK_CENTER - TRACK_WIDTH * index as f64,
                half_width: half_width as f64,
                first_block,
                last_block: blocks.len() as u32 - 1,
            };
            debug!(
                track = index,
                sector_width = width,
                first = tracks[index].first_block,
                last = tracks[index].last_block,
                "track layout"
            );
        }

        Ok(GeometryModel { blocks, tracks })
    }

    /// Highest block id on the platter.
    pub fn max_block(&self) -> u32 {
        self.blocks.len() as u32 - 1
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tracks(&self) -> &[Track; TRACK_COUNT] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> &Track {
        &self.tracks[index]
    }

    /// Looks up a block that is known to exist. Request lists are checked
    /// against `max_block` before a simulation starts.
    pub fn block(&self, id: u32) -> &Block {
        &self.blocks[id as usize]
    }

    pub fn track_of(&self, id: u32) -> Option<usize> {
        self.blocks.get(id as usize).map(|b| b.track)
    }

    pub fn angle_of(&self, id: u32) -> Option<f64> {
        self.blocks.get(id as usize).map(|b| b.angle)
    }

    /// First and last block ids on `track`.
    pub fn track_range(&self, track: usize) -> (u32, u32) {
        let t = &self.tracks[track];
        (t.first_block, t.last_block)
    }

    /// True when `next` is the sector that passes under the arm right after
    /// `prev`: the following block on the same track, or the wrap from the
    /// track's last block to its first.
    pub fn is_adjacent_sector(&self, prev: u32, next: u32) -> bool {
        let (Some(prev_track), Some(next_track)) = (self.track_of(prev), self.track_of(next)) else {
            return false;
        };
        if prev_track != next_track {
            return false;
        }
        let track = &self.tracks[prev_track];
        (prev == track.last_block && next == track.first_block) || prev + 1 == next
    }

    /// Track that holds `block`.
    pub fn track_for(&self, block: u32) -> &Track {
        &self.tracks[self.block(block).track]
    }
}
