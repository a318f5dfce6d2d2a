// src/config.rs
use crate::error::{Result, SimError};
use crate::geometry::TRACK_WIDTH;
use std::fmt;
use std::str::FromStr;

/// Scheduling policy used to pick the next request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Oldest pending request first.
    Fifo,
    /// Shortest seek (track distance) first, ties ranked by access time.
    Sstf,
    /// Shortest estimated access time first.
    Satf,
    /// SATF restricted to a fairness window that advances in batches.
    Bsatf,
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FIFO" => Ok(Policy::Fifo),
            "SSTF" => Ok(Policy::Sstf),
            "SATF" => Ok(Policy::Satf),
            "BSATF" => Ok(Policy::Bsatf),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Policy::Fifo => write!(f, "FIFO"),
            Policy::Sstf => write!(f, "SSTF"),
            Policy::Satf => write!(f, "SATF"),
            Policy::Bsatf => write!(f, "BSATF"),
        }
    }
}

/// Configured scheduling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSize {
    /// The whole pending queue is visible (`-1` on the command line).
    Unbounded,
    /// Only the first `n` queue slots are visible.
    Bounded(usize),
}

impl WindowSize {
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            0 => Err(SimError::Window(raw)),
            n if n < 0 => Ok(WindowSize::Unbounded),
            n => Ok(WindowSize::Bounded(n as usize)),
        }
    }

    pub fn as_raw(&self) -> i64 {
        match self {
            WindowSize::Unbounded => -1,
            WindowSize::Bounded(n) => *n as i64,
        }
    }
}

/// Where a request list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    Explicit(Vec<u32>),
    /// `count` uniform draws over `[min, max]`; `max: None` means the highest block.
    Random { count: usize, max: Option<u32>, min: u32 },
}

impl AddressSpec {
    /// Builds a spec from the `addr` / `addrDesc` pair. An `addr` of `-1`
    /// selects the random descriptor.
    pub fn parse(addr: &str, desc: &str) -> Result<Self> {
        if addr.trim() == "-1" {
            Self::parse_desc(desc)
        } else {
            Self::parse_list(addr)
        }
    }

    pub fn parse_list(list: &str) -> Result<Self> {
        let bad = || SimError::AddressList(list.to_string());
        if list.trim().is_empty() {
            return Ok(AddressSpec::Explicit(Vec::new()));
        }
        let blocks = list
            .split(',')
            .map(|s| s.trim().parse::<u32>().map_err(|_| bad()))
            .collect::<Result<Vec<_>>>()?;
        Ok(AddressSpec::Explicit(blocks))
    }

    pub fn parse_desc(desc: &str) -> Result<Self> {
        let bad = || SimError::AddressDesc(desc.to_string());
        let parts: Vec<i64> = desc
            .split(',')
            .map(|s| s.trim().parse::<i64>().map_err(|_| bad()))
            .collect::<Result<_>>()?;
        if parts.len() != 3 {
            return Err(bad());
        }
        let (count, max, min) = (parts[0], parts[1], parts[2]);
        if count < 0 || min < 0 || max < -1 || min > u32::MAX as i64 || max > u32::MAX as i64 {
            return Err(bad());
        }
        let max = if max == -1 { None } else { Some(max as u32) };
        if let Some(max) = max {
            if (min as u32) > max {
                return Err(bad());
            }
        }
        Ok(AddressSpec::Random { count: count as usize, max, min: min as u32 })
    }

    pub fn none() -> Self {
        AddressSpec::Random { count: 0, max: None, min: 0 }
    }
}

/// Parses a zoning descriptor such as `30,30,30`.
pub fn parse_zoning(s: &str) -> Result<[u32; 3]> {
    let bad = || SimError::Zoning(s.to_string());
    let values: Vec<u32> = s
        .split(',')
        .map(|v| v.trim().parse::<u32>().map_err(|_| bad()))
        .collect::<Result<_>>()?;
    let zones: [u32; 3] = values.try_into().map_err(|_| bad())?;
    validate_zoning(&zones)?;
    Ok(zones)
}

/// Each zone needs a non-zero half width and a sector no wider than the platter.
pub fn validate_zoning(zones: &[u32; 3]) -> Result<()> {
    if zones.iter().any(|&z| z / 2 == 0 || 2 * (z / 2) > 360) {
        let text = zones.iter().map(|z| z.to_string()).collect::<Vec<_>>().join(",");
        return Err(SimError::Zoning(text));
    }
    Ok(())
}

/// Typed inputs of one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub requests: AddressSpec,
    pub late_requests: AddressSpec,
    pub policy: Policy,
    pub seek_speed: f64,
    pub rotation_speed: f64,
    pub skew: i32,
    pub window: WindowSize,
    pub zoning: [u32; 3],
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            requests: AddressSpec::Random { count: 5, max: None, min: 0 },
            late_requests: AddressSpec::none(),
            policy: Policy::Fifo,
            seek_speed: 1.0,
            rotation_speed: 1.0,
            skew: 0,
            window: WindowSize::Unbounded,
            zoning: [30, 30, 30],
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Explicit request list with every other setting at its default.
    pub fn with_requests(blocks: &[u32]) -> Self {
        SimConfig { requests: AddressSpec::Explicit(blocks.to_vec()), ..SimConfig::default() }
    }

    pub fn validate(&self) -> Result<()> {
        if self.window == WindowSize::Bounded(0) {
            return Err(SimError::Window(0));
        }
        for (what, value) in [("seek speed", self.seek_speed), ("rotation speed", self.rotation_speed)] {
            if !value.is_finite() {
                return Err(SimError::NotFinite { what, value });
            }
        }
        if !(self.seek_speed > 0.0) {
            return Err(SimError::NonPositive { what: "seek speed", value: self.seek_speed });
        }
        if !(self.rotation_speed > 0.0) {
            return Err(SimError::NonPositive { what: "rotation speed", value: self.rotation_speed });
        }
        if self.rotation_speed >= 360.0 {
            return Err(SimError::RotationSpeed(self.rotation_speed));
        }
        if self.seek_speed > 1.0 && TRACK_WIDTH % self.seek_speed != 0.0 {
            return Err(SimError::SeekSpeed { speed: self.seek_speed, width: TRACK_WIDTH });
        }
        validate_zoning(&self.zoning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_are_exact() {
        assert_eq!("SATF".parse::<Policy>(), Ok(Policy::Satf));
        assert_eq!("BSATF".parse::<Policy>(), Ok(Policy::Bsatf));
        assert_eq!("satf".parse::<Policy>(), Err(SimError::UnknownPolicy("satf".into())));
        assert_eq!(Policy::Sstf.to_string(), "SSTF");
    }

    #[test]
    fn window_zero_is_rejected() {
        assert_eq!(WindowSize::from_raw(0), Err(SimError::Window(0)));
        assert_eq!(WindowSize::from_raw(-1), Ok(WindowSize::Unbounded));
        assert_eq!(WindowSize::from_raw(4), Ok(WindowSize::Bounded(4)));
    }

    #[test]
    fn zoning_needs_three_usable_values() {
        assert_eq!(parse_zoning("30,30,30"), Ok([30, 30, 30]));
        assert_eq!(parse_zoning(" 10, 20 ,30"), Ok([10, 20, 30]));
        assert!(parse_zoning("30,30").is_err());
        assert!(parse_zoning("30,30,30,30").is_err());
        assert!(parse_zoning("30,x,30").is_err());
        assert!(parse_zoning("30,1,30").is_err());
        assert!(parse_zoning("30,0,30").is_err());
        assert!(parse_zoning("30,-30,30").is_err());
    }

    #[test]
    fn address_descriptor_parsing() {
        assert_eq!(
            AddressSpec::parse("-1", "10,-1,0"),
            Ok(AddressSpec::Random { count: 10, max: None, min: 0 })
        );
        assert_eq!(
            AddressSpec::parse("-1", "4,20,5"),
            Ok(AddressSpec::Random { count: 4, max: Some(20), min: 5 })
        );
        assert!(AddressSpec::parse("-1", "10,100").is_err());
        assert!(AddressSpec::parse("-1", "10,100,0,1").is_err());
        assert!(AddressSpec::parse("-1", "a,100,0").is_err());
        assert!(AddressSpec::parse("-1", "3,2,5").is_err());
        assert_eq!(AddressSpec::parse("8,11,2", "ignored"), Ok(AddressSpec::Explicit(vec![8, 11, 2])));
        assert!(AddressSpec::parse("8,x", "").is_err());
    }

    #[test]
    fn seek_speed_must_divide_track_width() {
        let mut config = SimConfig::default();
        config.seek_speed = 3.0;
        assert!(matches!(config.validate(), Err(SimError::SeekSpeed { .. })));
        config.seek_speed = 4.0;
        assert_eq!(config.validate(), Ok(()));
        config.seek_speed = 0.5;
        assert_eq!(config.validate(), Ok(()));
        config.rotation_speed = 0.0;
        assert!(matches!(config.validate(), Err(SimError::NonPositive { .. })));
    }

    #[test]
    fn zero_window_is_a_configuration_error() {
        let config = SimConfig { window: WindowSize::Bounded(0), ..SimConfig::default() };
        assert_eq!(config.validate(), Err(SimError::Window(0)));
    }

    #[test]
    fn speeds_must_be_finite() {
        let config = SimConfig { rotation_speed: f64::INFINITY, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::NotFinite { what: "rotation speed", .. })));
        let config = SimConfig { rotation_speed: f64::NAN, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::NotFinite { .. })));
        let config = SimConfig { seek_speed: f64::INFINITY, ..SimConfig::default() };
        assert!(matches!(config.validate(), Err(SimError::NotFinite { what: "seek speed", .. })));
    }

    #[test]
    fn rotation_must_be_less_than_a_full_turn_per_tick() {
        let config = SimConfig { rotation_speed: 1e18, ..SimConfig::default() };
        assert_eq!(config.validate(), Err(SimError::RotationSpeed(1e18)));
        let config = SimConfig { rotation_speed: 360.0, ..SimConfig::default() };
        assert_eq!(config.validate(), Err(SimError::RotationSpeed(360.0)));
        let config = SimConfig { rotation_speed: 359.0, ..SimConfig::default() };
        assert_eq!(config.validate(), Ok(()));
    }
}
