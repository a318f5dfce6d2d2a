// src/requests.rs
use crate::config::AddressSpec;
use crate::error::{Result, SimError};
use crate::geometry::GeometryModel;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Resolves address specs into concrete block lists.
///
/// One generator serves both the primary and the late list, in that order, so
/// a given seed always yields the same pair of lists.
pub struct RequestGenerator {
    rng: StdRng,
}

impl RequestGenerator {
    pub fn new(seed: u64) -> Self {
        RequestGenerator { rng: StdRng::seed_from_u64(seed) }
    }

    pub fn generate(&mut self, spec: &AddressSpec, geometry: &GeometryModel) -> Result<Vec<u32>> {
        let max_block = geometry.max_block();
        let blocks = match spec {
            AddressSpec::Explicit(blocks) => {
                if let Some(&block) = blocks.iter().find(|&&b| b > max_block) {
                    return Err(SimError::BlockOutOfRange { block, max_block });
                }
                blocks.clone()
            }
            AddressSpec::Random { count, max, min } => {
                let max = max.unwrap_or(max_block);
                if max > max_block {
                    return Err(SimError::BlockOutOfRange { block: max, max_block });
                }
                if *min > max {
                    return Err(SimError::AddressDesc(format!("{},{},{}", count, max, min)));
                }
                (0..*count).map(|_| self.rng.gen_range(*min..=max)).collect()
            }
        };
        debug!(count = blocks.len(), ?blocks, "resolved requests");
        Ok(blocks)
    }
}
