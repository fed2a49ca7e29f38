use crate::catalog::{CatalogItem, LayerCatalog, LayerPool};
use crate::generation::Combination;
use crate::io::error::{GenerationError, Result};
use crate::rarity::tier::{RarityTable, RarityTier};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random selector for stochastic choices, reproducible when seeded
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a selector seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded when a seed is given, entropy-backed otherwise
    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }

    /// Generic weighted random selection
    ///
    /// Returns index into weights array using cumulative distribution. Weights are
    /// relative; they need not sum to one.
    pub fn weighted_choice(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return 0;
        }

        let mut rand_val = self.rng.random::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            rand_val -= weight;
            if rand_val <= 0.0 && weight > 0.0 {
                return i;
            }
        }
        // Rounding can leave a sliver past the last bucket
        weights.iter().rposition(|&w| w > 0.0).unwrap_or(0)
    }

    /// Uniform index in `0..len`; zero for an empty range
    pub fn uniform_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.random_range(0..len)
    }
}

/// Two-stage draw: a tier by global weight, then an item uniformly within it
///
/// An item's chance therefore depends only on its tier's weight shared among
/// its same-tier siblings, never on how many items other tiers hold.
pub struct RaritySampler {
    table: RarityTable,
    selector: RandomSelector,
}

impl RaritySampler {
    /// Create a sampler over a validated table
    pub const fn new(table: RarityTable, selector: RandomSelector) -> Self {
        Self { table, selector }
    }

    /// Probability table in use
    pub const fn table(&self) -> &RarityTable {
        &self.table
    }

    /// Draw a tier among those the pool can actually serve
    ///
    /// # Errors
    ///
    /// Returns `EmptyLayer` when no populated tier carries positive weight
    pub fn sample_tier(&mut self, pool: &LayerPool) -> Result<RarityTier> {
        let candidates: Vec<(RarityTier, f64)> = pool
            .populated_tiers()
            .map(|tier| (tier, self.table.weight(tier)))
            .filter(|&(_, weight)| weight > 0.0)
            .collect();

        if candidates.is_empty() {
            return Err(GenerationError::EmptyLayer {
                layer: pool.name().to_string(),
                item_id: None,
            });
        }

        let weights: Vec<f64> = candidates.iter().map(|&(_, weight)| weight).collect();
        let index = self.selector.weighted_choice(&weights);
        candidates
            .get(index)
            .map(|&(tier, _)| tier)
            .ok_or_else(|| GenerationError::EmptyLayer {
                layer: pool.name().to_string(),
                item_id: None,
            })
    }

    /// Draw one item from a layer
    ///
    /// # Errors
    ///
    /// Returns `EmptyLayer` when the layer has nothing to offer
    pub fn sample<'p>(&mut self, pool: &'p LayerPool) -> Result<&'p CatalogItem> {
        let tier = self.sample_tier(pool)?;
        let items = pool.items(tier);
        let index = self.selector.uniform_index(items.len());
        items.get(index).ok_or_else(|| GenerationError::EmptyLayer {
            layer: pool.name().to_string(),
            item_id: None,
        })
    }

    /// Draw one item per layer, in layer order
    ///
    /// # Errors
    ///
    /// Returns `EmptyLayer` for the first layer that has nothing to offer
    pub fn sample_combination(&mut self, catalog: &LayerCatalog) -> Result<Combination> {
        let items = catalog
            .pools()
            .iter()
            .map(|pool| self.sample(pool).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Combination::new(items))
    }
}
