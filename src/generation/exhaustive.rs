use crate::catalog::{CatalogItem, LayerCatalog};
use crate::generation::combination::Combination;

/// Walks the cartesian product of a catalog's layers in a fixed order
///
/// The last layer varies fastest. Within a layer, items are visited tier by tier
/// in rank order, then in file-name order, so two walks over the same catalog
/// yield identical sequences.
pub struct ExhaustiveCombinations<'a> {
    pools: Vec<Vec<&'a CatalogItem>>,
    indices: Vec<usize>,
    exhausted: bool,
}

impl<'a> ExhaustiveCombinations<'a> {
    /// Start a walk over every layer of the catalog
    pub fn new(catalog: &'a LayerCatalog) -> Self {
        let pools: Vec<Vec<&'a CatalogItem>> = catalog
            .pools()
            .iter()
            .map(|pool| pool.all_items().collect())
            .collect();
        let exhausted = pools.is_empty() || pools.iter().any(Vec::is_empty);
        let indices = vec![0; pools.len()];

        Self {
            pools,
            indices,
            exhausted,
        }
    }

    fn current(&self) -> Option<Combination> {
        self.pools
            .iter()
            .zip(&self.indices)
            .map(|(pool, &index)| pool.get(index).map(|&item| item.clone()))
            .collect::<Option<Vec<_>>>()
            .map(Combination::new)
    }

    // Odometer increment; returns false once every position has wrapped
    fn advance(&mut self) -> bool {
        for (index, pool) in self.indices.iter_mut().zip(&self.pools).rev() {
            *index += 1;
            if *index < pool.len() {
                return true;
            }
            *index = 0;
        }
        false
    }
}

impl Iterator for ExhaustiveCombinations<'_> {
    type Item = Combination;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let combination = self.current();
        if !self.advance() {
            self.exhausted = true;
        }
        combination
    }
}
