//! Tests for combination fingerprints

#[cfg(test)]
mod tests {
    use layermint::catalog::CatalogItem;
    use layermint::generation::Combination;
    use layermint::rarity::RarityTier;

    fn item(layer: &str, tier: RarityTier, file: &str) -> CatalogItem {
        CatalogItem::new(layer, tier, file)
    }

    // Tests equal selections share a fingerprint
    // Verified by including a random nonce in the fingerprint
    #[test]
    fn test_equal_combinations_match() {
        let a = Combination::new(vec![
            item("Background", RarityTier::Common, "bg/a.png"),
            item("Shape", RarityTier::Exotic, "shape/star.png"),
        ]);
        let b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    // Tests layer order is part of identity
    // Verified by sorting items before fingerprinting
    #[test]
    fn test_fingerprint_is_order_sensitive() {
        let a = Combination::new(vec![
            item("Background", RarityTier::Common, "a.png"),
            item("Shape", RarityTier::Common, "b.png"),
        ]);
        let b = Combination::new(vec![
            item("Shape", RarityTier::Common, "b.png"),
            item("Background", RarityTier::Common, "a.png"),
        ]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    // Tests the same file under a different tier is a different combination
    // Verified by fingerprinting files only
    #[test]
    fn test_fingerprint_includes_tier() {
        let a = Combination::new(vec![item("Shape", RarityTier::Common, "star.png")]);
        let b = Combination::new(vec![item("Shape", RarityTier::Rare, "star.png")]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    // Tests tier listing follows layer order
    // Verified by collecting tiers in rank order
    #[test]
    fn test_tiers_in_layer_order() {
        let combination = Combination::new(vec![
            item("A", RarityTier::Mythic, "a.png"),
            item("B", RarityTier::Common, "b.png"),
        ]);
        let tiers: Vec<RarityTier> = combination.tiers().collect();
        assert_eq!(tiers, [RarityTier::Mythic, RarityTier::Common]);
        assert_eq!(combination.len(), 2);
        assert!(!combination.is_empty());
    }
}
