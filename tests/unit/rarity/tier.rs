//! Tests for rarity tiers and probability table validation

#[cfg(test)]
mod tests {
    use layermint::GenerationError;
    use layermint::rarity::{RarityTable, RarityTier};

    // Tests the standard table passes its own validation
    // Verified by perturbing one standard weight
    #[test]
    fn test_standard_table_is_valid() {
        let table = RarityTable::new(RarityTable::STANDARD_WEIGHTS).unwrap();
        assert_eq!(table, RarityTable::standard());
        assert_eq!(table, RarityTable::default());
    }

    // Tests per-tier weight lookup
    // Verified by shifting the weight index by one
    #[test]
    fn test_weight_lookup() {
        let table = RarityTable::standard();
        assert!((table.weight(RarityTier::Common) - 0.50).abs() < f64::EPSILON);
        assert!((table.weight(RarityTier::Legendary) - 0.07).abs() < f64::EPSILON);
        assert!((table.weight(RarityTier::Exotic) - 0.01).abs() < f64::EPSILON);
    }

    // Tests tables whose weights do not sum to one are refused
    // Verified by removing the sum check
    #[test]
    fn test_rejects_bad_sum() {
        let err = RarityTable::new([0.5, 0.5, 0.5, 0.0, 0.0, 0.0]).unwrap_err();
        match err {
            GenerationError::Configuration { parameter, .. } => {
                assert_eq!(parameter, "rarity_weights");
            }
            other => unreachable!("Expected Configuration error, got {other}"),
        }
    }

    // Tests negative and non-finite weights are refused even if the sum is one
    // Verified by dropping the per-weight check
    #[test]
    fn test_rejects_invalid_weights() {
        assert!(RarityTable::new([1.5, -0.5, 0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(RarityTable::new([f64::NAN, 1.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    // Tests ranks map both ways
    // Verified by swapping two ranks
    #[test]
    fn test_rank_round_trip() {
        for (expected_rank, tier) in (1_u8..).zip(RarityTier::ALL) {
            assert_eq!(tier.rank(), expected_rank);
            assert_eq!(RarityTier::from_rank(expected_rank), Some(tier));
        }
        assert_eq!(RarityTier::from_rank(0), None);
        assert_eq!(RarityTier::from_rank(7), None);
    }

    // Tests tiers order from Common to Exotic
    // Verified by reordering enum variants
    #[test]
    fn test_tier_ordering_and_names() {
        assert!(RarityTier::Common < RarityTier::Rare);
        assert!(RarityTier::Mythic < RarityTier::Exotic);
        assert_eq!(RarityTier::Legendary.to_string(), "Legendary");
        assert_eq!(RarityTier::Epic.name(), "Epic");
    }

    // Tests tiers serialize by name and accept lowercase input
    // Verified by removing the lowercase aliases
    #[test]
    fn test_tier_serde() {
        assert_eq!(
            serde_json::to_string(&RarityTier::Epic).unwrap(),
            "\"Epic\""
        );
        let parsed: RarityTier = serde_json::from_str("\"mythic\"").unwrap();
        assert_eq!(parsed, RarityTier::Mythic);
    }
}
