//! Tests for scanning flat and tiered layer directories

#[cfg(test)]
mod tests {
    use crate::write_png;
    use layermint::catalog::loader::{infer_tier, scan_images, tier_directory};
    use layermint::catalog::{CatalogItem, CatalogLoader, Layer, LayerLayout};
    use layermint::rarity::RarityTier;
    use std::path::Path;

    const RED: [u8; 4] = [255, 0, 0, 255];

    fn names(items: &[CatalogItem]) -> Vec<String> {
        items.iter().map(CatalogItem::file_name).collect()
    }

    // Tests flat layers infer tiers from file names and skip non-images
    // Verified by accepting every file regardless of extension
    #[test]
    fn test_flat_layer_scan() {
        let dir = tempfile::tempdir().unwrap();
        let layer_dir = dir.path().join("Background");
        write_png(&layer_dir.join("b.png"), 2, 2, RED);
        write_png(&layer_dir.join("a.png"), 2, 2, RED);
        write_png(&layer_dir.join("gold_exotic.png"), 2, 2, RED);
        std::fs::write(layer_dir.join("notes.txt"), "not an image").unwrap();

        let loader = CatalogLoader::new(LayerLayout::Auto, None);
        let pool = loader
            .load_layer(&Layer::new("Background", &layer_dir))
            .unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(names(pool.items(RarityTier::Common)), ["a.png", "b.png"]);
        assert_eq!(names(pool.items(RarityTier::Exotic)), ["gold_exotic.png"]);
    }

    // Tests tier subdirectories are detected and root files ignored
    // Verified by forcing flat layout in auto mode
    #[test]
    fn test_tiered_layer_scan() {
        let dir = tempfile::tempdir().unwrap();
        let layer_dir = dir.path().join("Shape");
        write_png(&layer_dir.join("Common").join("circle.png"), 2, 2, RED);
        write_png(&layer_dir.join("exotic").join("star.PNG"), 2, 2, RED);
        write_png(&layer_dir.join("stray.png"), 2, 2, RED);

        let loader = CatalogLoader::new(LayerLayout::Auto, None);
        let pool = loader.load_layer(&Layer::new("Shape", &layer_dir)).unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(names(pool.items(RarityTier::Common)), ["circle.png"]);
        assert_eq!(names(pool.items(RarityTier::Exotic)), ["star.PNG"]);
        assert!(pool.items(RarityTier::Common).iter().all(|i| i.layer_name == "Shape"));
    }

    // Tests forcing flat layout ignores tier subdirectories
    // Verified by recursing into subdirectories
    #[test]
    fn test_forced_flat_layout() {
        let dir = tempfile::tempdir().unwrap();
        let layer_dir = dir.path().join("Shape");
        write_png(&layer_dir.join("Rare").join("square.png"), 2, 2, RED);
        write_png(&layer_dir.join("dot.png"), 2, 2, RED);

        let loader = CatalogLoader::new(LayerLayout::Flat, None);
        let pool = loader.load_layer(&Layer::new("Shape", &layer_dir)).unwrap();

        assert_eq!(pool.len(), 1);
        assert_eq!(names(pool.items(RarityTier::Common)), ["dot.png"]);
    }

    // Tests the rarity filter drops tiers for every layer
    // Verified by applying the filter after loading only
    #[test]
    fn test_rarity_filter() {
        let dir = tempfile::tempdir().unwrap();
        let layer_dir = dir.path().join("Shape");
        write_png(&layer_dir.join("Common").join("circle.png"), 2, 2, RED);
        write_png(&layer_dir.join("Rare").join("square.png"), 2, 2, RED);

        let filter = [RarityTier::Rare];
        let loader = CatalogLoader::new(LayerLayout::Tiered, Some(&filter));
        assert_eq!(loader.retained_tiers(), [RarityTier::Rare]);

        let pool = loader.load_layer(&Layer::new("Shape", &layer_dir)).unwrap();
        assert_eq!(pool.len(), 1);
        assert!(pool.items(RarityTier::Common).is_empty());
        let retained: Vec<RarityTier> = pool.retained_tiers().collect();
        assert_eq!(retained, [RarityTier::Rare]);
    }

    // Tests missing directories produce an empty layer instead of an error
    // Verified by propagating the not-found error
    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loader = CatalogLoader::new(LayerLayout::Tiered, None);
        let pool = loader
            .load_layer(&Layer::new("Ghost", dir.path().join("nowhere")))
            .unwrap();
        assert!(pool.is_empty());
        assert!(scan_images(&dir.path().join("nowhere")).unwrap().is_empty());
    }

    // Tests catalogs keep the configured layer order
    // Verified by sorting layers by name
    #[test]
    fn test_load_preserves_layer_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("z").join("a.png"), 2, 2, RED);
        write_png(&dir.path().join("a").join("a.png"), 2, 2, RED);

        let layers = [
            Layer::new("Zeta", dir.path().join("z")),
            Layer::new("Alpha", dir.path().join("a")),
        ];
        let catalog = CatalogLoader::new(LayerLayout::Auto, None)
            .load(&layers)
            .unwrap();
        let order: Vec<&str> = catalog.pools().iter().map(|p| p.name()).collect();
        assert_eq!(order, ["Zeta", "Alpha"]);
    }

    // Tests tier directories are found under exact and lowercase names
    // Verified by probing only the exact name
    #[test]
    fn test_tier_directory_probe() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("legendary")).unwrap();
        assert!(tier_directory(dir.path(), RarityTier::Legendary).is_some());
        assert!(tier_directory(dir.path(), RarityTier::Mythic).is_none());
    }

    // Tests file-name tier inference prefers the highest tier named
    // Verified by returning the first match in rank order
    #[test]
    fn test_infer_tier() {
        assert_eq!(infer_tier(Path::new("gold_Exotic.png")), RarityTier::Exotic);
        assert_eq!(
            infer_tier(Path::new("rare_but_mythic.png")),
            RarityTier::Mythic
        );
        assert_eq!(infer_tier(Path::new("plain.png")), RarityTier::Common);
    }

    // Tests tier names only count as whole tokens of the file name
    // Verified by matching tier names anywhere inside the name
    #[test]
    fn test_infer_tier_whole_tokens() {
        assert_eq!(infer_tier(Path::new("epicenter.png")), RarityTier::Common);
        assert_eq!(infer_tier(Path::new("legendarySword.png")), RarityTier::Common);
        assert_eq!(infer_tier(Path::new("star-epic.png")), RarityTier::Epic);
        assert_eq!(infer_tier(Path::new("crown legendary.v2.png")), RarityTier::Legendary);
    }

    // Tests a filter keeps flat items whose names merely contain a tier name
    // Verified by dropping epicenter as an Epic item
    #[test]
    fn test_flat_filter_keeps_lookalike_names() {
        let dir = tempfile::tempdir().unwrap();
        let layer_dir = dir.path().join("Shape");
        write_png(&layer_dir.join("epicenter.png"), 2, 2, RED);

        let filter = [RarityTier::Common];
        let loader = CatalogLoader::new(LayerLayout::Flat, Some(&filter));
        let pool = loader.load_layer(&Layer::new("Shape", &layer_dir)).unwrap();
        assert_eq!(pool.len(), 1);
    }
}
