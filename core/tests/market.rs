use watchdesk_core::{
    config::{EconomyConfig, MarketConfig},
    factory::ItemFactory,
    item::ItemKind,
    market::Market,
    rng::{RandomSource, SimRng},
};

/// Counts up from zero. The values stay tiny, so every `chance(p > 0)`
/// fires, while minted ids still differ.
#[derive(Default)]
struct CountingRng(u64);

impl RandomSource for CountingRng {
    fn next_u64(&mut self) -> u64 {
        let value = self.0;
        self.0 += 1;
        value
    }
}

fn setup(market: MarketConfig) -> (Market, ItemFactory) {
    let config = EconomyConfig::default();
    (Market::new(market), ItemFactory::new(&config))
}

#[test]
fn generate_draws_count_from_listing_range() {
    let (mut market, factory) = setup(MarketConfig::default());
    let mut rng = SimRng::new(21);

    for _ in 0..200 {
        let count = market.generate(None, &factory, &mut rng);
        assert!((7..=11).contains(&count), "Expected 7..=11 listings, got {count}");
        assert_eq!(market.len(), count);
    }
}

#[test]
fn generate_with_explicit_count_replaces_board() {
    let (mut market, factory) = setup(MarketConfig::default());
    let mut rng = SimRng::new(22);

    market.generate(Some(4), &factory, &mut rng);
    let first_ids: Vec<_> = market.listings().iter().map(|i| i.id.clone()).collect();
    market.generate(Some(2), &factory, &mut rng);

    assert_eq!(market.len(), 2);
    assert!(market.listings().iter().all(|i| !first_ids.contains(&i.id)));
}

#[test]
fn refresh_never_shrinks_without_churn() {
    let config = MarketConfig {
        churn_chance: 0.0,
        ..MarketConfig::default()
    };
    let (mut market, factory) = setup(config);
    let mut rng = SimRng::new(23);
    market.generate(None, &factory, &mut rng);

    for _ in 0..100 {
        let before = market.len();
        let report = market.refresh(&factory, &mut rng);
        assert_eq!(report.churned, 0);
        assert!(
            market.len() > before,
            "Expected more than {before} listings after refresh, got {}",
            market.len()
        );
        assert!((1..=3).contains(&report.added));
    }
}

#[test]
fn drift_stays_inside_band() {
    let config = MarketConfig {
        churn_chance: 0.0,
        ..MarketConfig::default()
    };
    let (mut market, factory) = setup(config.clone());
    let mut rng = SimRng::new(24);
    market.generate(Some(40), &factory, &mut rng);
    let before: Vec<_> = market.listings().to_vec();

    market.refresh(&factory, &mut rng);

    for (old, new) in before.iter().zip(market.listings()) {
        assert_eq!(old.id, new.id, "Listing order changed without churn");
        let band = match old.kind {
            ItemKind::Watch => config.watch_drift_band,
            ItemKind::Part  => config.part_drift_band,
        };
        let lo = (old.ask_price as f64 * (1.0 - band / 2.0)).floor() as i64 - 1;
        let hi = (old.ask_price as f64 * (1.0 + band / 2.0)).floor() as i64;
        assert!(
            new.ask_price >= lo.max(20) && new.ask_price <= hi.max(20),
            "Expected {} drift within {lo}..={hi}, got {}",
            old.ask_price, new.ask_price
        );
    }
}

#[test]
fn full_churn_leaves_only_replenished_listings() {
    let config = MarketConfig {
        churn_chance: 1.0,
        ..MarketConfig::default()
    };
    let (mut market, factory) = setup(config);
    let mut rng = SimRng::new(25);
    market.generate(Some(9), &factory, &mut rng);

    let report = market.refresh(&factory, &mut rng);
    assert_eq!(report.drifted, 9);
    assert_eq!(report.churned, 9);
    assert_eq!(market.len(), report.added);
}

#[test]
fn risk_flag_toggles_when_flip_fires() {
    let config = MarketConfig {
        churn_chance: 0.0,
        condition_reroll_chance: 0.0,
        risk_flip_chance: 1.0,
        ..MarketConfig::default()
    };
    let (mut market, factory) = setup(config);
    let mut rng = SimRng::new(26);
    market.generate(Some(10), &factory, &mut rng);
    let before: Vec<_> = market.listings().to_vec();

    market.refresh(&factory, &mut rng);

    for (old, new) in before.iter().zip(market.listings()) {
        if old.has_risk() {
            assert!(!new.has_risk(), "Flag on {} should have cleared", old.name);
        } else {
            assert_eq!(new.risk_note, "Provenance unclear");
        }
    }
}

#[test]
fn low_rolls_pick_range_low_ends() {
    let (mut market, factory) = setup(MarketConfig::default());
    let mut rng = CountingRng::default();

    let count = market.generate(None, &factory, &mut rng);
    assert_eq!(count, 7);
    // chance(0.40) fires on a near-zero roll, so every listing is a part.
    assert!(market.listings().iter().all(|i| i.kind == ItemKind::Part));

    let mut ids: Vec<_> = market.listings().iter().map(|i| i.id.clone()).collect();
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();
    assert_eq!(ids.len(), count, "Expected {count} distinct ids, got {}", ids.len());
}
