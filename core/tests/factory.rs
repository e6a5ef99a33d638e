use watchdesk_core::{
    config::EconomyConfig,
    factory::ItemFactory,
    item::{Condition, ItemKind},
    rng::SimRng,
};

fn factory() -> (ItemFactory, EconomyConfig) {
    let config = EconomyConfig::default();
    (ItemFactory::new(&config), config)
}

#[test]
fn generated_items_are_unowned_and_above_floor() {
    let (factory, config) = factory();
    let mut rng = SimRng::new(11);

    for _ in 0..2_000 {
        let item = factory.generate_listing(&mut rng);
        assert!(
            item.ask_price >= config.price_floor,
            "Expected ask >= {}, got {} for {}",
            config.price_floor, item.ask_price, item.name
        );
        assert_eq!(item.acquisition_cost, 0, "Fresh listing {} already has a cost", item.name);
        assert!(item.wholesale_cost > 0, "Wholesale cost should be floored above zero");
    }
}

#[test]
fn watches_stay_inside_their_brand_band() {
    let (factory, config) = factory();
    let cat = &config.catalog;
    let mut rng = SimRng::new(12);
    let surcharge = cat.parts_swap_surcharge.max;

    for _ in 0..2_000 {
        let watch = factory.generate_watch(&mut rng);
        let band = cat
            .brand(&watch.brand)
            .and_then(|b| b.watch_price)
            .unwrap_or(cat.default_watch_price);
        assert!(
            watch.ask_price >= band.min && watch.ask_price <= band.max + surcharge,
            "Expected {} ask in {}..={}, got {}",
            watch.brand, band.min, band.max + surcharge, watch.ask_price
        );
        assert!(cat.watch_grades.contains(&watch.condition));
    }
}

#[test]
fn prestige_watches_never_carry_parts_swap_note() {
    let (factory, config) = factory();
    let mut rng = SimRng::new(13);
    let mut prestige_seen = 0;

    for _ in 0..3_000 {
        let watch = factory.generate_watch(&mut rng);
        if watch.brand == config.catalog.prestige_brand {
            prestige_seen += 1;
            assert_ne!(watch.risk_note, config.catalog.parts_swap_note);
            assert!(
                config.catalog.brand("Rolex").unwrap().references.contains(&watch.reference),
                "Rolex watch has unknown reference {:?}",
                watch.reference
            );
        }
    }
    assert!(prestige_seen > 0, "No prestige watches in 3000 draws");
}

#[test]
fn only_prestige_parts_carry_aftermarket_risk() {
    let (factory, config) = factory();
    let mut rng = SimRng::new(14);

    for _ in 0..3_000 {
        let part = factory.generate_part(&mut rng);
        assert_eq!(part.kind, ItemKind::Part);
        assert!(config.catalog.part_grades.contains(&part.condition));
        if part.has_risk() {
            assert_eq!(part.brand, config.catalog.prestige_brand);
            assert_eq!(part.risk_note, config.catalog.part_aftermarket_note);
        }
        if part.brand != config.catalog.prestige_brand {
            assert!(part.reference.is_empty(), "{} part got a reference", part.brand);
        }
    }
}

#[test]
fn movement_parts_name_their_caliber() {
    let (factory, config) = factory();
    let mut rng = SimRng::new(15);

    let movement = (0..5_000)
        .map(|_| factory.generate_part(&mut rng))
        .find(|p| p.name.contains(&config.catalog.movement_component))
        .expect("a movement part in 5000 draws");
    assert!(
        config
            .catalog
            .movement_calibers
            .iter()
            .any(|cal| movement.name.ends_with(&format!("({cal})"))),
        "Expected caliber suffix, got {:?}",
        movement.name
    );
}

#[test]
fn part_listing_share_tracks_config() {
    let (factory, _) = factory();
    let mut rng = SimRng::new(16);
    let parts = (0..10_000)
        .filter(|_| factory.generate_listing(&mut rng).kind == ItemKind::Part)
        .count();
    let share = parts as f64 / 10_000.0;
    assert!((0.36..0.44).contains(&share), "Expected ~40% parts, got {share:.3}");
}

#[test]
fn derived_parts_inherit_brand_and_reference() {
    let (factory, _) = factory();
    let mut rng = SimRng::new(17);
    let watch = factory.generate_watch(&mut rng);

    let part = factory.derive_part(&watch, "crown", Condition::Fair, 5, &mut rng);
    assert_eq!(part.brand, watch.brand);
    assert_eq!(part.reference, watch.reference);
    assert_eq!(part.condition, Condition::Fair);
    assert_eq!(part.ask_price, factory.price_floor(), "Ask below floor should be lifted");
    assert_eq!(part.acquisition_cost, 0);
    assert!(part.risk_note.is_empty());
    assert_ne!(part.id, watch.id);
}
