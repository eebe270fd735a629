//! Pure configuration-to-price calculation.

use super::rates::{lookup, RateTable};
use crate::error::Result;
use crate::model::{
    title_case, CabinetPosition, LineCategory, LineItem, Money, PricingBreakdown,
    VanityConfiguration,
};

/// Price a configuration against a rate table.
///
/// Deterministic: the same configuration and table always give the same
/// breakdown. An unknown brand/finish pair or option key is an error rather
/// than a zero price.
pub fn calculate_pricing(
    config: &VanityConfiguration,
    rates: &RateTable,
) -> Result<PricingBreakdown> {
    let mut items = Vec::new();

    cabinet_items(config, rates, &mut items)?;
    if config.include_room {
        room_items(config, rates, &mut items)?;
    }
    countertop_items(config, rates, &mut items)?;
    fixture_items(config, rates, &mut items)?;

    let total_of = |category: LineCategory| -> Money {
        items
            .iter()
            .filter(|item| item.category == category)
            .map(|item| item.amount)
            .sum()
    };

    let base_price = total_of(LineCategory::Cabinet);
    let wall_price = total_of(LineCategory::Wall);
    let floor_price = total_of(LineCategory::Floor);
    let countertop_price = total_of(LineCategory::Countertop);
    let fixtures_price = total_of(LineCategory::Fixture);

    let subtotal = base_price + wall_price + floor_price + countertop_price + fixtures_price;

    let tax_rate = rates
        .tax
        .rate_for(config.zip_code.as_deref(), config.state.as_deref());
    let tax = subtotal.scale(tax_rate);
    let shipping = rates.shipping.quote(subtotal, config.width.to_inches());
    let total_price = subtotal + tax + shipping;

    tracing::debug!(
        "Priced {} {} {}: base={} subtotal={} total={}",
        config.brand,
        config.finish,
        config.size_label(),
        base_price,
        subtotal,
        total_price
    );

    Ok(PricingBreakdown {
        base_price,
        wall_price,
        floor_price,
        countertop_price,
        fixtures_price,
        subtotal,
        tax_rate,
        tax,
        shipping,
        total_price,
        line_items: items,
    })
}

/// Cabinet box, finish, doors, drawers, handles and mounting.
fn cabinet_items(
    config: &VanityConfiguration,
    rates: &RateTable,
    items: &mut Vec<LineItem>,
) -> Result<()> {
    let (brand, finish_multiplier) = rates.material(config.brand, &config.finish)?;

    let width = config.width.to_inches();
    let size_factor = (config.height.to_inches() / rates.reference_height)
        * (config.depth.to_inches() / rates.reference_depth);

    let box_cents = (brand.unit_base.cents as f64
        + brand.per_linear_foot.cents as f64 * config.width.to_feet())
        * size_factor
        * finish_multiplier;
    // Floor at one cent so a degenerate size never quotes $0.
    let carcass = Money::from_cents((box_cents.round() as i64).max(1));
    items.push(LineItem::new(
        LineCategory::Cabinet,
        format!(
            "{} cabinet, {} finish ({})",
            config.brand.label(),
            title_case(&config.finish),
            config.size_label()
        ),
        carcass,
    ));

    let door_surcharge = lookup(&rates.door_styles, "door style", config.door_style.key())?;
    if door_surcharge.is_positive() {
        items.push(LineItem::new(
            LineCategory::Cabinet,
            format!("{} doors", config.door_style.label()),
            door_surcharge,
        ));
    }

    if config.num_drawers > 0 {
        items.push(LineItem::new(
            LineCategory::Cabinet,
            format!("{} drawer(s)", config.num_drawers),
            rates.per_drawer * config.num_drawers as i64,
        ));
    }

    let handle_count = config.door_style.door_count(width) as i64 + config.num_drawers as i64;
    let per_handle = lookup(&rates.handles, "handle style", config.handle_style.key())?;
    if handle_count > 0 && per_handle.is_positive() {
        items.push(LineItem::new(
            LineCategory::Cabinet,
            format!("{} x {}", handle_count, config.handle_style.label()),
            per_handle * handle_count,
        ));
    }

    if config.cabinet_position == CabinetPosition::WallMounted {
        items.push(LineItem::new(
            LineCategory::Cabinet,
            "Wall-mount hardware",
            rates.wall_mount_surcharge,
        ));
    }

    Ok(())
}

/// Wall finishing and floor tile for the surrounding room.
fn room_items(
    config: &VanityConfiguration,
    rates: &RateTable,
    items: &mut Vec<LineItem>,
) -> Result<()> {
    let length = config.room_length as f64;
    let width = config.room_width as f64;

    let wall_sqft = 2.0 * (length + width) * rates.wall_height / 144.0;
    items.push(LineItem::new(
        LineCategory::Wall,
        format!("Wall finishing ({:.0} sq ft)", wall_sqft),
        rates.wall_finish_per_sqft.scale(wall_sqft),
    ));

    let tile = if config.floor_tile_style.trim().is_empty() {
        rates.default_floor_tile.as_str()
    } else {
        config.floor_tile_style.as_str()
    };
    let tile_rate = lookup(&rates.floor_tiles, "floor tile", tile)?;
    let floor_sqft = length * width / 144.0;
    items.push(LineItem::new(
        LineCategory::Floor,
        format!("{} floor tile ({:.0} sq ft)", title_case(tile), floor_sqft),
        tile_rate.scale(floor_sqft),
    ));

    Ok(())
}

/// Countertop slab, exposed edge and sink.
fn countertop_items(
    config: &VanityConfiguration,
    rates: &RateTable,
    items: &mut Vec<LineItem>,
) -> Result<()> {
    let Some(top) = &config.countertop else {
        return Ok(());
    };
    let table = &rates.countertop;

    let width = config.width.to_inches();
    let depth = config.depth.to_inches() + table.overhang;

    let per_sqft = lookup(&table.materials, "countertop material", &top.material)?;
    let slab_sqft = width * depth / 144.0;
    items.push(LineItem::new(
        LineCategory::Countertop,
        format!("{} countertop ({:.1} sq ft)", title_case(&top.material), slab_sqft),
        per_sqft.scale(slab_sqft),
    ));

    let per_edge_foot = lookup(&table.edges, "edge profile", &top.edge_profile)?;
    // Front edge plus both returns.
    let edge_feet = (width + 2.0 * depth) / 12.0;
    if per_edge_foot.is_positive() {
        items.push(LineItem::new(
            LineCategory::Countertop,
            format!("{} edge", title_case(&top.edge_profile)),
            per_edge_foot.scale(edge_feet),
        ));
    }

    if let Some(style) = &top.sink_style {
        let mut sink = lookup(&table.sinks, "sink style", style)?;
        if let Some(shape) = &top.sink_shape {
            sink = sink + lookup(&table.sink_shapes, "sink shape", shape)?;
        }
        items.push(LineItem::new(
            LineCategory::Countertop,
            format!("{} sink", title_case(style)),
            sink,
        ));
    }

    Ok(())
}

fn fixture_items(
    config: &VanityConfiguration,
    rates: &RateTable,
    items: &mut Vec<LineItem>,
) -> Result<()> {
    for (kind, selection) in config.fixtures.selected() {
        let styles = rates.fixtures.get(kind.key()).ok_or_else(|| {
            crate::error::QuoteError::UnknownOption {
                category: "fixture".to_string(),
                key: kind.key().to_string(),
            }
        })?;
        let price = lookup(styles, kind.key(), &selection.style)?;
        items.push(LineItem::new(
            LineCategory::Fixture,
            format!("{} {}", title_case(&selection.style), kind.label().to_lowercase()),
            price,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use crate::model::{
        Brand, CountertopSelection, Dimension, DoorStyle, FixtureSelection, HandleStyle,
    };

    fn scenario_a() -> VanityConfiguration {
        VanityConfiguration {
            width: Dimension::new(48, 0),
            height: Dimension::new(36, 0),
            depth: Dimension::new(21, 0),
            brand: Brand::Blum,
            finish: "natural-oak".to_string(),
            door_style: DoorStyle::Shaker,
            num_drawers: 3,
            handle_style: HandleStyle::Bar,
            include_room: false,
            ..Default::default()
        }
    }

    fn price(config: &VanityConfiguration) -> PricingBreakdown {
        calculate_pricing(config, &RateTable::default()).expect("pricing")
    }

    // ==================== Totals ====================

    #[test]
    fn test_breakdown_sums() {
        let p = price(&scenario_a());
        assert_eq!(
            p.subtotal,
            p.base_price + p.wall_price + p.floor_price + p.countertop_price + p.fixtures_price
        );
        assert_eq!(p.total_price, p.subtotal + p.tax + p.shipping);
        assert_eq!(p.base_price, p.category_total(LineCategory::Cabinet));
    }

    #[test]
    fn test_scenario_a_positive() {
        let p = price(&scenario_a());
        assert!(p.base_price.is_positive());
        assert!(p.total_price > p.base_price);
        assert!(p.tax.is_positive());
        assert!(p.shipping.is_positive());
        assert!(p.wall_price.is_zero());
        assert!(p.floor_price.is_zero());
    }

    #[test]
    fn test_scenario_a_exact_base() {
        // (500 + 260 * 4) * (36 / 34.5) * 1.10 = 1767.65 box
        // + 120 shaker + 3 * 85 drawers + 5 * 18 bar handles
        let p = price(&scenario_a());
        assert_eq!(p.base_price.cents, 176_765 + 12_000 + 25_500 + 9_000);
    }

    // ==================== Base price behaviour ====================

    #[test]
    fn test_width_is_monotonic() {
        let mut previous = Money::zero();
        for inches in (18..=120).step_by(6) {
            let mut config = scenario_a();
            config.width = Dimension::new(inches, 0);
            let base = price(&config).base_price;
            assert!(base > previous, "width {} did not increase price", inches);
            previous = base;
        }
    }

    #[test]
    fn test_quarter_inch_increases_price() {
        let mut config = scenario_a();
        let narrow = price(&config).base_price;
        config.width = Dimension::new(48, 4);
        assert!(price(&config).base_price > narrow);
    }

    #[test]
    fn test_hafele_above_blum() {
        let blum = price(&scenario_a()).base_price;
        let mut config = scenario_a();
        config.brand = Brand::Hafele;
        assert!(price(&config).base_price > blum);
    }

    #[test]
    fn test_zero_drawers_and_no_options_still_positive() {
        let mut config = scenario_a();
        config.num_drawers = 0;
        config.handle_style = HandleStyle::None;
        config.door_style = DoorStyle::FlatPanel;
        config.finish = "white".to_string();
        let p = price(&config);
        assert!(p.base_price.is_positive());
        assert_eq!(p.line_items.len(), 1);
    }

    #[test]
    fn test_wall_mount_surcharge() {
        let floor = price(&scenario_a()).base_price;
        let mut config = scenario_a();
        config.cabinet_position = CabinetPosition::WallMounted;
        assert_eq!(price(&config).base_price - floor, Money::from_cents(150_00));
    }

    #[test]
    fn test_invalid_material() {
        let mut config = scenario_a();
        config.finish = "tie-dye".to_string();
        let err = calculate_pricing(&config, &RateTable::default()).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidMaterial { .. }));
    }

    // ==================== Room ====================

    #[test]
    fn test_room_add_ons() {
        let mut config = scenario_a();
        config.include_room = true;
        config.room_length = 120;
        config.room_width = 96;
        config.floor_tile_style = "white-marble".to_string();
        let p = price(&config);
        // 2 * (120 + 96) * 96 / 144 = 288 sq ft at $4.50
        assert_eq!(p.wall_price.cents, 1_296_00);
        // 120 * 96 / 144 = 80 sq ft at $18.00
        assert_eq!(p.floor_price.cents, 1_440_00);
        assert!(p.subtotal > p.base_price);
    }

    #[test]
    fn test_room_ignored_when_not_included() {
        let mut config = scenario_a();
        config.room_length = 120;
        config.room_width = 96;
        config.floor_tile_style = "white-marble".to_string();
        let p = price(&config);
        assert!(p.wall_price.is_zero());
        assert!(p.floor_price.is_zero());
    }

    #[test]
    fn test_room_default_tile() {
        let mut config = scenario_a();
        config.include_room = true;
        config.room_length = 120;
        config.room_width = 96;
        let p = price(&config);
        assert_eq!(p.floor_price.cents, 80 * 9_00);
    }

    #[test]
    fn test_room_unknown_tile() {
        let mut config = scenario_a();
        config.include_room = true;
        config.room_length = 120;
        config.room_width = 96;
        config.floor_tile_style = "shag".to_string();
        let err = calculate_pricing(&config, &RateTable::default()).unwrap_err();
        assert!(matches!(err, QuoteError::UnknownOption { .. }));
    }

    // ==================== Countertop and fixtures ====================

    #[test]
    fn test_countertop_and_sink() {
        let mut config = scenario_a();
        config.countertop = Some(CountertopSelection {
            material: "quartz".to_string(),
            edge_profile: "eased".to_string(),
            color: "calacatta".to_string(),
            sink_style: Some("undermount".to_string()),
            sink_shape: Some("square".to_string()),
        });
        let p = price(&config);
        // 48 x 22 / 144 = 7.333 sq ft at $75 = $550, plus $250 + $25 sink
        assert_eq!(p.countertop_price.cents, 550_00 + 275_00);
        assert_eq!(p.subtotal, p.base_price + p.countertop_price);
    }

    #[test]
    fn test_fixtures_priced() {
        let mut config = scenario_a();
        config.fixtures.faucet = Some(FixtureSelection::new("chrome"));
        config.fixtures.mirror = Some(FixtureSelection::new("backlit"));
        let p = price(&config);
        assert_eq!(p.fixtures_price.cents, 140_00 + 380_00);
    }

    #[test]
    fn test_unknown_fixture_style() {
        let mut config = scenario_a();
        config.fixtures.toilet = Some(FixtureSelection::new("golden"));
        let err = calculate_pricing(&config, &RateTable::default()).unwrap_err();
        match err {
            QuoteError::UnknownOption { category, key } => {
                assert_eq!(category, "toilet");
                assert_eq!(key, "golden");
            }
            other => panic!("Expected UnknownOption, got {:?}", other),
        }
    }

    // ==================== Tax and shipping ====================

    #[test]
    fn test_tax_follows_zip() {
        let mut config = scenario_a();
        config.zip_code = Some("90210".to_string());
        let p = price(&config);
        assert_eq!(p.tax_rate, 0.0725);
        assert_eq!(p.tax, p.subtotal.scale(0.0725));
    }

    #[test]
    fn test_free_shipping_over_threshold() {
        let mut config = scenario_a();
        config.brand = Brand::Hafele;
        config.width = Dimension::new(120, 0);
        config.fixtures.bathtub = Some(FixtureSelection::new("clawfoot"));
        let p = price(&config);
        assert!(p.subtotal >= RateTable::default().shipping.free_threshold);
        assert!(p.shipping.is_zero());
        assert!(p.has_free_shipping());
    }

    #[test]
    fn test_deterministic() {
        let config = scenario_a();
        assert_eq!(price(&config), price(&config.clone()));
    }
}
