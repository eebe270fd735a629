//! Integration tests for the configuration-to-quote pipeline.
//!
//! These tests exercise the public API end to end: pricing properties that
//! must hold for any rate table shaped like the built-in catalog, the
//! memoized pricing session, and every export path.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use vanity_core::export::{
    capture_preview, encode_share_param, jpeg_preview, try_decode_share_link, PreviewCapture,
    QuoteEmail,
};
use vanity_core::model::{
    CountertopSelection, DoorStyle, FixtureSelection, Fixtures, HandleStyle, PreviewImage,
};
use vanity_core::{
    build_quote, calculate_pricing, decode_share_link, encode_share_link, render_quote_pdf,
    render_quote_summary, send_quote_email, Brand, Branding, CustomerInfo, Dimension, Money,
    PricingCache, PricingSession, QuoteError, QuoteMailer, QuoteSettings, RateTable,
    VanityConfiguration,
};

// ==================== Fixtures ====================

/// Scenario A: 48" blum natural-oak shaker with three drawers.
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

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 15, 4, 5).unwrap()
}

fn base_price(config: &VanityConfiguration) -> Money {
    calculate_pricing(config, &RateTable::default())
        .unwrap()
        .base_price
}

/// Scenario D plus a quartz top and a full set of fixtures.
fn fully_loaded() -> VanityConfiguration {
    VanityConfiguration {
        include_room: true,
        room_length: 120,
        room_width: 96,
        floor_tile_style: "white-marble".to_string(),
        countertop: Some(CountertopSelection {
            material: "quartz".to_string(),
            edge_profile: "eased".to_string(),
            color: "calacatta".to_string(),
            sink_style: Some("undermount".to_string()),
            sink_shape: Some("square".to_string()),
        }),
        fixtures: Fixtures {
            toilet: Some(FixtureSelection::new("one-piece")),
            shower: Some(FixtureSelection::new("glass-enclosure")),
            bathtub: Some(FixtureSelection::new("freestanding")),
            mirror: Some(FixtureSelection::new("backlit")),
            faucet: Some(FixtureSelection::new("brushed-gold")),
            backsplash: Some(FixtureSelection::new("marble")),
        },
        zip_code: Some("78701".to_string()),
        ..scenario_a()
    }
}

fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let pixels = image::RgbImage::from_pixel(width, height, image::Rgb([210, 196, 170]));
    let mut data = Vec::new();
    pixels
        .write_to(&mut Cursor::new(&mut data), image::ImageFormat::Jpeg)
        .unwrap();
    data
}

// ==================== Scenario tests ====================

#[test]
fn test_scenario_a_totals() {
    let pricing = calculate_pricing(&scenario_a(), &RateTable::default()).unwrap();

    assert!(pricing.base_price.is_positive());
    assert!(pricing.total_price > pricing.base_price);
    assert!(pricing.tax.is_positive());
    assert!(pricing.shipping.is_positive());
    assert_eq!(
        pricing.total_price,
        pricing.subtotal + pricing.tax + pricing.shipping
    );
}

#[test]
fn test_scenario_b_wider_costs_more() {
    let wide = VanityConfiguration {
        width: Dimension::new(60, 0),
        ..scenario_a()
    };
    assert!(base_price(&wide) > base_price(&scenario_a()));
}

#[test]
fn test_scenario_c_hafele_costs_more_than_blum() {
    let hafele = VanityConfiguration {
        brand: Brand::Hafele,
        ..scenario_a()
    };
    assert!(base_price(&hafele) > base_price(&scenario_a()));
}

#[test]
fn test_scenario_d_room_add_on() {
    let room = VanityConfiguration {
        include_room: true,
        room_length: 120,
        room_width: 96,
        floor_tile_style: "white-marble".to_string(),
        ..scenario_a()
    };
    let pricing = calculate_pricing(&room, &RateTable::default()).unwrap();

    assert!(pricing.wall_price.is_positive());
    assert!(pricing.floor_price.is_positive());
    assert!(pricing.subtotal > pricing.base_price);
}

#[test]
fn test_scenario_e_malformed_links() {
    for input in [
        "",
        "https://www.example.com/vanity-designer",
        "https://www.example.com/vanity-designer?config=",
        "https://www.example.com/vanity-designer?config=%%%not-base64%%%",
        "?config=bm90IGpzb24",
        "config=eyJ3aWR0aCI6IndpZGUifQ",
    ] {
        assert!(decode_share_link(input).is_none(), "decoded {:?}", input);
    }
}

// ==================== Property tests ====================

#[test]
fn test_width_is_monotonic() {
    let mut previous = Money::zero();
    for width in (18u16..=96).step_by(6) {
        let config = VanityConfiguration {
            width: Dimension::new(width, 0),
            ..scenario_a()
        };
        let price = base_price(&config);
        assert!(price > previous, "width {} not above previous", width);
        previous = price;
    }
}

#[test]
fn test_hafele_above_blum_for_every_finish() {
    let rates = RateTable::default();
    for finish in rates.finishes_for(Brand::Blum) {
        let blum = VanityConfiguration {
            finish: finish.to_string(),
            ..scenario_a()
        };
        let hafele = VanityConfiguration {
            brand: Brand::Hafele,
            ..blum.clone()
        };
        assert!(base_price(&hafele) > base_price(&blum), "finish {}", finish);
    }
}

#[test]
fn test_zero_drawers_still_priced() {
    for brand in Brand::ALL {
        let rates = RateTable::default();
        let finish = rates.finishes_for(brand)[0].to_string();
        let config = VanityConfiguration {
            brand,
            finish,
            num_drawers: 0,
            door_style: DoorStyle::FlatPanel,
            handle_style: HandleStyle::None,
            width: Dimension::new(18, 0),
            height: Dimension::new(24, 0),
            depth: Dimension::new(12, 0),
            ..Default::default()
        };
        assert!(base_price(&config).is_positive(), "brand {:?}", brand);
    }
}

#[test]
fn test_tax_positive_for_every_state() {
    let rates = RateTable::default();
    for state in rates.tax.states.keys() {
        let config = VanityConfiguration {
            state: Some(state.clone()),
            ..scenario_a()
        };
        let pricing = calculate_pricing(&config, &rates).unwrap();
        assert!(pricing.tax.is_positive(), "state {}", state);
        assert!(pricing.shipping.is_positive());
    }
}

#[test]
fn test_free_shipping_above_threshold() {
    let rates = RateTable::default();
    let large = VanityConfiguration {
        width: Dimension::new(96, 0),
        brand: Brand::Hafele,
        include_room: true,
        room_length: 144,
        room_width: 120,
        floor_tile_style: "white-marble".to_string(),
        ..scenario_a()
    };
    let pricing = calculate_pricing(&large, &rates).unwrap();

    assert!(pricing.subtotal >= rates.shipping.free_threshold);
    assert!(pricing.shipping.is_zero());
    assert!(pricing.has_free_shipping());
    assert!(pricing.tax.is_positive());
}

#[test]
fn test_huge_room_is_rejected_not_overflowed() {
    let huge = VanityConfiguration {
        include_room: true,
        room_length: u32::MAX,
        room_width: u32::MAX,
        floor_tile_style: "white-marble".to_string(),
        ..scenario_a()
    };

    // Pricing alone clamps instead of wrapping to a negative quote.
    let pricing = calculate_pricing(&huge, &RateTable::default()).unwrap();
    assert!(pricing.total_price.is_positive());
    assert!(pricing.total_price >= pricing.subtotal);

    match build_quote(&huge, &RateTable::default(), None, created_at()).unwrap_err() {
        QuoteError::Validation { errors } => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["room_length", "room_width"]);
        }
        other => panic!("unexpected error: {}", other),
    }

    let mut session = PricingSession::new(Arc::new(RateTable::default()));
    let update = session.update(&huge);
    assert!(update.pricing.is_none());
    assert!(!update.errors.is_empty());
}

// ==================== Timing tests ====================

#[test]
fn test_pricing_stays_within_time_budget() {
    let rates = RateTable::default();
    let config = fully_loaded();
    let runs = 1_000u32;

    let mut slowest = Duration::ZERO;
    let started = Instant::now();
    for _ in 0..runs {
        let call = Instant::now();
        let pricing = calculate_pricing(&config, &rates).unwrap();
        slowest = slowest.max(call.elapsed());
        assert!(pricing.fixtures_price.is_positive());
    }
    let average = started.elapsed() / runs;

    assert!(average < Duration::from_millis(5), "average {:?}", average);
    assert!(slowest < Duration::from_millis(10), "slowest {:?}", slowest);
}

// ==================== Memoization tests ====================

#[test]
fn test_cache_returns_same_reference() {
    let mut cache = PricingCache::new(Arc::new(RateTable::default()));
    let first = cache.price(&scenario_a()).unwrap();
    let second = cache.price(&scenario_a().clone()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn test_session_keeps_last_valid_price() {
    let mut session = PricingSession::new(Arc::new(RateTable::default()));
    let good = session.update(&scenario_a());
    assert!(good.is_current());
    let good_pricing = good.pricing.unwrap();

    let broken = VanityConfiguration {
        zip_code: Some("9021".to_string()),
        ..scenario_a()
    };
    let update = session.update(&broken);
    assert!(update.stale);
    assert!(!update.errors.is_empty());
    assert!(Arc::ptr_eq(update.pricing.as_ref().unwrap(), &good_pricing));
}

// ==================== Pipeline tests ====================

#[test]
fn test_build_quote_rejects_invalid() {
    let config = VanityConfiguration {
        width: Dimension::new(48, 16),
        ..scenario_a()
    };
    let err = build_quote(&config, &RateTable::default(), None, created_at()).unwrap_err();
    match err {
        QuoteError::Validation { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "width");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_build_quote_is_deterministic() {
    let rates = RateTable::default();
    let first = build_quote(&scenario_a(), &rates, None, created_at()).unwrap();
    let second = build_quote(&scenario_a(), &rates, None, created_at()).unwrap();

    assert_eq!(first.reference, second.reference);
    assert_eq!(first.pricing, second.pricing);
    assert!(first.reference.starts_with("VQ-"));
}

#[test]
fn test_settings_rates_drive_pricing() {
    let mut rates = RateTable::default();
    rates.tax.default_rate = 0.10;
    rates.tax.states.clear();
    rates.tax.zip_prefixes.clear();
    let settings = QuoteSettings {
        rates: Some(rates),
        ..Default::default()
    };

    let pricing = calculate_pricing(&scenario_a(), &settings.rate_table()).unwrap();
    assert_eq!(pricing.tax, pricing.subtotal.scale(0.10));
}

// ==================== Export tests ====================

#[test]
fn test_pdf_from_quote() {
    let quote = build_quote(
        &scenario_a(),
        &RateTable::default(),
        Some(CustomerInfo::new("Robin Lake", "robin@example.com")),
        created_at(),
    )
    .unwrap()
    .with_preview(Some(jpeg_preview(sample_jpeg(320, 240)).unwrap()));

    let pdf = render_quote_pdf(&quote, &Branding::default()).unwrap();
    let text = String::from_utf8_lossy(&pdf);

    assert!(pdf.starts_with(b"%PDF-"));
    assert!(text.trim_end().ends_with("%%EOF"));
    assert!(text.contains(&quote.reference));
    assert!(text.contains("Natural Oak"));
    assert!(text.contains("/DCTDecode"));
}

#[test]
fn test_share_link_round_trip_through_url() {
    let config = VanityConfiguration {
        zip_code: Some("02139".to_string()),
        ..scenario_a()
    };
    let link = encode_share_link("https://shop.example.com/design?ref=email", &config).unwrap();
    assert!(link.starts_with("https://shop.example.com/design?ref=email&config="));

    let shared = decode_share_link(&link).unwrap();
    assert_eq!(shared.version(), 1);
    assert_eq!(shared.into_configuration(), config);
}

#[test]
fn test_share_param_accepts_query_forms() {
    let param = encode_share_param(&scenario_a()).unwrap();
    for input in [format!("?config={}", param), format!("config={}", param)] {
        let shared = try_decode_share_link(&input).unwrap();
        assert_eq!(shared.brand, Some(Brand::Blum));
    }
}

#[test]
fn test_summary_lists_breakdown() {
    let quote = build_quote(&scenario_a(), &RateTable::default(), None, created_at()).unwrap();
    let summary = render_quote_summary(&quote, &Branding::default());

    assert!(summary.contains("Vanity Cabinet"));
    assert!(summary.contains(&quote.pricing.total_price.display()));
}

// ==================== Collaborator tests ====================

#[derive(Default)]
struct OutboxMailer {
    outbox: Mutex<Vec<QuoteEmail>>,
}

#[async_trait]
impl QuoteMailer for OutboxMailer {
    async fn send(&self, email: &QuoteEmail) -> vanity_core::Result<()> {
        self.outbox.lock().unwrap().push(email.clone());
        Ok(())
    }
}

struct BrokenCanvas;

#[async_trait]
impl PreviewCapture for BrokenCanvas {
    async fn capture(&self) -> vanity_core::Result<PreviewImage> {
        Err(QuoteError::PreviewCaptureFailed {
            message: "WebGL context lost".to_string(),
        })
    }
}

#[tokio::test]
async fn test_email_quote_with_pdf() {
    let quote = build_quote(&scenario_a(), &RateTable::default(), None, created_at()).unwrap();
    let branding = Branding::default();
    let pdf = render_quote_pdf(&quote, &branding).unwrap();
    let mailer = OutboxMailer::default();

    send_quote_email(&mailer, &quote, &branding, "buyer@example.com", Some(pdf.as_slice()))
        .await
        .unwrap();

    let outbox = mailer.outbox.lock().unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].pricing, quote.pricing);
    assert_eq!(outbox[0].configuration, quote.configuration);
    assert!(outbox[0].pdf_attachment.is_some());
}

#[tokio::test]
async fn test_pdf_without_preview_after_capture_failure() {
    let preview = capture_preview(&BrokenCanvas).await;
    assert!(preview.is_none());

    let quote = build_quote(&scenario_a(), &RateTable::default(), None, created_at())
        .unwrap()
        .with_preview(preview);
    let pdf = render_quote_pdf(&quote, &Branding::default()).unwrap();
    assert!(!String::from_utf8_lossy(&pdf).contains("/DCTDecode"));
}
