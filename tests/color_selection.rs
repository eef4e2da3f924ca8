use line_livery::color::{
    ColorStrategy, DistinctPick, RandomColor, RandomHue, distance, min_distance, pick_color,
    pick_distinct_color, strategy_for,
};
use line_livery::models::{BrightnessClass, Color, ColorFamily, TransportCategory};
use line_livery::palette::{PaletteSet, parse_palette};
use line_livery::ColorStrategyKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn sample_colors() -> Vec<Color> {
    let mut out = Vec::new();
    for r in [0u8, 17, 128, 255] {
        for g in [0u8, 90, 255] {
            for b in [0u8, 200] {
                out.push(Color::new(r, g, b, if r == 17 { 40 } else { 255 }));
            }
        }
    }
    out
}

#[test]
fn distance_is_symmetric_and_zero_on_self() {
    let colors = sample_colors();
    for a in &colors {
        assert_eq!(distance(*a, *a), 0.0);
        for b in &colors {
            assert_eq!(distance(*a, *b), distance(*b, *a));
            assert!((0.0..=100.0 + 1e-9).contains(&distance(*a, *b)));
        }
    }
}

#[test]
fn distance_uses_squared_differences() {
    // one channel fully apart: 255 / sqrt(3 * 255^2) = 1 / sqrt(3)
    let d = distance(Color::rgb(0, 0, 0), Color::rgb(255, 0, 0));
    assert!((d - 100.0 / 3f64.sqrt()).abs() < 1e-9, "{d}");
}

#[test]
fn min_distance_without_used_colors_is_infinite() {
    assert!(min_distance(Color::rgb(1, 2, 3), &[]).is_infinite());
    let used = [Color::rgb(0, 0, 0), Color::rgb(1, 2, 3)];
    assert_eq!(min_distance(Color::rgb(1, 2, 3), &used), 0.0);
}

#[test]
fn nothing_used_returns_a_palette_member() {
    let palette = parse_palette(line_livery::palette::DEFAULT_ALL_COLORS);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let tuning = DistinctPick {
            min_diff_percent: 5.0,
            max_attempts: 1,
        };
        let c = pick_distinct_color(&palette, &[], tuning, &mut rng);
        assert!(palette.contains(&c));
    }
}

#[test]
fn distinct_color_is_found_when_one_exists() {
    let black = Color::rgb(0, 0, 0);
    let white = Color::rgb(255, 255, 255);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let c = pick_distinct_color(&[black, white], &[black], DistinctPick::default(), &mut rng);
        assert_eq!(c, white);
        assert!(min_distance(c, &[black]) >= DistinctPick::default().min_diff_percent);
    }
}

#[test]
fn exhausted_attempts_fall_back_to_first_unused_entry() {
    let used = Color::rgb(100, 100, 100);
    let near = Color::rgb(101, 100, 100);
    let nearer = Color::rgb(100, 100, 101);
    let tuning = DistinctPick {
        min_diff_percent: 50.0,
        max_attempts: 3,
    };
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(pick_distinct_color(&[used, near, nearer], &[used], tuning, &mut rng), near);
}

#[test]
fn fully_used_palette_degrades_to_a_sample() {
    let a = Color::rgb(10, 10, 10);
    let b = Color::rgb(12, 10, 10);
    let mut rng = StdRng::seed_from_u64(11);
    let c = pick_distinct_color(&[a, b], &[b, a], DistinctPick::default(), &mut rng);
    assert!(c == a || c == b);
}

#[test]
fn fallback_compares_alpha_exactly() {
    let opaque = Color::rgb(5, 5, 5);
    let translucent = Color::new(5, 5, 5, 128);
    let tuning = DistinctPick {
        min_diff_percent: 5.0,
        max_attempts: 2,
    };
    let mut rng = StdRng::seed_from_u64(3);
    // same RGB, so distance is 0, but the alpha differs: not an exact duplicate
    assert_eq!(pick_distinct_color(&[translucent], &[opaque], tuning, &mut rng), translucent);
}

#[test]
fn least_used_is_deterministic() {
    let palette = parse_palette("#ff0000, #00ff00, #0000ff");
    let used = parse_palette("#ff0000, #0000ff, #ff0000");
    let first = pick_color(&palette, &used);
    for _ in 0..5 {
        assert_eq!(pick_color(&palette, &used), first);
    }
    assert_eq!(first, Color::rgb(0, 255, 0));
}

#[test]
fn strategies_search_the_category_palette() {
    let blue = Color::rgb(0, 0, 200);
    let green = Color::rgb(0, 200, 0);
    let orange = Color::rgb(230, 120, 0);
    let any = Color::rgb(9, 9, 9);
    let pale = Color::rgb(200, 200, 255);
    let bright = Color::rgb(0, 255, 32);
    let dark = Color::rgb(127, 34, 0);
    let palettes = PaletteSet::default()
        .with_family(ColorFamily::Blue, vec![blue])
        .with_family(ColorFamily::Green, vec![green])
        .with_family(ColorFamily::Orange, vec![orange])
        .with_family(ColorFamily::Any, vec![any])
        .with_class(BrightnessClass::Pale, vec![pale])
        .with_class(BrightnessClass::Bright, vec![bright])
        .with_class(BrightnessClass::Dark, vec![dark]);
    let mut rng = StdRng::seed_from_u64(0);

    let hue = RandomHue::default();
    assert_eq!(hue.pick(&palettes, TransportCategory::Bus, &[], &mut rng), blue);
    assert_eq!(hue.pick(&palettes, TransportCategory::Metro, &[], &mut rng), green);
    assert_eq!(hue.pick(&palettes, TransportCategory::Train, &[], &mut rng), orange);
    assert_eq!(hue.pick(&palettes, TransportCategory::Ship, &[], &mut rng), any);

    let random = RandomColor::default();
    assert_eq!(random.pick(&palettes, TransportCategory::Bus, &[], &mut rng), any);

    let categorised = strategy_for(ColorStrategyKind::CategorisedColor, DistinctPick::default());
    assert_eq!(categorised.pick(&palettes, TransportCategory::Bus, &[], &mut rng), pale);
    assert_eq!(categorised.pick(&palettes, TransportCategory::Metro, &[], &mut rng), bright);
    assert_eq!(categorised.pick(&palettes, TransportCategory::Monorail, &[], &mut rng), dark);
}

#[test]
fn empty_palettes_yield_black() {
    let palettes = PaletteSet::default();
    let mut rng = StdRng::seed_from_u64(0);
    for kind in [
        ColorStrategyKind::RandomHue,
        ColorStrategyKind::RandomColor,
        ColorStrategyKind::CategorisedColor,
    ] {
        let s = strategy_for(kind, DistinctPick::default());
        assert_eq!(s.pick(&palettes, TransportCategory::Bus, &[], &mut rng), Color::BLACK);
    }
}
