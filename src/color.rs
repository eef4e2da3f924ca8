//! Color comparison and the color-selection strategies.
//!
//! Two selection modes exist:
//! - [`pick_color`]: deterministic, least-used palette entry (categorised strategy).
//! - [`pick_distinct_color`]: random sampling against a distinctness threshold,
//!   with an exact-duplicate-avoiding scan as fallback (hue-based strategies).

use ahash::AHashMap;
use log::debug;
use rand::{Rng, RngCore};

use crate::config::ColorStrategyKind;
use crate::models::{BrightnessClass, Color, ColorFamily, TransportCategory};
use crate::palette::PaletteSet;

/// Default distinctness threshold, in percent.
pub const DEFAULT_MIN_DIFF_PERCENT: f64 = 5.0;

/// Default number of random samples before falling back to the scan.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

// sqrt(3 * 255^2): the distance between black and white.
const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// Perceptual proxy in percent (0 = identical RGB, 100 = black vs white). Alpha is ignored.
pub fn distance(a: Color, b: Color) -> f64 {
    let dr = f64::from(a.r) - f64::from(b.r);
    let dg = f64::from(a.g) - f64::from(b.g);
    let db = f64::from(a.b) - f64::from(b.b);
    (dr * dr + dg * dg + db * db).sqrt() / MAX_DISTANCE * 100.0
}

/// Smallest distance from `color` to any used color; infinite when nothing is used.
pub fn min_distance(color: Color, used: &[Color]) -> f64 {
    let mut best = f64::INFINITY;
    for u in used {
        let d = distance(color, *u);
        if d < best {
            best = d;
            if best <= 0.0 {
                break;
            }
        }
    }
    best
}

/// Least-used palette entry, counting exact duplicates in `used`.
///
/// Ties go to the earliest palette entry. An empty palette yields [`Color::BLACK`].
pub fn pick_color(palette: &[Color], used: &[Color]) -> Color {
    let mut counts: AHashMap<Color, usize> = AHashMap::new();
    for u in used {
        *counts.entry(*u).or_default() += 1;
    }
    let mut best: Option<(Color, usize)> = None;
    for candidate in palette {
        let n = counts.get(candidate).copied().unwrap_or(0);
        if best.is_none_or(|(_, b)| n < b) {
            best = Some((*candidate, n));
        }
    }
    best.map(|(c, _)| c).unwrap_or(Color::BLACK)
}

/// Tunables of the distinct-color search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistinctPick {
    pub min_diff_percent: f64,
    pub max_attempts: u32,
}

impl Default for DistinctPick {
    fn default() -> Self {
        Self {
            min_diff_percent: DEFAULT_MIN_DIFF_PERCENT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Sample up to `max_attempts` palette entries, keeping the first one at least
/// `min_diff_percent` away from every used color.
///
/// When no sample qualifies, the first palette entry not exactly equal to any used
/// color is returned; failing that, the last sample. An empty palette yields
/// [`Color::BLACK`]. At least one sample is always drawn.
pub fn pick_distinct_color(
    palette: &[Color],
    used: &[Color],
    tuning: DistinctPick,
    rng: &mut dyn RngCore,
) -> Color {
    if palette.is_empty() {
        debug!("empty palette, using sentinel color");
        return Color::BLACK;
    }

    let attempts = tuning.max_attempts.max(1);
    let mut candidate = Color::BLACK;
    let mut difference = 0.0;
    for attempt in 1..=attempts {
        candidate = palette[rng.random_range(0..palette.len())];
        difference = min_distance(candidate, used);
        if difference >= tuning.min_diff_percent {
            debug!("picked {} after {} attempt(s), difference {:.2}", candidate, attempt, difference);
            return candidate;
        }
    }

    match palette.iter().find(|c| !used.contains(c)) {
        Some(c) => {
            debug!(
                "no sample reached {:.2}% in {} attempts, using unused {}",
                tuning.min_diff_percent, attempts, c
            );
            *c
        }
        None => {
            debug!("every palette entry is in use, keeping {} (difference {:.2})", candidate, difference);
            candidate
        }
    }
}

/// Picks the color for a line that needs one.
pub trait ColorStrategy: Send + Sync {
    fn kind(&self) -> ColorStrategyKind;

    fn pick(
        &self,
        palettes: &PaletteSet,
        category: TransportCategory,
        used: &[Color],
        rng: &mut dyn RngCore,
    ) -> Color;
}

/// Family chosen by transport category, distinct pick.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomHue {
    pub tuning: DistinctPick,
}

impl ColorStrategy for RandomHue {
    fn kind(&self) -> ColorStrategyKind {
        ColorStrategyKind::RandomHue
    }

    fn pick(
        &self,
        palettes: &PaletteSet,
        category: TransportCategory,
        used: &[Color],
        rng: &mut dyn RngCore,
    ) -> Color {
        let family = ColorFamily::from(category);
        pick_distinct_color(palettes.family(family), used, self.tuning, rng)
    }
}

/// Whole-spectrum palette regardless of category, distinct pick.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomColor {
    pub tuning: DistinctPick,
}

impl ColorStrategy for RandomColor {
    fn kind(&self) -> ColorStrategyKind {
        ColorStrategyKind::RandomColor
    }

    fn pick(
        &self,
        palettes: &PaletteSet,
        _category: TransportCategory,
        used: &[Color],
        rng: &mut dyn RngCore,
    ) -> Color {
        pick_distinct_color(palettes.family(ColorFamily::Any), used, self.tuning, rng)
    }
}

/// Brightness class chosen by transport category, least-used pick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Categorised;

impl ColorStrategy for Categorised {
    fn kind(&self) -> ColorStrategyKind {
        ColorStrategyKind::CategorisedColor
    }

    fn pick(
        &self,
        palettes: &PaletteSet,
        category: TransportCategory,
        used: &[Color],
        _rng: &mut dyn RngCore,
    ) -> Color {
        pick_color(palettes.class(BrightnessClass::from(category)), used)
    }
}

/// Build the strategy for a configured kind.
pub fn strategy_for(kind: ColorStrategyKind, tuning: DistinctPick) -> Box<dyn ColorStrategy> {
    match kind {
        ColorStrategyKind::RandomHue => Box::new(RandomHue { tuning }),
        ColorStrategyKind::RandomColor => Box::new(RandomColor { tuning }),
        ColorStrategyKind::CategorisedColor => Box::new(Categorised),
    }
}
