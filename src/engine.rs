//! One processing pass over the host's lines, and the throttled monitor around it.
//!
//! A pass captures the used colors, existing names and city name once, plans an
//! [`Assignment`] for every line that needs one, then applies them one line at a
//! time through the host's [`LineStore`]. Planning never sees its own writes
//! unless convergent spacing is switched on.

use log::{debug, info, warn};
use rand::RngCore;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::color::{self, ColorStrategy};
use crate::config::Settings;
use crate::error::{LiveryError, Result};
use crate::models::{Assignment, Color, LineId, LineView};
use crate::naming::{self, GenericNames, NameRequest, NamingStrategy};
use crate::palette::PaletteSet;
use crate::walker::NetworkView;

/// Longest wait for the line store's lock before a pass is abandoned.
pub const APPLY_TIMEOUT: Duration = Duration::from_millis(250);

/// Minimum time between two passes of a [`Monitor`].
pub const SCAN_INTERVAL: Duration = Duration::from_secs(10);

/// Read access to the host's city state.
pub trait CityView: NetworkView {
    fn lines(&self) -> Vec<LineView>;

    /// Colors of the active lines.
    fn used_colors(&self) -> Vec<Color>;

    /// Names of the lines that carry a custom name.
    fn existing_names(&self) -> Vec<String>;

    fn city_name(&self) -> String;
}

/// Write side of the host's line store.
pub trait LineStore {
    /// Write one assignment, waiting at most `timeout` for the store's lock.
    ///
    /// Must return [`LiveryError::LockTimeout`] when the lock could not be taken.
    fn apply(&self, assignment: &Assignment, timeout: Duration) -> Result<()>;
}

/// What a pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassReport {
    pub assigned: Vec<Assignment>,
    /// Lines whose write-back was rejected by the store.
    pub failed: Vec<LineId>,
    /// Lines that did not need a livery.
    pub skipped: usize,
    /// The store stayed locked; remaining lines wait for the next pass.
    pub abandoned: bool,
}

/// Palettes, word list and the configured strategies, built once.
pub struct Engine {
    palettes: PaletteSet,
    generic: GenericNames,
    color: Box<dyn ColorStrategy>,
    naming: Box<dyn NamingStrategy>,
    convergent: bool,
    apply_timeout: Duration,
}

impl Engine {
    pub fn new(settings: &Settings, palettes: PaletteSet, generic: GenericNames) -> Self {
        let color = color::strategy_for(settings.color_strategy, settings.tuning());
        let naming = naming::strategy_for(settings.naming_strategy, generic.clone());
        Self {
            palettes,
            generic,
            color,
            naming,
            convergent: false,
            apply_timeout: APPLY_TIMEOUT,
        }
    }

    /// Feed colors assigned earlier in a pass into the used colors of later lines.
    pub fn with_convergent_spacing(mut self, on: bool) -> Self {
        self.convergent = on;
        self
    }

    pub fn with_apply_timeout(mut self, timeout: Duration) -> Self {
        self.apply_timeout = timeout;
        self
    }

    /// Rebuild both strategies from `settings`.
    pub fn reconfigure(&mut self, settings: &Settings) {
        info!(
            "using {:?} colors and {:?} names",
            settings.color_strategy, settings.naming_strategy
        );
        self.color = color::strategy_for(settings.color_strategy, settings.tuning());
        self.naming = naming::strategy_for(settings.naming_strategy, self.generic.clone());
    }

    pub fn palettes(&self) -> &PaletteSet {
        &self.palettes
    }

    pub fn color_strategy(&self) -> &dyn ColorStrategy {
        self.color.as_ref()
    }

    pub fn naming_strategy(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    /// Color and name for one line.
    pub fn plan_line(
        &self,
        request: &NameRequest<'_>,
        used_colors: &[Color],
        network: &dyn NetworkView,
        rng: &mut dyn RngCore,
    ) -> Assignment {
        let line = request.line;
        let name = self.naming.name(request, network, rng);
        let color = self.color.pick(&self.palettes, line.category, used_colors, rng);
        debug!("line {} (#{}): {} {:?}", line.id, line.number, color, name);
        Assignment {
            line: line.id,
            number: line.number,
            color,
            name,
        }
    }

    /// Assignments for every line that needs one, without writing anything.
    pub fn plan(&self, city: &dyn CityView, rng: &mut dyn RngCore) -> (Vec<Assignment>, usize) {
        let mut used = city.used_colors();
        let existing = city.existing_names();
        let city_name = city.city_name();

        let mut planned = Vec::new();
        let mut skipped = 0;
        for line in city.lines() {
            if !line.needs_livery() {
                skipped += 1;
                continue;
            }
            let request = NameRequest {
                line: &line,
                existing_names: &existing,
                city_name: &city_name,
            };
            let assignment = self.plan_line(&request, &used, city, rng);
            if self.convergent {
                used.push(assignment.color);
            }
            planned.push(assignment);
        }
        (planned, skipped)
    }

    /// Plan, then write back line by line.
    ///
    /// A lock timeout abandons the rest of the pass; any other write failure only
    /// affects its own line.
    pub fn run_pass(
        &self,
        city: &dyn CityView,
        store: &dyn LineStore,
        rng: &mut dyn RngCore,
    ) -> PassReport {
        let (planned, skipped) = self.plan(city, rng);
        let mut report = PassReport {
            skipped,
            ..PassReport::default()
        };
        for assignment in planned {
            match store.apply(&assignment, self.apply_timeout) {
                Ok(()) => report.assigned.push(assignment),
                Err(LiveryError::LockTimeout(waited)) => {
                    warn!("line store locked for {:?}, retrying next pass", waited);
                    report.abandoned = true;
                    break;
                }
                Err(e) => {
                    warn!("could not update line {}: {}", assignment.line, e);
                    report.failed.push(assignment.line);
                }
            }
        }
        info!(
            "pass done: {} assigned, {} failed, {} skipped{}",
            report.assigned.len(),
            report.failed.len(),
            report.skipped,
            if report.abandoned { ", abandoned" } else { "" }
        );
        report
    }
}

/// Lets a pass through at most once per interval.
#[derive(Clone, Debug)]
pub struct ScanThrottle {
    interval: Duration,
    last: Option<Instant>,
}

impl ScanThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// `true` (and restart the interval) when a pass may run at `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

impl Default for ScanThrottle {
    fn default() -> Self {
        Self::new(SCAN_INTERVAL)
    }
}

/// Periodic driver: throttles passes and picks up settings changes.
pub struct Monitor {
    engine: Engine,
    settings: Settings,
    settings_path: Option<PathBuf>,
    throttle: ScanThrottle,
}

impl Monitor {
    pub fn new(engine: Engine, settings: Settings) -> Self {
        Self {
            engine,
            settings,
            settings_path: None,
            throttle: ScanThrottle::default(),
        }
    }

    /// File that [`Monitor::commit_settings`] writes committed settings to.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    pub fn with_throttle(mut self, throttle: ScanThrottle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Stage changes here, then [`Monitor::commit_settings`]; the next tick picks them up.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Commit the staged settings, saving them when a settings path is set.
    pub fn commit_settings(&mut self) -> Result<()> {
        match &self.settings_path {
            Some(path) => self.settings.commit_to(path),
            None => self.settings.commit(),
        }
    }

    /// Run a pass if the throttle allows it at `now`.
    pub fn tick(
        &mut self,
        now: Instant,
        city: &dyn CityView,
        store: &dyn LineStore,
        rng: &mut dyn RngCore,
    ) -> Option<PassReport> {
        if self.settings.take_changed() {
            self.engine.reconfigure(&self.settings);
        }
        if !self.throttle.ready(now) {
            return None;
        }
        Some(self.engine.run_pass(city, store, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_waits_for_the_interval() {
        let start = Instant::now();
        let mut t = ScanThrottle::new(Duration::from_secs(10));
        assert!(t.ready(start));
        assert!(!t.ready(start + Duration::from_secs(3)));
        assert!(t.ready(start + Duration::from_secs(10)));
        assert!(!t.ready(start + Duration::from_secs(19)));
        assert!(t.ready(start + Duration::from_secs(25)));
    }
}
