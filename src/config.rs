//! Persisted settings.
//!
//! Settings live in `settings.json` under the platform config directory
//! (`<config>/line-livery/`), next to the palette and word-list text files.
//! Setters only stage values; [`Settings::commit`] applies them and raises the
//! change flag a [`crate::engine::Monitor`] consumes to rebuild its strategies.
//! [`Settings::commit_to`] also writes the result back to disk.

use clap::ValueEnum;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::color::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_DIFF_PERCENT, DistinctPick};
use crate::error::{LiveryError, Result};

pub const APP_DIR: &str = "line-livery";
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ColorStrategyKind {
    RandomHue,
    #[default]
    RandomColor,
    CategorisedColor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum NamingStrategyKind {
    None,
    #[default]
    Districts,
    London,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Staged {
    color_strategy: Option<ColorStrategyKind>,
    naming_strategy: Option<NamingStrategyKind>,
    min_color_diff_percentage: Option<f64>,
    max_diff_color_pick_attempt: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub color_strategy: ColorStrategyKind,
    #[serde(default)]
    pub naming_strategy: NamingStrategyKind,
    /// Missing in older files; filled with the default on load.
    #[serde(default)]
    pub min_color_diff_percentage: Option<f64>,
    #[serde(default)]
    pub max_diff_color_pick_attempt: Option<u32>,
    #[serde(skip)]
    staged: Staged,
    #[serde(skip)]
    changed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_strategy: ColorStrategyKind::default(),
            naming_strategy: NamingStrategyKind::default(),
            min_color_diff_percentage: Some(DEFAULT_MIN_DIFF_PERCENT),
            max_diff_color_pick_attempt: Some(DEFAULT_MAX_ATTEMPTS),
            staged: Staged::default(),
            changed: false,
        }
    }
}

/// `<config dir>/line-livery`, when the platform has a config directory.
pub fn default_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

/// `<config dir>/line-livery/settings.json`.
pub fn default_path() -> Option<PathBuf> {
    default_dir().map(|d| d.join(SETTINGS_FILE))
}

impl Settings {
    /// Load settings, never failing.
    ///
    /// - missing file: defaults, written back
    /// - unreadable or malformed file: defaults, left untouched on disk
    /// - missing or out-of-range tunables: defaults for those, written back
    pub fn load(path: &Path) -> Self {
        let (mut settings, mut dirty) = match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Settings>(&text) {
                Ok(s) => {
                    info!("using settings from {}", path.display());
                    (s, false)
                }
                Err(e) => {
                    error!("error reading settings from {}: {}", path.display(), e);
                    return Self::default();
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("no settings file, writing defaults to {}", path.display());
                (Self::default(), true)
            }
            Err(e) => {
                error!("error reading settings from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        if settings.min_color_diff_percentage.is_none() {
            settings.min_color_diff_percentage = Some(DEFAULT_MIN_DIFF_PERCENT);
            dirty = true;
        }
        if settings.max_diff_color_pick_attempt.is_none() {
            settings.max_diff_color_pick_attempt = Some(DEFAULT_MAX_ATTEMPTS);
            dirty = true;
        }
        if let Some(p) = settings.min_color_diff_percentage
            && let Err(e) = check_min_diff(p)
        {
            warn!("{}, using the default", e);
            settings.min_color_diff_percentage = Some(DEFAULT_MIN_DIFF_PERCENT);
            dirty = true;
        }
        if let Some(n) = settings.max_diff_color_pick_attempt
            && let Err(e) = check_attempts(n)
        {
            warn!("{}, using the default", e);
            settings.max_diff_color_pick_attempt = Some(DEFAULT_MAX_ATTEMPTS);
            dirty = true;
        }

        if dirty && let Err(e) = settings.save(path) {
            error!("could not save settings: {}", e);
        }
        settings
    }

    /// Write as pretty JSON, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LiveryError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| LiveryError::io(path, e))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(p) = self.min_color_diff_percentage {
            check_min_diff(p)?;
        }
        if let Some(n) = self.max_diff_color_pick_attempt {
            check_attempts(n)?;
        }
        Ok(())
    }

    /// Distinct-pick tunables with defaults for anything unset.
    pub fn tuning(&self) -> DistinctPick {
        DistinctPick {
            min_diff_percent: self.min_color_diff_percentage.unwrap_or(DEFAULT_MIN_DIFF_PERCENT),
            max_attempts: self.max_diff_color_pick_attempt.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        }
    }

    pub fn stage_color_strategy(&mut self, kind: ColorStrategyKind) {
        self.staged.color_strategy = Some(kind);
    }

    pub fn stage_naming_strategy(&mut self, kind: NamingStrategyKind) {
        self.staged.naming_strategy = Some(kind);
    }

    pub fn stage_min_color_diff(&mut self, percent: f64) {
        self.staged.min_color_diff_percentage = Some(percent);
    }

    pub fn stage_max_attempts(&mut self, attempts: u32) {
        self.staged.max_diff_color_pick_attempt = Some(attempts);
    }

    pub fn discard_staged(&mut self) {
        self.staged = Staged::default();
    }

    /// Apply staged values and mark the settings as changed.
    ///
    /// Staged tunables that fail validation are rejected and nothing is applied.
    pub fn commit(&mut self) -> Result<()> {
        let staged = std::mem::take(&mut self.staged);
        let mut next = self.clone();
        if let Some(kind) = staged.color_strategy {
            info!("color strategy changed to {:?}", kind);
            next.color_strategy = kind;
        }
        if let Some(kind) = staged.naming_strategy {
            info!("naming strategy changed to {:?}", kind);
            next.naming_strategy = kind;
        }
        if let Some(p) = staged.min_color_diff_percentage {
            info!("minimum color difference changed to {}", p);
            next.min_color_diff_percentage = Some(p);
        }
        if let Some(n) = staged.max_diff_color_pick_attempt {
            info!("maximum color pick attempts changed to {}", n);
            next.max_diff_color_pick_attempt = Some(n);
        }
        next.validate()?;
        next.changed = true;
        *self = next;
        Ok(())
    }

    /// [`commit`](Self::commit), then write the result to `path`.
    ///
    /// The in-memory change stands even when the write fails.
    pub fn commit_to(&mut self, path: &Path) -> Result<()> {
        self.commit()?;
        self.save(path)?;
        info!("saved settings to {}", path.display());
        Ok(())
    }

    /// Whether settings changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}

fn check_min_diff(percent: f64) -> Result<()> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(LiveryError::InvalidSetting {
            name: "min_color_diff_percentage",
            reason: format!("{percent} is outside 0..=100"),
        })
    }
}

fn check_attempts(attempts: u32) -> Result<()> {
    if attempts == 0 {
        Err(LiveryError::InvalidSetting {
            name: "max_diff_color_pick_attempt",
            reason: "must be at least 1".to_string(),
        })
    } else {
        Ok(())
    }
}
