//! line_livery
//!
//! Gives transit lines that have neither a custom color nor a custom name a
//! visually distinct color and a generated name, based on the districts they pass
//! through. Pairs with the `livery` CLI.
//!
//! ### Features
//! - Palette text parsing with compiled-in default palettes per family and brightness class
//! - Distinct color picking against the colors already in use, or least-used picking
//! - District and London-style naming, avoiding names that are already taken
//! - A processing pass over a host's lines with bounded write-back
//!
//! ### Example
//! ```no_run
//! use line_livery::{CitySnapshot, Engine, GenericNames, PaletteSet, Settings, SnapshotHost};
//!
//! let host = SnapshotHost::new(CitySnapshot::load("city.json".as_ref())?);
//! let engine = Engine::new(&Settings::default(), PaletteSet::defaults(), GenericNames::defaults());
//! let report = engine.run_pass(&host, &host, &mut rand::rng());
//! line_livery::storage::save_csv(&report.assigned, "assignments.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod naming;
pub mod palette;
pub mod snapshot;
pub mod storage;
pub mod walker;

pub use config::{ColorStrategyKind, NamingStrategyKind, Settings};
pub use engine::{CityView, Engine, LineStore, Monitor, PassReport, ScanThrottle};
pub use error::LiveryError;
pub use models::{Assignment, Color, ColorFamily, LineView, NamingContext, TransportCategory};
pub use naming::GenericNames;
pub use palette::PaletteSet;
pub use snapshot::{CitySnapshot, SnapshotHost};
pub use walker::NetworkView;
