use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use line_livery::config::{self, ColorStrategyKind, NamingStrategyKind, Settings};
use line_livery::models::{BrightnessClass, ColorFamily};
use line_livery::palette::{self, PaletteSet};
use line_livery::{CitySnapshot, Engine, GenericNames, SnapshotHost, storage};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "livery",
    version,
    about = "Pick distinct colors and generated names for uncustomized transit lines"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one pass over a city snapshot (and optionally save the results).
    Run(RunArgs),
    /// List the entries of one palette.
    Palette(PaletteArgs),
    /// Print the effective settings as JSON.
    Settings(SettingsArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PaletteName {
    Any,
    Blue,
    Green,
    Orange,
    Bright,
    Pale,
    Dark,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// City snapshot (JSON).
    #[arg(short, long)]
    snapshot: PathBuf,
    #[command(flatten)]
    settings: SettingsArgs,
    /// Directory with palette and word-list files; missing files are seeded with defaults.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the configured color strategy.
    #[arg(long, value_enum)]
    color_strategy: Option<ColorStrategyKind>,
    /// Override the configured naming strategy.
    #[arg(long, value_enum)]
    naming_strategy: Option<NamingStrategyKind>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Space colors out against the ones assigned earlier in the same pass.
    #[arg(long, default_value_t = false)]
    convergent: bool,
    /// Save assignments to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Write the updated snapshot to this path.
    #[arg(long)]
    write_back: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PaletteArgs {
    /// Palette to list.
    #[arg(value_enum)]
    name: PaletteName,
    /// Directory with palette files (compiled-in defaults when omitted).
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Palette(args) => cmd_palette(args),
        Command::Settings(args) => cmd_settings(args),
    }
}

fn load_settings(args: &SettingsArgs) -> Settings {
    match args.settings.clone().or_else(config::default_path) {
        Some(path) => Settings::load(&path),
        None => Settings::default(),
    }
}

fn data_dir(explicit: Option<PathBuf>) -> Result<Option<PathBuf>> {
    let Some(dir) = explicit.or_else(config::default_dir) else {
        return Ok(None);
    };
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(Some(dir))
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let mut settings = load_settings(&args.settings);
    if let Some(kind) = args.color_strategy {
        settings.stage_color_strategy(kind);
    }
    if let Some(kind) = args.naming_strategy {
        settings.stage_naming_strategy(kind);
    }
    settings.commit()?;

    let (palettes, generic) = match data_dir(args.data_dir)? {
        Some(dir) => (PaletteSet::load(&dir, true), GenericNames::load(&dir, true)),
        None => (PaletteSet::defaults(), GenericNames::defaults()),
    };
    let engine = Engine::new(&settings, palettes, generic).with_convergent_spacing(args.convergent);

    let snapshot = CitySnapshot::load(&args.snapshot)
        .with_context(|| format!("read snapshot {}", args.snapshot.display()))?;
    let host = SnapshotHost::new(snapshot);

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };
    let report = engine.run_pass(&host, &host, rng.as_mut());

    for a in &report.assigned {
        println!("{}\t{}\t{}", a.line, a.color, a.name.as_deref().unwrap_or("-"));
    }
    if report.abandoned {
        eprintln!("Line store was busy; pass abandoned");
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&report.assigned, path)?,
            "json" => storage::save_json(&report.assigned, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} assignments to {}", report.assigned.len(), path.display());
    }

    if let Some(path) = args.write_back.as_ref() {
        host.to_snapshot().save(path)?;
        eprintln!("Wrote updated snapshot to {}", path.display());
    }

    Ok(())
}

fn palette_source(name: PaletteName) -> (&'static str, &'static str) {
    match name {
        PaletteName::Any => palette::family_source(ColorFamily::Any),
        PaletteName::Blue => palette::family_source(ColorFamily::Blue),
        PaletteName::Green => palette::family_source(ColorFamily::Green),
        PaletteName::Orange => palette::family_source(ColorFamily::Orange),
        PaletteName::Bright => palette::class_source(BrightnessClass::Bright),
        PaletteName::Pale => palette::class_source(BrightnessClass::Pale),
        PaletteName::Dark => palette::class_source(BrightnessClass::Dark),
    }
}

fn cmd_palette(args: PaletteArgs) -> Result<()> {
    let (file, default) = palette_source(args.name);
    let text = match args.data_dir.as_deref() {
        Some(dir) => palette::read_source(&dir.join(file), default, false),
        None => default.to_string(),
    };
    let entries = palette::parse_entries(&text);
    for e in &entries {
        match &e.name {
            Some(n) => println!("{}\t{}", e.color, n),
            None => println!("{}", e.color),
        }
    }
    eprintln!("{} colors", entries.len());
    Ok(())
}

fn cmd_settings(args: SettingsArgs) -> Result<()> {
    let settings = load_settings(&args);
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
