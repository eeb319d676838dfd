//! Tremor Engine - VR hand tremor capture and scoring
//!
//! Decodes session logs, scores tremor severity and runs synthetic sessions.

use nalgebra::Vector3;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tremor_engine::analysis::{SessionAnalyzer, SessionReport};
use tremor_engine::app::cli::{Cli, Commands, ConfigAction};
use tremor_engine::app::config::Config;
use tremor_engine::capture::SyntheticHand;
use tremor_engine::codec::{decode, DecodedLog, LogEncoder};
use tremor_engine::session::{SessionAggregator, SessionContext, SessionController};
use tremor_engine::storage::{self, DirectoryStore, LogStore};
use tremor_engine::FixedTimestep;

/// Seconds between simulated apple hits
const SIMULATED_HIT_INTERVAL_SECS: f64 = 1.5;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output)
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Analyze { files, json } => {
            run_analyze(&files, json, &config)?;
        }
        Commands::Spectrum { file, step } => {
            run_spectrum(&file, step, &config)?;
        }
        Commands::Simulate {
            duration,
            tremor_hz,
            amplitude,
            patient,
            game,
            output,
        } => {
            let settings = SimulateSettings {
                duration,
                tremor_hz,
                amplitude,
                patient,
                game,
                output,
            };
            run_simulate(settings, &config)?;
        }
        Commands::List { root } => {
            run_list(root, &config)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

/// Read and decode a log file, naming the channel after the file
fn load_log(path: &Path) -> anyhow::Result<DecodedLog> {
    if !path.exists() {
        anyhow::bail!("Log file not found: {:?}", path);
    }
    let text = std::fs::read_to_string(path)?;
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let channel = storage::channel_from_file_name(&file_name).unwrap_or_else(|| {
        path.file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .into_owned()
    });

    let decoded = decode(&text).with_channel(channel);
    if !decoded.missing.is_empty() {
        warn!(
            "{}: missing fields {}",
            path.display(),
            decoded
                .missing
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(decoded)
}

fn run_analyze(files: &[PathBuf], json: bool, config: &Config) -> anyhow::Result<()> {
    let analyzer = config.analyzer();
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    info!(files = files.len(), workers, "Analyzing logs");

    let results = analyze_files(files, &analyzer, workers);

    let mut reports = Vec::with_capacity(results.len());
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(report) => reports.push((path, report)),
            Err(e) => anyhow::bail!("{}: {}", path.display(), e),
        }
    }

    if json {
        let list: Vec<&SessionReport> = reports.iter().map(|(_, r)| r).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    for (path, report) in &reports {
        print_report(path, report);
    }
    Ok(())
}

/// Decode and analyze every file, at most `workers` threads at a time.
/// Results keep the order of `files`.
fn analyze_files(
    files: &[PathBuf],
    analyzer: &SessionAnalyzer,
    workers: usize,
) -> Vec<anyhow::Result<SessionReport>> {
    let mut results = Vec::with_capacity(files.len());
    for batch in files.chunks(workers.max(1)) {
        std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|path| {
                    scope.spawn(move || load_log(path).map(|decoded| analyzer.analyze(&decoded)))
                })
                .collect();
            results.extend(handles.into_iter().map(|h| {
                h.join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("analysis thread panicked")))
            }));
        });
    }
    results
}

fn print_report(path: &Path, report: &SessionReport) {
    let s = &report.severity;
    println!("\n{} ({})", path.display(), report.channel);
    println!("  Points:           {}", report.points);
    println!("  Avg velocity:     {:.2} m/s", report.avg_velocity);
    println!("  Avg shake:        {:.2} deg/s", report.avg_shake);
    println!("  Capture freq:     {} Hz", report.capture_frequency_hz);
    println!(
        "  Apples:           {}/{} ({:.0}%)",
        report.apples_picked,
        report.total_apples,
        report.success_rate * 100.0
    );
    println!("  Tremor intensity: {:.4} m/s (p95)", report.tremor_intensity);
    println!(
        "  Dominant freq:    {:.1} Hz (power {:.1})",
        report.dominant.dominant_hz, report.dominant.power
    );
    println!("  Flagged shakes:   {}", report.flagged_shakes);
    println!(
        "  Severity:         {} / 4  (buckets {}/{}/{}, base {:.2}, {})",
        s.score,
        s.intensity_bucket,
        s.power_bucket,
        s.success_bucket,
        s.base,
        if s.in_band { "in band" } else { "out of band" }
    );
}

fn run_spectrum(file: &Path, step: Option<f64>, config: &Config) -> anyhow::Result<()> {
    let step = step.unwrap_or(config.frequency.display_step_hz);
    if step <= 0.0 || !step.is_finite() {
        anyhow::bail!("Step must be a positive number, got {}", step);
    }

    let decoded = load_log(file)?;
    if decoded.log.velocity_log.is_empty() {
        anyhow::bail!("{} carries no velocity data", file.display());
    }

    let sweep = config.frequency.power_sweep();
    println!("hz,power");
    for (hz, power) in sweep.spectrum(&decoded.log.velocity_log, step) {
        println!("{},{:.4}", hz, power);
    }
    Ok(())
}

struct SimulateSettings {
    duration: Option<f64>,
    tremor_hz: f64,
    amplitude: f64,
    patient: String,
    game: String,
    output: Option<PathBuf>,
}

fn run_simulate(settings: SimulateSettings, config: &Config) -> anyhow::Result<()> {
    let mut session = config.session.clone();
    if let Some(duration) = settings.duration {
        if duration <= 0.0 || !duration.is_finite() {
            anyhow::bail!("Duration must be positive, got {}", duration);
        }
        session.duration_secs = duration;
    }

    let clock = FixedTimestep::new(config.capture.tick_duration_secs);
    let context = SessionContext::new(settings.patient, settings.game);
    let mut controller = SessionController::new(session, context, clock)
        .with_aggregator(SessionAggregator::with_estimator(config.frequency.zero_crossing()))
        .with_large_shake_threshold(config.capture.large_shake_threshold_dps);

    // Spread the hands across the body and out of phase
    let channel_count = controller.channels().len();
    let hands: Vec<SyntheticHand> = (0..channel_count)
        .map(|i| {
            let offset = i as f64 - (channel_count as f64 - 1.0) / 2.0;
            SyntheticHand::new(Vector3::new(0.4 * offset, 1.1, 0.35))
                .with_tremor(settings.tremor_hz, settings.amplitude)
                .with_phase(i as f64 * 0.7)
        })
        .collect();

    info!(
        "Simulating {:.0}s session at {} Hz tremor",
        controller.settings().duration_secs,
        settings.tremor_hz
    );
    controller.start()?;

    let hit_every = clock.ticks_for(SIMULATED_HIT_INTERVAL_SECS).max(1);
    let mut tick: u64 = 0;
    let logs = loop {
        let t = controller.elapsed_secs();
        let poses: Vec<_> = hands.iter().map(|hand| hand.pose_at(t)).collect();
        if let Some(logs) = controller.tick(&poses)? {
            break logs;
        }

        tick += 1;
        if tick % hit_every == 0 {
            // Every third swing is too soft to pick the apple
            let impact_speed = if (tick / hit_every) % 3 == 0 { 1.2 } else { 2.6 };
            controller.register_hit(impact_speed);
        }
    };

    let root = settings
        .output
        .unwrap_or_else(|| config.storage.root.clone());
    let store = DirectoryStore::new(&root);
    let mut encoder = LogEncoder::new();
    if config.storage.timestamp_lines {
        encoder = encoder.with_timestamp(chrono::Local::now().time());
    }
    let keys = storage::store_session(&store, controller.context(), &logs, &mut encoder)?;

    println!("\nSession {} complete", controller.context().id);
    let analyzer = config.analyzer();
    for (key, log) in keys.iter().zip(&logs) {
        let report = analyzer.analyze(&DecodedLog {
            log: log.clone(),
            missing: Vec::new(),
        });
        println!(
            "  {:<6} {} points, freq {} Hz, severity {}  -> {}",
            log.logger_name,
            log.points,
            log.frequency_hz,
            report.severity.score,
            store.path_for(key).display()
        );
    }

    Ok(())
}

fn run_list(root: Option<PathBuf>, config: &Config) -> anyhow::Result<()> {
    let root = root.unwrap_or_else(|| config.storage.root.clone());
    let store = DirectoryStore::new(&root);
    let keys = store.list()?;

    if keys.is_empty() {
        println!("No sessions found in {}", root.display());
        println!("Run a synthetic session with: tremor simulate");
        return Ok(());
    }

    println!("Sessions in {}:", root.display());
    let mut current: Option<(&str, &str, &str)> = None;
    for key in &keys {
        let session = (
            key.patient_id.as_str(),
            key.game_name.as_str(),
            key.session_stamp.as_str(),
        );
        if current != Some(session) {
            println!("  {}/{}/{}", session.0, session.1, session.2);
            current = Some(session);
        }
        println!("    {}", key.channel);
    }

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    std::fs::create_dir_all(&config.storage.root)?;
    println!("\nSession logs: {:?}", config.storage.root);

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = config.to_toml()?;
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", toml_str);
        }
        ConfigAction::Get { key } => {
            let toml_str = config.to_toml()?;
            match find_toml_value(&toml_str, &key) {
                Some(v) => println!("{} = {}", key, v),
                None => {
                    anyhow::bail!("Configuration key '{}' not found", key);
                }
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
        }
        ConfigAction::Reset { force } => {
            let config_path = Config::default_path();

            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save_default()?;
            println!("Configuration reset to defaults at {:?}", config_path);
        }
    }

    Ok(())
}

/// Value of a dotted `section.key` in rendered TOML
fn find_toml_value<'a>(toml_str: &'a str, key: &str) -> Option<&'a str> {
    let (section_name, leaf_key) = match key.rsplit_once('.') {
        Some((section, leaf)) => (section, leaf),
        None => ("", key),
    };

    let mut in_section = section_name.is_empty();
    for line in toml_str.lines() {
        let trimmed = line.trim();

        if let Some(section) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_section = section == section_name;
            continue;
        }

        if in_section {
            if let Some((line_key, value)) = trimmed.split_once('=') {
                if line_key.trim() == leaf_key {
                    return Some(value.trim());
                }
            }
        }
    }

    None
}
