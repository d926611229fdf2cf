//! combat-replay: run a scripted headless battle and print a JSON summary.
//!
//! Usage:
//!   combat-replay --config skirmish.toml --frames 3600
//!   combat-replay --seed 7 --dt 0.02

use std::path::PathBuf;
use std::process;

use serde::Serialize;
use tracing::{error, info};

use marsdefense_core::commands::{FrameInput, ThrustInput};
use marsdefense_core::config::SimConfig;
use marsdefense_core::enums::{GamePhase, WeaponSlot};
use marsdefense_core::events::CombatEvent;
use marsdefense_sim::SimulationEngine;

const DEFAULT_FRAMES: u64 = 3600;
const DEFAULT_DT: f64 = 1.0 / 60.0;

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    frames: Option<u64>,
    seed: Option<u64>,
    dt: Option<f64>,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    frames: u64,
    elapsed_secs: f64,
    phase: GamePhase,
    wave: u32,
    level: u32,
    kills: u32,
    scrap: u32,
    hits: u64,
    hull_joules: f64,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            print_usage();
            process::exit(1);
        }
    };

    init_tracing();

    let mut config = match &options.config {
        Some(path) => match SimConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load config");
                process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    if let Some(seed) = options.seed {
        config.seed = seed;
    }

    let frames = options.frames.unwrap_or(DEFAULT_FRAMES);
    let dt = options.dt.unwrap_or(DEFAULT_DT);
    let summary = run(config, frames, dt);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "failed to encode summary");
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "combat-replay: MARS DEFENSE headless battle runner\n\
         \n\
         Options:\n\
         \n\
           --config <path>  TOML simulation config (optional, default: built-in)\n\
           --frames <N>     Frames to simulate (default: 3600)\n\
           --seed <N>       Override the config seed\n\
           --dt <secs>      Fixed frame step (default: 1/60)\n\
         \n\
         Environment:\n\
         \n\
           RUST_LOG         Log filter (default: info)\n\
           LOG_FORMAT=json  Structured log output\n\
         \n\
         Examples:\n\
         \n\
           combat-replay --config tools/combat-replay/skirmish.toml --frames 7200\n\
           combat-replay --seed 7 --dt 0.02\n"
    );
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {flag}"))?;
        match flag.as_str() {
            "--config" => options.config = Some(PathBuf::from(value)),
            "--frames" => options.frames = Some(parse_value(flag, value)?),
            "--seed" => options.seed = Some(parse_value(flag, value)?),
            "--dt" => {
                let dt: f64 = parse_value(flag, value)?;
                if !(dt.is_finite() && dt > 0.0) {
                    return Err(format!("--dt must be positive, got {dt}"));
                }
                options.dt = Some(dt);
            }
            other => return Err(format!("Unknown option: {other}")),
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("Invalid value for {flag}: {value}"))
}

/// Scripted pilot: sweeps across the arena, holds the cannon down and
/// cycles the ordnance slots on a fixed cadence.
fn scripted_input(frame: u64) -> FrameInput {
    let mut fire = vec![WeaponSlot::Cannon];
    match frame % 120 {
        0 => fire.push(WeaponSlot::BreachBomb),
        40 => fire.push(WeaponSlot::PulseLance),
        80 => fire.push(WeaponSlot::ClusterStrike),
        _ => {}
    }
    if frame % 900 == 0 {
        fire.push(WeaponSlot::Overcharge);
    }

    let sweep = (frame / 150) % 2 == 0;
    FrameInput {
        thrust: ThrustInput {
            left: sweep,
            right: !sweep,
            ..Default::default()
        },
        fire,
    }
}

fn run(config: SimConfig, frames: u64, dt: f64) -> Summary {
    let seed = config.seed;
    let mut engine = SimulationEngine::new(config);
    let mut hits = 0;
    let mut simulated = 0;

    for frame in 0..frames {
        let snapshot = engine.tick(&scripted_input(frame), dt);
        simulated += 1;
        hits += snapshot
            .combat_events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Hit { on_player: false, .. }))
            .count() as u64;
        if snapshot.phase == GamePhase::GameOver {
            break;
        }
    }

    let snapshot = engine.snapshot();
    let progression = engine.progression();
    info!(
        frames = simulated,
        wave = snapshot.wave.wave,
        kills = progression.kills,
        "replay finished"
    );

    Summary {
        seed,
        frames: simulated,
        elapsed_secs: snapshot.time.elapsed_secs,
        phase: snapshot.phase,
        wave: snapshot.wave.wave,
        level: progression.level,
        kills: progression.kills,
        scrap: progression.scrap,
        hits,
        hull_joules: snapshot.player.map_or(0.0, |p| p.hp),
    }
}
