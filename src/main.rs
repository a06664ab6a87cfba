use std::process;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};

use gridshow::cli::{Cli, Command, ManifestArgs, PlayArgs, RenameArgs};
use gridshow::clock::WallClockScheduler;
use gridshow::constants::{FPS, GROUPS};
use gridshow::surface::{LogSurface, Surface};
use gridshow::{Manifest, PlaybackState, Session, manifest_builder, renamer};

fn init_logging(verbosity: u8, headless: bool) {
    // Headless output is the log itself, so it starts at info
    let default_level = match (verbosity, headless) {
        (0, false) => "warn",
        (0, true) | (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

fn main() {
    let cli = Cli::parse();
    let headless = matches!(&cli.command, Command::Play(args) if args.headless);
    init_logging(cli.verbosity, headless);
    debug!("Command-line args: {:?}", cli);

    let result = match cli.command {
        Command::Play(args) => play(args),
        Command::Manifest(args) => build_manifest(args),
        Command::Rename(args) => rename(args),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn play(args: PlayArgs) -> Result<()> {
    let manifest = Manifest::load(&args.manifest, args.quality).context("Playback not started")?;
    if manifest.is_empty() {
        warn!("Manifest {} has no groups", args.manifest.display());
    }

    if args.headless || cfg!(not(feature = "window")) {
        if !args.headless {
            warn!("Built without the window feature, running headless");
        }
        let mut session = Session::new(manifest, WallClockScheduler::new(), args.hz);
        session.apply_startup(&args).context("Invalid --group selection")?;
        return run_headless(session, args.duration);
    }

    #[cfg(feature = "window")]
    {
        let mut session = Session::new(manifest, gridshow::IntervalScheduler::new(), args.hz);
        session.apply_startup(&args).context("Invalid --group selection")?;
        if args.duration.is_some() {
            warn!("--duration only applies to --headless");
        }
        gridshow::window::run(session, args.root)?;
    }
    Ok(())
}

fn run_headless(mut session: Session<WallClockScheduler>, duration: Option<f64>) -> Result<()> {
    let limit = duration
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("Invalid --duration")?;
    if session.playback_state() == PlaybackState::Paused && limit.is_none() {
        warn!("Paused without --duration: nothing will change until interrupted");
    }

    let mut surface = LogSurface::new();
    let started = Instant::now();
    surface.present(session.grid(), session.frame_index(), session.glitch());

    while surface.is_open() {
        if limit.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }
        if session.pump() > 0 {
            surface.present(session.grid(), session.frame_index(), session.glitch());
        }
        thread::sleep(Duration::from_secs(1) / FPS);
    }

    info!(
        "Stopped after {:.1}s: {} ({} updates)",
        started.elapsed().as_secs_f64(),
        session.status_line(),
        surface.presented()
    );
    Ok(())
}

fn build_manifest(args: ManifestArgs) -> Result<()> {
    let groups: Vec<String> = if args.groups.is_empty() {
        GROUPS.iter().map(|g| g.to_string()).collect()
    } else {
        args.groups
    };
    let document = manifest_builder::build(&args.media, &groups)?;
    manifest_builder::write(&document, &args.out)?;
    println!("Manifest written to {}", args.out.display());
    Ok(())
}

fn rename(args: RenameArgs) -> Result<()> {
    let options = renamer::RenameOptions {
        force_jpg: args.jpg,
        preserve_ext_case: args.preserve_ext_case,
    };
    let moves = renamer::plan(&args.media, args.variant, &options)?;
    if args.apply {
        renamer::apply(&moves, &args.log)?;
    } else {
        renamer::print_dry_run(&moves);
    }
    Ok(())
}
