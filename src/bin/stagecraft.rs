use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use stagecraft::{
    AudioSink, Canvas, DeclarativeScene, FileAssets, PixmapSurface, RecordingSurface, Rgba8,
    SceneConfig, Stage, StageEvent,
};

#[derive(Parser, Debug)]
#[command(name = "stagecraft", version)]
struct Cli {
    /// Log interpreter warnings and lifecycle events to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a scene document and list problems.
    Check(CheckArgs),
    /// Simulate a scene headlessly and print what happens.
    Run(RunArgs),
    /// Print the display list at a point in time as JSON.
    Dump(DumpArgs),
    /// Rasterize one frame to PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seconds to simulate.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Ticks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Click at `x,y@seconds`. Repeatable.
    #[arg(long = "click")]
    clicks: Vec<ClickAt>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated time in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Ticks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Click at `x,y@seconds`. Repeatable.
    #[arg(long = "click")]
    clicks: Vec<ClickAt>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON. A document that fails to load renders an error
    /// screen instead.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated time in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Ticks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Click at `x,y@seconds`. Repeatable.
    #[arg(long = "click")]
    clicks: Vec<ClickAt>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

/// Scripted pointer press.
#[derive(Clone, Copy, Debug, PartialEq)]
struct ClickAt {
    x: f64,
    y: f64,
    at: f64,
}

impl FromStr for ClickAt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pos, at) = s
            .split_once('@')
            .ok_or_else(|| format!("expected x,y@seconds, got '{s}'"))?;
        let (x, y) = pos
            .split_once(',')
            .ok_or_else(|| format!("expected x,y@seconds, got '{s}'"))?;
        let num = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{v}' in '{s}': {e}"))
        };
        Ok(Self {
            x: num(x)?,
            y: num(y)?,
            at: num(at)?,
        })
    }
}

/// Prints sound effects instead of playing them.
struct PrintAudio;

impl AudioSink for PrintAudio {
    fn play_sfx(&mut self, id: &str) {
        println!("sfx {id}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Run(args) => cmd_run(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = SceneConfig::from_path(&args.in_path)?;
    let issues = config.lint();
    println!(
        "{}: scene '{}', {} state(s), {} issue(s)",
        args.in_path.display(),
        config.scene_name,
        config.states.len(),
        issues.len()
    );
    for issue in issues {
        println!("  - {issue}");
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = SceneConfig::from_path(&args.in_path)?;
    let mut stage = build_stage(config, &args.in_path);
    stage = stage.with_audio(PrintAudio);
    print_events(0.0, &mut stage);

    simulate(&mut stage, args.seconds, args.fps, &args.clicks, |t, stage| {
        print_events(t, stage)
    })?;
    println!(
        "t={:.3}s end: scene '{}', state '{}'",
        stage.elapsed(),
        stage.current_scene_name().unwrap_or("-"),
        stage
            .scene::<DeclarativeScene>()
            .and_then(|s| s.current_state_name())
            .unwrap_or("-")
    );
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let config = SceneConfig::from_path(&args.in_path)?;
    let mut stage = build_stage(config, &args.in_path);
    simulate(&mut stage, args.at, args.fps, &args.clicks, |_, _| {})?;

    let mut surface = RecordingSurface::new();
    stage.render(&mut surface);
    let json = serde_json::to_string_pretty(surface.commands()).context("encode display list")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = match SceneConfig::from_path(&args.in_path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "scene failed to load, rendering the error scene");
            SceneConfig::fallback("error", err.to_string())
        }
    };
    let mut stage = build_stage(config, &args.in_path);
    simulate(&mut stage, args.at, args.fps, &args.clicks, |_, _| {})?;

    let canvas = stage.canvas();
    let mut surface = PixmapSurface::new(
        canvas.width.round() as u32,
        canvas.height.round() as u32,
        Rgba8::rgb(18, 20, 28),
    )?;
    stage.render(&mut surface);
    if surface.skipped_text() > 0 {
        tracing::info!(count = surface.skipped_text(), "text is not rasterized");
    }
    let frame = surface.finish();
    frame.write_png(&args.out)?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn build_stage(config: SceneConfig, in_path: &Path) -> Stage {
    let root = in_path.parent().unwrap_or_else(|| Path::new("."));
    let canvas = config.canvas_size.unwrap_or_else(Canvas::default);
    let name = config.scene_name.clone();

    let mut stage = Stage::new(canvas).with_assets(FileAssets::new(root));
    stage.register_as(name.clone(), Box::new(DeclarativeScene::new(config)));
    stage.switch_to(&name);
    stage
}

/// Tick `stage` at `fps` until `seconds` have passed, pressing and releasing
/// the pointer for each scripted click.
fn simulate(
    stage: &mut Stage,
    seconds: f64,
    fps: u32,
    clicks: &[ClickAt],
    mut after_tick: impl FnMut(f64, &mut Stage),
) -> anyhow::Result<()> {
    anyhow::ensure!(fps > 0, "--fps must be positive");
    anyhow::ensure!(seconds >= 0.0, "simulated time must not be negative");

    let dt = 1.0 / f64::from(fps);
    let ticks = (seconds * f64::from(fps)).round() as u64;
    let mut pending: Vec<ClickAt> = clicks.to_vec();
    pending.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut pending = pending.into_iter().peekable();

    for tick in 0..ticks {
        let now = tick as f64 * dt;
        let mut released = None;
        while let Some(click) = pending.next_if(|c| c.at <= now + dt / 2.0) {
            stage.set_pointer(click.x, click.y, true);
            released = Some(click);
        }
        stage.update(dt);
        if let Some(click) = released {
            stage.set_pointer(click.x, click.y, false);
        }
        after_tick(stage.elapsed(), stage);
    }
    Ok(())
}

fn print_events(t: f64, stage: &mut Stage) {
    for event in stage.drain_events() {
        match event {
            StageEvent::SceneChanged { scene } => println!("t={t:.3}s scene '{scene}'"),
            StageEvent::StateEntered { scene, state } => {
                println!("t={t:.3}s state '{scene}/{state}'")
            }
            StageEvent::Custom { name, params } => println!("t={t:.3}s custom '{name}' {params}"),
        }
    }
}
