//! surfer_control: interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gesture_core::{ControlConfig, PolicyKind};
use surfer_control::app::{run, AppConfig, SourceKind};
use surfer_control::sink::SinkKind;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "surfer_control", version, about = "Hand-gesture key control for runner games")]
struct Cli {
    /// YAML config file (missing fields take their defaults)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Gesture policy: static (pose table) or motion (palm swipes)
    #[arg(long)]
    policy: Option<PolicyKind>,

    /// Minimum seconds between two key presses
    #[arg(long)]
    cooldown: Option<f64>,

    /// Swipe distance in pixels (motion policy)
    #[arg(long)]
    threshold: Option<f32>,

    /// Where hand frames come from
    #[arg(long, value_enum, default_value_t = SourceKind::Sim)]
    source: SourceKind,

    /// NDJSON session to replay (with --source replay)
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Pace replayed frames by their timestamps
    #[arg(long)]
    realtime: bool,

    /// Record every frame to this NDJSON file
    #[arg(long)]
    record: Option<PathBuf>,

    /// Where key presses go
    #[arg(long, value_enum, default_value_t = SinkKind::Log)]
    sink: SinkKind,

    /// Run without the overlay window
    #[arg(long)]
    headless: bool,

    /// Frame rate of the simulated hand
    #[arg(long, default_value_t = 30)]
    sim_fps: u32,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--sink stdout` stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("surfer_control=info,gesture_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut control = match &cli.config {
        Some(path) => ControlConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ControlConfig::default(),
    };
    if let Some(policy) = cli.policy       { control.policy = policy; }
    if let Some(c)      = cli.cooldown     { control.cooldown_seconds = c; }
    if let Some(t)      = cli.threshold    { control.movement_threshold_px = t; }

    #[cfg(feature = "leap")]
    info!("hardware support: LeapMotion");
    #[cfg(not(feature = "leap"))]
    info!("hardware support: none (use --features leap for LeapMotion)");

    info!(
        policy = control.policy.name(),
        cooldown = control.cooldown_seconds,
        source = ?cli.source,
        sink = ?cli.sink,
        "starting"
    );

    run(AppConfig {
        control,
        source:      cli.source,
        replay_path: cli.replay,
        realtime:    cli.realtime,
        record_path: cli.record,
        sink:        cli.sink,
        headless:    cli.headless,
        sim_fps:     cli.sim_fps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_parse() {
        let cli = Cli::parse_from([
            "surfer_control", "--policy", "motion", "--cooldown", "0.5",
            "--source", "replay", "--replay", "s.ndjson", "--headless",
        ]);
        assert_eq!(cli.policy, Some(PolicyKind::Motion));
        assert_eq!(cli.cooldown, Some(0.5));
        assert_eq!(cli.source, SourceKind::Replay);
        assert!(cli.headless);
        assert_eq!(cli.sink, SinkKind::Log);
    }
}
