//! Top-level application state and frame loop.
//!
//! `AppState` owns the `GestureController`, the key sink and the optional
//! recorder.  It processes one `HandFrame` at a time and exposes what the
//! overlay needs each render.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use anyhow::{bail, Context};
use gesture_core::{
    Action, ControlConfig, FrameReport, GateState, GestureController, HandFrame, HandLandmarks,
    KeySink,
};
use tracing::{info, warn};

use crate::recording::FrameRecorder;
use crate::sink::{make_sink, SinkKind};
use crate::source::{spawn_hand_source, ReplayHandSource, SimHandSource, SimInput};
use crate::visualizer::{Overlay, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Keyboard + mouse driven hand (needs the window).
    #[default]
    Sim,
    /// LeapMotion controller (build with `--features leap`).
    Leap,
    /// Recorded NDJSON session.
    Replay,
}

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub control:     ControlConfig,
    pub source:      SourceKind,
    pub replay_path: Option<PathBuf>,
    /// Pace replayed frames by their timestamps.
    pub realtime:    bool,
    pub record_path: Option<PathBuf>,
    pub sink:        SinkKind,
    /// Run without the overlay window.
    pub headless:    bool,
    /// Frame rate of the simulated hand.
    pub sim_fps:     u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            control:     ControlConfig::default(),
            source:      SourceKind::Sim,
            replay_path: None,
            realtime:    false,
            record_path: None,
            sink:        SinkKind::Log,
            headless:    false,
            sim_fps:     30,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FpsMeter
// ════════════════════════════════════════════════════════════════════════════

/// Instantaneous frame rate from consecutive frame timestamps.
#[derive(Clone, Debug, Default)]
pub struct FpsMeter {
    prev: Option<f64>,
    fps:  f64,
}

impl FpsMeter {
    pub fn tick(&mut self, now: f64) -> f64 {
        self.fps = match self.prev {
            Some(p) if now != p => 1.0 / (now - p),
            _ => 0.0,
        };
        self.prev = Some(now);
        self.fps
    }

    pub fn fps(&self) -> f64 { self.fps }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState<S: KeySink> {
    controller: GestureController,
    sink:       S,
    recorder:   Option<FrameRecorder>,
    fps:        FpsMeter,

    // ── last frame, for the overlay ──────────────────────────────────────
    hands:       Vec<HandLandmarks>,
    last_report: FrameReport,
    last_time:   f64,

    pub status: String,

    // ── counters ─────────────────────────────────────────────────────────
    frames:     u64,
    dispatched: u64,
}

impl<S: KeySink> AppState<S> {
    pub fn new(control: ControlConfig, sink: S, recorder: Option<FrameRecorder>) -> Self {
        let status = format!(
            "Ready - policy {}  cooldown {:.2}s",
            control.policy.name(), control.cooldown_seconds
        );
        AppState {
            controller: GestureController::new(control),
            sink,
            recorder,
            fps: FpsMeter::default(),
            hands: Vec::new(),
            last_report: FrameReport::default(),
            last_time: 0.0,
            status,
            frames: 0,
            dispatched: 0,
        }
    }

    // ── process one HandFrame ────────────────────────────────────────────

    pub fn handle_frame(&mut self, frame: &HandFrame) {
        let failed = match self.recorder.as_mut() {
            Some(rec) => rec.write(frame).err(),
            None      => None,
        };
        if let Some(e) = failed {
            warn!("recording stopped: {e}");
            self.recorder = None;
        }

        self.fps.tick(frame.timestamp);
        self.frames += 1;
        self.last_time = frame.timestamp;

        let report = self.controller.process_frame(frame, &mut self.sink);
        self.dispatched += report.dispatched.len() as u64;

        self.hands = report.hands.iter().map(|h| h.landmarks.clone()).collect();

        self.status = match report.hands.first() {
            Some(h) => format!(
                "fingers {}  action {}  gate {}",
                h.fingers,
                h.action,
                gate_name(self.controller.gate_state(frame.timestamp)),
            ),
            None => "no hand".to_string(),
        };
        self.last_report = report;
    }

    /// Flush the recorder, if any.
    pub fn finish(&mut self) {
        if let Some(rec) = self.recorder.as_mut() {
            if let Err(e) = rec.flush() {
                warn!("failed to flush recording: {e}");
            } else {
                info!(frames = rec.frames(), "recording saved");
            }
        }
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn controller(&self)   -> &GestureController { &self.controller }
    pub fn last_report(&self)  -> &FrameReport       { &self.last_report }
    pub fn sink(&self)         -> &S                 { &self.sink }
    pub fn frames(&self)       -> u64                { self.frames }
    pub fn dispatched(&self)   -> u64                { self.dispatched }
    pub fn fps(&self)          -> f64                { self.fps.fps() }

    pub fn overlay(&self) -> Overlay<'_> {
        Overlay {
            hands:        &self.hands,
            fingers:      self.last_report.hands.first().map(|h| h.fingers),
            label:        self.controller.label(),
            alert:        self.controller.latched_action() == Some(Action::Hoverboard),
            fps:          self.fps.fps(),
            hand_present: self.controller.hand_present(),
            cooling_down: self.controller.gate_state(self.last_time) == GateState::CoolingDown,
            status:       &self.status,
        }
    }
}

fn gate_name(g: GateState) -> &'static str {
    match g {
        GateState::Idle        => "idle",
        GateState::CoolingDown => "cooling",
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sources
// ════════════════════════════════════════════════════════════════════════════

/// Start the configured hand source.  `sim_rx` feeds the simulated hand and
/// is dropped for every other source.
fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> anyhow::Result<Receiver<HandFrame>> {
    match cfg.source {
        SourceKind::Sim => Ok(spawn_hand_source(SimHandSource::new(sim_rx, cfg.sim_fps))),
        SourceKind::Replay => {
            let path = cfg
                .replay_path
                .as_ref()
                .context("--source replay needs --replay <file>")?;
            let source = ReplayHandSource::open(path, cfg.realtime)
                .with_context(|| format!("failed to load replay {}", path.display()))?;
            Ok(spawn_hand_source(source))
        }
        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok(spawn_hand_source(crate::source::LeapHandSource::default())),
        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => bail!("LeapMotion support not compiled in; rebuild with --features leap"),
    }
}

fn open_recorder(cfg: &AppConfig) -> anyhow::Result<Option<FrameRecorder>> {
    cfg.record_path
        .as_ref()
        .map(|p| {
            FrameRecorder::create(p).with_context(|| format!("failed to create {}", p.display()))
        })
        .transpose()
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the hand source and, unless headless, the overlay window, then
/// drives capture → classify → dispatch → render until the window closes,
/// the user quits, or the source runs dry.
pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    cfg.control.validate()?;
    if cfg.headless {
        run_headless(&cfg)
    } else {
        run_windowed(&cfg)
    }
}

fn run_headless(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.source == SourceKind::Sim {
        bail!("the simulated hand needs the overlay window; drop --headless or pick another source");
    }
    let (_sim_tx, sim_rx) = mpsc::channel();
    let frames = open_source(cfg, sim_rx)?;
    let mut app = AppState::new(cfg.control.clone(), make_sink(cfg.sink), open_recorder(cfg)?);

    info!("headless run started");
    for frame in frames.iter() {
        app.handle_frame(&frame);
    }
    app.finish();
    info!(frames = app.frames(), dispatched = app.dispatched(), "hand source finished");
    Ok(())
}

fn run_windowed(cfg: &AppConfig) -> anyhow::Result<()> {
    // ── Sim input channel ─────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let frames = open_source(cfg, sim_rx)?;

    // ── Overlay window (owns the sim input sender) ────────────────────────
    let mut vis = Visualizer::new(
        sim_tx,
        cfg.control.frame_width as usize,
        cfg.control.frame_height as usize,
    )?;

    let mut app = AppState::new(cfg.control.clone(), make_sink(cfg.sink), open_recorder(cfg)?);

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Window input → SimInput
        if !vis.poll_input() { break; }

        // 2. Next captured frame, then anything else already queued
        match frames.recv_timeout(Duration::from_millis(16)) {
            Ok(frame) => {
                app.handle_frame(&frame);
                while let Ok(frame) = frames.try_recv() {
                    app.handle_frame(&frame);
                }
            }
            Err(RecvTimeoutError::Timeout)      => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("hand source finished");
                break;
            }
        }

        // 3. Render
        vis.render(&app.overlay());
    }

    app.finish();
    info!(frames = app.frames(), dispatched = app.dispatched(), "session ended");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
