use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use super::metrics::MetricsAccumulator;
use super::scene::SceneMachine;
use super::{InputSnapshot, MetricsHandle, Scene, SceneCommand, SceneKey};

/// Source of per-tick input snapshots. The loop polls exactly once per
/// simulation tick, so edge-triggered presses must be consumed on poll.
pub trait InputSource {
    fn poll(&mut self) -> InputSnapshot;
}

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub metrics_log_interval: Duration,
    /// Stops the loop after this many ticks. `None` runs until a quit.
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            metrics_log_interval: Duration::from_secs(1),
            max_ticks: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    QuitRequested,
    SceneRequestedQuit,
    TickBudgetReached,
}

#[derive(Debug, Clone, Copy)]
pub struct LoopSummary {
    pub ticks_run: u64,
    pub shutdown_reason: ShutdownReason,
}

pub fn run_app(
    config: LoopConfig,
    title_scene: Box<dyn Scene>,
    game_scene: Box<dyn Scene>,
    input: &mut dyn InputSource,
) -> LoopSummary {
    run_app_with_metrics(config, title_scene, game_scene, input, MetricsHandle::default())
}

/// Fixed-timestep scheduler: frames accumulate wall time, each full
/// `fixed_dt` runs one simulation tick, and a per-frame tick cap drops
/// backlog instead of spiraling when the host stalls.
pub fn run_app_with_metrics(
    config: LoopConfig,
    title_scene: Box<dyn Scene>,
    game_scene: Box<dyn Scene>,
    input: &mut dyn InputSource,
    metrics_handle: MetricsHandle,
) -> LoopSummary {
    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let fixed_dt_seconds = fixed_dt.as_secs_f32();

    let mut scenes = SceneMachine::new(title_scene, game_scene, SceneKey::Title);
    scenes.load_active();
    info!(scene = ?scenes.active_scene(), "scene_loaded");
    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        max_ticks = config.max_ticks,
        "loop_config"
    );

    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics_accumulator = MetricsAccumulator::new(metrics_log_interval);
    let mut ticks_run: u64 = 0;

    loop {
        let now = Instant::now();
        let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
        last_frame_instant = now;
        accumulator = accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));

        let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
        for _ in 0..step_plan.ticks_to_run {
            let snapshot = input.poll();
            if snapshot.quit_requested() {
                info!(reason = "quit_input", ticks_run, "shutdown");
                scenes.shutdown_all();
                return LoopSummary {
                    ticks_run,
                    shutdown_reason: ShutdownReason::QuitRequested,
                };
            }

            let tick_start = Instant::now();
            let command = scenes.update_active(fixed_dt_seconds, &snapshot);
            metrics_accumulator.record_tick(tick_start.elapsed());
            ticks_run = ticks_run.saturating_add(1);

            match command {
                SceneCommand::SwitchTo(next_scene) => {
                    if scenes.switch_to(next_scene) {
                        info!(scene = ?scenes.active_scene(), "scene_switched");
                    }
                }
                SceneCommand::ReloadCurrent => {
                    scenes.reload_active();
                    info!(scene = ?scenes.active_scene(), "scene_reloaded");
                }
                SceneCommand::Quit => {
                    info!(reason = "scene_command", ticks_run, "shutdown");
                    scenes.shutdown_all();
                    return LoopSummary {
                        ticks_run,
                        shutdown_reason: ShutdownReason::SceneRequestedQuit,
                    };
                }
                SceneCommand::None => {}
            }

            if let Some(limit) = config.max_ticks {
                if ticks_run >= limit {
                    info!(reason = "tick_budget", ticks_run, "shutdown");
                    scenes.shutdown_all();
                    return LoopSummary {
                        ticks_run,
                        shutdown_reason: ShutdownReason::TickBudgetReached,
                    };
                }
            }
        }
        accumulator = step_plan.remaining_accumulator;

        if step_plan.dropped_backlog > Duration::ZERO {
            warn!(
                dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                max_ticks_per_frame, "sim_clamp_triggered"
            );
        }

        if let Some(snapshot) = metrics_accumulator.maybe_snapshot(now) {
            metrics_handle.publish(snapshot);
            info!(
                tps = snapshot.tps,
                tick_time_ms = snapshot.tick_time_ms,
                scene = ?scenes.active_scene(),
                title = ?scenes.debug_title_active(),
                "loop_metrics"
            );
        }

        let frame_elapsed = Instant::now().saturating_duration_since(now);
        if frame_elapsed < fixed_dt {
            thread::sleep(fixed_dt - frame_elapsed);
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}
