// Copyright (c) 2026 rezky_nightky

mod cell;
mod column;
mod config;
mod error;
mod frame;
mod glyphs;
mod logging;
mod palette;
mod rain;
mod runtime;
mod terminal;

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, error, info, trace, warn};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

use crate::config::RainConfig;
use crate::error::RainError;
use crate::frame::FrameBuffer;
use crate::rain::Rain;
use crate::terminal::{Backend, CrosstermBackend, Session};

// Filled by the panic hook, printed once the terminal is restored.
static PANIC_MESSAGE: Mutex<Option<String>> = Mutex::new(None);

const PANIC_EXIT_CODE: i32 = 101;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StopReason {
    QuitKey,
    Signal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Outcome {
    frames: u64,
    reason: StopReason,
}

fn install_shutdown_handlers(flag: &Arc<AtomicBool>) {
    #[cfg(unix)]
    {
        for sig in [SIGINT, SIGTERM, SIGHUP] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(flag)) {
                warn!(signal = sig, error = %e, "failed to install signal handler");
            }
        }
    }

    #[cfg(windows)]
    {
        let flag = Arc::clone(flag);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
            warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }
}

/// Ticks, renders and paces until a quit key or a shutdown request.
fn animate<B: Backend, R: Rng>(
    session: &mut Session<B>,
    rain: &mut Rain<R>,
    config: &RainConfig,
    shutdown: &AtomicBool,
) -> io::Result<Outcome> {
    let geometry = session.geometry();
    let mut buffer = FrameBuffer::new(geometry.width, geometry.height);
    let frame_budget = config.frame_budget();
    let mut frames: u64 = 0;
    let mut last_tick = Instant::now();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(Outcome {
                frames,
                reason: StopReason::Signal,
            });
        }

        let tick_start = Instant::now();
        let delta = tick_start
            .saturating_duration_since(last_tick)
            .min(config.max_tick_delta);
        last_tick = tick_start;

        let stats = rain.tick(delta.as_secs_f64());
        rain.render(buffer.begin_frame());
        let writes = buffer.diff_and_emit();
        if !writes.is_empty() {
            session.draw(&writes)?;
        }
        frames += 1;
        trace!(
            frame = frames,
            writes = writes.len(),
            mutated = stats.mutated,
            respawned = stats.respawned,
            "frame"
        );

        // Wait out the rest of the frame in input polls so quit keys and
        // signals are seen within one frame.
        let deadline = tick_start + frame_budget;
        while !shutdown.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            if session.poll_quit(deadline - now)? {
                return Ok(Outcome {
                    frames,
                    reason: StopReason::QuitKey,
                });
            }
        }
    }
}

fn run_with<B: Backend, R: Rng>(
    backend: B,
    config: &RainConfig,
    rng: R,
    shutdown: &AtomicBool,
) -> Result<Outcome, RainError> {
    let mut session = Session::open(backend, config)?;
    let mut rain = Rain::new(session.geometry(), config.clone(), rng);
    debug!(
        color_mode = ?session.color_mode(),
        columns = rain.columns().len(),
        "animation starting"
    );

    let outcome = animate(&mut session, &mut rain, config, shutdown);
    let closed = session.close();
    let outcome = outcome?;
    closed?;

    info!(frames = outcome.frames, reason = ?outcome.reason, "rain stopped");
    Ok(outcome)
}

fn run(shutdown: &AtomicBool) -> Result<Outcome, RainError> {
    run_with(
        CrosstermBackend::new(),
        &RainConfig::default(),
        StdRng::from_os_rng(),
        shutdown,
    )
}

fn main() {
    logging::init();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        build = env!("DIGITAL_RAIN_BUILD"),
        git = env!("DIGITAL_RAIN_GIT_SHA"),
        "starting"
    );

    panic::set_hook(Box::new(|info| {
        error!(%info, "panic");
        if let Ok(mut slot) = PANIC_MESSAGE.lock() {
            *slot = Some(info.to_string());
        }
    }));

    let shutdown = Arc::new(AtomicBool::new(false));
    install_shutdown_handlers(&shutdown);

    // The session has been dropped, and the terminal restored, by the time
    // any of these arms prints.
    let code = match panic::catch_unwind(AssertUnwindSafe(|| run(&shutdown))) {
        Ok(Ok(_)) => 0,
        Ok(Err(e)) => {
            error!(error = %e, "exiting with error");
            eprintln!("Error: {}", e);
            e.exit_code()
        }
        Err(_) => {
            let msg = PANIC_MESSAGE
                .lock()
                .ok()
                .and_then(|mut m| m.take())
                .unwrap_or_else(|| "panicked".to_string());
            eprintln!("{}", msg);
            PANIC_EXIT_CODE
        }
    };
    std::process::exit(code);
}
