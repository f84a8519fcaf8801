/*!
 * Structured Tracing
 * Subscriber setup and per-run spans using the tracing crate
 */

use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SIM_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it twice is harmless; the second subscriber is not installed.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SIM_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        // JSON output for production/parsing
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok();
        if installed {
            info!("Structured tracing initialized with JSON output");
        }
    } else {
        // Human-readable output for development
        let installed = registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok();
        if installed {
            info!("Structured tracing initialized");
        }
    }
}

/// Generate a unique id for correlating the logs of one simulation run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one start-to-pause stretch of the driver
pub struct RunSpan {
    span: tracing::Span,
    start: Instant,
    run_id: String,
    ticks: u64,
}

impl RunSpan {
    pub fn new(policy: &str, clock: u64) -> Self {
        let run_id = generate_run_id();
        let span = span!(
            Level::INFO,
            "simulation_run",
            run_id = %run_id,
            policy = policy,
            start_clock = clock,
            ticks = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        span.in_scope(|| debug!(run_id = %run_id, clock, "run started"));

        Self {
            span,
            start: Instant::now(),
            run_id,
            ticks: 0,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    /// Count one advanced tick
    pub fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("ticks", self.ticks);
        self.span.record("duration_ms", duration.as_millis() as u64);
        self.span.in_scope(|| {
            debug!(
                run_id = %self.run_id,
                ticks = self.ticks,
                duration_ms = duration.as_millis() as u64,
                "run ended"
            )
        });
    }
}
