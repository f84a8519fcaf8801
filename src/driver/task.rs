/*!
 * Simulation Task - Periodic Engine Driver
 *
 * Background tokio task that calls `advance()` on a shared engine once per
 * tick interval while running, and pauses itself as soon as every process
 * has terminated. The engine stays free of timers; this task is the only
 * thing that advances it.
 *
 * Engine pass-throughs (add/remove/reset/policy/quantum) and start/pause
 * act synchronously on the handle under the engine lock, so a tick is
 * never interleaved with them. Interval changes, manual steps and shutdown
 * go through the command channel.
 *
 * Every state change publishes a fresh [`Snapshot`] on a watch channel for
 * the rendering layer.
 *
 * # Shutdown
 *
 * Preferred: `shutdown().await`, which stops the loop and awaits the task.
 * If the handle is dropped without it, Drop aborts the task and logs a
 * warning.
 */

use crate::core::errors::SimError;
use crate::core::limits::MIN_TICK_INTERVAL_MS;
use crate::core::types::{Pid, SimResult};
use crate::engine::{SchedulingEngine, Snapshot};
use crate::monitoring::RunSpan;
use crate::process::Process;
use crate::scheduler::SchedulingPolicy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, trace, warn};

/// Engine shared between the driver and the rendering layer
pub type SharedEngine = Arc<RwLock<SchedulingEngine>>;

/// Control messages for the simulation task
#[derive(Debug, Clone)]
pub enum SimulationCommand {
    /// Replace the tick interval (milliseconds)
    SetTickInterval(u64),
    /// Advance exactly one tick, whether running or paused
    Trigger,
    /// Stop the task
    Shutdown,
}

/// State shared by the handle and the loop
struct Shared {
    engine: SharedEngine,
    running: AtomicBool,
    snapshots: watch::Sender<Snapshot>,
}

impl Shared {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn publish(&self) {
        let snapshot = self.engine.read().snapshot(self.is_running());
        self.snapshots.send_replace(snapshot);
    }

    /// Advance once unless there is nothing left to do. Periodic ticks
    /// (`manual == false`) only advance while running. Pauses the run as
    /// soon as the last process terminates. Returns whether a tick happened.
    fn step(&self, run: &mut Option<RunSpan>, manual: bool) -> bool {
        let mut engine = self.engine.write();
        // Re-checked under the lock so a concurrent pause/reset wins
        if !manual && !self.is_running() {
            return false;
        }
        if engine.all_terminated() {
            drop(engine);
            if self.running.swap(false, Ordering::SeqCst) {
                info!("Nothing left to run, simulation paused");
            }
            *run = None;
            self.publish();
            return false;
        }

        let run = run.get_or_insert_with(|| RunSpan::new(engine.policy().as_str(), engine.clock()));
        let span = run.span().clone();
        let _entered = span.enter();

        let outcome = engine.advance();
        run.record_tick();
        trace!(clock = outcome.clock, events = outcome.events.len(), "tick");

        if engine.all_terminated() && self.running.swap(false, Ordering::SeqCst) {
            info!(clock = outcome.clock, "All processes terminated, simulation paused");
        }
        drop(engine);
        self.publish();
        true
    }
}

/// Handle to the simulation background task
pub struct SimulationTask {
    shared: Arc<Shared>,
    command_tx: mpsc::UnboundedSender<SimulationCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
    /// Tracks whether graceful shutdown was initiated
    shutdown_initiated: Arc<AtomicBool>,
}

impl SimulationTask {
    /// Spawn a paused driver for `engine`. Must be called within a tokio runtime.
    pub fn spawn(engine: SharedEngine, tick_interval: Duration) -> Self {
        let initial = engine.read().snapshot(false);
        let (snapshots, _) = watch::channel(initial);
        let shared = Arc::new(Shared {
            engine,
            running: AtomicBool::new(false),
            snapshots,
        });

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let loop_shared = Arc::clone(&shared);
        let handle = tokio::spawn(async move {
            run_simulation_loop(loop_shared, tick_interval, command_rx).await;
        });

        info!(interval_ms = tick_interval.as_millis() as u64, "Simulation task spawned");

        Self {
            shared,
            command_tx,
            handle: Some(handle),
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The engine this task drives
    pub fn engine(&self) -> SharedEngine {
        Arc::clone(&self.shared.engine)
    }

    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Start ticking. Refused (returns false) when every process has terminated.
    pub fn start(&self) -> bool {
        if self.shared.engine.read().all_terminated() {
            info!("Start ignored: nothing left to run");
            return false;
        }
        if !self.shared.running.swap(true, Ordering::SeqCst) {
            info!("Simulation started");
            self.shared.publish();
        }
        true
    }

    /// Stop ticking; the engine keeps its state
    pub fn pause(&self) {
        if self.shared.running.swap(false, Ordering::SeqCst) {
            info!("Simulation paused");
            self.shared.publish();
        }
    }

    /// Play/pause toggle. Returns the new running state.
    pub fn toggle(&self) -> bool {
        if self.is_running() {
            self.pause();
            false
        } else {
            self.start()
        }
    }

    /// Stop ticking and reset the engine
    pub fn reset(&self) {
        let mut engine = self.shared.engine.write();
        self.shared.running.store(false, Ordering::SeqCst);
        engine.reset();
        drop(engine);
        self.shared.publish();
    }

    pub fn add_process(&self) -> Option<Pid> {
        let pid = self.shared.engine.write().add_process();
        self.shared.publish();
        pid
    }

    pub fn remove_process(&self) -> Option<Process> {
        let removed = self.shared.engine.write().remove_process();
        self.shared.publish();
        removed
    }

    pub fn set_policy(&self, policy: SchedulingPolicy) {
        self.shared.engine.write().set_policy(policy);
        self.shared.publish();
    }

    pub fn set_quantum(&self, ticks: i64) {
        self.shared.engine.write().set_quantum(ticks);
        self.shared.publish();
    }

    /// Change the wall-clock time between ticks
    pub fn set_tick_interval(&self, millis: u64) -> SimResult<()> {
        self.send(SimulationCommand::SetTickInterval(millis))
    }

    /// Advance a single tick right away
    pub fn trigger(&self) -> SimResult<()> {
        self.send(SimulationCommand::Trigger)
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Wait until the task is no longer running, e.g. after auto-pause
    pub async fn wait_until_paused(&self) -> SimResult<Snapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(|s| !s.running)
            .await
            .map_err(|e| SimError::DriverUnavailable(e.to_string()))?;
        Ok(snapshot.clone())
    }

    fn send(&self, command: SimulationCommand) -> SimResult<()> {
        self.command_tx
            .send(command)
            .map_err(|e| SimError::DriverUnavailable(e.to_string()))
    }

    /// Shutdown the task gracefully. Consumes self.
    pub async fn shutdown(mut self) {
        self.shutdown_initiated.store(true, Ordering::SeqCst);
        self.shared.running.store(false, Ordering::SeqCst);

        let _ = self.command_tx.send(SimulationCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Simulation task shutdown error: {}", e);
            } else {
                info!("Simulation task shutdown complete");
            }
        }
    }
}

/// Tick loop
async fn run_simulation_loop(
    shared: Arc<Shared>,
    tick_interval: Duration,
    mut command_rx: mpsc::UnboundedReceiver<SimulationCommand>,
) {
    let mut interval = new_interval(tick_interval);
    let mut run: Option<RunSpan> = None;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if shared.is_running() {
                    shared.step(&mut run, false);
                } else {
                    run = None;
                }
            }

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    SimulationCommand::SetTickInterval(millis) => {
                        info!(interval_ms = millis, "Tick interval updated");
                        interval = new_interval(Duration::from_millis(millis));
                    }

                    SimulationCommand::Trigger => {
                        if shared.step(&mut run, true) {
                            trace!("Manual tick");
                        }
                        if !shared.is_running() {
                            run = None;
                        }
                    }

                    SimulationCommand::Shutdown => {
                        info!("Simulation task shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Interval whose first tick is one full period away
fn new_interval(period: Duration) -> tokio::time::Interval {
    let period = period.max(Duration::from_millis(MIN_TICK_INTERVAL_MS));
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    interval
}

impl Drop for SimulationTask {
    fn drop(&mut self) {
        if self.shutdown_initiated.load(Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.handle.take() {
            warn!(
                "SimulationTask dropped without calling shutdown() - aborting task immediately. \
                 Use `task.shutdown().await` for graceful cleanup."
            );
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn shared_engine(policy: SchedulingPolicy, specs: &[(u8, u32)]) -> SharedEngine {
        Arc::new(RwLock::new(
            SchedulingEngine::builder()
                .with_policy(policy)
                .with_processes(specs.iter().map(|&(p, b)| ProcessSpec::new(p, b)))
                .build(),
        ))
    }

    #[tokio::test]
    async fn test_task_lifecycle() {
        let task = SimulationTask::spawn(shared_engine(SchedulingPolicy::Fcfs, &[]), Duration::from_millis(5));
        tokio::time::sleep(Duration::from_millis(10)).await;
        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_refused_when_nothing_to_run() {
        let task = SimulationTask::spawn(shared_engine(SchedulingPolicy::Fcfs, &[]), Duration::from_millis(5));
        assert!(!task.start());
        assert!(!task.is_running());
        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_toggle() {
        let task = SimulationTask::spawn(
            shared_engine(SchedulingPolicy::Fcfs, &[(1, 10)]),
            Duration::from_secs(60),
        );
        assert!(task.toggle());
        assert!(task.snapshot().running);
        assert!(!task.toggle());
        assert!(!task.snapshot().running);
        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_pass_throughs_publish() {
        let task = SimulationTask::spawn(shared_engine(SchedulingPolicy::Fcfs, &[]), Duration::from_secs(60));
        let pid = task.add_process();
        assert_eq!(pid, Some(1));
        assert_eq!(task.snapshot().processes.len(), 1);

        task.set_policy(SchedulingPolicy::RoundRobin);
        task.set_quantum(0);
        let snapshot = task.snapshot();
        assert_eq!(snapshot.policy, SchedulingPolicy::RoundRobin);
        assert_eq!(snapshot.quantum.get(), 1);

        assert_eq!(task.remove_process().map(|p| p.id), Some(1));
        assert!(task.snapshot().processes.is_empty());
        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_drop_without_shutdown_aborts() {
        let task = SimulationTask::spawn(shared_engine(SchedulingPolicy::Fcfs, &[(1, 3)]), Duration::from_millis(5));
        task.start();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(task);
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
