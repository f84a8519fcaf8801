/*!
 * Scheduling Simulator - Headless Driver
 *
 * Ticks the engine until every process has terminated, then prints the
 * statistics table.
 */

use miette::{IntoDiagnostic, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use sched_sim::{
    init_tracing, OutputFormat, SimulationStats, SimulationTask, SimulatorConfig, Snapshot,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = SimulatorConfig::from_env()?;
    info!(
        policy = config.policy.as_str(),
        quantum = config.quantum.get(),
        tick_ms = config.tick_interval_ms,
        "Simulator starting"
    );

    let engine = Arc::new(RwLock::new(config.build_engine()));
    let task = SimulationTask::spawn(engine, config.tick_interval());

    let mut updates = task.subscribe();
    if task.start() {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if !snapshot.running {
                break;
            }
            info!(
                clock = snapshot.clock,
                running = snapshot.processes.iter().find(|p| p.is_running()).map(|p| p.name.as_str()),
                completed = snapshot.stats.completed,
                "tick"
            );
        }
    } else {
        info!("No processes to run; set SIM_PROCESSES or provide a config file");
    }

    let snapshot = task.snapshot();
    task.shutdown().await;

    match config.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Text => print_table(&snapshot),
    }

    Ok(())
}

fn print_table(snapshot: &Snapshot) {
    let stats: &SimulationStats = &snapshot.stats;
    if snapshot.policy.uses_quantum() {
        println!(
            "{} (quantum {}) - finished at t={}",
            snapshot.policy,
            snapshot.quantum.get(),
            stats.clock
        );
    } else {
        println!("{} - finished at t={}", snapshot.policy, stats.clock);
    }
    println!("{:<8} {:<12} {:>10} {:>8}", "Process", "State", "Turnaround", "Waiting");
    for row in &stats.rows {
        println!(
            "{:<8} {:<12} {:>10} {:>8}",
            row.name, row.state, row.turnaround_time, row.waiting_time
        );
    }
    println!(
        "avg turnaround {:.2}, avg waiting {:.2}, context switches {}, preemptions {}, utilization {:.0}%",
        stats.average_turnaround,
        stats.average_waiting,
        stats.context_switches,
        stats.preemptions,
        stats.utilization * 100.0
    );
}
