/*!
 * Monitoring
 * Tracing setup and run-level spans
 */

mod tracer;

pub use tracer::{generate_run_id, init_tracing, RunSpan};
