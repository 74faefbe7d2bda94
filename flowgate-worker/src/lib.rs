//! Flowgate Worker
//!
//! Job workers for the workflow-engine gateway.
//!
//! An open worker runs two independent tasks that share a job queue and a
//! cancellation signal:
//! - Poller: issues activation calls and enqueues the jobs it receives
//! - Dispatcher: hands queued jobs, one at a time, to the user's handler
//!
//! Open a worker with [`JobWorkerBuilder`] (or [`WorkerExt::new_worker`]) and
//! stop it with [`JobWorker::dispose`].

mod builder;
pub mod config;
mod dispatcher;
pub mod error;
mod handler;
mod poller;
mod queue;
mod state;
mod stats;
mod worker;

#[cfg(test)]
mod test_support;

pub use builder::{JobWorkerBuilder, WorkerExt};
pub use config::WorkerConfig;
pub use error::{Result, WorkerError};
pub use handler::JobHandler;
pub use queue::JobQueue;
pub use stats::WorkerStats;
pub use worker::JobWorker;
