//! Flowgate Worker
//!
//! A standalone worker process that activates jobs of one type from the
//! gateway, logs each job and completes it with its variables unchanged.
//!
//! Configuration comes from the environment (see [`WorkerConfig::from_env`]),
//! plus `FLOWGATE_GATEWAY_URL` for the gateway address. The worker runs until
//! Ctrl-C.

use anyhow::{Context, Result};
use flowgate_client::{Client, JobClient, RetryPolicy};
use flowgate_core::domain::job::Job;
use flowgate_worker::{JobWorkerBuilder, WorkerConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowgate_worker=info,flowgate_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flowgate worker");

    let config = WorkerConfig::from_env().context("Failed to load worker configuration")?;
    let gateway_url =
        std::env::var("FLOWGATE_GATEWAY_URL").unwrap_or_else(|_| DEFAULT_GATEWAY_URL.to_string());
    info!(
        "Loaded configuration: job_type={}, worker={}, gateway_url={}",
        config.job_type, config.worker_name, gateway_url
    );

    let client = Client::new(gateway_url);

    let worker = JobWorkerBuilder::from_config(client.job_client(), config)
        .handler(echo)
        .retry_policy(RetryPolicy::default())
        .open()
        .context("Failed to open worker")?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Received shutdown signal");
    worker.dispose_and_wait().await;
    client.dispose();

    Ok(())
}

/// Logs the job and completes it, handing its variables back unchanged
async fn echo(client: JobClient, job: Job) -> Result<()> {
    info!(
        "Job {} ({}) from process instance {} at '{}': {}",
        job.key, job.job_type, job.process_instance_key, job.element_id, job.variables
    );

    client
        .new_complete_job_command(job.key)
        .variables(job.variables)
        .send()
        .await
        .with_context(|| format!("Failed to complete job {}", job.key))?;

    Ok(())
}
