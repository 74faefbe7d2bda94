//! Job command handlers
//!
//! One-shot activation and outcome reporting for individual jobs.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use flowgate_client::{Client, JobClient};
use flowgate_core::domain::job::{Job, JobKey};
use flowgate_core::dto::job::ActivateJobsRequest;
use futures::StreamExt;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Activate jobs once and print them
    Activate {
        /// Job type to activate
        #[arg(long = "type")]
        job_type: String,

        /// Maximum number of jobs to activate
        #[arg(long, default_value_t = 10)]
        max: i32,

        /// Worker name reported to the gateway
        #[arg(long, default_value = "flowgate-cli")]
        worker: String,

        /// Lock timeout in milliseconds
        #[arg(long, default_value_t = 60_000)]
        timeout_ms: i64,

        /// Variables to fetch (comma separated)
        #[arg(long, value_delimiter = ',')]
        fetch: Vec<String>,
    },
    /// Complete a job
    Complete {
        /// Job key
        key: JobKey,

        /// Variables as a JSON object
        #[arg(long)]
        variables: Option<String>,
    },
    /// Fail a job
    Fail {
        /// Job key
        key: JobKey,

        /// Retries left after this failure
        #[arg(long)]
        retries: i32,

        /// Failure description
        #[arg(long)]
        message: Option<String>,
    },
    /// Overwrite the retries of a job
    Retries {
        /// Job key
        key: JobKey,

        /// New retries count
        #[arg(long)]
        retries: i32,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = Client::new(config.gateway_url.clone());
    let jobs = client.job_client();

    let result = match command {
        JobCommands::Activate {
            job_type,
            max,
            worker,
            timeout_ms,
            fetch,
        } => {
            let request = ActivateJobsRequest {
                job_type,
                worker,
                timeout: timeout_ms,
                max_jobs_to_activate: max,
                fetch_variable: fetch,
                request_timeout: None,
            };
            activate(&jobs, request).await
        }
        JobCommands::Complete { key, variables } => complete(&jobs, key, variables).await,
        JobCommands::Fail {
            key,
            retries,
            message,
        } => fail(&jobs, key, retries, message).await,
        JobCommands::Retries { key, retries } => update_retries(&jobs, key, retries).await,
    };

    client.dispose();
    result
}

/// Activate jobs once and print every job received
async fn activate(client: &JobClient, request: ActivateJobsRequest) -> Result<()> {
    let job_type = request.job_type.clone();
    let mut batches = client
        .activate_jobs(request)
        .await
        .context("Failed to activate jobs")?;

    let mut count = 0;
    while let Some(batch) = batches.next().await {
        for job in batch.context("Activation stream failed")?.jobs {
            print_job(&job);
            count += 1;
        }
    }

    if count == 0 {
        println!("{}", format!("No '{}' jobs available.", job_type).yellow());
    } else {
        println!("{}", format!("Activated {} job(s).", count).bold());
    }

    Ok(())
}

async fn complete(client: &JobClient, key: JobKey, variables: Option<String>) -> Result<()> {
    let mut command = client.new_complete_job_command(key);
    if let Some(variables) = variables {
        command = command.variables(variables);
    }

    command
        .send()
        .await
        .with_context(|| format!("Failed to complete job {}", key))?;

    println!("{} {}", "Completed job".green(), key);
    Ok(())
}

async fn fail(client: &JobClient, key: JobKey, retries: i32, message: Option<String>) -> Result<()> {
    let mut command = client.new_fail_command(key).retries(retries);
    if let Some(message) = message {
        command = command.error_message(message);
    }

    command
        .send()
        .await
        .with_context(|| format!("Failed to fail job {}", key))?;

    println!(
        "{} {} ({} retries left)",
        "Failed job".red(),
        key,
        retries
    );
    Ok(())
}

async fn update_retries(client: &JobClient, key: JobKey, retries: i32) -> Result<()> {
    client
        .new_update_retries_command(key)
        .retries(retries)
        .send()
        .await
        .with_context(|| format!("Failed to update retries of job {}", key))?;

    println!("{} {} to {}", "Set retries of job".green(), key, retries);
    Ok(())
}

/// Print one activated job
fn print_job(job: &Job) {
    println!("{} {}", "Job".bold(), job.key.to_string().cyan());
    println!("  Type:      {}", job.job_type);
    println!(
        "  Process:   {} v{} (instance {})",
        job.bpmn_process_id, job.process_definition_version, job.process_instance_key
    );
    println!("  Element:   {}", job.element_id);
    println!("  Retries:   {}", job.retries);
    if let Some(deadline) = job.deadline_at() {
        println!("  Deadline:  {}", deadline.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("  Variables: {}", job.variables.dimmed());
    println!();
}
