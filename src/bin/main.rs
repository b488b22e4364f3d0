use volley::*;

use anyhow::Context;
use clap::Parser;
use volley::model::{RunConfig, RunOptions};
use volley::progress::Progress;

#[derive(Parser, Debug)]
#[command(author, version, about = "Threaded HTTP load generator for local testing", long_about = None)]
struct Args {
    /// Host to connect to
    #[arg(long, default_value = "127.0.0.1")]
    target: String,

    /// TCP port of the server
    #[arg(long, default_value_t = 8000, allow_negative_numbers = true)]
    port: i64,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
    threads: i64,

    /// Run time in seconds (use 0 to run until Ctrl+C)
    #[arg(short, long, default_value_t = 5.0, allow_negative_numbers = true)]
    duration: f64,

    /// Delay between requests inside a worker (seconds)
    #[arg(short, long, default_value_t = 0.003, allow_negative_numbers = true)]
    sleep: f64,

    /// Request path
    #[arg(long, default_value = "/")]
    path: String,

    /// How long to wait for each worker to stop (seconds)
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    grace: f64,

    /// Connect timeout (seconds)
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    connect_timeout: f64,

    /// Bound on the response drain read (seconds)
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    read_timeout: f64,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Hide the live spinner
    #[arg(long)]
    no_progress: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        Self {
            host: args.target,
            port: args.port,
            threads: args.threads,
            duration: args.duration,
            sleep: args.sleep,
            path: args.path,
            grace: args.grace,
            connect_timeout: args.connect_timeout,
            read_timeout: args.read_timeout,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let (json, no_progress) = (args.json, args.no_progress);

    // Rejected here, before the runtime or any worker exists.
    let config = RunConfig::try_from(RunOptions::from(args))?;

    let mut progress = if no_progress {
        Progress::hidden()
    } else {
        Progress::spinner()
    };
    if json {
        progress = progress.with_milestones_to_stderr();
    }

    telemetry::init_tracing();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let summary = runtime.block_on(coordinator::run(
        config,
        progress,
        telemetry::interrupt_signal(),
    ));

    if json {
        println!("{}", report::render_json(&summary)?);
    } else {
        println!("{}", report::render_text(&summary));
    }

    // Stragglers are detached; do not wait on them any further.
    runtime.shutdown_background();
    Ok(())
}
