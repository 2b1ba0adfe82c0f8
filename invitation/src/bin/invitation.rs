use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use engine::HeadlessRunner;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use invitation::branding::log_welcome;
use invitation::script::{ScriptStep, parse_line, parse_script};
use invitation::view::{TracingView, ViewCommand};
use invitation::{Presentation, PresentationConfig, runtime};

#[derive(Debug, Parser)]
#[command(name = "invitation", about = "Drive the invitation slideshow from an input script")]
struct Args {
    /// JSON presentation config; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input script to replay headlessly (stdin when omitted).
    #[arg(long)]
    script: Option<PathBuf>,
    /// Write the snapshot timeline of a headless run as JSON.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Run in real time, reading script lines from stdin as they arrive.
    #[arg(long)]
    live: bool,
    /// Virtual frame length for headless runs, in milliseconds.
    #[arg(long, default_value_t = 10)]
    step_ms: u64,
    /// Include particle spawn/remove commands in the output.
    #[arg(long)]
    show_particles: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PresentationConfig::load(path)?,
        None => PresentationConfig::default(),
    };
    log_welcome(&config.branding);

    if args.live {
        run_live(&config).await
    } else {
        run_headless(&args, &config)
    }
}

fn run_headless(args: &Args, config: &PresentationConfig) -> anyhow::Result<()> {
    let text = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading script from stdin")?;
            text
        }
    };
    let steps = parse_script(&text)?;

    let (mut runner, startup) = HeadlessRunner::new(Presentation::from_config(config));
    print_commands(&startup, args.show_particles)?;

    let frame = Duration::from_millis(args.step_ms);
    for step in steps {
        let commands = match step {
            ScriptStep::Input(input) => runner.send(input),
            ScriptStep::Wait(duration) => runner.advance(duration, frame),
        };
        print_commands(&commands, args.show_particles)?;
    }

    let snapshot = runner.machine().snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if let Some(path) = &args.record {
        runner
            .timeline()
            .save_json_file(path)
            .with_context(|| format!("writing timeline {}", path.display()))?;
        tracing::info!(path = %path.display(), frames = runner.timeline().len(), "timeline saved");
    }
    Ok(())
}

fn print_commands(commands: &[ViewCommand], show_particles: bool) -> anyhow::Result<()> {
    for command in commands {
        let is_particle = matches!(
            command,
            ViewCommand::SpawnParticle(_) | ViewCommand::RemoveParticle { .. }
        );
        if is_particle && !show_particles {
            continue;
        }
        println!("{}", serde_json::to_string(command)?);
    }
    Ok(())
}

async fn run_live(config: &PresentationConfig) -> anyhow::Result<()> {
    let handle = runtime::spawn(Presentation::from_config(config), TracingView, config.frame_interval);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        line_no += 1;
        let steps = match parse_line(&line, line_no) {
            Ok(steps) => steps,
            Err(err) => {
                tracing::warn!(%err, "skipping script line");
                continue;
            }
        };
        for step in steps {
            match step {
                ScriptStep::Input(input) => {
                    if !handle.send(input) {
                        anyhow::bail!("presentation task ended unexpectedly");
                    }
                }
                ScriptStep::Wait(duration) => tokio::time::sleep(duration).await,
            }
        }
    }

    let presentation = handle
        .shutdown()
        .await
        .context("presentation task panicked")?;
    println!("{}", serde_json::to_string_pretty(&presentation.snapshot())?);
    Ok(())
}
