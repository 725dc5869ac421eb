//! `unseen` entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_editor::animation::{EXAMPLE_TEXTS, INTRO_TEXTS};
use core_editor::{AnimationTiming, EditorSession};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

use commands::{Command, Toolkit};

const LOG_FILE: &str = "unseen.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "unseen", version, about = "Inspect and craft text at the codepoint level")]
struct Args {
    /// Optional configuration file path (overrides discovery of `unseen.toml`).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,
    /// Seed for every randomized tool (reproducible output).
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
        {
            Ok(_) => {
                self.log_guard = Some(guard);
            }
            Err(_err) => {
                // Global tracing subscriber already installed; drop guard so writer shuts down.
            }
        }

        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

/// Play the typing animation on stdout, redrawing the current line per frame.
async fn play_demo(session: &mut EditorSession, texts: &[&str], timing: AnimationTiming, rng: &mut StdRng) -> Result<()> {
    let mut player = session.start_animation(texts, timing);
    let mut stdout = std::io::stdout();
    while let Some(frame) = session.play_step(&mut player, rng) {
        let shown = frame.text.replace('\n', " \u{21B5} ");
        write!(stdout, "\r\x1b[2K{shown}")?;
        stdout.flush()?;
        tokio::time::sleep(frame.delay).await;
    }
    writeln!(stdout)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut startup = AppStartup::new();
    startup.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config = load_from(args.config.clone())?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(
        target: "runtime.startup",
        config_override = args.config.is_some(),
        seeded = args.seed.is_some(),
        "bootstrap_complete"
    );

    let mut kit = Toolkit::new(config, rng);
    match args.command {
        Command::Demo { examples } => {
            let anim = &kit.config.file.animation;
            let timing = AnimationTiming {
                speed: Duration::from_millis(anim.speed_ms),
                pause_before_delete: Duration::from_millis(anim.pause_before_delete_ms),
                pause_between_items: Duration::from_millis(anim.pause_between_items_ms),
            };
            let texts = if examples { EXAMPLE_TEXTS } else { INTRO_TEXTS };
            let mut session = EditorSession::new("");
            play_demo(&mut session, texts, timing, &mut kit.rng).await?;
        }
        command => {
            let output = commands::run(command, &mut kit)?;
            println!("{output}");
        }
    }

    info!(target: "runtime", "shutdown");
    Ok(())
}
