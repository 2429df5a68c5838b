use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zcalc::app::{App, ReplCommand};
use zcalc::calculator::Locale;
use zcalc::config::Config;

#[derive(Parser)]
#[command(name = "zcalc")]
#[command(version, about = "A keypad calculator for the terminal", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Separator preset, overrides the configuration file
    #[arg(short, long, value_enum)]
    locale: Option<Locale>,

    /// Width of the panel in columns
    #[arg(short, long)]
    width: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read key scripts line by line from stdin (default)
    Repl,

    /// Press the keys of a script and print the result
    Eval {
        /// Keys to press, e.g. "5+3*2=" or "9 sqrt ="
        #[arg(allow_hyphen_values = true)]
        keys: String,

        /// Print a JSON snapshot instead of the panel
        #[arg(long)]
        json: bool,

        /// Copy the final value to the clipboard
        #[arg(long)]
        copy: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(locale) = cli.locale {
        config.format = config.format.with_locale(locale);
    }
    if let Some(width) = cli.width {
        config.ui.width = width;
    }

    let mut app = App::new(&config);

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Repl => run_repl(&mut app),
        Commands::Eval { keys, json, copy } => {
            app.feed(&keys).context("Invalid key script")?;

            if json {
                let snapshot = serde_json::to_string_pretty(&app.snapshot())?;
                println!("{}", snapshot);
            } else {
                println!("{}", app.render());
            }

            if copy {
                let text = app.copy()?;
                tracing::info!(text, "copied result");
            }
            Ok(())
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_repl(app: &mut App) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", app.render());

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let Some(command) = ReplCommand::parse(&line) else {
            continue;
        };

        match command {
            ReplCommand::Quit => break,
            ReplCommand::ToggleHistory => app.toggle_sidebar(),
            ReplCommand::Json => {
                println!("{}", app.calculator().history().to_json()?);
                continue;
            }
            ReplCommand::Copy | ReplCommand::CopyLast => {
                let copied = if command == ReplCommand::Copy {
                    app.copy()
                } else {
                    app.copy_last()
                };
                match copied {
                    Ok(text) => println!("Copied {}", text),
                    Err(err) => eprintln!("{:#}", err),
                }
                continue;
            }
            ReplCommand::Keys(script) => {
                if let Err(err) = app.feed(&script) {
                    eprintln!("{}", err);
                    continue;
                }
            }
            ReplCommand::Unknown(text) => {
                eprintln!("Unknown command: {}", text);
                continue;
            }
        }

        writeln!(stdout, "{}", app.render())?;
        stdout.flush()?;
    }

    Ok(())
}
