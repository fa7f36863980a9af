use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;
use serde_json::Value;
use tracing::Level;
use tween_expr::host::{FixedClock, Tick};
use tween_expr::{Engine, Options, CONSTANT_NAMES};

/// Evaluate tween formulas from the command line.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Expressions to evaluate, one result per line.
    #[arg(required_unless_present = "list_constants")]
    exprs: Vec<String>,
    /// Context object as JSON, read by `$`, `$.member` and `$(Type).member`.
    #[arg(long)]
    context: Option<String>,
    /// JSON options file (`max_depth`, `pool_capacity`).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Freeze `$time` (and the fixed/unscaled times) at this many seconds.
    #[arg(long)]
    time: Option<f64>,
    /// Value of `$deltatime` and `$fixeddeltatime` when `--time` is given.
    #[arg(long, default_value_t = 0.0)]
    delta: f64,
    /// Print the builtin constant names and exit.
    #[arg(long)]
    list_constants: bool,
    /// More logging; repeat for trace output.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if args.list_constants {
        println!("{}", CONSTANT_NAMES.iter().sorted().join("\n"));
        return;
    }

    let options = match args.config.as_ref() {
        Some(path) => {
            let text = match std::fs::read_to_string(path) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Cannot read {}: {e}", path.display());
                    std::process::exit(1);
                }
            };
            match Options::from_json(&text) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        None => Options::default(),
    };

    let context: Value = match args.context.as_deref() {
        Some(json) => match serde_json::from_str(json) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Invalid context JSON: {e}");
                std::process::exit(1);
            }
        },
        None => Value::Null,
    };

    let mut engine = Engine::new(options);
    if let Some(t) = args.time {
        engine = engine.with_clock(FixedClock(Tick {
            time: t,
            unscaled_time: t,
            fixed_time: t,
            delta_time: args.delta,
            fixed_delta_time: args.delta,
        }));
    }

    let results: Result<Vec<f64>, _> = args
        .exprs
        .iter()
        .map(|expr| engine.eval(expr, &context))
        .collect();
    match results {
        Ok(values) => println!("{}", values.iter().join("\n")),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
