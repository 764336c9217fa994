//! Command-line interface for tsx-refresh
//!
//! Usage:
//!   tsx-refresh                      - transform the built-in demo component
//!   tsx-refresh `<path>`             - transform a file (`-` reads stdin)
//!   tsx-refresh --list-passes        - list the registered passes

use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::prelude::*;

use tsx_refresh::error::ConfigError;
use tsx_refresh::passes::{PassParams, RunId};
use tsx_refresh::pipeline::{Orchestrator, Request, TerminalSink};
use tsx_refresh::settings::{Loader, PassSettings, Settings};

const DEMO_SOURCE: &str = include_str!("../../demos/demo.tsx");

#[derive(Parser)]
#[command(name = "tsx-refresh", version)]
#[command(about = "Transform TSX into highlighted CommonJS or ES module code")]
struct Args {
    /// Source file to transform (`-` for stdin, omit for the built-in demo)
    path: Option<String>,

    /// Settings file layered over the built-in defaults
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Output module format (commonjs, esmodule)
    #[arg(long)]
    module: Option<String>,

    /// Source syntax (typescript, ecmascript)
    #[arg(long)]
    syntax: Option<String>,

    /// Disable JSX parsing
    #[arg(long)]
    no_markup: bool,

    /// Pass to run; repeat to run several in order. Replaces the configured list.
    #[arg(long = "pass", value_name = "NAME")]
    passes: Vec<String>,

    /// Fixed run id instead of the current time
    #[arg(long)]
    run_id: Option<String>,

    /// Environment name seen by passes (defaults to $NODE_ENV)
    #[arg(long)]
    env: Option<String>,

    /// Inline runtime helpers instead of requiring them
    #[arg(long)]
    inline_helpers: bool,

    /// Print the generated code without highlighting
    #[arg(long)]
    no_color: bool,

    /// List registered passes and exit
    #[arg(long)]
    list_passes: bool,

    /// Log pipeline progress to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let orchestrator = Orchestrator::default();

    if args.list_passes {
        println!("Available passes:\n");
        for (name, description) in orchestrator.registry().list() {
            println!("  {}", name);
            println!("    {}", description);
            println!();
        }
        return;
    }

    let settings = load_settings(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let (name, text) = read_source(args.path.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: failed to read source: {}", e);
        process::exit(1);
    });

    let mut request = Request::new(name, text, settings);
    if let Some(run_id) = args.run_id {
        request = request.with_run_id(RunId::new(run_id));
    }

    let mut sink = TerminalSink;
    if orchestrator.run(request, &mut sink).await.is_err() {
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_settings(args: &Args) -> Result<Settings, ConfigError> {
    let mut loader = Loader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    if let Some(module) = &args.module {
        loader = loader.set_override("module.type", module.as_str())?;
    }
    if let Some(syntax) = &args.syntax {
        loader = loader.set_override("parser.syntax", syntax.as_str())?;
    }
    if let Some(env) = &args.env {
        loader = loader.set_override("transform.env", env.as_str())?;
    }
    if args.inline_helpers {
        loader = loader.set_override("transform.external_helpers", false)?;
    }
    if args.no_color {
        loader = loader.set_override("highlight.enabled", false)?;
    }

    let mut settings = loader.build()?;
    if args.no_markup {
        settings.parser.markup = Some(false);
        settings.parser.jsx = None;
        settings.parser.tsx = None;
    }
    if !args.passes.is_empty() {
        settings.passes = args
            .passes
            .iter()
            .map(|name| PassSettings {
                name: name.clone(),
                // a pass named on the command line keeps its configured options
                options: configured_options(&settings, name),
            })
            .collect();
    }
    Ok(settings)
}

fn configured_options(settings: &Settings, name: &str) -> PassParams {
    settings
        .passes
        .iter()
        .find(|pass| pass.name == name)
        .map(|pass| pass.options.clone())
        .unwrap_or_default()
}

fn read_source(path: Option<&str>) -> io::Result<(String, String)> {
    match path {
        None => Ok(("<demo>".to_string(), DEMO_SOURCE.to_string())),
        Some("-") => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(("<stdin>".to_string(), text))
        }
        Some(path) => Ok((path.to_string(), std::fs::read_to_string(path)?)),
    }
}
