use clap::Parser;
use lumen::{Error, Object, Value};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Evaluates a lumen document and prints the resulting tree as JSON
#[derive(Parser)]
#[command(name = "lumen", version, long_about = None)]
struct Cli {
    /// Document to evaluate
    path: PathBuf,

    /// Predefined binding (KEY=VALUE), visible to the document
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,

    /// Only report errors
    #[arg(long, conflicts_with = "pretty")]
    quiet: bool,
}

fn bindings(defines: &[String]) -> Result<Object, Error> {
    defines.iter().try_fold(Object::new(), |bindings, define| {
        lumen::parse(define, "<define>", bindings)
    })
}

fn run(cli: &Cli) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let tree = lumen::parse_file(&cli.path, bindings(&cli.defines)?)?;

    tracing::info!(path = %cli.path.display(), keys = tree.len(), "evaluated");

    if cli.quiet {
        return Ok(None);
    }

    let tree = Value::from(tree);

    let json = if cli.pretty {
        serde_json::to_string_pretty(&tree)?
    } else {
        serde_json::to_string(&tree)?
    };

    Ok(Some(json))
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(Some(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
