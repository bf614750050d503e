use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use topo::{Error, OutputFormat, Options};

#[derive(Parser)]
#[command(name = "topo", about = "Summarize D2 network topology files (devices, interfaces, SVIs, links)")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    file: Option<PathBuf>,

    /// Site name used when the file has no header comment
    #[arg(long, short = 'n')]
    name: Option<String>,

    /// Print JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Only print the site summary
    #[arg(long, short = 's')]
    summary: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = read_input(cli.file.as_deref()).unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    });

    let options = Options {
        source: cli.file.as_ref().map(|p| p.to_string_lossy().into_owned()),
        name: cli.name,
        format: if cli.json { OutputFormat::Json } else { OutputFormat::Text },
        summary_only: cli.summary,
    };

    match topo::render_with_options(&input, &options) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String, Error> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(Error::Stdin)?;
            Ok(buf)
        }
    }
}
