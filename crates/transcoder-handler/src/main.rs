use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use transcoder_handler::{FsObjectStore, HandlerConfig, Orchestrator};

#[derive(Parser)]
#[command(name = "transcoder-handler")]
#[command(about = "Transcode one uploaded image described by a storage trigger event")]
#[command(long_about = "\
Transcode one uploaded image described by a storage trigger event

Reads the event JSON, fetches <store-root>/<bucket>/<key>, normalizes it to a
256x256 JPEG, PNG or WebP and writes it under the processed prefix. Prints the
response JSON and exits 0 on success, 1 on a failed request, 2 on bad
configuration or unreadable input.

Environment:
  PROCESSED_PREFIX       output key prefix (default: processed/)
  MAX_INPUT_SIZE_BYTES   largest accepted object (default: 52428800)
  DEFAULT_OUTPUT_FORMAT  jpeg, png or webp (default: jpeg)
  RUST_LOG               log filter (default: info)")]
#[command(version)]
struct Cli {
    /// Event JSON file, or - for stdin
    #[arg(long, default_value = "-")]
    event: String,

    /// Directory holding one subdirectory per bucket
    #[arg(long, default_value = ".")]
    store_root: PathBuf,
}

fn read_event(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(source)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match HandlerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    let raw = match read_event(&cli.event) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("cannot read event from {}: {e}", cli.event);
            return ExitCode::from(2);
        }
    };

    let orchestrator = Orchestrator::new(FsObjectStore::new(cli.store_root), config);
    let response = orchestrator.handle_str(&raw);

    match serde_json::to_string(&response) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("cannot serialize response: {e}");
            return ExitCode::FAILURE;
        }
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
