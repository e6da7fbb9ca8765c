//! Strong Params CLI
//!
//! Single-shot mode:
//!   strong-params <filter-spec> [params-json]
//!
//! `<filter-spec>` is the JSON form of the permit arguments, or `@path` to
//! read it from a file.
//!
//! Server mode (persistent process, reads from stdin):
//!   strong-params --server
//!
//! Protocol (server mode):
//!   Request (stdin):
//!     ["id",{"book":["title"]}]
//!     {"id":"1","book":{"title":"Hamlet","admin":true}}
//!
//!   Response (stdout):
//!     Status:Ok
//!     Length:36
//!
//!     {"id":"1","book":{"title":"Hamlet"}}
//!
//!   Error response:
//!     Status:Error
//!     Length:38
//!
//!     found unpermitted parameters: injected
//!
//! The unpermitted-key action comes from `STRONG_PARAMS_ON_UNPERMITTED`
//! (`false`, `log`, `raise`) or the `STRONG_PARAMS_ENV` default.

use anyhow::{anyhow, Result};
use std::io::{BufRead, Write};
use strong_params::{FilterSpec, Parameters, PermitConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn print_usage() {
    eprintln!("Strong Params - allow-list filtering of request parameters");
    eprintln!();
    eprintln!("Single-shot mode:");
    eprintln!("  strong-params <filter-spec> [params-json]");
    eprintln!();
    eprintln!("Server mode (persistent process):");
    eprintln!("  strong-params --server");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  strong-params '[\"id\",{{\"book\":[\"title\"]}}]' '{{\"id\":\"1\",\"admin\":true}}'");
    eprintln!("  strong-params @spec.json '{{\"id\":\"1\"}}'");
    eprintln!("  strong-params --server");
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (tests, embedding) keeps the existing subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}

fn load_spec(arg: &str) -> Result<FilterSpec> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read filter spec '{}': {}", path, e))?,
        None => arg.to_string(),
    };
    Ok(text.parse()?)
}

fn parse_params(json: &str) -> Result<Parameters> {
    if json.trim().is_empty() {
        return Ok(Parameters::new());
    }
    let body: serde_json::Value =
        serde_json::from_str(json).map_err(|e| anyhow!("Invalid params JSON: {}", e))?;
    Ok(Parameters::from_json(body)?)
}

fn permit_to_json(spec: &FilterSpec, params: &Parameters, config: &PermitConfig) -> Result<String> {
    let permitted = params.permit(spec, config)?;
    Ok(serde_json::to_string(&permitted)?)
}

/// Run in single-shot mode
fn run_single_shot(spec_arg: &str, params_json: Option<&str>, config: &PermitConfig) -> Result<()> {
    let spec = load_spec(spec_arg)?;
    let params = parse_params(params_json.unwrap_or("{}"))?;

    println!("{}", permit_to_json(&spec, &params, config)?);

    Ok(())
}

/// Run in server mode (persistent process, reads requests from stdin)
fn run_server(config: &PermitConfig) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut reader = stdin.lock();

    tracing::info!(action = %config.action_on_unpermitted, "server ready, reading from stdin");

    loop {
        let mut spec_line = String::new();
        let mut params_line = String::new();

        // Read filter spec (line 1)
        let bytes_read = reader.read_line(&mut spec_line)?;
        if bytes_read == 0 {
            // EOF - stdin closed, exit gracefully
            break;
        }

        // Read params JSON (line 2)
        reader.read_line(&mut params_line)?;

        let outcome = load_spec(spec_line.trim()).and_then(|spec| {
            let params = parse_params(params_line.trim())?;
            permit_to_json(&spec, &params, config)
        });

        match outcome {
            Ok(body) => write_response(&mut stdout, true, &body)?,
            Err(e) => write_response(&mut stdout, false, &e.to_string())?,
        }
    }

    tracing::info!("server shutting down");
    Ok(())
}

/// Write response in length-prefixed protocol
fn write_response(stdout: &mut std::io::Stdout, ok: bool, body: &str) -> Result<()> {
    let status = if ok { "Ok" } else { "Error" };
    let length = body.len();

    writeln!(stdout, "Status:{}", status)?;
    writeln!(stdout, "Length:{}", length)?;
    writeln!(stdout)?; // Empty line separator
    write!(stdout, "{}", body)?;
    stdout.flush()?;

    Ok(())
}

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Err(anyhow!("Missing required arguments"));
    }

    let config = PermitConfig::from_env()?;

    // Check for server mode
    if args[1] == "--server" {
        return run_server(&config);
    }

    let spec_arg = &args[1];
    let params_json = args.get(2).map(|s| s.as_str());

    run_single_shot(spec_arg, params_json, &config)
}
