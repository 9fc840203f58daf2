//! # classbridge-cli
//!
//! Loads a fixture host, then executes JSON requests against it.
//!
//! ```bash
//! # One request
//! classbridge --fixture host.json --request '{"operation": "ping"}'
//!
//! # One request per stdin line, one response per stdout line
//! classbridge --fixture host.json --config bridge.json < requests.jsonl
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use classbridge::{Bridge, BridgeConfig, ConfigError, Host, Response};
use classbridge_host::{HostError, InMemoryHost};
use classbridge_serde::JsonCodec;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load fixture: {0}")]
    Host(#[from] HostError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to encode response: {0}")]
    Encode(#[from] classbridge_serde::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Resolved command-line options.
#[derive(Clone, Debug, Default)]
pub struct Options {
    pub fixture: PathBuf,
    pub config: Option<PathBuf>,
    pub request: Option<String>,
}

pub fn run(options: &Options) -> Result<(), CliError> {
    let config = match &options.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    let host = InMemoryHost::load_fixture(&options.fixture)?;
    let mut bridge = Bridge::new(host, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &options.request {
        Some(text) => write_response(&mut out, &bridge.execute_str(text)),
        None => {
            let handled = serve(&mut bridge, io::stdin().lock(), &mut out)?;
            info!(requests = handled, "input closed");
            Ok(())
        }
    }
}

/// Answer every non-blank input line with exactly one output line.
///
/// Returns how many requests were handled.
pub fn serve<H: Host, R: BufRead, W: Write>(
    bridge: &mut Bridge<H>,
    input: R,
    out: &mut W,
) -> Result<usize, CliError> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = bridge.execute_str(&line);
        debug!(success = response.success(), "answered request");
        write_response(out, &response)?;
        handled += 1;
    }
    Ok(handled)
}

fn write_response<W: Write>(out: &mut W, response: &Response) -> Result<(), CliError> {
    let line = JsonCodec.encode_string(response.as_value())?;
    writeln!(out, "{}", line)?;
    out.flush()?;
    Ok(())
}
