// Command flows: resolve the default image directory, build the request the
// chosen subcommand describes, and hand it to the API client. The trace goes
// to `trace_out`, the response body to `body_out`.

use crate::api::{UploadClient, UploadOutcome};
use crate::cli::{Cli, Command};
use crate::error::UploadError;
use crate::json::JsonUploadRequest;
use crate::request::{self, FilePart, UploadRequest, DEFAULT_FILE};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Run the subcommand in `cli` against `api`.
pub fn run(
    api: &UploadClient,
    cli: &Cli,
    trace_out: &mut dyn Write,
    body_out: &mut dyn Write,
) -> Result<UploadOutcome> {
    // Only resolved when a default image is actually needed.
    let default_dir = || base_dir(cli.dir.as_deref());

    let outcome = match &cli.command {
        Command::Batch => {
            let req = UploadRequest::batch(cli.endpoint.as_str(), &default_dir()?);
            api.upload(&req, trace_out).context("batch upload failed")?
        }
        Command::Single { path } => {
            let req = match request::existing_file(path.as_deref()) {
                Some(file) => UploadRequest::new(cli.endpoint.as_str()).part(FilePart::new(file)),
                None => {
                    UploadRequest::single(cli.endpoint.as_str(), &default_dir()?, path.as_deref())
                }
            };
            api.upload(&req, trace_out).context("upload failed")?
        }
        Command::Json { files, fetch } => {
            let files = if files.is_empty() && fetch.is_empty() {
                vec![default_dir()?.join(DEFAULT_FILE)]
            } else {
                files.clone()
            };
            let req =
                JsonUploadRequest::from_sources(cli.endpoint.as_str(), files.as_slice(), fetch)
                    .context("could not prepare JSON upload")?;
            api.upload_json(&req, trace_out).context("JSON upload failed")?
        }
    };

    body_out
        .write_all(&outcome.body)
        .and_then(|_| body_out.flush())
        .map_err(UploadError::Output)?;
    Ok(outcome)
}

/// `--dir` when given, otherwise the executable's own directory. Both are
/// canonicalized.
fn base_dir(dir: Option<&Path>) -> Result<PathBuf> {
    let resolved = match dir {
        Some(dir) => dir
            .canonicalize()
            .with_context(|| format!("could not resolve directory '{}'", dir.display())),
        None => {
            request::current_base_dir().context("could not resolve the executable's directory")
        }
    }?;
    log::debug!("default images are read from {}", resolved.display());
    Ok(resolved)
}

/// Exit status for a failed run: the curl code of the underlying upload
/// error, or 1 when there is none.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|e| e.downcast_ref::<UploadError>())
        .map(UploadError::exit_code)
        .unwrap_or(1)
}
