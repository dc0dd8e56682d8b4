// Library root
// -----------
// This crate exposes the pieces the `upload-invoker` binary is built from.
//
// Module responsibilities:
// - `request`: the multipart upload model and default image locations.
// - `json`: the alternative JSON upload body (base64 files, remote URLs).
// - `api`: the blocking HTTP client that sends either kind of request.
// - `trace`: curl-style verbose output of the exchange.
// - `ui`: the subcommand flows tying the above together.
// - `cli`: command-line flags.
// - `error`: the upload error type and its exit codes.
pub mod api;
pub mod cli;
pub mod error;
pub mod json;
pub mod request;
pub mod trace;
pub mod ui;
