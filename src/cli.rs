use crate::request::DEFAULT_ENDPOINT;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Send multipart image uploads to the local upload server.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Upload endpoint
    #[arg(short = 'e', long = "endpoint", default_value_t = String::from(DEFAULT_ENDPOINT))]
    pub endpoint: String,

    /// Directory holding the default images (defaults to the executable's directory)
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,

    /// Exit with status 22 when the server answers with an HTTP error
    #[arg(short = 'f', long = "fail")]
    pub fail: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload pic1.png, pic2.jpg and pic3.bmp in one request
    Batch,

    /// Upload one file, falling back to pic1.png
    Single {
        /// Image to upload
        path: Option<PathBuf>,
    },

    /// Upload files as base64 and remote URLs as a JSON array
    Json {
        /// Images to embed as base64
        files: Vec<PathBuf>,

        /// Remote image URL for the server to fetch (repeatable)
        #[arg(long = "fetch")]
        fetch: Vec<String>,
    },
}
