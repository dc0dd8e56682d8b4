// Entrypoint for the upload CLI.
// - Keeps `main` small: parse flags, build the API client, run the command.
// - The trace goes to stderr and the server's response body to stdout.

use clap::Parser;
use env_logger::Env;
use std::io;
use std::process::ExitCode;
use upload_invoker::{api::UploadClient, cli::Cli, ui};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let res = UploadClient::new()
        .map(|api| api.fail_on_error(cli.fail))
        .map_err(anyhow::Error::from)
        .and_then(|api| ui::run(&api, &cli, &mut io::stderr(), &mut io::stdout()));

    match res {
        Ok(outcome) => {
            log::info!("server answered {}", outcome.status);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = ui::exit_code(&err);
            eprintln!("upload-invoker: ({}) {:#}", code, err);
            ExitCode::from(code)
        }
    }
}
