use std::process::ExitCode;

use clap::Parser;
use overunder::adapter::inbound::cli::{self, command::Cli, output};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli::execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            if output::is_json() {
                let code = report.code().map(|code| code.to_string());
                output::error(code.as_deref(), &report.to_string());
            } else {
                eprintln!("{report:?}");
            }
            ExitCode::FAILURE
        }
    }
}
