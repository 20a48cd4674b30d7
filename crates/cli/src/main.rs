use std::process::ExitCode;

use clap::Parser;
use stockpile_cli::{Cli, Config};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env(&cli.global);

    stockpile_observability::init(config.log_format);
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let mut stdout = std::io::stdout().lock();
    match stockpile_cli::run(cli.command, &config, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  {cause}");
            }
            ExitCode::FAILURE
        }
    }
}
