use catreg_core::logging;

mod cli;

use crate::cli::CliCommand;

fn main() {
    let destination = logging::init_logging();
    tracing::debug!(%destination, "catreg starting");

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("catreg error: {:#}", err);
        std::process::exit(1);
    }
}
