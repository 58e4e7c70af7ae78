use clap::Parser;
use jobtrack::cli::commands::Cli;
use jobtrack::cli::handlers;
use jobtrack::logging::{self, LogTarget};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            // No subcommand → launch the board
            if let Err(e) = jobtrack::tui::run(cli.board_dir.as_deref()) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            logging::init(LogTarget::Stderr);
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
