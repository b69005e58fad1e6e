use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI (it sets up its own file logging)
        None => taskboard::tui::run(cli.board_dir.as_deref()),
        Some(command) => {
            taskboard::logging::init_stderr();
            handlers::dispatch(command, cli.json, cli.board_dir.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
