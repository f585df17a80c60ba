use clap::Parser;
use std::process;

use worktodo::cli;
use worktodo::cli::commands::{Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    let json_output = cli_args.json;
    let actor = cli_args.actor.clone();

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Task(cmd) => cli::task::run(cmd, json_output, actor.as_deref()),
        Commands::Item(cmd) => cli::item::run(cmd, json_output, actor.as_deref()),
        Commands::Log(cmd) => cli::log::run(cmd, json_output, actor.as_deref()),
        Commands::Users => cli::users::run(json_output),
    };

    process::exit(exit_code);
}
