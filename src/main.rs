//! Provides the main entry point to the program.
use anyhow::Result;
use clap::Parser;
use wt3::commands::{
    Cli, Commands, DemoSubcommands, handle_demo_list_command, handle_demo_run_command,
    handle_run_command,
};

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            train_dir,
            data_dir,
        } => handle_run_command(&train_dir, &data_dir),
        Commands::Demo { subcommand } => match subcommand {
            DemoSubcommands::List => handle_demo_list_command(),
            DemoSubcommands::Run { name, data_dir } => handle_demo_run_command(&name, &data_dir),
        },
    }
}
