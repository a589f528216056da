//! The command line interface for the program.
use crate::output::{create_output_directory, get_output_dir, write_results};
use crate::reference::{DEFAULT_DATA_DIRECTORY, ReferenceData};
use crate::settings::Settings;
use crate::train::Train;
use crate::{flowsheet, log};
use ::log::info;
use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use include_dir::{Dir, DirEntry, include_dir};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The directory containing the demo trains.
pub const DEMOS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/demos");

#[derive(Parser)]
#[command(version, about)]
/// The command line interface for the program.
pub struct Cli {
    #[command(subcommand)]
    /// The available commands.
    pub command: Commands,
}

#[derive(Subcommand)]
/// The available commands.
pub enum Commands {
    /// Run a treatment train.
    Run {
        #[arg(help = "Path to the train directory")]
        /// Path to the train directory.
        train_dir: PathBuf,
        #[arg(long, default_value = DEFAULT_DATA_DIRECTORY)]
        /// Path to the reference data directory.
        data_dir: PathBuf,
    },
    /// Manage demo trains.
    Demo {
        #[command(subcommand)]
        /// The available subcommands for managing demo trains.
        subcommand: DemoSubcommands,
    },
}

#[derive(Subcommand)]
/// The available subcommands for managing demo trains.
pub enum DemoSubcommands {
    /// List available demos.
    List,
    /// Run a demo.
    Run {
        /// The name of the demo to run.
        name: String,
        #[arg(long, default_value = DEFAULT_DATA_DIRECTORY)]
        /// Path to the reference data directory.
        data_dir: PathBuf,
    },
}

/// Handle the `run` command.
pub fn handle_run_command(train_dir: &Path, data_dir: &Path) -> Result<()> {
    let settings = Settings::from_path(train_dir)?;

    let output_dir = get_output_dir(train_dir)?;
    ensure!(
        settings.overwrite || !output_dir.is_dir(),
        "Output directory {} already exists (set overwrite = true in settings.toml)",
        output_dir.display()
    );
    create_output_directory(&output_dir).context("Failed to create output directory.")?;

    log::init(settings.log_level.as_deref(), Some(&output_dir))
        .context("Failed to initialize logging.")?;

    let reference =
        ReferenceData::from_path(data_dir).context("Failed to load reference data.")?;
    let train = Train::from_path(train_dir, &reference).context("Failed to load train.")?;
    info!("Train loaded successfully.");

    let results = flowsheet::run(&train, &reference)?;
    write_results(&output_dir, &results).context("Failed to write results.")?;
    info!("Results written to {}", output_dir.display());

    Ok(())
}

/// Handle the `demo run` command.
pub fn handle_demo_run_command(name: &str, data_dir: &Path) -> Result<()> {
    // Find the subdirectory in DEMOS_DIR whose name matches `name`.
    let sub_dir = DEMOS_DIR.get_dir(name).context("Demo not found.")?;

    // Creates temporary directory
    let temp_dir = TempDir::new().context("Failed to create temporary directory.")?;
    // Copies the contents of the subdirectory to the temporary directory
    for entry in sub_dir.entries() {
        match entry {
            DirEntry::File(f) => {
                let file_name = f.path().file_name().unwrap();
                let file_path = temp_dir.path().join(file_name);
                fs::write(&file_path, f.contents())?;
            }
            DirEntry::Dir(_) => {
                return Err(anyhow::anyhow!("Nested directories are not supported."));
            }
        }
    }

    info!("Running demo train: {}", name);
    handle_run_command(temp_dir.path(), data_dir)
}

/// Handle the `demo list` command.
pub fn handle_demo_list_command() -> Result<()> {
    for entry in DEMOS_DIR.dirs() {
        println!("{}", entry.path().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    /// Get the path to the repository root.
    fn get_repo_root() -> PathBuf {
        Path::new(file!()).parent().unwrap().parent().unwrap().to_path_buf()
    }

    /// An integration test for the `run` command on the demo train.
    #[test]
    fn test_handle_run_command() {
        unsafe { std::env::set_var("WT3_LOG_LEVEL", "off") };
        let train_dir = get_repo_root().join("demos").join("brackish");
        let data_dir = get_repo_root().join("data");
        handle_run_command(&train_dir, &data_dir).unwrap();
    }

    /// An integration test for the `run` command with a missing data directory.
    #[test]
    fn test_handle_run_command_bad_data_dir() {
        unsafe { std::env::set_var("WT3_LOG_LEVEL", "off") };
        let train_dir = get_repo_root().join("demos").join("brackish");
        let data_dir = get_repo_root().join("no_such_dir");
        assert_eq!(
            handle_run_command(&train_dir, &data_dir)
                .unwrap_err()
                .chain()
                .next()
                .unwrap()
                .to_string(),
            "Failed to load reference data."
        );
    }
}
