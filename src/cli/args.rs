use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audio-sensor")]
#[command(about = "Record the microphone to a file and play it back", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Record to and play from this file instead of the private data directory
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Record for a fixed time, then stop
    Record(RecordCliArgs),
    /// Play the recording and wait until it ends
    Play,
    /// Print the recording file path
    Path,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct RecordCliArgs {
    /// How long to record, in seconds
    #[arg(short, long, default_value = "5")]
    pub seconds: u64,
}
