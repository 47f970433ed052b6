use anyhow::Result;
use audio_sensor::{
    cli::{
        handle_path_command, handle_play_command, handle_record_command, run_screen, Cli,
        CliCommand,
    },
    config::Config,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("audio-sensor {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Record(args)) => handle_record_command(&Config::load()?, cli.file, args),
        Some(CliCommand::Play) => handle_play_command(&Config::load()?, cli.file),
        Some(CliCommand::Path) => handle_path_command(&Config::load()?, cli.file),
        None => run_screen(&Config::load()?, cli.file),
    }
}
