//! Headless commands: record for a while, play to the end, show the path.

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::screen::Screen;

use super::args::RecordCliArgs;

pub fn handle_record_command(
    config: &Config,
    file: Option<PathBuf>,
    args: RecordCliArgs,
) -> Result<()> {
    let mut screen = Screen::create(config, file)?;

    screen.on_start_action()?;
    info!("Recording for {} second(s)", args.seconds);
    std::thread::sleep(Duration::from_secs(args.seconds));
    screen.on_stop_action();

    println!("{}", screen.file_path().display());
    Ok(())
}

pub fn handle_play_command(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let mut screen = Screen::create(config, file)?;

    screen.on_playback_action()?;
    screen.wait_for_playback();
    Ok(())
}

pub fn handle_path_command(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let screen = Screen::create(config, file)?;
    println!("{}", screen.file_path().display());
    Ok(())
}
