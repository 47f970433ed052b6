//! Interactive rendition of the recorder screen.

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};
use std::path::PathBuf;

use crate::config::Config;
use crate::screen::{Screen, ScreenAction};

const QUIT: &str = "Quit";

/// Show the action menu until the user quits. Action failures end the loop
/// and propagate to the caller.
pub fn run_screen(config: &Config, file: Option<PathBuf>) -> Result<()> {
    let mut screen = Screen::create(config, file)?;
    let theme = ColorfulTheme::default();

    println!("Recording file: {}", screen.file_path().display());

    let mut items: Vec<&str> = ScreenAction::ALL.iter().map(|a| a.label()).collect();
    items.push(QUIT);

    loop {
        let prompt = if screen.session().is_active() {
            "Recording"
        } else if screen.session().is_playing() {
            "Playing"
        } else {
            "Idle"
        };

        let selection = Select::with_theme(&theme)
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()?;

        match ScreenAction::ALL.get(selection) {
            Some(action) => screen.dispatch(*action)?,
            None => break,
        }
    }

    Ok(())
}
