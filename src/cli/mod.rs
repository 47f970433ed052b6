pub mod args;
pub mod record;
pub mod screen;

pub use args::{Cli, CliCommand, RecordCliArgs};
pub use record::{handle_path_command, handle_play_command, handle_record_command};
pub use screen::run_screen;
