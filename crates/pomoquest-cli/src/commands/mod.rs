pub mod config;
pub mod play;
pub mod shop;
pub mod state;
pub mod task;

use pomoquest_core::{Config, Database, Event, Session};

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk session with the user's configuration.
pub fn open_session() -> Result<(Session<Database>, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    Ok((Session::open(db, &config), config))
}

pub fn print_event(event: &Event) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}
