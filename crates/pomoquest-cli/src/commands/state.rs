use clap::Subcommand;
use pomoquest_core::storage::KvStore;
use pomoquest_core::{LevelInfo, PersistedSnapshot, ROSTER};
use serde::Serialize;

use super::{open_session, print_event, CmdResult};

#[derive(Subcommand)]
pub enum StateAction {
    /// Print the saved snapshot
    Show,
    /// Forget the saved session (progress is kept)
    Clear,
}

#[derive(Serialize)]
struct Status<'a> {
    snapshot: &'a PersistedSnapshot,
    level: LevelInfo,
    progress_pct: f64,
    lifetime_experience: u64,
    coins: u64,
    tasks: usize,
    tasks_done: usize,
}

pub fn status() -> CmdResult {
    let (session, _config) = open_session()?;
    let level = session.level_info();
    let status = Status {
        snapshot: session.snapshot(),
        level,
        progress_pct: level.progress_pct(),
        lifetime_experience: session.ledger().lifetime_experience(),
        coins: session.ledger().coins(),
        tasks: session.tasks().len(),
        tasks_done: session.tasks().iter().filter(|t| t.done).count(),
    };
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub fn character(name: Option<String>) -> CmdResult {
    let Some(name) = name else {
        for c in ROSTER {
            println!("{:<8} {}", c.name, c.class);
        }
        return Ok(());
    };
    let (mut session, _config) = open_session()?;
    session.begin();
    print_event(&session.choose_character(&name)?)
}

pub fn mute() -> CmdResult {
    let (mut session, _config) = open_session()?;
    print_event(&session.toggle_mute())
}

pub fn run(action: StateAction) -> CmdResult {
    let (mut session, _config) = open_session()?;

    match action {
        StateAction::Show => {
            match session.store().get(pomoquest_core::storage::SNAPSHOT_KEY)? {
                Some(raw) => println!("{raw}"),
                None => println!("null"),
            }
        }
        StateAction::Clear => {
            print_event(&session.end_session())?;
        }
    }
    Ok(())
}
