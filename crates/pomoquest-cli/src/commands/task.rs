use clap::Subcommand;
use pomoquest_core::{Event, TaskKey};

use super::{open_session, print_event, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task title
        title: String,
    },
    /// List tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a task
    Edit {
        /// Task ID
        id: u64,
        /// New title
        title: String,
    },
    /// Check or uncheck a task (first check pays the reward)
    Done {
        /// Task ID
        id: u64,
    },
    /// Delete a task
    Remove {
        /// Task ID
        id: u64,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let (mut session, _config) = open_session()?;

    match action {
        TaskAction::Add { title } => {
            let key = session.add_task(&title)?;
            println!("Task created: {key}");
        }
        TaskAction::List { json } => {
            if json {
                let tasks: Vec<_> = session.tasks().iter().collect();
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if session.tasks().is_empty() {
                println!("No tasks.");
            } else {
                for task in session.tasks().iter() {
                    let mark = if task.done { "x" } else { " " };
                    println!("[{mark}] {:>3}  {}", task.key, task.title);
                }
            }
        }
        TaskAction::Edit { id, title } => {
            session.edit_task(TaskKey(id), &title)?;
            println!("ok");
        }
        TaskAction::Done { id } => match session.toggle_task(TaskKey(id))? {
            Some(event) => {
                print_event(&event)?;
                if let Event::TaskRewarded { levels_gained, .. } = event {
                    if levels_gained > 0 {
                        eprintln!("Level up! Now level {}", session.level_info().level);
                    }
                }
            }
            None => {
                let done = session.tasks().get(TaskKey(id)).is_some_and(|t| t.done);
                println!("{}", if done { "checked" } else { "unchecked" });
            }
        },
        TaskAction::Remove { id } => {
            session.remove_task(TaskKey(id))?;
            println!("ok");
        }
    }
    Ok(())
}
