use clap::Subcommand;
use mindfocus_core::task::TaskPatch;
use mindfocus_core::TaskCategory;

use super::common::{open_context, CliError};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        /// Task title
        title: String,
        /// Category (work, study, personal)
        #[arg(long, default_value = "work")]
        category: String,
        /// Estimated focus sessions
        #[arg(long, default_value = "1")]
        estimate: u32,
    },
    /// List tasks
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Update a task's fields
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Category (work, study, personal)
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        estimate: Option<u32>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Select the task the next focus session counts against
    Select {
        /// Task ID
        id: String,
    },
    /// Clear the active selection
    Deselect,
    /// Mark a task done
    Done {
        /// Task ID
        id: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), CliError> {
    let mut ctx = open_context()?;

    match action {
        TaskAction::Add {
            title,
            category,
            estimate,
        } => {
            let category: TaskCategory = category.parse()?;
            let task = ctx.create_task(&title, category, estimate)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ctx.tasks().tasks())?);
            } else {
                let selected = ctx.tasks().selected_id();
                for task in ctx.tasks().tasks() {
                    let marker = if Some(task.id.as_str()) == selected {
                        "*"
                    } else {
                        " "
                    };
                    let done = if task.completed_at.is_some() {
                        " (done)"
                    } else {
                        ""
                    };
                    println!(
                        "{marker} {}  [{}] {}/{}  {}{done}",
                        task.id,
                        task.category,
                        task.completed_sessions,
                        task.estimated_sessions,
                        task.title,
                    );
                }
            }
        }
        TaskAction::Update {
            id,
            title,
            category,
            estimate,
        } => {
            let category = category.map(|c| c.parse::<TaskCategory>()).transpose()?;
            let task = ctx.update_task(
                &id,
                TaskPatch {
                    title,
                    category,
                    estimated_sessions: estimate,
                },
            )?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::Delete { id } => {
            let task = ctx.delete_task(&id)?;
            println!("deleted {}", task.id);
        }
        TaskAction::Select { id } => {
            ctx.select_task(&id)?;
            println!("selected {id}");
        }
        TaskAction::Deselect => {
            ctx.clear_task_selection()?;
            println!("selection cleared");
        }
        TaskAction::Done { id } => {
            let task = ctx.mark_task_done(&id)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
    }
    Ok(())
}
