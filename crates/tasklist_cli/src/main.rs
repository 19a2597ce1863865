mod cli;

use clap::Parser;
use cli::{Cli, Command, Format};
use tabled::{Table, Tabled};
use tasklist_core::config::{self, StoreConfig};
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::storage::Encoding;
use tasklist_core::task_api;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Id")]
    id: u64,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Done")]
    done: &'static str,
    #[tabled(rename = "Created at")]
    created_at: String,
    #[tabled(rename = "Completed at")]
    completed_at: String,
}

fn render_table(tasks: &[Task]) -> String {
    let rows: Vec<TaskRow> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| TaskRow {
            // Row number is a display aid only; the stable handle is the id.
            row: index,
            id: task.id,
            message: task.message.clone(),
            done: if task.done { "x" } else { "" },
            created_at: task.created_at.clone(),
            completed_at: task.completed_at.clone().unwrap_or_default(),
        })
        .collect();

    Table::new(rows).to_string()
}

fn print_task_json(task: &Task) {
    let json = serde_json::json!({
        "id": task.id,
        "message": task.message,
        "done": task.done,
        "created_at": task.created_at,
        "completed_at": task.completed_at,
    });
    println!("{}", json);
}

fn print_tasks_json(tasks: &[Task]) {
    let payload: Vec<serde_json::Value> = tasks
        .iter()
        .map(|task| {
            serde_json::json!({
                "id": task.id,
                "message": task.message,
                "done": task.done,
                "created_at": task.created_at,
                "completed_at": task.completed_at,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(payload));
}

fn store_config(cli: &Cli) -> Result<StoreConfig, AppError> {
    let encoding = match cli.format {
        Format::Json => Encoding::Json,
        Format::Records => Encoding::Records {
            delimiter: config::parse_delimiter(&cli.delimiter)?,
        },
    };
    StoreConfig::resolve(cli.store.clone(), encoding)
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let config = store_config(&cli)?;

    match cli.command {
        Command::Add { message } => {
            let message = match message {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("message is required")),
            };

            let task = task_api::add_task(&config, &message)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Added task: {} ({})", task.message, task.id);
            }
        }
        Command::Toggle { id } => {
            let task = task_api::toggle_task(&config, id)?;
            if cli.json {
                print_task_json(&task);
            } else if task.done {
                println!("Completed task: {} ({})", task.message, task.id);
            } else {
                println!("Reopened task: {} ({})", task.message, task.id);
            }
        }
        Command::Delete { id } => {
            let task = task_api::delete_task(&config, id)?;
            if cli.json {
                print_task_json(&task);
            } else {
                println!("Deleted task: {} ({})", task.message, task.id);
            }
        }
        Command::List => {
            let tasks = task_api::list_tasks(&config)?;
            if cli.json {
                print_tasks_json(&tasks);
            } else {
                println!("{}", render_table(&tasks));
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap handles --help and --version itself
            if err.use_stderr() {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(2);
            }
            err.print().ok();
            return;
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
