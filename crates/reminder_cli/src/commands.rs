use crate::cli::Command;
use reminder_core::clock::Moment;
use reminder_core::config::Palette;
use reminder_core::error::AppError;
use reminder_core::model::Task;
use reminder_core::reminder::Assistant;
use reminder_core::render::TaskRow;
use reminder_core::task_api::TaskDraft;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::UtcOffset;

#[derive(Debug, Clone)]
pub struct Session {
    pub offset: UtcOffset,
    pub palette: Palette,
    pub json: bool,
}

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&TaskRow> for TableRow {
    fn from(row: &TaskRow) -> Self {
        Self {
            marker: if row.current { ">" } else { "" },
            id: row.id,
            name: row.name.clone(),
            time: row.time.clone(),
            priority: row.priority.clone(),
            status: row.status.label(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    println!("{}", to_json(task)?);
    Ok(())
}

fn print_rows_plain(rows: &[TaskRow], palette: &Palette) {
    if rows.is_empty() {
        println!("{}", palette.mutedize("No tasks."));
        return;
    }

    match rows.iter().find(|row| row.current) {
        Some(current) => println!(
            "{}",
            palette.accentize(&format!("Now: {} at {}", current.name, current.time))
        ),
        None => println!("{}", palette.mutedize("All tasks are done.")),
    }

    let table_rows: Vec<TableRow> = rows.iter().map(TableRow::from).collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

pub fn execute(
    command: Command,
    assistant: &mut Assistant,
    session: &Session,
) -> Result<(), AppError> {
    let now = Moment::now(session.offset);
    match command {
        Command::Add {
            name,
            time,
            priority,
        } => {
            let draft = TaskDraft {
                name,
                time,
                priority,
            };
            let task = assistant.add_task(&draft, now)?;
            if session.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} at {} ({})", task.name, task.time, task.id);
            }
        }
        Command::Done { id } => {
            let task = assistant.toggle_task(id, now)?;
            if session.json {
                print_task_json(&task)?;
            } else if task.completed {
                println!("Completed task: {} ({})", task.name, task.id);
            } else {
                println!("Reopened task: {} ({})", task.name, task.id);
            }
        }
        Command::Delete { id } => {
            let task = assistant.delete_task(id)?;
            if session.json {
                print_task_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.name, task.id);
            }
        }
        Command::List => {
            let rows = assistant.rows(now);
            if session.json {
                println!("{}", to_json(&rows)?);
            } else {
                print_rows_plain(&rows, &session.palette);
            }
        }
        Command::Run { .. } => {
            return Err(AppError::invalid_input("the reminder loop is already running"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::TableRow;
    use reminder_core::render::{DisplayStatus, TaskRow};

    #[test]
    fn table_row_marks_current_task() {
        let row = TaskRow {
            id: 7,
            name: "Standup".into(),
            time: "02:00:00".into(),
            priority: "HIGH".into(),
            status: DisplayStatus::Soon,
            current: true,
        };

        let table_row = TableRow::from(&row);

        assert_eq!(table_row.marker, ">");
        assert_eq!(table_row.status, "soon");
        assert_eq!(table_row.id, 7);
    }
}
