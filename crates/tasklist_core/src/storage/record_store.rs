use crate::error::AppError;
use crate::model::Task;
use crate::store::Store;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const FIELD_COUNT: usize = 5;

/// Serializes the store as one delimited record per line, fields
/// `id, message, created_at, done, completed_at` (last empty when absent).
pub fn encode(store: &Store, delimiter: char) -> Result<String, AppError> {
    let mut content = String::new();
    for task in store.tasks() {
        content.push_str(&encode_record(task, delimiter));
        content.push('\n');
    }
    Ok(content)
}

/// Encodes a single task as one record line (without the trailing newline).
pub fn encode_record(task: &Task, delimiter: char) -> String {
    let completed_at = task.completed_at.as_deref().unwrap_or("");
    format!(
        "{id}{d}{message}{d}{created_at}{d}{done}{d}{completed_at}",
        id = task.id,
        message = escape_field(&task.message, delimiter),
        created_at = task.created_at,
        done = task.done,
        d = delimiter,
    )
}

/// Decodes a record stream. Any malformed record aborts the whole decode
/// naming the offending line; there is no partial recovery.
pub fn decode(content: &str, delimiter: char) -> Result<Store, AppError> {
    let mut tasks = Vec::new();

    for (number, line) in content.lines().enumerate() {
        let line_number = number + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_record(line, delimiter)
            .map_err(|reason| AppError::invalid_data(format!("line {line_number}: {reason}")))?;
        if fields.len() != FIELD_COUNT {
            return Err(AppError::invalid_data(format!(
                "line {line_number}: expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }

        let id = fields[0].parse::<u64>().map_err(|_| {
            AppError::invalid_data(format!("line {line_number}: invalid id '{}'", fields[0]))
        })?;

        parse_timestamp(&fields[2]).map_err(|_| {
            AppError::invalid_data(format!(
                "line {line_number}: invalid created_at '{}'",
                fields[2]
            ))
        })?;

        let done = match fields[3].as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(AppError::invalid_data(format!(
                    "line {line_number}: invalid done '{other}'"
                )));
            }
        };

        let completed_at = if fields[4].is_empty() {
            None
        } else {
            parse_timestamp(&fields[4]).map_err(|_| {
                AppError::invalid_data(format!(
                    "line {line_number}: invalid completed_at '{}'",
                    fields[4]
                ))
            })?;
            Some(fields[4].clone())
        };

        tasks.push(Task {
            id,
            message: fields[1].clone(),
            created_at: fields[2].clone(),
            completed_at,
            done,
        });
    }

    Store::from_tasks(tasks)
}

/// Id of the final record, read by parsing only that record's first field.
/// Used by the append path to assign the next id without a full decode.
pub fn last_record_id(content: &str, delimiter: char) -> Result<Option<u64>, AppError> {
    let Some(line) = content.lines().rev().find(|line| !line.trim().is_empty()) else {
        return Ok(None);
    };

    let mut id_field = String::new();
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            chars.next();
            id_field.push(ch);
        } else if ch == delimiter {
            break;
        } else {
            id_field.push(ch);
        }
    }

    let id = id_field
        .parse::<u64>()
        .map_err(|_| AppError::invalid_data(format!("last record has invalid id '{id_field}'")))?;
    Ok(Some(id))
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339)
}

fn escape_field(raw: &str, delimiter: char) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '\\' {
            escaped.push_str("\\\\");
        } else if ch == delimiter {
            escaped.push('\\');
            escaped.push(ch);
        } else if ch == '\n' {
            escaped.push_str("\\n");
        } else {
            escaped.push(ch);
        }
    }
    escaped
}

fn split_record(line: &str, delimiter: char) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => current.push('\n'),
                Some(escaped) => current.push(escaped),
                None => return Err("record ends with a dangling escape".to_string()),
            }
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);

    Ok(fields)
}
