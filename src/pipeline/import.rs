//! Batch import of candidate rows. Real-world export files arrive in several
//! shapes: a JSON array, a JSON object wrapping an array under a conventional
//! key, a single Indeed application object, newline-delimited JSON, or a
//! header-row CSV with loosely named columns. Mislabeled PDFs are rejected
//! with a dedicated message instead of a generic parse error.

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};

use crate::models::{Appointment, Source};
use crate::util::from_ddmmyyyy;

pub struct ImportOutcome {
    pub count: usize,
}

/// One normalized row, before candidate construction.
#[derive(Debug)]
pub(crate) struct ImportRow {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: Source,
    pub calls: u8,
    pub appointment: Option<Appointment>,
}

/// Keys that conventionally wrap the row array in exported JSON objects.
const WRAPPER_KEYS: [&str; 6] = ["rows", "data", "items", "leads", "candidates", "results"];

pub(crate) fn parse(content: &str) -> Result<Vec<ImportRow>> {
    let trimmed = content.trim_start();
    if trimmed.starts_with("%PDF") {
        bail!("this file is a PDF, not JSON or CSV; export the raw data instead");
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return rows_from_json(value);
    }

    // Newline-delimited JSON: one object per line, unparseable lines dropped.
    let ndjson: Vec<ImportRow> = trimmed
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
        .filter_map(|value| value.as_object().and_then(row_from_object))
        .collect();
    if !ndjson.is_empty() {
        return Ok(ndjson);
    }

    parse_csv(trimmed)
}

fn rows_from_json(value: Value) -> Result<Vec<ImportRow>> {
    match value {
        Value::Array(items) => Ok(items
            .iter()
            .filter_map(|item| item.as_object().and_then(row_from_object))
            .collect()),
        Value::Object(map) => {
            // Indeed export: a single application under "applicant".
            if let Some(applicant) = map.get("applicant").and_then(Value::as_object) {
                return Ok(row_from_object(applicant).into_iter().collect());
            }
            for key in WRAPPER_KEYS {
                if let Some(items) = map.get(key).and_then(Value::as_array) {
                    return Ok(items
                        .iter()
                        .filter_map(|item| item.as_object().and_then(row_from_object))
                        .collect());
                }
            }
            // The object may itself be a single row.
            match row_from_object(&map) {
                Some(row) => Ok(vec![row]),
                None => bail!("could not find candidate rows in the JSON document"),
            }
        }
        _ => bail!("could not parse file: expected an array or object of rows"),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Pull a logical field out of a row object by substring-matching key names.
fn field(map: &Map<String, Value>, patterns: &[&str]) -> Option<String> {
    for (key, value) in map {
        let lowered = key.to_lowercase();
        if patterns.iter().any(|p| lowered.contains(p)) {
            let text = value_to_string(value);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    from_ddmmyyyy(raw).or_else(|| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
}

fn row_from_object(map: &Map<String, Value>) -> Option<ImportRow> {
    let name = field(map, &["name"]).unwrap_or_default();
    let email = field(map, &["mail"]).unwrap_or_default();
    let phone = field(map, &["phone", "mobile"]).unwrap_or_default();
    if name.is_empty() && email.is_empty() && phone.is_empty() {
        return None;
    }

    let calls = field(map, &["call"])
        .and_then(|raw| raw.parse::<u8>().ok())
        .unwrap_or(0);
    let source = field(map, &["source"])
        .map(|raw| Source::parse(&raw))
        .unwrap_or(Source::Other);

    // Missing appointment halves default to "now".
    let now = Local::now();
    let date = field(map, &["date"])
        .and_then(|raw| parse_date(&raw))
        .unwrap_or_else(|| now.date_naive());
    let time = field(map, &["time"]).unwrap_or_else(|| now.format("%H:%M").to_string());

    Some(ImportRow {
        name,
        phone,
        email,
        source,
        calls,
        appointment: Some(Appointment {
            date: Some(date),
            time: Some(time),
        }),
    })
}

/// Split one CSV line honoring double-quoted fields with `""` escapes.
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current = String::new();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn parse_csv(content: &str) -> Result<Vec<ImportRow>> {
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let header = match lines.next() {
        Some(line) => split_csv_line(line),
        None => bail!("could not parse file: it is empty"),
    };

    let recognized = header.iter().any(|column| {
        let lowered = column.to_lowercase();
        ["name", "mail", "phone", "mobile"]
            .iter()
            .any(|p| lowered.contains(p))
    });
    if !recognized {
        bail!("could not parse file as JSON or CSV");
    }

    let rows = lines
        .map(|line| {
            let values = split_csv_line(line);
            let mut map = Map::new();
            for (column, value) in header.iter().zip(values) {
                map.insert(column.clone(), Value::String(value));
            }
            map
        })
        .filter_map(|map| row_from_object(&map))
        .collect();
    Ok(rows)
}
