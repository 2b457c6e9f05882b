// src/pipeline/validate.rs

//! Response validation and status interpretation.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{HomeworkRecord, HomeworkStatus};

/// Check the API answer and extract its homework records.
///
/// An empty list is valid and means nothing changed.
pub fn check_response(response: &Value) -> Result<Vec<HomeworkRecord>> {
    let Some(map) = response.as_object() else {
        return Err(AppError::response_type(format!(
            "expected a JSON object, got {}",
            json_type(response)
        )));
    };
    if !map.contains_key("homeworks") || !map.contains_key("current_date") {
        return Err(AppError::response_key(
            "response must contain both \"homeworks\" and \"current_date\"",
        ));
    }
    let Some(homeworks) = map.get("homeworks").and_then(Value::as_array) else {
        return Err(AppError::response_key(format!(
            "\"homeworks\" is not a list. response = {response}"
        )));
    };

    homeworks.iter().map(parse_record).collect()
}

/// Read `current_date` as Unix seconds, if present and integer-like.
pub fn current_date(response: &Value) -> Option<i64> {
    match response.get("current_date")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Build the chat message for a homework record.
pub fn parse_status(homework: &HomeworkRecord) -> Result<String> {
    let name = homework
        .homework_name
        .as_deref()
        .ok_or_else(|| AppError::response_key("homework record has no \"homework_name\""))?;
    let status: HomeworkStatus = homework
        .status
        .as_deref()
        .ok_or_else(|| AppError::homework_status("<missing>"))?
        .parse()?;

    Ok(format!(
        "Изменился статус проверки работы \"{name}\". {}",
        status.verdict()
    ))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn parse_record(value: &Value) -> Result<HomeworkRecord> {
    if !value.is_object() {
        return Err(AppError::response_type(format!(
            "homework record must be an object, got {}",
            json_type(value)
        )));
    }
    Ok(HomeworkRecord::deserialize(value)?)
}
