//! Dataset - Historical ticket records
//!
//! Loads the labelled training CSV. Column names follow the export format
//! of the task tracker (`taskTitle`, `taskDetails`, ...).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

// ============================================================================
// COLUMNS
// ============================================================================

pub const COL_TITLE: &str = "taskTitle";
pub const COL_DETAILS: &str = "taskDetails";
pub const COL_COMPLETED: &str = "taskCompleted";
pub const COL_TODOS: &str = "taskTodos";
pub const COL_CATEGORY: &str = "category";
pub const COL_ASSIGNEE: &str = "assignedEmployee";

/// Category used when the column is absent, the cell is empty, or the
/// category was never seen during training
pub const UNKNOWN_CATEGORY: &str = "Unknown";

// ============================================================================
// TICKET RECORD
// ============================================================================

/// One historical bug ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub title: String,
    pub details: String,
    pub completed: bool,
    /// Raw comma separated todo list
    pub todos: String,
    pub category: String,
    pub assigned_employee: String,
}

impl TicketRecord {
    /// Number of todo items
    pub fn todo_count(&self) -> usize {
        todo_count(&self.todos)
    }
}

/// Naive comma split count. An empty list still counts as one item.
pub fn todo_count(raw: &str) -> usize {
    raw.split(',').count()
}

/// Parse the completion flag (bool or 0/1)
pub fn parse_completed(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "0.0" | "false" | "no" => Some(false),
        "1" | "1.0" | "true" | "yes" => Some(true),
        _ => None,
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Load ticket records from a CSV file with a header row
pub fn load_csv(path: &Path) -> ModelResult<Vec<TicketRecord>> {
    log::info!("Loading dataset from: {}", path.display());
    let file = File::open(path)?;
    read_records(file)
}

/// Read ticket records from any CSV source
pub fn read_records<R: Read>(source: R) -> ModelResult<Vec<TicketRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let required = |name: &str| column(name).ok_or_else(|| ModelError::MissingColumn(name.to_string()));

    let title_idx = required(COL_TITLE)?;
    let details_idx = required(COL_DETAILS)?;
    let completed_idx = required(COL_COMPLETED)?;
    let todos_idx = required(COL_TODOS)?;
    let assignee_idx = required(COL_ASSIGNEE)?;
    let category_idx = column(COL_CATEGORY);

    if category_idx.is_none() {
        log::warn!("No '{}' column, defaulting every row to {:?}", COL_CATEGORY, UNKNOWN_CATEGORY);
    }

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let raw_completed = cell(completed_idx);
        let completed = parse_completed(&raw_completed).ok_or(ModelError::InvalidValue {
            row,
            column: COL_COMPLETED,
            value: raw_completed.clone(),
        })?;

        let category = category_idx
            .map(cell)
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string());

        records.push(TicketRecord {
            title: cell(title_idx),
            details: cell(details_idx),
            completed,
            todos: cell(todos_idx),
            category,
            assigned_employee: cell(assignee_idx),
        });
    }

    if records.is_empty() {
        return Err(ModelError::EmptyDataset);
    }

    log::info!("Loaded {} ticket records", records.len());
    Ok(records)
}

// ============================================================================
// TESTS
// ============================================================================
