//! Shared output formatting for query commands.

use std::collections::HashMap;

use fieldindex_core::document::Document;
use fieldindex_core::index::QueryResult;
use serde::Serialize;

/// Formatted result row for JSON output.
#[derive(Debug, Serialize)]
pub struct ResultOutput {
    pub id: String,
    pub identifier: Option<String>,
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
}

/// Complete JSON payload of a search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    results: Vec<ResultOutput>,
    total_count: usize,
}

fn result_row(id: &str, documents: &HashMap<String, Document>) -> ResultOutput {
    let doc = documents.get(id);
    ResultOutput {
        id: id.to_string(),
        identifier: doc.and_then(|d| d.identifier().map(str::to_string)),
        category: doc.map(|d| d.category.clone()),
        short_description: doc.and_then(|d| d.short_description().map(str::to_string)),
    }
}

/// Print query results as a table.
pub fn print_results_table(result: &QueryResult, documents: &HashMap<String, Document>) {
    if result.ids.is_empty() {
        println!("(no results found)");
        return;
    }

    let rows: Vec<ResultOutput> =
        result.ids.iter().map(|id| result_row(id, documents)).collect();

    // Calculate column widths
    let id_width = rows.iter().map(|r| r.id.len()).max().unwrap_or(2).clamp(2, 36);
    let identifier_width = rows
        .iter()
        .map(|r| r.identifier.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(10)
        .clamp(10, 30);
    let category_width = rows
        .iter()
        .map(|r| r.category.as_deref().unwrap_or("-").len())
        .max()
        .unwrap_or(8)
        .clamp(8, 20);

    // Header
    println!(
        "{:<id_width$}  {:<identifier_width$}  {:<category_width$}  DESCRIPTION",
        "ID",
        "IDENTIFIER",
        "CATEGORY",
        id_width = id_width,
        identifier_width = identifier_width,
        category_width = category_width,
    );
    println!(
        "{:-<id_width$}  {:-<identifier_width$}  {:-<category_width$}  {:-<20}",
        "",
        "",
        "",
        "",
        id_width = id_width,
        identifier_width = identifier_width,
        category_width = category_width,
    );

    // Rows
    for row in &rows {
        let id = truncate(&row.id, id_width);
        let identifier = truncate(row.identifier.as_deref().unwrap_or("-"), identifier_width);
        let category = truncate(row.category.as_deref().unwrap_or("-"), category_width);
        let description = row.short_description.as_deref().unwrap_or("");

        println!(
            "{:<id_width$}  {:<identifier_width$}  {:<category_width$}  {}",
            id,
            identifier,
            category,
            description,
            id_width = id_width,
            identifier_width = identifier_width,
            category_width = category_width,
        );
    }

    println!();
    println!("-- {} of {} results --", result.ids.len(), result.total_count);
}

/// Print query results as JSON.
pub fn print_results_json(result: &QueryResult, documents: &HashMap<String, Document>) {
    let output = SearchOutput {
        results: result.ids.iter().map(|id| result_row(id, documents)).collect(),
        total_count: result.total_count,
    };
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}

/// Print query results as ids only (quiet mode).
pub fn print_results_quiet(result: &QueryResult) {
    for id in &result.ids {
        println!("{}", id);
    }
}

/// Truncate string with ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        format!("{}...", &s[..max_len - 3])
    } else {
        s[..max_len].to_string()
    }
}
