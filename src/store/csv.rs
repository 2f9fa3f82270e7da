//! Semicolon-delimited CSV export. Writes a snapshot of the collection next
//! to the JSON save file so the data can be opened in a spreadsheet; nothing
//! is ever read back from it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Expense;

/// Export file name, created in the same directory as the save file.
const CSV_FILE_NAME: &str = "expenses.csv";
/// Field separator. Semicolons keep the file friendly to spreadsheets in
/// locales that use the comma as a decimal separator.
const DELIMITER: char = ';';

/// Write the collection as CSV rows into `dir` and return the written path.
/// Column order matches the table screen: id, category, description, amount,
/// date.
pub fn export_csv(dir: &Path, expenses: &[Expense]) -> Result<PathBuf> {
    fs::create_dir_all(dir).context("failed to create export directory")?;

    let mut out = String::new();
    push_row(
        &mut out,
        ["ID", "Category", "Description", "Amount", "Date"].map(String::from),
    );
    for expense in expenses {
        push_row(
            &mut out,
            [
                expense.id.to_string(),
                expense.category.clone(),
                expense.description.clone(),
                format!("{:.2}", expense.amount),
                expense.spent_at.format("%Y-%m-%d").to_string(),
            ],
        );
    }

    let path = dir.join(CSV_FILE_NAME);
    fs::write(&path, out).context("failed to write CSV export")?;
    Ok(path)
}

fn push_row(out: &mut String, fields: [String; 5]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        out.push_str(&quote_field(field));
    }
    out.push('\n');
}

/// Quote a field when it contains the delimiter, a quote, or a line break,
/// doubling embedded quotes the way spreadsheet importers expect.
fn quote_field(field: &str) -> String {
    if field.contains(DELIMITER) || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn export_writes_header_and_semicolon_rows() {
        let dir = tempdir().expect("tempdir");
        let expenses = vec![Expense {
            id: 3,
            description: "Dinner".to_string(),
            category: "Food".to_string(),
            amount: 20.0,
            spent_at: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        }];

        let path = export_csv(dir.path(), &expenses).expect("export");
        let contents = fs::read_to_string(&path).expect("read export");

        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("ID;Category;Description;Amount;Date"));
        assert_eq!(lines.next(), Some("3;Food;Dinner;20.00;2024-01-20"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn fields_containing_the_delimiter_are_quoted() {
        let dir = tempdir().expect("tempdir");
        let expenses = vec![Expense {
            id: 1,
            description: "Taxi; airport".to_string(),
            category: "Travel".to_string(),
            amount: 42.5,
            spent_at: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        }];

        let path = export_csv(dir.path(), &expenses).expect("export");
        let contents = fs::read_to_string(&path).expect("read export");

        assert!(contents.contains("\"Taxi; airport\""));
    }

    #[test]
    fn empty_collection_exports_only_the_header() {
        let dir = tempdir().expect("tempdir");
        let path = export_csv(dir.path(), &[]).expect("export");
        let contents = fs::read_to_string(&path).expect("read export");
        assert_eq!(contents, "ID;Category;Description;Amount;Date\n");
    }
}
