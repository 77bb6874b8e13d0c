//! Example rows for the schema preview and template export.
//!
//! Example values teach the quoting convention: filename cells are bare,
//! every other cell is double-quoted.

use std::io::{self, Write};

use crate::columns::{Column, ColumnSchema};

/// Number of rows in the expanded preview.
pub const EXPANDED_EXAMPLE_ROWS: usize = 3;

/// Wraps a value in double quotes, doubling embedded quotes.
pub fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Formats a cell value according to the column's quoting rule.
pub fn format_cell(column: &Column, value: &str) -> String {
    if column.expects_quotes() {
        quote_field(value)
    } else {
        value.to_string()
    }
}

/// Single example row: `{column}_example` per column.
pub fn example_row(schema: &ColumnSchema) -> Vec<String> {
    schema
        .columns()
        .iter()
        .map(|column| format_cell(column, &format!("{}_example", column.name())))
        .collect()
}

/// Example row `index` (1-based): `{column}_example_{index}` per column.
pub fn numbered_example_row(schema: &ColumnSchema, index: usize) -> Vec<String> {
    schema
        .columns()
        .iter()
        .map(|column| format_cell(column, &format!("{}_example_{index}", column.name())))
        .collect()
}

/// The expanded preview: [`EXPANDED_EXAMPLE_ROWS`] numbered rows.
pub fn expanded_example_rows(schema: &ColumnSchema) -> Vec<Vec<String>> {
    (1..=EXPANDED_EXAMPLE_ROWS)
        .map(|index| numbered_example_row(schema, index))
        .collect()
}

/// Header line: column names, comma-separated.
pub fn render_header(schema: &ColumnSchema) -> String {
    schema.names().join(",")
}

/// Joins already-formatted cells into one CSV line.
pub fn render_row(cells: &[String]) -> String {
    cells.join(",")
}

/// Writes a CSV template: the header followed by `rows` example rows.
///
/// One row uses the single-row example values; more rows are numbered.
pub fn write_template<W: Write>(
    schema: &ColumnSchema,
    rows: usize,
    mut writer: W,
) -> io::Result<()> {
    writeln!(writer, "{}", render_header(schema))?;
    if rows == 1 {
        writeln!(writer, "{}", render_row(&example_row(schema)))?;
    } else {
        for index in 1..=rows {
            writeln!(writer, "{}", render_row(&numbered_example_row(schema, index)))?;
        }
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulk_model::StudyConfig;

    #[test]
    fn test_quote_field_escapes() {
        assert_eq!(quote_field("plain"), "\"plain\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field(""), "\"\"");
    }

    #[test]
    fn test_expanded_rows_are_numbered() {
        let schema = ColumnSchema::derive(&StudyConfig::new(1, vec![]));
        let rows = expanded_example_rows(&schema);
        assert_eq!(rows.len(), EXPANDED_EXAMPLE_ROWS);
        assert_eq!(
            rows[2],
            vec![
                "artifact_1_filename_example_3",
                "\"question_example_3\"",
                "\"description_example_3\""
            ]
        );
    }

    #[test]
    fn test_write_template_header_only() {
        let schema = ColumnSchema::derive(&StudyConfig::new(2, vec![]));
        let mut out = Vec::new();
        write_template(&schema, 0, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "artifact_1_filename,artifact_2_filename,question,description\n"
        );
    }
}
