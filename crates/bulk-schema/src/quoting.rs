//! Raw record scanning that remembers which fields were quoted.
//!
//! The `csv` reader drops quoting information, but the import convention
//! depends on it, so the text is scanned a second time here.

/// One field as written in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub value: String,
    /// True when the field started with a double quote.
    pub quoted: bool,
}

/// One record and the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub line: u64,
    pub fields: Vec<RawField>,
}

/// Splits CSV text into records, keeping per-field quoting.
///
/// Quoted fields may contain commas, doubled quotes, and line breaks.
/// Blank lines are skipped, matching the `csv` reader.
pub fn scan_records(text: &str) -> Vec<RawRecord> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut line: u64 = 1;
    let mut record_line: u64 = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if at_field_start => {
                quoted = true;
                in_quotes = true;
                at_field_start = false;
            }
            '"' if in_quotes => {
                // Escaped quote ("")
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            ',' if !in_quotes => {
                fields.push(RawField {
                    value: std::mem::take(&mut current),
                    quoted,
                });
                quoted = false;
                at_field_start = true;
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {}
            // A lone `\r` ends a record too.
            '\n' | '\r' if !in_quotes => {
                let is_blank = fields.is_empty() && current.is_empty() && !quoted;
                if !is_blank {
                    fields.push(RawField {
                        value: std::mem::take(&mut current),
                        quoted,
                    });
                    records.push(RawRecord {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                quoted = false;
                at_field_start = true;
                line += 1;
                record_line = line;
            }
            _ => {
                if c == '\n' || (c == '\r' && chars.peek() != Some(&'\n')) {
                    line += 1;
                }
                current.push(c);
                at_field_start = false;
            }
        }
    }

    if !fields.is_empty() || !current.is_empty() || quoted {
        fields.push(RawField {
            value: current,
            quoted,
        });
        records.push(RawRecord {
            line: record_line,
            fields,
        });
    }
    records
}
