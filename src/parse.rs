// src/parse.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Field separator used by `out.csv`. Quoting and escaping are not supported,
/// so a field that contains the delimiter is split.
pub const DELIM: char = ';';

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n").expect("line break pattern should parse"));

pub type Row = Vec<String>;

/// Parsed rows of a delimited document. Row 0 is the header; row lengths are
/// not checked against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Every row after the header.
    pub fn data_rows(&self) -> &[Row] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

/// Whitespace as ECMAScript `trim` sees it: Unicode White_Space minus NEL,
/// plus the byte-order mark.
fn is_trim_space(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Trim the whole document, split it on `\n` / `\r\n`, then split each line
/// on [`DELIM`]. Empty input yields a single row holding one empty field.
pub fn parse_csv(text: &str) -> Table {
    let trimmed = text.trim_matches(is_trim_space);
    let rows = LINE_BREAK
        .split(trimmed)
        .map(|line| line.split(DELIM).map(str::to_string).collect())
        .collect();
    Table { rows }
}
