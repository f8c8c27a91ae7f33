// src/render.rs

use crate::parse::Table;

/// Presentational category of a data cell, picked from its column header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnCategory {
    Numeric,
    Languages,
    Activity,
    User,
    Plain,
}

impl ColumnCategory {
    /// Exact, case-sensitive match on the header name.
    pub fn for_column(name: &str) -> Self {
        match name {
            "Repos" | "Followers" | "Forks" => ColumnCategory::Numeric,
            "Languages" => ColumnCategory::Languages,
            "Activity" => ColumnCategory::Activity,
            "User" => ColumnCategory::User,
            _ => ColumnCategory::Plain,
        }
    }

    /// Class attribute value used by the HTML surface.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            ColumnCategory::Numeric => Some("num"),
            ColumnCategory::Languages => Some("languages"),
            ColumnCategory::Activity => Some("activity"),
            ColumnCategory::User => Some("user"),
            ColumnCategory::Plain => None,
        }
    }
}

/// Resolves a data cell's category by its index into the header.
#[derive(Clone, Copy, Debug)]
pub struct CategoryLookup<'a> {
    header: &'a [String],
}

impl<'a> CategoryLookup<'a> {
    pub fn new(header: &'a [String]) -> Self {
        Self { header }
    }

    /// Indices past the end of the header have no category.
    pub fn category(&self, index: usize) -> ColumnCategory {
        self.header
            .get(index)
            .map_or(ColumnCategory::Plain, |name| ColumnCategory::for_column(name))
    }
}

/// A table with a header section and a body section.
pub trait DisplaySurface {
    /// Drop every header and body row.
    fn clear(&mut self);

    fn set_header_cells(&mut self, fields: &[String]);

    fn append_data_row(&mut self, fields: &[String], lookup: &CategoryLookup<'_>);
}

/// Replace whatever `surface` shows with `table`. An empty table leaves both
/// sections empty.
pub fn build_table<S: DisplaySurface + ?Sized>(table: &Table, surface: &mut S) {
    surface.clear();

    let Some(header) = table.header() else {
        return;
    };
    surface.set_header_cells(header);

    let lookup = CategoryLookup::new(header);
    for row in table.data_rows() {
        surface.append_data_row(row, &lookup);
    }
}
