// src/html.rs

use anyhow::{Context, Result};
use std::{borrow::Cow, fmt, fs, path::Path};

use crate::loader::StatusLine;
use crate::render::{CategoryLookup, DisplaySurface};

pub const TABLE_ID: &str = "stats-table";
pub const STATUS_ID: &str = "status";

const INITIAL_STATUS: &str = "Loading data...";

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 0.3rem 0.6rem; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
td.user { font-weight: bold; }
td.languages, td.activity { font-size: 0.9em; }";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub class: Option<&'static str>,
}

/// In-memory page holding the `stats-table` element and the `status` line.
/// Every string is stored as text and escaped on output.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    title: String,
    head: Vec<Vec<String>>,
    body: Vec<Vec<Cell>>,
    status: String,
}

impl HtmlPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            head: Vec::new(),
            body: Vec::new(),
            status: INITIAL_STATUS.to_string(),
        }
    }

    /// Rows of `<thead>`; at most one after a render.
    pub fn head_rows(&self) -> &[Vec<String>] {
        &self.head
    }

    pub fn body_rows(&self) -> &[Vec<Cell>] {
        &self.body
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string())
            .with_context(|| format!("writing page to {}", path.display()))
    }
}

impl DisplaySurface for HtmlPage {
    fn clear(&mut self) {
        self.head.clear();
        self.body.clear();
    }

    fn set_header_cells(&mut self, fields: &[String]) {
        self.head.push(fields.to_vec());
    }

    fn append_data_row(&mut self, fields: &[String], lookup: &CategoryLookup<'_>) {
        let row = fields
            .iter()
            .enumerate()
            .map(|(idx, text)| Cell {
                text: text.clone(),
                class: lookup.category(idx).css_class(),
            })
            .collect();
        self.body.push(row);
    }
}

impl StatusLine for HtmlPage {
    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }
}

impl fmt::Display for HtmlPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = escape_text(&self.title);
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(f, "<html lang=\"en\">")?;
        writeln!(f, "<head>")?;
        writeln!(f, "<meta charset=\"utf-8\">")?;
        writeln!(f, "<title>{}</title>", title)?;
        writeln!(f, "<style>\n{}\n</style>", STYLE)?;
        writeln!(f, "</head>")?;
        writeln!(f, "<body>")?;
        writeln!(f, "<h1>{}</h1>", title)?;
        writeln!(f, "<p id=\"{}\">{}</p>", STATUS_ID, escape_text(&self.status))?;
        writeln!(f, "<table id=\"{}\">", TABLE_ID)?;

        writeln!(f, "<thead>")?;
        for row in &self.head {
            write!(f, "<tr>")?;
            for col in row {
                write!(f, "<th>{}</th>", escape_text(col))?;
            }
            writeln!(f, "</tr>")?;
        }
        writeln!(f, "</thead>")?;

        writeln!(f, "<tbody>")?;
        for row in &self.body {
            write!(f, "<tr>")?;
            for cell in row {
                match cell.class {
                    Some(class) => write!(f, "<td class=\"{}\">", class)?,
                    None => write!(f, "<td>")?,
                }
                write!(f, "{}</td>", escape_text(&cell.text))?;
            }
            writeln!(f, "</tr>")?;
        }
        writeln!(f, "</tbody>")?;

        writeln!(f, "</table>")?;
        writeln!(f, "</body>")?;
        writeln!(f, "</html>")
    }
}

/// Escape text for element content and quoted attribute values.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv;
    use crate::render::build_table;
    use scraper::{Html, Selector};
    use tempfile::tempdir;

    fn select_count(doc: &Html, css: &str) -> usize {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).count()
    }

    #[test]
    fn test_escape_text() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
        assert_eq!(
            escape_text("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_fresh_page_has_empty_table() {
        let page = HtmlPage::new("Stats");
        let doc = Html::parse_document(&page.to_string());
        assert_eq!(select_count(&doc, "#stats-table thead tr"), 0);
        assert_eq!(select_count(&doc, "#stats-table tbody tr"), 0);
        assert_eq!(select_count(&doc, "#status"), 1);
    }

    #[test]
    fn test_rendered_document_structure() {
        let mut page = HtmlPage::new("Stats");
        build_table(&parse_csv("User;Repos;Notes\nalice;12;hi\nbob;3"), &mut page);
        page.set_status("done");

        let doc = Html::parse_document(&page.to_string());
        assert_eq!(select_count(&doc, "#stats-table thead th"), 3);
        assert_eq!(select_count(&doc, "#stats-table tbody tr"), 2);
        assert_eq!(select_count(&doc, "#stats-table tbody td"), 5);
        assert_eq!(select_count(&doc, "td.user"), 2);
        assert_eq!(select_count(&doc, "td.num"), 2);

        let td = Selector::parse("tbody tr:first-child td:last-child").unwrap();
        let last = doc.select(&td).next().unwrap();
        assert_eq!(last.value().attr("class"), None);
        assert_eq!(last.text().collect::<String>(), "hi");

        let status = Selector::parse("#status").unwrap();
        let text: String = doc.select(&status).next().unwrap().text().collect();
        assert_eq!(text, "done");
    }

    #[test]
    fn test_markup_in_fields_stays_text() {
        let mut page = HtmlPage::new("Stats");
        build_table(
            &parse_csv("User;<script>x</script>\n<img src=x onerror=alert(1)>;2"),
            &mut page,
        );

        let doc = Html::parse_document(&page.to_string());
        assert_eq!(select_count(&doc, "script"), 0);
        assert_eq!(select_count(&doc, "img"), 0);

        let th = Selector::parse("th:last-child").unwrap();
        let header: String = doc.select(&th).next().unwrap().text().collect();
        assert_eq!(header, "<script>x</script>");

        let td = Selector::parse("td.user").unwrap();
        let user: String = doc.select(&td).next().unwrap().text().collect();
        assert_eq!(user, "<img src=x onerror=alert(1)>");
    }

    #[test]
    fn test_rerender_replaces_rows() {
        let mut page = HtmlPage::new("Stats");
        build_table(&parse_csv("A;B\n1;2\n3;4"), &mut page);
        build_table(&parse_csv("A;B\n1;2\n3;4"), &mut page);
        assert_eq!(page.head_rows().len(), 1);
        assert_eq!(page.body_rows().len(), 2);

        build_table(&crate::parse::Table::default(), &mut page);
        assert!(page.head_rows().is_empty());
        assert!(page.body_rows().is_empty());
    }

    #[test]
    fn test_write_to_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("index.html");
        let mut page = HtmlPage::new("Stats");
        page.set_status("ok");
        page.write_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("<p id=\"status\">ok</p>"));
    }
}
