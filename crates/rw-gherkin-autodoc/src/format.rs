//! Content formatters for data tables, docstrings and descriptions.

use rw_gherkin::{DataTable, Docstring};

use crate::lines::Emitter;

/// Code-block language used when a docstring has no media type.
pub const DEFAULT_MEDIATYPE: &str = "text";

/// Render a data table as a `list-table`.
///
/// The first cell of each row opens a list item, the remaining cells are
/// continuation entries of the same item.
///
/// # Example
///
/// ```
/// use rw_gherkin::DataTable;
/// use rw_gherkin_autodoc::{Emitter, format_datatable};
///
/// let table = DataTable::new(vec![vec!["a".into(), "b".into()]]);
/// let mut out = Emitter::new("", "    ", "a.feature");
/// format_datatable(&mut out, &table);
/// assert_eq!(
///     out.finish().texts(),
///     vec![".. list-table::", "", "    * - a", "      - b"]
/// );
/// ```
pub fn format_datatable(out: &mut Emitter<'_>, datatable: &DataTable) {
    let unit = out.unit();
    out.add_line(".. list-table::");
    out.add_line("");
    for row in &datatable.rows {
        for (i, cell) in row.iter().enumerate() {
            if i == 0 {
                out.add_line(&format!("{unit}* - {cell}"));
            } else {
                out.add_line(&format!("{unit}  - {cell}"));
            }
        }
    }
}

/// Render a docstring as a `code-block` tagged with its media type.
pub fn format_docstring(out: &mut Emitter<'_>, docstring: &Docstring) {
    let unit = out.unit();
    let mediatype = docstring
        .mediatype
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_MEDIATYPE);

    out.add_line(&format!(".. code-block:: {mediatype}"));
    out.add_line("");
    for line in docstring.content.lines() {
        out.add_line(&format!("{unit}{line}"));
    }
    out.add_line("");
}

/// Render free text one line per source line, leading whitespace removed.
pub fn format_description(out: &mut Emitter<'_>, description: &str) {
    for line in description.lines() {
        out.add_line(line.trim_start());
    }
}
