//! Markup line buffers with per-line source attribution.

/// One line of generated markup and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    /// Originating file (feature document or host document).
    pub source: String,
    /// 1-based line in `source`, if known.
    pub line: Option<usize>,
}

/// Ordered, append-only list of markup lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkupLines {
    lines: Vec<SourceLine>,
}

impl MarkupLines {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a directive body into lines attributed to consecutive source lines.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_gherkin_autodoc::MarkupLines;
    ///
    /// let body = MarkupLines::from_text("guide.rst", 10, "First\nSecond");
    /// assert_eq!(body.texts(), vec!["First", "Second"]);
    /// assert_eq!(body.iter().nth(1).unwrap().line, Some(11));
    /// ```
    #[must_use]
    pub fn from_text(source: &str, first_line: usize, text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(offset, line)| SourceLine {
                text: line.to_owned(),
                source: source.to_owned(),
                line: Some(first_line + offset),
            })
            .collect();
        Self { lines }
    }

    pub fn push(&mut self, text: impl Into<String>, source: &str, line: Option<usize>) {
        self.lines.push(SourceLine {
            text: text.into(),
            source: source.to_owned(),
            line,
        });
    }

    pub fn extend(&mut self, other: MarkupLines) {
        self.lines.extend(other.lines);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceLine> {
        self.lines.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line texts without attribution.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Lines joined with newlines, one trailing newline per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.text);
            text.push('\n');
        }
        text
    }
}

impl<'a> IntoIterator for &'a MarkupLines {
    type Item = &'a SourceLine;
    type IntoIter = std::slice::Iter<'a, SourceLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Indent-aware line sink used by documenters and content formatters.
///
/// Blank lines are always emitted empty; every other line is prefixed with
/// the current indentation. Lines are attributed to the documented feature
/// file unless copied from elsewhere with [`add_line_from`](Self::add_line_from).
#[derive(Debug)]
pub struct Emitter<'a> {
    indent: String,
    unit: &'a str,
    sourcename: &'a str,
    line: Option<usize>,
    lines: MarkupLines,
}

impl<'a> Emitter<'a> {
    /// Create an emitter starting at `indent`, nesting by `unit`.
    #[must_use]
    pub fn new(indent: &str, unit: &'a str, sourcename: &'a str) -> Self {
        Self {
            indent: indent.to_owned(),
            unit,
            sourcename,
            line: None,
            lines: MarkupLines::new(),
        }
    }

    /// Attribute generated lines to a line of the feature file.
    #[must_use]
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }

    /// Append one generated line.
    pub fn add_line(&mut self, line: &str) {
        let sourcename = self.sourcename;
        let lineno = self.line;
        self.add_line_from(line, sourcename, lineno);
    }

    /// Append one line keeping its original attribution.
    pub fn add_line_from(&mut self, line: &str, source: &str, lineno: Option<usize>) {
        if line.trim().is_empty() {
            self.lines.push("", source, lineno);
        } else {
            self.lines.push(format!("{}{line}", self.indent), source, lineno);
        }
    }

    /// Append lines that are already indented (generated children).
    pub fn append(&mut self, lines: MarkupLines) {
        self.lines.extend(lines);
    }

    /// Nest everything emitted from now on by one unit.
    pub fn indent(&mut self) {
        self.indent.push_str(self.unit);
    }

    /// Current indentation prefix.
    #[must_use]
    pub fn current_indent(&self) -> &str {
        &self.indent
    }

    /// One indentation unit.
    #[must_use]
    pub fn unit(&self) -> &'a str {
        self.unit
    }

    /// Number of lines emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> MarkupLines {
        self.lines
    }
}
