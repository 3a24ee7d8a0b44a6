//! Minimal indented HTML writer.

/// Output options for [`HtmlWriter`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Put every element on its own indented line.
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
        }
    }
}

/// Append-only HTML buffer that tracks nesting depth.
///
/// Text and attribute values are escaped on the way in; only
/// [`raw_line`](HtmlWriter::raw_line) writes unescaped markup.
#[derive(Debug, Clone, Default)]
pub struct HtmlWriter {
    options: WriteOptions,
    depth: usize,
    buffer: String,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: WriteOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    /// An empty writer with the same options and depth, for output that
    /// may be discarded.
    pub fn scratch(&self) -> Self {
        Self {
            options: self.options.clone(),
            depth: self.depth,
            buffer: String::new(),
        }
    }

    /// Append the output of a [`scratch`](Self::scratch) writer.
    pub fn append(&mut self, other: HtmlWriter) {
        self.buffer.push_str(&other.buffer);
    }

    /// `<tag attrs>` on its own line, then indent.
    pub fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let start = start_tag(tag, attrs);
        self.add_line(&start);
        self.indent();
    }

    /// Dedent, then `</tag>` on its own line.
    pub fn close(&mut self, tag: &str) {
        self.dedent();
        self.add_line(&format!("</{tag}>"));
    }

    /// `<tag attrs>text</tag>` on one line.
    pub fn element(&mut self, tag: &str, attrs: &[(&str, &str)], text: &str) {
        let line = format!("{}{}</{tag}>", start_tag(tag, attrs), escape_html(text));
        self.add_line(&line);
    }

    /// A void element such as `<img>` or `<input>`.
    pub fn void(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        let start = start_tag(tag, attrs);
        self.add_line(&start);
    }

    /// Write trusted markup verbatim.
    pub fn raw_line(&mut self, markup: &str) {
        self.add_line(markup);
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    // ---- private helpers ----

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }
}

fn start_tag(tag: &str, attrs: &[(&str, &str)]) -> String {
    let mut out = format!("<{tag}");
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
    out.push('>');
    out
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
