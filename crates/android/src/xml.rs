//! Small helpers for emitting Android resource XML by hand

/// XML declaration heading every generated resource document
pub const PROLOG: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// One level of indentation
pub const INDENT: &str = "    ";

/// Escape a value for use inside a double-quoted attribute or element text
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for a `<string>` resource; aapt additionally rejects bare apostrophes
pub fn escape_string_resource(value: &str) -> String {
    escape(value).replace('\'', "\\'")
}

/// Make text safe to place inside `<!-- -->`
pub fn comment_text(value: &str) -> String {
    value.replace("--", "- -")
}

/// Builder for one element with attributes on separate lines
///
/// ```text
/// <TextView
///     android:layout_width="wrap_content"
///     android:text="Hi"
/// />
/// ```
pub struct ElementWriter<'a> {
    out: &'a mut String,
    indent: String,
    tag: &'static str,
}

impl<'a> ElementWriter<'a> {
    /// Start `<tag` at the given indentation level
    pub fn open(out: &'a mut String, level: usize, tag: &'static str) -> Self {
        let indent = INDENT.repeat(level);
        out.push_str(&indent);
        out.push('<');
        out.push_str(tag);
        out.push('\n');
        Self { out, indent, tag }
    }

    /// Append an `android:` attribute (value is escaped)
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.raw_attr(&format!("android:{}", name), value)
    }

    /// Append an `android:` attribute only when a value is present
    pub fn attr_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            self.attr(name, value);
        }
        self
    }

    /// Append an attribute with a fully qualified name
    pub fn raw_attr(&mut self, name: &str, value: &str) -> &mut Self {
        self.out.push_str(&self.indent);
        self.out.push_str(INDENT);
        self.out.push_str(name);
        self.out.push_str("=\"");
        self.out.push_str(&escape(value));
        self.out.push_str("\"\n");
        self
    }

    /// Finish as a self-closing element followed by a blank line
    pub fn close(self) {
        self.out.push_str(&self.indent);
        self.out.push_str("/>\n\n");
    }

    /// Finish the start tag; the caller writes the body and then calls
    /// [`close_tag`] with the returned tag name
    pub fn open_body(self) -> &'static str {
        self.out.push_str(&self.indent);
        self.out.push_str(">\n\n");
        self.tag
    }
}

/// Write `</tag>` at the given level followed by a blank line
pub fn close_tag(out: &mut String, level: usize, tag: &str) {
    out.push_str(&INDENT.repeat(level));
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n\n");
}

/// Write an XML comment line at the given level
pub fn comment(out: &mut String, level: usize, text: &str) {
    out.push_str(&INDENT.repeat(level));
    out.push_str("<!-- ");
    out.push_str(&comment_text(text));
    out.push_str(" -->\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"Fish & "Chips" <now>"#), "Fish &amp; &quot;Chips&quot; &lt;now&gt;");
        assert_eq!(escape("#FF0000"), "#FF0000");
    }

    #[test]
    fn test_escape_string_resource() {
        assert_eq!(escape_string_resource("Bob's Shop"), "Bob\\'s Shop");
    }

    #[test]
    fn test_comment_text() {
        assert_eq!(comment_text("a--b"), "a- -b");
    }

    #[test]
    fn test_element_writer() {
        let mut out = String::new();
        let mut el = ElementWriter::open(&mut out, 1, "Button");
        el.attr("text", "Go").attr_opt("textColor", None);
        el.close();
        assert_eq!(out, "    <Button\n        android:text=\"Go\"\n    />\n\n");
    }

    #[test]
    fn test_element_with_body() {
        let mut out = String::new();
        let el = ElementWriter::open(&mut out, 0, "LinearLayout");
        let tag = el.open_body();
        comment(&mut out, 1, "body");
        close_tag(&mut out, 0, tag);
        assert_eq!(out, "<LinearLayout\n>\n\n    <!-- body -->\n</LinearLayout>\n\n");
    }
}
