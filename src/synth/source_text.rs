use std::fmt::Write;

/// Helpers to put user-provided text inside generated string literals.
pub struct SourceText;

impl SourceText {
    /// Escape `text` so that, wrapped in double quotes, it reads back as
    /// exactly `text`.
    pub fn escape(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                '\r' => out.push_str("\\r"),
                // octal escapes stop after three digits, hex ones do not
                c if c.is_ascii_control() => {
                    let _ = write!(out, "\\{:03o}", c as u32);
                }
                c => out.push(c),
            }
        }
        out
    }

    pub fn quoted(text: &str) -> String {
        format!("\"{}\"", Self::escape(text))
    }

    /// `{"a", "b"}`
    pub fn name_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
        let items: Vec<String> = names.into_iter().map(Self::quoted).collect();
        format!("{{{}}}", items.join(", "))
    }
}
