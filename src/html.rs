//! Markup helpers for rendered fragments.
//!
//! Every value that originates from the backend or from user input goes
//! through [`escape`] before it is placed in a text node or an attribute.

/// Escape a value for use in a text node or a double- or single-quoted attribute.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of [`escape`] for text this module produced.
pub fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Render a radio input with its label, checked state excluded.
pub fn radio(group: &str, value: &str) -> String {
    format!(
        r#"<label><input type="radio" name="{}" value="{}"> {}</label>"#,
        escape(group),
        escape(value),
        escape(value)
    )
}

pub fn paragraph(class: &str, text: &str) -> String {
    format!(r#"<p class="{}">{}</p>"#, escape(class), escape(text))
}
