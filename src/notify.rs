//! Notification template rendering. Pure string substitution: `{name}`,
//! `{date}` and `{time}` placeholders filled from a variable map; unknown
//! placeholders collapse to the empty string so they never leak into output.
//! "Sending" is simulated by the caller writing an audit entry.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct NotifyPreview {
    pub email: String,
    pub sms: String,
    pub from_email: String,
    pub from_sms: String,
    pub to_email: String,
    pub to_phone: String,
}

/// Substitute `{word}` placeholders from `vars`. Braces without a closing
/// partner are kept literally.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                if key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    if let Some(value) = vars.get(key) {
                        out.push_str(value);
                    }
                } else {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
