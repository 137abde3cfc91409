use crate::types::MovieRecord;

pub fn normalize(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Joins the normalized text fields with single spaces. Empty fields still
/// contribute their separator, and nothing is trimmed or collapsed.
pub fn combine(record: &MovieRecord) -> String {
    let fields = record.text_fields();
    let mut out = String::with_capacity(fields.iter().map(|f| normalize(*f).len() + 1).sum());
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(normalize(*field));
    }
    out
}
