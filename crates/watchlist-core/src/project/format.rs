/// Trim surrounding whitespace, then remove every NBSP (U+00A0), which some
/// feeds use as padding and which breaks display downstream.
pub fn format_value(value: &str) -> String {
    value.trim().replace('\u{a0}', "")
}
