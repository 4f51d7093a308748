/// Header text with byte-order marks and zero-width spaces removed and
/// surrounding whitespace trimmed.
pub(crate) fn clean_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Display label for a column key: camelCase is split into words and the first
/// letter is upper-cased (`firstName` -> `First Name`, `mancom` -> `Mancom`).
pub(crate) fn to_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_uppercase() {
            label.push(' ');
        }
        label.push(ch);
    }

    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
