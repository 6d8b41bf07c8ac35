/// Placeholder stored when a posting carries no usable description.
pub const NO_DESCRIPTION: &str = "no description";

/// Remove `<...>` tags from free text and trim the result.
///
/// Tags are matched shortest-first from left to right and never span a line
/// break; a `<` without a closing `>` on the same line is kept verbatim. Absent
/// input, empty input and input that is nothing but markup all collapse to
/// [`NO_DESCRIPTION`].
pub fn strip_markup(text: Option<&str>) -> String {
    let Some(raw) = text.filter(|value| !value.is_empty()) else {
        return NO_DESCRIPTION.to_string();
    };

    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        cleaned.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match closing_bracket(after_open) {
            Some(close) => rest = &after_open[close + 1..],
            None => {
                cleaned.push('<');
                rest = after_open;
            }
        }
    }
    cleaned.push_str(rest);

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        trimmed.to_string()
    }
}

fn closing_bracket(text: &str) -> Option<usize> {
    for (idx, ch) in text.char_indices() {
        match ch {
            '>' => return Some(idx),
            '\n' => return None,
            _ => {}
        }
    }
    None
}
