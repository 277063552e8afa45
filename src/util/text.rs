use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// Fit `s` into `max_width` terminal columns, appending "..." when cut.
///
/// Widths of 3 or less are filled with as many characters as fit, without
/// an ellipsis.
pub fn fit_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width > ELLIPSIS.len() {
        max_width - ELLIPSIS.len()
    } else {
        max_width
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width > ELLIPSIS.len() {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    } else {
        Cow::Owned(s[..end].to_string())
    }
}

/// Longest suffix of `s` that fits in `max_width` terminal columns.
///
/// Used for text being typed, where the end of the buffer must stay visible.
pub fn tail_width(s: &str, max_width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > max_width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}

/// Todo title safe to print: control characters and escape sequences removed.
///
/// Titles come from the remote store and are rendered verbatim otherwise.
pub fn display_title(s: &str) -> Cow<'_, str> {
    if !s.chars().any(char::is_control) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| if c == '\t' || c == '\n' { ' ' } else { c })
            .filter(|c| !c.is_control())
            .collect(),
    )
}
