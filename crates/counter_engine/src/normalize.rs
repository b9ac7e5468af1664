use std::borrow::Cow;

use crate::strip::strip_markup;

/// Measures text the same way for live display and for submission checks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LengthNormalizer {
    count_markup: bool,
}

impl LengthNormalizer {
    pub const fn new(count_markup: bool) -> Self {
        Self { count_markup }
    }

    pub const fn count_markup(&self) -> bool {
        self.count_markup
    }

    pub fn measure(&self, raw: &str) -> usize {
        normalize(raw, self.count_markup)
    }
}

/// Normalized length of `raw` in code points.
///
/// Every line break counts as one character whether it arrives as `\n`, `\r`
/// or `\r\n`. When `count_markup` is false the markup is stripped first and
/// only the text a reader would see is counted.
pub fn normalize(raw: &str, count_markup: bool) -> usize {
    let text = unify_line_breaks(raw);
    if count_markup {
        text.chars().count()
    } else {
        strip_markup(&text).chars().count()
    }
}

fn unify_line_breaks(raw: &str) -> Cow<'_, str> {
    if !raw.contains('\r') {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
