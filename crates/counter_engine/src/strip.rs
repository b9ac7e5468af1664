use std::borrow::Cow;

use scraper::Html;

const LT_REFERENCE: &str = "&lt;";

/// Returns the text a reader would see once markup is removed.
///
/// Tags and comments are dropped and character references decoded, the way an
/// HTML5 fragment parser produces text content. A `<` that is never closed by a
/// later `>` is kept as a literal character. When nothing was stripped the input
/// comes back untouched; otherwise surrounding whitespace left behind by block
/// tags is trimmed. References the parser recognises without a closing `;`
/// (`&copy`, `&amp`) are decoded too, and they also trigger the trim.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    if !text.contains(&['<', '&'][..]) {
        return Cow::Borrowed(text);
    }

    let source = escape_unterminated_tags(text);
    let fragment = Html::parse_fragment(&source);
    let visible: String = fragment.root_element().text().collect();

    if visible == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(visible.trim().to_string())
    }
}

fn escape_unterminated_tags(text: &str) -> Cow<'_, str> {
    let tail_start = text.rfind('>').map_or(0, |idx| idx + 1);
    let tail = &text[tail_start..];
    if !tail.contains('<') {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + LT_REFERENCE.len());
    escaped.push_str(&text[..tail_start]);
    escaped.push_str(&tail.replace('<', LT_REFERENCE));
    Cow::Owned(escaped)
}
