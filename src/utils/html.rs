/// Clean HTML content using the ammonia library.
///
/// Only applied to comment bodies when `SANITIZE_BODIES` is enabled.
///
/// Whitelist-based: safe tags (<b>, <p>) survive, while <script>, <iframe>
/// and event-handler attributes are stripped. Output is re-serialized, so
/// bare `&`, `<` and `>` in plain text come back entity-escaped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_html("hello world"), "hello world");
    }

    #[test]
    fn bare_markup_characters_are_escaped() {
        assert_eq!(clean_html("2 < 3 & 4 > 1"), "2 &lt; 3 &amp; 4 &gt; 1");
    }

    #[test]
    fn script_tags_are_removed() {
        let cleaned = clean_html("hi<script>alert(1)</script>");
        assert_eq!(cleaned, "hi");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let cleaned = clean_html(r#"<b onclick="steal()">bold</b>"#);
        assert_eq!(cleaned, "<b>bold</b>");
    }
}
