use std::sync::OnceLock;

use regex::Regex;

fn rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?m)^[ \t]{0,3}#{1,6}[ \t]+", ""),
            (r"(?m)^[ \t]*[-*+\u{2022}][ \t]+", ""),
            (r"\[([^\]\n]+)\]\([^)\n]*\)", "$1"),
            (r"\*\*([^*\n]+)\*\*", "$1"),
            (r"__([^_\n]+)__", "$1"),
            (r"\*([^*\n]+)\*", "$1"),
            (r"(^|[^A-Za-z0-9_])_([^_\n]+)_", "$1$2"),
            (r"`([^`\n]+)`", "$1"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| {
            Regex::new(pattern).ok().map(|regex| (regex, replacement))
        })
        .collect()
    })
}

/// Reduce lightweight emphasis markup to the text it decorates.
pub fn strip_markup(text: &str) -> String {
    let mut plain = text.replace("\r\n", "\n");
    for (regex, replacement) in rules() {
        plain = regex.replace_all(&plain, *replacement).into_owned();
    }
    plain.trim().to_string()
}
