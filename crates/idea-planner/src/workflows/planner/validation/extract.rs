/// Slice spanning the first `{` to the last `}` of the raw output.
///
/// Prose before or after the record is ignored. Returns `None` when no such
/// pair exists.
pub(crate) fn locate_record(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    raw.get(start..=end)
}

#[cfg(test)]
mod tests {
    use super::locate_record;

    #[test]
    fn ignores_surrounding_prose() {
        let raw = "Here is your plan:\n{\"a\": {\"b\": 1}}\nLet me know if you need more.";
        assert_eq!(locate_record(raw), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn rejects_text_without_braces() {
        assert_eq!(locate_record("I could not produce a plan."), None);
        assert_eq!(locate_record("only an opening {"), None);
        assert_eq!(locate_record("} reversed {"), None);
    }

    #[test]
    fn handles_multibyte_prose() {
        let raw = "Voilà — {\"ok\": true} ✓";
        assert_eq!(locate_record(raw), Some("{\"ok\": true}"));
    }
}
