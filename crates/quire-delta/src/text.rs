use crate::model::{Delta, Op};

/// Build a delta holding `text` as a single unformatted run.
///
/// Editor documents always end with a newline, so one is appended when
/// missing.
pub fn delta_from_plain_text(text: &str) -> Delta {
    let mut text = text.to_owned();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Delta::from(vec![Op::text(text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Insert;

    #[test]
    fn test_appends_newline() {
        let delta = delta_from_plain_text("hello");
        assert_eq!(delta.len(), 1);
        assert_eq!(delta.ops[0].insert, Insert::Text("hello\n".into()));
    }

    #[test]
    fn test_keeps_existing_newline() {
        let delta = delta_from_plain_text("a\nb\n");
        assert_eq!(delta.ops[0].insert, Insert::Text("a\nb\n".into()));
    }

    #[test]
    fn test_empty_text() {
        let delta = delta_from_plain_text("");
        assert_eq!(delta.ops[0].insert, Insert::Text("\n".into()));
    }
}
