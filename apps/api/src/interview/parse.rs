//! Reply parsing — the wire contract between the model and the application.
//!
//! The model is instructed to reply either `"||| <question>"` or
//! `"<correction/tip> ||| <question>"`. This protocol is fragile by nature,
//! so the fallback is explicit: no delimiter means the whole reply is the
//! question, and any delimiter past the first belongs to the question.

/// The fixed token separating an optional correction/tip from the question.
pub const DELIMITER: &str = "|||";

/// A model reply split into its side-channel hint and the spoken question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Correction/tip segment. `None` when the delimiter is absent or the
    /// left side trims to nothing.
    pub hint: Option<String>,
    /// The question segment. Always present.
    pub question: String,
}

/// Splits a raw model reply at the FIRST delimiter occurrence.
///
/// Deterministic and side-effect free.
pub fn parse_reply(raw: &str) -> ParsedReply {
    match raw.split_once(DELIMITER) {
        Some((left, right)) => {
            let left = left.trim();
            ParsedReply {
                hint: (!left.is_empty()).then(|| left.to_string()),
                question: right.trim().to_string(),
            }
        }
        None => ParsedReply {
            hint: None,
            question: raw.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_delimiter_means_no_hint() {
        let parsed = parse_reply("||| What is CAP theorem?");
        assert_eq!(parsed.hint, None);
        assert_eq!(parsed.question, "What is CAP theorem?");
    }

    #[test]
    fn test_hint_and_question() {
        let parsed = parse_reply("TIP: say 'went' not 'goed'. ||| Explain TCP vs UDP.");
        assert_eq!(parsed.hint.as_deref(), Some("TIP: say 'went' not 'goed'."));
        assert_eq!(parsed.question, "Explain TCP vs UDP.");
    }

    #[test]
    fn test_no_delimiter_is_all_question() {
        let parsed = parse_reply("No delimiter here");
        assert_eq!(parsed.hint, None);
        assert_eq!(parsed.question, "No delimiter here");
    }

    #[test]
    fn test_split_only_at_first_delimiter() {
        let parsed = parse_reply("A ||| B ||| C");
        assert_eq!(parsed.hint.as_deref(), Some("A"));
        assert_eq!(parsed.question, "B ||| C");
    }

    #[test]
    fn test_whitespace_only_hint_is_absent() {
        let parsed = parse_reply("   \t ||| Question?");
        assert_eq!(parsed.hint, None);
        assert_eq!(parsed.question, "Question?");
    }

    #[test]
    fn test_reconstruction_round_trip() {
        let raw = "TIP: article missing. ||| Describe Docker vs VM.";
        let parsed = parse_reply(raw);
        let rebuilt = format!(
            "{} {DELIMITER} {}",
            parsed.hint.as_deref().unwrap_or_default(),
            parsed.question
        );
        assert_eq!(rebuilt.trim(), raw);
    }
}
