//! Sentence segmentation.

/// Characters that end a sentence.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split text into trimmed, non-empty sentences, in order.
///
/// Splitting is purely on `.`, `!` and `?`; abbreviations and dotted dates
/// (`31.12.2025`) are split like any other terminator. Text without a
/// terminator comes back as a single sentence.
pub fn segment(text: &str) -> Vec<String> {
    text.split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_all_terminators() {
        assert_eq!(
            segment("Extend the guarantee. Pay on demand! Is that clear?"),
            vec!["Extend the guarantee", "Pay on demand", "Is that clear"]
        );
    }

    #[test]
    fn no_terminator_yields_whole_text() {
        assert_eq!(segment("  please advise  "), vec!["please advise"]);
    }

    #[test]
    fn drops_empty_fragments() {
        assert_eq!(segment("...  . !?"), Vec::<String>::new());
        assert_eq!(segment("One.. Two"), vec!["One", "Two"]);
        assert!(segment("").is_empty());
    }
}
