//! Word classification for text coloring
//!
//! Static lookup tables, consulted by a pure function. Unclassified words
//! fall back to the default text color.

use super::state::Color;

/// Grammatical role used to colorize revealed sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Auxiliary,
    BeForm,
    WhWord,
    Pronoun,
    Other,
}

const AUX_VERBS: &[&str] = &[
    "do", "does", "did", "can", "could", "will", "would", "shall", "should", "may", "might",
    "must", "have", "has", "had",
];

const BE_FORMS: &[&str] = &["am", "is", "are", "was", "were", "be", "been", "being"];

const WH_WORDS: &[&str] = &[
    "what", "when", "where", "who", "whom", "whose", "which", "why", "how",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their",
];

/// Classify a word, ignoring case and leading/trailing punctuation.
pub fn classify(word: &str) -> WordClass {
    let normalized: String = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    let w = normalized.as_str();
    if AUX_VERBS.contains(&w) {
        WordClass::Auxiliary
    } else if BE_FORMS.contains(&w) {
        WordClass::BeForm
    } else if WH_WORDS.contains(&w) {
        WordClass::WhWord
    } else if PRONOUNS.contains(&w) {
        WordClass::Pronoun
    } else {
        WordClass::Other
    }
}

/// Display color for a word class
pub fn class_color(class: WordClass) -> Color {
    match class {
        WordClass::Auxiliary => Color::rgb(0xff, 0xa6, 0x2b),
        WordClass::BeForm => Color::rgb(0x4f, 0xd1, 0xc5),
        WordClass::WhWord => Color::rgb(0xe0, 0x62, 0xc8),
        WordClass::Pronoun => Color::rgb(0x7a, 0xd1, 0x5c),
        WordClass::Other => Color::rgb(0xf0, 0xf0, 0xf0),
    }
}

/// Convenience lookup: word straight to color.
pub fn color_for(word: &str) -> Color {
    class_color(classify(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_ignores_case_and_punctuation() {
        assert_eq!(classify("How"), WordClass::WhWord);
        assert_eq!(classify("was"), WordClass::BeForm);
        assert_eq!(classify("day?"), WordClass::Other);
        assert_eq!(classify("Did"), WordClass::Auxiliary);
        assert_eq!(classify("you"), WordClass::Pronoun);
    }

    #[test]
    fn test_unclassified_gets_default_color() {
        assert_eq!(color_for("sandwich"), class_color(WordClass::Other));
    }

    #[test]
    fn test_classes_have_distinct_colors() {
        let colors = [
            class_color(WordClass::Auxiliary),
            class_color(WordClass::BeForm),
            class_color(WordClass::WhWord),
            class_color(WordClass::Pronoun),
            class_color(WordClass::Other),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
