//! Built-in sentence deck
//!
//! Ordered question/answer pairs: even indices are questions, odd indices
//! their answers. Single mode walks the same list one sentence at a time.
//! `clip` names a pre-recorded narration clip; sentences without one are
//! spoken through the speech gateway instead.

/// One flashcard sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence {
    pub text: &'static str,
    pub translation: &'static str,
    pub clip: Option<&'static str>,
}

pub static DECK: &[Sentence] = &[
    Sentence {
        text: "How was your day today",
        translation: "오늘 하루 어땠어요?",
        clip: None,
    },
    Sentence {
        text: "It was great thank you",
        translation: "아주 좋았어요, 고마워요.",
        clip: None,
    },
    Sentence {
        text: "What are you doing now",
        translation: "지금 뭐 하고 있어요?",
        clip: None,
    },
    Sentence {
        text: "I am reading an interesting book",
        translation: "재미있는 책을 읽고 있어요.",
        clip: None,
    },
    Sentence {
        text: "Where do you want to go",
        translation: "어디에 가고 싶어요?",
        clip: None,
    },
    Sentence {
        text: "I want to go to the beach",
        translation: "바다에 가고 싶어요.",
        clip: None,
    },
    Sentence {
        text: "Can you help me with this",
        translation: "이것 좀 도와줄 수 있어요?",
        clip: None,
    },
    Sentence {
        text: "Sure I would be happy to help",
        translation: "물론이죠, 기꺼이 도와줄게요.",
        clip: None,
    },
    Sentence {
        text: "When does the movie start",
        translation: "영화는 언제 시작해요?",
        clip: None,
    },
    Sentence {
        text: "It starts at seven thirty",
        translation: "일곱 시 반에 시작해요.",
        clip: None,
    },
    Sentence {
        text: "Why are you so happy today",
        translation: "오늘 왜 그렇게 기분이 좋아요?",
        clip: None,
    },
    Sentence {
        text: "Because I passed my exam",
        translation: "시험에 합격했거든요.",
        clip: None,
    },
    Sentence {
        text: "Who is your best friend",
        translation: "가장 친한 친구는 누구예요?",
        clip: None,
    },
    Sentence {
        text: "My best friend is my little sister",
        translation: "제일 친한 친구는 제 여동생이에요.",
        clip: None,
    },
    Sentence {
        text: "Do you like spicy food",
        translation: "매운 음식 좋아해요?",
        clip: None,
    },
    Sentence {
        text: "Yes but not too spicy",
        translation: "네, 하지만 너무 맵지 않게요.",
        clip: None,
    },
];

/// External dictionary seam for the tap-to-translate affordance. The real
/// service lives outside this crate; gameplay only ever sees the stub.
pub trait WordTranslator {
    fn translate(&self, word: &str) -> Option<String>;
}

/// Always-empty dictionary; lookups log and fall through.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubDictionary;

impl WordTranslator for StubDictionary {
    fn translate(&self, word: &str) -> Option<String> {
        log::debug!("no dictionary wired, lookup skipped: {word}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_pairs_are_aligned() {
        // Paired mode needs an even count so every question has an answer
        assert_eq!(DECK.len() % 2, 0);
        assert!(!DECK.is_empty());
    }

    #[test]
    fn test_deck_entries_are_nonempty() {
        for sentence in DECK {
            assert!(!sentence.text.trim().is_empty());
            assert!(!sentence.translation.trim().is_empty());
        }
    }
}
