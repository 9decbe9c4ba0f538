//! Pre-flight content gate.
//!
//! A cheap keyword screen that runs before any remote call. It only has
//! to be roughly right: anything not clearly off-topic is forwarded to
//! the assistant, which redirects the user itself when needed.

/// Guidance returned to the user when a question is gated as off-topic.
pub const OFF_TOPIC_GUIDANCE: &str = "I'm designed to answer questions about your union contract. Please ask a question related to your contract's terms, policies, or provisions, and I'll provide specific information with references to the relevant sections.";

/// Terms that mark a question as contract-related. A single hit lets the
/// message through regardless of anything else it contains.
const CONTRACT_TERMS: &[&str] = &[
    "contract",
    "agreement",
    "section",
    "article",
    "union",
    "grievance",
    "seniority",
    "pay",
    "wage",
    "overtime",
    "vacation",
    "sick",
    "leave",
    "benefit",
    "pension",
    "schedul",
    "reserve",
    "layover",
    "per diem",
    "furlough",
    "holiday",
    "rest period",
    "duty",
    "trip",
    "bid",
    "policy",
    "provision",
    "uniform",
    "deadhead",
    "base",
    "crew",
];

/// Phrases that clearly belong to some other conversation entirely.
const OFF_TOPIC_PATTERNS: &[&str] = &[
    "weather",
    "sports",
    "recipe",
    "movie",
    "music",
    "celebrity",
    "joke",
    "stock market",
    "crypto",
    "horoscope",
    "lottery",
    "video game",
    "write a poem",
    "write code",
    "translate this",
];

/// Bare greetings with no question attached.
const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "thanks",
    "thank you",
];

/// Classify raw user text as off-topic.
///
/// Heuristic only, never calls out. False negatives cost one assistant
/// run; false positives cost the user a retyped question, so the lists
/// above err toward letting messages through.
pub fn is_off_topic(content: &str) -> bool {
    let text = content.trim().to_lowercase();
    if text.is_empty() {
        return true;
    }
    if CONTRACT_TERMS.iter().any(|term| text.contains(term)) {
        return false;
    }
    let bare = text.trim_end_matches(['!', '.', '?', ',']).trim_end();
    if GREETINGS.iter().any(|greeting| bare == *greeting) {
        return true;
    }
    OFF_TOPIC_PATTERNS
        .iter()
        .any(|pattern| text.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_questions_pass() {
        assert!(!is_off_topic("What is the reserve call-out policy?"));
        assert!(!is_off_topic("How much vacation do I accrue per year?"));
        assert!(!is_off_topic("Explain Section 12.4 on overtime pay"));
    }

    #[test]
    fn test_clearly_off_topic_is_gated() {
        assert!(is_off_topic("What's the weather like today?"));
        assert!(is_off_topic("Tell me a joke"));
        assert!(is_off_topic("write a poem about the sea"));
    }

    #[test]
    fn test_contract_term_overrides_off_topic_pattern() {
        // "weather" alone gates, but a contract term wins.
        assert!(!is_off_topic("Does the contract cover weather delays?"));
    }

    #[test]
    fn test_bare_greetings_are_gated() {
        assert!(is_off_topic("hi"));
        assert!(is_off_topic("Hello!"));
        assert!(is_off_topic("thank you."));
    }

    #[test]
    fn test_greeting_with_question_passes() {
        assert!(!is_off_topic("Hi, what does my contract say about sick leave?"));
    }

    #[test]
    fn test_empty_and_whitespace_are_gated() {
        assert!(is_off_topic(""));
        assert!(is_off_topic("   \n  "));
    }

    #[test]
    fn test_ambiguous_text_passes_through() {
        // Benefit of the doubt goes to the user.
        assert!(!is_off_topic("What happens if I miss a check-in?"));
    }
}
