//! The local responder always answers, and the palette keywords win over
//! every other group.

use brandkit_completion::{respond, Topic};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn every_prompt_gets_a_non_empty_answer(prompt in ".*") {
        let answer = respond(&prompt);
        prop_assert!(!answer.is_empty());
        prop_assert_eq!(answer, Topic::classify(&prompt).answer());
    }

    #[test]
    fn palette_keywords_take_priority(
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z ]{0,20}",
        keyword in prop::sample::select(vec!["color", "COLOR", "Palette"]),
    ) {
        let prompt = format!("{prefix} {keyword} logo tagline strategy {suffix}");
        prop_assert_eq!(Topic::classify(&prompt), Topic::Palette);
    }
}
