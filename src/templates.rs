//! Narrative templates for analogy prompts.
//!
//! Each analogy category gets a fixed short narrative containing the two
//! placeholder markers `[A]` and `[B]`, substituted with one member of an
//! analogy pair at prompt-building time. Every narrative embeds a
//! parenthetical distractor clause carrying no information about the
//! analogy, so attribution can be checked for down-weighting it.

use crate::error::{RationaleError, Result};

/// Placeholder substituted with the left member of a pair.
pub const PLACEHOLDER_A: &str = "[A]";
/// Placeholder substituted with the right member of a pair.
pub const PLACEHOLDER_B: &str = "[B]";

/// Narrative templates keyed by analogy category name.
const TEMPLATES: [(&str, &str); 14] = [
    (
        "capital-common-countries",
        "When my flight landed in [B], I converted my currency and slowly fell \
         asleep. (I had a terrifying dream about my grandmother, but that's a \
         story for another time). I was staying in the capital, [A]",
    ),
    (
        "capital-world",
        "When my flight landed in [B], I converted my currency and slowly fell \
         asleep. (I was behind on a couple of assignments, but I tried not to \
         think about them). I was staying in the capital, [A]",
    ),
    (
        "currency",
        "As soon as I arrived in [A], I checked into my hotel and took a long \
         nap. (I had finally finished the book I was reading and it was amazing). \
         I had to figure out the exchange rate to the local currency, which is \
         apparently called the [B]",
    ),
    (
        "city-in-state",
        "As soon as I arrived in [B], I checked into my hotel and watched a movie \
         before falling asleep. (I had a great call with my husband, although I \
         wish it were longer). I was staying in my favorite city, [A]",
    ),
    (
        "family",
        "I initially invited my [A], who gladly accepted my invitation. (My \
         favorite song just came on, so I was able to relax). When I learned that \
         women were allowed, I went ahead and also invited my [B]",
    ),
    (
        "gram1-adjective-to-adverb",
        "How could he do this so [B]? (I wasn't sure why my phone always rang at \
         the most inopportune times). When I tried to do it, I could never be [A]",
    ),
    (
        "gram2-opposite",
        "I thought it was [A]. (Just then an ad came on the TV, but that's \
         irrelevant). It was the opposite of that: it was [B]",
    ),
    (
        "gram3-comparative",
        "I knew it was [A], but that's before I saw it in person. (Just then I \
         thought about my ex-wife, but I had to stop thinking about her). When I \
         did end up seeing it in person, it was even [B]",
    ),
    (
        "gram4-superlative",
        "I thought it would be the [B] thing I'd ever encounter. (I tried to \
         ignore my phone vibrating in my pocket). But when I did end up \
         encountering it, it turned out it wasn't so [A]",
    ),
    (
        "gram5-present-participle",
        "Every other day, it started [B] in the morning. (I tried to remember the \
         name of the woman at the bar). But today, it did not [A]",
    ),
    (
        "gram6-nationality-adjective",
        "I had never been friends with any [B] people before. (The funniest thing \
         happened to me the other day, but that's a story for another time). In \
         fact, I had never even been to [A]",
    ),
    (
        "gram7-past-tense",
        "Although I [B] yesterday, I had a million things to do today. (I \
         suddenly felt a pinched nerve, so I made a mental note to get that \
         checked out). So today I wouldn't have time to do any more [A]",
    ),
    (
        "gram8-plural",
        "I really wanted to buy the [A], more than I ever wanted to buy anything \
         before. (I was also behind on my homework, but that's another story). So \
         I went to the store and asked if they had any [B]",
    ),
    (
        "gram9-plural-verbs",
        "I can usually [A] by myself. (I was so behind on work but I tried to \
         distract myself). Although it's so much better when someone else also \
         [B]",
    ),
];

/// Look up the narrative template for a category.
///
/// Categories without a registered template fail loudly; a corpus section
/// must never be silently skipped.
pub fn template_for(category: &str) -> Result<&'static str> {
    TEMPLATES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, template)| *template)
        .ok_or_else(|| RationaleError::UnknownCategory(category.to_string()))
}

/// Names of all registered categories, in table order.
pub fn registered_categories() -> impl Iterator<Item = &'static str> {
    TEMPLATES.iter().map(|(name, _)| *name)
}

/// Substitute one analogy pair into a template.
///
/// Each marker is replaced once; `validate` guarantees there is exactly one
/// of each in a registered template.
pub fn fill(template: &str, a: &str, b: &str) -> String {
    template
        .replacen(PLACEHOLDER_A, a, 1)
        .replacen(PLACEHOLDER_B, b, 1)
}

/// Check that a template contains exactly one `[A]` and one `[B]` marker.
pub fn validate(template: &str) -> Result<()> {
    for marker in [PLACEHOLDER_A, PLACEHOLDER_B] {
        let count = template.matches(marker).count();
        if count != 1 {
            return Err(RationaleError::MalformedCorpus(format!(
                "template must contain `{marker}` exactly once, found {count}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourteen_categories_registered() {
        assert_eq!(registered_categories().count(), 14);
    }

    #[test]
    fn test_all_templates_valid() {
        for name in registered_categories() {
            let template = template_for(name).unwrap();
            validate(template).unwrap();
        }
    }

    #[test]
    fn test_unknown_category_fails() {
        let err = template_for("gram10-made-up").unwrap_err();
        assert!(matches!(err, RationaleError::UnknownCategory(_)));
    }

    #[test]
    fn test_fill_substitutes_both_markers() {
        let template = template_for("capital-common-countries").unwrap();
        let prompt = fill(template, "Athens", "Greece");
        assert!(prompt.contains("Athens"));
        assert!(prompt.contains("Greece"));
        assert!(!prompt.contains(PLACEHOLDER_A));
        assert!(!prompt.contains(PLACEHOLDER_B));
    }

    #[test]
    fn test_validate_rejects_duplicate_marker() {
        assert!(validate("[A] and [A] meet [B]").is_err());
        assert!(validate("[A] only").is_err());
        assert!(validate("[A] meets [B]").is_ok());
    }
}
