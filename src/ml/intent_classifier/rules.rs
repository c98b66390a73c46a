//! Deterministic keyword rules consulted before the statistical model.
//!
//! Rules are a literal ordered slice; the first predicate that accepts the
//! lowercased, trimmed input wins. Rules overlap: "turn the volume down and
//! stop" is `volumeDown` because the volume rules come first.

/// Test over lowercased, trimmed input.
pub type RulePredicate = fn(&str) -> bool;

/// A `(predicate, label)` pair.
pub type Rule = (RulePredicate, &'static str);

const AFFIRMATIVE: &[&str] = &["yes", "yeah", "yep", "sure", "ok", "okay"];
const NEGATIVE: &[&str] = &["no", "nope", "nah"];

fn volume_up(text: &str) -> bool {
    text.contains("volume") && (text.contains("up") || text.contains("increase"))
}

fn volume_down(text: &str) -> bool {
    text.contains("volume") && (text.contains("down") || text.contains("decrease"))
}

fn stop(text: &str) -> bool {
    text.contains("stop")
}

fn affirmative(text: &str) -> bool {
    AFFIRMATIVE.contains(&text)
}

fn negative(text: &str) -> bool {
    NEGATIVE.contains(&text)
}

/// Built-in rules, in evaluation order.
pub const DEFAULT_RULES: &[Rule] = &[
    (volume_up, "volumeUp"),
    (volume_down, "volumeDown"),
    (stop, "stop"),
    (affirmative, "yesNode"),
    (negative, "noNode"),
];

/// An ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    rules: &'static [Rule],
}

impl RuleTable {
    /// Wrap an ordered rule slice.
    pub const fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    /// An empty table; every input goes to the model.
    pub const fn empty() -> Self {
        Self { rules: &[] }
    }

    /// Label of the first rule matching `text`, if any.
    ///
    /// `text` is lowercased and trimmed here, so raw input is fine.
    pub fn evaluate(&self, text: &str) -> Option<&'static str> {
        let text = text.trim().to_lowercase();
        self.rules
            .iter()
            .find(|(predicate, _)| predicate(&text))
            .map(|(_, label)| *label)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Labels in evaluation order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|(_, label)| *label)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(DEFAULT_RULES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let table = RuleTable::default();
        assert_eq!(table.evaluate("turn volume up"), Some("volumeUp"));
        assert_eq!(table.evaluate("Increase the VOLUME"), Some("volumeUp"));
        assert_eq!(table.evaluate("turn volume down please"), Some("volumeDown"));
        assert_eq!(table.evaluate("decrease volume"), Some("volumeDown"));
        assert_eq!(table.evaluate("please stop the game"), Some("stop"));
        assert_eq!(table.evaluate("yeah"), Some("yesNode"));
        assert_eq!(table.evaluate("  OK "), Some("yesNode"));
        assert_eq!(table.evaluate("nah"), Some("noNode"));
        assert_eq!(table.evaluate("show me the games list"), None);
    }

    #[test]
    fn test_order_is_first_match() {
        let table = RuleTable::default();
        assert_eq!(table.evaluate("turn the volume down and stop"), Some("volumeDown"));
        // "stop" contains no "up"; "stop the volume" has no direction word.
        assert_eq!(table.evaluate("stop the volume"), Some("stop"));
        // Both directions: the up rule is listed first.
        assert_eq!(table.evaluate("volume up then down"), Some("volumeUp"));
    }

    #[test]
    fn test_exact_match_rules_need_whole_input() {
        let table = RuleTable::default();
        assert_eq!(table.evaluate("yes please"), None);
        assert_eq!(table.evaluate("no way"), None);
        assert_eq!(table.evaluate("yes!"), None);
    }

    #[test]
    fn test_substring_matching_is_broad() {
        let table = RuleTable::default();
        // "volume" plus the "up" inside "upbeat".
        assert_eq!(table.evaluate("upbeat volume"), Some("volumeUp"));
        assert_eq!(table.evaluate("unstoppable"), Some("stop"));
    }

    #[test]
    fn test_labels_order() {
        let labels: Vec<&str> = RuleTable::default().labels().collect();
        assert_eq!(labels, vec!["volumeUp", "volumeDown", "stop", "yesNode", "noNode"]);
        assert!(RuleTable::empty().evaluate("stop").is_none());
        assert!(RuleTable::empty().is_empty());
    }
}
