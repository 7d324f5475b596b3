// 🏷️ Merchant Rules - Rules as Data
// Normalizes raw merchant strings and assigns a category code at import time

use serde::{Deserialize, Serialize};

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerchantRule {
    /// Rule ID for tracking
    #[serde(default)]
    pub id: String,

    /// Pattern to match (supports wildcards with *)
    pub pattern: String,

    /// Normalized merchant name
    #[serde(default)]
    pub merchant: Option<String>,

    /// Category code to assign (food_dining, transfers, ...)
    #[serde(default)]
    pub category: Option<String>,

    /// Priority (higher = applied first)
    #[serde(default)]
    pub priority: i32,
}

impl MerchantRule {
    /// Check if pattern matches the given text (case-insensitive)
    pub fn matches(&self, text: &str) -> bool {
        let pattern = self.pattern.to_lowercase();
        let text = text.to_lowercase();

        if !pattern.contains('*') {
            return text.contains(&pattern);
        }

        let parts: Vec<&str> = pattern.split('*').collect();
        let first = parts[0];
        let last = parts[parts.len() - 1];

        if text.len() < first.len() + last.len()
            || !text.starts_with(first)
            || !text.ends_with(last)
        {
            return false;
        }

        // Middle parts must appear in order between the anchors
        let end = text.len() - last.len();
        let mut pos = first.len();
        for part in &parts[1..parts.len() - 1] {
            if part.is_empty() {
                continue;
            }
            match text[pos..end].find(part) {
                Some(found) => pos += found + part.len(),
                None => return false,
            }
        }

        true
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub merchant: Option<String>,
    pub category: Option<String>,
    pub rule_id: Option<String>,
}

// ============================================================================
// RULE ENGINE
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<MerchantRule>,
}

impl RuleEngine {
    /// Create engine from a list of rules, highest priority first
    pub fn from_rules(mut rules: Vec<MerchantRule>) -> Self {
        // Stable sort keeps declaration order among equal priorities
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        RuleEngine { rules }
    }

    /// First matching rule wins
    pub fn classify(&self, text: &str) -> Classification {
        self.rules
            .iter()
            .find(|rule| rule.matches(text))
            .map(|rule| {
                tracing::debug!(rule = %rule.id, text, "merchant rule matched");
                Classification {
                    merchant: rule.merchant.clone(),
                    category: rule.category.clone(),
                    rule_id: Some(rule.id.clone()),
                }
            })
            .unwrap_or_default()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, pattern: &str, merchant: &str, category: &str, priority: i32) -> MerchantRule {
        MerchantRule {
            id: id.to_string(),
            pattern: pattern.to_string(),
            merchant: Some(merchant.to_string()),
            category: Some(category.to_string()),
            priority,
        }
    }

    #[test]
    fn test_substring_match() {
        let r = rule("zomato", "ZOMATO", "Zomato", "food_dining", 0);

        assert!(r.matches("UPI-ZOMATO LTD"));
        assert!(r.matches("zomato"));
        assert!(!r.matches("SWIGGY"));
    }

    #[test]
    fn test_wildcard_match() {
        let r = rule("swiggy", "SWIGGY*", "Swiggy", "food_dining", 0);

        assert!(r.matches("SWIGGY INSTAMART"));
        assert!(r.matches("swiggy #4521"));
        assert!(!r.matches("PAY SWIGGY"));

        let middle = rule("amzn", "AMAZON*PAY*IN", "Amazon", "shopping", 0);
        assert!(middle.matches("AMAZON PAY INDIA IN"));
        assert!(!middle.matches("AMAZON MARKETPLACE IN"));
    }

    #[test]
    fn test_priority_order() {
        let engine = RuleEngine::from_rules(vec![
            rule("general", "AMAZON*", "Amazon", "shopping", 1),
            rule("prime", "AMAZON PRIME", "Prime Video", "entertainment", 100),
        ]);

        let result = engine.classify("AMAZON PRIME VIDEO");
        assert_eq!(result.merchant.as_deref(), Some("Prime Video"));
        assert_eq!(result.category.as_deref(), Some("entertainment"));
        assert_eq!(result.rule_id.as_deref(), Some("prime"));

        let result = engine.classify("AMAZON RETAIL");
        assert_eq!(result.rule_id.as_deref(), Some("general"));
    }

    #[test]
    fn test_no_match() {
        let engine = RuleEngine::from_rules(vec![rule("a", "NETFLIX", "Netflix", "entertainment", 0)]);
        let result = engine.classify("UNKNOWN MERCHANT");

        assert_eq!(result, Classification::default());
        assert_eq!(engine.rule_count(), 1);
    }
}
