use model::catalog::field::TargetField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Test applied to a lower-cased source column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Exact(String),
    Contains(String),
    ContainsAll(Vec<String>),
}

impl Predicate {
    /// `column` must already be lower-cased.
    pub fn matches(&self, column: &str) -> bool {
        match self {
            Predicate::Exact(text) => column == text.to_lowercase(),
            Predicate::Contains(text) => column.contains(&text.to_lowercase()),
            Predicate::ContainsAll(texts) => {
                !texts.is_empty() && texts.iter().all(|t| column.contains(&t.to_lowercase()))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Exact(text) => write!(f, "= '{text}'"),
            Predicate::Contains(text) => write!(f, "contains '{text}'"),
            Predicate::ContainsAll(texts) => write!(f, "contains all {texts:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    pub field: TargetField,
    pub predicate: Predicate,
}

impl MatchRule {
    pub fn exact(field: TargetField, text: &str) -> Self {
        Self {
            field,
            predicate: Predicate::Exact(text.to_string()),
        }
    }

    pub fn contains(field: TargetField, text: &str) -> Self {
        Self {
            field,
            predicate: Predicate::Contains(text.to_string()),
        }
    }

    pub fn contains_all(field: TargetField, texts: &[&str]) -> Self {
        Self {
            field,
            predicate: Predicate::ContainsAll(texts.iter().map(|t| t.to_string()).collect()),
        }
    }
}

/// Ordered rule table. Earlier rules win.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    rules: Vec<MatchRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    /// Appends rules after the existing ones.
    pub fn extend<I: IntoIterator<Item = MatchRule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchRule> {
        self.rules.iter()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new(vec![
            MatchRule::contains_all(TargetField::ProductName, &["product", "name"]),
            MatchRule::exact(TargetField::Brand, "brand"),
            MatchRule::exact(TargetField::Category, "category"),
            MatchRule::exact(TargetField::Price, "price"),
            MatchRule::exact(TargetField::Rating, "rating"),
            MatchRule::contains(TargetField::Reviews, "review"),
            MatchRule::exact(TargetField::Identifier, "asin"),
        ])
    }
}
