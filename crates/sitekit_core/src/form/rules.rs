//! Field validation rules.
//!
//! # Responsibility
//! - Map every known field identifier to exactly one rule.
//! - Keep rule predicates pure and side-effect free.
//!
//! # Invariants
//! - A `ValidationRuleSet` always covers every `FieldId` exactly once.
//! - Lookup by field name is total: unknown names map to "no rule".
//! - Pattern rules must match the whole (trimmed) value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

const NAME_PATTERN: &str = r"^[a-zA-ZÀ-ÿ\s'-]{2,50}$";
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^[0-9\s+\-()]{10,20}$";
const COMPANY_PATTERN: &str = r"^[a-zA-ZÀ-ÿ0-9\s'-.&]{2,100}$";
const MESSAGE_MIN_CHARS: usize = 10;

pub const FIRST_NAME_MESSAGE: &str =
    "Vorname muss 2-50 Zeichen enthalten (nur Buchstaben, Leerzeichen, Bindestrich, Apostroph)";
pub const LAST_NAME_MESSAGE: &str =
    "Nachname muss 2-50 Zeichen enthalten (nur Buchstaben, Leerzeichen, Bindestrich, Apostroph)";
pub const EMAIL_MESSAGE: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein";
pub const PHONE_MESSAGE: &str =
    "Telefonnummer muss 10-20 Zeichen enthalten (Ziffern, Leerzeichen, +, -, (, ) erlaubt)";
pub const MESSAGE_MESSAGE: &str = "Nachricht muss mindestens 10 Zeichen enthalten";
pub const COMPANY_MESSAGE: &str = "Firmenname muss 2-100 Zeichen enthalten";

static STANDARD_RULES: Lazy<Arc<ValidationRuleSet>> =
    Lazy::new(|| Arc::new(build_standard_rules().expect("standard rule set is complete")));

/// Identifier of a field the pipeline knows rules for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    FirstName,
    LastName,
    Email,
    Phone,
    Message,
    Company,
}

impl FieldId {
    pub const ALL: [FieldId; 6] = [
        FieldId::FirstName,
        FieldId::LastName,
        FieldId::Email,
        FieldId::Phone,
        FieldId::Message,
        FieldId::Company,
    ];

    /// Form field name used in markup and payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
            Self::Company => "company",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == name)
    }
}

impl Display for FieldId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate carried by a rule.
#[derive(Debug, Clone)]
pub enum RuleKind {
    /// Whole value must match the anchored expression.
    Pattern(Regex),
    /// Value must contain at least this many characters.
    MinLength(usize),
}

/// Validation constraint for one field plus its user-facing message.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: FieldId,
    kind: RuleKind,
    message: String,
}

impl FieldRule {
    /// Builds a pattern rule.
    ///
    /// # Errors
    /// - `RuleSetError::InvalidPattern` when `pattern` does not compile.
    pub fn pattern(
        field: FieldId,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self, RuleSetError> {
        let regex = Regex::new(pattern).map_err(|err| RuleSetError::InvalidPattern {
            field,
            details: err.to_string(),
        })?;
        Ok(Self {
            field,
            kind: RuleKind::Pattern(regex),
            message: message.into(),
        })
    }

    pub fn min_length(field: FieldId, min_chars: usize, message: impl Into<String>) -> Self {
        Self {
            field,
            kind: RuleKind::MinLength(min_chars),
            message: message.into(),
        }
    }

    pub fn field(&self) -> FieldId {
        self.field
    }

    pub fn kind(&self) -> &RuleKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether `value` satisfies this rule.
    ///
    /// Callers pass the trimmed value.
    pub fn check(&self, value: &str) -> bool {
        match &self.kind {
            RuleKind::Pattern(regex) => regex.is_match(value),
            RuleKind::MinLength(min_chars) => value.chars().count() >= *min_chars,
        }
    }
}

/// Complete mapping from `FieldId` to `FieldRule`.
#[derive(Debug, Clone)]
pub struct ValidationRuleSet {
    rules: BTreeMap<FieldId, FieldRule>,
}

impl ValidationRuleSet {
    /// Builds a rule set and checks it covers every `FieldId` exactly once.
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, RuleSetError> {
        let mut by_field = BTreeMap::new();
        for rule in rules {
            let field = rule.field;
            if by_field.insert(field, rule).is_some() {
                return Err(RuleSetError::DuplicateRule(field));
            }
        }
        if let Some(missing) = FieldId::ALL
            .into_iter()
            .find(|field| !by_field.contains_key(field))
        {
            return Err(RuleSetError::MissingRule(missing));
        }
        Ok(Self { rules: by_field })
    }

    /// Process-wide default rules, built once on first use.
    pub fn standard() -> &'static ValidationRuleSet {
        &STANDARD_RULES
    }

    /// Shared handle to the standard rules; no rebuild, no copy.
    pub fn shared_standard() -> Arc<ValidationRuleSet> {
        Arc::clone(&STANDARD_RULES)
    }

    pub fn get(&self, field: FieldId) -> Option<&FieldRule> {
        self.rules.get(&field)
    }

    /// Looks up the rule for a form field name; `None` means "no rule".
    pub fn rule_for(&self, name: &str) -> Option<&FieldRule> {
        FieldId::from_name(name).and_then(|field| self.get(field))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn build_standard_rules() -> Result<ValidationRuleSet, RuleSetError> {
    ValidationRuleSet::new(vec![
        FieldRule::pattern(FieldId::FirstName, NAME_PATTERN, FIRST_NAME_MESSAGE)?,
        FieldRule::pattern(FieldId::LastName, NAME_PATTERN, LAST_NAME_MESSAGE)?,
        FieldRule::pattern(FieldId::Email, EMAIL_PATTERN, EMAIL_MESSAGE)?,
        FieldRule::pattern(FieldId::Phone, PHONE_PATTERN, PHONE_MESSAGE)?,
        FieldRule::min_length(FieldId::Message, MESSAGE_MIN_CHARS, MESSAGE_MESSAGE),
        FieldRule::pattern(FieldId::Company, COMPANY_PATTERN, COMPANY_MESSAGE)?,
    ])
}

/// Rule set construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSetError {
    MissingRule(FieldId),
    DuplicateRule(FieldId),
    InvalidPattern { field: FieldId, details: String },
}

impl Display for RuleSetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRule(field) => write!(f, "no validation rule for field: {field}"),
            Self::DuplicateRule(field) => {
                write!(f, "validation rule defined twice for field: {field}")
            }
            Self::InvalidPattern { field, details } => {
                write!(f, "invalid pattern for field {field}: {details}")
            }
        }
    }
}

impl Error for RuleSetError {}

#[cfg(test)]
mod tests {
    use super::{
        FieldId, FieldRule, RuleKind, RuleSetError, ValidationRuleSet, EMAIL_MESSAGE,
        MESSAGE_MESSAGE,
    };

    fn rule(field: FieldId) -> &'static FieldRule {
        ValidationRuleSet::standard()
            .get(field)
            .expect("standard set covers every field")
    }

    #[test]
    fn standard_set_covers_every_field() {
        let rules = ValidationRuleSet::standard();
        assert_eq!(rules.len(), FieldId::ALL.len());
        for field in FieldId::ALL {
            assert_eq!(rules.rule_for(field.as_str()).map(FieldRule::field), Some(field));
        }
    }

    #[test]
    fn field_names_match_form_control_names() {
        let names: Vec<&str> = FieldId::ALL.into_iter().map(FieldId::as_str).collect();
        assert_eq!(
            names,
            vec!["firstName", "lastName", "email", "phone", "message", "company"]
        );
        for field in FieldId::ALL {
            assert_eq!(FieldId::from_name(field.as_str()), Some(field));
        }
    }

    #[test]
    fn unknown_names_have_no_rule() {
        let rules = ValidationRuleSet::standard();
        assert!(rules.rule_for("privacy").is_none());
        assert!(rules.rule_for("").is_none());
        assert!(rules.rule_for("FirstName").is_none());
    }

    #[test]
    fn name_rule_accepts_extended_latin() {
        let first = rule(FieldId::FirstName);
        assert!(first.check("Jürgen"));
        assert!(first.check("Anne-Marie"));
        assert!(first.check("O'Neil"));
        assert!(first.check("José María"));
    }

    #[test]
    fn name_rule_rejects_bounds_and_symbols() {
        let last = rule(FieldId::LastName);
        assert!(!last.check("A"));
        assert!(!last.check(&"a".repeat(51)));
        assert!(last.check(&"a".repeat(50)));
        assert!(!last.check("Smith3"));
        assert!(!last.check("<script>"));
    }

    #[test]
    fn email_rule_matches_local_at_domain_tld() {
        let email = rule(FieldId::Email);
        assert!(email.check("user@example.com"));
        assert!(!email.check("not-an-email"));
        assert!(!email.check("user@example"));
        assert!(!email.check("us er@example.com"));
        assert!(!email.check("user@@example.com"));
        assert_eq!(email.message(), EMAIL_MESSAGE);
    }

    #[test]
    fn phone_rule_bounds_length_and_charset() {
        let phone = rule(FieldId::Phone);
        assert!(phone.check("+49 (30) 123-4567"));
        assert!(phone.check("0123456789"));
        assert!(!phone.check("012345678"));
        assert!(!phone.check(&"1".repeat(21)));
        assert!(!phone.check("0123 456 789 ext"));
    }

    #[test]
    fn company_rule_allows_punctuation() {
        let company = rule(FieldId::Company);
        assert!(company.check("Müller & Söhne GmbH."));
        assert!(company.check("A1"));
        assert!(!company.check("X"));
        assert!(!company.check("Acme <Inc>"));
    }

    #[test]
    fn message_rule_counts_characters() {
        let message = rule(FieldId::Message);
        assert!(matches!(message.kind(), RuleKind::MinLength(10)));
        assert!(!message.check("123456789"));
        assert!(message.check("1234567890"));
        assert!(message.check("äöüäöüäöüß"));
        assert_eq!(message.message(), MESSAGE_MESSAGE);
    }

    #[test]
    fn rejects_incomplete_rule_set() {
        let err = ValidationRuleSet::new(vec![FieldRule::min_length(
            FieldId::Message,
            10,
            "too short",
        )])
        .unwrap_err();
        assert_eq!(err, RuleSetError::MissingRule(FieldId::FirstName));
    }

    #[test]
    fn rejects_duplicate_rule() {
        let err = ValidationRuleSet::new(vec![
            FieldRule::min_length(FieldId::Message, 10, "a"),
            FieldRule::min_length(FieldId::Message, 5, "b"),
        ])
        .unwrap_err();
        assert_eq!(err, RuleSetError::DuplicateRule(FieldId::Message));
    }

    #[test]
    fn rejects_invalid_pattern() {
        let err = FieldRule::pattern(FieldId::Email, "([", "broken").unwrap_err();
        assert!(matches!(
            err,
            RuleSetError::InvalidPattern {
                field: FieldId::Email,
                ..
            }
        ));
    }
}
