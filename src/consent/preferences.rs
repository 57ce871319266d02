//! Consent categories and persisted record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A consent category a user can grant or refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentCategory {
    Necessary,
    Analytics,
    Marketing,
    Preferences,
}

impl ConsentCategory {
    pub const ALL: [ConsentCategory; 4] = [
        ConsentCategory::Necessary,
        ConsentCategory::Analytics,
        ConsentCategory::Marketing,
        ConsentCategory::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentCategory::Necessary => "necessary",
            ConsentCategory::Analytics => "analytics",
            ConsentCategory::Marketing => "marketing",
            ConsentCategory::Preferences => "preferences",
        }
    }
}

/// The user's consent choices.
///
/// `necessary` is always true: it cannot be set through the API and is
/// forced back to true when a stored blob says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentPreferences {
    #[serde(default = "always_granted", deserialize_with = "force_granted")]
    necessary: bool,
    pub analytics: bool,
    pub marketing: bool,
    pub preferences: bool,
}

fn always_granted() -> bool {
    true
}

fn force_granted<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    bool::deserialize(deserializer)?;
    Ok(true)
}

impl ConsentPreferences {
    pub fn new(analytics: bool, marketing: bool, preferences: bool) -> Self {
        Self {
            necessary: true,
            analytics,
            marketing,
            preferences,
        }
    }

    pub fn accept_all() -> Self {
        Self::new(true, true, true)
    }

    /// Only the necessary category.
    pub fn reject_all() -> Self {
        Self::new(false, false, false)
    }

    pub fn necessary(&self) -> bool {
        self.necessary
    }

    pub fn is_granted(&self, category: ConsentCategory) -> bool {
        match category {
            ConsentCategory::Necessary => self.necessary,
            ConsentCategory::Analytics => self.analytics,
            ConsentCategory::Marketing => self.marketing,
            ConsentCategory::Preferences => self.preferences,
        }
    }

    /// Return a copy with `category` set to `granted`. Necessary stays on.
    pub fn with(mut self, category: ConsentCategory, granted: bool) -> Self {
        match category {
            ConsentCategory::Necessary => {}
            ConsentCategory::Analytics => self.analytics = granted,
            ConsentCategory::Marketing => self.marketing = granted,
            ConsentCategory::Preferences => self.preferences = granted,
        }
        self
    }

    /// Granted category names in canonical order.
    pub fn granted_scopes(&self) -> Vec<String> {
        ConsentCategory::ALL
            .iter()
            .filter(|c| self.is_granted(**c))
            .map(|c| c.as_str().to_string())
            .collect()
    }
}

impl Default for ConsentPreferences {
    fn default() -> Self {
        Self::reject_all()
    }
}

/// A complete persisted consent decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub given: bool,
    pub preferences: ConsentPreferences,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_only_necessary() {
        let prefs = ConsentPreferences::default();
        assert!(prefs.necessary());
        assert!(!prefs.analytics);
        assert!(!prefs.marketing);
        assert!(!prefs.preferences);
        assert_eq!(prefs.granted_scopes(), vec!["necessary"]);
    }

    #[test]
    fn test_necessary_cannot_be_revoked() {
        let prefs = ConsentPreferences::accept_all().with(ConsentCategory::Necessary, false);
        assert!(prefs.necessary());

        let decoded: ConsentPreferences = serde_json::from_str(
            r#"{"necessary":false,"analytics":true,"marketing":false,"preferences":false}"#,
        )
        .unwrap();
        assert!(decoded.necessary());
        assert!(decoded.analytics);

        let missing: ConsentPreferences =
            serde_json::from_str(r#"{"analytics":false,"marketing":true,"preferences":false}"#)
                .unwrap();
        assert!(missing.necessary());
        assert!(missing.marketing);
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let bad = serde_json::from_str::<ConsentPreferences>(
            r#"{"necessary":true,"analytics":"yes","marketing":false,"preferences":false}"#,
        );
        assert!(bad.is_err());

        let missing_field = serde_json::from_str::<ConsentPreferences>(r#"{"necessary":true}"#);
        assert!(missing_field.is_err());
    }

    #[test]
    fn test_granted_scopes_order() {
        let prefs = ConsentPreferences::new(true, false, true);
        assert_eq!(
            prefs.granted_scopes(),
            vec!["necessary", "analytics", "preferences"]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ConsentPreferences::new(true, false, false)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "necessary": true,
                "analytics": true,
                "marketing": false,
                "preferences": false
            })
        );
    }
}
