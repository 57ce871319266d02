//! Form field redaction.
//!
//! Decides which forms and fields form tracking may capture, and what a
//! captured value looks like:
//! - denied forms and denied fields are never captured
//! - `email` and `phone` fields become fixed masks
//! - any other value has email, phone, SSN and card-number patterns replaced

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::FormTrackingConfig;
use crate::logging::structured::LogContext;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    static ref PHONE_PATTERN: Regex = Regex::new(
        r"(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}"
    ).unwrap();

    static ref SSN_PATTERN: Regex = Regex::new(
        r"\b\d{3}-\d{2}-\d{4}\b"
    ).unwrap();

    static ref CC_PATTERN: Regex = Regex::new(
        r"\b(?:\d{4}[-\s]?){3}\d{4}\b"
    ).unwrap();
}

pub const EMAIL_MASK: &str = "***@***.***";
pub const PHONE_MASK: &str = "***-***-****";

/// One input element of a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub id: String,
    pub value: String,
}

impl FormField {
    pub fn new(name: &str, id: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            value: value.to_string(),
        }
    }

    fn is(&self, key: &str) -> bool {
        self.name == key || self.id == key
    }
}

/// Counts of what a redaction pass replaced.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RedactionResult {
    pub emails_found: usize,
    pub phones_found: usize,
    pub ssns_found: usize,
    pub ccs_found: usize,
    pub fields_masked: usize,
    pub fields_skipped: usize,
}

impl RedactionResult {
    pub fn total_entities(&self) -> usize {
        self.emails_found + self.phones_found + self.ssns_found + self.ccs_found
    }
}

/// Form tracking policy built from [`FormTrackingConfig`].
#[derive(Debug, Clone)]
pub struct FormFieldPolicy {
    config: FormTrackingConfig,
}

impl FormFieldPolicy {
    pub fn new(config: &FormTrackingConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Whether a form with the given CSS classes is tracked at all.
    pub fn is_form_tracked(&self, classes: &[&str]) -> bool {
        let denied = classes
            .iter()
            .any(|class| self.config.form_denylist.iter().any(|d| d == class));
        if denied {
            return false;
        }
        self.config.form_allowlist.is_empty()
            || classes
                .iter()
                .any(|class| self.config.form_allowlist.iter().any(|a| a == class))
    }

    /// The value form tracking may record for `field`, or `None` if the
    /// field is never captured.
    pub fn transform(&self, field: &FormField, result: &mut RedactionResult) -> Option<String> {
        if self.config.field_denylist.iter().any(|denied| field.is(denied)) {
            result.fields_skipped += 1;
            return None;
        }
        if field.is("email") {
            result.fields_masked += 1;
            return Some(EMAIL_MASK.to_string());
        }
        if field.is("phone") {
            result.fields_masked += 1;
            return Some(PHONE_MASK.to_string());
        }
        Some(scrub_text(&field.value, result))
    }

    /// Redact a whole submission. `None` when the form is not tracked.
    pub fn redact_form(
        &self,
        classes: &[&str],
        fields: &[FormField],
        ctx: &LogContext,
    ) -> Option<Vec<(String, String)>> {
        if !self.is_form_tracked(classes) {
            log::debug!("{} FORM_SKIPPED classes={:?}", ctx, classes);
            return None;
        }

        let mut result = RedactionResult::default();
        let captured: Vec<(String, String)> = fields
            .iter()
            .filter_map(|field| {
                self.transform(field, &mut result)
                    .map(|value| (field.name.clone(), value))
            })
            .collect();

        if result.total_entities() > 0 || result.fields_masked > 0 {
            log::info!(
                "{} FORM_REDACTED emails={} phones={} ssns={} ccs={} masked={} skipped={}",
                ctx,
                result.emails_found,
                result.phones_found,
                result.ssns_found,
                result.ccs_found,
                result.fields_masked,
                result.fields_skipped
            );
        }

        Some(captured)
    }
}

/// Replace PII patterns in free text.
pub fn scrub_text(s: &str, result: &mut RedactionResult) -> String {
    let mut scrubbed = s.to_string();

    let email_count = EMAIL_PATTERN.find_iter(&scrubbed).count();
    if email_count > 0 {
        result.emails_found += email_count;
        scrubbed = EMAIL_PATTERN.replace_all(&scrubbed, EMAIL_MASK).to_string();
    }

    // card numbers before phones; a 16-digit run also matches the phone pattern
    let cc_count = CC_PATTERN.find_iter(&scrubbed).count();
    if cc_count > 0 {
        result.ccs_found += cc_count;
        scrubbed = CC_PATTERN.replace_all(&scrubbed, "[CREDIT_CARD]").to_string();
    }

    let ssn_count = SSN_PATTERN.find_iter(&scrubbed).count();
    if ssn_count > 0 {
        result.ssns_found += ssn_count;
        scrubbed = SSN_PATTERN.replace_all(&scrubbed, "[SSN]").to_string();
    }

    let phone_count = PHONE_PATTERN.find_iter(&scrubbed).count();
    if phone_count > 0 {
        result.phones_found += phone_count;
        scrubbed = PHONE_PATTERN.replace_all(&scrubbed, PHONE_MASK).to_string();
    }

    scrubbed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> FormFieldPolicy {
        FormFieldPolicy::new(&FormTrackingConfig::default())
    }

    #[test]
    fn test_no_track_form_ignored() {
        let policy = policy();
        assert!(!policy.is_form_tracked(&["bg-white", "no-track"]));
        assert!(policy.is_form_tracked(&["contact-form"]));
        assert!(policy.is_form_tracked(&[]));
    }

    #[test]
    fn test_allowlist_restricts() {
        let config = FormTrackingConfig {
            form_allowlist: vec!["contact-form".to_string()],
            ..FormTrackingConfig::default()
        };
        let policy = FormFieldPolicy::new(&config);
        assert!(policy.is_form_tracked(&["contact-form"]));
        assert!(!policy.is_form_tracked(&["newsletter"]));
        assert!(!policy.is_form_tracked(&["contact-form", "no-track"]));
    }

    #[test]
    fn test_denied_fields_never_captured() {
        let policy = policy();
        let mut result = RedactionResult::default();
        for name in ["password", "ssn", "credit-card"] {
            let field = FormField::new(name, "", "secret");
            assert_eq!(policy.transform(&field, &mut result), None);
        }
        let by_id = FormField::new("pw", "password", "secret");
        assert_eq!(policy.transform(&by_id, &mut result), None);
        assert_eq!(result.fields_skipped, 4);
    }

    #[test]
    fn test_email_and_phone_masked() {
        let policy = policy();
        let mut result = RedactionResult::default();
        assert_eq!(
            policy
                .transform(&FormField::new("email", "", "reader@example.com"), &mut result)
                .as_deref(),
            Some(EMAIL_MASK)
        );
        assert_eq!(
            policy
                .transform(&FormField::new("contact", "phone", "555-123-4567"), &mut result)
                .as_deref(),
            Some(PHONE_MASK)
        );
        assert_eq!(result.fields_masked, 2);
    }

    #[test]
    fn test_free_text_scrubbed() {
        let mut result = RedactionResult::default();
        let scrubbed = scrub_text("Reach me at john@example.com or 555-123-4567", &mut result);
        assert_eq!(scrubbed, "Reach me at ***@***.*** or ***-***-****");
        assert_eq!(result.emails_found, 1);
        assert_eq!(result.phones_found, 1);
    }

    #[test]
    fn test_card_number_scrubbed() {
        let mut result = RedactionResult::default();
        let scrubbed = scrub_text("card 4111 1111 1111 1111", &mut result);
        assert_eq!(scrubbed, "card [CREDIT_CARD]");
        assert_eq!(result.ccs_found, 1);
        assert_eq!(result.phones_found, 0);
    }

    #[test]
    fn test_plain_text_untouched() {
        let mut result = RedactionResult::default();
        let original = "Loved the article on data privacy";
        assert_eq!(scrub_text(original, &mut result), original);
        assert_eq!(result.total_entities(), 0);
    }

    #[test]
    fn test_redact_form() {
        let ctx = LogContext::new("s-1");
        let fields = vec![
            FormField::new("name", "name", "Jane"),
            FormField::new("email", "email", "jane@example.com"),
            FormField::new("password", "password", "hunter2"),
            FormField::new("message", "message", "call 555-123-4567"),
        ];

        let captured = policy()
            .redact_form(&["contact-form"], &fields, &ctx)
            .unwrap();
        assert_eq!(
            captured,
            vec![
                ("name".to_string(), "Jane".to_string()),
                ("email".to_string(), EMAIL_MASK.to_string()),
                ("message".to_string(), format!("call {}", PHONE_MASK)),
            ]
        );
        assert!(policy().redact_form(&["no-track"], &fields, &ctx).is_none());
    }
}
