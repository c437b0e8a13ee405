//! Redaction of sensitive attributes
//!
//! Credential material never reaches the audit store. The denylist is fixed
//! and applied to every attribute map before diffing or storage.

use super::record::Attributes;

/// Field names that are always stripped from captured attributes
pub const REDACTED_FIELDS: [&str; 4] = [
    "password",
    "remember_token",
    "two_factor_secret",
    "two_factor_recovery_codes",
];

/// Whether a field name is on the redaction denylist
pub fn is_redacted(field: &str) -> bool {
    REDACTED_FIELDS.contains(&field)
}

/// Return a copy of `attributes` without any denylisted field
pub fn redact(attributes: &Attributes) -> Attributes {
    attributes
        .iter()
        .filter(|(key, _)| !is_redacted(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Strip denylisted fields in place
pub fn redact_in_place(attributes: &mut Attributes) {
    for field in REDACTED_FIELDS {
        attributes.remove(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_attributes() -> Attributes {
        json!({
            "name": "Dana Carer",
            "email": "dana@example.com",
            "password": "$2y$10$hash",
            "remember_token": "tok",
            "two_factor_secret": "secret",
            "two_factor_recovery_codes": ["a", "b"],
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_redact_removes_all_denylisted_fields() {
        let filtered = redact(&user_attributes());

        for field in REDACTED_FIELDS {
            assert!(!filtered.contains_key(field), "{} leaked", field);
        }
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered["email"], json!("dana@example.com"));
    }

    #[test]
    fn test_redact_without_sensitive_fields_is_identity() {
        let attrs = json!({"name": "Acme Agency", "phone": "555-0100"})
            .as_object()
            .cloned()
            .unwrap();
        assert_eq!(redact(&attrs), attrs);
    }

    #[test]
    fn test_redact_in_place_matches_redact() {
        let mut attrs = user_attributes();
        let expected = redact(&attrs);
        redact_in_place(&mut attrs);
        assert_eq!(attrs, expected);
    }

    #[test]
    fn test_is_redacted_is_exact_match() {
        assert!(is_redacted("password"));
        assert!(!is_redacted("password_changed_at"));
    }
}
