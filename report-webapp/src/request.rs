//! Outbound multipart payload

use crate::types::{Attachment, CallerIdentity};

/// Multipart field carrying the caller's numeric id
pub const USER_ID_FIELD: &str = "telegram_user_id";
/// Multipart field carrying the caller's display name
pub const USER_FULLNAME_FIELD: &str = "telegram_user_fullname";

/// Everything sent in one report POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    /// Text parts in send order: form fields, then the identity fields
    pub fields: Vec<(String, String)>,
    pub attachment: Option<Attachment>,
}

impl SubmissionRequest {
    /// Form fields plus the identity fields derived from `identity`
    ///
    /// Form fields that reuse an identity field name are dropped so the
    /// backend never sees two competing values.
    pub fn build(
        form_fields: Vec<(String, String)>,
        attachment: Option<Attachment>,
        identity: &CallerIdentity,
    ) -> Self {
        let mut fields: Vec<(String, String)> = form_fields
            .into_iter()
            .filter(|(name, _)| name != USER_ID_FIELD && name != USER_FULLNAME_FIELD)
            .collect();
        fields.push((USER_ID_FIELD.to_string(), identity.id.to_string()));
        fields.push((USER_FULLNAME_FIELD.to_string(), identity.full_name()));

        Self { fields, attachment }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_identity_fields_after_form_fields() {
        let identity = CallerIdentity::new(42).with_names(Some("Ann"), None);
        let request = SubmissionRequest::build(
            vec![
                ("truck_number".to_string(), "TX-1".to_string()),
                (USER_ID_FIELD.to_string(), "999".to_string()),
            ],
            None,
            &identity,
        );

        assert_eq!(
            request.fields,
            vec![
                ("truck_number".to_string(), "TX-1".to_string()),
                (USER_ID_FIELD.to_string(), "42".to_string()),
                (USER_FULLNAME_FIELD.to_string(), "Ann".to_string()),
            ]
        );
        assert_eq!(request.field(USER_ID_FIELD), Some("42"));
    }

    #[test]
    fn nameless_identity_sends_empty_fullname() {
        let request = SubmissionRequest::build(Vec::new(), None, &CallerIdentity::new(7));
        assert_eq!(request.field(USER_FULLNAME_FIELD), Some(""));
    }
}
