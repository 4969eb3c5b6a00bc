use serde::Serialize;
use serde_json::Value;

use crate::error::IntakeError;

/// A contact-form payload that passed presence validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub nome: String,
    pub email: String,
    pub mensagem: String,
}

impl Submission {
    /// Accepts `{ nome, email, mensagem }`. Every field must be a string that
    /// is not blank; the values are kept exactly as submitted.
    pub fn from_payload(payload: &Value) -> Result<Self, IntakeError> {
        let field = |key: &str| -> Result<String, IntakeError> {
            payload
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_owned)
                .ok_or(IntakeError::Validation)
        };

        Ok(Self {
            nome: field("nome")?,
            email: field("email")?,
            mensagem: field("mensagem")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_complete_payload() {
        let sub = Submission::from_payload(&json!({
            "nome": "Ana",
            "email": "ana@x.com",
            "mensagem": "Oi"
        }))
        .expect("valid submission");
        assert_eq!(sub.nome, "Ana");
        assert_eq!(sub.email, "ana@x.com");
        assert_eq!(sub.mensagem, "Oi");
    }

    #[test]
    fn rejects_missing_blank_or_non_string_fields() {
        let cases = [
            json!({ "email": "a@b.com", "mensagem": "hi" }),
            json!({ "nome": "", "email": "a@b.com", "mensagem": "hi" }),
            json!({ "nome": "Ana", "email": "   ", "mensagem": "hi" }),
            json!({ "nome": "Ana", "email": "a@b.com", "mensagem": 42 }),
            json!({ "nome": "Ana", "email": "a@b.com", "mensagem": null }),
            json!(null),
            json!([]),
        ];
        for case in cases {
            assert!(
                matches!(Submission::from_payload(&case), Err(IntakeError::Validation)),
                "{case} should be rejected"
            );
        }
    }

    #[test]
    fn email_shape_is_not_checked() {
        let sub = Submission::from_payload(&json!({
            "nome": "Ana",
            "email": "not-an-email",
            "mensagem": "Oi"
        }));
        assert!(sub.is_ok());
    }
}
