//! # Forms
//!
//! Each HTML form has a struct that is decoded from the urlencoded body with
//! `axum::Form`, validated in place, and handed back to the template when it
//! has to be re-displayed. Validation errors live in the form's own
//! [`Validator`], so templates read them as `form.validator.field_errors.title`.
//!
//! Passwords are never serialized back into a page.

pub mod validator;

pub use validator::Validator;

use serde::{Deserialize, Serialize};
use validator::{matches, max_chars, min_chars, not_blank, permitted_value, EMAIL_RX};

pub const BLANK: &str = "This field cannot be blank";
pub const EXPIRES_OPTIONS: [i64; 3] = [1, 7, 365];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Zero when no option was picked, which fails validation
    #[serde(default)]
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SnippetCreateForm {
    /// Blank form shown on `GET /snippet/create`
    pub fn new() -> Self {
        Self {
            expires: 365,
            ..Default::default()
        }
    }

    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.title), "title", BLANK);
        v.check_field(
            max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", BLANK);
        v.check_field(
            permitted_value(&self.expires, &EXPIRES_OPTIONS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserSignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl UserSignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.name), "name", BLANK);
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(
            min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserLoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl UserLoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(
            matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(title: &str, content: &str, expires: i64) -> SnippetCreateForm {
        SnippetCreateForm {
            title: title.to_string(),
            content: content.to_string(),
            expires,
            ..Default::default()
        }
    }

    #[test]
    fn snippet_form_accepts_valid_input() {
        for expires in EXPIRES_OPTIONS {
            assert!(snippet("t", "body", expires).validate());
        }
        assert!(snippet(&"x".repeat(100), "body", 7).validate());
    }

    #[test]
    fn snippet_form_reports_each_field() {
        let mut form = snippet("", "   ", 30);
        assert!(!form.validate());
        assert_eq!(form.validator.field_errors["title"], BLANK);
        assert_eq!(form.validator.field_errors["content"], BLANK);
        assert_eq!(
            form.validator.field_errors["expires"],
            "This field must equal 1, 7 or 365"
        );

        let mut form = snippet(&"x".repeat(101), "body", 1);
        assert!(!form.validate());
        assert!(form.validator.field_errors["title"].contains("100 characters"));
    }

    #[test]
    fn signup_form_rules() {
        let mut form = UserSignupForm {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            ..Default::default()
        };
        assert!(!form.validate());
        assert!(form.validator.field_errors.contains_key("email"));
        assert!(form.validator.field_errors.contains_key("password"));
        assert!(!form.validator.field_errors.contains_key("name"));
    }

    #[test]
    fn password_is_never_serialized() {
        let form = UserLoginForm {
            email: "alice@example.com".to_string(),
            password: "pa$$word".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn blank_snippet_form_defaults_to_one_year() {
        assert_eq!(SnippetCreateForm::new().expires, 365);
    }
}
