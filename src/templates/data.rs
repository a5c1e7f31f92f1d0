use crate::context::RequestContext;
use crate::db::models::Snippet;
use crate::error::{AppError, AppResult};
use chrono::{Datelike, Utc};
use serde::Serialize;

/// Everything a page template can read
///
/// `current_year`, `flash`, `is_authenticated` and `csrf_token` are always
/// filled in by [`TemplateData::new`]; the remaining fields are page payload.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
    pub form: Option<serde_json::Value>,
}

impl TemplateData {
    pub fn new(ctx: &RequestContext, flash: Option<String>) -> Self {
        Self {
            current_year: Utc::now().year(),
            flash,
            is_authenticated: ctx.is_authenticated,
            csrf_token: ctx.csrf_token.clone(),
            ..Default::default()
        }
    }

    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    pub fn with_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.snippets = snippets;
        self
    }

    /// Attach a form (submitted values plus validation errors)
    pub fn with_form<F: Serialize>(mut self, form: &F) -> AppResult<Self> {
        let value = serde_json::to_value(form)
            .map_err(|e| AppError::Internal(format!("Failed to serialize form: {}", e)))?;
        self.form = Some(value);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_fields_come_from_the_context() {
        let ctx = RequestContext {
            csrf_token: "token-123".to_string(),
            user_id: Some(4),
            is_authenticated: true,
        };

        let data = TemplateData::new(&ctx, Some("Saved!".to_string()));

        assert_eq!(data.current_year, Utc::now().year());
        assert_eq!(data.flash.as_deref(), Some("Saved!"));
        assert!(data.is_authenticated);
        assert_eq!(data.csrf_token, "token-123");
        assert!(data.snippet.is_none());
        assert!(data.form.is_none());
    }

    #[test]
    fn unserializable_form_is_an_error() {
        // JSON object keys must be strings
        let mut form = std::collections::BTreeMap::new();
        form.insert((1, 2), "value");

        let result = TemplateData::default().with_form(&form);

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn form_is_attached_as_json() {
        let data = TemplateData::default()
            .with_form(&crate::forms::SnippetCreateForm::new())
            .unwrap();

        let form = data.form.unwrap();
        assert_eq!(form["expires"], 365);
        assert!(form["validator"]["field_errors"].as_object().unwrap().is_empty());
    }
}
