use super::errors::{TemplateError, TemplateResult};
use super::value_objects::TemplateSettings;
use super::variables::{extract_variables, render};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Title stored when the user leaves it blank
pub const DEFAULT_TITLE: &str = "Untitled Prompt";

/// Editable fields of a template, independent of identity and ownership
///
/// This is the shape an editing session snapshots and hands to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplateFields {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub settings: TemplateSettings,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub variables: Option<BTreeMap<String, String>>,
    pub settings: Option<TemplateSettings>,
}

impl From<TemplateFields> for TemplatePatch {
    fn from(fields: TemplateFields) -> Self {
        Self {
            title: Some(fields.title),
            content: Some(fields.content),
            description: fields.description,
            variables: Some(fields.variables),
            settings: Some(fields.settings),
        }
    }
}

/// Template aggregate root
///
/// A saved prompt body owned by one user, plus the variable overrides the
/// user last entered and the tag string derived from its settings.
///
/// # Invariants
/// - Content is never blank
/// - Title is never blank (falls back to [`DEFAULT_TITLE`])
/// - `variables` may hold keys no longer present in the content; they are
///   kept so values survive edits to the body
///
/// # Example
/// ```
/// use promptdeck_api::domain::template::{Template, TemplateFields};
/// use uuid::Uuid;
///
/// let template = Template::new(
///     Uuid::new_v4(),
///     TemplateFields {
///         content: "Hello {{name}}".to_string(),
///         ..Default::default()
///     },
/// )
/// .expect("valid template");
///
/// assert_eq!(template.title(), "Untitled Prompt");
/// assert_eq!(template.variable_names(), vec!["name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    content: String,
    description: Option<String>,
    variables: BTreeMap<String, String>,
    tags: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Template {
    /// Creates a new Template owned by `owner_id`
    ///
    /// # Returns
    /// * `Ok(Template)` - with a fresh id and tags derived from the settings
    /// * `Err(TemplateError::Validation)` - if the content is blank
    pub fn new(owner_id: Uuid, fields: TemplateFields) -> TemplateResult<Self> {
        validate_content(&fields.content)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            title: normalize_title(fields.title),
            content: fields.content,
            description: fields.description,
            variables: fields.variables,
            tags: Some(fields.settings.to_tags()),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update and bumps `updated_at`
    ///
    /// Validation happens before anything is changed, so a rejected patch
    /// leaves the template as it was.
    pub fn apply(&mut self, patch: TemplatePatch) -> TemplateResult<()> {
        if let Some(content) = &patch.content {
            validate_content(content)?;
        }

        if let Some(title) = patch.title {
            self.title = normalize_title(title);
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(variables) = patch.variables {
            self.variables = variables;
        }
        if let Some(settings) = patch.settings {
            self.tags = Some(settings.to_tags());
        }
        self.updated_at = Utc::now();

        Ok(())
    }

    /// Variable names currently present in the body
    pub fn variable_names(&self) -> Vec<String> {
        extract_variables(&self.content)
    }

    /// Body with the stored overrides substituted
    pub fn resolved(&self) -> String {
        render(&self.content, &self.variables)
    }

    /// Settings reconstructed from the persisted tags
    pub fn settings(&self) -> TemplateSettings {
        self.tags
            .as_deref()
            .map(TemplateSettings::from_tags)
            .unwrap_or_default()
    }

    /// Editable fields, as loaded into an editing session
    pub fn fields(&self) -> TemplateFields {
        TemplateFields {
            title: self.title.clone(),
            content: self.content.clone(),
            description: self.description.clone(),
            variables: self.variables.clone(),
            settings: self.settings(),
        }
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn owner_id(&self) -> Uuid {
        self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    pub fn tags(&self) -> Option<&str> {
        self.tags.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Reconstructs a Template from persistence layer data
    ///
    /// Skips validation; only repository implementations should call this.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        owner_id: Uuid,
        title: String,
        content: String,
        description: Option<String>,
        variables: BTreeMap<String, String>,
        tags: Option<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            content,
            description,
            variables,
            tags,
            created_at,
            updated_at,
        }
    }
}

fn validate_content(content: &str) -> TemplateResult<()> {
    if content.trim().is_empty() {
        return Err(TemplateError::Validation(
            "Prompt content cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn normalize_title(title: String) -> String {
    if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::value_objects::{OutputFormat, Role, Tone};

    fn fields(title: &str, content: &str) -> TemplateFields {
        TemplateFields {
            title: title.to_string(),
            content: content.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn create_template_with_valid_content() {
        let owner = Uuid::new_v4();
        let template = Template::new(owner, fields("T", "Hello {{name}}")).unwrap();

        assert_eq!(template.owner_id(), owner);
        assert_eq!(template.title(), "T");
        assert_eq!(template.content(), "Hello {{name}}");
        assert_eq!(template.tags(), Some("professional,markdown,assistant"));
        assert_eq!(template.created_at(), template.updated_at());
    }

    #[test]
    fn create_template_with_blank_content_fails() {
        let result = Template::new(Uuid::new_v4(), fields("T", "  \n\t"));
        assert!(matches!(result, Err(TemplateError::Validation(_))));
    }

    #[test]
    fn blank_title_defaults() {
        let template = Template::new(Uuid::new_v4(), fields("   ", "body")).unwrap();
        assert_eq!(template.title(), DEFAULT_TITLE);
    }

    #[test]
    fn resolved_uses_stored_variables() {
        let mut f = fields("T", "Hello {{name}}");
        f.variables.insert("name".to_string(), "World".to_string());
        let template = Template::new(Uuid::new_v4(), f).unwrap();

        assert_eq!(template.variable_names(), vec!["name"]);
        assert_eq!(template.resolved(), "Hello World");
    }

    #[test]
    fn apply_patch_updates_fields_and_timestamp() {
        let mut template = Template::new(Uuid::new_v4(), fields("T", "old")).unwrap();
        let before = template.updated_at();

        template
            .apply(TemplatePatch {
                content: Some("new {{x}}".to_string()),
                settings: Some(TemplateSettings {
                    tone: Tone::Casual,
                    format: OutputFormat::Plain,
                    role: Role::Writer,
                    custom_role: String::new(),
                }),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(template.title(), "T");
        assert_eq!(template.content(), "new {{x}}");
        assert_eq!(template.tags(), Some("casual,plain,writer"));
        assert!(template.updated_at() >= before);
    }

    #[test]
    fn rejected_patch_changes_nothing() {
        let mut template = Template::new(Uuid::new_v4(), fields("T", "body")).unwrap();
        let snapshot = template.clone();

        let result = template.apply(TemplatePatch {
            title: Some("changed".to_string()),
            content: Some(" ".to_string()),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(template, snapshot);
    }

    #[test]
    fn stale_variables_are_kept() {
        let mut f = fields("T", "{{a}}");
        f.variables.insert("a".to_string(), "1".to_string());
        let mut template = Template::new(Uuid::new_v4(), f).unwrap();

        template
            .apply(TemplatePatch {
                content: Some("{{b}}".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(template.variables().get("a").map(String::as_str), Some("1"));
        assert_eq!(template.variable_names(), vec!["b"]);
    }

    #[test]
    fn fields_round_trip_settings_from_tags() {
        let mut f = fields("T", "body");
        f.settings.tone = Tone::Formal;
        let template = Template::new(Uuid::new_v4(), f).unwrap();

        assert_eq!(template.fields().settings.tone, Tone::Formal);
    }
}
