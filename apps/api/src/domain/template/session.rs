use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use super::errors::TemplateError;
use super::gateway::TemplateGateway;
use super::template::{Template, TemplateFields};
use super::value_objects::TemplateSettings;
use super::variables::{estimate_tokens, extract_variables, render};

/// Lifecycle state of an editing session
///
/// # State Transitions
/// ```text
/// New ----\                 /--> Saved
/// Loaded --+--> Dirty --> Saving
/// Saved --/        ^        \--> Dirty (failure)
///                  \____________/
/// any --> New (discard; confirmation required when Dirty)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    New,
    Loaded,
    Dirty,
    Saving,
    Saved,
}

impl SessionState {
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (New, Dirty)
                | (Loaded, Dirty)
                | (Saved, Dirty)
                | (Dirty, Saving)
                | (Saving, Saved)
                | (Saving, Dirty)
                | (_, New)
        )
    }
}

/// Errors from driving an editing session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Prompt content cannot be empty")]
    EmptyContent,

    #[error("There are no unsaved changes")]
    NoChanges,

    #[error("A save is already in progress")]
    SaveInFlight,

    #[error("No save is in progress")]
    NoSaveInFlight,

    #[error("Discarding unsaved changes requires confirmation")]
    ConfirmationRequired,

    #[error(transparent)]
    Gateway(#[from] TemplateError),
}

/// Snapshot handed to the gateway when a save starts
///
/// Edits made after the snapshot was taken are not part of this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Existing template to update, or `None` to create one
    pub template_id: Option<Uuid>,
    pub fields: TemplateFields,
}

impl SaveRequest {
    /// Sends the snapshot through the gateway as a create or an update
    pub async fn submit(
        self,
        gateway: &TemplateGateway,
        owner_id: Uuid,
    ) -> Result<Template, TemplateError> {
        match self.template_id {
            Some(id) => gateway.update(owner_id, id, self.fields.into()).await,
            None => gateway.create(owner_id, self.fields).await,
        }
    }
}

/// In-memory editing state of a single template
///
/// Holds the draft fields, tracks dirtiness relative to the last load or
/// successful save, and derives the variable list and preview from the
/// current content on demand.
#[derive(Debug, Clone)]
pub struct EditingSession {
    state: SessionState,
    template_id: Option<Uuid>,
    draft: TemplateFields,
    edited_while_saving: bool,
    last_error: Option<String>,
}

impl Default for EditingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSession {
    /// Starts an empty draft
    pub fn new() -> Self {
        Self {
            state: SessionState::New,
            template_id: None,
            draft: TemplateFields::default(),
            edited_while_saving: false,
            last_error: None,
        }
    }

    /// Starts a session on an existing template
    pub fn load(template: &Template) -> Self {
        Self {
            state: SessionState::Loaded,
            template_id: Some(template.id()),
            draft: template.fields(),
            edited_while_saving: false,
            last_error: None,
        }
    }

    // ===== Edits =====

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.touch();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = Some(description.into());
        self.touch();
    }

    /// Sets one variable override; keys are never pruned when content changes
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.draft.variables.insert(name.into(), value.into());
        self.touch();
    }

    pub fn set_settings(&mut self, settings: TemplateSettings) {
        self.draft.settings = settings;
        self.touch();
    }

    fn touch(&mut self) {
        match self.state {
            SessionState::Saving => self.edited_while_saving = true,
            _ => self.state = SessionState::Dirty,
        }
    }

    // ===== Save =====

    /// Snapshots the draft and enters `Saving`
    ///
    /// # Returns
    /// * `Err(SaveInFlight)` - while a previous save has not completed
    /// * `Err(EmptyContent)` - if the body is blank; no gateway call may follow
    /// * `Err(NoChanges)` - if nothing was edited since load or last save
    pub fn begin_save(&mut self) -> Result<SaveRequest, SessionError> {
        if self.state == SessionState::Saving {
            return Err(SessionError::SaveInFlight);
        }
        if self.draft.content.trim().is_empty() {
            return Err(SessionError::EmptyContent);
        }
        if !self.state.can_transition_to(SessionState::Saving) {
            return Err(SessionError::NoChanges);
        }

        self.state = SessionState::Saving;
        self.edited_while_saving = false;
        self.last_error = None;

        Ok(SaveRequest {
            template_id: self.template_id,
            fields: self.draft.clone(),
        })
    }

    /// Applies the gateway outcome of the save started by [`begin_save`](Self::begin_save)
    ///
    /// On success the session adopts the template id and becomes `Saved`,
    /// or `Dirty` if it was edited while the save was in flight. On failure
    /// it returns to `Dirty` with the error recorded; the draft is untouched.
    pub fn complete_save(
        &mut self,
        outcome: Result<Template, TemplateError>,
    ) -> Result<Template, SessionError> {
        if self.state != SessionState::Saving {
            return Err(SessionError::NoSaveInFlight);
        }

        match outcome {
            Ok(template) => {
                self.template_id = Some(template.id());
                self.state = if self.edited_while_saving {
                    SessionState::Dirty
                } else {
                    SessionState::Saved
                };
                self.edited_while_saving = false;
                Ok(template)
            }
            Err(e) => {
                self.state = SessionState::Dirty;
                self.edited_while_saving = false;
                self.last_error = Some(e.to_string());
                Err(SessionError::Gateway(e))
            }
        }
    }

    /// Runs a whole save against `gateway`
    pub async fn save(
        &mut self,
        gateway: &TemplateGateway,
        owner_id: Uuid,
    ) -> Result<Template, SessionError> {
        let request = self.begin_save()?;
        let outcome = request.submit(gateway, owner_id).await;
        self.complete_save(outcome)
    }

    /// Resets to an empty draft
    ///
    /// A dirty session is only discarded when `confirmed` is set. A session
    /// with a save in flight cannot be discarded.
    pub fn discard(&mut self, confirmed: bool) -> Result<(), SessionError> {
        if self.state == SessionState::Saving {
            return Err(SessionError::SaveInFlight);
        }
        if self.is_dirty() && !confirmed {
            return Err(SessionError::ConfirmationRequired);
        }
        *self = Self::new();
        Ok(())
    }

    // ===== Derived views =====

    pub fn detected_variables(&self) -> Vec<String> {
        extract_variables(&self.draft.content)
    }

    pub fn preview(&self) -> String {
        render(&self.draft.content, &self.draft.variables)
    }

    pub fn token_count(&self) -> usize {
        estimate_tokens(&self.draft.content)
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty || self.edited_while_saving
    }

    pub fn is_saving(&self) -> bool {
        self.state == SessionState::Saving
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn template_id(&self) -> Option<Uuid> {
        self.template_id
    }

    pub fn draft(&self) -> &TemplateFields {
        &self.draft
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.draft.variables
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::InMemoryTemplateRepository;
    use std::sync::Arc;

    fn gateway() -> TemplateGateway {
        TemplateGateway::new(Arc::new(InMemoryTemplateRepository::new()))
    }

    #[test]
    fn first_edit_marks_new_session_dirty() {
        let mut session = EditingSession::new();
        assert_eq!(session.state(), SessionState::New);
        assert!(!session.is_dirty());

        session.set_title("T");
        assert_eq!(session.state(), SessionState::Dirty);
        assert!(session.is_dirty());
    }

    #[test]
    fn preview_follows_content_and_variables() {
        let mut session = EditingSession::new();
        session.set_title("T");
        session.set_content("Hello {{name}}");

        assert_eq!(session.detected_variables(), vec!["name"]);
        assert_eq!(session.preview(), "Hello {{name}}");

        session.set_variable("name", "World");
        assert_eq!(session.preview(), "Hello World");
        assert_eq!(session.token_count(), 4);
    }

    #[test]
    fn blank_body_cannot_be_saved() {
        let mut session = EditingSession::new();
        session.set_content("  \n ");

        assert_eq!(session.begin_save(), Err(SessionError::EmptyContent));
        assert_eq!(session.state(), SessionState::Dirty);
    }

    #[test]
    fn second_save_rejected_while_in_flight() {
        let mut session = EditingSession::new();
        session.set_content("body");

        session.begin_save().unwrap();
        assert_eq!(session.begin_save(), Err(SessionError::SaveInFlight));
    }

    #[test]
    fn save_snapshot_excludes_later_edits() {
        let mut session = EditingSession::new();
        session.set_content("first");

        let request = session.begin_save().unwrap();
        session.set_content("second");

        assert_eq!(request.fields.content, "first");
        assert_eq!(session.state(), SessionState::Saving);
        assert!(session.is_dirty());
    }

    #[test]
    fn failed_save_returns_to_dirty_with_edits_intact() {
        let mut session = EditingSession::new();
        session.set_content("body");
        session.begin_save().unwrap();

        let result = session.complete_save(Err(TemplateError::Unexpected(
            "Failed to create prompt".to_string(),
        )));

        assert!(result.is_err());
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.draft().content, "body");
        assert_eq!(session.last_error(), Some("Failed to create prompt"));
    }

    #[test]
    fn complete_without_begin_is_rejected() {
        let mut session = EditingSession::new();
        let result = session.complete_save(Err(TemplateError::NotFound));
        assert_eq!(result.unwrap_err(), SessionError::NoSaveInFlight);
    }

    #[test]
    fn discard_dirty_requires_confirmation() {
        let mut session = EditingSession::new();
        session.set_content("keep me");

        assert_eq!(session.discard(false), Err(SessionError::ConfirmationRequired));
        assert_eq!(session.draft().content, "keep me");

        session.discard(true).unwrap();
        assert_eq!(session.state(), SessionState::New);
        assert!(session.draft().content.is_empty());
    }

    #[test]
    fn discard_rejected_while_saving() {
        let mut session = EditingSession::new();
        session.set_content("in flight");
        session.begin_save().unwrap();

        assert_eq!(session.discard(true), Err(SessionError::SaveInFlight));
        assert_eq!(session.state(), SessionState::Saving);
        assert_eq!(session.draft().content, "in flight");
    }

    #[test]
    fn transition_table() {
        assert!(SessionState::New.can_transition_to(SessionState::Dirty));
        assert!(SessionState::Dirty.can_transition_to(SessionState::Saving));
        assert!(SessionState::Saving.can_transition_to(SessionState::Saved));
        assert!(SessionState::Saving.can_transition_to(SessionState::Dirty));
        assert!(SessionState::Saved.can_transition_to(SessionState::New));
        assert!(!SessionState::New.can_transition_to(SessionState::Saving));
        assert!(!SessionState::Loaded.can_transition_to(SessionState::Saved));
    }

    #[tokio::test]
    async fn save_new_then_update_existing() {
        let gateway = gateway();
        let owner = Uuid::new_v4();
        let mut session = EditingSession::new();
        session.set_title("T");
        session.set_content("Hello {{name}}");

        let created = session.save(&gateway, owner).await.unwrap();
        assert_eq!(session.state(), SessionState::Saved);
        assert_eq!(session.template_id(), Some(created.id()));
        assert_eq!(session.save(&gateway, owner).await, Err(SessionError::NoChanges));

        session.set_variable("name", "World");
        let updated = session.save(&gateway, owner).await.unwrap();
        assert_eq!(updated.id(), created.id());
        assert_eq!(updated.resolved(), "Hello World");
    }

    #[tokio::test]
    async fn edits_during_save_leave_session_dirty() {
        let gateway = gateway();
        let owner = Uuid::new_v4();
        let mut session = EditingSession::new();
        session.set_content("first");

        let request = session.begin_save().unwrap();
        session.set_content("second");
        let outcome = request.submit(&gateway, owner).await;
        let saved = session.complete_save(outcome).unwrap();

        assert_eq!(saved.content(), "first");
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.draft().content, "second");
    }

    #[tokio::test]
    async fn loaded_session_becomes_dirty_on_edit() {
        let gateway = gateway();
        let owner = Uuid::new_v4();
        let template = gateway
            .create(
                owner,
                TemplateFields {
                    content: "body".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut session = EditingSession::load(&template);
        assert_eq!(session.state(), SessionState::Loaded);
        assert!(!session.is_dirty());

        session.set_description("notes");
        assert_eq!(session.state(), SessionState::Dirty);
    }
}
