//! Template editor state.
//!
//! The editor owns a [`TemplateConfig`] and the invitation text shown in the
//! preview. All mutations go through [`TemplateEditor::apply`], which keeps
//! numeric values inside slider bounds and leaves state untouched when a
//! command is rejected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::preview::PreviewDevice;
use super::template_save::SaveOutcome;
use crate::models::invitation::{DraftField, InvitationDraft};
use crate::models::template::{
    find_color_preset, snap_duration, AnimationType, ColorSlot, FontSlot, LayoutMetric,
    LayoutStyle, NewCustomTemplate, TemplateConfig,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Invalid color value: {0}")]
    InvalidColor(String),

    #[error("Invalid font family: {0}")]
    InvalidFont(String),

    #[error("Unknown color preset: {0}")]
    UnknownPreset(String),

    #[error("Please sign in to save templates")]
    SignInRequired,

    #[error("Please enter a template name")]
    NameRequired,

    #[error("A save is already in progress")]
    SaveInProgress,
}

/// Editor panel currently shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTab {
    #[default]
    Colors,
    Fonts,
    Layout,
    Effects,
    Content,
}

/// Status line under the save button.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum EditorStatus {
    #[default]
    Idle,
    Success(String),
    Error(String),
}

/// A single user action in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    SetColor { slot: ColorSlot, value: String },
    SetFont { slot: FontSlot, value: String },
    SetLayoutStyle { style: LayoutStyle },
    SetLayoutMetric { metric: LayoutMetric, value: u32 },
    SetAnimationsEnabled { enabled: bool },
    SetAnimationType { kind: AnimationType },
    SetAnimationDuration { seconds: f64 },
    SetDraftField { field: DraftField, value: String },
    ApplyColorPreset { name: String },
    ResetConfig,
    SetPreviewDevice { device: PreviewDevice },
    ToggleFullscreen,
    SelectTab { tab: EditorTab },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TemplateEditor {
    pub config: TemplateConfig,
    pub draft: InvitationDraft,
    pub active_tab: EditorTab,
    pub preview_device: PreviewDevice,
    pub fullscreen: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub status: EditorStatus,
    pub saving: bool,
}

impl TemplateEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes editing an existing config and draft.
    pub fn with_state(config: TemplateConfig, draft: InvitationDraft) -> Self {
        Self {
            config,
            draft,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        match command {
            EditorCommand::SetColor { slot, value } => {
                let value = value.trim().to_string();
                if !shared::validation::is_css_color(&value) {
                    return Err(EditorError::InvalidColor(value));
                }
                self.config.colors.set(slot, value);
            }
            EditorCommand::SetFont { slot, value } => {
                let value = value.trim().to_string();
                if !shared::validation::is_font_family(&value) {
                    return Err(EditorError::InvalidFont(value));
                }
                self.config.fonts.set(slot, value);
            }
            EditorCommand::SetLayoutStyle { style } => self.config.layout.style = style,
            EditorCommand::SetLayoutMetric { metric, value } => {
                self.config.layout.set(metric, value)
            }
            EditorCommand::SetAnimationsEnabled { enabled } => {
                self.config.animations.enabled = enabled
            }
            EditorCommand::SetAnimationType { kind } => self.config.animations.kind = kind,
            EditorCommand::SetAnimationDuration { seconds } => {
                self.config.animations.duration = snap_duration(seconds)
            }
            EditorCommand::SetDraftField { field, value } => self.draft.set(field, value),
            EditorCommand::ApplyColorPreset { name } => {
                let preset =
                    find_color_preset(&name).ok_or(EditorError::UnknownPreset(name.clone()))?;
                self.config.colors = preset.scheme();
            }
            EditorCommand::ResetConfig => self.config = TemplateConfig::default(),
            EditorCommand::SetPreviewDevice { device } => self.preview_device = device,
            EditorCommand::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            EditorCommand::SelectTab { tab } => self.active_tab = tab,
        }
        Ok(())
    }

    /// Applies commands in order, stopping at the first rejected one.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditorCommand>,
    ) -> Result<(), EditorError> {
        commands.into_iter().try_for_each(|c| self.apply(c))
    }

    /// Starts a save and returns the payload to persist.
    pub fn begin_save(
        &mut self,
        user_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<NewCustomTemplate, EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        let Some(user_id) = user_id else {
            return Err(self.reject(EditorError::SignInRequired));
        };
        if self.draft.template_name.trim().is_empty() {
            return Err(self.reject(EditorError::NameRequired));
        }

        self.status = EditorStatus::Idle;
        self.saving = true;
        Ok(NewCustomTemplate::from_editor(
            user_id,
            &self.draft.template_name,
            self.config.clone(),
            today,
        ))
    }

    pub fn finish_save(&mut self, outcome: &SaveOutcome, now: DateTime<Utc>) {
        self.status = EditorStatus::Success(outcome.message().to_string());
        self.last_saved = Some(now);
        self.saving = false;
    }

    pub fn fail_save(&mut self, message: impl Into<String>) {
        self.status = EditorStatus::Error(message.into());
        self.saving = false;
    }

    fn reject(&mut self, err: EditorError) -> EditorError {
        self.status = EditorStatus::Error(err.to_string());
        err
    }
}
