//! Control commands arriving on the `control:commands` channel.

use serde::{Deserialize, Serialize};
use swarmsong_core::{ModeConfig, ModeManager, ModePreset};

use crate::adapter::PersistenceAdapter;
use crate::error::StoreError;

/// Mode argument of a `set_mode` command: a preset name or a full custom
/// config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModeSpec {
    Preset(String),
    Custom(ModeConfig),
}

/// External command schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ControlCommand {
    #[serde(rename = "apply_optimization_suggestion")]
    ApplySuggestion {
        #[serde(rename = "suggestionId")]
        suggestion_id: String,
        #[serde(rename = "approvedBy")]
        approved_by: String,
    },

    #[serde(rename = "reject_suggestion")]
    RejectSuggestion {
        #[serde(rename = "suggestionId")]
        suggestion_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    #[serde(rename = "set_mode")]
    SetMode { mode: ModeSpec },

    #[serde(rename = "request_suggestion_update")]
    RequestSuggestionUpdate,
}

/// Applies control commands against the store and the mode manager.
pub struct CommandHandler<'a> {
    adapter: &'a PersistenceAdapter,
    modes: &'a ModeManager,
}

impl<'a> CommandHandler<'a> {
    pub fn new(adapter: &'a PersistenceAdapter, modes: &'a ModeManager) -> Self {
        Self { adapter, modes }
    }

    /// Parses and handles one raw channel message.
    pub fn handle_raw(&self, message: &str) -> Result<(), StoreError> {
        let command: ControlCommand = serde_json::from_str(message)?;
        self.handle(command)
    }

    pub fn handle(&self, command: ControlCommand) -> Result<(), StoreError> {
        match command {
            ControlCommand::ApplySuggestion {
                suggestion_id,
                approved_by,
            } => self.adapter.apply_suggestion(&suggestion_id, &approved_by),
            ControlCommand::RejectSuggestion {
                suggestion_id,
                reason,
            } => {
                if let Some(reason) = reason {
                    log::info!("suggestion {suggestion_id} rejected: {reason}");
                }
                self.adapter.reject_suggestion(&suggestion_id)
            }
            ControlCommand::SetMode { mode } => {
                let label = match mode {
                    ModeSpec::Preset(ref name) => match ModePreset::parse(name) {
                        Some(preset) => {
                            self.modes.set_mode(preset);
                            preset.as_str().to_string()
                        }
                        None => {
                            log::warn!("unknown mode preset '{name}', keeping current mode");
                            return Ok(());
                        }
                    },
                    ModeSpec::Custom(config) => {
                        self.modes.set_custom_mode(config);
                        "custom".to_string()
                    }
                };
                self.adapter.record_mode(&label)
            }
            ControlCommand::RequestSuggestionUpdate => self.adapter.publish_suggestions(),
        }
    }
}
