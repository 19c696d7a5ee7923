//! Error type and options shared by the splitter, the command engine and
//! the edit orchestrators.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::AnchorRef;
use crate::undo::CommandState;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Logic error: {0}")]
    Logic(String),
    #[error("{kind} {uuid} does not exist")]
    ElementNotFound { kind: &'static str, uuid: Uuid },
    #[error("{kind} {uuid} already exists")]
    DuplicateElement { kind: &'static str, uuid: Uuid },
    #[error("Anchor {0} cannot be resolved")]
    UnresolvedAnchor(AnchorRef),
    #[error("Unknown layer: {0}")]
    UnknownLayer(String),
    #[error("Command \"{command}\" cannot do that in state {state:?}")]
    InvalidState {
        command: String,
        state: CommandState,
    },
    #[error("Clipboard format error: {0}")]
    ClipboardFormat(#[from] serde_json::Error),
}

impl EditError {
    pub fn logic(msg: impl Into<String>) -> Self {
        EditError::Logic(msg.into())
    }

    /// Programming faults abort the running edit; everything the model
    /// could simply not make sense of falls in this class.
    pub fn is_logic_fault(&self) -> bool {
        !matches!(self, EditError::ClipboardFormat(_))
    }
}

pub type EditResult<T> = Result<T, EditError>;

/// Options for the edit orchestrators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditOptions {
    /// Net class assigned to net signals created while pasting.
    pub default_net_class_name: String,
    /// Purge library devices and packages nothing refers to anymore after a
    /// removal.
    pub remove_unused_library_elements: bool,
    /// Vias keep their id when their segment is split. Junctions are always
    /// recreated with fresh ids.
    pub keep_via_uuids_on_split: bool,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            default_net_class_name: "default".to_string(),
            remove_unused_library_elements: true,
            keep_via_uuids_on_split: true,
        }
    }
}

impl EditOptions {
    pub fn from_json(json: &str) -> EditResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
