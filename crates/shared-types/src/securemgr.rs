//! # Secure Manager Types
//!
//! Commands from the secure-configuration application to the secure manager,
//! which keeps the container hash allow-list.

use crate::messages;
use serde::{Deserialize, Serialize};

/// Command kind that adds hashes to the container white list.
pub const ADD_HASH_CWL: &str = "addHashCWL";

/// Command kind that removes hashes from the container white list.
pub const DEL_HASH_CWL: &str = "delHashCWL";

/// Component name reported when a secure-manager payload is rejected.
pub const VERIFIER: &str = "verifier";

/// One container image identified by its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDescriptor {
    pub container_hash: String,
}

/// A validated secure-manager command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureCommand {
    /// Target secure-manager instance; empty when the caller gave none.
    #[serde(rename = "SecureMgr", default)]
    pub secure_ins_name: String,
    /// Command discriminator; empty when the caller gave none.
    #[serde(rename = "CmdType", default)]
    pub cmd_type: String,
    /// Container descriptors. Only populated for mutating commands.
    #[serde(rename = "Desc", default)]
    pub desc: Vec<ContainerDescriptor>,
}

impl SecureCommand {
    /// Whether `cmd_type` names a command that changes the hash list.
    pub fn is_mutating(cmd_type: &str) -> bool {
        cmd_type == ADD_HASH_CWL || cmd_type == DEL_HASH_CWL
    }
}

/// Answer from the secure manager, also the decrypted response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecureResponse {
    pub message: String,
    pub secure_cmp_name: String,
}

impl SecureResponse {
    /// Response for a payload that failed validation.
    pub fn invalid_parameter() -> Self {
        Self {
            message: messages::INVALID_PARAMETER.to_string(),
            secure_cmp_name: VERIFIER.to_string(),
        }
    }
}
