//! Secure-manager command decoding.
//!
//! `Desc` is only looked at for the two commands that edit the container
//! hash list. Every other command passes with whatever `Desc` it carried
//! ignored.

use super::fields::{as_object, optional_str, require_array, require_str, FieldError};
use crate::codec::CommandMap;
use serde_json::Value;
use shared_types::{ContainerDescriptor, SecureCommand};

const SECURE_MGR: &str = "SecureMgr";
const CMD_TYPE: &str = "CmdType";
const DESC: &str = "Desc";
const CONTAINER_HASH: &str = "ContainerHash";

/// A secure-manager payload that failed validation.
///
/// The reported component is always the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureRejection {
    pub cause: FieldError,
}

pub fn parse_secure_command(command: &CommandMap) -> Result<SecureCommand, SecureRejection> {
    let secure_ins_name = optional_str(command, SECURE_MGR).unwrap_or_default().to_string();
    let cmd_type = optional_str(command, CMD_TYPE).unwrap_or_default().to_string();

    let desc = if SecureCommand::is_mutating(&cmd_type) {
        parse_desc(command).map_err(|cause| SecureRejection { cause })?
    } else {
        Vec::new()
    };

    Ok(SecureCommand {
        secure_ins_name,
        cmd_type,
        desc,
    })
}

fn parse_desc(command: &CommandMap) -> Result<Vec<ContainerDescriptor>, FieldError> {
    require_array(command, DESC)?
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_container(entry).map_err(|e| e.in_element(DESC, index)))
        .collect()
}

fn parse_container(entry: &Value) -> Result<ContainerDescriptor, FieldError> {
    let entry = as_object(entry, DESC)?;
    Ok(ContainerDescriptor {
        container_hash: require_str(entry, CONTAINER_HASH)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn command(value: Value) -> CommandMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_add_hash_with_desc() {
        let parsed = parse_secure_command(&command(json!({
            "SecureMgr": "containerVerifier",
            "CmdType": "addHashCWL",
            "Desc": [{"ContainerHash": "4b825dc6"}, {"ContainerHash": "e69de29b"}]
        })))
        .unwrap();

        assert_eq!(parsed.secure_ins_name, "containerVerifier");
        assert_eq!(parsed.cmd_type, "addHashCWL");
        assert_eq!(parsed.desc.len(), 2);
        assert_eq!(parsed.desc[1].container_hash, "e69de29b");
    }

    #[test]
    fn test_mutating_without_desc_rejected() {
        for cmd_type in ["addHashCWL", "delHashCWL"] {
            let rejection =
                parse_secure_command(&command(json!({ "CmdType": cmd_type }))).unwrap_err();
            assert_eq!(rejection.cause, FieldError::Missing("Desc"));
        }
    }

    #[test]
    fn test_mutating_with_bad_entry_rejected() {
        let rejection = parse_secure_command(&command(json!({
            "CmdType": "delHashCWL",
            "Desc": [{"ContainerHash": "4b825dc6"}, {"ContainerName": "web"}]
        })))
        .unwrap_err();
        assert!(matches!(
            rejection.cause,
            FieldError::Element { field: "Desc", index: 1, .. }
        ));

        let rejection = parse_secure_command(&command(json!({
            "CmdType": "addHashCWL",
            "Desc": ["4b825dc6"]
        })))
        .unwrap_err();
        assert!(matches!(rejection.cause, FieldError::Element { index: 0, .. }));
    }

    #[test]
    fn test_other_command_skips_desc() {
        let parsed = parse_secure_command(&command(json!({
            "CmdType": "unrelated",
            "Desc": "not even an array"
        })))
        .unwrap();

        assert_eq!(parsed.cmd_type, "unrelated");
        assert!(parsed.desc.is_empty());
    }

    #[test]
    fn test_everything_optional_for_empty_payload() {
        let parsed = parse_secure_command(&CommandMap::new()).unwrap();
        assert_eq!(parsed, SecureCommand::default());
    }

    #[test]
    fn test_non_string_optionals_are_empty() {
        let parsed = parse_secure_command(&command(json!({
            "SecureMgr": 12,
            "CmdType": ["addHashCWL"]
        })))
        .unwrap();
        assert_eq!(parsed.secure_ins_name, "");
        assert_eq!(parsed.cmd_type, "");
    }
}
