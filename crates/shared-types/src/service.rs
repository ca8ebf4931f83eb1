//! # Service Placement Types
//!
//! Requests from local service applications to the orchestrator and the
//! orchestrator's answer.

use crate::messages;
use serde::{Deserialize, Serialize};

/// How to execute one instance of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionDescriptor {
    /// Execution environment, e.g. `native` or `container`.
    pub execution_type: String,
    /// Command line, one argument per element.
    pub exec_cmd: Vec<String>,
}

/// A fully validated service placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRequest {
    /// Name of the service to place.
    pub service_name: String,
    /// Logical name of the local application asking for the service.
    pub service_requester: String,
    /// Whether this node may select itself as the execution target.
    pub self_selection: bool,
    /// Candidate execution descriptors, in caller order.
    pub service_info: Vec<ExecutionDescriptor>,
}

/// Where the orchestrator decided to run the service.
///
/// Both fields are empty when no dispatch took place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetInfo {
    pub execution_type: String,
    pub target: String,
}

/// Answer to a service request, as returned by the orchestrator and as sent
/// back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceResponse {
    pub message: String,
    pub service_name: String,
    pub remote_target_info: TargetInfo,
}

impl ServiceResponse {
    /// Response for a payload that failed validation.
    ///
    /// `service_name` is whatever name had been parsed before the failure,
    /// possibly empty.
    pub fn invalid_parameter(service_name: impl Into<String>) -> Self {
        Self {
            message: messages::INVALID_PARAMETER.to_string(),
            service_name: service_name.into(),
            remote_target_info: TargetInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_wire_shape() {
        let response = ServiceResponse {
            message: messages::ERROR_NONE.to_string(),
            service_name: "ls".to_string(),
            remote_target_info: TargetInfo {
                execution_type: "native".to_string(),
                target: "10.0.0.7".to_string(),
            },
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["Message"], "ERROR_NONE");
        assert_eq!(value["ServiceName"], "ls");
        assert_eq!(value["RemoteTargetInfo"]["ExecutionType"], "native");
        assert_eq!(value["RemoteTargetInfo"]["Target"], "10.0.0.7");
    }

    #[test]
    fn test_invalid_parameter_has_empty_target() {
        let response = ServiceResponse::invalid_parameter("");
        assert_eq!(response.message, messages::INVALID_PARAMETER);
        assert!(response.service_name.is_empty());
        assert_eq!(response.remote_target_info, TargetInfo::default());
    }

    #[test]
    fn test_descriptor_field_names() {
        let json = r#"{"ExecutionType":"container","ExecCmd":["docker","run"]}"#;
        let descriptor: ExecutionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.execution_type, "container");
        assert_eq!(descriptor.exec_cmd, vec!["docker", "run"]);
    }
}
