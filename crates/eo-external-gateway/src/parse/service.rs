//! Service request decoding.
//!
//! Field order matters only for what a rejection reports: a failure before
//! `ServiceName` parsed reports an empty name, a failure after it reports
//! the name.

use super::fields::{as_object, optional_str, require_array, require_str, require_string_array, FieldError};
use crate::codec::CommandMap;
use serde_json::Value;
use shared_types::{ExecutionDescriptor, ServiceRequest};

const SELF_SELECTION: &str = "SelfSelection";
const SERVICE_REQUESTER: &str = "ServiceRequester";
const SERVICE_NAME: &str = "ServiceName";
const SERVICE_INFO: &str = "ServiceInfo";
const EXECUTION_TYPE: &str = "ExecutionType";
const EXEC_CMD: &str = "ExecCmd";

/// A service payload that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRejection {
    /// Service name parsed before the failure, empty if none.
    pub service_name: String,
    pub cause: FieldError,
}

impl ServiceRejection {
    fn unnamed(cause: FieldError) -> Self {
        Self {
            service_name: String::new(),
            cause,
        }
    }

    fn named(service_name: &str, cause: FieldError) -> Self {
        Self {
            service_name: service_name.to_string(),
            cause,
        }
    }
}

/// Decode a service request.
///
/// `resolved_requester` is the name found for the caller's source port. When
/// present it is used as-is and any `ServiceRequester` field is ignored.
pub fn parse_service_request(
    command: &CommandMap,
    resolved_requester: Option<String>,
) -> Result<ServiceRequest, ServiceRejection> {
    let self_selection = parse_self_selection(command);

    let service_requester = match resolved_requester {
        Some(name) => name,
        None => require_str(command, SERVICE_REQUESTER)
            .map_err(ServiceRejection::unnamed)?
            .to_string(),
    };

    let service_name = require_str(command, SERVICE_NAME).map_err(ServiceRejection::unnamed)?;

    let service_info = parse_service_info(command)
        .map_err(|cause| ServiceRejection::named(service_name, cause))?;

    Ok(ServiceRequest {
        service_name: service_name.to_string(),
        service_requester,
        self_selection,
        service_info,
    })
}

/// Absent and non-string values count as unset and select `true`; a string
/// selects `true` only when it is exactly `"true"`.
fn parse_self_selection(command: &CommandMap) -> bool {
    match optional_str(command, SELF_SELECTION) {
        None | Some("true") => true,
        Some(_) => false,
    }
}

fn parse_service_info(command: &CommandMap) -> Result<Vec<ExecutionDescriptor>, FieldError> {
    require_array(command, SERVICE_INFO)?
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_descriptor(entry).map_err(|e| e.in_element(SERVICE_INFO, index)))
        .collect()
}

fn parse_descriptor(entry: &Value) -> Result<ExecutionDescriptor, FieldError> {
    let entry = as_object(entry, SERVICE_INFO)?;
    let execution_type = require_str(entry, EXECUTION_TYPE)?.to_string();
    let exec_cmd = require_string_array(entry, EXEC_CMD)?;

    Ok(ExecutionDescriptor {
        execution_type,
        exec_cmd,
    })
}
