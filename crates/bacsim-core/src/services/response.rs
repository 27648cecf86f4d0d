use super::ConfirmedService;
use crate::types::{ErrorClass, ErrorCode, ObjectId, PropertyId, PropertyValue, RejectReason};

/// The engine's answer to a confirmed request, for the stack to encode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Response {
    ReadPropertyAck(ReadPropertyAck),
    SimpleAck {
        service: ConfirmedService,
    },
    Error {
        service: ConfirmedService,
        error_class: ErrorClass,
        error_code: ErrorCode,
    },
    Reject {
        reason: RejectReason,
    },
}

impl Response {
    pub fn error(service: ConfirmedService, error_class: ErrorClass, error_code: ErrorCode) -> Self {
        Self::Error {
            service,
            error_class,
            error_code,
        }
    }

    /// The error class and code carried by an [`Error`](Self::Error) response.
    pub fn error_pair(&self) -> Option<(ErrorClass, ErrorCode)> {
        match self {
            Self::Error {
                error_class,
                error_code,
                ..
            } => Some((*error_class, *error_code)),
            _ => None,
        }
    }

    /// The value carried by a [`ReadPropertyAck`](Self::ReadPropertyAck).
    pub fn value(&self) -> Option<&PropertyValue> {
        match self {
            Self::ReadPropertyAck(ack) => Some(&ack.value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyAck {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    pub array_index: Option<u32>,
    pub value: PropertyValue,
}
