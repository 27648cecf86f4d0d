use crate::types::{ObjectId, PropertyId, PropertyValue};
use crate::RequesterAddress;

/// A decoded request handed over by the protocol stack.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InboundRequest {
    pub source: RequesterAddress,
    pub service: ServiceRequest,
}

impl InboundRequest {
    pub fn new(source: RequesterAddress, service: ServiceRequest) -> Self {
        Self { source, service }
    }
}

/// The decoded service payload of an [`InboundRequest`].
///
/// Services the engine models get typed variants. Everything else arrives
/// as a raw service choice so the engine can answer it with an error, a
/// reject, or silence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ServiceRequest {
    ReadProperty(ReadPropertyRequest),
    WriteProperty(WritePropertyRequest),
    SubscribeCov(SubscribeCovRequest),
    TextMessage(TextMessageRequest),
    /// Any other confirmed service, identified by its service choice.
    Confirmed { service_choice: u8 },
    /// Any other unconfirmed service, identified by its service choice.
    Unconfirmed { service_choice: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadPropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub array_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WritePropertyRequest {
    pub object_id: ObjectId,
    pub property_id: PropertyId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub array_index: Option<u32>,
    pub value: PropertyValue,
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscribeCovRequest {
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub issue_confirmed_notifications: Option<bool>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifetime_seconds: Option<u32>,
}

impl SubscribeCovRequest {
    /// A subscription request with neither optional field is a cancellation.
    pub const fn is_cancellation(&self) -> bool {
        self.issue_confirmed_notifications.is_none() && self.lifetime_seconds.is_none()
    }

    pub const fn cancel(subscriber_process_id: u32, monitored_object_id: ObjectId) -> Self {
        Self {
            subscriber_process_id,
            monitored_object_id,
            issue_confirmed_notifications: None,
            lifetime_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextMessageRequest {
    pub confirmed: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub source_device: Option<ObjectId>,
    pub message: String,
}
