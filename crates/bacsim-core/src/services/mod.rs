pub mod request;
pub mod response;
pub mod supported;

pub use request::{
    InboundRequest, ReadPropertyRequest, ServiceRequest, SubscribeCovRequest, TextMessageRequest,
    WritePropertyRequest,
};
pub use response::{ReadPropertyAck, Response};
pub use supported::ServicesSupported;

/// Confirmed service choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ConfirmedService {
    AcknowledgeAlarm,
    ConfirmedCovNotification,
    ConfirmedEventNotification,
    GetAlarmSummary,
    GetEnrollmentSummary,
    SubscribeCov,
    AtomicReadFile,
    AtomicWriteFile,
    AddListElement,
    RemoveListElement,
    CreateObject,
    DeleteObject,
    ReadProperty,
    ReadPropertyConditional,
    ReadPropertyMultiple,
    WriteProperty,
    WritePropertyMultiple,
    DeviceCommunicationControl,
    ConfirmedPrivateTransfer,
    ConfirmedTextMessage,
    ReinitializeDevice,
    VtOpen,
    VtClose,
    VtData,
    ReadRange,
    LifeSafetyOperation,
    SubscribeCovProperty,
    GetEventInformation,
}

impl ConfirmedService {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::AcknowledgeAlarm => 0,
            Self::ConfirmedCovNotification => 1,
            Self::ConfirmedEventNotification => 2,
            Self::GetAlarmSummary => 3,
            Self::GetEnrollmentSummary => 4,
            Self::SubscribeCov => 5,
            Self::AtomicReadFile => 6,
            Self::AtomicWriteFile => 7,
            Self::AddListElement => 8,
            Self::RemoveListElement => 9,
            Self::CreateObject => 10,
            Self::DeleteObject => 11,
            Self::ReadProperty => 12,
            Self::ReadPropertyConditional => 13,
            Self::ReadPropertyMultiple => 14,
            Self::WriteProperty => 15,
            Self::WritePropertyMultiple => 16,
            Self::DeviceCommunicationControl => 17,
            Self::ConfirmedPrivateTransfer => 18,
            Self::ConfirmedTextMessage => 19,
            Self::ReinitializeDevice => 20,
            Self::VtOpen => 21,
            Self::VtClose => 22,
            Self::VtData => 23,
            Self::ReadRange => 26,
            Self::LifeSafetyOperation => 27,
            Self::SubscribeCovProperty => 28,
            Self::GetEventInformation => 29,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::AcknowledgeAlarm,
            1 => Self::ConfirmedCovNotification,
            2 => Self::ConfirmedEventNotification,
            3 => Self::GetAlarmSummary,
            4 => Self::GetEnrollmentSummary,
            5 => Self::SubscribeCov,
            6 => Self::AtomicReadFile,
            7 => Self::AtomicWriteFile,
            8 => Self::AddListElement,
            9 => Self::RemoveListElement,
            10 => Self::CreateObject,
            11 => Self::DeleteObject,
            12 => Self::ReadProperty,
            13 => Self::ReadPropertyConditional,
            14 => Self::ReadPropertyMultiple,
            15 => Self::WriteProperty,
            16 => Self::WritePropertyMultiple,
            17 => Self::DeviceCommunicationControl,
            18 => Self::ConfirmedPrivateTransfer,
            19 => Self::ConfirmedTextMessage,
            20 => Self::ReinitializeDevice,
            21 => Self::VtOpen,
            22 => Self::VtClose,
            23 => Self::VtData,
            26 => Self::ReadRange,
            27 => Self::LifeSafetyOperation,
            28 => Self::SubscribeCovProperty,
            29 => Self::GetEventInformation,
            _ => return None,
        })
    }

    /// Bit position in the protocol-services-supported bit string.
    pub const fn supported_bit(self) -> usize {
        match self {
            Self::ReadRange => 35,
            Self::LifeSafetyOperation => 37,
            Self::SubscribeCovProperty => 38,
            Self::GetEventInformation => 39,
            other => other.to_u8() as usize,
        }
    }
}

/// Unconfirmed service choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum UnconfirmedService {
    IAm,
    IHave,
    UnconfirmedCovNotification,
    UnconfirmedEventNotification,
    UnconfirmedPrivateTransfer,
    UnconfirmedTextMessage,
    TimeSynchronization,
    WhoHas,
    WhoIs,
    UtcTimeSynchronization,
    WriteGroup,
}

impl UnconfirmedService {
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::IAm => 0,
            Self::IHave => 1,
            Self::UnconfirmedCovNotification => 2,
            Self::UnconfirmedEventNotification => 3,
            Self::UnconfirmedPrivateTransfer => 4,
            Self::UnconfirmedTextMessage => 5,
            Self::TimeSynchronization => 6,
            Self::WhoHas => 7,
            Self::WhoIs => 8,
            Self::UtcTimeSynchronization => 9,
            Self::WriteGroup => 10,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::IAm,
            1 => Self::IHave,
            2 => Self::UnconfirmedCovNotification,
            3 => Self::UnconfirmedEventNotification,
            4 => Self::UnconfirmedPrivateTransfer,
            5 => Self::UnconfirmedTextMessage,
            6 => Self::TimeSynchronization,
            7 => Self::WhoHas,
            8 => Self::WhoIs,
            9 => Self::UtcTimeSynchronization,
            10 => Self::WriteGroup,
            _ => return None,
        })
    }

    /// Bit position in the protocol-services-supported bit string.
    pub const fn supported_bit(self) -> usize {
        match self {
            Self::IAm => 26,
            Self::IHave => 27,
            Self::UnconfirmedCovNotification => 28,
            Self::UnconfirmedEventNotification => 29,
            Self::UnconfirmedPrivateTransfer => 30,
            Self::UnconfirmedTextMessage => 31,
            Self::TimeSynchronization => 32,
            Self::WhoHas => 33,
            Self::WhoIs => 34,
            Self::UtcTimeSynchronization => 36,
            Self::WriteGroup => 40,
        }
    }
}
