/// Segmentation capability advertised by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum Segmentation {
    SegmentedBoth = 0,
    SegmentedTransmit = 1,
    SegmentedReceive = 2,
    NoSegmentation = 3,
}

/// Device system-status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum DeviceStatus {
    Operational = 0,
    OperationalReadOnly = 1,
    DownloadRequired = 2,
    DownloadInProgress = 3,
    NonOperational = 4,
    BackupInProgress = 5,
}

/// Event-state of an event-reporting object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u32)]
pub enum EventState {
    Normal = 0,
    Fault = 1,
    Offnormal = 2,
    HighLimit = 3,
    LowLimit = 4,
    LifeSafetyAlarm = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum NotifyType {
    Alarm = 0,
    Event = 1,
    AckNotification = 2,
}

/// Engineering units used by the emulated sensor classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u32)]
pub enum EngineeringUnits {
    PercentRelativeHumidity = 29,
    Kilopascals = 53,
    DegreesCelsius = 62,
    DegreesFahrenheit = 64,
    NoUnits = 95,
}

/// BACnet error class reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum ErrorClass {
    Device = 0,
    Object = 1,
    Property = 2,
    Resources = 3,
    Security = 4,
    Services = 5,
    Vt = 6,
    Communication = 7,
}

/// BACnet error code reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u16)]
pub enum ErrorCode {
    Other = 0,
    ConfigurationInProgress = 2,
    DeviceBusy = 3,
    InvalidDataType = 9,
    ServiceRequestDenied = 29,
    UnknownObject = 31,
    UnknownProperty = 32,
    ValueOutOfRange = 37,
    WriteAccessDenied = 40,
    InvalidArrayIndex = 42,
    PropertyIsNotAnArray = 50,
}

/// Reason carried by a Reject PDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum RejectReason {
    Other = 0,
    BufferOverflow = 1,
    InconsistentParameters = 2,
    InvalidParameterDataType = 3,
    InvalidTag = 4,
    MissingRequiredParameter = 5,
    ParameterOutOfRange = 6,
    TooManyArguments = 7,
    UndefinedEnumeration = 8,
    UnrecognizedService = 9,
}

impl Segmentation {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::SegmentedBoth),
            1 => Some(Self::SegmentedTransmit),
            2 => Some(Self::SegmentedReceive),
            3 => Some(Self::NoSegmentation),
            _ => None,
        }
    }
}

impl DeviceStatus {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

impl EventState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Normal),
            1 => Some(Self::Fault),
            2 => Some(Self::Offnormal),
            3 => Some(Self::HighLimit),
            4 => Some(Self::LowLimit),
            5 => Some(Self::LifeSafetyAlarm),
            _ => None,
        }
    }
}

impl NotifyType {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

impl EngineeringUnits {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            29 => Some(Self::PercentRelativeHumidity),
            53 => Some(Self::Kilopascals),
            62 => Some(Self::DegreesCelsius),
            64 => Some(Self::DegreesFahrenheit),
            95 => Some(Self::NoUnits),
            _ => None,
        }
    }
}

impl ErrorClass {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Device),
            1 => Some(Self::Object),
            2 => Some(Self::Property),
            3 => Some(Self::Resources),
            4 => Some(Self::Security),
            5 => Some(Self::Services),
            6 => Some(Self::Vt),
            7 => Some(Self::Communication),
            _ => None,
        }
    }
}

impl ErrorCode {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Other),
            2 => Some(Self::ConfigurationInProgress),
            3 => Some(Self::DeviceBusy),
            9 => Some(Self::InvalidDataType),
            29 => Some(Self::ServiceRequestDenied),
            31 => Some(Self::UnknownObject),
            32 => Some(Self::UnknownProperty),
            37 => Some(Self::ValueOutOfRange),
            40 => Some(Self::WriteAccessDenied),
            42 => Some(Self::InvalidArrayIndex),
            50 => Some(Self::PropertyIsNotAnArray),
            _ => None,
        }
    }
}

impl RejectReason {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::{EngineeringUnits, ErrorClass, ErrorCode, Segmentation};

    #[test]
    fn codes_roundtrip() {
        assert_eq!(ErrorCode::from_u32(29), Some(ErrorCode::ServiceRequestDenied));
        assert_eq!(ErrorCode::InvalidArrayIndex.to_u32(), 42);
        assert_eq!(ErrorClass::from_u32(5), Some(ErrorClass::Services));
        assert_eq!(Segmentation::NoSegmentation.to_u32(), 3);
        assert_eq!(EngineeringUnits::from_u32(53), Some(EngineeringUnits::Kilopascals));
        assert_eq!(ErrorCode::from_u32(1000), None);
    }
}
