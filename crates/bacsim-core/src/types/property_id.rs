use core::fmt;

/// BACnet property identifiers.
///
/// The properties exposed by emulated devices and analog points are named
/// variants; vendor-specific or unrecognised identifiers use
/// [`Proprietary`](Self::Proprietary).
///
/// Every code has one canonical spelling: deserializing a numeric code, or
/// `{"proprietary": n}` with a standard `n`, yields the named variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "kebab-case", try_from = "PropertyRepr")
)]
pub enum PropertyId {
    AckedTransitions,
    ApduTimeout,
    ApplicationSoftwareVersion,
    Description,
    DatabaseRevision,
    EventEnable,
    EventState,
    EventTimeStamps,
    FirmwareRevision,
    MaxApduLengthAccepted,
    ModelName,
    NotificationClass,
    NotifyType,
    NumberOfApduRetries,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectType,
    OutOfService,
    PresentValue,
    PriorityArray,
    PropertyList,
    ProtocolRevision,
    ProtocolServicesSupported,
    ProtocolVersion,
    SegmentationSupported,
    SerialNumber,
    StatusFlags,
    SystemStatus,
    Units,
    VendorIdentifier,
    VendorName,
    Proprietary(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::AckedTransitions => 0,
            Self::ApduTimeout => 11,
            Self::ApplicationSoftwareVersion => 12,
            Self::Description => 28,
            Self::DatabaseRevision => 155,
            Self::EventEnable => 35,
            Self::EventState => 36,
            Self::EventTimeStamps => 130,
            Self::FirmwareRevision => 44,
            Self::MaxApduLengthAccepted => 62,
            Self::ModelName => 70,
            Self::NotificationClass => 17,
            Self::NotifyType => 72,
            Self::NumberOfApduRetries => 73,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::OutOfService => 81,
            Self::PresentValue => 85,
            Self::PriorityArray => 87,
            Self::PropertyList => 371,
            Self::ProtocolRevision => 139,
            Self::ProtocolServicesSupported => 97,
            Self::ProtocolVersion => 98,
            Self::SegmentationSupported => 107,
            Self::SerialNumber => 372,
            Self::StatusFlags => 111,
            Self::SystemStatus => 112,
            Self::Units => 117,
            Self::VendorIdentifier => 120,
            Self::VendorName => 121,
            Self::Proprietary(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            0 => Self::AckedTransitions,
            11 => Self::ApduTimeout,
            12 => Self::ApplicationSoftwareVersion,
            28 => Self::Description,
            155 => Self::DatabaseRevision,
            35 => Self::EventEnable,
            36 => Self::EventState,
            130 => Self::EventTimeStamps,
            44 => Self::FirmwareRevision,
            62 => Self::MaxApduLengthAccepted,
            70 => Self::ModelName,
            17 => Self::NotificationClass,
            72 => Self::NotifyType,
            73 => Self::NumberOfApduRetries,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            81 => Self::OutOfService,
            85 => Self::PresentValue,
            87 => Self::PriorityArray,
            371 => Self::PropertyList,
            139 => Self::ProtocolRevision,
            97 => Self::ProtocolServicesSupported,
            98 => Self::ProtocolVersion,
            107 => Self::SegmentationSupported,
            372 => Self::SerialNumber,
            111 => Self::StatusFlags,
            112 => Self::SystemStatus,
            117 => Self::Units,
            120 => Self::VendorIdentifier,
            121 => Self::VendorName,
            v => Self::Proprietary(v),
        }
    }

    /// Folds a `Proprietary` value carrying a standard code onto its named
    /// variant.
    pub const fn canonical(self) -> Self {
        Self::from_u32(self.to_u32())
    }

    /// The standard hyphenated name, or `None` for proprietary identifiers.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::AckedTransitions => "acked-transitions",
            Self::ApduTimeout => "apdu-timeout",
            Self::ApplicationSoftwareVersion => "application-software-version",
            Self::Description => "description",
            Self::DatabaseRevision => "database-revision",
            Self::EventEnable => "event-enable",
            Self::EventState => "event-state",
            Self::EventTimeStamps => "event-time-stamps",
            Self::FirmwareRevision => "firmware-revision",
            Self::MaxApduLengthAccepted => "max-apdu-length-accepted",
            Self::ModelName => "model-name",
            Self::NotificationClass => "notification-class",
            Self::NotifyType => "notify-type",
            Self::NumberOfApduRetries => "number-of-apdu-retries",
            Self::ObjectIdentifier => "object-identifier",
            Self::ObjectList => "object-list",
            Self::ObjectName => "object-name",
            Self::ObjectType => "object-type",
            Self::OutOfService => "out-of-service",
            Self::PresentValue => "present-value",
            Self::PriorityArray => "priority-array",
            Self::PropertyList => "property-list",
            Self::ProtocolRevision => "protocol-revision",
            Self::ProtocolServicesSupported => "protocol-services-supported",
            Self::ProtocolVersion => "protocol-version",
            Self::SegmentationSupported => "segmentation-supported",
            Self::SerialNumber => "serial-number",
            Self::StatusFlags => "status-flags",
            Self::SystemStatus => "system-status",
            Self::Units => "units",
            Self::VendorIdentifier => "vendor-identifier",
            Self::VendorName => "vendor-name",
            Self::Proprietary(_) => return None,
        })
    }

    /// Looks up a named identifier by its hyphenated name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED.iter().copied().find(|id| id.name() == Some(name))
    }

    const NAMED: [Self; 32] = [
        Self::AckedTransitions,
        Self::ApduTimeout,
        Self::ApplicationSoftwareVersion,
        Self::Description,
        Self::DatabaseRevision,
        Self::EventEnable,
        Self::EventState,
        Self::EventTimeStamps,
        Self::FirmwareRevision,
        Self::MaxApduLengthAccepted,
        Self::ModelName,
        Self::NotificationClass,
        Self::NotifyType,
        Self::NumberOfApduRetries,
        Self::ObjectIdentifier,
        Self::ObjectList,
        Self::ObjectName,
        Self::ObjectType,
        Self::OutOfService,
        Self::PresentValue,
        Self::PriorityArray,
        Self::PropertyList,
        Self::ProtocolRevision,
        Self::ProtocolServicesSupported,
        Self::ProtocolVersion,
        Self::SegmentationSupported,
        Self::SerialNumber,
        Self::StatusFlags,
        Self::SystemStatus,
        Self::Units,
        Self::VendorIdentifier,
        Self::VendorName,
    ];
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "proprietary-{}", self.to_u32()),
        }
    }
}

/// Accepted input shapes for a [`PropertyId`]: a hyphenated name, a bare
/// code, or `{"proprietary": code}`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
#[doc(hidden)]
pub enum PropertyRepr {
    Name(String),
    Code(u32),
    Tagged { proprietary: u32 },
}

#[cfg(feature = "serde")]
impl TryFrom<PropertyRepr> for PropertyId {
    type Error = String;

    fn try_from(repr: PropertyRepr) -> Result<Self, Self::Error> {
        match repr {
            PropertyRepr::Name(name) => {
                Self::from_name(&name).ok_or_else(|| format!("unknown property '{name}'"))
            }
            PropertyRepr::Code(code) | PropertyRepr::Tagged { proprietary: code } => {
                Ok(Self::from_u32(code))
            }
        }
    }
}
