use core::fmt;

/// BACnet object type identifiers as defined in the BACnet specification.
///
/// Known standard types are represented as named variants; proprietary
/// vendor-specific types use the [`Proprietary`](Self::Proprietary) variant.
/// Ordering follows the numeric code, which keeps sorted object lists stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ObjectType {
    AnalogInput,
    AnalogOutput,
    AnalogValue,
    BinaryInput,
    BinaryOutput,
    BinaryValue,
    Calendar,
    Command,
    Device,
    EventEnrollment,
    File,
    Group,
    Loop,
    MultiStateInput,
    MultiStateOutput,
    NotificationClass,
    Program,
    Schedule,
    Averaging,
    MultiStateValue,
    TrendLog,
    Accumulator,
    PulseConverter,
    Proprietary(u16),
}

impl ObjectType {
    /// Converts this object type to its numeric BACnet identifier.
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::Calendar => 6,
            Self::Command => 7,
            Self::Device => 8,
            Self::EventEnrollment => 9,
            Self::File => 10,
            Self::Group => 11,
            Self::Loop => 12,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::NotificationClass => 15,
            Self::Program => 16,
            Self::Schedule => 17,
            Self::Averaging => 18,
            Self::MultiStateValue => 19,
            Self::TrendLog => 20,
            Self::Accumulator => 23,
            Self::PulseConverter => 24,
            Self::Proprietary(v) => v,
        }
    }

    /// Creates an `ObjectType` from its numeric BACnet identifier.
    ///
    /// Values without a known standard mapping become [`Proprietary`](Self::Proprietary).
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            1 => Self::AnalogOutput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            4 => Self::BinaryOutput,
            5 => Self::BinaryValue,
            6 => Self::Calendar,
            7 => Self::Command,
            8 => Self::Device,
            9 => Self::EventEnrollment,
            10 => Self::File,
            11 => Self::Group,
            12 => Self::Loop,
            13 => Self::MultiStateInput,
            14 => Self::MultiStateOutput,
            15 => Self::NotificationClass,
            16 => Self::Program,
            17 => Self::Schedule,
            18 => Self::Averaging,
            19 => Self::MultiStateValue,
            20 => Self::TrendLog,
            23 => Self::Accumulator,
            24 => Self::PulseConverter,
            v => Self::Proprietary(v),
        }
    }

    /// The standard hyphenated name, or `None` for proprietary types.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::AnalogInput => "analog-input",
            Self::AnalogOutput => "analog-output",
            Self::AnalogValue => "analog-value",
            Self::BinaryInput => "binary-input",
            Self::BinaryOutput => "binary-output",
            Self::BinaryValue => "binary-value",
            Self::Calendar => "calendar",
            Self::Command => "command",
            Self::Device => "device",
            Self::EventEnrollment => "event-enrollment",
            Self::File => "file",
            Self::Group => "group",
            Self::Loop => "loop",
            Self::MultiStateInput => "multi-state-input",
            Self::MultiStateOutput => "multi-state-output",
            Self::NotificationClass => "notification-class",
            Self::Program => "program",
            Self::Schedule => "schedule",
            Self::Averaging => "averaging",
            Self::MultiStateValue => "multi-state-value",
            Self::TrendLog => "trend-log",
            Self::Accumulator => "accumulator",
            Self::PulseConverter => "pulse-converter",
            Self::Proprietary(_) => return None,
        })
    }
}

impl PartialOrd for ObjectType {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ObjectType {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.to_u16().cmp(&other.to_u16())
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "proprietary-{}", self.to_u16()),
        }
    }
}
