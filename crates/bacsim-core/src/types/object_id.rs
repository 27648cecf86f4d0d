use crate::types::ObjectType;
use core::fmt;

/// Largest instance number that fits the 22-bit instance field.
pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

/// A packed BACnet object identifier combining an [`ObjectType`] and a 22-bit
/// instance number into a single `u32`.
///
/// The upper 10 bits encode the object type and the lower 22 bits encode the
/// instance number, matching the BACnet wire format. Ordering sorts by type
/// code first, then instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "ObjectRef", try_from = "ObjectRef")
)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Creates an `ObjectId` from a type and instance number.
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self((((object_type.to_u16() as u32) & 0x03FF) << 22) | (instance & MAX_INSTANCE))
    }

    /// Like [`ObjectId::new`] but refuses instance numbers that would be truncated.
    pub const fn checked(object_type: ObjectType, instance: u32) -> Option<Self> {
        if instance > MAX_INSTANCE {
            return None;
        }
        Some(Self::new(object_type, instance))
    }

    /// Returns the raw packed `u32` representation.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Constructs an `ObjectId` from a pre-packed `u32`.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Extracts the [`ObjectType`] from the upper 10 bits.
    pub const fn object_type(self) -> ObjectType {
        let t = ((self.0 >> 22) & 0x03FF) as u16;
        ObjectType::from_u16(t)
    }

    /// Extracts the 22-bit instance number.
    pub const fn instance(self) -> u32 {
        self.0 & MAX_INSTANCE
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.object_type(), self.instance())
    }
}

/// Human-readable form of an [`ObjectId`] used for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRef {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub object_type: ObjectType,
    pub instance: u32,
}

impl From<ObjectId> for ObjectRef {
    fn from(id: ObjectId) -> Self {
        Self {
            object_type: id.object_type(),
            instance: id.instance(),
        }
    }
}

impl TryFrom<ObjectRef> for ObjectId {
    type Error = InstanceOutOfRange;

    fn try_from(value: ObjectRef) -> Result<Self, Self::Error> {
        ObjectId::checked(value.object_type, value.instance).ok_or(InstanceOutOfRange(value.instance))
    }
}

/// Instance number does not fit in 22 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceOutOfRange(pub u32);

impl fmt::Display for InstanceOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance {} exceeds {MAX_INSTANCE}", self.0)
    }
}

impl std::error::Error for InstanceOutOfRange {}
