use crate::types::{BitString, ObjectId, TimeStamp};

/// An owned BACnet application value, as returned by property reads and
/// carried by property writes.
///
/// List properties (object-list, property-list, priority-array, ...) are
/// [`Array`](Self::Array)s of their element values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PropertyValue {
    Null,
    Boolean(bool),
    Unsigned(u32),
    Signed(i32),
    Real(f32),
    Double(f64),
    CharacterString(String),
    BitString(BitString),
    Enumerated(u32),
    ObjectId(ObjectId),
    TimeStamp(TimeStamp),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Interprets a numeric value as a BACnet REAL.
    ///
    /// Returns `None` for non-numeric values; the result may be non-finite
    /// when the source is.
    pub fn as_real(&self) -> Option<f32> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Double(v) => Some(*v as f32),
            Self::Unsigned(v) => Some(*v as f32),
            Self::Signed(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Short application-tag name, used in log lines.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Unsigned(_) => "unsigned",
            Self::Signed(_) => "signed",
            Self::Real(_) => "real",
            Self::Double(_) => "double",
            Self::CharacterString(_) => "character-string",
            Self::BitString(_) => "bit-string",
            Self::Enumerated(_) => "enumerated",
            Self::ObjectId(_) => "object-identifier",
            Self::TimeStamp(_) => "time-stamp",
            Self::Array(_) => "array",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::CharacterString(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::CharacterString(value)
    }
}

#[cfg(test)]
mod tests {
    use super::PropertyValue;

    #[test]
    fn numeric_values_coerce_to_real() {
        assert_eq!(PropertyValue::Real(42.5).as_real(), Some(42.5));
        assert_eq!(PropertyValue::Double(42.5).as_real(), Some(42.5));
        assert_eq!(PropertyValue::Unsigned(7).as_real(), Some(7.0));
        assert_eq!(PropertyValue::Signed(-3).as_real(), Some(-3.0));
        assert_eq!(PropertyValue::Boolean(true).as_real(), None);
        assert_eq!(PropertyValue::from("42.5").as_real(), None);
    }

    #[test]
    fn arrays_expose_elements() {
        let value = PropertyValue::Array(vec![PropertyValue::Null; 16]);
        assert_eq!(value.as_array().map(<[_]>::len), Some(16));
        assert_eq!(PropertyValue::Null.as_array(), None);
    }
}
