pub mod bit_string;
pub mod date_time;
pub mod object_id;
pub mod object_type;
pub mod property_id;
pub mod spec;
pub mod value;

pub use bit_string::BitString;
pub use date_time::{Date, Time, TimeStamp};
pub use object_id::ObjectId;
pub use object_type::ObjectType;
pub use property_id::PropertyId;
pub use spec::{
    DeviceStatus, EngineeringUnits, ErrorClass, ErrorCode, EventState, NotifyType, RejectReason,
    Segmentation,
};
pub use value::PropertyValue;
