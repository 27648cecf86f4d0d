//! BACnet vocabulary shared by the bacsim engine and protocol-stack bindings.
//!
//! `bacsim-core` holds the already-decoded side of the BACnet world: object and
//! property identifiers, owned application values, error/reject codes, and the
//! typed service requests and responses exchanged with a protocol stack. It does
//! no wire encoding itself.
//!
//! # Feature flags
//!
//! - **`serde`**: derives `Serialize`/`Deserialize` on all public types.

/// Requester addressing as reported by the protocol stack.
pub mod address;
/// Service choices, the services-supported bitmap, and typed requests/responses.
pub mod services;
/// Core BACnet data types: object identifiers, property identifiers, and values.
pub mod types;

pub use address::RequesterAddress;
pub use services::{InboundRequest, Response, ServiceRequest};
pub use types::{ObjectId, ObjectType, PropertyId, PropertyValue};
