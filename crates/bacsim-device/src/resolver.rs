//! Property resolution.
//!
//! Reads are answered in two steps: the object snapshot picks a rule table
//! (device or analog point), then the property identifier picks a rule. Every
//! rule is a plain function of the snapshot, so resolving a property never
//! touches the catalogue lock.
//!
//! A property that has no rule for the object's kind resolves to
//! [`GENERIC_DEFAULT`] rather than an error. Each kind's property-list is
//! derived from its rule table, so the advertised and the resolvable sets
//! cannot diverge.

use crate::catalogue::{DeviceSnapshot, ObjectSnapshot};
use crate::error::PropertyError;
use crate::point::AnalogPoint;
use bacsim_core::services::{ConfirmedService, ServicesSupported, UnconfirmedService};
use bacsim_core::types::{
    BitString, DeviceStatus, EventState, NotifyType, ObjectType, PropertyId, PropertyValue,
    TimeStamp,
};

/// Value returned for a property the object kind does not model.
pub const GENERIC_DEFAULT: PropertyValue = PropertyValue::Real(0.0);

const STATUS_FLAG_BITS: usize = 4;
const EVENT_TRANSITION_BITS: usize = 3;
const PRIORITY_ARRAY_SLOTS: usize = 16;
const EVENT_TIME_STAMP_SLOTS: usize = 3;

type Rule<T> = (PropertyId, fn(&T) -> PropertyValue);

static DEVICE_RULES: &[Rule<DeviceSnapshot>] = &[
    (PropertyId::ObjectIdentifier, device_object_identifier),
    (PropertyId::ObjectName, device_object_name),
    (PropertyId::ObjectType, device_object_type),
    (PropertyId::SystemStatus, device_system_status),
    (PropertyId::VendorName, device_vendor_name),
    (PropertyId::VendorIdentifier, device_vendor_identifier),
    (PropertyId::ModelName, device_model_name),
    (PropertyId::FirmwareRevision, device_firmware_revision),
    (
        PropertyId::ApplicationSoftwareVersion,
        device_application_software_version,
    ),
    (PropertyId::ProtocolVersion, device_protocol_version),
    (PropertyId::ProtocolRevision, device_protocol_revision),
    (PropertyId::MaxApduLengthAccepted, device_max_apdu_length),
    (PropertyId::SegmentationSupported, device_segmentation),
    (PropertyId::DatabaseRevision, device_database_revision),
    (PropertyId::SerialNumber, device_serial_number),
    (PropertyId::ApduTimeout, device_apdu_timeout),
    (PropertyId::NumberOfApduRetries, device_apdu_retries),
    (PropertyId::ObjectList, device_object_list),
    (PropertyId::ProtocolServicesSupported, device_services_supported),
    (PropertyId::PropertyList, device_property_list),
];

static POINT_RULES: &[Rule<AnalogPoint>] = &[
    (PropertyId::ObjectIdentifier, point_object_identifier),
    (PropertyId::ObjectName, point_object_name),
    (PropertyId::ObjectType, point_object_type),
    (PropertyId::Description, point_description),
    (PropertyId::PresentValue, point_present_value),
    (PropertyId::Units, point_units),
    (PropertyId::StatusFlags, point_status_flags),
    (PropertyId::EventState, point_event_state),
    (PropertyId::EventEnable, point_event_transitions),
    (PropertyId::AckedTransitions, point_event_transitions),
    (PropertyId::OutOfService, point_out_of_service),
    (PropertyId::NotificationClass, point_notification_class),
    (PropertyId::NotifyType, point_notify_type),
    (PropertyId::EventTimeStamps, point_event_time_stamps),
    (PropertyId::PriorityArray, point_priority_array),
    (PropertyId::PropertyList, point_property_list),
];

/// Resolves `property_id` on `snapshot`, optionally indexing into an array
/// property.
///
/// Index `0` yields the array length; `1..=len` yields that element. A
/// property with no rule answers the generic default whether or not an index
/// is given.
pub fn resolve(
    snapshot: &ObjectSnapshot,
    property_id: PropertyId,
    array_index: Option<u32>,
) -> Result<PropertyValue, PropertyError> {
    let property_id = property_id.canonical();
    let value = match snapshot {
        ObjectSnapshot::Device(device) => apply(DEVICE_RULES, device, property_id),
        ObjectSnapshot::Point(point) => apply(POINT_RULES, point, property_id),
    };
    let Some(value) = value else {
        log::debug!("no rule for {property_id}; answering with generic default");
        return Ok(GENERIC_DEFAULT);
    };
    match array_index {
        None => Ok(value),
        Some(index) => index_into(property_id, value, index),
    }
}

/// Properties the snapshot's object kind advertises, in rule-table order.
pub fn property_ids(snapshot: &ObjectSnapshot) -> Vec<PropertyId> {
    match snapshot {
        ObjectSnapshot::Device(_) => listed(DEVICE_RULES).collect(),
        ObjectSnapshot::Point(_) => listed(POINT_RULES).collect(),
    }
}

fn apply<T>(rules: &[Rule<T>], object: &T, property_id: PropertyId) -> Option<PropertyValue> {
    rules
        .iter()
        .find(|(id, _)| *id == property_id)
        .map(|(_, rule)| rule(object))
}

fn index_into(
    property_id: PropertyId,
    value: PropertyValue,
    index: u32,
) -> Result<PropertyValue, PropertyError> {
    let PropertyValue::Array(mut elements) = value else {
        return Err(PropertyError::NotAnArray { property_id });
    };
    let len = elements.len();
    match index as usize {
        0 => Ok(PropertyValue::Unsigned(len as u32)),
        i if i <= len => Ok(elements.swap_remove(i - 1)),
        _ => Err(PropertyError::InvalidArrayIndex {
            property_id,
            index,
            len,
        }),
    }
}

fn listed<T>(rules: &'static [Rule<T>]) -> impl Iterator<Item = PropertyId> {
    rules
        .iter()
        .map(|(id, _)| *id)
        .filter(|id| *id != PropertyId::PropertyList)
}

fn property_list<T>(rules: &'static [Rule<T>]) -> PropertyValue {
    PropertyValue::Array(
        listed(rules)
            .map(|id| PropertyValue::Enumerated(id.to_u32()))
            .collect(),
    )
}

fn object_type(object_type: ObjectType) -> PropertyValue {
    PropertyValue::Enumerated(u32::from(object_type.to_u16()))
}

/// Who-Is, I-Am, ReadProperty and WriteProperty.
pub fn services_supported() -> ServicesSupported {
    ServicesSupported::none()
        .with_unconfirmed(UnconfirmedService::WhoIs)
        .with_unconfirmed(UnconfirmedService::IAm)
        .with_confirmed(ConfirmedService::ReadProperty)
        .with_confirmed(ConfirmedService::WriteProperty)
}

fn device_object_identifier(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::ObjectId(d.device.object_id)
}

fn device_object_name(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.name.as_str())
}

fn device_object_type(_: &DeviceSnapshot) -> PropertyValue {
    object_type(ObjectType::Device)
}

fn device_system_status(_: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Enumerated(DeviceStatus::Operational.to_u32())
}

fn device_vendor_name(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.vendor_name.as_str())
}

fn device_vendor_identifier(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.vendor_id)
}

fn device_model_name(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.model_name.as_str())
}

fn device_firmware_revision(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.firmware_revision.as_str())
}

fn device_application_software_version(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.application_software_version.as_str())
}

fn device_protocol_version(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.protocol_version)
}

fn device_protocol_revision(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.protocol_revision)
}

fn device_max_apdu_length(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.max_apdu_length)
}

fn device_segmentation(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Enumerated(d.device.segmentation.to_u32())
}

fn device_database_revision(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.database_revision)
}

fn device_serial_number(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::from(d.device.serial_number.as_str())
}

fn device_apdu_timeout(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.apdu_timeout_ms)
}

fn device_apdu_retries(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Unsigned(d.device.apdu_retries)
}

fn device_object_list(d: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::Array(
        d.object_list
            .iter()
            .copied()
            .map(PropertyValue::ObjectId)
            .collect(),
    )
}

fn device_services_supported(_: &DeviceSnapshot) -> PropertyValue {
    PropertyValue::BitString(services_supported().into_bit_string())
}

fn device_property_list(_: &DeviceSnapshot) -> PropertyValue {
    property_list(DEVICE_RULES)
}

fn point_object_identifier(p: &AnalogPoint) -> PropertyValue {
    PropertyValue::ObjectId(p.object_id())
}

fn point_object_name(p: &AnalogPoint) -> PropertyValue {
    PropertyValue::CharacterString(p.object_name())
}

fn point_object_type(p: &AnalogPoint) -> PropertyValue {
    object_type(p.object_id().object_type())
}

fn point_description(p: &AnalogPoint) -> PropertyValue {
    PropertyValue::from(p.description())
}

fn point_present_value(p: &AnalogPoint) -> PropertyValue {
    PropertyValue::Real(p.present_value())
}

fn point_units(p: &AnalogPoint) -> PropertyValue {
    PropertyValue::Enumerated(p.units().to_u32())
}

// in-alarm, fault, overridden, out-of-service
fn point_status_flags(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::BitString(BitString::zeros(STATUS_FLAG_BITS))
}

fn point_event_state(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Enumerated(EventState::Normal.to_u32())
}

// to-offnormal, to-fault, to-normal
fn point_event_transitions(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::BitString(BitString::zeros(EVENT_TRANSITION_BITS))
}

fn point_out_of_service(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Boolean(false)
}

fn point_notification_class(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Unsigned(0)
}

fn point_notify_type(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Enumerated(NotifyType::Event.to_u32())
}

fn point_event_time_stamps(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Array(vec![
        PropertyValue::TimeStamp(TimeStamp::SequenceNumber(0));
        EVENT_TIME_STAMP_SLOTS
    ])
}

fn point_priority_array(_: &AnalogPoint) -> PropertyValue {
    PropertyValue::Array(vec![PropertyValue::Null; PRIORITY_ARRAY_SLOTS])
}

fn point_property_list(_: &AnalogPoint) -> PropertyValue {
    property_list(POINT_RULES)
}
