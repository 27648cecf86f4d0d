//! Request dispatch.
//!
//! [`Dispatcher::handle`] takes one decoded request from the protocol stack
//! and produces the response the stack should encode, or `None` when the
//! request gets no answer. Requests are independent of each other; the only
//! state they touch is the catalogue and the COV slot.

use crate::catalogue::Catalogue;
use crate::config::DispatchConfig;
use crate::cov::{CovSlot, CovSubscription};
use crate::error::ServiceFailure;
use crate::point::is_point_type;
use crate::resolver;
use bacsim_core::services::{
    ConfirmedService, ReadPropertyAck, ReadPropertyRequest, SubscribeCovRequest,
    TextMessageRequest, UnconfirmedService, WritePropertyRequest,
};
use bacsim_core::types::{ErrorClass, ErrorCode, PropertyId, RejectReason};
use bacsim_core::{InboundRequest, RequesterAddress, Response, ServiceRequest};
use std::sync::Arc;

#[derive(Debug)]
pub struct Dispatcher {
    catalogue: Arc<Catalogue>,
    cov: CovSlot,
    options: DispatchConfig,
}

impl Dispatcher {
    pub fn new(catalogue: Arc<Catalogue>, options: DispatchConfig) -> Self {
        Self {
            catalogue,
            cov: CovSlot::new(),
            options,
        }
    }

    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    /// The stored change-of-value subscription, if any.
    pub fn cov_subscription(&self) -> Option<CovSubscription> {
        self.cov.current()
    }

    pub fn handle(&self, request: &InboundRequest) -> Option<Response> {
        let source = request.source;
        match &request.service {
            ServiceRequest::ReadProperty(req) => Some(self.read_property(req)),
            ServiceRequest::WriteProperty(req) => Some(self.write_property(source, req)),
            ServiceRequest::SubscribeCov(req) => Some(self.subscribe_cov(source, req)),
            ServiceRequest::TextMessage(msg) => self.text_message(source, msg),
            ServiceRequest::Confirmed { service_choice } => {
                Some(self.other_confirmed(source, *service_choice))
            }
            ServiceRequest::Unconfirmed { service_choice } => {
                match UnconfirmedService::from_u8(*service_choice) {
                    Some(service) => log::debug!("dropping {service:?} from {source}"),
                    None => log::debug!(
                        "dropping unrecognized unconfirmed service {service_choice} from {source}"
                    ),
                }
                None
            }
        }
    }

    fn read_property(&self, req: &ReadPropertyRequest) -> Response {
        let service = ConfirmedService::ReadProperty;
        let property_id = req.property_id.canonical();
        log::debug!(
            "read {} {}{}",
            req.object_id,
            property_id,
            req.array_index
                .map(|i| format!("[{i}]"))
                .unwrap_or_default()
        );
        let snapshot = match self.catalogue.get_object(req.object_id) {
            Ok(snapshot) => snapshot,
            Err(e) => return failure(service, &e),
        };
        match resolver::resolve(&snapshot, property_id, req.array_index) {
            Ok(value) => Response::ReadPropertyAck(ReadPropertyAck {
                object_id: req.object_id,
                property_id,
                array_index: req.array_index,
                value,
            }),
            Err(e) => failure(service, &e),
        }
    }

    fn write_property(&self, source: RequesterAddress, req: &WritePropertyRequest) -> Response {
        let service = ConfirmedService::WriteProperty;
        let id = req.object_id;
        if !self.catalogue.contains(id) {
            return Response::error(service, ErrorClass::Object, ErrorCode::UnknownObject);
        }

        let property_id = req.property_id.canonical();
        let writable = property_id == PropertyId::PresentValue
            && req.array_index.is_none()
            && is_point_type(id.object_type());
        if !writable {
            if self.options.reject_unsupported_writes {
                log::warn!("{source}: write to {id} {property_id} denied");
                return Response::error(
                    service,
                    ErrorClass::Property,
                    ErrorCode::WriteAccessDenied,
                );
            }
            log::debug!("{source}: write to {id} {property_id} ignored");
            return Response::SimpleAck { service };
        }

        let Some(value) = req.value.as_real() else {
            log::warn!(
                "{source}: {} value rejected for {id} present-value",
                req.value.type_name()
            );
            return Response::error(service, ErrorClass::Property, ErrorCode::InvalidDataType);
        };
        match self.catalogue.set_present_value(id, value) {
            Ok(stored) => {
                log::debug!("{source}: {id} present-value <- {stored}");
                Response::SimpleAck { service }
            }
            Err(e) => {
                log::warn!("{source}: write to {id} failed: {e}");
                failure(service, &e)
            }
        }
    }

    fn subscribe_cov(&self, source: RequesterAddress, req: &SubscribeCovRequest) -> Response {
        let service = ConfirmedService::SubscribeCov;
        let monitored = req.monitored_object_id;
        if !self.catalogue.contains(monitored) {
            return Response::error(service, ErrorClass::Object, ErrorCode::UnknownObject);
        }
        if req.is_cancellation() {
            if self.cov.cancel(source, req).is_some() {
                log::info!("{source}: COV subscription on {monitored} cancelled");
            }
        } else {
            let replaced = self
                .cov
                .subscribe(CovSubscription::from_request(source, req));
            log::info!(
                "{source}: COV subscription on {monitored} stored{}",
                if replaced.is_some() { ", previous one replaced" } else { "" }
            );
        }
        Response::SimpleAck { service }
    }

    fn text_message(&self, source: RequesterAddress, msg: &TextMessageRequest) -> Option<Response> {
        log::info!(
            "text message from {source}{}: {}",
            msg.source_device
                .map(|d| format!(" ({d})"))
                .unwrap_or_default(),
            msg.message
        );
        msg.confirmed.then_some(Response::SimpleAck {
            service: ConfirmedService::ConfirmedTextMessage,
        })
    }

    fn other_confirmed(&self, source: RequesterAddress, service_choice: u8) -> Response {
        match ConfirmedService::from_u8(service_choice) {
            Some(
                ConfirmedService::ReadProperty
                | ConfirmedService::WriteProperty
                | ConfirmedService::SubscribeCov
                | ConfirmedService::ConfirmedTextMessage,
            ) => {
                // Modeled services must arrive decoded.
                log::warn!("{source}: undecoded service choice {service_choice}");
                Response::Reject {
                    reason: RejectReason::MissingRequiredParameter,
                }
            }
            Some(service) => {
                log::debug!("{source}: {service:?} not supported");
                Response::error(service, ErrorClass::Services, ErrorCode::ServiceRequestDenied)
            }
            None => {
                log::warn!("{source}: unrecognized confirmed service {service_choice}");
                Response::Reject {
                    reason: RejectReason::UnrecognizedService,
                }
            }
        }
    }
}

fn failure(service: ConfirmedService, err: &impl ServiceFailure) -> Response {
    let (error_class, error_code) = err.error_pair();
    Response::error(service, error_class, error_code)
}
