//! Single-slot change-of-value subscription record.
//!
//! The device accepts one outstanding subscription at a time and overwrites
//! it on every new request. Notifications are never sent; the slot exists so
//! that clients which insist on subscribing get their acknowledgement.

use bacsim_core::services::SubscribeCovRequest;
use bacsim_core::types::ObjectId;
use bacsim_core::RequesterAddress;
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// An accepted SubscribeCOV request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CovSubscription {
    pub subscriber: RequesterAddress,
    pub subscriber_process_id: u32,
    pub monitored_object_id: ObjectId,
    pub issue_confirmed_notifications: bool,
    /// `None` means indefinite.
    pub lifetime: Option<Duration>,
    pub accepted_at: Instant,
}

impl CovSubscription {
    pub fn from_request(subscriber: RequesterAddress, request: &SubscribeCovRequest) -> Self {
        Self {
            subscriber,
            subscriber_process_id: request.subscriber_process_id,
            monitored_object_id: request.monitored_object_id,
            issue_confirmed_notifications: request.issue_confirmed_notifications.unwrap_or(false),
            lifetime: request
                .lifetime_seconds
                .filter(|&secs| secs > 0)
                .map(|secs| Duration::from_secs(u64::from(secs))),
            accepted_at: Instant::now(),
        }
    }

    /// Whether the lifetime has run out. Expiry is informational only.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.lifetime
            .map(|lifetime| now.saturating_duration_since(self.accepted_at) >= lifetime)
            .unwrap_or(false)
    }

    fn same_subscription(&self, subscriber: RequesterAddress, request: &SubscribeCovRequest) -> bool {
        self.subscriber == subscriber
            && self.subscriber_process_id == request.subscriber_process_id
            && self.monitored_object_id == request.monitored_object_id
    }
}

#[derive(Debug, Default)]
pub struct CovSlot {
    slot: Mutex<Option<CovSubscription>>,
}

impl CovSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the subscription, returning whatever it replaced.
    pub fn subscribe(&self, subscription: CovSubscription) -> Option<CovSubscription> {
        self.slot.lock().replace(subscription)
    }

    /// Clears the slot if it holds the subscription `request` cancels.
    /// Returns the removed record.
    pub fn cancel(
        &self,
        subscriber: RequesterAddress,
        request: &SubscribeCovRequest,
    ) -> Option<CovSubscription> {
        let mut slot = self.slot.lock();
        if slot
            .as_ref()
            .is_some_and(|current| current.same_subscription(subscriber, request))
        {
            slot.take()
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<CovSubscription> {
        self.slot.lock().clone()
    }

    pub fn clear(&self) -> Option<CovSubscription> {
        self.slot.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::{CovSlot, CovSubscription};
    use bacsim_core::services::SubscribeCovRequest;
    use bacsim_core::types::{ObjectId, ObjectType};
    use bacsim_core::RequesterAddress;
    use std::time::{Duration, Instant};

    fn request(process_id: u32, instance: u32) -> SubscribeCovRequest {
        SubscribeCovRequest {
            subscriber_process_id: process_id,
            monitored_object_id: ObjectId::new(ObjectType::AnalogInput, instance),
            issue_confirmed_notifications: Some(false),
            lifetime_seconds: Some(300),
        }
    }

    #[test]
    fn new_subscription_overwrites_previous() {
        let slot = CovSlot::new();
        let a = RequesterAddress::localhost(47808);
        let b = RequesterAddress::localhost(47809);

        assert!(slot
            .subscribe(CovSubscription::from_request(a, &request(1, 1)))
            .is_none());
        let replaced = slot
            .subscribe(CovSubscription::from_request(b, &request(2, 5)))
            .unwrap();
        assert_eq!(replaced.subscriber, a);

        let current = slot.current().unwrap();
        assert_eq!(current.subscriber, b);
        assert_eq!(current.subscriber_process_id, 2);
        assert_eq!(current.lifetime, Some(Duration::from_secs(300)));
    }

    #[test]
    fn cancellation_only_clears_matching_subscription() {
        let slot = CovSlot::new();
        let a = RequesterAddress::localhost(47808);
        slot.subscribe(CovSubscription::from_request(a, &request(1, 1)));

        let other = SubscribeCovRequest::cancel(9, ObjectId::new(ObjectType::AnalogInput, 1));
        assert!(slot.cancel(a, &other).is_none());
        assert!(slot.current().is_some());

        let own = SubscribeCovRequest::cancel(1, ObjectId::new(ObjectType::AnalogInput, 1));
        assert!(slot.cancel(a, &own).is_some());
        assert!(slot.current().is_none());
    }

    #[test]
    fn zero_lifetime_never_expires() {
        let mut req = request(1, 1);
        req.lifetime_seconds = Some(0);
        let sub = CovSubscription::from_request(RequesterAddress::localhost(1), &req);
        assert_eq!(sub.lifetime, None);
        assert!(!sub.is_expired(Instant::now() + Duration::from_secs(86_400)));

        let sub = CovSubscription::from_request(RequesterAddress::localhost(1), &request(1, 1));
        assert!(sub.is_expired(sub.accepted_at + Duration::from_secs(300)));
    }
}
