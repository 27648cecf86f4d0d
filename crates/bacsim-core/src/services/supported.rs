use super::{ConfirmedService, UnconfirmedService};
use crate::types::BitString;

/// Width of the protocol-services-supported bitmap at protocol revision 22.
pub const SERVICES_SUPPORTED_BITS: usize = 44;

/// Builder for the device's protocol-services-supported bit string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesSupported {
    bits: BitString,
}

impl ServicesSupported {
    /// A bitmap with every service declared unsupported.
    pub fn none() -> Self {
        Self {
            bits: BitString::zeros(SERVICES_SUPPORTED_BITS),
        }
    }

    pub fn with_confirmed(mut self, service: ConfirmedService) -> Self {
        self.bits.set(service.supported_bit(), true);
        self
    }

    pub fn with_unconfirmed(mut self, service: UnconfirmedService) -> Self {
        self.bits.set(service.supported_bit(), true);
        self
    }

    pub fn supports_confirmed(&self, service: ConfirmedService) -> bool {
        self.bits.bit(service.supported_bit()).unwrap_or(false)
    }

    pub fn supports_unconfirmed(&self, service: UnconfirmedService) -> bool {
        self.bits.bit(service.supported_bit()).unwrap_or(false)
    }

    pub fn as_bit_string(&self) -> &BitString {
        &self.bits
    }

    pub fn into_bit_string(self) -> BitString {
        self.bits
    }
}
