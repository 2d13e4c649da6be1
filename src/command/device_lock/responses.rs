//! Responses for Device lock Commands
use super::types::PinStatusCode;

/// 9.1 Read PIN status +CPIN
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinStatus {
    pub code: PinStatusCode,
}

impl atat::AtatResp for PinStatus {}
