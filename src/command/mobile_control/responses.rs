//! Responses for Mobile equipment control and status
use heapless::String;

/// 5.10 Extended error report +CEER
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExtendedErrorReport {
    pub report: String<64>,
}

impl atat::AtatResp for ExtendedErrorReport {}
