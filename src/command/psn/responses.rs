//! Responses for Packet Switched Data Services
use super::types::{GPRSNetworkRegistrationStat, GPRSNetworkRegistrationUrcConfig, MAX_CONTEXTS};
use atat::atat_derive::AtatResp;
use heapless::{String, Vec};

/// A single row of the `+CGDCONT?` information text response.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PdpContextDefinition {
    pub cid: u8,
    pub pdp_type: String<8>,
    pub apn: String<64>,
}

/// 18.4 Read PDP context definitions +CGDCONT
#[derive(Debug, Clone, PartialEq)]
pub struct PDPContextDefinitions {
    pub contexts: Vec<PdpContextDefinition, MAX_CONTEXTS>,
}

impl atat::AtatResp for PDPContextDefinitions {}

/// 18.4 Test PDP context definitions +CGDCONT
///
/// The supported <cid> range for the "IP" PDP type.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportedContextIds {
    pub min: u8,
    pub max: u8,
}

impl atat::AtatResp for SupportedContextIds {}

/// 18.27 Read GPRS network registration status +CGREG
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct GPRSNetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: GPRSNetworkRegistrationUrcConfig,
    #[at_arg(position = 1)]
    pub stat: GPRSNetworkRegistrationStat,
    #[at_arg(position = 2)]
    pub lac: Option<String<4>>,
    #[at_arg(position = 3)]
    pub ci: Option<String<8>>,
}
