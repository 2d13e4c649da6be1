//! Unsolicited responses for Packet Switched Data Services
use super::types::GPRSNetworkRegistrationStat;
use atat::atat_derive::AtatResp;
use atat::heapless_bytes::Bytes;
use heapless::String;

/// 18.27 GPRS network registration status +CGREG
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct GPRSNetworkRegistration {
    #[at_arg(position = 0)]
    pub stat: GPRSNetworkRegistrationStat,
    #[at_arg(position = 1)]
    pub lac: Option<String<4>>,
    #[at_arg(position = 2)]
    pub ci: Option<String<8>>,
}

/// 18.26 Packet switched event reporting +CGEV
///
/// Free-form event text, e.g. `NW DETACH` or `ME PDN ACT 1`, carried as
/// raw bytes since it is unquoted on the wire. Only logged, the
/// registration URCs carry the state the driver acts on.
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct PacketSwitchedEvent {
    #[at_arg(position = 0)]
    pub message: Bytes<48>,
}
