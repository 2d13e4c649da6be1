//! Responses for Network service Commands
use super::types::{NetworkRegistrationStat, NetworkRegistrationUrcConfig};
use atat::atat_derive::AtatResp;
use heapless::String;

/// 7.5 Read operator selection +COPS
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct OperatorSelection {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub format: Option<u8>,
    #[at_arg(position = 2)]
    pub oper: Option<String<24>>,
    #[at_arg(position = 3)]
    pub act: Option<u8>,
}

/// 7.14 Read network registration status +CREG
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct NetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: NetworkRegistrationUrcConfig,
    #[at_arg(position = 1)]
    pub stat: NetworkRegistrationStat,
    #[at_arg(position = 2)]
    pub lac: Option<String<4>>,
    #[at_arg(position = 3)]
    pub ci: Option<String<8>>,
    #[at_arg(position = 4)]
    pub act_status: Option<u8>,
}

/// 7.19 Signal quality +CSQ
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct SignalQuality {
    #[at_arg(position = 0)]
    pub rssi: u8,
    #[at_arg(position = 1)]
    pub ber: u8,
}
