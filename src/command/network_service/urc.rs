//! Unsolicited responses for Network service Commands
use super::types::NetworkRegistrationStat;
use atat::atat_derive::AtatResp;

/// 7.14 Network registration status +CREG
#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct NetworkRegistration {
    #[at_arg(position = 0)]
    pub stat: NetworkRegistrationStat,
}
