//! ### 7 - Network service

mod impl_;
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;
use responses::*;
use types::*;

use super::NoResponse;

/// 7.5 Operator selection +COPS
///
/// Forces an attempt to select and register with the network operator. In
/// automatic mode the operator parameter is ignored, in manual mode the
/// operator must be given in numeric format. Registration itself proceeds
/// in the background, progress is reported over `+CREG`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS", NoResponse, attempts = 1, timeout_ms = 120000, abortable = true)]
pub struct SetOperatorSelection<'a> {
    #[at_arg(position = 0)]
    pub mode: OperatorSelectionMode,
    #[at_arg(position = 1)]
    pub format: Option<OperatorFormat>,
    #[at_arg(position = 2, len = 24)]
    pub oper: Option<&'a str>,
}

/// 7.5 Read operator selection +COPS
///
/// Returns the current selection mode and, when registered, the operator
/// the MT is camped on.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS?", OperatorSelection, timeout_ms = 10000)]
pub struct GetOperatorSelection;

/// 7.14 Network registration status +CREG
///
/// Configures the network registration URC related to the CS domain. With
/// <n>=1 the device issues `+CREG: <stat>` whenever its circuit switched
/// registration status changes.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG", NoResponse)]
pub struct SetNetworkRegistrationUrc {
    #[at_arg(position = 0)]
    pub n: NetworkRegistrationUrcConfig,
}

/// 7.14 Read network registration status +CREG
///
/// Provides the same information issued by the URC together with the
/// current value of the <n> parameter.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG?", NetworkRegistrationStatus, timeout_ms = 10000)]
pub struct GetNetworkRegistrationStatus;

/// 7.19 Signal quality +CSQ
///
/// Returns the received signal strength indication and the channel bit
/// error rate as seen by the MT.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", SignalQuality, timeout_ms = 10000)]
pub struct GetSignalQuality;
