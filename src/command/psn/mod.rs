//! ### 18 - Packet Switched Data Services
//!
//! A PDP context holds the connection parameters for a packet data session,
//! most importantly the access point name. Contexts are identified by a
//! small integer, the context id, and are stored persistently on the
//! device. The commands here define contexts and track the packet switched
//! registration state.

pub mod impl_;
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;
use responses::GPRSNetworkRegistrationStatus;
use types::{ContextId, GPRSNetworkRegistrationUrcConfig};

use super::NoResponse;

/// 18.4 PDP context definition +CGDCONT
///
/// Defines the connection parameters for a PDP context, identified by the
/// local context identification parameter <cid>. The definition is
/// persistent over power cycles.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: ContextId,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 99)]
    pub apn: &'a str,
}

/// 18.4 Read PDP context definitions +CGDCONT
///
/// Returns one row per context that has already been defined. A device
/// with no defined contexts answers with an empty information text
/// response, which is reported as a parse error.
#[derive(Debug, Clone)]
pub struct GetPDPContextDefinitions;

/// 18.4 Test PDP context definitions +CGDCONT
///
/// Returns one row per supported <PDP_type> with the supported <cid>
/// range. Only the "IP" row is of interest here.
#[derive(Debug, Clone)]
pub struct GetSupportedContextIds;

/// 18.27 GPRS network registration status +CGREG
///
/// Configures the GPRS network registration URC. With <n>=1 the device
/// issues `+CGREG: <stat>` whenever its packet switched registration
/// status changes.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGREG", NoResponse)]
pub struct SetGPRSNetworkRegistrationUrc {
    #[at_arg(position = 0)]
    pub n: GPRSNetworkRegistrationUrcConfig,
}

/// 18.27 Read GPRS network registration status +CGREG
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGREG?", GPRSNetworkRegistrationStatus, timeout_ms = 10000)]
pub struct GetGPRSNetworkRegistrationStatus;
