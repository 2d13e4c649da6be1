//! ### 9 - Device lock

pub mod impl_;
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;

use super::NoResponse;

/// 9.1 Read PIN status +CPIN
///
/// Reports which secret, if any, the SIM is waiting for before it will
/// serve the device. The reply is an unquoted token, parsed by hand in
/// `impl_.rs`.
#[derive(Debug, Clone)]
pub struct GetPinStatus;

/// 9.1 Enter PIN +CPIN
///
/// Enter PIN. If no PIN request is pending, the corresponding error code is
/// returned. If a wrong PIN is given three times, the PUK must be inserted
/// in place of the PIN.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN", NoResponse, timeout_ms = 10000)]
pub struct SetPin<'a> {
    #[at_arg(position = 0, len = 8)]
    pub pin: &'a str,
}

/// 9.1 Enter PUK +CPIN
///
/// Unblocks a SIM whose PIN has been exhausted. The <newpin> replaces the
/// old pin in the SIM.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPIN", NoResponse, timeout_ms = 10000)]
pub struct SetPuk<'a> {
    #[at_arg(position = 0, len = 8)]
    pub puk: &'a str,
    #[at_arg(position = 1, len = 8)]
    pub newpin: &'a str,
}
