//! ### 6 - Call control

pub mod impl_;

use atat::atat_derive::AtatCmd;
use core::fmt::Write;
use heapless::String;

use super::NoResponse;

/// 6.1 Dial command D
///
/// Starts a data call. The command line is built up front since the dial
/// string grammar predates structured AT arguments: a packet call encodes
/// the context id into the number (`ATD*99***<cid>#`), a circuit switched
/// call uses tone dialing (`ATDT<number>`).
#[derive(Debug, Clone)]
pub struct Dial {
    pub(crate) line: String<48>,
}

impl Dial {
    /// Packet switched dial on an already resolved context id. A trailing
    /// `#` on the number makes way for the context suffix.
    pub fn packet(number: &str, cid: u8) -> Self {
        let number = number.strip_suffix('#').unwrap_or(number);
        let mut line: String<48> = String::new();
        let _ = write!(line, "ATD{}***{}#", number, cid);
        Self { line }
    }

    /// Circuit switched (CSD) dial.
    pub fn circuit(number: &str) -> Self {
        let mut line: String<48> = String::new();
        let _ = write!(line, "ATDT{}", number);
        Self { line }
    }
}

/// 6.5 Hook control H
///
/// Disconnects the remote end. Issued after dropping back to command mode
/// via a port flash.
#[derive(Clone, AtatCmd)]
#[at_cmd("H", NoResponse, timeout_ms = 20000)]
pub struct Hangup;
