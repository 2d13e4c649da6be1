//! AT commands for 3GPP TS 27.007 compatible cellular modems, grouped the
//! way the specification groups them.

pub mod call_control;
pub mod device_lock;
pub mod general;
pub mod mobile_control;
pub mod network_service;
pub mod psn;

use atat::atat_derive::{AtatCmd, AtatResp, AtatUrc};

#[derive(Debug, Clone, PartialEq, AtatResp)]
pub struct NoResponse;

/// Attention probe, used to check the command channel is alive.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse, attempts = 1, timeout_ms = 1000)]
pub struct AT;

/// A complete command line taken from the variant configuration, sent
/// verbatim. This is how vendor specific init and power hooks reach the
/// device without the core knowing their syntax.
#[derive(Debug, Clone)]
pub struct VendorCommand<'a> {
    line: &'a str,
}

impl<'a> VendorCommand<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line }
    }
}

impl atat::AtatCmd for VendorCommand<'_> {
    type Response = NoResponse;

    const MAX_LEN: usize = 128;
    const MAX_TIMEOUT_MS: u32 = 10_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let line = self.line.as_bytes();
        let len = line.len().min(buf.len().saturating_sub(1));
        buf[..len].copy_from_slice(&line[..len]);
        buf[len] = b'\r';
        len + 1
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        resp.map(|_| NoResponse).map_err(atat::Error::from)
    }
}

#[derive(Debug, Clone, PartialEq, AtatUrc)]
pub enum Urc {
    #[at_urc("+CREG")]
    NetworkRegistration(network_service::urc::NetworkRegistration),
    #[at_urc("+CGREG")]
    GPRSNetworkRegistration(psn::urc::GPRSNetworkRegistration),
    #[at_urc("+CGEV")]
    PacketSwitchedEvent(psn::urc::PacketSwitchedEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn vendor_command_is_sent_verbatim() {
        let cmd = VendorCommand::new("ATZ E0 V1 +CMEE=1");
        let mut buf = [0u8; 128];
        let len = cmd.write(&mut buf);
        assert_eq!(&buf[..len], b"ATZ E0 V1 +CMEE=1\r");
    }

    #[test]
    fn urc_carries_spaced_event_text() {
        let urc = <Urc as atat::AtatUrc>::parse(b"+CGEV: NW DETACH").unwrap();
        match urc {
            Urc::PacketSwitchedEvent(event) => assert_eq!(&*event.message, b"NW DETACH"),
            other => panic!("unexpected urc: {:?}", other),
        }
    }

    #[test]
    fn urc_parses_creg() {
        use crate::command::network_service::types::NetworkRegistrationStat;

        let urc = <Urc as atat::AtatUrc>::parse(b"+CREG: 5").unwrap();
        assert_eq!(
            urc,
            Urc::NetworkRegistration(network_service::urc::NetworkRegistration {
                stat: NetworkRegistrationStat::RegisteredRoaming,
            })
        );
    }
}
