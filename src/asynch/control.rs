use atat::asynch::AtatClient;
use heapless::String;

use crate::{
    command::network_service::{responses::OperatorSelection, GetOperatorSelection},
    command::psn::GetGPRSNetworkRegistrationStatus,
    error::Error,
    registration::Status,
};

use super::{
    state::{self, ModemState},
    AtHandle,
};

/// Point-in-time status snapshot assembled from the shared state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemStatus {
    pub state: ModemState,
    pub registration: Status,
    pub active_cid: u8,
    pub signal_percent: Option<u8>,
}

/// Read-only view of the modem, cheap to hand out to status consumers
/// while [`ModemDevice`](super::device::ModemDevice) owns the sequences.
pub struct Control<'a, AT: AtatClient> {
    state_ch: state::Runner<'a>,
    at: AtHandle<'a, AT>,
}

impl<'a, AT: AtatClient> Control<'a, AT> {
    pub(crate) fn new(state_ch: state::Runner<'a>, at: AtHandle<'a, AT>) -> Self {
        Self { state_ch, at }
    }

    pub fn modem_state(&self) -> ModemState {
        self.state_ch.modem_state(None)
    }

    pub fn registration(&self) -> Status {
        self.state_ch.registration(None)
    }

    pub fn is_registered(&self) -> bool {
        self.state_ch.is_registered(None)
    }

    pub fn status(&self) -> ModemStatus {
        ModemStatus {
            state: self.state_ch.modem_state(None),
            registration: self.state_ch.registration(None),
            active_cid: self.state_ch.active_cid(),
            signal_percent: self.state_ch.signal_percent(),
        }
    }

    /// Resolves on the next lifecycle transition.
    pub async fn wait_state_change(&self) -> ModemState {
        self.state_ch.wait_modem_state_change().await
    }

    /// Resolves on the next registration report.
    pub async fn wait_registration_update(&self) -> Status {
        self.state_ch.wait_registration_update().await
    }

    /// Flags the device as gone, typically from a hotplug watcher. Any
    /// registration attempt in flight fails with `DeviceRemoved`.
    pub fn notify_removed(&self) {
        self.state_ch.mark_removed();
    }

    /// The operator currently camped on, when the device reports one.
    pub async fn operator(&mut self) -> Result<Option<String<24>>, Error> {
        if self.modem_state() < ModemState::Enabled {
            return Err(Error::Disabled);
        }

        let OperatorSelection { oper, .. } = self.at.send(&GetOperatorSelection).await?;
        Ok(oper)
    }

    /// Direct poll of the packet switched registration status. The report
    /// is folded into the shared tracker like an unsolicited one.
    pub async fn packet_domain_status(&mut self) -> Result<Status, Error> {
        if self.modem_state() < ModemState::Enabled {
            return Err(Error::Disabled);
        }

        let resp = self.at.send(&GetGPRSNetworkRegistrationStatus).await?;
        let status = Status::from(resp.stat);
        self.state_ch
            .update_registration_with(|reg| reg.compare_and_set(resp.into()));
        Ok(status)
    }

    /// Escape hatch for vendor specific configuration. Interfering with
    /// the commands the driver issues itself is on the caller.
    pub async fn send<Cmd: atat::AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, Error> {
        Ok(self.at.send::<Cmd>(cmd).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asynch::state::State;
    use crate::test_helpers::MockAt;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::mutex::Mutex;

    #[test]
    fn operator_query_requires_an_enabled_modem() {
        let at = MockAt::new();
        let at_mutex: Mutex<NoopRawMutex, MockAt> = Mutex::new(at.clone());
        let mut shared = State::new();
        let ch = state::Runner::new(&mut shared);
        let mut control = Control::new(ch.clone(), AtHandle(&at_mutex));

        assert_eq!(block_on(control.operator()), Err(Error::Disabled));
        assert!(at.sent().is_empty());

        ch.set_modem_state(ModemState::Enabled);
        at.reply_ok(b"+COPS: 0,0,\"Operator\"");
        let oper = block_on(control.operator()).unwrap();
        assert_eq!(oper.as_deref(), Some("Operator"));
    }

    #[test]
    fn packet_domain_poll_feeds_the_tracker() {
        let at = MockAt::new();
        let at_mutex: Mutex<NoopRawMutex, MockAt> = Mutex::new(at.clone());
        let mut shared = State::new();
        let ch = state::Runner::new(&mut shared);
        let mut control = Control::new(ch.clone(), AtHandle(&at_mutex));

        ch.set_modem_state(ModemState::Enabled);
        at.reply_ok(b"+CGREG: 1,1,\"00C3\",\"001A2B3C\"");

        assert_eq!(block_on(control.packet_domain_status()), Ok(Status::Home));
        assert!(control.is_registered());
        assert_eq!(control.status().registration, Status::Home);
    }
}
