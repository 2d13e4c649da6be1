pub mod control;
pub mod device;
pub mod state;
pub mod urc_handler;

use crate::{command::Urc, config::VariantConfig, port::ControlPort};
use atat::{asynch::AtatClient, UrcChannel};
use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};

use self::control::Control;
use self::device::ModemDevice;
use self::urc_handler::UrcHandler;

pub const URC_SUBSCRIBERS: usize = 1;

pub struct AtHandle<'d, AT: AtatClient>(pub(crate) &'d Mutex<NoopRawMutex, AT>);

impl<'d, AT: AtatClient> Clone for AtHandle<'d, AT> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl<'d, AT: AtatClient> AtHandle<'d, AT> {
    async fn send<Cmd: atat::AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, atat::Error> {
        self.0.lock().await.send_retry::<Cmd>(cmd).await
    }
}

pub struct State<AT: AtatClient> {
    ch: state::State,
    at_handle: Mutex<NoopRawMutex, AT>,
}

impl<AT: AtatClient> State<AT> {
    pub fn new(at_handle: AT) -> Self {
        Self {
            ch: state::State::new(),
            at_handle: Mutex::new(at_handle),
        }
    }
}

/// Wires up the three halves of the driver: the device handle carrying the
/// modem sequences, the read-only control surface, and the URC dispatcher
/// that must be polled (`run()`) for unsolicited reports to be folded into
/// the shared state.
pub fn new<'a, AT: AtatClient, P: ControlPort, const URC_CAPACITY: usize>(
    state: &'a mut State<AT>,
    urc_channel: &'a UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
    port: P,
    config: VariantConfig<'a>,
) -> Result<
    (
        ModemDevice<'a, AT, P>,
        Control<'a, AT>,
        UrcHandler<'a, URC_CAPACITY>,
    ),
    crate::error::Error,
> {
    let ch = state::Runner::new(&mut state.ch);

    let urc_handler = UrcHandler::new(ch.clone(), urc_channel)?;
    let control = Control::new(ch.clone(), AtHandle(&state.at_handle));
    let device = ModemDevice::new(ch, AtHandle(&state.at_handle), port, config);

    Ok((device, control, urc_handler))
}
