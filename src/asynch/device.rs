use atat::asynch::AtatClient;
use embassy_time::{with_timeout, Duration, Timer};
use heapless::String;

use super::state::{ModemState, Runner};
use super::AtHandle;
use crate::command::call_control::{Dial, Hangup};
use crate::command::device_lock::responses::PinStatus;
use crate::command::device_lock::types::PinStatusCode;
use crate::command::device_lock::{GetPinStatus, SetPin, SetPuk};
use crate::command::general::{GetCardId, GetFirmwareVersion, GetImei, GetManufacturerId, GetModelId};
use crate::command::mobile_control::GetExtendedErrorReport;
use crate::command::network_service::types::{
    NetworkRegistrationUrcConfig, OperatorFormat, OperatorSelectionMode,
};
use crate::command::network_service::{
    GetNetworkRegistrationStatus, GetSignalQuality, SetNetworkRegistrationUrc,
    SetOperatorSelection,
};
use crate::command::psn::impl_::resolve_cid;
use crate::command::psn::types::{ContextId, GPRSNetworkRegistrationUrcConfig};
use crate::command::psn::{
    GetPDPContextDefinitions, GetSupportedContextIds, SetGPRSNetworkRegistrationUrc,
    SetPDPContextDefinition,
};
use crate::command::{VendorCommand, AT};
use crate::config::VariantConfig;
use crate::error::Error;
use crate::port::ControlPort;
use crate::registration::Status;

/// Overall deadline for one registration attempt.
pub const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Cadence of `+CREG?` polling while the network keeps searching.
pub const REGISTRATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Identity strings reported by the device.
#[derive(Debug, Clone, PartialEq)]
pub struct ModemInfo {
    pub manufacturer: String<64>,
    pub model: String<64>,
    pub revision: String<64>,
}

/// Everything a one-shot bring-up needs. Optional parts are skipped.
#[derive(Debug, Clone, Default)]
pub struct SimpleConnectArgs<'a> {
    pub pin: Option<&'a str>,
    pub operator: Option<&'a str>,
    pub apn: Option<&'a str>,
    pub number: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectStep {
    Begin,
    Enable,
    CheckPin,
    Register,
    Context,
    Connect,
    Done,
}

/// Owning handle for the modem sequences: lifecycle, unlocking,
/// registration and data calls. There is exactly one of these per modem,
/// concurrent operations are serialized through the state guards.
pub struct ModemDevice<'a, AT: AtatClient, P: ControlPort> {
    ch: Runner<'a>,
    at: AtHandle<'a, AT>,
    port: P,
    config: VariantConfig<'a>,
}

impl<'a, AT: AtatClient, P: ControlPort> ModemDevice<'a, AT, P> {
    pub(crate) fn new(
        ch: Runner<'a>,
        at: AtHandle<'a, AT>,
        port: P,
        config: VariantConfig<'a>,
    ) -> Self {
        Self {
            ch,
            at,
            port,
            config,
        }
    }

    /// Marks the underlying device as hot-unplugged. Every sequence in
    /// flight or issued afterwards fails with `DeviceRemoved`.
    pub fn mark_removed(&mut self) {
        self.ch.mark_removed();
    }

    /// Brings the modem from `Disabled` to `Enabled`: opens the port,
    /// flashes it, runs the init commands, turns on the registration URCs
    /// and powers the radio up. Re-entrant calls while enabling fail with
    /// `InProgress`, enabling an enabled modem is a no-op.
    pub async fn enable(&mut self) -> Result<(), Error> {
        if !self.ch.try_begin_enable()? {
            return Ok(());
        }

        self.ch.set_active_cid(0);
        self.ch.set_data_traffic(false);

        if self.port.open().await.is_err() {
            self.ch.set_modem_state(ModemState::Disabled);
            return Err(Error::PortOpen);
        }

        match self.run_enable_sequence().await {
            Ok(()) => {
                info!("Modem enabled");
                self.ch.set_modem_state(ModemState::Enabled);
                Ok(())
            }
            Err(e) => {
                let _ = self.port.close().await;
                self.ch.set_modem_state(ModemState::Disabled);
                Err(e)
            }
        }
    }

    async fn run_enable_sequence(&mut self) -> Result<(), Error> {
        self.port
            .flash(self.config.flash_duration)
            .await
            .map_err(|_| Error::Flash)?;

        self.at
            .send(&VendorCommand::new(self.config.init_cmd))
            .await?;

        if let Some(line) = self.config.init_cmd_optional {
            if self.at.send(&VendorCommand::new(line)).await.is_err() {
                warn!("Optional init command failed, continuing");
            }
        }

        self.at
            .send(&SetNetworkRegistrationUrc {
                n: NetworkRegistrationUrcConfig::UrcEnabled,
            })
            .await?;
        self.at
            .send(&SetGPRSNetworkRegistrationUrc {
                n: GPRSNetworkRegistrationUrcConfig::UrcEnabled,
            })
            .await?;

        if let Some(line) = self.config.power_up_cmd {
            // Some devices reject power-up while already powered, which is
            // not worth failing the whole sequence over.
            if self.at.send(&VendorCommand::new(line)).await.is_err() {
                warn!("Power-up command failed, continuing");
            }
        }

        Ok(())
    }

    /// Takes the modem back to `Disabled`: hangs up a live data call,
    /// powers the radio down and closes the port. If the teardown fails
    /// half way the previous state is restored so the caller can retry.
    pub async fn disable(&mut self) -> Result<(), Error> {
        let Some(entry) = self.ch.try_begin_disable()? else {
            return Ok(());
        };

        self.ch.set_active_cid(0);
        // a registration attempt still pending observes the cancellation
        self.ch.cancel_registration();

        if self.ch.data_traffic() {
            if self.port.flash(self.config.flash_duration).await.is_err() {
                self.ch.set_modem_state(entry);
                return Err(Error::Flash);
            }
            let _ = self.at.send(&Hangup).await;
            self.ch.set_data_traffic(false);
        }

        if let Some(line) = self.config.power_down_cmd {
            if self.at.send(&VendorCommand::new(line)).await.is_err() {
                warn!("Power-down command failed, continuing");
            }
        }

        if self.port.close().await.is_err() {
            self.ch.set_modem_state(entry);
            return Err(Error::PortClosed);
        }

        self.ch.update_registration_with(|reg| reg.reset());
        self.ch.set_modem_state(ModemState::Disabled);
        info!("Modem disabled");
        Ok(())
    }

    /// Quick probe that the command channel responds at all.
    pub async fn is_alive(&mut self) -> Result<(), Error> {
        self.ch.ensure_present()?;
        self.at.send(&AT).await?;
        Ok(())
    }

    /// Which secret the SIM is waiting for, `None` when it is ready.
    pub async fn unlock_required(&mut self) -> Result<Option<PinStatusCode>, Error> {
        self.ch.ensure_present()?;
        let PinStatus { code } = self.at.send(&GetPinStatus).await?;
        Ok(match code {
            PinStatusCode::Ready => None,
            other => Some(other),
        })
    }

    /// Like [`unlock_required`](Self::unlock_required), but folds a locked
    /// SIM into an error carrying the wanted secret.
    pub async fn check_pin(&mut self) -> Result<(), Error> {
        match self.unlock_required().await? {
            None => Ok(()),
            Some(code) => Err(Error::PinNeeded(code)),
        }
    }

    pub async fn send_pin(&mut self, pin: &str) -> Result<(), Error> {
        self.ch.ensure_present()?;
        self.at
            .send(&SetPin { pin })
            .await
            .map_err(secret_rejection)?;
        Ok(())
    }

    pub async fn send_puk(&mut self, puk: &str, newpin: &str) -> Result<(), Error> {
        self.ch.ensure_present()?;
        self.at
            .send(&SetPuk { puk, newpin })
            .await
            .map_err(secret_rejection)?;
        Ok(())
    }

    /// Registers with the network, automatically or on a specific operator
    /// (numeric format).
    ///
    /// The attempt owns the shared completion slot: it is finished exactly
    /// once, by whichever of the unsolicited report path, the polling path
    /// or the deadline gets to a terminal status first. A concurrent
    /// disable or device removal finishes the slot from the outside, in
    /// which case the late command reply is dropped.
    pub async fn register(&mut self, operator: Option<&str>) -> Result<Status, Error> {
        if self.ch.modem_state(None) < ModemState::Enabled {
            return Err(Error::Disabled);
        }
        self.ch.begin_registration()?;
        let mut slot = SlotGuard {
            ch: self.ch.clone(),
            armed: true,
        };
        self.ch.update_registration_with(|reg| reg.reset());
        info!("Registering with the network");

        let ch = self.ch.clone();
        let driver = drive_registration(ch.clone(), self.at.clone(), operator);

        let candidate = match with_timeout(REGISTRATION_TIMEOUT, driver).await {
            Ok(candidate) => candidate,
            // a denial observed on the way beats the generic timeout
            Err(_) if ch.registration(None) == Status::Denied => Err(Error::RegistrationDenied),
            Err(_) => Err(Error::Timeout),
        };
        self.ch.try_finish_registration(candidate);

        let result = self
            .ch
            .take_registration_result()
            .unwrap_or(Err(Error::Canceled));
        slot.armed = false;

        if let Ok(status) = &result {
            if status.registered() && self.ch.modem_state(None) == ModemState::Enabled {
                self.ch.set_modem_state(ModemState::Registered);
            }
        }
        result
    }

    /// Points the data session at `apn`, reusing an existing context with
    /// the exact same APN when the device has one. Returns the context id
    /// that was adopted.
    pub async fn set_apn(&mut self, apn: &str) -> Result<u8, Error> {
        self.ch.ensure_present()?;
        if self.ch.modem_state(None) < ModemState::Enabled {
            return Err(Error::Disabled);
        }

        let contexts = match self.at.send(&GetPDPContextDefinitions).await {
            Ok(defs) => defs.contexts,
            Err(atat::Error::Parse) => return Err(Error::Protocol),
            Err(e) => return Err(e.into()),
        };

        if let Some(ctx) = contexts
            .iter()
            .find(|c| c.pdp_type.as_str() == "IP" && c.apn.as_str() == apn)
        {
            debug!("Adopting existing context {}", ctx.cid);
            self.ch.set_active_cid(ctx.cid);
            return Ok(ctx.cid);
        }

        let range = match self.at.send(&GetSupportedContextIds).await {
            Ok(range) => range,
            Err(atat::Error::Parse) => return Err(Error::Protocol),
            Err(e) => return Err(e.into()),
        };

        let cid = resolve_cid(&contexts, apn, range.max).cid();

        self.at
            .send(&SetPDPContextDefinition {
                cid: ContextId(cid),
                pdp_type: "IP",
                apn,
            })
            .await?;
        self.ch.set_active_cid(cid);
        Ok(cid)
    }

    /// Dials the data call. With an APN set up this is a packet call on
    /// the resolved context id, otherwise a plain circuit switched dial.
    /// On failure the device is asked for an extended error report, which
    /// is folded into the returned error when available.
    pub async fn connect(&mut self, number: &str) -> Result<(), Error> {
        self.ch.ensure_present()?;
        let entry = self.ch.modem_state(None);
        match entry {
            ModemState::Connecting | ModemState::Disconnecting => return Err(Error::InProgress),
            ModemState::Connected => return Ok(()),
            state if state < ModemState::Enabled => return Err(Error::Disabled),
            _ => {}
        }
        self.ch.set_modem_state(ModemState::Connecting);

        let cid = self.ch.active_cid();
        let dial = if cid > 0 {
            Dial::packet(number, cid)
        } else {
            Dial::circuit(number)
        };

        match self.at.send(&dial).await {
            Ok(_) => {
                self.ch.set_data_traffic(true);
                self.ch.set_modem_state(ModemState::Connected);
                info!("Data call connected");
                Ok(())
            }
            Err(dial_err) => {
                self.ch.set_modem_state(entry);
                match self.at.send(&GetExtendedErrorReport).await {
                    Ok(reason) => Err(Error::Dial(reason.report)),
                    Err(_) => Err(Error::Atat(dial_err)),
                }
            }
        }
    }

    /// Drops back to command mode with a port flash, then hangs up.
    pub async fn disconnect(&mut self) -> Result<(), Error> {
        self.ch.ensure_present()?;
        let entry = self.ch.modem_state(None);
        match entry {
            ModemState::Disconnecting => return Err(Error::InProgress),
            state if state <= ModemState::Registered => return Ok(()),
            _ => {}
        }
        self.ch.set_modem_state(ModemState::Disconnecting);

        if self.port.flash(self.config.flash_duration).await.is_err() {
            self.ch.set_modem_state(entry);
            return Err(Error::Flash);
        }

        if let Err(e) = self.at.send(&Hangup).await {
            self.ch.set_modem_state(entry);
            return Err(e.into());
        }

        self.ch.set_data_traffic(false);
        let next = if self.ch.is_registered(None) {
            ModemState::Registered
        } else {
            ModemState::Enabled
        };
        self.ch.set_modem_state(next);
        info!("Data call disconnected");
        Ok(())
    }

    /// Fresh `+CSQ` measurement as a percentage, cached for the status
    /// surface. An unknown measurement clears the cache and reports
    /// `NoNetwork`.
    pub async fn signal_quality(&mut self) -> Result<u8, Error> {
        self.ch.ensure_present()?;
        let quality = self.at.send(&GetSignalQuality).await?;
        match quality.percent() {
            Ok(percent) => {
                self.ch.set_signal_percent(Some(percent));
                Ok(percent)
            }
            Err(e) => {
                self.ch.set_signal_percent(None);
                Err(e)
            }
        }
    }

    pub async fn modem_info(&mut self) -> Result<ModemInfo, Error> {
        self.ch.ensure_present()?;
        let manufacturer = self.at.send(&GetManufacturerId).await?.id;
        let model = self.at.send(&GetModelId).await?.id;
        let revision = self.at.send(&GetFirmwareVersion).await?.version;
        Ok(ModemInfo {
            manufacturer,
            model,
            revision,
        })
    }

    pub async fn imei(&mut self) -> Result<String<24>, Error> {
        self.ch.ensure_present()?;
        Ok(self.at.send(&GetImei).await?.imei)
    }

    pub async fn sim_ccid(&mut self) -> Result<String<24>, Error> {
        self.ch.ensure_present()?;
        Ok(self.at.send(&GetCardId).await?.ccid)
    }

    /// One-shot bring-up: enable, unlock, register, set up the APN and
    /// dial. A locked SIM is unlocked with the provided PIN where that is
    /// the secret the SIM asks for, any other lock is surfaced as
    /// `PinNeeded`.
    pub async fn simple_connect(&mut self, args: SimpleConnectArgs<'_>) -> Result<(), Error> {
        let mut step = ConnectStep::Begin;
        loop {
            step = match step {
                ConnectStep::Begin => ConnectStep::Enable,
                ConnectStep::Enable => {
                    self.enable().await?;
                    ConnectStep::CheckPin
                }
                ConnectStep::CheckPin => match self.check_pin().await {
                    Ok(()) => ConnectStep::Register,
                    Err(Error::PinNeeded(PinStatusCode::SimPin)) => match args.pin {
                        Some(pin) => {
                            self.send_pin(pin).await?;
                            ConnectStep::Register
                        }
                        None => return Err(Error::PinNeeded(PinStatusCode::SimPin)),
                    },
                    Err(e) => return Err(e),
                },
                ConnectStep::Register => {
                    self.register(args.operator).await?;
                    ConnectStep::Context
                }
                ConnectStep::Context => {
                    if let Some(apn) = args.apn {
                        self.set_apn(apn).await?;
                    }
                    ConnectStep::Connect
                }
                ConnectStep::Connect => {
                    self.connect(args.number).await?;
                    ConnectStep::Done
                }
                ConnectStep::Done => return Ok(()),
            };
        }
    }
}

fn secret_rejection(e: atat::Error) -> Error {
    match e {
        atat::Error::Timeout => Error::Atat(atat::Error::Timeout),
        _ => Error::InvalidSecret,
    }
}

fn classify_terminal(status: Status) -> Result<Status, Error> {
    match status {
        Status::Denied => Err(Error::RegistrationDenied),
        other => Ok(other),
    }
}

/// Hands the completion slot back when a [`ModemDevice::register`] future
/// is dropped mid-flight, so the next attempt does not run into a stale
/// `InProgress`.
struct SlotGuard<'a> {
    ch: Runner<'a>,
    armed: bool,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.ch.abandon_registration();
        }
    }
}

/// Races the unsolicited report path against the explicit request/poll
/// path and a removal watch. Whichever observes a terminal status first
/// produces the candidate result for the completion slot.
async fn drive_registration<AT: AtatClient>(
    ch: Runner<'_>,
    at: AtHandle<'_, AT>,
    operator: Option<&str>,
) -> Result<Status, Error> {
    let mut urc_at = at.clone();
    let urc_watcher = async {
        loop {
            let status = ch.wait_registration_update().await;
            if !status.terminal() {
                continue;
            }
            // confirm with a direct poll so a stale or flapping report
            // does not conclude the attempt
            let resp = urc_at
                .send(&GetNetworkRegistrationStatus)
                .await
                .map_err(Error::from)?;
            let verified = Status::from(resp.stat);
            ch.update_registration_with(|reg| reg.compare_and_set(resp.into()));
            if verified.terminal() {
                return classify_terminal(verified);
            }
        }
    };

    let mut req_at = at;
    let requester = async {
        let request = match operator {
            Some(oper) => {
                req_at
                    .send(&SetOperatorSelection {
                        mode: OperatorSelectionMode::Manual,
                        format: Some(OperatorFormat::Numeric),
                        oper: Some(oper),
                    })
                    .await
            }
            None => {
                req_at
                    .send(&SetOperatorSelection {
                        mode: OperatorSelectionMode::Automatic,
                        format: None,
                        oper: None,
                    })
                    .await
            }
        };
        request.map_err(Error::from)?;

        // the reply to the explicit request only matters while the
        // attempt is still ours; finished from outside means drop it
        if !ch.registration_pending() {
            return core::future::pending().await;
        }

        loop {
            let resp = req_at
                .send(&GetNetworkRegistrationStatus)
                .await
                .map_err(Error::from)?;
            let status = Status::from(resp.stat);
            ch.update_registration_with(|reg| reg.compare_and_set(resp.into()));
            if status.terminal() {
                return classify_terminal(status);
            }
            Timer::after(REGISTRATION_POLL_INTERVAL).await;
        }
    };

    let removal = async {
        ch.wait_removed().await;
        Err(Error::DeviceRemoved)
    };

    match embassy_futures::select::select3(urc_watcher, requester, removal).await {
        embassy_futures::select::Either3::First(result) => result,
        embassy_futures::select::Either3::Second(result) => result,
        embassy_futures::select::Either3::Third(result) => result,
    }
}
