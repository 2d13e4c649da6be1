use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;

use crate::error::Error;
use crate::registration::{RegistrationState, Status};

/// Lifecycle state of the modem. Ordered so that "at least enabled" can be
/// expressed as a comparison.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModemState {
    Disabled = 0,
    Disabling = 1,
    Enabling = 2,
    Enabled = 3,
    Registered = 4,
    Connecting = 5,
    Connected = 6,
    Disconnecting = 7,
}

/// Single-owner completion slot for a registration attempt. Arming claims
/// the slot, exactly one finisher wins, everyone else sees the slot taken.
enum RegistrationSlot {
    Idle,
    Armed,
    Finished(Result<Status, Error>),
}

pub struct State {
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                modem_state: ModemState::Disabled,
                removed: false,
                registration_state: RegistrationState::new(),
                registration_epoch: 0,
                registration_slot: RegistrationSlot::Idle,
                active_cid: 0,
                data_traffic: false,
                signal_percent: None,
                state_waker: WakerRegistration::new(),
                registration_waker: WakerRegistration::new(),
                slot_waker: WakerRegistration::new(),
            })),
        }
    }
}

pub struct Shared {
    modem_state: ModemState,
    /// The underlying device is gone. Terminal, everything fails from here.
    removed: bool,
    registration_state: RegistrationState,
    /// Bumped on every registration update so waiters can tell "changed"
    /// apart from "same status again".
    registration_epoch: u32,
    registration_slot: RegistrationSlot,
    /// Context id adopted by the APN setup, 0 while unset.
    active_cid: u8,
    /// The primary port is carrying a data call.
    data_traffic: bool,
    signal_percent: Option<u8>,
    state_waker: WakerRegistration,
    registration_waker: WakerRegistration,
    slot_waker: WakerRegistration,
}

#[derive(Clone)]
pub struct Runner<'d> {
    pub(crate) shared: &'d Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl<'d> Runner<'d> {
    pub fn new(state: &'d mut State) -> Self {
        Self {
            shared: &state.shared,
        }
    }

    pub fn modem_state(&self, cx: Option<&mut Context>) -> ModemState {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.state_waker.register(cx.waker());
            }
            s.modem_state
        })
    }

    pub fn set_modem_state(&self, state: ModemState) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.modem_state != state {
                debug!("Modem state {:?} -> {:?}", s.modem_state, state);
                s.modem_state = state;
                s.state_waker.wake();
            }
        });
    }

    pub async fn wait_modem_state_change(&self) -> ModemState {
        let old_state = self.modem_state(None);

        poll_fn(|cx| {
            let current = self.modem_state(Some(cx));
            if current != old_state {
                return Poll::Ready(current);
            }
            Poll::Pending
        })
        .await
    }

    /// Fails fast when the device has been removed.
    pub fn ensure_present(&self) -> Result<(), Error> {
        self.shared.lock(|s| {
            if s.borrow().removed {
                Err(Error::DeviceRemoved)
            } else {
                Ok(())
            }
        })
    }

    /// Resolves once the device has been flagged as removed.
    pub async fn wait_removed(&self) {
        poll_fn(|cx| {
            self.shared.lock(|s| {
                let s = &mut *s.borrow_mut();
                if s.removed {
                    Poll::Ready(())
                } else {
                    s.state_waker.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }

    /// Flags the device as gone. A pending registration attempt is failed
    /// in place so its owner observes the removal instead of hanging.
    pub fn mark_removed(&self) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.removed = true;
            if matches!(s.registration_slot, RegistrationSlot::Armed) {
                s.registration_slot = RegistrationSlot::Finished(Err(Error::DeviceRemoved));
                s.slot_waker.wake();
            }
            s.state_waker.wake();
            s.registration_waker.wake();
        });
    }

    pub fn update_registration_with(&self, f: impl FnOnce(&mut RegistrationState)) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            f(&mut s.registration_state);
            s.registration_epoch = s.registration_epoch.wrapping_add(1);
            debug!(
                "Registration update, registered: {:?}",
                s.registration_state.is_registered()
            );
            s.registration_waker.wake();
        })
    }

    pub fn registration(&self, cx: Option<&mut Context>) -> Status {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.registration_waker.register(cx.waker());
            }
            s.registration_state.combined()
        })
    }

    pub fn is_registered(&self, cx: Option<&mut Context>) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.registration_waker.register(cx.waker());
            }
            s.registration_state.is_registered()
        })
    }

    fn registration_epoch(&self, cx: Option<&mut Context>) -> u32 {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.registration_waker.register(cx.waker());
            }
            s.registration_epoch
        })
    }

    /// Resolves on the next registration report, whether or not the status
    /// value itself changed.
    pub async fn wait_registration_update(&self) -> Status {
        let old_epoch = self.registration_epoch(None);

        poll_fn(|cx| {
            if self.registration_epoch(Some(cx)) != old_epoch {
                return Poll::Ready(self.registration(None));
            }
            Poll::Pending
        })
        .await
    }

    /// Claims the registration completion slot.
    pub fn begin_registration(&self) -> Result<(), Error> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.removed {
                return Err(Error::DeviceRemoved);
            }
            match s.registration_slot {
                RegistrationSlot::Armed => Err(Error::InProgress),
                _ => {
                    s.registration_slot = RegistrationSlot::Armed;
                    Ok(())
                }
            }
        })
    }

    /// First caller after arming wins; a finished or idle slot rejects the
    /// result and the caller must drop it.
    pub fn try_finish_registration(&self, result: Result<Status, Error>) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match s.registration_slot {
                RegistrationSlot::Armed => {
                    s.registration_slot = RegistrationSlot::Finished(result);
                    s.slot_waker.wake();
                    true
                }
                _ => false,
            }
        })
    }

    pub fn cancel_registration(&self) -> bool {
        self.try_finish_registration(Err(Error::Canceled))
    }

    /// Releases the slot outright, whatever its state. For an attempt
    /// whose owning future was dropped before it could consume the
    /// result; nobody is left to take it, so the slot must not stay
    /// armed and block the next attempt.
    pub fn abandon_registration(&self) {
        self.shared.lock(|s| {
            s.borrow_mut().registration_slot = RegistrationSlot::Idle;
        })
    }

    pub fn registration_pending(&self) -> bool {
        self.shared.lock(|s| {
            matches!(
                s.borrow().registration_slot,
                RegistrationSlot::Armed
            )
        })
    }

    pub fn poll_registration_result(&self, cx: &mut Context) -> Poll<Result<Status, Error>> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match core::mem::replace(&mut s.registration_slot, RegistrationSlot::Idle) {
                RegistrationSlot::Finished(result) => Poll::Ready(result),
                other => {
                    s.registration_slot = other;
                    s.slot_waker.register(cx.waker());
                    Poll::Pending
                }
            }
        })
    }

    /// Consumes the slot's result, releasing it for the next attempt.
    pub fn take_registration_result(&self) -> Option<Result<Status, Error>> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match core::mem::replace(&mut s.registration_slot, RegistrationSlot::Idle) {
                RegistrationSlot::Finished(result) => Some(result),
                other => {
                    s.registration_slot = other;
                    None
                }
            }
        })
    }

    pub fn try_begin_enable(&self) -> Result<bool, Error> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.removed {
                return Err(Error::DeviceRemoved);
            }
            match s.modem_state {
                ModemState::Enabling => Err(Error::InProgress),
                state if state >= ModemState::Enabled => Ok(false),
                _ => {
                    s.modem_state = ModemState::Enabling;
                    s.state_waker.wake();
                    Ok(true)
                }
            }
        })
    }

    /// On success returns the state the modem was in, so a failed teardown
    /// can put it back.
    pub fn try_begin_disable(&self) -> Result<Option<ModemState>, Error> {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            match s.modem_state {
                ModemState::Disabling | ModemState::Enabling => Err(Error::InProgress),
                ModemState::Disabled => Ok(None),
                entry => {
                    s.modem_state = ModemState::Disabling;
                    s.state_waker.wake();
                    Ok(Some(entry))
                }
            }
        })
    }

    pub fn active_cid(&self) -> u8 {
        self.shared.lock(|s| s.borrow().active_cid)
    }

    pub fn set_active_cid(&self, cid: u8) {
        self.shared.lock(|s| s.borrow_mut().active_cid = cid);
    }

    pub fn data_traffic(&self) -> bool {
        self.shared.lock(|s| s.borrow().data_traffic)
    }

    pub fn set_data_traffic(&self, on: bool) {
        self.shared.lock(|s| s.borrow_mut().data_traffic = on);
    }

    pub fn signal_percent(&self) -> Option<u8> {
        self.shared.lock(|s| s.borrow().signal_percent)
    }

    pub fn set_signal_percent(&self, percent: Option<u8>) {
        self.shared.lock(|s| s.borrow_mut().signal_percent = percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Domain, RegistrationParams};

    fn runner(state: &mut State) -> Runner<'_> {
        Runner::new(state)
    }

    #[test]
    fn registration_slot_completes_exactly_once() {
        let mut state = State::new();
        let ch = runner(&mut state);

        ch.begin_registration().unwrap();
        assert!(ch.try_finish_registration(Ok(Status::Home)));
        // losers of the race observe a slot that is no longer theirs
        assert!(!ch.try_finish_registration(Err(Error::Timeout)));
        assert_eq!(ch.take_registration_result(), Some(Ok(Status::Home)));
        // consumed, nothing left to take
        assert_eq!(ch.take_registration_result(), None);
    }

    #[test]
    fn polling_waiter_observes_the_finish() {
        let mut state = State::new();
        let ch = runner(&mut state);

        ch.begin_registration().unwrap();
        assert!(ch.try_finish_registration(Ok(Status::Roaming)));

        let result = embassy_futures::block_on(core::future::poll_fn(|cx| {
            ch.poll_registration_result(cx)
        }));
        assert_eq!(result, Ok(Status::Roaming));
        assert_eq!(ch.take_registration_result(), None);
    }

    #[test]
    fn double_arm_is_rejected_until_consumed() {
        let mut state = State::new();
        let ch = runner(&mut state);

        ch.begin_registration().unwrap();
        assert!(matches!(ch.begin_registration(), Err(Error::InProgress)));

        assert!(ch.cancel_registration());
        assert_eq!(ch.take_registration_result(), Some(Err(Error::Canceled)));
        ch.begin_registration().unwrap();
    }

    #[test]
    fn abandoning_frees_an_armed_slot() {
        let mut state = State::new();
        let ch = runner(&mut state);

        ch.begin_registration().unwrap();
        ch.abandon_registration();
        assert!(!ch.registration_pending());
        assert_eq!(ch.take_registration_result(), None);
        ch.begin_registration().unwrap();

        // an unconsumed result is released the same way
        assert!(ch.try_finish_registration(Ok(Status::Home)));
        ch.abandon_registration();
        assert_eq!(ch.take_registration_result(), None);
    }

    #[test]
    fn removal_fails_a_pending_registration() {
        let mut state = State::new();
        let ch = runner(&mut state);

        ch.begin_registration().unwrap();
        ch.mark_removed();
        assert!(!ch.try_finish_registration(Ok(Status::Home)));
        assert_eq!(
            ch.take_registration_result(),
            Some(Err(Error::DeviceRemoved))
        );
        assert!(matches!(ch.begin_registration(), Err(Error::DeviceRemoved)));
        assert!(matches!(ch.ensure_present(), Err(Error::DeviceRemoved)));
    }

    #[test]
    fn enable_guards() {
        let mut state = State::new();
        let ch = runner(&mut state);

        assert_eq!(ch.try_begin_enable(), Ok(true));
        assert!(matches!(ch.try_begin_enable(), Err(Error::InProgress)));

        ch.set_modem_state(ModemState::Enabled);
        // already enabled, a second enable is a no-op
        assert_eq!(ch.try_begin_enable(), Ok(false));

        ch.set_modem_state(ModemState::Connected);
        assert_eq!(ch.try_begin_enable(), Ok(false));
    }

    #[test]
    fn disable_guards() {
        let mut state = State::new();
        let ch = runner(&mut state);

        assert_eq!(ch.try_begin_disable(), Ok(None));

        ch.set_modem_state(ModemState::Registered);
        assert_eq!(ch.try_begin_disable(), Ok(Some(ModemState::Registered)));
        assert!(matches!(ch.try_begin_disable(), Err(Error::InProgress)));
    }

    #[test]
    fn registration_updates_bump_the_epoch() {
        let mut state = State::new();
        let ch = runner(&mut state);

        let before = ch.registration_epoch(None);
        ch.update_registration_with(|reg| {
            reg.compare_and_set(RegistrationParams::new(Domain::Cs, Status::Home))
        });
        assert_ne!(ch.registration_epoch(None), before);
        assert_eq!(ch.registration(None), Status::Home);
        assert!(ch.is_registered(None));
    }
}
