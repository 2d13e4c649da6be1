use atat::{UrcChannel, UrcSubscription};

use crate::command::Urc;
use crate::error::Error;

use super::{state, URC_SUBSCRIBERS};

/// Folds unsolicited reports into the shared state. Must be kept running
/// (`run()`) for URC driven registration tracking to work.
pub struct UrcHandler<'a, const URC_CAPACITY: usize> {
    ch: state::Runner<'a>,
    urc_subscription: UrcSubscription<'a, Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
}

impl<'a, const URC_CAPACITY: usize> UrcHandler<'a, URC_CAPACITY> {
    pub fn new(
        ch: state::Runner<'a>,
        urc_channel: &'a UrcChannel<Urc, URC_CAPACITY, URC_SUBSCRIBERS>,
    ) -> Result<Self, Error> {
        let urc_subscription = urc_channel
            .subscribe()
            .map_err(Error::SubscriberOverflow)?;
        Ok(Self {
            ch,
            urc_subscription,
        })
    }

    pub async fn run(&mut self) -> ! {
        loop {
            let event = self.urc_subscription.next_message_pure().await;
            self.handle_urc(event);
        }
    }

    fn handle_urc(&mut self, event: Urc) {
        match event {
            Urc::NetworkRegistration(reg) => {
                self.ch
                    .update_registration_with(|state| state.compare_and_set(reg.into()));
            }
            Urc::GPRSNetworkRegistration(reg) => {
                self.ch
                    .update_registration_with(|state| state.compare_and_set(reg.into()));
            }
            Urc::PacketSwitchedEvent(event) => {
                let message = core::str::from_utf8(&event.message).unwrap_or("<invalid utf8>");
                warn!("Packet switched event: {}", message);
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asynch::state::State;
    use crate::command::network_service::types::NetworkRegistrationStat;
    use crate::command::network_service::urc::NetworkRegistration;
    use crate::registration::Status;

    #[test]
    fn one_subscriber_is_the_limit() {
        let mut shared = State::new();
        let ch = state::Runner::new(&mut shared);
        let urc_channel: UrcChannel<Urc, 4, URC_SUBSCRIBERS> = UrcChannel::new();

        let _running = UrcHandler::new(ch.clone(), &urc_channel).unwrap();
        assert!(matches!(
            UrcHandler::new(ch, &urc_channel),
            Err(Error::SubscriberOverflow(
                atat::urc_channel::Error::MaximumSubscribersReached
            ))
        ));
    }

    #[test]
    fn registration_reports_feed_the_tracker() {
        let mut shared = State::new();
        let ch = state::Runner::new(&mut shared);
        let urc_channel: UrcChannel<Urc, 4, URC_SUBSCRIBERS> = UrcChannel::new();
        let mut handler = UrcHandler::new(ch.clone(), &urc_channel).unwrap();

        handler.handle_urc(Urc::NetworkRegistration(NetworkRegistration {
            stat: NetworkRegistrationStat::Registered,
        }));

        assert!(ch.is_registered(None));
        assert_eq!(ch.registration(None), Status::Home);
    }
}
