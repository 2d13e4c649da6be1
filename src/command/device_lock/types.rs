//! Argument and parameter types used by Device lock Commands and Responses

/// The `<code>` values of `+CPIN?`. These are spaced text tokens on the
/// wire, so parsing is hand written in `impl_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinStatusCode {
    /// MT is not pending for any password
    Ready,
    /// MT is waiting for the SIM PIN
    SimPin,
    /// MT is waiting for the SIM PUK
    SimPuk,
    /// MT is waiting for the phone-to-SIM card password
    PhSimPin,
    /// MT is waiting for the phone-to-very-first-SIM card password
    PhFsimPin,
    /// MT is waiting for the phone-to-very-first-SIM card unblocking password
    PhFsimPuk,
    /// MT is waiting for the SIM PIN2
    SimPin2,
    /// MT is waiting for the SIM PUK2
    SimPuk2,
    /// MT is waiting for the network personalization password
    PhNetPin,
    /// MT is waiting for the network personalization unblocking password
    PhNetPuk,
    /// MT is waiting for the network subset personalization password
    PhNetSubPin,
    /// MT is waiting for the network subset personalization unblocking password
    PhNetSubPuk,
    /// MT is waiting for the service provider personalization password
    PhSpPin,
    /// MT is waiting for the service provider personalization unblocking password
    PhSpPuk,
    /// MT is waiting for the corporate personalization password
    PhCorpPin,
    /// MT is waiting for the corporate personalization unblocking password
    PhCorpPuk,
}
