use heapless::String;

use crate::command::device_lock::types::PinStatusCode;

#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The control port could not be opened.
    PortOpen,
    /// The control port is closed, or closing it failed.
    PortClosed,
    /// Flashing the control port failed.
    Flash,
    /// The device answered with something the driver could not make sense of.
    Protocol,
    /// An overall operation deadline expired.
    Timeout,
    /// The same operation is already running.
    InProgress,
    /// The device disappeared while an operation was in flight.
    DeviceRemoved,
    /// The operation was abandoned, e.g. by a concurrent disable.
    Canceled,
    /// The modem is disabled and the request needs it powered up.
    Disabled,
    /// The SIM wants a code before it will serve us.
    PinNeeded(PinStatusCode),
    /// PIN or PUK was rejected by the SIM.
    InvalidSecret,
    /// Network registration was denied by the operator.
    RegistrationDenied,
    /// No network, e.g. signal quality is unknown.
    NoNetwork,
    /// Dialing failed, with the failure cause reported by the device if it
    /// gave one.
    Dial(String<64>),

    Atat(atat::Error),

    SubscriberOverflow(atat::urc_channel::Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::PortOpen => defmt::write!(f, "PortOpen"),
            Self::PortClosed => defmt::write!(f, "PortClosed"),
            Self::Flash => defmt::write!(f, "Flash"),
            Self::Protocol => defmt::write!(f, "Protocol"),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::InProgress => defmt::write!(f, "InProgress"),
            Self::DeviceRemoved => defmt::write!(f, "DeviceRemoved"),
            Self::Canceled => defmt::write!(f, "Canceled"),
            Self::Disabled => defmt::write!(f, "Disabled"),
            Self::PinNeeded(c) => defmt::write!(f, "PinNeeded({:?})", c),
            Self::InvalidSecret => defmt::write!(f, "InvalidSecret"),
            Self::RegistrationDenied => defmt::write!(f, "RegistrationDenied"),
            Self::NoNetwork => defmt::write!(f, "NoNetwork"),
            Self::Dial(r) => defmt::write!(f, "Dial({})", r.as_str()),
            Self::Atat(e) => defmt::write!(f, "Atat({:?})", e),
            Self::SubscriberOverflow(e) => defmt::write!(f, "SubscriberOverflow({:?})", e),
        }
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        Self::Atat(e)
    }
}
