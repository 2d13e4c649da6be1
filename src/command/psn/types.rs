//! Argument and parameter types used by Packet Switched Data Services
use atat::atat_derive::{AtatEnum, AtatLen};
use serde::{Deserialize, Serialize};

/// Most devices support far more contexts than this, but the driver only
/// ever looks at the low end of the table.
pub const MAX_CONTEXTS: usize = 8;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, AtatLen)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ContextId(pub u8);

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum GPRSNetworkRegistrationUrcConfig {
    /// 0 (default value): GPRS registration URC disabled
    UrcDisabled = 0,
    /// 1: GPRS registration URC +CGREG: <stat> enabled
    UrcEnabled = 1,
    /// 2: GPRS registration and location information URC enabled
    UrcVerbose = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, AtatEnum)]
pub enum GPRSNetworkRegistrationStat {
    /// 0: not registered, the MT is not currently searching an operator to
    /// register to
    NotRegistered = 0,
    /// 1: registered, home network
    Registered = 1,
    /// 2: not registered, but the MT is currently searching an operator to
    /// register to
    NotRegisteredSearching = 2,
    /// 3: registration denied
    RegistrationDenied = 3,
    /// 4: unknown
    Unknown = 4,
    /// 5: registered, roaming
    RegisteredRoaming = 5,
}
