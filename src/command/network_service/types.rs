//! Argument and parameter types used by Network service Commands and Responses
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum NetworkRegistrationUrcConfig {
    /// 0 (default value): network registration URC disabled
    UrcDisabled = 0,
    /// 1: network registration URC +CREG: <stat> enabled
    UrcEnabled = 1,
    /// 2: network registration and location information URC enabled
    UrcVerbose = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, AtatEnum)]
pub enum NetworkRegistrationStat {
    /// 0: not registered, the MT is not currently searching a new operator to
    /// register to
    NotRegistered = 0,
    /// 1: registered, home network
    Registered = 1,
    /// 2: not registered, but the MT is currently searching a new operator to
    /// register to
    NotRegisteredSearching = 2,
    /// 3: registration denied
    RegistrationDenied = 3,
    /// 4: unknown (e.g. out of coverage)
    Unknown = 4,
    /// 5: registered, roaming
    RegisteredRoaming = 5,
}

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum OperatorSelectionMode {
    /// 0 (default value): automatic network selection, <oper> is ignored
    Automatic = 0,
    /// 1: manual network selection, <oper> must be present
    Manual = 1,
    /// 2: deregister from the network
    Deregister = 2,
    /// 3: set <format> only, no registration attempt is made
    SetFormat = 3,
}

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum OperatorFormat {
    /// 0: long alphanumeric
    Long = 0,
    /// 1: short alphanumeric
    Short = 1,
    /// 2: numeric MCC/MNC
    Numeric = 2,
}
