use crate::command::{
    network_service::{
        responses::NetworkRegistrationStatus, types::NetworkRegistrationStat,
        urc::NetworkRegistration,
    },
    psn::{
        responses::GPRSNetworkRegistrationStatus, types::GPRSNetworkRegistrationStat,
        urc::GPRSNetworkRegistration,
    },
};
use embassy_time::{Duration, Instant};
use heapless::String;

#[derive(Debug, Clone, Default)]
pub struct DomainRegistrationStatus {
    status: Status,
    updated: Option<Instant>,
    started: Option<Instant>,
}

impl DomainRegistrationStatus {
    pub const fn new() -> Self {
        Self {
            status: Status::None,
            updated: None,
            started: None,
        }
    }

    pub fn duration(&self, ts: Instant) -> Duration {
        self.started
            .and_then(|started| ts.checked_duration_since(started))
            .unwrap_or_else(|| Duration::from_millis(0))
    }

    pub fn reset(&mut self) {
        self.status = Status::None;
        self.updated = None;
        self.started = None;
    }

    pub fn get_status(&self) -> Status {
        self.status
    }

    pub fn set_status(&mut self, stat: Status) {
        let ts = Instant::now();
        if self.status != stat {
            self.status = stat;
            self.started = Some(ts);
        }
        self.updated = Some(ts);
    }

    pub fn registered(&self) -> bool {
        self.status.registered()
    }

    /// True once the same status has been observed more than once, i.e. it
    /// is not a flap.
    pub fn sticky(&self) -> bool {
        self.updated.is_some() && self.updated != self.started
    }
}

/// Registration state of a single switching domain, as reported over
/// `+CREG`/`+CGREG` style values.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Nothing observed yet.
    #[default]
    None,
    /// Not registered and not looking for a network.
    Idle,
    /// Not registered, scanning for a network.
    Searching,
    /// Registration was refused by the operator.
    Denied,
    /// Device reported a state it cannot classify.
    Unknown,
    /// Registered on the home network.
    Home,
    /// Registered on a visited network.
    Roaming,
}

impl Status {
    pub fn registered(self) -> bool {
        matches!(self, Self::Home | Self::Roaming)
    }

    /// A terminal status ends a registration attempt, one way or another.
    pub fn terminal(self) -> bool {
        matches!(self, Self::Home | Self::Roaming | Self::Denied)
    }
}

impl From<u8> for Status {
    fn from(v: u8) -> Self {
        match v {
            0 => Self::Idle,
            1 => Self::Home,
            2 => Self::Searching,
            3 => Self::Denied,
            4 => Self::Unknown,
            5 => Self::Roaming,
            _ => Self::None,
        }
    }
}

impl From<NetworkRegistrationStat> for Status {
    fn from(v: NetworkRegistrationStat) -> Self {
        Self::from(v as u8)
    }
}

impl From<GPRSNetworkRegistrationStat> for Status {
    fn from(v: GPRSNetworkRegistrationStat) -> Self {
        Self::from(v as u8)
    }
}

/// Switching domain a status report belongs to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Domain {
    /// Circuit switched, reported via `+CREG`.
    #[default]
    Cs,
    /// Packet switched, reported via `+CGREG`.
    Ps,
    /// CDMA 1x, reported via vendor polling.
    Cdma1x,
    /// CDMA EV-DO, reported via vendor polling.
    Evdo,
}

#[derive(Debug, Default)]
pub struct RegistrationParams {
    domain: Domain,
    pub(crate) status: Status,

    cell_id: Option<String<8>>,
    lac: Option<String<4>>,
}

impl RegistrationParams {
    pub fn new(domain: Domain, status: Status) -> Self {
        Self {
            domain,
            status,
            cell_id: None,
            lac: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CellularGlobalIdentity {
    /// Registered network operator cell Id.
    cell_id: Option<String<8>>,
    /// Registered network operator Location Area Code.
    lac: Option<String<4>>,
}

impl CellularGlobalIdentity {
    pub const fn new() -> Self {
        Self {
            cell_id: None,
            lac: None,
        }
    }

    pub fn cell_id(&self) -> Option<&str> {
        self.cell_id.as_deref()
    }

    pub fn lac(&self) -> Option<&str> {
        self.lac.as_deref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationState {
    pub(crate) cs: DomainRegistrationStatus,
    pub(crate) ps: DomainRegistrationStatus,
    pub(crate) cdma_1x: DomainRegistrationStatus,
    pub(crate) evdo: DomainRegistrationStatus,

    pub(crate) cgi: CellularGlobalIdentity,
}

impl RegistrationState {
    pub const fn new() -> Self {
        Self {
            cs: DomainRegistrationStatus::new(),
            ps: DomainRegistrationStatus::new(),
            cdma_1x: DomainRegistrationStatus::new(),
            evdo: DomainRegistrationStatus::new(),
            cgi: CellularGlobalIdentity::new(),
        }
    }

    pub fn cgi(&self) -> &CellularGlobalIdentity {
        &self.cgi
    }

    pub fn is_registered(&self) -> bool {
        self.cs.registered()
            || self.ps.registered()
            || self.cdma_1x.registered()
            || self.evdo.registered()
    }

    /// Collapses the per-domain statuses into the one the modem as a whole
    /// is in. Registered beats denied beats searching.
    pub fn combined(&self) -> Status {
        let mut combined = Status::None;
        for status in [
            self.cs.get_status(),
            self.ps.get_status(),
            self.cdma_1x.get_status(),
            self.evdo.get_status(),
        ] {
            combined = match (combined, status) {
                (c, _) if c.registered() => c,
                (_, s) if s.registered() => s,
                (Status::Denied, _) => Status::Denied,
                (_, Status::Denied) => Status::Denied,
                (Status::Searching, _) => Status::Searching,
                (_, Status::Searching) => Status::Searching,
                (Status::Idle, _) => Status::Idle,
                (_, Status::Idle) => Status::Idle,
                (Status::Unknown, _) => Status::Unknown,
                (_, s) => s,
            };
        }
        combined
    }

    pub fn reset(&mut self) {
        self.cs.reset();
        self.ps.reset();
        self.cdma_1x.reset();
        self.evdo.reset();
        self.cgi = CellularGlobalIdentity::new();
    }

    pub fn compare_and_set(&mut self, new_params: RegistrationParams) {
        match new_params.domain {
            Domain::Cs => self.cs.set_status(new_params.status),
            Domain::Ps => self.ps.set_status(new_params.status),
            Domain::Cdma1x => self.cdma_1x.set_status(new_params.status),
            Domain::Evdo => self.evdo.set_status(new_params.status),
        }

        // Update Cellular Global Identity
        if new_params.cell_id.is_some() && self.cgi.cell_id != new_params.cell_id {
            self.cgi.cell_id = new_params.cell_id.clone();
            self.cgi.lac = new_params.lac;
        }
    }
}

impl From<NetworkRegistration> for RegistrationParams {
    fn from(v: NetworkRegistration) -> Self {
        Self {
            domain: Domain::Cs,
            status: v.stat.into(),
            cell_id: None,
            lac: None,
        }
    }
}

impl From<NetworkRegistrationStatus> for RegistrationParams {
    fn from(v: NetworkRegistrationStatus) -> Self {
        Self {
            domain: Domain::Cs,
            status: v.stat.into(),
            cell_id: None,
            lac: None,
        }
    }
}

impl From<GPRSNetworkRegistration> for RegistrationParams {
    fn from(v: GPRSNetworkRegistration) -> Self {
        Self {
            domain: Domain::Ps,
            status: v.stat.into(),
            cell_id: v.ci,
            lac: v.lac,
        }
    }
}

impl From<GPRSNetworkRegistrationStatus> for RegistrationParams {
    fn from(v: GPRSNetworkRegistrationStatus) -> Self {
        Self {
            domain: Domain::Ps,
            status: v.stat.into(),
            cell_id: v.ci,
            lac: v.lac,
        }
    }
}
