use embassy_time::{Duration, Timer};
use heapless::{String, Vec};

/// Serial control channel used to talk AT to the device.
///
/// The driver does not care whether this is a tty, a USB interface or a
/// multiplexer channel. It only needs to open and close the channel around
/// the enable/disable lifecycle, and to "flash" it, i.e. hold it quiet for
/// a short while so in-flight device output can drain.
#[allow(async_fn_in_trait)]
pub trait ControlPort {
    type Error: core::fmt::Debug;

    async fn open(&mut self) -> Result<(), Self::Error>;

    async fn close(&mut self) -> Result<(), Self::Error>;

    /// Default flash is a plain settle delay. Ports backed by a real tty
    /// can override this with a proper break/drain.
    async fn flash(&mut self, duration: Duration) -> Result<(), Self::Error> {
        Timer::after(duration).await;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortRole {
    /// Carries commands and unsolicited results.
    Primary,
    /// Spare command channel, used when the primary is busy with data.
    Secondary,
    /// Dedicated traffic channel, handed to the data consumer on connect.
    Data,
}

const MAX_PORTS: usize = 4;

/// Bookkeeping of which device nodes belong to this modem and what they
/// are used for. Purely an inventory, it does not open anything itself.
#[derive(Debug, Default)]
pub struct Ports {
    entries: Vec<(String<32>, PortRole), MAX_PORTS>,
}

impl Ports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a device node for a role. A node can only be claimed once,
    /// and the command roles are exclusive: one primary, at most one
    /// secondary. Re-claiming, a duplicate command role or overflowing
    /// the table returns `false`.
    pub fn claim(&mut self, node: &str, role: PortRole) -> bool {
        if self.role_of(node).is_some() {
            return false;
        }
        if matches!(role, PortRole::Primary | PortRole::Secondary) && self.node_for(role).is_some()
        {
            return false;
        }
        let Ok(name) = String::try_from(node) else {
            return false;
        };
        self.entries.push((name, role)).is_ok()
    }

    pub fn release(&mut self, node: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n.as_str() != node);
        self.entries.len() != before
    }

    pub fn role_of(&self, node: &str) -> Option<PortRole> {
        self.entries
            .iter()
            .find(|(n, _)| n.as_str() == node)
            .map(|(_, r)| *r)
    }

    pub fn node_for(&self, role: PortRole) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, r)| *r == role)
            .map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_is_exclusive_per_node() {
        let mut ports = Ports::new();
        assert!(ports.claim("ttyUSB0", PortRole::Primary));
        assert!(!ports.claim("ttyUSB0", PortRole::Data));
        assert_eq!(ports.role_of("ttyUSB0"), Some(PortRole::Primary));
    }

    #[test]
    fn command_roles_are_exclusive() {
        let mut ports = Ports::new();
        assert!(ports.claim("ttyUSB0", PortRole::Primary));
        assert!(!ports.claim("ttyUSB2", PortRole::Primary));
        assert!(ports.claim("ttyUSB2", PortRole::Data));
        assert!(ports.claim("ttyUSB3", PortRole::Data));
    }

    #[test]
    fn release_frees_the_node() {
        let mut ports = Ports::new();
        assert!(ports.claim("ttyUSB1", PortRole::Data));
        assert_eq!(ports.node_for(PortRole::Data), Some("ttyUSB1"));
        assert!(ports.release("ttyUSB1"));
        assert!(!ports.release("ttyUSB1"));
        assert!(ports.is_empty());
    }
}
