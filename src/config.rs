use embassy_time::Duration;

/// Per-variant knobs for modems that deviate from the plain 3GPP behavior.
///
/// Every command here is a complete command line without the trailing
/// carriage return, e.g. `"AT+CFUN=1"`. The defaults match a well behaved
/// GSM modem and most devices can run with them unchanged.
#[derive(Debug, Clone)]
pub struct VariantConfig<'a> {
    /// Sent right after the port has been flashed. A failure here aborts
    /// the enable sequence.
    pub init_cmd: &'a str,
    /// Extra vendor init, sent after `init_cmd`. Failures are ignored.
    pub init_cmd_optional: Option<&'a str>,
    /// Radio power-up, sent at the end of the enable sequence. Failures
    /// are ignored since some devices reject it while already powered.
    pub power_up_cmd: Option<&'a str>,
    /// Radio power-down, sent while disabling. `None` skips the step.
    pub power_down_cmd: Option<&'a str>,
    /// How long to hold the port open without traffic before the first
    /// command, to let boot noise drain.
    pub flash_duration: Duration,
}

impl Default for VariantConfig<'_> {
    fn default() -> Self {
        Self {
            init_cmd: "ATZ E0 V1 +CMEE=1",
            init_cmd_optional: None,
            power_up_cmd: Some("AT+CFUN=1"),
            power_down_cmd: None,
            flash_duration: Duration::from_millis(100),
        }
    }
}
