use super::responses::ExtendedErrorReport;
use super::GetExtendedErrorReport;
use heapless::String;

impl atat::AtatCmd for GetExtendedErrorReport {
    type Response = ExtendedErrorReport;

    const MAX_LEN: usize = 16;
    const MAX_TIMEOUT_MS: u32 = 10_000;
    const ATTEMPTS: u8 = 1;
    const REATTEMPT_ON_PARSE_ERR: bool = false;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CEER\r";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let data = resp.map_err(atat::Error::from)?;
        let text = core::str::from_utf8(data).map_err(|_| atat::Error::Parse)?;

        let line = text
            .lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix("+CEER:")
                    .map(str::trim_start)
                    .unwrap_or(line)
            })
            .find(|line| !line.is_empty())
            .ok_or(atat::Error::Parse)?;

        // an overlong report is truncated, not rejected
        let mut report = String::new();
        for c in line.chars() {
            if report.push(c).is_err() {
                break;
            }
        }
        Ok(ExtendedErrorReport { report })
    }
}
