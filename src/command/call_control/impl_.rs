use super::Dial;
use crate::command::NoResponse;

impl atat::AtatCmd for Dial {
    type Response = NoResponse;

    const MAX_LEN: usize = 49;
    // Dial result (CONNECT or a failure code) can take a while on a busy
    // network.
    const MAX_TIMEOUT_MS: u32 = 60_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        let line = self.line.as_bytes();
        let len = line.len().min(buf.len().saturating_sub(1));
        buf[..len].copy_from_slice(&line[..len]);
        buf[len] = b'\r';
        len + 1
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        resp.map(|_| NoResponse).map_err(atat::Error::from)
    }
}
