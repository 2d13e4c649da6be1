use super::responses::{CardId, FirmwareVersion, Imei, ManufacturerId, ModelId};
use super::{GetCardId, GetFirmwareVersion, GetImei, GetManufacturerId, GetModelId};
use heapless::String;

/// The identification replies are bare text lines, optionally prefixed
/// with the echoing `+CGMI:` style tag. Picks the first non-empty line.
fn identity_line<'a>(data: &'a [u8], prefix: &str) -> Result<&'a str, atat::Error> {
    let text = core::str::from_utf8(data).map_err(|_| atat::Error::Parse)?;
    text.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix(prefix)
                .map(str::trim_start)
                .unwrap_or(line)
        })
        .find(|line| !line.is_empty())
        .ok_or(atat::Error::Parse)
}

fn identity<const N: usize>(data: &[u8], prefix: &str) -> Result<String<N>, atat::Error> {
    String::try_from(identity_line(data, prefix)?).map_err(|_| atat::Error::Parse)
}

macro_rules! identity_cmd {
    ($cmd:ty, $wire:literal, $prefix:literal, $resp:ident { $field:ident }) => {
        impl atat::AtatCmd for $cmd {
            type Response = $resp;

            const MAX_LEN: usize = 16;
            const MAX_TIMEOUT_MS: u32 = 1_000;
            const ATTEMPTS: u8 = 1;
            const REATTEMPT_ON_PARSE_ERR: bool = false;

            fn write(&self, buf: &mut [u8]) -> usize {
                let cmd: &[u8] = $wire;
                buf[..cmd.len()].copy_from_slice(cmd);
                cmd.len()
            }

            fn parse(
                &self,
                resp: Result<&[u8], atat::InternalError>,
            ) -> Result<Self::Response, atat::Error> {
                let data = resp.map_err(atat::Error::from)?;
                Ok($resp {
                    $field: identity(data, $prefix)?,
                })
            }
        }
    };
}

identity_cmd!(GetManufacturerId, b"AT+CGMI\r", "+CGMI:", ManufacturerId { id });
identity_cmd!(GetModelId, b"AT+CGMM\r", "+CGMM:", ModelId { id });
identity_cmd!(GetFirmwareVersion, b"AT+CGMR\r", "+CGMR:", FirmwareVersion { version });
identity_cmd!(GetImei, b"AT+CGSN\r", "+CGSN:", Imei { imei });
identity_cmd!(GetCardId, b"AT+CCID\r", "+CCID:", CardId { ccid });

#[cfg(test)]
mod tests {
    use super::*;
    use atat::AtatCmd;

    #[test]
    fn identity_queries_are_plain_reads() {
        let mut buf = [0u8; 16];
        let len = GetManufacturerId.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+CGMI\r");
        let len = GetImei.write(&mut buf);
        assert_eq!(&buf[..len], b"AT+CGSN\r");
    }

    #[test]
    fn parse_bare_text_reply() {
        let resp = GetManufacturerId.parse(Ok(b"Acme Wireless\r\n")).unwrap();
        assert_eq!(resp.id.as_str(), "Acme Wireless");

        let resp = GetFirmwareVersion.parse(Ok(b"12.34.007-B02")).unwrap();
        assert_eq!(resp.version.as_str(), "12.34.007-B02");
    }

    #[test]
    fn parse_prefixed_reply() {
        let resp = GetCardId.parse(Ok(b"+CCID: 8931071234567890123")).unwrap();
        assert_eq!(resp.ccid.as_str(), "8931071234567890123");
    }

    #[test]
    fn parse_skips_leading_blank_lines() {
        let resp = GetImei.parse(Ok(b"\r\n490154203237518\r\n")).unwrap();
        assert_eq!(resp.imei.as_str(), "490154203237518");
    }

    #[test]
    fn empty_or_oversized_reply_is_a_parse_error() {
        assert_eq!(GetModelId.parse(Ok(b"\r\n")), Err(atat::Error::Parse));

        let long = [b'x'; 80];
        assert_eq!(GetImei.parse(Ok(&long)), Err(atat::Error::Parse));
    }
}
