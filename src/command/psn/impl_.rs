use super::responses::{PDPContextDefinitions, PdpContextDefinition, SupportedContextIds};
use super::types::MAX_CONTEXTS;
use super::{GetPDPContextDefinitions, GetSupportedContextIds};
use heapless::{String, Vec};

/// Where to point the data session at, as decided from the device's
/// context table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CidResolution {
    /// A context with exactly this APN already exists, adopt it as-is.
    Existing(u8),
    /// No match, the APN has to be written to this context id.
    New(u8),
}

impl CidResolution {
    pub fn cid(self) -> u8 {
        match self {
            Self::Existing(cid) | Self::New(cid) => cid,
        }
    }
}

/// Picks the context id to use for `apn`.
///
/// An "IP" context whose APN matches exactly is adopted without touching
/// the device. Otherwise the id right above the highest "IP" context is
/// chosen, clamped to the supported maximum, or 1 on a table without any
/// "IP" rows.
pub fn resolve_cid(
    contexts: &[PdpContextDefinition],
    apn: &str,
    max_supported: u8,
) -> CidResolution {
    let mut highest_ip = 0u8;
    for ctx in contexts {
        if ctx.pdp_type.as_str() != "IP" {
            continue;
        }
        if ctx.apn.as_str() == apn {
            return CidResolution::Existing(ctx.cid);
        }
        highest_ip = highest_ip.max(ctx.cid);
    }

    if highest_ip == 0 {
        CidResolution::New(1)
    } else {
        CidResolution::New((highest_ip + 1).min(max_supported))
    }
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"')
}

fn strip_prefix(line: &str) -> &str {
    line.trim()
        .strip_prefix("+CGDCONT:")
        .map(str::trim_start)
        .unwrap_or_else(|| line.trim())
}

/// Parses the multi-row `+CGDCONT?` information text response. Rows past
/// [`MAX_CONTEXTS`] are ignored.
pub(crate) fn parse_context_definitions(
    data: &[u8],
) -> Result<Vec<PdpContextDefinition, MAX_CONTEXTS>, atat::Error> {
    let text = core::str::from_utf8(data).map_err(|_| atat::Error::Parse)?;
    let mut contexts = Vec::new();

    for line in text.lines() {
        let line = strip_prefix(line);
        if line.is_empty() {
            continue;
        }

        let (cid, rest) = line.split_once(',').ok_or(atat::Error::Parse)?;
        let cid: u8 = cid.trim().parse().map_err(|_| atat::Error::Parse)?;

        let mut fields = rest.splitn(3, ',');
        let pdp_type = unquote(fields.next().ok_or(atat::Error::Parse)?);
        let apn = unquote(fields.next().unwrap_or(""));

        let context = PdpContextDefinition {
            cid,
            pdp_type: String::try_from(pdp_type).map_err(|_| atat::Error::Parse)?,
            apn: String::try_from(apn).map_err(|_| atat::Error::Parse)?,
        };
        if contexts.push(context).is_err() {
            break;
        }
    }

    if contexts.is_empty() {
        return Err(atat::Error::Parse);
    }
    Ok(contexts)
}

/// Parses the `+CGDCONT=?` test response down to the supported context id
/// range of the "IP" PDP type.
pub(crate) fn parse_supported_range(data: &[u8]) -> Result<SupportedContextIds, atat::Error> {
    let text = core::str::from_utf8(data).map_err(|_| atat::Error::Parse)?;

    for line in text.lines() {
        let line = strip_prefix(line);
        if !line.contains("\"IP\"") {
            continue;
        }

        let open = line.find('(').ok_or(atat::Error::Parse)?;
        let close = line[open..].find(')').ok_or(atat::Error::Parse)? + open;
        let range = &line[open + 1..close];

        let (min, max) = range.split_once('-').unwrap_or((range, range));
        let min: u8 = min.trim().parse().map_err(|_| atat::Error::Parse)?;
        let max: u8 = max.trim().parse().map_err(|_| atat::Error::Parse)?;
        return Ok(SupportedContextIds { min, max });
    }

    Err(atat::Error::Parse)
}

impl atat::AtatCmd for GetPDPContextDefinitions {
    type Response = PDPContextDefinitions;

    const MAX_LEN: usize = 16;
    const MAX_TIMEOUT_MS: u32 = 10_000;
    // a malformed table must surface as a parse error, not be retried
    // into a timeout
    const ATTEMPTS: u8 = 1;
    const REATTEMPT_ON_PARSE_ERR: bool = false;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CGDCONT?\r";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let data = resp.map_err(atat::Error::from)?;
        parse_context_definitions(data).map(|contexts| PDPContextDefinitions { contexts })
    }
}

impl atat::AtatCmd for GetSupportedContextIds {
    type Response = SupportedContextIds;

    const MAX_LEN: usize = 16;
    const MAX_TIMEOUT_MS: u32 = 10_000;
    const ATTEMPTS: u8 = 1;
    const REATTEMPT_ON_PARSE_ERR: bool = false;

    fn write(&self, buf: &mut [u8]) -> usize {
        let cmd = b"AT+CGDCONT=?\r";
        buf[..cmd.len()].copy_from_slice(cmd);
        cmd.len()
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        let data = resp.map_err(atat::Error::from)?;
        parse_supported_range(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(cid: u8, pdp_type: &str, apn: &str) -> PdpContextDefinition {
        PdpContextDefinition {
            cid,
            pdp_type: String::try_from(pdp_type).unwrap(),
            apn: String::try_from(apn).unwrap(),
        }
    }

    #[test]
    fn parse_context_table() {
        let data = b"+CGDCONT: 1,\"IP\",\"internet\",\"\",0,0\r\n+CGDCONT: 3,\"IPV6\",\"v6net\",\"\",0,0";
        let contexts = parse_context_definitions(data).unwrap();
        assert_eq!(
            contexts.as_slice(),
            &[ctx(1, "IP", "internet"), ctx(3, "IPV6", "v6net")]
        );
    }

    #[test]
    fn parse_context_table_without_prefix() {
        let data = b"2,\"IP\",\"apn.example\"";
        let contexts = parse_context_definitions(data).unwrap();
        assert_eq!(contexts.as_slice(), &[ctx(2, "IP", "apn.example")]);
    }

    #[test]
    fn empty_context_table_is_an_error() {
        assert_eq!(parse_context_definitions(b""), Err(atat::Error::Parse));
        assert_eq!(parse_context_definitions(b"\r\n"), Err(atat::Error::Parse));
    }

    #[test]
    fn garbage_context_table_is_an_error() {
        assert_eq!(
            parse_context_definitions(b"+CGDCONT: not-a-cid,\"IP\""),
            Err(atat::Error::Parse)
        );
    }

    #[test]
    fn parse_ip_range() {
        let data = b"+CGDCONT: (1-16),\"IP\",,,(0-2),(0-4)\r\n+CGDCONT: (1-16),\"IPV6\",,,(0-2),(0-4)";
        assert_eq!(
            parse_supported_range(data),
            Ok(SupportedContextIds { min: 1, max: 16 })
        );
    }

    #[test]
    fn range_without_ip_row_is_an_error() {
        let data = b"+CGDCONT: (1-16),\"IPV6\",,,(0-2),(0-4)";
        assert_eq!(parse_supported_range(data), Err(atat::Error::Parse));
    }

    #[test]
    fn exact_apn_match_is_adopted() {
        let contexts = [ctx(1, "IP", "other"), ctx(3, "IP", "internet")];
        assert_eq!(
            resolve_cid(&contexts, "internet", 16),
            CidResolution::Existing(3)
        );
    }

    #[test]
    fn no_match_takes_next_free_id() {
        let contexts = [ctx(1, "IP", "a"), ctx(3, "IP", "b")];
        assert_eq!(resolve_cid(&contexts, "c", 16), CidResolution::New(4));
    }

    #[test]
    fn next_free_id_clamps_to_supported_max() {
        let contexts = [ctx(16, "IP", "a")];
        assert_eq!(resolve_cid(&contexts, "b", 16), CidResolution::New(16));
    }

    #[test]
    fn table_without_ip_rows_falls_back_to_1() {
        let contexts = [ctx(5, "IPV6", "a")];
        assert_eq!(resolve_cid(&contexts, "b", 16), CidResolution::New(1));
    }

    #[test]
    fn apn_match_must_be_exact() {
        let contexts = [ctx(1, "IP", "internet")];
        assert_eq!(resolve_cid(&contexts, "inter", 16), CidResolution::New(2));
    }
}
