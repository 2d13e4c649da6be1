use super::responses::SignalQuality;
use crate::error::Error;

impl SignalQuality {
    /// Scales the raw `+CSQ` RSSI (0..=31) to a percentage. 99 means the
    /// device has no usable measurement, which maps to a no-network error.
    pub fn percent(&self) -> Result<u8, Error> {
        match self.rssi {
            99 => Err(Error::NoNetwork),
            raw => Ok((raw.min(31) as u16 * 100 / 31) as u8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(rssi: u8) -> SignalQuality {
        SignalQuality { rssi, ber: 99 }
    }

    #[test]
    fn full_scale_is_100_percent() {
        assert_eq!(quality(31).percent(), Ok(100));
    }

    #[test]
    fn zero_is_0_percent() {
        assert_eq!(quality(0).percent(), Ok(0));
    }

    #[test]
    fn midscale_rounds_down() {
        assert_eq!(quality(15).percent(), Ok(48));
    }

    #[test]
    fn unknown_is_an_error() {
        assert_eq!(quality(99).percent(), Err(Error::NoNetwork));
    }

    #[test]
    fn out_of_range_values_clamp() {
        assert_eq!(quality(42).percent(), Ok(100));
    }
}
