//! Responses for General Commands
use heapless::String;

/// 4.1 Manufacturer identification +CGMI
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManufacturerId {
    pub id: String<64>,
}

/// 4.2 Model identification +CGMM
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModelId {
    pub id: String<64>,
}

/// 4.3 Firmware version identification +CGMR
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    pub version: String<64>,
}

/// 4.7 IMEI identification +CGSN
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Imei {
    pub imei: String<24>,
}

/// 4.12 Card identification +CCID
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CardId {
    pub ccid: String<24>,
}

impl atat::AtatResp for ManufacturerId {}
impl atat::AtatResp for ModelId {}
impl atat::AtatResp for FirmwareVersion {}
impl atat::AtatResp for Imei {}
impl atat::AtatResp for CardId {}
