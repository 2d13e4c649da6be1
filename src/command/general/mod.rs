//! ### 4 - General

pub mod impl_;
pub mod responses;

/// 4.1 Manufacturer identification +CGMI
///
/// Text string identifying the manufacturer. The reply is unquoted free
/// text, parsed by hand in `impl_.rs` like the rest of this module.
#[derive(Debug, Clone)]
pub struct GetManufacturerId;

/// 4.2 Model identification +CGMM
///
/// Text string identifying the model.
#[derive(Debug, Clone)]
pub struct GetModelId;

/// 4.3 Firmware version identification +CGMR
///
/// Returns the firmware version of the module.
#[derive(Debug, Clone)]
pub struct GetFirmwareVersion;

/// 4.7 IMEI identification +CGSN
///
/// Returns the International Mobile Equipment Identity of the MT.
#[derive(Debug, Clone)]
pub struct GetImei;

/// 4.12 Card identification +CCID
///
/// Returns the ICCID (Integrated Circuit Card ID) of the SIM card, a serial
/// number identifying the SIM.
#[derive(Debug, Clone)]
pub struct GetCardId;
