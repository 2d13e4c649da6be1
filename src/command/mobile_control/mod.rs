//! ### 5 - Mobile equipment control and status

pub mod impl_;
pub mod responses;

/// 5.10 Extended error report +CEER
///
/// Returns an extended report of the reason for the failure of the last
/// unsuccessful call set up or in-call modification, or the reason for the
/// last call release. The report is a single unquoted line of text, parsed
/// by hand in `impl_.rs`.
#[derive(Debug, Clone)]
pub struct GetExtendedErrorReport;
