//! CLI command implementations

pub mod nearby;
pub mod sync;
pub mod validate;

use crate::domain::{SinkError, TitleSyncError, WarehouseError};

/// Process exit status for a fatal error
///
/// 2 for configuration errors, 4 when the source or target could not be
/// reached, 5 for anything else.
pub fn exit_code_for(error: &TitleSyncError) -> i32 {
    match error {
        TitleSyncError::Configuration(_) => 2,
        TitleSyncError::Connection(_)
        | TitleSyncError::Sink(SinkError::ConnectionFailed(_))
        | TitleSyncError::Warehouse(WarehouseError::ConnectionFailed(_)) => 4,
        _ => 5,
    }
}
