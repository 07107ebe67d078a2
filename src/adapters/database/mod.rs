//! Target store abstraction layer
//!
//! - [`TitleSink`] - transactional writer used by the sync engine
//! - [`create_title_sink`] - connects the configured implementation

pub mod factory;
pub mod traits;

pub use factory::create_title_sink;
pub use traits::TitleSink;
