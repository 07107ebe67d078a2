//! Data transformation logic
//!
//! The only transformation between warehouse and target is a fixed column
//! rename; see [`mapper`].

pub mod mapper;

pub use mapper::{map_record, map_records};
