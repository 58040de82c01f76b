// Thin re-export module: implementation lives in `blockchain/core.rs`, split into
// block construction, balance replay, validation rules and chain management.

pub mod core;
pub use core::*;
