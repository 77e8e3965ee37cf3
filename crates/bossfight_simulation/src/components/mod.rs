//! Компоненты участников боя
//!
//! - actor: Health

pub mod actor;

pub use actor::*;
