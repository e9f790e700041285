//! Shared ambient stack for the ballast planning core: logging setup, the
//! error taxonomy, tabular I/O helpers, and site-profile configuration.
//!
//! Nothing in this crate is stage-, tank-, or gate-specific; every other
//! crate in the workspace depends on it for these cross-cutting concerns.

pub mod error;
pub mod logging;
pub mod profile;
pub mod tabular;

pub use error::CoreError;
