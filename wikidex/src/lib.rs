//! Expose wikidex's internal API for use in integration testing. While it
//! *could* be useful, we do not recommend using this API in production
//! code. The CLI is the supported surface.
pub mod cli;
pub mod commands;
pub mod payload;
