//! Domain module for the resolution subsystem
//!
//! ## Core Modules
//! - resolution: pending resolutions, voters and power update requests
//! - threshold: exact-fraction quorum arithmetic

pub mod resolution;
pub mod threshold;

pub use resolution::{Resolution, ResolutionStatus, UpdatePowerRequest, Voter};
pub use threshold::Threshold;
