//! EC2 Console Fingerprint Library
//!
//! Finds SSH host key fingerprints in EC2 console output so they can be
//! checked by hand before the first connection to an instance.

pub mod fingerprint;
pub mod inventory;
pub mod normalize;
pub mod report;
pub mod tags;
pub mod types;

pub use inventory::{ComputeInventory, Ec2Inventory};
pub use report::{OutputFormat, Reporter, ScanSummary};
pub use types::{FingerprintLine, Instance, InstanceReport, ScanError, Tag};
