//! Network subsystem: static reference data and chain switching.

pub mod registry;
pub mod switcher;

pub use registry::{lookup, NetworkDescriptor, SUPPORTED_NETWORKS};
pub use switcher::NetworkSwitcher;
