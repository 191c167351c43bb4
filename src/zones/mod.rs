//! Zones of the installation
//!
//! - [`Zone`]: device population and typical visitor level of one zone
//! - [`ZoneRegistry`]: the validated, read-only set of all zones
//! - Per-zone microclimate and lighting palettes

pub mod registry;
pub mod zone;

pub use registry::ZoneRegistry;
pub use zone::{LightingPalette, Microclimate, Rgb, Zone};
