//! # geoveil-types
//!
//! Plain data types shared by the geoveil pipeline and its hosts:
//!
//! - **Locations**: `LocationRecord` (exact, owned by the data source) and
//!   `ObfuscatedLocation` (privacy-safe, safe to hand to a map or table)
//! - **Viewport**: `BoundingBox` in degrees, as reported by a map surface
//! - **Screen space**: `ScreenPoint` in projected pixels
//!
//! All types are serializable with Serde. Field names follow the camelCase
//! used by the dashboard front end (`fullName`, `obfLat`, ...).
//!
//! ```rust
//! use geoveil_types::bbox::BoundingBox;
//! use geoveil_types::location::LocationRecord;
//!
//! let tehran = LocationRecord::new("u-1", 35.6892, 51.3890);
//! let view = BoundingBox::new(36.0, 35.0, 52.0, 51.0);
//! assert!(view.contains(tehran.lat, tehran.lng));
//! ```

pub mod bbox;
pub mod location;
pub mod screen;

pub use bbox::BoundingBox;
pub use location::{LocationRecord, ObfuscatedLocation};
pub use screen::ScreenPoint;
