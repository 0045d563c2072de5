//! intensity - piecewise-constant integer functions over the integer line
//!
//! An [`IntensityStore`] tracks a "level" (load, occupancy, intensity,
//! availability) across arbitrary, possibly overlapping half-open ranges
//! without storing a value for every point. Ranges are accumulated with
//! [`IntensityStore::add`] or overwritten with [`IntensityStore::set`], and
//! the function is read back as its canonical breakpoint map.
//!
//! ```
//! use intensity::IntensityStore;
//! use std::collections::BTreeMap;
//!
//! let mut store = IntensityStore::new();
//! store.set(0, 10, 5).unwrap();
//! store.add(0, 5, -2).unwrap();
//! assert_eq!(store.query(), &BTreeMap::from([(0, 3), (5, 5), (10, 0)]));
//! ```

use std::collections::BTreeMap;

pub mod intensity;

pub use intensity::{Action, IntensityError, IntensityStore, Span, StoreConfig};

/// Position on the integer line.
pub type Position = i64;

/// Value of the function over a segment.
pub type Intensity = i64;

/// Canonical run-length encoding of the function: each key maps to the value
/// in effect from that position up to the next key.
pub type Breakpoints = BTreeMap<Position, Intensity>;
