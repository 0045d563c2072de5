use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::{Breakpoints, Intensity, Position};

pub mod config;
pub mod errors;
pub mod span;

pub use config::StoreConfig;
pub use errors::IntensityError;
pub use span::{Action, Span};


/// Piecewise-constant integer function over the integer line.
///
/// The function is stored run-length encoded: each breakpoint maps a position
/// to the value the function takes from that position up to the next
/// breakpoint. Everything before the first breakpoint is implicitly 0.
///
/// After every mutation the map is canonical:
/// - no leading breakpoint carries 0,
/// - the trailing zero run is collapsed to a single breakpoint, which marks
///   the right edge of the region callers have defined,
/// - an all-zero function is the empty map.
///
/// # Internal Structure
/// - `breakpoints`: `BTreeMap` from position to the value starting there
///
/// # Complexity
/// - `add` / `set`: O(log n + k) where k is the number of breakpoints inside
///   the range, plus the length of the trailing zero run
/// - `query`: O(1)
///
/// # Examples
///
/// ```
/// use intensity::IntensityStore;
/// use std::collections::BTreeMap;
///
/// let mut store = IntensityStore::new();
///
/// store.set(0, 10, 5).unwrap();
/// let map = store.add(5, 15, 3).unwrap();
/// assert_eq!(map, &BTreeMap::from([(0, 5), (5, 8), (10, 3), (15, 0)]));
///
/// // Empty and inverted ranges are rejected without touching the store.
/// assert!(store.set(10, 10, 5).is_err());
/// assert_eq!(store.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntensityStore {
    breakpoints: Breakpoints,
    config: StoreConfig,
}

impl IntensityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            breakpoints: BTreeMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Number of stored breakpoints.
    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    /// True when the function is 0 everywhere.
    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    /// Adds `amount` to every position in `[from, to)`.
    ///
    /// Adding 0 to an empty store is a no-op and creates no breakpoints.
    pub fn add(
        &mut self,
        from: Position,
        to: Position,
        amount: Intensity,
    ) -> Result<&Breakpoints, IntensityError> {
        let span = Span::new(from, to, amount)?;
        self.apply(Action::Add, span)
    }

    /// Overwrites every position in `[from, to)` with `amount`.
    pub fn set(
        &mut self,
        from: Position,
        to: Position,
        amount: Intensity,
    ) -> Result<&Breakpoints, IntensityError> {
        let span = Span::new(from, to, amount)?;
        self.apply(Action::Set, span)
    }

    /// Applies an already validated span and returns the canonical map.
    ///
    /// The only failure left at this point is an `add` whose result does not
    /// fit in an [`Intensity`]; it is detected before anything is modified.
    pub fn apply(&mut self, action: Action, span: Span) -> Result<&Breakpoints, IntensityError> {
        if self.breakpoints.is_empty() && span.amount() == 0 {
            debug!(%action, %span, "skipping zero update on empty store");
            return Ok(&self.breakpoints);
        }

        let updates = self.updates(action, span)?;
        self.materialize(span);
        self.breakpoints.extend(updates);
        self.canonicalize();

        debug!(
            %action,
            from = span.from(),
            to = span.to(),
            amount = span.amount(),
            breakpoints = self.breakpoints.len(),
            "applied range update"
        );
        Ok(&self.breakpoints)
    }

    /// Returns the canonical breakpoint map, ascending by position.
    pub fn query(&self) -> &Breakpoints {
        &self.breakpoints
    }

    /// Iterates over `(position, intensity)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Intensity)> + '_ {
        self.breakpoints.iter().map(|(k, v)| (*k, *v))
    }

    /// Resets the function to 0 everywhere.
    pub fn clear(&mut self) {
        self.breakpoints.clear();
    }

    pub fn into_breakpoints(self) -> Breakpoints {
        self.breakpoints
    }

    /// Value of the segment that covers the position just left of `pos`,
    /// i.e. what a new breakpoint at `pos` must carry to split without
    /// changing the function.
    fn value_before(&self, pos: Position) -> Intensity {
        self.breakpoints
            .range(..pos)
            .next_back()
            .map_or(0, |(_, v)| *v)
    }

    /// Computes the new value of every breakpoint in `[from, to)`, including
    /// `from` itself when it does not exist yet, without modifying the map.
    fn updates(
        &self,
        action: Action,
        span: Span,
    ) -> Result<Vec<(Position, Intensity)>, IntensityError> {
        let amount = span.amount();
        let split = (!self.breakpoints.contains_key(&span.from()))
            .then(|| (span.from(), self.value_before(span.from())));
        let existing = self
            .breakpoints
            .range(span.from()..span.to())
            .map(|(&position, &value)| (position, value));

        split
            .into_iter()
            .chain(existing)
            .map(|(position, value)| {
                action
                    .apply(value, amount)
                    .map(|updated| (position, updated))
                    .ok_or(IntensityError::Overflow { position, amount })
            })
            .collect()
    }

    /// Makes `from` and `to` explicit breakpoints.
    ///
    /// `from` is always a value-preserving split. `to` becomes a fresh zero
    /// edge when it reaches past the greatest breakpoint, otherwise it is a
    /// value-preserving split as well.
    fn materialize(&mut self, span: Span) {
        let (from, to) = (span.from(), span.to());

        if !self.breakpoints.contains_key(&from) {
            let carried = self.value_before(from);
            self.breakpoints.insert(from, carried);
        }

        let new_edge = self
            .breakpoints
            .last_key_value()
            .map_or(true, |(&last, _)| to >= last);
        if new_edge {
            trace!(position = to, "new right edge");
            self.breakpoints.insert(to, 0);
        } else if !self.breakpoints.contains_key(&to) {
            let carried = self.value_before(to);
            self.breakpoints.insert(to, carried);
        }
    }

    fn canonicalize(&mut self) {
        while let Some(first) = self.breakpoints.first_entry() {
            if *first.get() != 0 {
                break;
            }
            trace!(position = *first.key(), "dropping leading zero");
            first.remove();
        }

        // Descending; the last element is where the trailing zero run begins
        // and is the one that survives as the edge.
        let trailing: Vec<Position> = self
            .breakpoints
            .iter()
            .rev()
            .take_while(|(_, v)| **v == 0)
            .map(|(k, _)| *k)
            .collect();
        if let Some((_edge, redundant)) = trailing.split_last() {
            for position in redundant {
                trace!(position, "dropping trailing zero");
                self.breakpoints.remove(position);
            }
        }

        if self.config.coalesce_interior {
            self.coalesce();
        }
    }

    fn coalesce(&mut self) {
        let mut previous = 0;
        let duplicates: Vec<Position> = self
            .breakpoints
            .iter()
            .filter_map(|(&position, &value)| {
                let duplicate = value == previous;
                previous = value;
                duplicate.then_some(position)
            })
            .collect();
        for position in duplicates {
            trace!(position, "coalescing interior breakpoint");
            self.breakpoints.remove(&position);
        }
    }
}

impl<'a> IntoIterator for &'a IntensityStore {
    type Item = (&'a Position, &'a Intensity);
    type IntoIter = std::collections::btree_map::Iter<'a, Position, Intensity>;

    fn into_iter(self) -> Self::IntoIter {
        self.breakpoints.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    /// Serialized as the bare breakpoint map, e.g. `{"0": 5, "10": 0}` in JSON.
    impl Serialize for IntensityStore {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            self.breakpoints.serialize(serializer)
        }
    }

    /// Accepts any breakpoint map that ends on a zero edge and brings it into
    /// canonical form using the default config.
    impl<'de> Deserialize<'de> for IntensityStore {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let breakpoints = Breakpoints::deserialize(deserializer)?;
            if let Some((&position, &value)) = breakpoints.last_key_value() {
                if value != 0 {
                    return Err(de::Error::custom(IntensityError::MissingEdge {
                        position,
                        value,
                    }));
                }
            }
            let mut store = IntensityStore {
                breakpoints,
                config: StoreConfig::default(),
            };
            store.canonicalize();
            Ok(store)
        }
    }
}
