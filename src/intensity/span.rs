//! Validated operation descriptors.

use std::fmt::Display;
use std::str::FromStr;

use super::errors::IntensityError;
use crate::{Intensity, Position};

/// The mutation applied to every segment inside a [`Span`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Action {
    /// Accumulate: `value += amount`.
    Add,
    /// Overwrite: `value = amount`.
    Set,
}

impl Action {
    /// New value of a segment currently at `current`, or `None` when an
    /// `Add` leaves the integer range.
    pub(crate) fn apply(self, current: Intensity, amount: Intensity) -> Option<Intensity> {
        match self {
            Action::Add => current.checked_add(amount),
            Action::Set => Some(amount),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Add => f.write_str("add"),
            Action::Set => f.write_str("set"),
        }
    }
}

impl FromStr for Action {
    type Err = IntensityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Action::Add),
            "set" => Ok(Action::Set),
            _ => Err(IntensityError::InvalidType {
                field: "action",
                input: s.to_string(),
            }),
        }
    }
}

/// Parameters of a single `add`/`set` call: the half-open range `[from, to)`
/// and the amount applied to it.
///
/// A `Span` can only be built through [`Span::new`] or [`Span::parse`], so
/// holding one means `from < to` has already been checked.
///
/// # Examples
///
/// ```
/// use intensity::{IntensityError, Span};
///
/// let span = Span::new(0, 10, 5).unwrap();
/// assert_eq!((span.from(), span.to(), span.amount()), (0, 10, 5));
///
/// assert_eq!(
///     Span::new(10, 10, 5),
///     Err(IntensityError::InvalidRange { from: 10, to: 10 })
/// );
/// assert!(matches!(
///     Span::parse("a", "10", "5"),
///     Err(IntensityError::InvalidType { field: "from", .. })
/// ));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSpan"))]
pub struct Span {
    from: Position,
    to: Position,
    amount: Intensity,
}

impl Span {
    /// Validates `from < to` and builds the descriptor.
    pub fn new(from: Position, to: Position, amount: Intensity) -> Result<Self, IntensityError> {
        if from >= to {
            return Err(IntensityError::InvalidRange { from, to });
        }
        Ok(Self { from, to, amount })
    }

    /// Builds a span from textual operands.
    ///
    /// Each operand is trimmed and must read as a base-10 integer; the first
    /// operand that does not is reported as [`IntensityError::InvalidType`].
    /// The range check runs only once all three operands are integers.
    pub fn parse(from: &str, to: &str, amount: &str) -> Result<Self, IntensityError> {
        let from = parse_operand("from", from)?;
        let to = parse_operand("to", to)?;
        let amount = parse_operand("amount", amount)?;
        Self::new(from, to, amount)
    }

    pub const fn from(&self) -> Position {
        self.from
    }

    pub const fn to(&self) -> Position {
        self.to
    }

    pub const fn amount(&self) -> Intensity {
        self.amount
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}) by {}", self.from, self.to, self.amount)
    }
}

fn parse_operand(field: &'static str, input: &str) -> Result<i64, IntensityError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| IntensityError::InvalidType {
            field,
            input: input.to_string(),
        })
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSpan {
    from: Position,
    to: Position,
    amount: Intensity,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSpan> for Span {
    type Error = IntensityError;

    fn try_from(raw: RawSpan) -> Result<Self, Self::Error> {
        Span::new(raw.from, raw.to, raw.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_negative_positions_and_amounts() {
        let span = Span::new(-20, -5, -7).unwrap();
        assert_eq!(span.from(), -20);
        assert_eq!(span.to(), -5);
        assert_eq!(span.amount(), -7);
    }

    #[test]
    fn new_rejects_empty_and_inverted_ranges() {
        assert_eq!(
            Span::new(10, 10, 5),
            Err(IntensityError::InvalidRange { from: 10, to: 10 })
        );
        assert_eq!(
            Span::new(11, 10, 5),
            Err(IntensityError::InvalidRange { from: 11, to: 10 })
        );
    }

    #[test]
    fn parse_trims_operands() {
        let span = Span::parse(" 0", "10 ", " -3 ").unwrap();
        assert_eq!(span, Span::new(0, 10, -3).unwrap());
    }

    #[test]
    fn parse_reports_first_non_integer_operand() {
        assert_eq!(
            Span::parse("a", "10", "5"),
            Err(IntensityError::InvalidType {
                field: "from",
                input: "a".to_string(),
            })
        );
        assert!(matches!(
            Span::parse("0", "1.5", "x"),
            Err(IntensityError::InvalidType { field: "to", .. })
        ));
        assert!(matches!(
            Span::parse("0", "10", ""),
            Err(IntensityError::InvalidType { field: "amount", .. })
        ));
    }

    #[test]
    fn parse_checks_range_after_types() {
        assert_eq!(
            Span::parse("10", "10", "5"),
            Err(IntensityError::InvalidRange { from: 10, to: 10 })
        );
    }

    #[test]
    fn action_from_str() {
        assert_eq!("add".parse::<Action>(), Ok(Action::Add));
        assert_eq!(" SET ".parse::<Action>(), Ok(Action::Set));
        assert!(matches!(
            "mul".parse::<Action>(),
            Err(IntensityError::InvalidType { field: "action", .. })
        ));
    }

    #[test]
    fn action_apply() {
        assert_eq!(Action::Add.apply(5, -2), Some(3));
        assert_eq!(Action::Set.apply(5, -2), Some(-2));
        assert_eq!(Action::Add.apply(Intensity::MAX, 1), None);
        assert_eq!(Action::Set.apply(Intensity::MAX, 1), Some(1));
    }

    #[test]
    fn display() {
        assert_eq!(Action::Add.to_string(), "add");
        assert_eq!(Span::new(0, 10, 5).unwrap().to_string(), "[0, 10) by 5");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_revalidates_range() {
        let span: Span = serde_json::from_str(r#"{"from": 0, "to": 10, "amount": 5}"#).unwrap();
        assert_eq!(span, Span::new(0, 10, 5).unwrap());

        let err = serde_json::from_str::<Span>(r#"{"from": 10, "to": 10, "amount": 5}"#);
        assert!(err.is_err());

        let err = serde_json::from_str::<Span>(r#"{"from": "a", "to": 10, "amount": 5}"#);
        assert!(err.is_err());
    }
}
