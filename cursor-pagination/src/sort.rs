//! Sort specifications for paged collection requests
//!
//! A [`SortSpecification`] is an ordered list of [`Order`]s. Order matters: the
//! first entry is the primary sort key and later entries break ties.
//!
//! Sort specifications travel through query strings as one or more `sort`
//! values of the form `property,direction`:
//!
//! ```rust
//! use cursor_pagination::sort::{Direction, SortSpecification};
//!
//! let sort = SortSpecification::parse(["xyz,desc", "abc"]).unwrap();
//! assert_eq!(sort.len(), 2);
//! assert_eq!(sort.orders()[0].direction, Direction::Descending);
//! assert_eq!(sort.orders()[1].direction, Direction::Ascending);
//!
//! let values: Vec<String> = sort.to_query_values().collect();
//! assert_eq!(values, vec!["xyz,desc", "abc,asc"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SortParseError;

/// Sort direction for a single property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending order (A-Z, 0-9, oldest first)
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    /// Descending order (Z-A, 9-0, newest first)
    #[serde(rename = "desc")]
    Descending,
}

impl Direction {
    /// Query-string form of the direction
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    /// Parse a direction token, ignoring ASCII case
    fn from_token(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s.trim()).ok_or_else(|| SortParseError::UnknownDirection {
            value: s.to_string(),
        })
    }
}

/// A single `(property, direction)` sort key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Property name to sort by
    pub property: String,
    /// Direction to sort in
    pub direction: Direction,
}

impl Order {
    /// Create a sort key
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Ascending sort key
    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Ascending)
    }

    /// Descending sort key
    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, Direction::Descending)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.property, self.direction)
    }
}

/// Ordered list of sort keys; empty means unsorted
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpecification {
    orders: Vec<Order>,
}

impl SortSpecification {
    /// The unsorted specification
    #[must_use]
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Build a specification from sort keys, keeping their order
    #[must_use]
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Append a sort key
    #[must_use]
    pub fn and(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    /// Sort keys in precedence order
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Whether no sort keys are present
    #[must_use]
    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of sort keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no sort keys are present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Parse `sort` query values in the order they were given
    ///
    /// Each value is a comma-separated list of property names, optionally
    /// followed by a direction that applies to every property in that value
    /// (`a,b,desc`). Without a direction the properties sort ascending.
    /// Blank segments and blank values are skipped; a value holding only a
    /// direction is an error.
    pub fn parse<I, S>(values: I) -> Result<Self, SortParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut orders = Vec::new();

        for value in values {
            let value = value.as_ref();
            let mut segments: Vec<&str> = value
                .split(',')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .collect();

            if segments.is_empty() {
                continue;
            }

            let direction = match segments.last().and_then(|last| Direction::from_token(last)) {
                Some(direction) => {
                    segments.pop();
                    direction
                }
                None => Direction::Ascending,
            };

            if segments.is_empty() {
                return Err(SortParseError::MissingProperty {
                    value: value.to_string(),
                });
            }

            orders.extend(segments.into_iter().map(|property| Order::new(property, direction)));
        }

        Ok(Self { orders })
    }

    /// Serialize to `sort` query values, one `property,direction` per key
    pub fn to_query_values(&self) -> impl Iterator<Item = String> + '_ {
        self.orders.iter().map(Order::to_string)
    }
}

impl From<Vec<Order>> for SortSpecification {
    fn from(orders: Vec<Order>) -> Self {
        Self::new(orders)
    }
}

impl FromIterator<Order> for SortSpecification {
    fn from_iter<T: IntoIterator<Item = Order>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for SortSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.orders.is_empty() {
            return f.write_str("unsorted");
        }
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{order}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_display() {
        assert_eq!(format!("{}", Direction::Ascending), "asc");
        assert_eq!(format!("{}", Direction::Descending), "desc");
    }

    #[test]
    fn test_direction_default() {
        assert_eq!(Direction::default(), Direction::Ascending);
    }

    #[test]
    fn test_direction_from_str_ignores_case() {
        assert_eq!("DESC".parse::<Direction>().unwrap(), Direction::Descending);
        assert_eq!(" Asc ".parse::<Direction>().unwrap(), Direction::Ascending);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_parse_empty_is_unsorted() {
        let sort = SortSpecification::parse(Vec::<String>::new()).unwrap();
        assert!(sort.is_unsorted());
        assert_eq!(sort, SortSpecification::unsorted());
    }

    #[test]
    fn test_parse_keeps_parameter_order() {
        let sort = SortSpecification::parse(["xyz,desc", "abc,asc"]).unwrap();
        assert_eq!(
            sort.orders(),
            &[Order::desc("xyz"), Order::asc("abc")]
        );
    }

    #[test]
    fn test_parse_missing_direction_defaults_to_ascending() {
        let sort = SortSpecification::parse(["name"]).unwrap();
        assert_eq!(sort.orders(), &[Order::asc("name")]);
    }

    #[test]
    fn test_parse_direction_applies_to_all_properties_in_value() {
        let sort = SortSpecification::parse(["last,first,desc"]).unwrap();
        assert_eq!(sort.orders(), &[Order::desc("last"), Order::desc("first")]);
    }

    #[test]
    fn test_parse_skips_blank_segments() {
        let sort = SortSpecification::parse(["name,,desc"]).unwrap();
        assert_eq!(sort.orders(), &[Order::desc("name")]);
    }

    #[test]
    fn test_parse_direction_without_property_fails() {
        let err = SortParseError::MissingProperty {
            value: "desc".to_string(),
        };
        assert_eq!(SortSpecification::parse(["desc"]).unwrap_err(), err);
        assert!(SortSpecification::parse([",desc"]).is_err());
    }

    #[test]
    fn test_parse_skips_blank_values() {
        let sort = SortSpecification::parse(["", " , ", "name"]).unwrap();
        assert_eq!(sort.orders(), &[Order::asc("name")]);
        assert!(SortSpecification::parse([""]).unwrap().is_unsorted());
    }

    #[test]
    fn test_query_values_round_trip() {
        let sort = SortSpecification::unsorted()
            .and(Order::desc("created_at"))
            .and(Order::asc("id"));
        let values: Vec<String> = sort.to_query_values().collect();
        assert_eq!(values, vec!["created_at,desc", "id,asc"]);
        assert_eq!(SortSpecification::parse(&values).unwrap(), sort);
    }

    #[test]
    fn test_display() {
        assert_eq!(SortSpecification::unsorted().to_string(), "unsorted");
        let sort = SortSpecification::new(vec![Order::asc("a"), Order::desc("b")]);
        assert_eq!(sort.to_string(), "a,asc; b,desc");
    }

    #[test]
    fn test_serde() {
        let sort = SortSpecification::new(vec![Order::desc("name")]);
        let json = serde_json::to_string(&sort).unwrap();
        assert_eq!(json, r#"[{"property":"name","direction":"desc"}]"#);
        let back: SortSpecification = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sort);
    }
}
