//! Sort clauses for search requests.

use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::QueryError;

/// Direction of a sort clause.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The Query DSL spelling (`asc`/`desc`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(QueryError::invalid_argument(
                "sort",
                format!("unknown sort direction '{s}', expected asc or desc"),
            )),
        }
    }
}

/// One `{field: direction}` entry of a search request's `sort` array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct SortField {
    /// Field to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortField {
    /// Creates a sort entry.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Shorthand for an ascending sort.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Shorthand for a descending sort.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction)
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    /// Parses `field:direction`, or a bare `field` meaning ascending.
    ///
    /// The last `:` separates the direction, so field paths may contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.rsplit_once(':') {
            Some((field, direction)) => (field.trim(), direction.parse()?),
            None => (s, SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(QueryError::invalid_argument(
                "sort",
                format!("missing field name in '{s}'"),
            ));
        }
        Ok(Self::new(field, direction))
    }
}

impl<F: Into<String>> From<(F, SortDirection)> for SortField {
    fn from((field, direction): (F, SortDirection)) -> Self {
        Self::new(field, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_and_direction() {
        assert_eq!("age:desc".parse::<SortField>().unwrap(), SortField::desc("age"));
        assert_eq!(" age : ASC ".parse::<SortField>().unwrap(), SortField::asc("age"));
        assert_eq!("created".parse::<SortField>().unwrap(), SortField::asc("created"));
        assert_eq!(
            "meta:created:desc".parse::<SortField>().unwrap(),
            SortField::desc("meta:created")
        );
    }

    #[test]
    fn rejects_bad_entries() {
        assert!("age:sideways".parse::<SortField>().is_err());
        assert!(":asc".parse::<SortField>().is_err());
        assert!("".parse::<SortField>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let sort = SortField::desc("total");
        assert_eq!(sort.to_string(), "total:desc");
        assert_eq!(sort.to_string().parse::<SortField>().unwrap(), sort);
    }
}
