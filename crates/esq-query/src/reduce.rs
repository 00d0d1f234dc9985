//! Filter reduction.
//!
//! Specifications that agree on index, field, operator, type and nested path are merged into a
//! single [`ReducedFilter`] whose values are the concatenation of theirs. Grouping is stable:
//! groups appear in first-seen order, and values keep input order (duplicates included).

use indexmap::{IndexMap, map::Entry};
use tracing::debug;

use crate::{
    QueryError,
    filter::{FilterOperator, FilterSpecification, FilterType},
};

/// Identity of a filter for reduction purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    /// Index the filter targets.
    pub index_name: String,
    /// Field the filter targets.
    pub field_name: String,
    /// Comparison to apply.
    pub operator: FilterOperator,
    /// Data type of the field.
    pub filter_type: FilterType,
    /// Nested object path, if any.
    pub nested_of: Option<String>,
}

impl From<&FilterSpecification> for FilterKey {
    fn from(spec: &FilterSpecification) -> Self {
        Self {
            index_name: spec.index_name().to_string(),
            field_name: spec.field_name().to_string(),
            operator: spec.operator(),
            filter_type: spec.filter_type(),
            nested_of: spec.nested_of().map(str::to_string),
        }
    }
}

/// All specifications sharing one [`FilterKey`], merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedFilter {
    /// Shared identity of the merged specifications.
    key: FilterKey,
    /// Concatenated values, in input order.
    values: Vec<String>,
    /// Value evaluation mode of the first merged specification.
    evaluate_values_as_or: bool,
}

impl ReducedFilter {
    /// Identity shared by every merged specification.
    pub fn key(&self) -> &FilterKey {
        &self.key
    }

    /// Index the filter targets.
    pub fn index_name(&self) -> &str {
        &self.key.index_name
    }

    /// Field the filter targets.
    pub fn field_name(&self) -> &str {
        &self.key.field_name
    }

    /// Nested object path, if any.
    pub fn nested_of(&self) -> Option<&str> {
        self.key.nested_of.as_deref()
    }

    /// Comparison to apply.
    pub fn operator(&self) -> FilterOperator {
        self.key.operator
    }

    /// Data type of the field.
    pub fn filter_type(&self) -> FilterType {
        self.key.filter_type
    }

    /// Concatenated values.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Whether multiple values combine with OR.
    pub fn evaluate_values_as_or(&self) -> bool {
        self.evaluate_values_as_or
    }

    /// Whether the compiled fragment selects (rather than excludes) documents.
    pub fn is_mandatory(&self) -> bool {
        self.key.operator.is_mandatory()
    }

    /// Converts back into a single specification carrying all merged values.
    pub fn to_specification(&self) -> FilterSpecification {
        FilterSpecification::from_parts(
            self.key.index_name.clone(),
            self.key.field_name.clone(),
            self.key.nested_of.clone(),
            self.key.operator,
            self.key.filter_type,
            self.values.clone(),
            self.evaluate_values_as_or,
        )
    }
}

impl From<&FilterSpecification> for ReducedFilter {
    fn from(spec: &FilterSpecification) -> Self {
        Self {
            key: FilterKey::from(spec),
            values: spec.values().to_vec(),
            evaluate_values_as_or: spec.evaluate_values_as_or(),
        }
    }
}

/// Reduced filters keyed by identity, in first-seen order.
pub type ReducedFilters = IndexMap<FilterKey, ReducedFilter>;

/// Merges specifications that share a [`FilterKey`].
///
/// Fails with [`QueryError::EmptyInput`] when `specs` yields nothing.
pub fn reduce_filters<'a, I>(specs: I) -> Result<ReducedFilters, QueryError>
where
    I: IntoIterator<Item = &'a FilterSpecification>,
{
    let mut reduced = ReducedFilters::new();
    let mut input_count = 0usize;

    for spec in specs {
        input_count += 1;
        match reduced.entry(FilterKey::from(spec)) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().values.extend_from_slice(spec.values());
            }
            Entry::Vacant(entry) => {
                entry.insert(ReducedFilter::from(spec));
            }
        }
    }

    if input_count == 0 {
        return Err(QueryError::EmptyInput {
            what: "specifications",
        });
    }

    debug!(
        specifications = input_count,
        groups = reduced.len(),
        "reduced filter specifications"
    );

    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shorthand for a valid text specification.
    fn text(index: &str, field: &str, op: FilterOperator, values: &[&str]) -> FilterSpecification {
        FilterSpecification::new(index, field, op, FilterType::Text, values.iter().copied()).unwrap()
    }

    #[test]
    fn empty_input_fails() {
        let err = reduce_filters(&Vec::<FilterSpecification>::new()).unwrap_err();
        assert_eq!(
            err,
            QueryError::EmptyInput {
                what: "specifications"
            }
        );
    }

    #[test]
    fn merges_values_in_input_order() {
        let specs = vec![
            text("orders", "status", FilterOperator::Is, &["open"]),
            text("orders", "region", FilterOperator::Is, &["eu"]),
            text("orders", "status", FilterOperator::Is, &["pending", "open"]),
        ];

        let reduced = reduce_filters(&specs).unwrap();
        assert_eq!(reduced.len(), 2);

        let filters: Vec<&ReducedFilter> = reduced.values().collect();
        assert_eq!(filters[0].field_name(), "status");
        assert_eq!(filters[0].values(), ["open", "pending", "open"]);
        assert_eq!(filters[1].field_name(), "region");
        assert_eq!(filters[1].values(), ["eu"]);
    }

    #[test]
    fn every_key_component_separates_groups() {
        let base = text("orders", "status", FilterOperator::Is, &["a"]);
        let specs = vec![
            base.clone(),
            text("invoices", "status", FilterOperator::Is, &["a"]),
            text("orders", "state", FilterOperator::Is, &["a"]),
            text("orders", "status", FilterOperator::IsNot, &["a"]),
            FilterSpecification::new("orders", "status", FilterOperator::Is, FilterType::Number, ["1"])
                .unwrap(),
            base.with_nested_of("lines"),
        ];

        let reduced = reduce_filters(&specs).unwrap();
        assert_eq!(reduced.len(), specs.len());
    }

    #[test]
    fn values_flag_is_not_part_of_the_key() {
        let specs = vec![
            text("orders", "status", FilterOperator::Is, &["open"]).with_values_as_or(true),
            text("orders", "status", FilterOperator::Is, &["closed"]),
        ];

        let reduced = reduce_filters(&specs).unwrap();
        assert_eq!(reduced.len(), 1);
        let filter = reduced.values().next().unwrap();
        assert!(filter.evaluate_values_as_or());
        assert_eq!(filter.values(), ["open", "closed"]);
    }

    #[test]
    fn reduction_is_idempotent() {
        let specs = vec![
            text("orders", "status", FilterOperator::Is, &["open"]),
            text("orders", "note", FilterOperator::Contains, &["late"]),
            text("orders", "status", FilterOperator::Is, &["pending"]),
            text("orders", "note", FilterOperator::Contains, &["fragile box"]),
        ];

        let once = reduce_filters(&specs).unwrap();
        let respecs: Vec<FilterSpecification> =
            once.values().map(ReducedFilter::to_specification).collect();
        let twice = reduce_filters(&respecs).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn mandatory_follows_operator() {
        let specs = vec![
            text("orders", "status", FilterOperator::Is, &["open"]),
            text("orders", "status", FilterOperator::NotContains, &["x"]),
        ];
        let reduced = reduce_filters(&specs).unwrap();
        let flags: Vec<bool> = reduced.values().map(ReducedFilter::is_mandatory).collect();
        assert_eq!(flags, [true, false]);
    }
}
