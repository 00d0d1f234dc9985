//! Filter compiler and Query DSL request builder.
//!
//! Structured filters go through four stages:
//!
//! - **Reduce**: filters with the same index, field, operator, type and nesting path are merged,
//!   concatenating their values
//! - **Compile**: each merged filter becomes a `match`, `wildcard` or `range` fragment, validated
//!   against its data type's operators and value format
//! - **Assemble**: fragments are grouped into one `bool` clause per index, with negated filters
//!   under `must_not`
//! - **Build**: a [`QueryBuilder`] bound to one index flattens appended clauses into a search or
//!   composite aggregation request
//!
//! # Example
//!
//! ```
//! use esq_query::{
//!     FilterOperator, FilterSpecification, FilterType, IndexQueryAssembler, QueryBuilder,
//!     SortField,
//! };
//!
//! let filters = [
//!     FilterSpecification::new("people", "age", FilterOperator::Between, FilterType::Number, ["18;_65"])
//!         .unwrap(),
//!     FilterSpecification::new("people", "name", FilterOperator::Contains, FilterType::Text, ["ada"])
//!         .unwrap(),
//! ];
//! let map = IndexQueryAssembler::new(false).assemble(&filters).unwrap();
//!
//! let mut builder = QueryBuilder::new("people").unwrap();
//! builder.append(&map).unwrap();
//! let request = builder.build_search_query(0, 10, &[SortField::asc("age")]);
//! assert_eq!(request["query"]["bool"]["must"][0]["range"]["age"]["lte"], "65");
//! ```

#![warn(missing_docs)]

mod assemble;
mod builder;
mod compile;
mod error;
mod filter;
mod reduce;
mod sort;

pub use assemble::{IndexBoolQuery, IndexQueryAssembler};
pub use builder::{DEFAULT_AGGREGATION_SIZE, QueryBuilder};
pub use compile::{
    CompiledFragment, FilterCompiler, RangeCompiler, TextCompiler, ValueMask, compile_filter,
    compile_specification,
};
pub use error::{QueryError, QueryErrorKind};
pub use filter::{FilterInput, FilterOperator, FilterSpecification, FilterType};
pub use reduce::{FilterKey, ReducedFilter, ReducedFilters, reduce_filters};
pub use sort::{SortDirection, SortField};
