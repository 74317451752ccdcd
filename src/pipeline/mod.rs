//! Client-side filter → sort → paginate pipeline.
//!
//! Everything here is pure: the full cached set goes in, the current page
//! and its pagination come out, and no input is mutated. Filtering and
//! sorting always see the entire set, never a previous page.

mod filter;
mod paginate;
mod sort;

pub use filter::{filter_items, is_unconstrained, standard_filter, FilterFn, Filters, ALL, SEARCH_FILTER};
pub use paginate::{paginate, Pagination};
pub use sort::{compare_entities, parse_timestamp, sort_items, FieldKind, FieldSchema, SortConfig, SortKey};

use crate::entity::Entity;

/// Result of running the pipeline once.
#[derive(Debug, Clone)]
pub struct ListView<'a> {
  /// Filtered and sorted records, all pages
  pub filtered: Vec<&'a Entity>,
  pub pagination: Pagination,
}

impl<'a> ListView<'a> {
  /// Records on the current page.
  pub fn page(&self) -> &[&'a Entity] {
    paginate(&self.filtered, &self.pagination)
  }
}

/// Inputs that drive one pipeline run.
pub struct PipelineInput<'p> {
  pub filters: &'p Filters,
  pub predicate: &'p FilterFn,
  pub sort: &'p SortConfig,
  pub schema: &'p FieldSchema,
  pub page: usize,
  pub page_size: usize,
}

/// Run filter, sort and pagination over the full record set.
pub fn run<'a>(items: &'a [Entity], input: &PipelineInput<'_>) -> ListView<'a> {
  let mut filtered = filter_items(items, input.filters, input.predicate);
  sort_items(&mut filtered, input.sort, input.schema);
  let pagination = Pagination::new(input.page, input.page_size, filtered.len());
  ListView {
    filtered,
    pagination,
  }
}
