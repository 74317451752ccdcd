use serde::Serialize;

/// Page position over the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
  pub current_page: usize,
  pub page_size: usize,
  /// Size of the filtered set before slicing
  pub total_count: usize,
  pub total_pages: usize,
}

impl Pagination {
  /// Compute pagination for `total_count` items, clamping the requested page.
  pub fn new(requested_page: usize, page_size: usize, total_count: usize) -> Self {
    let page_size = page_size.max(1);
    let total_pages = total_count.div_ceil(page_size);
    let current_page = requested_page.clamp(1, total_pages.max(1));
    Self {
      current_page,
      page_size,
      total_count,
      total_pages,
    }
  }

  /// Index range of the current page within the filtered set.
  pub fn range(&self) -> std::ops::Range<usize> {
    let start = ((self.current_page - 1) * self.page_size).min(self.total_count);
    let end = (self.current_page * self.page_size).min(self.total_count);
    start..end
  }

  pub fn has_next(&self) -> bool {
    self.current_page < self.total_pages
  }

  pub fn has_prev(&self) -> bool {
    self.current_page > 1
  }
}

/// Slice out the current page.
pub fn paginate<'a, T>(items: &'a [T], pagination: &Pagination) -> &'a [T] {
  let range = pagination.range();
  &items[range.start.min(items.len())..range.end.min(items.len())]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slices_pages() {
    let items: Vec<u32> = (1..=25).collect();
    let first = Pagination::new(1, 10, items.len());
    assert_eq!(first.total_pages, 3);
    assert_eq!(paginate(&items, &first), (1..=10).collect::<Vec<_>>().as_slice());

    let last = Pagination::new(3, 10, items.len());
    assert_eq!(paginate(&items, &last), &[21, 22, 23, 24, 25]);
    assert!(!last.has_next());
    assert!(last.has_prev());
  }

  #[test]
  fn test_out_of_range_page_is_clamped() {
    let p = Pagination::new(9, 10, 12);
    assert_eq!(p.current_page, 2);
    let p = Pagination::new(0, 10, 12);
    assert_eq!(p.current_page, 1);
  }

  #[test]
  fn test_empty_set_has_no_pages() {
    let p = Pagination::new(1, 20, 0);
    assert_eq!(p.total_pages, 0);
    assert_eq!(p.current_page, 1);
    assert!(paginate::<u8>(&[], &p).is_empty());
  }
}
