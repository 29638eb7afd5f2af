//! Page requests and page results for list queries.
//!
//! # Invariants
//! - `size` is always within `1..=MAX_PAGE_SIZE` after construction.
//! - Sort columns come from per-entity enums, never from caller strings.
//! - Every ordering ends with `uuid ASC` so pages are deterministic.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Column a list query may be ordered by.
pub trait SortField: Copy {
    /// SQL expression used in `ORDER BY`.
    fn column(self) -> &'static str;
    /// Parses the external (camelCase) field name.
    fn parse(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort<S> {
    pub field: S,
    pub direction: SortDirection,
}

impl<S: SortField> Sort<S> {
    pub fn asc(field: S) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: S) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parses `field` or `field,asc|desc` (direction is case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.splitn(2, ',');
        let field = S::parse(parts.next()?.trim())?;
        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(_) => return None,
        };
        Some(Self { field, direction })
    }

    pub(crate) fn order_by_sql(&self) -> String {
        format!(
            " ORDER BY {} {}, uuid ASC",
            self.field.column(),
            self.direction.keyword()
        )
    }
}

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<S> {
    pub page: u32,
    pub size: u32,
    pub sort: Sort<S>,
}

impl<S: SortField> PageRequest<S> {
    /// Builds a request, normalizing `size` to the supported range.
    pub fn new(page: u32, size: Option<u32>, sort: Sort<S>) -> Self {
        Self {
            page,
            size: normalize_page_size(size),
            sort,
        }
    }

    pub(crate) fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl<S: SortField + Default> Default for PageRequest<S> {
    fn default() -> Self {
        Self::new(0, None, Sort::default())
    }
}

/// Normalizes page size: missing or zero -> 10, above 100 -> 100.
pub fn normalize_page_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        Some(value) => value,
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new<S>(content: Vec<T>, request: &PageRequest<S>, total_elements: u64) -> Self {
        let size = u64::from(request.size.max(1));
        let total_pages = u32::try_from(total_elements.div_ceil(size)).unwrap_or(u32::MAX);
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    enum Field {
        #[default]
        Name,
        CreatedAt,
    }

    impl SortField for Field {
        fn column(self) -> &'static str {
            match self {
                Self::Name => "name",
                Self::CreatedAt => "created_at",
            }
        }

        fn parse(name: &str) -> Option<Self> {
            match name {
                "name" => Some(Self::Name),
                "createdAt" => Some(Self::CreatedAt),
                _ => None,
            }
        }
    }

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(normalize_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(25)), 25);
        assert_eq!(normalize_page_size(Some(5000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn sort_parses_field_and_optional_direction() {
        assert_eq!(Sort::<Field>::parse("name"), Some(Sort::asc(Field::Name)));
        assert_eq!(
            Sort::<Field>::parse("createdAt,DESC"),
            Some(Sort::desc(Field::CreatedAt))
        );
        assert_eq!(Sort::<Field>::parse("name,sideways"), None);
        assert_eq!(Sort::<Field>::parse("name; DROP TABLE agendas"), None);
    }

    #[test]
    fn order_by_always_breaks_ties_on_uuid() {
        let sql = Sort::desc(Field::CreatedAt).order_by_sql();
        assert_eq!(sql, " ORDER BY created_at DESC, uuid ASC");
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest::new(1, Some(10), Sort::asc(Field::Name));
        let page = Page::new(vec![1, 2, 3], &request, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number, 1);
        assert_eq!(request.offset(), 10);

        let empty: Page<i32> = Page::new(Vec::new(), &request, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
