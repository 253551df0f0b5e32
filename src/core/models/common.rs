#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Pages are 1-based. Out of range values are clamped.
    pub fn page(page: i64, size: i64) -> Self {
        let size = size.clamp(1, 500);
        let page = page.max(1);
        Self::new(size, (page - 1).saturating_mul(size))
    }
}
