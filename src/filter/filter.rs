use super::error::FilterError;
use super::types::PageMeta;

/// Allowed range and default for a listing's `limit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitBounds {
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl LimitBounds {
    /// Paged admin/manager/school listings.
    pub fn paged() -> Self {
        let list = &crate::config::config().list;
        Self { min: 1, max: list.max_limit, default: list.default_limit }
    }

    /// Teacher listing, where `0` returns every row.
    pub fn with_all() -> Self {
        let list = &crate::config::config().list;
        Self { min: 0, max: list.export_max_limit, default: list.default_limit }
    }
}

/// Resolved page window. `limit == 0` means "no limit".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn resolve(page: Option<i64>, limit: Option<i64>, bounds: LimitBounds) -> Result<Self, FilterError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(FilterError::InvalidPage(page));
        }
        let limit = match limit {
            Some(l) if l < 0 => return Err(FilterError::InvalidLimit(l)),
            Some(l) => l.clamp(bounds.min, bounds.max),
            None => bounds.default,
        };
        Ok(Self { page, limit })
    }

    /// Everything on one page; used by exports.
    pub fn all() -> Self {
        Self { page: 1, limit: 0 }
    }

    pub fn offset(&self) -> i64 {
        if self.limit == 0 {
            0
        } else {
            (self.page - 1) * self.limit
        }
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        let total_pages = match self.limit {
            0 if total > 0 => 1,
            0 => 0,
            limit => (total + limit - 1) / limit,
        };
        PageMeta {
            total,
            page: self.page,
            limit: self.limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGED: LimitBounds = LimitBounds { min: 1, max: 100, default: 50 };
    const ALL: LimitBounds = LimitBounds { min: 0, max: 500, default: 50 };

    #[test]
    fn clamps_limit_into_bounds() {
        assert_eq!(Pagination::resolve(None, None, PAGED).unwrap(), Pagination { page: 1, limit: 50 });
        assert_eq!(Pagination::resolve(Some(3), Some(1000), PAGED).unwrap().limit, 100);
        assert_eq!(Pagination::resolve(None, Some(0), PAGED).unwrap().limit, 1);
        assert_eq!(Pagination::resolve(None, Some(0), ALL).unwrap().limit, 0);
        assert_eq!(Pagination::resolve(Some(0), None, PAGED), Err(FilterError::InvalidPage(0)));
        assert_eq!(Pagination::resolve(None, Some(-5), ALL), Err(FilterError::InvalidLimit(-5)));
    }

    #[test]
    fn computes_offset_and_meta() {
        let p = Pagination { page: 3, limit: 20 };
        assert_eq!(p.offset(), 40);
        assert_eq!(p.meta(41).total_pages, 3);
        assert_eq!(Pagination::all().offset(), 0);
        assert_eq!(Pagination::all().meta(7).total_pages, 1);
        assert_eq!(Pagination::all().meta(0).total_pages, 0);
    }
}
