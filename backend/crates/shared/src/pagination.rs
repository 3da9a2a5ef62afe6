//! Pagination primitives shared by the list endpoints.

use serde::{Deserialize, Serialize};

/// ページあたり件数の上限
pub const MAX_LIMIT: u32 = 100;

/// クエリ文字列から受け取るページングパラメータ
///
/// ## Examples
/// ```rust
/// use kernel::pagination::PageQuery;
/// let query = PageQuery { page: Some(2), limit: Some(10) };
/// let page = query.resolve(50);
/// assert_eq!(page.offset(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    /// デフォルト件数を適用して正規化されたページへ解決
    ///
    /// `page` は 1 以上、`limit` は 1..=[`MAX_LIMIT`] に丸められます。
    pub fn resolve(&self, default_limit: u32) -> Page {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        Page { page, limit }
    }
}

/// 正規化済みのページ指定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// SQL の OFFSET 値
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// SQL の LIMIT 値
    pub fn limit_i64(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// レスポンスに載せるページングメタ情報
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: Page, total: u64) -> Self {
        let total_pages = total.div_ceil(u64::from(page.limit));
        Self {
            page: page.page,
            limit: page.limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let page = PageQuery::default().resolve(10);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_resolve_clamps() {
        let page = PageQuery {
            page: Some(0),
            limit: Some(10_000),
        }
        .resolve(10);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_LIMIT);
    }

    #[test]
    fn test_offset() {
        let page = PageQuery {
            page: Some(3),
            limit: Some(20),
        }
        .resolve(10);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_meta_total_pages() {
        let page = PageQuery {
            page: Some(1),
            limit: Some(10),
        }
        .resolve(10);
        assert_eq!(PaginationMeta::new(page, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(page, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(page, 11).total_pages, 2);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let page = PageQuery::default().resolve(10);
        let meta = PaginationMeta::new(page, 25);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["total"], 25);
    }
}
