use serde::{Deserialize, Serialize};

use crate::repositories::PageRequest;

/// Límite por defecto de los listados paginados
pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 500;

// Response genérica
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

// Query de paginación por offset
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Normaliza límite a [1, MAX_PAGE_LIMIT] y offset a ≥ 0
    pub fn to_page(&self) -> PageRequest {
        PageRequest {
            limit: self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

// Página de resultados
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
    pub is_done: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: PageRequest) -> Self {
        let is_done = (items.len() as i64) < page.limit;
        Self {
            items,
            limit: page.limit,
            offset: page.offset,
            is_done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_clamps() {
        let page = PageQuery {
            limit: Some(10_000),
            offset: Some(-4),
        }
        .to_page();
        assert_eq!(page.limit, MAX_PAGE_LIMIT);
        assert_eq!(page.offset, 0);

        let page = PageQuery::default().to_page();
        assert_eq!(page.limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_paginated_is_done_when_short_page() {
        let page = PageRequest { limit: 3, offset: 0 };
        assert!(Paginated::new(vec![1, 2], page).is_done);
        assert!(!Paginated::new(vec![1, 2, 3], page).is_done);
    }
}
