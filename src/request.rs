use serde::Deserialize;

use crate::core::models::common::Pagination as PageWindow;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub page: i64,
    #[serde(default = "page_size")]
    pub size: i64,
}

fn first_page() -> i64 {
    1
}

fn page_size() -> i64 {
    50
}

impl From<Pagination> for PageWindow {
    fn from(p: Pagination) -> Self {
        PageWindow::page(p.page, p.size)
    }
}

#[derive(Debug, Deserialize)]
pub struct Login {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EnterCode {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct CodeFilter {
    pub used: Option<bool>,
    pub search: Option<String>,
}
