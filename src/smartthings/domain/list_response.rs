use serde::Deserialize;

/// Paged envelope used by the SmartThings list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[serde(rename = "_links", default)]
    pub links: PagingLinks,
}

#[derive(Debug, Default, Deserialize)]
pub struct PagingLinks {
    pub next: Option<Link>,
    #[allow(dead_code)]
    pub previous: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}
