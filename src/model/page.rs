use serde::Deserialize;

/// A single page of items as returned from Spotify's paged endpoints.
///
/// The facade only ever reads the first page, which is what the playlist endpoints return by default; the paging
/// fields are kept around for logging purposes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct PageObject<T> {
    items: Vec<T>,

    #[allow(dead_code)]
    next: Option<String>,
    #[allow(dead_code)]
    limit: usize,
    #[allow(dead_code)]
    offset: usize,
    #[allow(dead_code)]
    total: usize,
}

impl<T> PageObject<T> {
    /// Return the items in this page while consuming the page.
    pub(crate) fn take_items(self) -> Vec<T> {
        self.items
    }
}
