use anyhow::Result;
use std::future::Future;

/// Drain an offset-paginated listing.
///
/// `fetch_page` is called with offsets `0, page_size, 2 * page_size, ...`
/// one at a time. The offset always advances by `page_size`, whatever the
/// page actually held. The first empty page ends the walk and contributes
/// nothing; any error aborts it and discards what was collected so far.
pub async fn collect_pages<T, F, Fut>(page_size: usize, mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut offset = 0;

    loop {
        let page = fetch_page(offset).await?;
        offset += page_size;

        if page.is_empty() {
            tracing::debug!(offset, total = items.len(), "reached end of listing");
            break;
        }

        tracing::info!(offset, count = page.len(), "fetched page");
        items.extend(page);
    }

    Ok(items)
}
