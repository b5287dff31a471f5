//! Cursor Pagination
//!
//! Exposes provider pagination as a lazy stream of pages. Each call to
//! [`paginate`] starts a fresh walk from the first page; the consumer decides
//! when to stop pulling.

use std::future::Future;

use futures::Stream;
use futures::stream;

use crate::application::ports::{ContractPage, OptionsDataError, PageCursor, SnapshotPage};

/// A provider page: items plus an optional continuation.
pub trait Page {
    /// Record type carried by the page.
    type Item;

    /// Split into items and continuation.
    fn into_parts(self) -> (Vec<Self::Item>, Option<PageCursor>);
}

impl Page for ContractPage {
    type Item = crate::domain::Contract;

    fn into_parts(self) -> (Vec<Self::Item>, Option<PageCursor>) {
        (self.contracts, self.next)
    }
}

impl Page for SnapshotPage {
    type Item = crate::domain::Snapshot;

    fn into_parts(self) -> (Vec<Self::Item>, Option<PageCursor>) {
        (self.snapshots, self.next)
    }
}

enum Position {
    First,
    After(PageCursor),
    Exhausted,
}

/// Stream pages produced by `fetch`.
///
/// `fetch` receives `None` for the first page and the previous page's
/// continuation afterwards. The stream ends after a page without
/// continuation, after a continuation that repeats the one just used, or
/// right after yielding an error.
pub fn paginate<P, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<P::Item>, OptionsDataError>>
where
    P: Page,
    F: FnMut(Option<PageCursor>) -> Fut,
    Fut: Future<Output = Result<P, OptionsDataError>>,
{
    stream::unfold((fetch, Position::First), |(mut fetch, position)| async move {
        let cursor = match position {
            Position::First => None,
            Position::After(cursor) => Some(cursor),
            Position::Exhausted => return None,
        };

        match fetch(cursor.clone()).await {
            Ok(page) => {
                let (items, next) = page.into_parts();
                let position = match next {
                    Some(next) if cursor.as_ref() != Some(&next) => Position::After(next),
                    _ => Position::Exhausted,
                };
                Some((Ok(items), (fetch, position)))
            }
            Err(e) => Some((Err(e), (fetch, Position::Exhausted))),
        }
    })
}
