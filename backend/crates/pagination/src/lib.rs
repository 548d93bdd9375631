//! Pagination primitives shared by paged endpoints and repositories.
//!
//! A paged read returns a [`Page`]: the items plus a `has_more` continuation
//! flag reported by the backing store's cursor, never derived by counting the
//! remaining rows. [`PageRequest`] normalises client-supplied limit/offset
//! values, and [`Cursor`] round-trips an offset through an opaque base64
//! token so clients cannot depend on its representation.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use url::Url;

/// Page size applied when a request does not name one.
pub const DEFAULT_PAGE_LIMIT: u32 = 5;

/// Upper bound on client-supplied page sizes.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Normalised limit/offset pair for a paged read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u32,
}

impl PageRequest {
    /// Build a request, clamping the limit into `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset,
        }
    }

    /// Build a request from optional query parameters, applying defaults.
    #[must_use]
    pub fn from_query(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self::new(
            limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            offset.unwrap_or_default(),
        )
    }

    /// Page size after clamping.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Offset of the first requested item.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Request describing the page that follows this one.
    #[must_use]
    pub const fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::from_query(None, None)
    }
}

/// One page of results plus the store's continuation indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    has_more: bool,
}

impl<T> Page<T> {
    /// Wrap a page of items together with the continuation flag.
    #[must_use]
    pub const fn new(items: Vec<T>, has_more: bool) -> Self {
        Self { items, has_more }
    }

    /// Items on this page, in store order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether the store reported a continuation beyond this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Consume the page into its items and continuation flag.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, bool) {
        (self.items, self.has_more)
    }

    /// Transform every item while preserving the continuation flag.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
        }
    }

}

/// Failures decoding an opaque continuation token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    /// The token is not a cursor this service issued.
    #[error("continuation token is malformed")]
    Malformed,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    offset: u32,
}

/// Opaque continuation cursor wrapping an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: u32,
}

impl Cursor {
    /// Cursor pointing at the given offset.
    #[must_use]
    pub const fn new(offset: u32) -> Self {
        Self { offset }
    }

    /// Offset this cursor points at.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Encode the cursor into an opaque URL-safe token.
    #[must_use]
    pub fn encode(&self) -> String {
        let payload = CursorPayload {
            offset: self.offset,
        };
        // The payload shape is a closed struct of plain integers; encoding
        // cannot fail.
        let bytes = serde_json::to_vec(&payload).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Decode a token previously produced by [`Cursor::encode`].
    ///
    /// # Errors
    /// Returns [`CursorError::Malformed`] when the token is not valid
    /// base64 or does not carry a cursor payload.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CursorError::Malformed)?;
        let payload: CursorPayload =
            serde_json::from_slice(&bytes).map_err(|_| CursorError::Malformed)?;
        Ok(Self {
            offset: payload.offset,
        })
    }
}

/// Build the `next` link for a page, or `None` on the final page.
///
/// The link repeats the base URL with `limit` and `offset` query parameters
/// describing the following page.
#[must_use]
pub fn next_link(base: &Url, request: &PageRequest, has_more: bool) -> Option<String> {
    if !has_more {
        return None;
    }
    let next = request.next();
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("limit", &next.limit().to_string())
        .append_pair("offset", &next.offset().to_string());
    Some(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, DEFAULT_PAGE_LIMIT, 0)]
    #[case(Some(10), Some(20), 10, 20)]
    #[case(Some(0), None, 1, 0)]
    #[case(Some(500), None, MAX_PAGE_LIMIT, 0)]
    fn page_request_normalises_query_values(
        #[case] limit: Option<u32>,
        #[case] offset: Option<u32>,
        #[case] expected_limit: u32,
        #[case] expected_offset: u32,
    ) {
        let request = PageRequest::from_query(limit, offset);
        assert_eq!(request.limit(), expected_limit);
        assert_eq!(request.offset(), expected_offset);
    }

    #[rstest]
    fn next_request_advances_by_limit() {
        let request = PageRequest::new(5, 10);
        let next = request.next();
        assert_eq!(next.limit(), 5);
        assert_eq!(next.offset(), 15);
    }

    #[rstest]
    fn page_map_preserves_continuation_flag() {
        let page = Page::new(vec![1_u32, 2, 3], true);
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.items(), &[2, 4, 6]);
        assert!(mapped.has_more());
    }

    #[rstest]
    fn cursor_round_trips_through_opaque_token() {
        let token = Cursor::new(35).encode();
        let decoded = Cursor::decode(&token).expect("token decodes");
        assert_eq!(decoded.offset(), 35);
    }

    #[rstest]
    #[case("not base64!")]
    #[case("bm90IGpzb24")]
    fn cursor_rejects_foreign_tokens(#[case] token: &str) {
        assert_eq!(Cursor::decode(token), Err(CursorError::Malformed));
    }

    #[rstest]
    fn next_link_present_only_when_more_pages_exist(
        #[values(true, false)] has_more: bool,
    ) {
        let base = Url::parse("http://localhost:8080/packages").expect("base url");
        let request = PageRequest::new(5, 0);
        let link = next_link(&base, &request, has_more);
        if has_more {
            assert_eq!(
                link.as_deref(),
                Some("http://localhost:8080/packages?limit=5&offset=5")
            );
        } else {
            assert!(link.is_none());
        }
    }
}
