//! Cursor pagination via the `Link` response header.
//!
//! A response that has more pages carries a header such as
//!
//! ```text
//! <https://api.example.com/products?limit=250&page_info=PREV>; rel="previous",
//! <https://api.example.com/products?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! and the next page is requested with the `page_info` value from the
//! `rel="next"` link.

/// Returns the `page_info` cursor of the `rel="next"` link, or `None` on the
/// last page (no header, no next link, or a next link without a cursor).
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    let next = header
        .split(',')
        .map(str::trim)
        .find(|segment| segment.contains(r#"rel="next""#))?;

    let url = angle_bracket_url(next)?;
    query_param(url, "page_info")
}

fn angle_bracket_url(segment: &str) -> Option<&str> {
    let start = segment.find('<')? + 1;
    let end = segment.find('>')?;
    if start >= end {
        return None;
    }
    Some(&segment[start..end])
}

// Cursors are opaque base64url tokens, so no percent-decoding is applied.
fn query_param(url: &str, param: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, value)| *key == param && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}
