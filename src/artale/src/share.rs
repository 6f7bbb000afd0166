//! Shareable links carrying the search keyword

use url::Url;

pub use url::ParseError as ShareError;

/// Query parameter holding the keyword
pub const SHARE_PARAM: &str = "searchkey";

/// Default page the share link points at
pub const DEFAULT_SHARE_BASE: &str = "https://artale-drop.github.io/";

/// `base` with its `searchkey` parameter set to `keyword`.
///
/// Any existing `searchkey` is replaced; other parameters are kept in order.
pub fn share_url(base: &str, keyword: &str) -> Result<String, ShareError> {
    let mut url = Url::parse(base)?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SHARE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(SHARE_PARAM, keyword);
    Ok(url.into())
}

/// Initial keyword from a page URL, `None` when absent or unparsable
pub fn initial_keyword(url: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())
}
