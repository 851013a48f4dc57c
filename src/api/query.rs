//! Query strings understood by the backend's `/events` collection endpoint

use reqwest::Url;

/// Fields the search term is matched against, in filter order
pub const SEARCH_FIELDS: [&str; 4] = ["name", "performers", "description", "venue"];

/// Append the "any field contains `term`" filter to `url`.
///
/// Produces the bracketed form the backend's query parser expects:
/// `_where[_or][0][name_contains]=term&_where[_or][1][performers_contains]=term&...`
pub fn append_search_filter(url: &mut Url, term: &str) {
    let mut pairs = url.query_pairs_mut();
    for (i, field) in SEARCH_FIELDS.iter().enumerate() {
        pairs.append_pair(&format!("_where[_or][{}][{}_contains]", i, field), term);
    }
}

/// Sort clause for the events listing
pub fn append_date_sort(url: &mut Url) {
    url.query_pairs_mut().append_pair("_sort", "date:ASC");
}

pub fn append_slug_filter(url: &mut Url, slug: &str) {
    url.query_pairs_mut().append_pair("slug", slug);
}
