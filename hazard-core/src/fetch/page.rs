//! Deserialisation of a single item-listing page.

use serde::Deserialize;

use crate::Feature;

/// One page of an `/items` listing.
///
/// Both arrays are optional on the wire; absent or `null` values read as
/// empty. Unknown members (`numberMatched`, `timeStamp`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ItemsPage {
    /// Features on this page, in server order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub features: Vec<Feature>,
    /// Navigation links advertised by the server.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub links: Vec<PageLink>,
}

/// A navigation link from a page's `links` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageLink {
    /// Link relation, e.g. `"next"` or `"self"`.
    #[serde(default)]
    pub rel: String,
    /// Target URL, used verbatim.
    #[serde(default)]
    pub href: Option<String>,
}

impl ItemsPage {
    /// Parse a page from a response body.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the body is not a JSON object of the
    /// expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// The `href` of the first `rel = "next"` link carrying a target.
    #[must_use]
    pub fn next_href(&self) -> Option<&str> {
        self.links
            .iter()
            .filter(|link| link.rel == "next")
            .find_map(|link| link.href.as_deref())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
