//! serde helpers for the query API's XML bodies.

use serde::{Deserialize, Deserializer};

/// `<fooSet><item>..</item><item>..</item></fooSet>` -> `Vec<T>`.
///
/// An empty or self-closing set element decodes as an empty list.
pub(crate) fn item_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    struct ItemSet<T> {
        #[serde(rename = "item", default = "Vec::new")]
        item: Vec<T>,
    }

    Ok(ItemSet::deserialize(deserializer)?.item)
}

/// Trims surrounding whitespace of a text element (fingerprints come back padded).
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}
