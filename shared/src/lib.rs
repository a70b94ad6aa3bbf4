use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A translation as exposed to front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: u64,
    /// ID of the trans unit this translation belongs to
    pub trans_unit_id: u64,
    pub locale: String,
    pub content: Option<String>,
    /// True once a human edited this translation; bulk imports leave it alone
    pub modified_manually: bool,
    /// ID of the backing resource file, if any
    pub file_id: Option<u64>,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// A (domain, key) addressable translatable string with its translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransUnit {
    pub id: u64,
    pub domain: String,
    pub key: String,
    pub translations: Vec<Translation>,
    pub created_at: String,
    pub updated_at: String,
}

/// On-disk resource file backing translations of one domain and locale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: u64,
    pub domain: String,
    pub locale: String,
    pub extension: String,
    /// Directory relative to the resources root
    pub path: String,
    pub name: String,
}

/// Grid filters as sent by the translation editor.
///
/// Locale codes appear as extra top-level keys holding a content substring,
/// e.g. `{"_search": "true", "domain": "mess", "en": "hello"}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitListFilters {
    /// Gates the `domain`/`key` filters
    #[serde(rename = "_search", default, deserialize_with = "deserialize_search_flag")]
    pub search: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Sort column name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidx: Option<String>,
    /// Sort direction, `ASC` or `DESC`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sord: Option<String>,
    /// Per-locale content substring filters. Extra keys without a string
    /// value, like the grid's numeric `nd` stamp, are dropped.
    #[serde(flatten, deserialize_with = "deserialize_content_filters")]
    pub content: BTreeMap<String, String>,
}

/// The grid sends `_search` as a string; API clients send a boolean.
fn deserialize_search_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Text(text) => matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "on"),
    })
}

fn deserialize_content_filters<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FilterValue {
        Text(String),
        Other(#[allow(dead_code)] IgnoredAny),
    }

    struct ContentFilters;

    impl<'de> Visitor<'de> for ContentFilters {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of locale content filters")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut filters = BTreeMap::new();
            while let Some((locale, value)) = map.next_entry::<String, FilterValue>()? {
                if let FilterValue::Text(content) = value {
                    filters.insert(locale, content);
                }
            }
            Ok(filters)
        }
    }

    deserializer.deserialize_map(ContentFilters)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitListRequest {
    /// Locales to display; `None` lists every locale
    pub locales: Option<Vec<String>>,
    /// Page size (>= 1)
    pub rows: u32,
    /// 1-based page number
    pub page: u32,
    pub filters: Option<UnitListFilters>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitListResponse {
    pub trans_units: Vec<TransUnit>,
    /// Number of units matching the filters across all pages
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleDomain {
    pub locale: String,
    pub domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: usize,
}
