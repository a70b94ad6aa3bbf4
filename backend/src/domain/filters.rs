//! Validated listing filters for the query engine.
//!
//! Sort column and order arrive as free-form strings from front ends and are
//! only ever turned into one of the variants below.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::errors::QueryError;

/// Sortable trans unit attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Id,
    Domain,
    Key,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortColumn {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(SortColumn::Id),
            "domain" => Ok(SortColumn::Domain),
            "key" => Ok(SortColumn::Key),
            "createdAt" | "created_at" => Ok(SortColumn::CreatedAt),
            "updatedAt" | "updated_at" => Ok(SortColumn::UpdatedAt),
            other => Err(QueryError::UnsupportedSortColumn(other.to_string())),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortColumn::Id => "id",
            SortColumn::Domain => "domain",
            SortColumn::Key => "key",
            SortColumn::CreatedAt => "createdAt",
            SortColumn::UpdatedAt => "updatedAt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(QueryError::UnsupportedSortOrder(s.to_string())),
        }
    }
}

/// Filters for `list_units` and `count`.
///
/// `domain` and `key` only apply while `search` is on. Content filters are keyed
/// by locale and only apply to locales the caller asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitFilters {
    pub search: bool,
    pub domain: Option<String>,
    pub key: Option<String>,
    pub sort_column: SortColumn,
    pub sort_order: SortOrder,
    pub content: BTreeMap<String, String>,
}

impl UnitFilters {
    /// Domain substring, if it applies
    pub fn domain_filter(&self) -> Option<&str> {
        self.search_value(self.domain.as_deref())
    }

    /// Key substring, if it applies
    pub fn key_filter(&self) -> Option<&str> {
        self.search_value(self.key.as_deref())
    }

    /// Content substring for a locale, if one was given
    pub fn content_for(&self, locale: &str) -> Option<&str> {
        self.content
            .get(locale)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn search_value<'a>(&self, value: Option<&'a str>) -> Option<&'a str> {
        if !self.search {
            return None;
        }
        value.filter(|value| !value.is_empty())
    }
}
