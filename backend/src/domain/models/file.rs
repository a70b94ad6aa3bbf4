//! Domain model for resource files.
//!
//! Files are registered externally; translations only point at them by id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage identity of a resource file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `{domain}.{locale}.{extension}` parts of a resource file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileNaming {
    pub domain: String,
    pub locale: String,
    pub extension: String,
}

impl FileNaming {
    pub fn new(
        domain: impl Into<String>,
        locale: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            locale: locale.into(),
            extension: extension.into(),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}.{}", self.domain, self.locale, self.extension)
    }

    /// Split a file name into its parts. The domain may itself contain dots
    /// (`admin.forms.en.yml`), so the name is split from the right.
    pub fn parse(file_name: &str) -> Option<Self> {
        let mut parts = file_name.rsplitn(3, '.');
        let extension = parts.next()?;
        let locale = parts.next()?;
        let domain = parts.next()?;

        if [domain, locale, extension].iter().any(|part| part.is_empty()) {
            return None;
        }

        Some(Self::new(domain, locale, extension))
    }
}

/// A resource file registered in storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: FileId,
    pub domain: String,
    pub locale: String,
    pub extension: String,
    /// Directory relative to the resources root, `/`-separated
    pub path: String,
    pub name: String,
}

impl File {
    pub fn naming(&self) -> FileNaming {
        FileNaming::new(&self.domain, &self.locale, &self.extension)
    }
}
