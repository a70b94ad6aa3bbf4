use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use shared::{
    DomainCount as SharedDomainCount, File as SharedFile, LocaleDomain as SharedLocaleDomain,
    TransUnit as SharedTransUnit, Translation as SharedTranslation,
};

use crate::domain::commands::{DomainCount, LocaleDomain};
use crate::domain::models::{
    File as DomainFile, FileId, TransUnit as DomainTransUnit, Translation as DomainTranslation,
    TranslationId, UnitId,
};

/// Mapper to convert between shared TransUnit DTOs and domain TransUnit models.
pub struct TransUnitMapper;

impl TransUnitMapper {
    /// Converts a domain TransUnit to a shared DTO. Unpersisted ids map to 0.
    pub fn to_dto(domain: DomainTransUnit) -> SharedTransUnit {
        SharedTransUnit {
            id: domain.id.map_or(0, |id| id.0),
            domain: domain.domain,
            key: domain.key,
            translations: domain
                .translations
                .into_iter()
                .map(Self::translation_to_dto)
                .collect(),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn translation_to_dto(domain: DomainTranslation) -> SharedTranslation {
        SharedTranslation {
            id: domain.id.map_or(0, |id| id.0),
            trans_unit_id: domain.trans_unit_id.map_or(0, |id| id.0),
            locale: domain.locale,
            content: domain.content,
            modified_manually: domain.modified_manually,
            file_id: domain.file_id.map(|id| id.0),
            created_at: domain.created_at.to_rfc3339(),
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_dto_list(domain_units: Vec<DomainTransUnit>) -> Vec<SharedTransUnit> {
        domain_units.into_iter().map(Self::to_dto).collect()
    }

    /// Converts a shared TransUnit DTO to a domain TransUnit. Id 0 means
    /// not persisted.
    pub fn to_domain(dto: SharedTransUnit) -> Result<DomainTransUnit> {
        let translations = dto
            .translations
            .into_iter()
            .map(Self::translation_to_domain)
            .collect::<Result<Vec<_>>>()?;

        Ok(DomainTransUnit {
            id: (dto.id != 0).then_some(UnitId(dto.id)),
            domain: dto.domain,
            key: dto.key,
            translations,
            created_at: parse_timestamp(&dto.created_at)
                .context("Failed to parse created_at from trans unit DTO")?,
            updated_at: parse_timestamp(&dto.updated_at)
                .context("Failed to parse updated_at from trans unit DTO")?,
        })
    }

    pub fn translation_to_domain(dto: SharedTranslation) -> Result<DomainTranslation> {
        Ok(DomainTranslation {
            id: (dto.id != 0).then_some(TranslationId(dto.id)),
            trans_unit_id: (dto.trans_unit_id != 0).then_some(UnitId(dto.trans_unit_id)),
            locale: dto.locale,
            content: dto.content,
            file_id: dto.file_id.map(FileId),
            modified_manually: dto.modified_manually,
            created_at: parse_timestamp(&dto.created_at)
                .context("Failed to parse created_at from translation DTO")?,
            updated_at: parse_timestamp(&dto.updated_at)
                .context("Failed to parse updated_at from translation DTO")?,
        })
    }

    pub fn to_locale_domain_dto(domain: LocaleDomain) -> SharedLocaleDomain {
        SharedLocaleDomain {
            locale: domain.locale,
            domain: domain.domain,
        }
    }

    pub fn to_domain_count_dto(domain: DomainCount) -> SharedDomainCount {
        SharedDomainCount {
            domain: domain.domain,
            count: domain.count,
        }
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)?.with_timezone(&Utc))
}

/// Mapper for resource file records
pub struct FileMapper;

impl FileMapper {
    pub fn to_dto(domain: DomainFile) -> SharedFile {
        SharedFile {
            id: domain.id.0,
            domain: domain.domain,
            locale: domain.locale,
            extension: domain.extension,
            path: domain.path,
            name: domain.name,
        }
    }
}
