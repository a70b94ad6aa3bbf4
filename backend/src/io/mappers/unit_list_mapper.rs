use shared::{UnitListFilters, UnitListRequest, UnitListResponse};

use super::trans_unit_mapper::TransUnitMapper;
use crate::domain::commands::UnitListQuery;
use crate::domain::errors::QueryError;
use crate::domain::filters::{SortColumn, SortOrder, UnitFilters};
use crate::domain::models::TransUnit;

/// Grid filters only become domain filters after the sort column and
/// order pass the whitelist.
impl TryFrom<&UnitListFilters> for UnitFilters {
    type Error = QueryError;

    fn try_from(dto: &UnitListFilters) -> Result<Self, Self::Error> {
        let sort_column = match non_empty(dto.sidx.as_deref()) {
            Some(column) => column.parse::<SortColumn>()?,
            None => Default::default(),
        };
        let sort_order = match non_empty(dto.sord.as_deref()) {
            Some(order) => order.parse::<SortOrder>()?,
            None => Default::default(),
        };

        Ok(UnitFilters {
            search: dto.search,
            domain: dto.domain.clone(),
            key: dto.key.clone(),
            sort_column,
            sort_order,
            content: dto
                .content
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(locale, value)| (locale.clone(), value.clone()))
                .collect(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Mapper for trans unit listing requests and responses
pub struct UnitListMapper;

impl UnitListMapper {
    /// Validate a listing request before any data is read
    pub fn to_query(request: &UnitListRequest) -> Result<UnitListQuery, QueryError> {
        if request.rows < 1 || request.page < 1 {
            return Err(QueryError::InvalidPagination {
                rows: request.rows,
                page: request.page,
            });
        }

        let filters = request
            .filters
            .as_ref()
            .map(UnitFilters::try_from)
            .transpose()?;

        Ok(UnitListQuery {
            locales: request.locales.clone(),
            rows: request.rows,
            page: request.page,
            filters,
        })
    }

    pub fn to_response(units: Vec<TransUnit>, total: usize) -> UnitListResponse {
        UnitListResponse {
            trans_units: TransUnitMapper::to_dto_list(units),
            total,
        }
    }
}
