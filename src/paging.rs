use serde::Deserialize;
use std::fmt;

use crate::error::ServiceError;

pub const DEFAULT_LIMIT: i64 = 6;
pub const DEFAULT_SKIP: i64 = 0;

/// Properties a listing may be ordered by
///
/// The chosen name is interpolated into Cypher, so only names listed here can
/// ever reach a query. The first entry is the default.
#[derive(Debug, Clone, Copy)]
pub struct SortFields {
    allowed: &'static [&'static str],
}

impl SortFields {
    pub const fn new(allowed: &'static [&'static str]) -> Self {
        Self { allowed }
    }

    pub fn default_field(&self) -> &'static str {
        self.allowed[0]
    }

    fn lookup(&self, field: &str) -> Option<&'static str> {
        self.allowed.iter().copied().find(|allowed| *allowed == field)
    }
}

/// Movie properties a favorites listing can be sorted by
pub const MOVIE_SORT_FIELDS: SortFields =
    SortFields::new(&["title", "released", "imdbRating", "year", "runtime"]);

/// `RATED` relationship properties a ratings listing can be sorted by
pub const RATING_SORT_FIELDS: SortFields = SortFields::new(&["timestamp", "rating"]);

/// Paging query parameters as received from the caller
/// All fields are optional; defaults are applied by [`Paging::new`]
#[derive(Debug, Default, Deserialize)]
pub struct PagingParams {
    /// Property to sort by
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Maximum number of rows (defaults to 6)
    pub limit: Option<i64>,
    /// Number of rows to skip (defaults to 0)
    pub skip: Option<i64>,
}

/// Sort order options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Validated sort, order, skip and limit for one listing query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    sort: &'static str,
    order: SortOrder,
    skip: i64,
    limit: i64,
}

impl Paging {
    /// Validate `params` against `fields`, filling in defaults
    pub fn new(params: PagingParams, fields: &SortFields) -> Result<Self, ServiceError> {
        let sort = match normalize(params.sort) {
            Some(field) => fields.lookup(&field).ok_or_else(|| {
                ServiceError::validation(format!(
                    "Invalid sort field '{}'. Must be one of: {}",
                    field,
                    fields.allowed.join(", ")
                ))
            })?,
            None => fields.default_field(),
        };

        let order = match normalize(params.order) {
            Some(order) => parse_order(&order)?,
            None => SortOrder::Asc,
        };

        let limit = non_negative(params.limit.unwrap_or(DEFAULT_LIMIT), "limit")?;
        let skip = non_negative(params.skip.unwrap_or(DEFAULT_SKIP), "skip")?;

        Ok(Self {
            sort,
            order,
            skip,
            limit,
        })
    }

    /// All defaults for `fields`
    #[cfg(test)]
    pub fn defaults(fields: &SortFields) -> Self {
        Self {
            sort: fields.default_field(),
            order: SortOrder::Asc,
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn sort(&self) -> &'static str {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// ORDER BY expression for the property on `variable`, e.g. ``m.`title` ASC``
    pub fn order_by(&self, variable: &str) -> String {
        format!("{}.`{}` {}", variable, self.sort, self.order)
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_order(order: &str) -> Result<SortOrder, ServiceError> {
    match order.to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(ServiceError::validation(format!(
            "Invalid sort order '{}'. Must be 'asc' or 'desc'",
            order
        ))),
    }
}

fn non_negative(value: i64, name: &str) -> Result<i64, ServiceError> {
    if value < 0 {
        return Err(ServiceError::validation(format!(
            "{} must not be negative",
            name
        )));
    }
    Ok(value)
}
