//! Filter queries and their URL codec

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{HttpError, Result};

/// Comparison applied by a [`FilterCondition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    In,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
            FilterOperator::Ne => "ne",
            FilterOperator::Gt => "gt",
            FilterOperator::Gte => "gte",
            FilterOperator::Lt => "lt",
            FilterOperator::Lte => "lte",
            FilterOperator::Like => "like",
            FilterOperator::In => "in",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "gt" => Ok(FilterOperator::Gt),
            "gte" => Ok(FilterOperator::Gte),
            "lt" => Ok(FilterOperator::Lt),
            "lte" => Ok(FilterOperator::Lte),
            "like" => Ok(FilterOperator::Like),
            "in" => Ok(FilterOperator::In),
            other => Err(HttpError::InvalidFilterQuery(format!(
                "unknown operator '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl Pagination {
    fn is_empty(&self) -> bool {
        self == &Pagination::default()
    }
}

/// Structured description of filtering and paging for a list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        self.filters.push(FilterCondition {
            field: field.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.pagination.as_ref().map_or(true, Pagination::is_empty)
    }
}

/// Turns filter queries into URL suffixes and back
pub trait FilterQueryCodec: Send + Sync {
    /// Serialize into a suffix that can be appended to a URL verbatim
    /// (including its leading `?`), or `""` when there is nothing to send.
    fn serialize(&self, query: &FilterQuery) -> String;

    /// Parse the search portion of a URL, with or without its leading `?`
    fn deserialize(&self, search: &str) -> Result<FilterQuery>;
}

/// Codec using `filter[<field>][<op>]=<value>` pairs plus flat paging keys
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketFilterCodec;

const PAGE: &str = "page";
const LIMIT: &str = "limit";
const OFFSET: &str = "offset";
const SORT_BY: &str = "sortBy";
const SORT_DIRECTION: &str = "sortDirection";

impl FilterQueryCodec for BracketFilterCodec {
    fn serialize(&self, query: &FilterQuery) -> String {
        if query.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for condition in &query.filters {
            serializer.append_pair(
                &format!("filter[{}][{}]", condition.field, condition.operator),
                &condition.value,
            );
        }

        if let Some(pagination) = &query.pagination {
            if let Some(page) = pagination.page {
                serializer.append_pair(PAGE, &page.to_string());
            }
            if let Some(limit) = pagination.limit {
                serializer.append_pair(LIMIT, &limit.to_string());
            }
            if let Some(offset) = pagination.offset {
                serializer.append_pair(OFFSET, &offset.to_string());
            }
            if let Some(sort_by) = &pagination.sort_by {
                serializer.append_pair(SORT_BY, sort_by);
            }
            if let Some(direction) = pagination.sort_direction {
                serializer.append_pair(
                    SORT_DIRECTION,
                    match direction {
                        SortDirection::Asc => "asc",
                        SortDirection::Desc => "desc",
                    },
                );
            }
        }

        format!("?{}", serializer.finish())
    }

    fn deserialize(&self, search: &str) -> Result<FilterQuery> {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut query = FilterQuery::new();
        let mut pagination = Pagination::default();

        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            if let Some((field, operator)) = parse_filter_key(&key) {
                query.filters.push(FilterCondition {
                    field: field.to_string(),
                    operator: operator.parse()?,
                    value: value.into_owned(),
                });
                continue;
            }

            match key.as_ref() {
                PAGE => pagination.page = Some(parse_number(PAGE, &value)?),
                LIMIT => pagination.limit = Some(parse_number(LIMIT, &value)?),
                OFFSET => pagination.offset = Some(parse_number(OFFSET, &value)?),
                SORT_BY => pagination.sort_by = Some(value.into_owned()),
                SORT_DIRECTION => {
                    pagination.sort_direction = Some(match value.as_ref() {
                        "asc" => SortDirection::Asc,
                        "desc" => SortDirection::Desc,
                        other => {
                            return Err(HttpError::InvalidFilterQuery(format!(
                                "unknown sort direction '{other}'"
                            )))
                        }
                    })
                }
                _ => {}
            }
        }

        if !pagination.is_empty() {
            query.pagination = Some(pagination);
        }
        Ok(query)
    }
}

/// Split `filter[<field>][<op>]` into its field and operator
fn parse_filter_key(key: &str) -> Option<(&str, &str)> {
    let inner = key.strip_prefix("filter[")?.strip_suffix(']')?;
    let (field, operator) = inner.rsplit_once("][")?;
    Some((field, operator))
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| HttpError::InvalidFilterQuery(format!("{key} must be a number, got '{value}'")))
}
