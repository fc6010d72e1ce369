//! Stock filter handlers.
//!
//! Each constructor returns a handler for the common cases a model would otherwise
//! write by hand. `column` names the constrained column; `None` uses the attribute.
//! List values are matched element-wise where that makes sense. An empty list
//! adds no constraint, so an empty selection filters nothing.

use crate::handler::FilterHandler;
use scopefilter_core::{FilterDefinition, FilterValue, MatchKind, Operator, QueryBuilder};

/// `column <operator> value`.
pub fn compare<Q: QueryBuilder>(
    column: Option<&str>,
    operator: Operator,
) -> impl Fn(Q, &FilterValue, &str) -> Q {
    let column = column.map(str::to_string);
    move |query: Q, value: &FilterValue, attribute: &str| {
        if is_empty_list(value) {
            return query;
        }
        query.where_cmp(
            column.as_deref().unwrap_or(attribute),
            operator,
            value.clone(),
        )
    }
}

/// `column = value`, or `column IN (...)` for lists.
pub fn exact<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    let column = column.map(str::to_string);
    move |query: Q, value: &FilterValue, attribute: &str| {
        let column = column.as_deref().unwrap_or(attribute);
        match value {
            FilterValue::List(items) if items.is_empty() => query,
            FilterValue::List(_) => query.where_cmp(column, Operator::In, value.clone()),
            scalar => query.where_cmp(column, Operator::Eq, scalar.clone()),
        }
    }
}

/// `column != value`, or `column NOT IN (...)` for lists.
pub fn not_equal<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    let column = column.map(str::to_string);
    move |query: Q, value: &FilterValue, attribute: &str| {
        let column = column.as_deref().unwrap_or(attribute);
        match value {
            FilterValue::List(items) if items.is_empty() => query,
            FilterValue::List(_) => query.where_cmp(column, Operator::NotIn, value.clone()),
            scalar => query.where_cmp(column, Operator::Ne, scalar.clone()),
        }
    }
}

/// `column IN (...)`. A scalar is treated as a one-element list.
pub fn one_of<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    let column = column.map(str::to_string);
    move |query: Q, value: &FilterValue, attribute: &str| {
        if is_empty_list(value) {
            return query;
        }
        query.where_in(column.as_deref().unwrap_or(attribute), value.clone())
    }
}

/// `column LIKE 'value%'`.
pub fn prefix<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    like::<Q, _>(column, |s| format!("{}%", s))
}

/// `column LIKE '%value'`.
pub fn suffix<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    like::<Q, _>(column, |s| format!("%{}", s))
}

/// `column LIKE '%value%'`.
pub fn contains<Q: QueryBuilder>(column: Option<&str>) -> impl Fn(Q, &FilterValue, &str) -> Q {
    like::<Q, _>(column, |s| format!("%{}%", s))
}

/// A `LIKE` on the pattern built from the value; list values OR their patterns.
fn like<Q, P>(column: Option<&str>, pattern: P) -> impl Fn(Q, &FilterValue, &str) -> Q
where
    Q: QueryBuilder,
    P: Fn(&str) -> String,
{
    let column = column.map(str::to_string);
    move |query: Q, value: &FilterValue, attribute: &str| {
        let column = column.as_deref().unwrap_or(attribute);
        match value {
            FilterValue::List(items) => query.where_group(|group| {
                items
                    .iter()
                    .filter_map(FilterValue::to_param_string)
                    .fold(group, |group, item| {
                        group.or_where_cmp(column, Operator::Like, pattern(&item).into())
                    })
            }),
            scalar => match scalar.to_param_string() {
                Some(s) => query.where_cmp(column, Operator::Like, pattern(&s).into()),
                None => query,
            },
        }
    }
}

fn is_empty_list(value: &FilterValue) -> bool {
    matches!(value, FilterValue::List(items) if items.is_empty())
}

/// The stock handler a declarative definition names.
pub fn for_definition<Q>(definition: &FilterDefinition) -> Box<dyn FilterHandler<Q>>
where
    Q: QueryBuilder + 'static,
{
    let column = definition.column.as_deref();
    match definition.kind {
        MatchKind::Exact => Box::new(exact::<Q>(column)),
        MatchKind::Prefix => Box::new(prefix::<Q>(column)),
        MatchKind::Suffix => Box::new(suffix::<Q>(column)),
        MatchKind::Contains => Box::new(contains::<Q>(column)),
        MatchKind::OneOf => Box::new(one_of::<Q>(column)),
        MatchKind::Gt => Box::new(compare::<Q>(column, Operator::Gt)),
        MatchKind::Gte => Box::new(compare::<Q>(column, Operator::Gte)),
        MatchKind::Lt => Box::new(compare::<Q>(column, Operator::Lt)),
        MatchKind::Lte => Box::new(compare::<Q>(column, Operator::Lte)),
        MatchKind::Not => Box::new(not_equal::<Q>(column)),
    }
}
