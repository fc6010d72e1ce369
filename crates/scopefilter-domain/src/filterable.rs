//! The filter scope models opt into.

use crate::registry::FilterRegistry;
use crate::request::FilterRequest;
use scopefilter_core::QueryBuilder;

/// A model whose queries can be narrowed by caller-supplied filter values.
///
/// Implementors override [`Filterable::filters`] to declare one handler per
/// filterable attribute:
///
/// ```
/// use scopefilter_domain::{handlers, FilterRegistry, FilterRequest, Filterable, Query};
///
/// struct User;
///
/// impl Filterable for User {
///     type Query = Query;
///
///     fn filters() -> FilterRegistry<Query> {
///         FilterRegistry::new().with("name", handlers::prefix::<Query>(None))
///     }
/// }
///
/// let request = FilterRequest::new().with("name", "Johnny").with("utm_source", "mail");
/// assert_eq!(User::filtered(&request).to_string(), "(name LIKE \"Johnny%\")");
/// ```
pub trait Filterable {
    type Query: QueryBuilder;

    /// The model's filter handlers. Filters nothing by default.
    fn filters() -> FilterRegistry<Self::Query> {
        FilterRegistry::new()
    }

    /// Narrow `query` by every declared filter present in `request`.
    fn filter(query: Self::Query, request: &FilterRequest) -> Self::Query {
        Self::filters().apply(query, request)
    }

    /// The part of `candidates` this model filters on.
    fn valid_filters(candidates: &FilterRequest) -> FilterRequest {
        Self::filters().valid_filters(candidates)
    }

    /// Start a fresh query and filter it.
    fn filtered(request: &FilterRequest) -> Self::Query
    where
        Self::Query: Default,
    {
        Self::filter(Self::Query::default(), request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers;
    use crate::query::{Query, Record};
    use scopefilter_core::{FilterValue, Operator};

    struct Plain;

    impl Filterable for Plain {
        type Query = Query;
    }

    struct User;

    impl Filterable for User {
        type Query = Query;

        fn filters() -> FilterRegistry<Query> {
            FilterRegistry::new()
                .with("name", |query: Query, value: &FilterValue, _: &str| {
                    let pattern = format!("{}%", value.as_str().unwrap_or_default());
                    query.where_cmp("name", Operator::Like, pattern.into())
                })
                .with("status", handlers::one_of::<Query>(None))
                .with("born_after", handlers::compare::<Query>(Some("birthday"), Operator::Gt))
        }
    }

    fn users() -> Vec<Record> {
        vec![
            Record::new()
                .with("name", "Johnny")
                .with("status", "active")
                .with("birthday", "1990-04-01"),
            Record::new()
                .with("name", "Joanna")
                .with("status", "banned")
                .with("birthday", "2001-09-12"),
            Record::new()
                .with("name", "Anna")
                .with("status", "active")
                .with("birthday", "1985-01-20"),
        ]
    }

    #[test]
    fn test_default_filters_are_a_no_op() {
        let query = Query::new().where_eq("tenant", 7);
        let request = FilterRequest::new().with("name", "Jo");

        assert_eq!(Plain::filter(query.clone(), &request), query);
        assert!(Plain::valid_filters(&request).is_empty());
        assert!(Plain::filtered(&request).is_empty());
    }

    #[test]
    fn test_filter_chains_onto_existing_query() {
        let base = Query::new().where_eq("tenant", 7);
        let request = FilterRequest::new().with("name", "Jo");

        let query = User::filter(base, &request);
        assert_eq!(query.to_string(), "tenant = 7 AND (name LIKE \"Jo%\")");
    }

    #[test]
    fn test_filtered_selects_matching_records() {
        let records = users();
        let request = FilterRequest::new()
            .with("name", "Jo")
            .with("status", "active")
            .with("page", 2);

        let query = User::filtered(&request);
        let selected = query.select(&records);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].get("name"), Some(FilterValue::from("Johnny")));
    }

    #[test]
    fn test_date_filter() {
        let records = users();
        let request = FilterRequest::new().with("born_after", "1989-12-31");

        let names: Vec<_> = User::filtered(&request)
            .select(&records)
            .iter()
            .filter_map(|r| r.get("name"))
            .collect();
        assert_eq!(names, vec![FilterValue::from("Johnny"), FilterValue::from("Joanna")]);
    }

    #[test]
    fn test_valid_filters_for_pagination() {
        let candidates =
            FilterRequest::from_query_string("name=Jo&page=3&sort=desc&status=active").unwrap();
        let valid = User::valid_filters(&candidates);

        assert_eq!(valid.to_query_string().unwrap(), "name=Jo&status=active");
    }

    #[test]
    fn test_filter_twice_gives_same_constraints() {
        let request = FilterRequest::new()
            .with("name", "Jo")
            .with("status", vec!["active", "invited"]);
        assert_eq!(User::filtered(&request), User::filtered(&request));
    }
}
