//! Per-model filter registries.
//!
//! A [`FilterRegistry`] is the table a model declares once: attribute name to
//! handler, in declaration order. Applying it to a request runs the handlers whose
//! attributes the request supplies and ignores everything else.

use crate::handler::FilterHandler;
use crate::handlers;
use crate::request::FilterRequest;
use scopefilter_core::{FilterDefinition, FilterValue, QueryBuilder};
use std::fmt;

struct FilterEntry<Q> {
    attribute: String,
    handler: Box<dyn FilterHandler<Q>>,
}

pub struct FilterRegistry<Q> {
    entries: Vec<FilterEntry<Q>>,
}

impl<Q> FilterRegistry<Q> {
    /// Create an empty registry (filters nothing).
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a closure handler (builder pattern).
    pub fn with<F>(self, attribute: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Q, &FilterValue, &str) -> Q + 'static,
    {
        self.with_handler(attribute, handler)
    }

    /// Register any [`FilterHandler`] (builder pattern).
    pub fn with_handler<H>(mut self, attribute: impl Into<String>, handler: H) -> Self
    where
        H: FilterHandler<Q> + 'static,
    {
        self.register(attribute, Box::new(handler));
        self
    }

    /// Register a handler. An attribute registered twice keeps its first position
    /// and takes the new handler.
    pub fn register(&mut self, attribute: impl Into<String>, handler: Box<dyn FilterHandler<Q>>) {
        let attribute = attribute.into();
        match self.entries.iter_mut().find(|e| e.attribute == attribute) {
            Some(entry) => entry.handler = handler,
            None => self.entries.push(FilterEntry { attribute, handler }),
        }
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.iter().any(|e| e.attribute == attribute)
    }

    /// Registered attribute names in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.attribute.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The subset of `candidates` this registry would act on.
    ///
    /// Unknown keys and null values are left out. Useful for carrying filters into
    /// pagination links without echoing arbitrary query-string keys.
    pub fn valid_filters(&self, candidates: &FilterRequest) -> FilterRequest {
        self.entries
            .iter()
            .filter_map(|e| {
                candidates
                    .value_of(&e.attribute)
                    .map(|value| (e.attribute.clone(), value.clone()))
            })
            .collect()
    }
}

impl<Q: QueryBuilder> FilterRegistry<Q> {
    /// Narrow `query` by every registered filter the request supplies.
    ///
    /// Handlers run in declaration order, each inside its own nested group so an
    /// OR in one handler cannot leak into another.
    pub fn apply(&self, query: Q, request: &FilterRequest) -> Q {
        let mut query = query;
        for entry in &self.entries {
            let Some(value) = request.value_of(&entry.attribute) else {
                continue;
            };
            tracing::debug!("Applying filter {} = {}", entry.attribute, value);
            let attribute = entry.attribute.as_str();
            let handler = entry.handler.as_ref();
            query = query.where_group(|sub| handler.apply(sub, value, attribute));
        }

        for key in request.keys().filter(|key| !self.contains(key)) {
            tracing::trace!("Ignoring unregistered filter: {}", key);
        }

        query
    }
}

impl<Q: QueryBuilder + 'static> FilterRegistry<Q> {
    /// Build a registry from declarative definitions, in the given order.
    pub fn from_definitions<'a>(
        definitions: impl IntoIterator<Item = &'a FilterDefinition>,
    ) -> Self {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(
                definition.attribute.clone(),
                handlers::for_definition(definition),
            );
        }
        registry
    }
}

impl<Q> Default for FilterRegistry<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> fmt::Debug for FilterRegistry<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("attributes", &self.attributes().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Query, Record};
    use mockall::mock;
    use scopefilter_core::{MatchKind, Operator};
    use std::cell::RefCell;
    use std::rc::Rc;

    mock! {
        Handler {}
        impl FilterHandler<Query> for Handler {
            fn apply(&self, query: Query, value: &FilterValue, attribute: &str) -> Query;
        }
    }

    fn name_registry() -> FilterRegistry<Query> {
        FilterRegistry::new().with("name", |query: Query, value: &FilterValue, _: &str| {
            query.where_cmp("name", Operator::Eq, value.clone())
        })
    }

    #[test]
    fn test_empty_registry_leaves_query_untouched() {
        let registry: FilterRegistry<Query> = FilterRegistry::new();
        let query = Query::new().where_eq("active", true);
        let request = FilterRequest::new().with("name", "Jo").with("age", 3);

        assert!(registry.is_empty());
        let filtered = registry.apply(query.clone(), &request);
        assert_eq!(filtered, query);
        assert!(registry.valid_filters(&request).is_empty());
    }

    #[test]
    fn test_handler_invoked_once_with_value_and_attribute() {
        let mut handler = MockHandler::new();
        handler
            .expect_apply()
            .withf(|_, value, attribute| value == &FilterValue::from("Jo") && attribute == "name")
            .times(1)
            .returning(|query, _, _| query);

        let registry = FilterRegistry::new().with_handler("name", handler);
        let request = FilterRequest::new().with("name", "Jo").with("extra", 1);

        registry.apply(Query::new(), &request);
    }

    #[test]
    fn test_unknown_and_null_keys_are_skipped() {
        let mut handler = MockHandler::new();
        handler.expect_apply().never();

        let registry = FilterRegistry::new().with_handler("name", handler);
        let request = FilterRequest::new()
            .with("name", FilterValue::Null)
            .with("extra", 1);

        let query = registry.apply(Query::new(), &request);
        assert!(query.is_empty());
    }

    #[test]
    fn test_handlers_run_in_declaration_order() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (first, second) = (Rc::clone(&calls), Rc::clone(&calls));

        let registry = FilterRegistry::new()
            .with("zeta", move |q: Query, _: &FilterValue, attribute: &str| {
                first.borrow_mut().push(attribute.to_string());
                q.where_eq(attribute, 1)
            })
            .with("alpha", move |q: Query, _: &FilterValue, attribute: &str| {
                second.borrow_mut().push(attribute.to_string());
                q.where_eq(attribute, 2)
            });

        let request = FilterRequest::new().with("alpha", 1).with("zeta", 1);
        let query = registry.apply(Query::new(), &request);

        assert_eq!(*calls.borrow(), vec!["zeta", "alpha"]);
        assert_eq!(query.to_string(), "(zeta = 1) AND (alpha = 2)");
    }

    #[test]
    fn test_each_handler_is_grouped() {
        let registry = FilterRegistry::new()
            .with("name", |q: Query, value: &FilterValue, _: &str| {
                q.where_cmp("first_name", Operator::Eq, value.clone())
                    .or_where_cmp("last_name", Operator::Eq, value.clone())
            })
            .with("min_age", |q: Query, value: &FilterValue, _: &str| {
                q.where_cmp("age", Operator::Gte, value.clone())
            });

        let request = FilterRequest::new().with("name", "Jo").with("min_age", 18);
        let query = registry.apply(Query::new(), &request);

        let young_jo = Record::new().with("first_name", "Jo").with("age", 12);
        assert!(!query.matches(&young_jo));
        assert_eq!(
            query.to_string(),
            "(first_name = \"Jo\" OR last_name = \"Jo\") AND (age >= 18)"
        );
    }

    #[test]
    fn test_list_valued_like_renders_one_group() {
        let registry = FilterRegistry::new().with("name", handlers::prefix::<Query>(None));
        let request = FilterRequest::new().with("name", vec!["Jo", "An"]);

        let query = registry.apply(Query::new().where_eq("active", true), &request);
        assert_eq!(
            query.to_string(),
            "active = true AND (name LIKE \"Jo%\" OR name LIKE \"An%\")"
        );
        assert!(query.matches(&Record::new().with("active", true).with("name", "Anna")));
        assert!(!query.matches(&Record::new().with("active", true).with("name", "Bob")));
    }

    #[test]
    fn test_apply_is_repeatable() {
        let registry = name_registry();
        let request = FilterRequest::new().with("name", "Jo");

        let first = registry.apply(Query::new(), &request);
        let second = registry.apply(Query::new(), &request);
        assert_eq!(first, second);
    }

    #[test]
    fn test_valid_filters_is_intersection() {
        let registry = name_registry().with("age", |q: Query, _: &FilterValue, _: &str| q);
        let candidates = FilterRequest::new()
            .with("name", "Jo")
            .with("extra", 1)
            .with("age", FilterValue::Null)
            .with("page", 2);

        let valid = registry.valid_filters(&candidates);
        assert_eq!(valid, FilterRequest::new().with("name", "Jo"));
        assert!(registry.valid_filters(&FilterRequest::new()).is_empty());
    }

    #[test]
    fn test_register_replaces_in_place() {
        let registry = FilterRegistry::new()
            .with("a", |q: Query, _: &FilterValue, _: &str| q.where_eq("a", 1))
            .with("b", |q: Query, _: &FilterValue, _: &str| q.where_eq("b", 1))
            .with("a", |q: Query, _: &FilterValue, _: &str| q.where_eq("a", 2));

        assert_eq!(registry.attributes().collect::<Vec<_>>(), vec!["a", "b"]);

        let request = FilterRequest::new().with("a", "x");
        assert_eq!(registry.apply(Query::new(), &request).to_string(), "(a = 2)");
    }

    #[test]
    fn test_from_definitions() {
        let definitions = vec![
            FilterDefinition::new("name", MatchKind::Prefix),
            FilterDefinition::new("min_age", MatchKind::Gte).with_column("age"),
        ];
        let registry: FilterRegistry<Query> = FilterRegistry::from_definitions(&definitions);

        let request = FilterRequest::new().with("name", "Jo").with("min_age", 18);
        let query = registry.apply(Query::new(), &request);
        assert_eq!(query.to_string(), "(name LIKE \"Jo%\") AND (age >= 18)");
    }

    #[test]
    fn test_debug_lists_attributes() {
        assert_eq!(
            format!("{:?}", name_registry()),
            "FilterRegistry { attributes: [\"name\"] }"
        );
    }
}
