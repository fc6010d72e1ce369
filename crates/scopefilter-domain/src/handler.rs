use scopefilter_core::FilterValue;

/// Narrows a query for one attribute.
///
/// Any `Fn(query, value, attribute) -> query` closure is a handler.
pub trait FilterHandler<Q> {
    fn apply(&self, query: Q, value: &FilterValue, attribute: &str) -> Q;
}

impl<Q, F> FilterHandler<Q> for F
where
    F: Fn(Q, &FilterValue, &str) -> Q,
{
    fn apply(&self, query: Q, value: &FilterValue, attribute: &str) -> Q {
        self(query, value, attribute)
    }
}
