use crate::{FilterValue, Operator};

/// The query-builder collaborator that filters narrow.
///
/// Builders are consumed and returned so calls chain the way ORM builders do.
/// Filters never execute a query; they only add constraints through this trait.
pub trait QueryBuilder: Sized {
    /// Add an AND-joined comparison.
    fn where_cmp(self, column: &str, operator: Operator, value: FilterValue) -> Self;

    /// Add an OR-joined comparison.
    fn or_where_cmp(self, column: &str, operator: Operator, value: FilterValue) -> Self;

    /// Add an AND-joined nested group.
    ///
    /// `group` receives a fresh sub-query and returns it narrowed. A group that
    /// adds no constraints leaves the query unchanged.
    fn where_group<F>(self, group: F) -> Self
    where
        F: FnOnce(Self) -> Self;

    /// Add an OR-joined nested group.
    fn or_where_group<F>(self, group: F) -> Self
    where
        F: FnOnce(Self) -> Self;

    fn where_eq(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.where_cmp(column, Operator::Eq, value.into())
    }

    fn where_in(self, column: &str, values: impl Into<FilterValue>) -> Self {
        let list = FilterValue::List(values.into().into_list());
        self.where_cmp(column, Operator::In, list)
    }
}
