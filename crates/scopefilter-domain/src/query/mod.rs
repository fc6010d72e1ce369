//! In-memory query builder.
//!
//! [`Query`] records the constraints filters add and can evaluate them against
//! [`Record`]s. It stands in for an ORM builder in tests and in the CLI; it is not
//! a database.

pub mod pattern;
pub mod record;

pub use record::Record;

use pattern::like_matches;
use scopefilter_core::{FilterValue, Operator, QueryBuilder};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        column: String,
        operator: Operator,
        value: FilterValue,
    },
    Group(Vec<Clause>),
}

impl Condition {
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Compare {
                column,
                operator,
                value,
            } => compare_column(record, column, *operator, value),
            Condition::Group(clauses) => evaluate(clauses, record),
        }
    }
}

/// A condition and how it joins the clauses before it.
///
/// The connective of the first clause in a list is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub connective: Connective,
    pub condition: Condition,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    clauses: Vec<Clause>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Check a record against every constraint. An empty query matches all.
    pub fn matches(&self, record: &Record) -> bool {
        evaluate(&self.clauses, record)
    }

    /// Matching records, in input order.
    pub fn select<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn push(mut self, connective: Connective, condition: Condition) -> Self {
        self.clauses.push(Clause {
            connective,
            condition,
        });
        self
    }

    fn push_group<F>(self, connective: Connective, group: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let sub = group(Query::new());
        if sub.is_empty() {
            return self;
        }
        self.push(connective, Condition::Group(unwrap_single_group(sub.clauses)))
    }
}

/// A group holding nothing but another group is the inner group.
fn unwrap_single_group(mut clauses: Vec<Clause>) -> Vec<Clause> {
    if let [Clause {
        condition: Condition::Group(inner),
        ..
    }] = clauses.as_mut_slice()
    {
        return unwrap_single_group(std::mem::take(inner));
    }
    clauses
}

impl QueryBuilder for Query {
    fn where_cmp(self, column: &str, operator: Operator, value: FilterValue) -> Self {
        self.push(
            Connective::And,
            Condition::Compare {
                column: column.to_string(),
                operator,
                value,
            },
        )
    }

    fn or_where_cmp(self, column: &str, operator: Operator, value: FilterValue) -> Self {
        self.push(
            Connective::Or,
            Condition::Compare {
                column: column.to_string(),
                operator,
                value,
            },
        )
    }

    fn where_group<F>(self, group: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_group(Connective::And, group)
    }

    fn or_where_group<F>(self, group: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.push_group(Connective::Or, group)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_clauses(f, &self.clauses)
    }
}

fn write_clauses(f: &mut fmt::Formatter<'_>, clauses: &[Clause]) -> fmt::Result {
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", clause.connective.as_str())?;
        }
        match &clause.condition {
            Condition::Compare {
                column,
                operator,
                value,
            } => write!(f, "{} {} {}", column, operator, value)?,
            Condition::Group(inner) => {
                f.write_str("(")?;
                write_clauses(f, inner)?;
                f.write_str(")")?;
            }
        }
    }
    Ok(())
}

/// AND binds tighter than OR: the clause list is a disjunction of AND-chains.
fn evaluate(clauses: &[Clause], record: &Record) -> bool {
    if clauses.is_empty() {
        return true;
    }

    let mut chain_holds = true;
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 && clause.connective == Connective::Or {
            if chain_holds {
                return true;
            }
            chain_holds = true;
        }
        chain_holds = chain_holds && clause.condition.matches(record);
    }
    chain_holds
}

fn compare_column(record: &Record, column: &str, operator: Operator, value: &FilterValue) -> bool {
    let Some(field) = record.get(column) else {
        return operator.is_negated();
    };

    let (positive, negated) = match operator {
        Operator::Ne => (Operator::Eq, true),
        Operator::NotLike => (Operator::Like, true),
        Operator::NotIn => (Operator::In, true),
        other => (other, false),
    };

    // Array columns match when any element does
    let hit = match &field {
        FilterValue::List(items) => items.iter().any(|item| compare_scalar(item, positive, value)),
        scalar => compare_scalar(scalar, positive, value),
    };

    hit != negated
}

fn compare_scalar(field: &FilterValue, operator: Operator, value: &FilterValue) -> bool {
    use std::cmp::Ordering;

    match operator {
        Operator::Eq => field.loosely_equals(value),
        Operator::Lt => field.compare(value) == Some(Ordering::Less),
        Operator::Lte => matches!(field.compare(value), Some(Ordering::Less | Ordering::Equal)),
        Operator::Gt => field.compare(value) == Some(Ordering::Greater),
        Operator::Gte => matches!(
            field.compare(value),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Like => match (value.to_param_string(), field.to_param_string()) {
            (Some(pattern), Some(text)) => like_matches(&pattern, &text),
            _ => false,
        },
        Operator::In => match value {
            FilterValue::List(options) => options.iter().any(|o| field.loosely_equals(o)),
            scalar => field.loosely_equals(scalar),
        },
        Operator::Ne => !compare_scalar(field, Operator::Eq, value),
        Operator::NotLike => !compare_scalar(field, Operator::Like, value),
        Operator::NotIn => !compare_scalar(field, Operator::In, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(name: &str, age: i64) -> Record {
        Record::new().with("name", name).with("age", age)
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let query = Query::new();
        assert!(query.matches(&user("Jo", 30)));
        assert_eq!(query.to_string(), "");
    }

    #[test]
    fn test_and_chain() {
        let query = Query::new()
            .where_cmp("name", Operator::Like, "Jo%".into())
            .where_cmp("age", Operator::Gte, 18.into());

        assert!(query.matches(&user("Johnny", 30)));
        assert!(!query.matches(&user("Johnny", 12)));
        assert!(!query.matches(&user("Anna", 30)));
    }

    #[test]
    fn test_or_has_lower_precedence() {
        // name = Anna OR name = Jo AND age > 40
        let query = Query::new()
            .where_eq("name", "Anna")
            .or_where_cmp("name", Operator::Eq, "Jo".into())
            .where_cmp("age", Operator::Gt, 40.into());

        assert!(query.matches(&user("Anna", 10)));
        assert!(query.matches(&user("Jo", 50)));
        assert!(!query.matches(&user("Jo", 30)));
    }

    #[test]
    fn test_groups_isolate_or() {
        let query = Query::new()
            .where_cmp("age", Operator::Gt, 40.into())
            .where_group(|q| {
                q.where_eq("name", "Anna")
                    .or_where_cmp("name", Operator::Eq, "Jo".into())
            });

        assert!(query.matches(&user("Jo", 50)));
        assert!(!query.matches(&user("Anna", 10)));
        assert_eq!(
            query.to_string(),
            "age > 40 AND (name = \"Anna\" OR name = \"Jo\")"
        );
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let query = Query::new().where_group(|q| q);
        assert!(query.is_empty());

        let query = Query::new().where_eq("a", 1).or_where_group(|q| q);
        assert_eq!(query.to_string(), "a = 1");
    }

    #[test]
    fn test_or_group_binds_as_one_alternative() {
        let query = Query::new()
            .where_eq("a", 1)
            .or_where_group(|q| q.where_eq("b", 2).where_eq("c", 3));

        assert_eq!(query.to_string(), "a = 1 OR (b = 2 AND c = 3)");
        assert_eq!(query.clauses()[1].connective, Connective::Or);

        let record = |pairs: &[(&str, i64)]| {
            pairs
                .iter()
                .fold(Record::new(), |record, (column, value)| record.with(*column, *value))
        };
        assert!(query.matches(&record(&[("a", 1)])));
        assert!(query.matches(&record(&[("b", 2), ("c", 3)])));
        assert!(!query.matches(&record(&[("b", 2)])));
    }

    #[test]
    fn test_nested_single_group_is_flattened() {
        let query = Query::new().where_group(|q| {
            q.where_group(|inner| inner.where_eq("a", 1).or_where_cmp("b", Operator::Eq, 2.into()))
        });

        assert_eq!(query.to_string(), "(a = 1 OR b = 2)");
        assert_eq!(query.clauses().len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let record = Record::new().with("name", "Jo");

        assert!(!Query::new().where_eq("email", "x").matches(&record));
        assert!(Query::new()
            .where_cmp("email", Operator::Ne, "x".into())
            .matches(&record));
    }

    #[test]
    fn test_in_and_not_in() {
        let query = Query::new().where_in("status", vec!["active", "invited"]);
        let record = Record::new().with("status", "invited");
        assert!(query.matches(&record));

        let query = Query::new().where_cmp("status", Operator::NotIn, vec!["active"].into());
        assert!(query.matches(&record));
    }

    #[test]
    fn test_array_column_matches_any_element() {
        let record: Record = serde_json::from_value(json!({"tags": ["rust", "cli"]})).unwrap();

        assert!(Query::new().where_eq("tags", "cli").matches(&record));
        assert!(!Query::new()
            .where_cmp("tags", Operator::Ne, "cli".into())
            .matches(&record));
    }

    #[test]
    fn test_select_keeps_order() {
        let records = vec![user("Jo", 30), user("Anna", 25), user("Jonas", 41)];
        let query = Query::new().where_cmp("name", Operator::Like, "jo%".into());

        let names: Vec<_> = query
            .select(&records)
            .iter()
            .filter_map(|r| r.get("name"))
            .collect();
        assert_eq!(names, vec![FilterValue::from("Jo"), FilterValue::from("Jonas")]);
    }
}
