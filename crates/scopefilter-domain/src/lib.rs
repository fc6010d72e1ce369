pub mod filterable;
pub mod handler;
pub mod handlers;
pub mod query;
pub mod registry;
pub mod request;

pub use filterable::Filterable;
pub use handler::FilterHandler;
pub use query::{Clause, Condition, Connective, Query, Record};
pub use registry::FilterRegistry;
pub use request::FilterRequest;

pub use scopefilter_core::{FilterValue, MatchKind, Operator, QueryBuilder};
