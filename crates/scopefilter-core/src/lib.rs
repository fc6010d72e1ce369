pub mod config;
pub mod error;
pub mod operator;
pub mod pagination;
pub mod result;
pub mod traits;
pub mod value;

pub use config::{FilterConfig, FilterDefinition};
pub use error::FilterError;
pub use operator::{MatchKind, Operator};
pub use pagination::{PageInfo, PageLinks, Paginator};
pub use result::FilterResult;
pub use traits::QueryBuilder;
pub use value::FilterValue;
