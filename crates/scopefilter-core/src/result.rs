use crate::error::FilterError;

pub type FilterResult<T> = Result<T, FilterError>;
