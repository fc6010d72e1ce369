pub mod apply;
pub mod describe;
pub mod valid;
