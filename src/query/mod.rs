//! The DESCRIBE query model and engine (components E-F).

pub mod describe;
pub mod engine;
pub mod source;
pub mod table;

pub use describe::{DescribeQuery, DescribeTerm};
pub use engine::{DescribeEngine, DescribeQueryResult};
pub use source::PatternSource;
pub use table::{DataTable, Row};
