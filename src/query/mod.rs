pub mod executor;
pub mod parser;

pub use executor::{BoolSearch, SearchResult};
pub use parser::{BoolOperator, ParsedQuery, parse_query};
