pub mod grammar;
pub mod parser;
pub mod source;
pub mod span;
