pub mod api;
pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod ir;
pub mod runtime;
pub mod syntax;
pub mod typecheck;

// Short paths for the most used modules
pub use syntax::span;
pub use typecheck::types;

// Public API: `luka::compile()` etc.
pub use api::*;
