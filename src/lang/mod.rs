pub mod ast;
pub mod build;
pub mod error;
pub mod eval;
pub mod format;
pub mod runtime;
pub mod tags;
