//! Target languages the bindings can be generated for.

pub mod go;
