//! Template renderer adapters.

mod case;
mod simple;

pub use case::{BUILTIN_HELPERS, apply_builtin};
pub use simple::SimpleRenderer;
