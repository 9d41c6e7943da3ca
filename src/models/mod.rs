//! Gerrit API model types.

mod account;
mod change;
mod project;

pub use account::*;
pub use change::*;
pub use project::*;
