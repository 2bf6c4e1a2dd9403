//! Services: request-independent logic behind the HTTP routes.

pub mod demo;
pub mod fallback;
pub mod generation;
pub mod normalize;
pub mod prompt;
