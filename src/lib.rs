pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
mod macros;
pub mod template;

#[cfg(test)]
mod tests;
