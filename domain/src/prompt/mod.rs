//! Prompt domain
//!
//! Directive templates rendered by action strategies.

mod template;

pub use template::PromptTemplate;
