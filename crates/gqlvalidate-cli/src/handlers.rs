//! Command handlers for CLI subcommands
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod check;
mod completions;
mod generate;
mod rewrite;
mod utils;
mod validate;

pub use check::handle_check;
pub use completions::handle_completions;
pub use generate::handle_generate;
pub use rewrite::handle_rewrite;
pub use validate::handle_validate;
