//! Display formatting for the STCEx client.
//!
//! [`display`] holds the pure formatting utilities (fixed-point amounts,
//! short addresses, rank labels, countdown text); [`cli_output`] holds the
//! display-state records the client produces and the [`OutputFormat`] used
//! to print them.

pub mod cli_output;
pub mod display;

pub use cli_output::*;
