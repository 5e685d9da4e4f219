//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Makeover plan instruction template (Handlebars)
pub const MAKEOVER: &str = include_str!("../../prompts/makeover.pmt");

/// System prompt sent alongside the instruction
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "makeover" => {
            debug!("get_embedded: matched makeover");
            Some(MAKEOVER)
        }
        "system" => {
            debug!("get_embedded: matched system");
            Some(SYSTEM)
        }
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
