//! US census state and county ANSI codes
//!
//! Immutable, in-memory lookup tables for states (and state-equivalents) and
//! counties (and county-equivalents), keyed by ANSI code, abbreviation, and name.
//! The bundled census lists are loaded once, on first use, and shared read-only
//! for the rest of the process.
//!
//! ```
//! use ansi_codes::{County, State};
//!
//! let florida = State::find("12")?;
//! assert_eq!(florida.abbreviation(), "FL");
//!
//! let norfolk = County::find("Virginia", "Norfolk city")?;
//! assert_eq!(norfolk.short_name(), "Norfolk");
//! assert!(std::ptr::eq(norfolk.state(), State::find("VA")?));
//! # Ok::<(), ansi_codes::Error>(())
//! ```

pub mod api;
pub mod county;
pub mod document;
pub mod error;
pub mod query;
pub mod source;
pub mod state;

pub use county::{County, CountyRegistry};
pub use error::{Error, LoadError, Result};
pub use query::{CountyKey, StateKey, StateRef};
pub use state::{State, StateRegistry};

/// Load both registries now instead of on first lookup.
///
/// Idempotent; a failed load is reported here and by every later lookup.
pub fn init() -> Result<()> {
    state::registry()?;
    county::registry()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init().unwrap();
        init().unwrap();
        assert_eq!(state::registry().unwrap().len(), 57);
        assert_eq!(county::registry().unwrap().len(), 3235);
    }
}
