//! Tests for the null check suite

use crate::error::Result;
use crate::registry::verify_variants;

use super::code::{get_variants, Fixture, SLOTS};

const SUITE: &str = "null_check";

/// Verify weak-handle liveness matches Option emptiness for several gap
/// patterns
pub fn verify_all() -> Result<()> {
    let variants = get_variants();
    for every in [1, 2, 3, 7] {
        verify_variants(SUITE, &Fixture::new(SLOTS, every), &variants)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::null_check::code::{option_is_some, weak_strong_count, weak_upgrade};

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should agree");
    }

    #[test]
    fn test_destroyed_handles_read_as_null() {
        let fixture = Fixture::new(SLOTS, 2);
        assert_eq!(option_is_some(&fixture), 32);
        assert_eq!(weak_upgrade(&fixture), 32);
        assert_eq!(weak_strong_count(&fixture), 32);
    }

    #[test]
    fn test_every_slot_empty() {
        let fixture = Fixture::new(10, 1);
        for variant in get_variants() {
            assert_eq!((variant.function)(&fixture), 0, "{}", variant.name);
        }
    }
}
