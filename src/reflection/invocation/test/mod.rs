//! Tests for the invocation suite

use crate::error::Result;
use crate::registry::verify_variants;

use super::code::{get_variants, Fixture};

const SUITE: &str = "invocation";

/// Verify every variant returns what a direct call returns, including
/// wrap-around at the top of the range
pub fn verify_all() -> Result<()> {
    let variants = get_variants();
    for (step, arg) in [(0, 0), (1, 41), (7, 35), (u64::MAX, 2)] {
        verify_variants(SUITE, &Fixture::new(step, arg), &variants)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::invocation::code::{Accumulator, MethodTable};

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should agree");
    }

    #[test]
    fn test_all_variants_agree() {
        let fixture = Fixture::new(7, 35);
        for variant in get_variants() {
            assert_eq!((variant.function)(&fixture), 42, "{}", variant.name);
        }
    }

    #[test]
    fn test_method_table() {
        let table = MethodTable::of_accumulator();
        let acc = Accumulator::new(2);
        assert_eq!(table.invoke("rewind", &acc, &[10]), Some(8));
        assert_eq!(table.invoke("advance", &acc, &[1, 2]), None);
        assert!(table.lookup("missing").is_none());
    }
}
