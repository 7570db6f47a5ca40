//! Tests for the type comparison suite

use crate::error::Result;
use crate::registry::verify_variants;

use super::code::{get_variants, Fixture};

const SUITE: &str = "type_compare";

pub fn verify_all() -> Result<()> {
    let variants = get_variants();
    for len in [0, 1, 5, 64] {
        verify_variants(SUITE, &Fixture::mixed(len), &variants)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::type_compare::code::{by_type_id, by_type_name, Erased, Typed};
    use crate::shape::SixInts;
    use std::any::type_name;

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should agree");
    }

    #[test]
    fn test_counts_strings() {
        let fixture = Fixture::mixed(9);
        assert_eq!(by_type_id(&fixture), 2);
        assert_eq!(by_type_name(&fixture), 2);
    }

    #[test]
    fn test_labels_are_full_paths() {
        assert_eq!(Erased(SixInts::default()).type_label(), type_name::<SixInts>());
        assert_ne!(Erased(1u32).type_key(), Erased(1u64).type_key());
    }
}
