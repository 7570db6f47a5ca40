//! Tests for the enum lookup suite

use crate::error::Result;
use crate::registry::verify_variants;

use super::code::{get_variants, Fixture, Layer};

const SUITE: &str = "enum_lookup";

/// Verify all lookups agree on the full table, on repeated names and on an
/// empty fixture
pub fn verify_all() -> Result<()> {
    let variants = get_variants();
    verify_variants(SUITE, &Fixture::all_layers(), &variants)?;
    verify_variants(
        SUITE,
        &Fixture::new(vec![Layer::Water, Layer::Ui, Layer::Water]),
        &variants,
    )?;
    verify_variants(SUITE, &Fixture::new(Vec::new()), &variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should agree");
    }

    #[test]
    fn test_names_round_trip() {
        for (name, layer) in Layer::TABLE {
            assert_eq!(layer.name(), name);
            assert_eq!(Layer::parse_scan(name), Some(layer));
        }
        assert_eq!(Layer::parse_scan("Nope"), None);
    }

    #[test]
    fn test_discriminants_keep_gaps() {
        assert_eq!(Layer::Water as u8, 4);
        assert_eq!(Layer::Projectile as u8, 11);
    }

    #[test]
    fn test_variants_agree_on_order() {
        let fixture = Fixture::new(vec![Layer::Player, Layer::Water]);
        // 9 * 31 + 4
        for variant in get_variants() {
            assert_eq!((variant.function)(&fixture), 283, "{}", variant.name);
        }
    }
}
