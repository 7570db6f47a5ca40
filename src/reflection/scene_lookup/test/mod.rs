//! Tests for the scene lookup suite

use crate::error::Result;
use crate::registry::verify_variants;

use super::code::{get_variants, Fixture, SCENE_SIZE};

const SUITE: &str = "scene_lookup";

/// Verify cached handles find the same component as a fresh lookup, for
/// targets at both ends of the scene
pub fn verify_all() -> Result<()> {
    let variants = get_variants();
    for target in [0, 1, SCENE_SIZE - 1] {
        verify_variants(SUITE, &Fixture::new(SCENE_SIZE, target), &variants)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::scene_lookup::code::{find_each_call, Health, Scene, Transform};

    #[test]
    fn test_all_variants() {
        verify_all().expect("All variants should agree");
    }

    #[test]
    fn test_scene_lookup() {
        let scene = Scene::populate(8);
        let object = scene.find("object-3").unwrap();
        assert_eq!(object.component::<Transform>().unwrap().position, [3, 0, -3]);
        assert_eq!(object.component::<Health>().unwrap().points, 103);
        assert!(scene.find("object-8").is_none());
    }

    #[test]
    fn test_variants_agree() {
        let fixture = Fixture::new(SCENE_SIZE, 200);
        for variant in get_variants() {
            assert_eq!((variant.function)(&fixture), 300, "{}", variant.name);
        }
    }

    #[test]
    fn test_target_clamped_to_scene() {
        let fixture = Fixture::new(4, 99);
        assert_eq!(find_each_call(&fixture), 103);
    }
}
