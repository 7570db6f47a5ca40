//! Scene lookup variants

use std::any::Any;

use crate::registry::ProbeFn;
use crate::utils::VariantInfo;

/// Objects in the probe scene
pub const SCENE_SIZE: usize = 256;

/// Behaviour attached to a scene object
pub trait Component: Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

pub struct Transform {
    pub position: [i32; 3],
}

impl Component for Transform {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct Health {
    pub points: u64,
}

impl Component for Health {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct SceneObject {
    pub name: String,
    components: Vec<Box<dyn Component>>,
}

impl SceneObject {
    /// First component of type `C`
    pub fn component<C: Component + 'static>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<C>())
    }

    fn component_slot<C: Component + 'static>(&self) -> Option<usize> {
        self.components
            .iter()
            .position(|c| c.as_any().is::<C>())
    }
}

pub struct Scene {
    objects: Vec<SceneObject>,
}

impl Scene {
    /// `size` objects named `object-<i>`, each with a transform and health
    pub fn populate(size: usize) -> Self {
        let objects = (0..size)
            .map(|i| {
                let components: Vec<Box<dyn Component>> = vec![
                    Box::new(Transform {
                        position: [i as i32, 0, -(i as i32)],
                    }),
                    Box::new(Health {
                        points: 100 + i as u64,
                    }),
                ];
                SceneObject {
                    name: format!("object-{}", i),
                    components,
                }
            })
            .collect();
        Self { objects }
    }

    pub fn find(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }
}

pub struct Fixture {
    scene: Scene,
    target: String,
    object_handle: Option<usize>,
    component_handle: Option<(usize, usize)>,
}

impl Fixture {
    pub fn new(size: usize, target: usize) -> Self {
        let scene = Scene::populate(size.max(1));
        let target = format!("object-{}", target.min(size.saturating_sub(1)));
        let object_handle = scene.position(&target);
        let component_handle = object_handle.and_then(|i| {
            scene.objects[i]
                .component_slot::<Health>()
                .map(|slot| (i, slot))
        });
        Self {
            scene,
            target,
            object_handle,
            component_handle,
        }
    }
}

fn points(object: Option<&SceneObject>) -> u64 {
    object
        .and_then(|o| o.component::<Health>())
        .map_or(0, |h| h.points)
}

pub fn find_each_call(f: &Fixture) -> u64 {
    points(f.scene.find(&f.target))
}

pub fn cached_object(f: &Fixture) -> u64 {
    points(f.object_handle.and_then(|i| f.scene.objects.get(i)))
}

pub fn cached_component(f: &Fixture) -> u64 {
    f.component_handle
        .and_then(|(object, slot)| f.scene.objects.get(object)?.components.get(slot))
        .and_then(|c| c.as_any().downcast_ref::<Health>())
        .map_or(0, |h| h.points)
}

/// Returns all available variants
pub fn get_variants() -> Vec<VariantInfo<ProbeFn<Fixture>>> {
    vec![
        VariantInfo {
            name: "find-each-call",
            description: "Find object by name, then component by type",
            function: find_each_call,
        },
        VariantInfo {
            name: "cached-object",
            description: "Object handle kept, component found by type",
            function: cached_object,
        },
        VariantInfo {
            name: "cached-component",
            description: "Component slot kept",
            function: cached_component,
        },
    ]
}
