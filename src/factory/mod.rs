//! # Factory strategies
//!
//! Four ways of producing a default instance of a registered shape, and the
//! [`FactoryRegistry`] that memoizes the ones with a compilation step.
//!
//! | Strategy     | Per-call work                                | Cached |
//! |--------------|----------------------------------------------|--------|
//! | `direct`     | monomorphized function pointer               | no     |
//! | `reflective` | catalog lookup + field-list construction     | no     |
//! | `expression` | compiled closure ([`expr`])                  | yes    |
//! | `generated`  | native init routine ([`emit`])               | yes    |

pub mod emit;
pub mod expr;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BenchError, Result};
use crate::shape::{Instance, ShapeCatalog, ShapeDescriptor, ShapeId};

/// A technique for default-constructing a shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Built-in default construction, the baseline
    Direct,
    /// Descriptor lookup and field-wise construction on every call
    Reflective,
    /// Expression tree compiled once to a closure
    Expression,
    /// Native routine generated once per shape
    Generated,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Direct,
        Strategy::Reflective,
        Strategy::Expression,
        Strategy::Generated,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::Reflective => "reflective",
            Strategy::Expression => "expression",
            Strategy::Generated => "generated",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Direct => "Built-in default construction through a function pointer",
            Strategy::Reflective => "Catalog lookup and field-wise construction on every call",
            Strategy::Expression => "Construction expression compiled once to a closure",
            Strategy::Generated => "Native init routine generated once with Cranelift",
        }
    }

    /// Whether the registry memoizes factories for this strategy
    pub fn is_cached(&self) -> bool {
        matches!(self, Strategy::Expression | Strategy::Generated)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Strategy {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BenchError::UnknownStrategy(s.to_string()))
    }
}

type Construct = dyn Fn() -> Result<Instance> + Send + Sync;

/// A zero-argument callable producing new instances of one shape.
///
/// Cloning shares the underlying callable; [`ptr_eq`](Self::ptr_eq) tells
/// whether two handles are the same compiled factory.
#[derive(Clone)]
pub struct CompiledFactory {
    strategy: Strategy,
    shape: ShapeId,
    construct: Arc<Construct>,
}

impl CompiledFactory {
    fn new<F>(strategy: Strategy, shape: ShapeId, construct: F) -> Self
    where
        F: Fn() -> Result<Instance> + Send + Sync + 'static,
    {
        Self {
            strategy,
            shape,
            construct: Arc::new(construct),
        }
    }

    /// Produce a new instance
    #[inline]
    pub fn create(&self) -> Result<Instance> {
        (self.construct)()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    /// True if both handles share the same callable
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.construct, &other.construct)
    }
}

impl fmt::Debug for CompiledFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledFactory")
            .field("strategy", &self.strategy)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Memoized factories of one strategy family
#[derive(Default)]
struct StrategyCache {
    entries: HashMap<ShapeId, CompiledFactory>,
    insertions: usize,
}

/// Per-strategy factory registries over a shared, immutable catalog.
///
/// Populate-on-miss is not synchronized: the registry is owned by a single
/// harness and used from one thread.
pub struct FactoryRegistry {
    catalog: Arc<ShapeCatalog>,
    expression: StrategyCache,
    generated: StrategyCache,
}

impl FactoryRegistry {
    pub fn new(catalog: Arc<ShapeCatalog>) -> Self {
        Self {
            catalog,
            expression: StrategyCache::default(),
            generated: StrategyCache::default(),
        }
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    /// Shared handle to the catalog, for bodies that consult it per call
    pub fn catalog_handle(&self) -> Arc<ShapeCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Return the factory for `(strategy, shape)`, compiling it on first use
    /// for cached strategies.
    pub fn get_or_create(&mut self, strategy: Strategy, shape: ShapeId) -> Result<CompiledFactory> {
        let descriptor = self.catalog.descriptor(shape)?;

        let cache = match strategy {
            Strategy::Direct => return direct_factory(descriptor),
            Strategy::Reflective => return reflective_factory(&self.catalog, descriptor),
            Strategy::Expression => &mut self.expression,
            Strategy::Generated => &mut self.generated,
        };

        if let Some(factory) = cache.entries.get(&shape) {
            return Ok(factory.clone());
        }

        let factory = match strategy {
            Strategy::Expression => expression_factory(&self.catalog, descriptor)?,
            _ => generated_factory(descriptor)?,
        };
        debug!(
            strategy = strategy.tag(),
            shape = shape.name(),
            "Compiled factory"
        );

        cache.insertions += 1;
        cache.entries.insert(shape, factory.clone());
        Ok(factory)
    }

    /// Same as [`get_or_create`](Self::get_or_create) with a text strategy
    /// tag. An unknown tag fails before anything is looked up or compiled.
    pub fn get_or_create_named(&mut self, tag: &str, shape: ShapeId) -> Result<CompiledFactory> {
        let strategy: Strategy = tag.parse()?;
        self.get_or_create(strategy, shape)
    }

    /// Number of cache insertions for a strategy (always 0 for uncached ones)
    pub fn insertions(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Expression => self.expression.insertions,
            Strategy::Generated => self.generated.insertions,
            Strategy::Direct | Strategy::Reflective => 0,
        }
    }

    /// Number of cached factories for a strategy
    pub fn cached(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Expression => self.expression.entries.len(),
            Strategy::Generated => self.generated.entries.len(),
            Strategy::Direct | Strategy::Reflective => 0,
        }
    }
}

fn direct_factory(descriptor: &ShapeDescriptor) -> Result<CompiledFactory> {
    descriptor.default_path()?;
    let construct = descriptor.default_fn();
    Ok(CompiledFactory::new(Strategy::Direct, descriptor.id(), move || {
        Ok(construct())
    }))
}

/// Left uncached on purpose: every call pays the full lookup.
fn reflective_factory(
    catalog: &Arc<ShapeCatalog>,
    descriptor: &ShapeDescriptor,
) -> Result<CompiledFactory> {
    descriptor.default_path()?;
    let catalog = Arc::clone(catalog);
    let shape = descriptor.id();
    Ok(CompiledFactory::new(Strategy::Reflective, shape, move || {
        catalog.descriptor(shape)?.instantiate()
    }))
}

fn expression_factory(
    catalog: &ShapeCatalog,
    descriptor: &ShapeDescriptor,
) -> Result<CompiledFactory> {
    let compiled = expr::compile(&expr::Expr::default_of(descriptor)?, catalog)?;
    Ok(CompiledFactory::new(
        Strategy::Expression,
        descriptor.id(),
        move || Ok(compiled()),
    ))
}

fn generated_factory(descriptor: &ShapeDescriptor) -> Result<CompiledFactory> {
    let routine = emit::generate(descriptor)?;
    let assemble = descriptor.assembler();
    Ok(CompiledFactory::new(
        Strategy::Generated,
        descriptor.id(),
        // SAFETY: the routine was generated from this descriptor, so it
        // initializes every field of the shape (or calls its constructor).
        move || Ok(unsafe { assemble(routine.entry()) }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{PinnedHandle, SixInts, SixIntsObject};
    use std::alloc::{GlobalAlloc, Layout, System};
    use std::cell::Cell;

    thread_local! {
        static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
    }

    /// Counts heap allocations per thread so parallel tests do not interfere.
    struct CountingAlloc;

    unsafe impl GlobalAlloc for CountingAlloc {
        unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
            let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
            unsafe { System.alloc(layout) }
        }

        unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
            unsafe { System.dealloc(ptr, layout) }
        }
    }

    #[global_allocator]
    static GLOBAL: CountingAlloc = CountingAlloc;

    fn allocations_per_create(factory: &CompiledFactory, calls: usize) -> usize {
        let before = ALLOCATIONS.with(Cell::get);
        for _ in 0..calls {
            drop(factory.create().unwrap());
        }
        (ALLOCATIONS.with(Cell::get) - before) / calls
    }

    fn registry() -> FactoryRegistry {
        FactoryRegistry::new(Arc::new(ShapeCatalog::with_samples().unwrap()))
    }

    fn shapes() -> [ShapeId; 2] {
        [ShapeId::of::<SixInts>(), ShapeId::of::<SixIntsObject>()]
    }

    #[test]
    fn test_every_strategy_yields_zeroed_fields() {
        let mut registry = registry();
        for shape in shapes() {
            for strategy in Strategy::ALL {
                let factory = registry.get_or_create(strategy, shape).unwrap();
                let instance = factory.create().unwrap();
                let values = registry
                    .catalog()
                    .descriptor(shape)
                    .unwrap()
                    .field_values(&instance);
                assert_eq!(values, Some(vec![0; 6]), "{} / {}", strategy, shape);
            }
        }
    }

    #[test]
    fn test_direct_allocates_no_more_than_cached_strategies() {
        let mut registry = registry();
        for shape in shapes() {
            let direct = registry.get_or_create(Strategy::Direct, shape).unwrap();
            let direct_allocs = allocations_per_create(&direct, 1000);
            assert_eq!(direct_allocs, 1, "direct / {} should only allocate the instance", shape);

            for strategy in [Strategy::Expression, Strategy::Generated] {
                let factory = registry.get_or_create(strategy, shape).unwrap();
                let allocs = allocations_per_create(&factory, 1000);
                assert!(
                    direct_allocs <= allocs,
                    "direct / {} allocates {} per call, {} allocates {}",
                    shape,
                    direct_allocs,
                    strategy,
                    allocs
                );
            }
        }
    }

    #[test]
    fn test_cached_strategies_return_identical_factory() {
        let mut registry = registry();
        for strategy in [Strategy::Expression, Strategy::Generated] {
            let first = registry.get_or_create(strategy, ShapeId::of::<SixInts>()).unwrap();
            let second = registry.get_or_create(strategy, ShapeId::of::<SixInts>()).unwrap();
            let other = registry
                .get_or_create(strategy, ShapeId::of::<SixIntsObject>())
                .unwrap();

            assert!(first.ptr_eq(&second), "{} should memoize", strategy);
            assert!(!first.ptr_eq(&other), "{} keyed by shape", strategy);
        }
    }

    #[test]
    fn test_single_insertion_per_key() {
        let mut registry = registry();
        for _ in 0..25 {
            registry
                .get_or_create(Strategy::Expression, ShapeId::of::<SixIntsObject>())
                .unwrap();
            registry
                .get_or_create(Strategy::Generated, ShapeId::of::<SixIntsObject>())
                .unwrap();
        }
        assert_eq!(registry.insertions(Strategy::Expression), 1);
        assert_eq!(registry.insertions(Strategy::Generated), 1);
        assert_eq!(registry.cached(Strategy::Expression), 1);

        registry
            .get_or_create(Strategy::Expression, ShapeId::of::<SixInts>())
            .unwrap();
        assert_eq!(registry.insertions(Strategy::Expression), 2);
    }

    #[test]
    fn test_uncached_strategies_never_insert() {
        let mut registry = registry();
        for _ in 0..3 {
            registry
                .get_or_create(Strategy::Direct, ShapeId::of::<SixInts>())
                .unwrap();
            registry
                .get_or_create(Strategy::Reflective, ShapeId::of::<SixInts>())
                .unwrap();
        }
        assert_eq!(registry.insertions(Strategy::Direct), 0);
        assert_eq!(registry.insertions(Strategy::Reflective), 0);
    }

    #[test]
    fn test_construction_unavailable_for_every_strategy() {
        let mut registry = registry();
        for strategy in Strategy::ALL {
            let err = registry
                .get_or_create(strategy, ShapeId::of::<PinnedHandle>())
                .unwrap_err();
            assert!(
                matches!(err, BenchError::ConstructionUnavailable { shape: "PinnedHandle" }),
                "{}: {}",
                strategy,
                err
            );
        }
        assert_eq!(registry.insertions(Strategy::Expression), 0);
        assert_eq!(registry.insertions(Strategy::Generated), 0);
    }

    #[test]
    fn test_unknown_strategy_tag() {
        let mut registry = registry();
        let err = registry
            .get_or_create_named("emit-il", ShapeId::of::<SixInts>())
            .unwrap_err();
        assert!(matches!(err, BenchError::UnknownStrategy(tag) if tag == "emit-il"));

        let factory = registry
            .get_or_create_named("Expression", ShapeId::of::<SixInts>())
            .unwrap();
        assert_eq!(factory.strategy(), Strategy::Expression);
    }

    #[test]
    fn test_unknown_shape() {
        let mut registry = FactoryRegistry::new(Arc::new(ShapeCatalog::new()));
        assert!(matches!(
            registry.get_or_create(Strategy::Direct, ShapeId::of::<SixInts>()),
            Err(BenchError::UnknownShape(_))
        ));
    }

    #[test]
    fn test_expression_end_to_end() {
        let mut registry = registry();
        let factory = registry
            .get_or_create(Strategy::Expression, ShapeId::of::<SixInts>())
            .unwrap();

        let result = crate::utils::timer::run("expression/SixInts", 100_000, || {
            let instance = factory.create()?;
            let value = instance
                .downcast_ref::<SixInts>()
                .expect("expression factory builds SixInts");
            assert_eq!(*value, SixInts::default());
            Ok::<(), BenchError>(())
        })
        .unwrap();

        assert_eq!(result.iterations, 100_000);
        assert_eq!(result.label, "expression/SixInts");
        assert_eq!(registry.insertions(Strategy::Expression), 1);
    }

    #[test]
    fn test_strategy_tags_round_trip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.tag().parse::<Strategy>().unwrap(), strategy);
        }
    }
}
