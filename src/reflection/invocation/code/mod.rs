//! Invocation variants

use crate::registry::ProbeFn;
use crate::utils::VariantInfo;

/// Call target
pub struct Accumulator {
    step: u64,
}

impl Accumulator {
    pub fn new(step: u64) -> Self {
        Self { step }
    }

    #[inline(never)]
    pub fn advance(&self, value: u64) -> u64 {
        value.wrapping_add(self.step)
    }

    #[inline(never)]
    pub fn rewind(&self, value: u64) -> u64 {
        value.wrapping_sub(self.step)
    }
}

pub trait Advance: Send + Sync {
    fn advance(&self, value: u64) -> u64;
}

impl Advance for Accumulator {
    fn advance(&self, value: u64) -> u64 {
        Accumulator::advance(self, value)
    }
}

/// Erased method: receiver plus argument list, `None` on an arity mismatch
pub type Method = fn(&Accumulator, &[u64]) -> Option<u64>;

fn call_advance(target: &Accumulator, args: &[u64]) -> Option<u64> {
    match args {
        [value] => Some(target.advance(*value)),
        _ => None,
    }
}

fn call_rewind(target: &Accumulator, args: &[u64]) -> Option<u64> {
    match args {
        [value] => Some(target.rewind(*value)),
        _ => None,
    }
}

fn unresolved(_: &Accumulator, _: &[u64]) -> Option<u64> {
    None
}

/// Methods reachable by name
pub struct MethodTable {
    entries: Vec<(&'static str, Method)>,
}

impl MethodTable {
    pub fn of_accumulator() -> Self {
        Self {
            entries: vec![("rewind", call_rewind as Method), ("advance", call_advance)],
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Method> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, method)| *method)
    }

    /// Look the method up and call it
    pub fn invoke(&self, name: &str, target: &Accumulator, args: &[u64]) -> Option<u64> {
        self.lookup(name).and_then(|method| method(target, args))
    }
}

pub struct Fixture {
    target: Accumulator,
    dynamic: Box<dyn Advance>,
    pointer: fn(&Accumulator, u64) -> u64,
    methods: MethodTable,
    resolved: Method,
    arg: u64,
}

impl Fixture {
    pub fn new(step: u64, arg: u64) -> Self {
        let methods = MethodTable::of_accumulator();
        let resolved = methods.lookup("advance").unwrap_or(unresolved);
        Self {
            target: Accumulator::new(step),
            dynamic: Box::new(Accumulator::new(step)),
            pointer: Accumulator::advance,
            methods,
            resolved,
            arg,
        }
    }
}

pub fn direct(f: &Fixture) -> u64 {
    f.target.advance(f.arg)
}

pub fn fn_pointer(f: &Fixture) -> u64 {
    (f.pointer)(&f.target, f.arg)
}

pub fn trait_object(f: &Fixture) -> u64 {
    f.dynamic.advance(f.arg)
}

pub fn by_name(f: &Fixture) -> u64 {
    f.methods
        .invoke("advance", &f.target, &[f.arg])
        .unwrap_or_default()
}

pub fn by_name_resolved(f: &Fixture) -> u64 {
    (f.resolved)(&f.target, &[f.arg]).unwrap_or_default()
}

/// Returns all available variants
pub fn get_variants() -> Vec<VariantInfo<ProbeFn<Fixture>>> {
    vec![
        VariantInfo {
            name: "direct",
            description: "Inherent method call",
            function: direct,
        },
        VariantInfo {
            name: "fn-pointer",
            description: "Call through a stored function pointer",
            function: fn_pointer,
        },
        VariantInfo {
            name: "trait-object",
            description: "Dynamic dispatch through a vtable",
            function: trait_object,
        },
        VariantInfo {
            name: "by-name",
            description: "Method table lookup by name on every call",
            function: by_name,
        },
        VariantInfo {
            name: "by-name-resolved",
            description: "Method looked up once, erased call afterwards",
            function: by_name_resolved,
        },
    ]
}
