//! Enum lookup variants

use std::collections::HashMap;

use crate::registry::ProbeFn;
use crate::utils::VariantInfo;

/// Render layers, with the gaps of a real layer table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Layer {
    Default = 0,
    TransparentFx = 1,
    IgnoreRaycast = 2,
    Water = 4,
    Ui = 5,
    Ground = 8,
    Player = 9,
    Enemy = 10,
    Projectile = 11,
}

impl Layer {
    /// Variant table in declaration order
    pub const TABLE: [(&'static str, Layer); 9] = [
        ("Default", Layer::Default),
        ("TransparentFX", Layer::TransparentFx),
        ("Ignore Raycast", Layer::IgnoreRaycast),
        ("Water", Layer::Water),
        ("UI", Layer::Ui),
        ("Ground", Layer::Ground),
        ("Player", Layer::Player),
        ("Enemy", Layer::Enemy),
        ("Projectile", Layer::Projectile),
    ];

    pub fn name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, layer)| *layer == self)
            .map_or("", |(name, _)| *name)
    }

    /// Scan the variant table for `name`
    pub fn parse_scan(name: &str) -> Option<Layer> {
        Self::TABLE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, layer)| *layer)
    }
}

pub struct Fixture {
    layers: Vec<Layer>,
    names: Vec<&'static str>,
    cache: HashMap<&'static str, u8>,
}

impl Fixture {
    pub fn new(layers: Vec<Layer>) -> Self {
        let names = layers.iter().map(|layer| layer.name()).collect();
        let cache = Layer::TABLE
            .iter()
            .map(|(name, layer)| (*name, *layer as u8))
            .collect();
        Self {
            layers,
            names,
            cache,
        }
    }

    pub fn all_layers() -> Self {
        Self::new(Layer::TABLE.iter().map(|(_, layer)| *layer).collect())
    }
}

fn mix(acc: u64, discriminant: u8) -> u64 {
    acc.wrapping_mul(31).wrapping_add(u64::from(discriminant))
}

pub fn scan(f: &Fixture) -> u64 {
    f.names.iter().fold(0, |acc, name| {
        mix(acc, Layer::parse_scan(name).map_or(0, |layer| layer as u8))
    })
}

pub fn cached_map(f: &Fixture) -> u64 {
    f.names
        .iter()
        .fold(0, |acc, name| mix(acc, f.cache.get(name).copied().unwrap_or(0)))
}

pub fn direct_cast(f: &Fixture) -> u64 {
    f.layers.iter().fold(0, |acc, layer| mix(acc, *layer as u8))
}

/// Returns all available variants
pub fn get_variants() -> Vec<VariantInfo<ProbeFn<Fixture>>> {
    vec![
        VariantInfo {
            name: "scan",
            description: "Linear scan of the variant table per lookup",
            function: scan,
        },
        VariantInfo {
            name: "cached-map",
            description: "Name to discriminant map built once",
            function: cached_map,
        },
        VariantInfo {
            name: "direct-cast",
            description: "Known variant cast to its discriminant",
            function: direct_cast,
        },
    ]
}
