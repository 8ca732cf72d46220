//! Projection of raw attribute codes onto named attributes.
//!
//! Items carry attributes as `code -> value`. Everything downstream works with
//! the canonical attribute names instead, so the projector re-keys the map and
//! pairs each value with its metadata. Values are left raw; unit and formula
//! conversions are applied by whoever displays them.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::{AttributeMeta, AttributeTable, Item};

/// Canonical attribute names the classifier and calculators depend on.
pub mod names {
    pub const MODULE_SIZE: &str = "moduleSize";
    pub const SLOTS: &str = "slots";
    pub const DAMAGE_MULTIPLIER: &str = "damageMultiplier";
    pub const SHIP_SIZE: &str = "shipSize";

    pub const EM_DAMAGE: &str = "emDamage";
    pub const KINETIC_DAMAGE: &str = "kineticDamage";
    pub const EXPLOSIVE_DAMAGE: &str = "explosiveDamage";
    pub const THERMAL_DAMAGE: &str = "thermalDamage";
    pub const DURATION: &str = "duration";

    pub const SHIELD_CAPACITY: &str = "shieldCapacity";
    pub const ARMOR_HP: &str = "armorHP";
    pub const STRUCTURE_HP: &str = "hp";

    pub const MAX_RANGE: &str = "maxRange";
    pub const FALLOFF: &str = "falloff";
    pub const TRACKING_SPEED: &str = "trackingSpeed";
    pub const MAX_VELOCITY: &str = "maxVelocity";
    pub const EXPLOSION_SPEED: &str = "explosionSpeed";
    pub const EXPLOSION_RANGE: &str = "explosionRange";
    pub const EXPLOSION_DELAY: &str = "explosionDelay";
    pub const POWER: &str = "power";

    pub const META_LEVEL: &str = "metaLevel";
    pub const TECH_LEVEL: &str = "techLevel";

    pub const DRONE_SLOTS: &str = "droneSlotsLeft";
    pub const HIGH_SLOTS: &str = "highSlot";
    pub const MED_SLOTS: &str = "medSlot";
    pub const LOW_SLOTS: &str = "lowSlot";
    pub const ENERGY_RIG_SLOTS: &str = "energyRigSlots";
    pub const MECHANICAL_RIG_SLOTS: &str = "mechanicalRigSlots";
}

/// One projected attribute: its metadata and raw value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeValue<'a> {
    pub meta: &'a AttributeMeta,
    pub value: f64,
}

/// An item's attributes keyed by canonical attribute name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectedAttributes<'a> {
    entries: BTreeMap<&'a str, AttributeValue<'a>>,
}

impl<'a> ProjectedAttributes<'a> {
    pub fn get(&self, name: &str) -> Option<&AttributeValue<'a>> {
        self.entries.get(name)
    }

    /// Raw value of an attribute, if present.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries.get(name).map(|attr| attr.value)
    }

    /// Raw value of an attribute, `0.0` when absent.
    pub fn value_or_zero(&self, name: &str) -> f64 {
        self.value(name).unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &AttributeValue<'a>)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    fn insert(&mut self, meta: &'a AttributeMeta, value: f64) {
        self.entries
            .insert(meta.attribute_name.as_str(), AttributeValue { meta, value });
    }
}

/// Project an item's raw attributes onto named attributes.
///
/// Fails with [`Error::UnknownAttribute`] when a code has no metadata. Items
/// without an attribute table project to an empty map.
pub fn project_attributes<'a>(
    item: &Item,
    attributes: &'a AttributeTable,
) -> Result<ProjectedAttributes<'a>> {
    let mut projected = ProjectedAttributes::default();
    for (code, value) in item.attrs.iter().flatten() {
        let meta = attributes
            .get(code)
            .ok_or(Error::UnknownAttribute { code: *code })?;
        projected.insert(meta, *value);
    }
    Ok(projected)
}

/// Project an item's raw attributes, omitting codes with no metadata.
pub fn project_attributes_lenient<'a>(
    item: &Item,
    attributes: &'a AttributeTable,
) -> ProjectedAttributes<'a> {
    let mut projected = ProjectedAttributes::default();
    for (code, value) in item.attrs.iter().flatten() {
        match attributes.get(code) {
            Some(meta) => projected.insert(meta, *value),
            None => warn!(%code, "attribute has no metadata entry; omitting it"),
        }
    }
    projected
}
