//! Item classification predicates.
//!
//! The predicates are independent and not mutually exclusive: a blueprint can
//! also carry attributes that make it look like something else.

use serde::Serialize;

use crate::attributes::{names, ProjectedAttributes};
use crate::model::Item;

/// Skills have no generic attribute table but a positive experience
/// multiplier and tech level.
pub fn is_skill(item: &Item) -> bool {
    item.attrs.is_none()
        && item.exp.is_some_and(|exp| exp > 0.0)
        && item.tech_lv.is_some_and(|tech| tech > 0)
}

/// Blueprints declare the item they produce.
pub fn is_blueprint(item: &Item) -> bool {
    item.product.is_some()
}

/// Weapons fit in a slot and deal damage: module size, slot type and damage
/// multiplier must all be present.
pub fn is_weapon(attrs: &ProjectedAttributes<'_>) -> bool {
    attrs.contains(names::MODULE_SIZE)
        && attrs.contains(names::SLOTS)
        && attrs.contains(names::DAMAGE_MULTIPLIER)
}

/// Ships carry a non-negative ship size. Zero is the smallest hull class, so
/// this checks the value rather than mere presence.
pub fn is_ship(attrs: &ProjectedAttributes<'_>) -> bool {
    attrs.value(names::SHIP_SIZE).is_some_and(|size| size >= 0.0)
}

/// All four classification flags for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub skill: bool,
    pub blueprint: bool,
    pub weapon: bool,
    pub ship: bool,
}

impl Classification {
    /// True when none of the predicates matched; only basic info applies.
    pub fn is_generic(&self) -> bool {
        !(self.skill || self.blueprint || self.weapon || self.ship)
    }
}

/// Evaluate every predicate for an item and its projected attributes.
pub fn classify(item: &Item, attrs: &ProjectedAttributes<'_>) -> Classification {
    Classification {
        skill: is_skill(item),
        blueprint: is_blueprint(item),
        weapon: is_weapon(attrs),
        ship: is_ship(attrs),
    }
}
