//! Item card assembly.
//!
//! A card is the structured, presentation-ready view of one item: basic info
//! plus a section per classification that matched. Values are formatted for
//! display here so every front end renders the same numbers.

use serde::Serialize;
use tracing::debug;

use crate::attributes::{names, project_attributes, project_attributes_lenient, ProjectedAttributes};
use crate::classify::{classify, Classification};
use crate::error::Result;
use crate::ids::ItemId;
use crate::model::Item;
use crate::modifiers::{ship_bonuses, skill_effects, LevelEffects, ShipBonus};
use crate::stats::{
    dps, effective_hp, missile_range_km, resistance_percent, scaled_damage, training_schedule,
    SkillLevelCost, Timespan, TrainingRate,
};
use crate::store::GameData;

/// Placeholder shown for a damage type the weapon does not deal.
pub const MISSING_VALUE: &str = "--";

/// Damage resonance attributes per layer, in EM, thermal, kinetic, explosive order.
const SHIELD_RESONANCES: [&str; 4] = [
    "shieldEmDamageResonance",
    "shieldThermalDamageResonance",
    "shieldKineticDamageResonance",
    "shieldExplosiveDamageResonance",
];
const ARMOR_RESONANCES: [&str; 4] = [
    "armorEmDamageResonance",
    "armorThermalDamageResonance",
    "armorKineticDamageResonance",
    "armorExplosiveDamageResonance",
];
const STRUCTURE_RESONANCES: [&str; 4] = [
    "emDamageResonance",
    "thermalDamageResonance",
    "kineticDamageResonance",
    "explosiveDamageResonance",
];

/// Card assembly switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardOptions {
    pub training_rate: TrainingRate,
    /// Fail on attributes without metadata instead of omitting them.
    pub strict: bool,
}

/// One labelled value on a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardField {
    /// Attribute name or a synthetic key such as `dps`.
    pub key: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// Reference to another item, with its localized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemLink {
    pub id: ItemId,
    pub name: String,
}

impl ItemLink {
    fn new(data: &GameData, id: ItemId) -> Self {
        Self {
            id,
            name: data.item_name(id),
        }
    }
}

/// Prerequisite skill and required level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prerequisite {
    pub skill: ItemLink,
    pub level: u8,
}

/// Skill-specific part of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_level: Option<i64>,
    pub prerequisites: Vec<Prerequisite>,
    /// Training rate the schedule was computed at, skill points per minute.
    pub training_rate: f64,
    pub training: Vec<SkillLevelCost>,
    pub effects: Vec<LevelEffects>,
}

/// One material line of a manufacturing job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialLine {
    pub material: ItemLink,
    pub quantity: u64,
}

/// Blueprint-specific part of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndustrySection {
    Available {
        output: ItemLink,
        quantity: u64,
        time: Timespan,
        money: u64,
        materials: Vec<MaterialLine>,
    },
    /// No manufacture record exists for this blueprint.
    Incomplete,
}

/// Resistances of one defence layer, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Resistances {
    pub em: Option<f64>,
    pub thermal: Option<f64>,
    pub kinetic: Option<f64>,
    pub explosive: Option<f64>,
}

/// Ship-specific part of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipSection {
    pub slots: Vec<CardField>,
    pub bonuses: Vec<ShipBonus>,
    pub stats: Vec<CardField>,
    pub effective_hp: f64,
    pub shield: Resistances,
    pub armor: Resistances,
    pub structure: Resistances,
}

/// Weapon-specific part of a card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeaponSection {
    pub damage: Vec<CardField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dps: Option<f64>,
    pub stats: Vec<CardField>,
}

/// Presentation-ready view of one item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemCard {
    pub id: ItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub classification: Classification,
    pub basic: Vec<CardField>,
    /// Blueprint that manufactures this item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built_by: Option<ItemLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<IndustrySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship: Option<ShipSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weapon: Option<WeaponSection>,
}

/// Build the card for an item.
pub fn build_card(data: &GameData, id: ItemId, options: CardOptions) -> Result<ItemCard> {
    let item = data.item(id)?;
    let attrs = if options.strict {
        project_attributes(item, &data.reference.attributes)?
    } else {
        project_attributes_lenient(item, &data.reference.attributes)
    };
    let classification = classify(item, &attrs);
    debug!(%id, ?classification, attributes = attrs.len(), "building item card");

    let fields = FieldBuilder { data, attrs: &attrs };

    Ok(ItemCard {
        id,
        name: data.item_name(id),
        group: data.group_name(id),
        description: item.description.as_deref().map(|key| data.text(key)),
        classification,
        basic: fields.basic(item),
        built_by: data
            .industry
            .as_ref()
            .and_then(|industry| industry.for_product(id))
            .and_then(|record| record.blueprint)
            .map(|blueprint| ItemLink::new(data, blueprint)),
        skill: classification
            .skill
            .then(|| skill_section(data, item, options.training_rate)),
        industry: classification
            .blueprint
            .then(|| industry_section(data, id, item)),
        ship: classification.ship.then(|| fields.ship_section(item)),
        weapon: classification.weapon.then(|| fields.weapon_section()),
    })
}

fn skill_section(data: &GameData, item: &Item, rate: TrainingRate) -> SkillSection {
    SkillSection {
        tech_level: item.tech_lv,
        starting_level: item.init_lv.filter(|level| *level > -1),
        prerequisites: item
            .prerequisites()
            .into_iter()
            .map(|req| Prerequisite {
                skill: ItemLink::new(data, req.skill),
                level: req.level,
            })
            .collect(),
        training_rate: rate.per_minute(),
        training: training_schedule(item, rate),
        effects: skill_effects(data, item),
    }
}

fn industry_section(data: &GameData, id: ItemId, item: &Item) -> IndustrySection {
    let Some(record) = data
        .industry
        .as_ref()
        .and_then(|industry| industry.for_blueprint(id, item))
    else {
        return IndustrySection::Incomplete;
    };

    IndustrySection::Available {
        output: ItemLink::new(data, record.product_type_id),
        quantity: record.output_num,
        time: Timespan(record.time),
        money: record.money,
        materials: record
            .material
            .iter()
            .map(|(material, quantity)| MaterialLine {
                material: ItemLink::new(data, *material),
                quantity: *quantity,
            })
            .collect(),
    }
}

/// Format a number for display: integers without decimals, otherwise up to
/// four decimals with trailing zeros removed.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn yes_no(value: f64) -> String {
    if value != 0.0 { "yes" } else { "no" }.to_string()
}

/// Builds display fields from projected attributes.
struct FieldBuilder<'a, 'd> {
    data: &'a GameData,
    attrs: &'a ProjectedAttributes<'d>,
}

impl FieldBuilder<'_, '_> {
    /// Field for an attribute, or `None` when the item lacks it.
    fn attribute(&self, name: &str) -> Option<CardField> {
        self.attribute_with(name, None, format_number)
    }

    /// Field for an attribute with a label override and a fallback formatter.
    ///
    /// The attribute's own value transform takes precedence over `format`.
    fn attribute_with(
        &self,
        name: &str,
        label: Option<&str>,
        format: impl Fn(f64) -> String,
    ) -> Option<CardField> {
        let attr = self.attrs.get(name)?;
        let equip = self.data.equip_attr(attr.meta.attribute_id);
        let value = match equip.and_then(|equip| equip.formula.as_ref()) {
            Some(formula) => format_number(formula.evaluate(attr.value)),
            None => format(attr.value),
        };
        Some(CardField {
            key: name.to_string(),
            label: match label {
                Some(label) => label.to_string(),
                None => equip
                    .map(|equip| self.data.text(&equip.name))
                    .unwrap_or_else(|| name.to_string()),
            },
            value,
            unit: equip
                .and_then(|equip| equip.unit_key())
                .map(|key| self.data.text(key)),
        })
    }

    fn synthetic(key: &str, label: &str, value: String, unit: Option<&str>) -> CardField {
        CardField {
            key: key.to_string(),
            label: label.to_string(),
            value,
            unit: unit.map(str::to_string),
        }
    }

    fn basic(&self, item: &Item) -> Vec<CardField> {
        let mut fields = Vec::new();
        if let Some(dps) = dps(self.attrs).filter(|dps| *dps != 0.0) {
            fields.push(Self::synthetic("dps", "DPS", format!("{dps:.2}"), None));
        }
        fields.extend(self.attribute(names::META_LEVEL));
        fields.extend(self.attribute(names::TECH_LEVEL));
        fields.push(Self::synthetic(
            "is_omega",
            "Omega Required",
            yes_no(item.is_omega.unwrap_or(0) as f64),
            None,
        ));
        for name in [
            "volume",
            "maxVelocityMod",
            "signatureRadiusMod",
            "capacitorCapacityBonusMod",
            "capacitorNeed",
            names::POWER,
            names::DURATION,
            "damageRateDMod",
            "damageRateDModBonus",
            "moduleReactivationDelay",
            "durationDMod",
            "durationDModMod",
        ] {
            fields.extend(self.attribute(name));
        }
        fields.extend(self.attribute_with("maxGroupFitted", Some("Per Ship Limit"), format_number));
        fields.extend(self.attribute_with("disallowInEmpireSpace", Some("Null-sec Only"), yes_no));
        fields
    }

    fn ship_section(&self, item: &Item) -> ShipSection {
        let slots = [
            (names::DRONE_SLOTS, "Drones"),
            (names::HIGH_SLOTS, "High"),
            (names::MED_SLOTS, "Medium"),
            (names::LOW_SLOTS, "Low"),
            (names::ENERGY_RIG_SLOTS, "Rig (power)"),
            (names::MECHANICAL_RIG_SLOTS, "Rig (mechanical)"),
        ]
        .into_iter()
        .filter_map(|(name, label)| self.attribute_with(name, Some(label), format_number))
        .collect();

        let mut stats = Vec::new();
        if let Some(insurance) = item.is_rookie_insurance {
            stats.push(Self::synthetic(
                "is_rookie_insurance",
                "Insurance cost",
                format_number(insurance),
                None,
            ));
        }
        for name in [
            names::MAX_VELOCITY,
            "warpSpeedMultiplier",
            "capacity",
        ] {
            stats.extend(self.attribute(name));
        }
        if let Some(mut drones) =
            self.attribute_with("droneCapacity", Some("Drone Hangar Capacity"), format_number)
        {
            if drones.unit.is_none() {
                drones.unit = Some("m³".to_string());
            }
            stats.push(drones);
        }
        for name in [
            "capacitorCapacity",
            "powerOutput",
            names::SHIELD_CAPACITY,
            names::ARMOR_HP,
            names::STRUCTURE_HP,
        ] {
            stats.extend(self.attribute(name));
        }

        let ehp = effective_hp(self.attrs).unwrap_or_default();
        stats.push(Self::synthetic("ehp", "EHP", format_number(ehp), None));

        ShipSection {
            slots,
            bonuses: ship_bonuses(self.data, item),
            stats,
            effective_hp: ehp,
            shield: self.resistances(SHIELD_RESONANCES),
            armor: self.resistances(ARMOR_RESONANCES),
            structure: self.resistances(STRUCTURE_RESONANCES),
        }
    }

    fn resistances(&self, layer: [&str; 4]) -> Resistances {
        let lookup = |name: &str| {
            let percent = resistance_percent(self.attrs.value(name)?);
            Some((percent * 10.0).round() / 10.0)
        };
        Resistances {
            em: lookup(layer[0]),
            thermal: lookup(layer[1]),
            kinetic: lookup(layer[2]),
            explosive: lookup(layer[3]),
        }
    }

    fn weapon_section(&self) -> WeaponSection {
        let damage = [
            (names::EM_DAMAGE, "EM"),
            (names::THERMAL_DAMAGE, "TH"),
            (names::KINETIC_DAMAGE, "KI"),
            (names::EXPLOSIVE_DAMAGE, "EX"),
        ]
        .into_iter()
        .map(|(name, label)| {
            let value = if self.attrs.contains(name) {
                scaled_damage(self.attrs, name).map(|value| format!("{value:.2}"))
            } else {
                None
            };
            Self::synthetic(
                name,
                label,
                value.unwrap_or_else(|| MISSING_VALUE.to_string()),
                None,
            )
        })
        .collect();

        let mut stats = Vec::new();
        stats.extend(self.attribute(names::POWER));
        stats.extend(self.converted(names::MAX_RANGE, 1000.0, "km"));
        stats.extend(self.converted(names::FALLOFF, 1000.0, "km"));
        stats.extend(self.attribute(names::TRACKING_SPEED));
        stats.extend(self.attribute(names::MAX_VELOCITY));
        stats.extend(self.attribute(names::EXPLOSION_SPEED));
        stats.extend(self.attribute(names::EXPLOSION_RANGE));
        stats.extend(self.converted(names::EXPLOSION_DELAY, 1000.0, "s"));
        if let Some(range) = missile_range_km(self.attrs) {
            stats.push(Self::synthetic(
                "missileRange",
                "Missile Range",
                format!("{range:.2}"),
                Some("km"),
            ));
        }

        WeaponSection {
            damage,
            dps: dps(self.attrs),
            stats,
        }
    }

    /// Attribute field divided by `divisor` and shown in `unit` with one decimal.
    fn converted(&self, name: &str, divisor: f64, unit: &str) -> Option<CardField> {
        let mut field =
            self.attribute_with(name, None, |value| format!("{:.1}", value / divisor))?;
        field.unit = Some(unit.to_string());
        Some(field)
    }
}
