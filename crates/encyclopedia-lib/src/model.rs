//! Record types for the static JSON datasets.
//!
//! Fields mirror the extracted game data. Everything is optional unless the
//! derivation code depends on it, so partially populated records still load.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::formula::Formula;
use crate::ids::{AttributeId, GroupId, ItemId};

/// Unit marker used by the equipment metadata for "no unit".
pub const UNIT_NOT_FOUND: &str = "NOT_FOUND";

/// Raw item record from `items.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Localization key of the item name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Localization key of the item description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_group_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_omega: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rookie_insurance: Option<f64>,
    /// Calibration code template for skill effects, with a `%d` level placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_cal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_bonus_code_list: Vec<String>,
    /// Skill granting each ship bonus; `0` marks a role bonus.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_bonus_skill_list: Vec<ItemId>,
    /// Generic attribute table, absent for skills.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<BTreeMap<AttributeId, f64>>,
    /// Skill experience multiplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_lv: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_lv: Option<i64>,
    /// Prerequisite skills as `"<item id>|<level>"` pairs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_skill: Vec<String>,
    /// Item produced by this blueprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<ItemId>,
}

/// A prerequisite skill parsed from an item's `pre_skill` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkillRequirement {
    pub skill: ItemId,
    pub level: u8,
}

impl Item {
    /// Parse the `pre_skill` list, skipping malformed entries.
    pub fn prerequisites(&self) -> Vec<SkillRequirement> {
        self.pre_skill
            .iter()
            .filter_map(|entry| {
                let (id, level) = entry.split_once('|')?;
                Some(SkillRequirement {
                    skill: id.parse().ok()?,
                    level: level.trim().parse().ok()?,
                })
            })
            .collect()
    }
}

/// Attribute metadata from `attributes.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeMeta {
    pub attribute_id: AttributeId,
    pub attribute_name: String,
    #[serde(default)]
    pub attribute_category: i64,
    #[serde(default)]
    pub unit_id: i64,
    #[serde(default)]
    pub default_value: f64,
    #[serde(default)]
    pub high_is_good: bool,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub available: bool,
}

/// Display metadata for an attribute from `equip_attr.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipAttr {
    /// Localization key of the label.
    pub name: String,
    /// Localization key of the unit, or [`UNIT_NOT_FOUND`].
    #[serde(default)]
    pub unit: String,
    /// Value transform; formulas the evaluator cannot parse load as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_formula",
        skip_serializing_if = "Option::is_none"
    )]
    pub formula: Option<Formula>,
}

fn lenient_formula<'de, D>(deserializer: D) -> std::result::Result<Option<Formula>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(text) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    match Formula::parse(&text) {
        Ok(formula) => Ok(Some(formula)),
        Err(error) => {
            warn!(%error, "unsupported value-transform formula; showing raw values");
            Ok(None)
        }
    }
}

impl EquipAttr {
    /// Unit localization key, if the attribute has a unit.
    pub fn unit_key(&self) -> Option<&str> {
        if self.unit.is_empty() || self.unit == UNIT_NOT_FOUND {
            None
        } else {
            Some(&self.unit)
        }
    }

    /// Apply the value-transform formula, or return the raw value.
    pub fn transform(&self, value: f64) -> f64 {
        match &self.formula {
            Some(formula) => formula.evaluate(value),
            None => value,
        }
    }
}

/// Item group metadata from `groups.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Localization key of the group name.
    pub name: String,
    #[serde(default)]
    pub anchorable: bool,
    #[serde(default)]
    pub anchored: bool,
    #[serde(default)]
    pub fittable_non_singleton: bool,
    #[serde(default)]
    pub icon_path: String,
    #[serde(default)]
    pub use_base_price: bool,
}

/// Per-type modifier metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalCodeMeta {
    #[serde(default)]
    pub change_types: Vec<String>,
    #[serde(default)]
    pub change_ranges: Vec<String>,
    #[serde(default)]
    pub attribute_ids: Vec<AttributeId>,
    #[serde(default)]
    pub attribute_only: bool,
}

/// Per-attribute deltas for one calibration code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalCodeCode {
    #[serde(default)]
    pub attributes: Vec<Option<f64>>,
    pub type_name: String,
}

/// Calibration-code modifier table from `cal_code_modifier.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalCodeModifiers {
    #[serde(default)]
    pub skill_code_keys: Vec<String>,
    #[serde(default)]
    pub meta: HashMap<String, CalCodeMeta>,
    #[serde(default)]
    pub code: HashMap<String, CalCodeCode>,
}

/// Manufacturing record from `industry.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManufactureData {
    /// Blueprint that produces this record's product, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<ItemId>,
    pub product_type_id: ItemId,
    #[serde(default)]
    pub output_num: u64,
    /// Build duration in seconds.
    #[serde(default)]
    pub time: u64,
    /// ISK cost.
    #[serde(default)]
    pub money: u64,
    #[serde(default)]
    pub material: BTreeMap<ItemId, u64>,
}

/// Industry dataset: manufacture records keyed by blueprint and by product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryData {
    #[serde(default)]
    pub manufacture: HashMap<ItemId, ManufactureData>,
    #[serde(default)]
    pub item_manufacturing: HashMap<ItemId, ManufactureData>,
}

impl IndustryData {
    /// Manufacture record for a blueprint, by its own id or else by the id of
    /// the item it produces.
    pub fn for_blueprint(&self, id: ItemId, item: &Item) -> Option<&ManufactureData> {
        self.manufacture.get(&id).or_else(|| {
            item.product
                .and_then(|product| self.item_manufacturing.get(&product))
        })
    }

    /// Manufacture record for a product item.
    pub fn for_product(&self, id: ItemId) -> Option<&ManufactureData> {
        self.item_manufacturing.get(&id)
    }
}

/// All items keyed by id.
pub type Items = HashMap<ItemId, Item>;
/// Localization key to text for one language.
pub type Strings = HashMap<String, String>;
/// Attribute metadata keyed by code.
pub type AttributeTable = HashMap<AttributeId, AttributeMeta>;
/// Equipment display metadata keyed by attribute code.
pub type EquipAttrs = HashMap<AttributeId, EquipAttr>;
/// Group metadata keyed by group id.
pub type Groups = HashMap<GroupId, Group>;
/// Item to group index.
pub type ItemGroups = HashMap<ItemId, GroupId>;
/// Localization key of an item name to the item id.
pub type ItemsIndex = HashMap<String, ItemId>;
/// Module range code to localization key.
pub type ModuleCodeList = HashMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prerequisites_and_skips_garbage() {
        let item = Item {
            pre_skill: vec![
                "3300|2".to_string(),
                "bogus".to_string(),
                "3301|x".to_string(),
                "3302|5".to_string(),
            ],
            ..Item::default()
        };
        assert_eq!(
            item.prerequisites(),
            vec![
                SkillRequirement {
                    skill: ItemId(3300),
                    level: 2
                },
                SkillRequirement {
                    skill: ItemId(3302),
                    level: 5
                },
            ]
        );
    }

    #[test]
    fn industry_falls_back_to_product_record() {
        let record = ManufactureData {
            product_type_id: ItemId(20),
            money: 100,
            ..ManufactureData::default()
        };
        let industry = IndustryData {
            manufacture: HashMap::new(),
            item_manufacturing: HashMap::from([(ItemId(20), record.clone())]),
        };
        let blueprint = Item {
            product: Some(ItemId(20)),
            ..Item::default()
        };

        assert_eq!(industry.for_blueprint(ItemId(10), &blueprint), Some(&record));
        assert_eq!(industry.for_blueprint(ItemId(10), &Item::default()), None);
    }

    #[test]
    fn unit_key_hides_not_found_marker() {
        let attr = EquipAttr {
            name: "attr_name".to_string(),
            unit: UNIT_NOT_FOUND.to_string(),
            formula: None,
        };
        assert_eq!(attr.unit_key(), None);
        assert_eq!(attr.transform(2.0), 2.0);
    }
}
