//! Calibration-code modifier resolution for skill effects and ship bonuses.
//!
//! A calibration code names a modifier type and a list of per-attribute
//! deltas. The type's meta entry says which attribute each delta applies to
//! and whether it targets the owner (character or ship) or a range of modules.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::ids::{AttributeId, ItemId};
use crate::model::{CalCodeCode, CalCodeMeta, CalCodeModifiers, Item};
use crate::store::GameData;

/// Placeholder for the skill level inside a calibration code template.
pub const LEVEL_PLACEHOLDER: &str = "%d";

/// Where a calibration code comes from. Decides how its deltas are shown and
/// which change type means "applies to the owner".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSource {
    /// Per-level skill effects; owner is the character.
    Skill,
    /// Ship bonuses; owner is the ship, deltas are fractions shown as percent.
    ShipBonus,
}

impl EffectSource {
    fn owner_change_type(self) -> &'static str {
        match self {
            EffectSource::Skill => "character",
            EffectSource::ShipBonus => "ship",
        }
    }
}

/// What a modifier effect applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectScope {
    /// The character or ship itself.
    Owner,
    /// A range of modules, with its localized label when known.
    Range { code: String, label: Option<String> },
}

/// How an effect value is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStyle {
    /// The value as-is, two decimals when a formula produced it.
    Plain { transformed: bool },
    /// A fraction rendered as a signed percentage with two decimals.
    Percent,
}

/// One resolved attribute delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModifierEffect {
    pub attribute_id: AttributeId,
    /// Localized attribute label.
    pub label: String,
    /// Localized unit, if the attribute has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub scope: EffectScope,
    /// Delta as stored in the modifier table.
    pub raw: f64,
    /// Delta after the attribute's value transform.
    pub value: f64,
    pub style: ValueStyle,
}

impl ModifierEffect {
    /// Signed display value, e.g. `+5.00`, `-0.5` or `+10.00%`.
    pub fn display_value(&self) -> String {
        let sign = if self.value > 0.0 { "+" } else { "" };
        match self.style {
            ValueStyle::Percent => format!("{sign}{:.2}%", self.value * 100.0),
            ValueStyle::Plain { transformed: true } => format!("{sign}{:.2}", self.value),
            ValueStyle::Plain { transformed: false } => format!("{sign}{}", self.value),
        }
    }

    /// Full label including the module range, e.g. `Small Hybrid Turret Damage`.
    pub fn full_label(&self) -> String {
        match &self.scope {
            EffectScope::Range {
                label: Some(range), ..
            } => format!("{range} {}", self.label),
            _ => self.label.clone(),
        }
    }
}

/// Effects granted at one skill level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelEffects {
    pub level: u8,
    pub effects: Vec<ModifierEffect>,
}

/// Bonuses granted by one ship bonus code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipBonus {
    /// Skill the bonus scales with, per level; `None` for a role bonus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_name: Option<String>,
    pub effects: Vec<ModifierEffect>,
}

/// Substitute a level number into a calibration code template.
pub fn code_for_level(template: &str, level: u8) -> String {
    template.replace(LEVEL_PLACEHOLDER, &level.to_string())
}

/// Look up a calibration code and its type's meta entry.
pub fn lookup_code<'a>(
    modifiers: &'a CalCodeModifiers,
    code: &str,
) -> Result<(&'a CalCodeCode, &'a CalCodeMeta)> {
    let entry = modifiers
        .code
        .get(code)
        .ok_or_else(|| Error::UnknownModifierCode {
            code: code.to_string(),
        })?;
    let meta = modifiers
        .meta
        .get(&entry.type_name)
        .ok_or_else(|| Error::UnknownModifierType {
            type_name: entry.type_name.clone(),
        })?;
    Ok((entry, meta))
}

/// Resolve the effects of a calibration code.
///
/// Null deltas are skipped. Deltas whose attribute lacks equipment metadata
/// are skipped with a warning. Skill effects get the attribute's value
/// transform and unit; ship bonuses are shown as percentages without a unit.
pub fn resolve_effects(
    data: &GameData,
    code: &str,
    source: EffectSource,
) -> Result<Vec<ModifierEffect>> {
    let (entry, meta) = lookup_code(&data.reference.cal_code_modifier, code)?;
    let percent = source == EffectSource::ShipBonus;

    let mut effects = Vec::new();
    for (index, delta) in entry.attributes.iter().enumerate() {
        let Some(raw) = *delta else {
            continue;
        };
        let Some(attribute_id) = meta.attribute_ids.get(index).copied() else {
            warn!(code, index, "modifier delta has no matching attribute id");
            continue;
        };
        let Some(equip) = data.equip_attr(attribute_id) else {
            warn!(code, %attribute_id, "modifier attribute has no equipment metadata");
            continue;
        };

        let (value, style) = if percent {
            (raw, ValueStyle::Percent)
        } else {
            (
                equip.transform(raw),
                ValueStyle::Plain {
                    transformed: equip.formula.is_some(),
                },
            )
        };

        effects.push(ModifierEffect {
            attribute_id,
            label: data.text(&equip.name),
            unit: (!percent)
                .then(|| equip.unit_key().map(|key| data.text(key)))
                .flatten(),
            scope: scope_for(data, meta, index, source),
            raw,
            value,
            style,
        });
    }
    Ok(effects)
}

fn scope_for(
    data: &GameData,
    meta: &CalCodeMeta,
    index: usize,
    source: EffectSource,
) -> EffectScope {
    let change_type = meta.change_types.get(index).map(String::as_str);
    if change_type == Some(source.owner_change_type()) {
        return EffectScope::Owner;
    }
    let code = meta.change_ranges.get(index).cloned().unwrap_or_default();
    let label = data
        .reference
        .module_code_list
        .get(&code)
        .map(|key| data.text(key));
    EffectScope::Range { code, label }
}

/// Effects of a code, or none when its record or type meta is missing.
fn effects_or_empty(data: &GameData, code: &str, source: EffectSource) -> Vec<ModifierEffect> {
    match resolve_effects(data, code, source) {
        Ok(effects) => effects,
        Err(error @ Error::UnknownModifierType { .. }) => {
            warn!(code, %error, "modifier type has no meta entry; skipping its effects");
            Vec::new()
        }
        Err(error) => {
            if source == EffectSource::ShipBonus {
                warn!(code, %error, "ship bonus code could not be resolved; skipping it");
            } else {
                debug!(code, "no modifier record for skill level");
            }
            Vec::new()
        }
    }
}

/// Per-level effects of a skill, levels 1 through 5.
///
/// Levels whose code is missing from the modifier table have no effects.
pub fn skill_effects(data: &GameData, item: &Item) -> Vec<LevelEffects> {
    let Some(template) = item.main_cal_code.as_deref() else {
        return Vec::new();
    };

    (1..=5u8)
        .map(|level| LevelEffects {
            level,
            effects: effects_or_empty(
                data,
                &code_for_level(template, level),
                EffectSource::Skill,
            ),
        })
        .collect()
}

/// Ship bonuses, paired with the skill each one scales with.
pub fn ship_bonuses(data: &GameData, item: &Item) -> Vec<ShipBonus> {
    item.ship_bonus_code_list
        .iter()
        .enumerate()
        .map(|(index, code)| {
            let skill = item
                .ship_bonus_skill_list
                .get(index)
                .copied()
                .filter(|id| id.get() != 0);
            ShipBonus {
                skill,
                skill_name: skill.map(|id| data.item_name(id)),
                effects: effects_or_empty(data, code, EffectSource::ShipBonus),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(value: f64, style: ValueStyle) -> ModifierEffect {
        ModifierEffect {
            attribute_id: AttributeId(1),
            label: "Damage".to_string(),
            unit: None,
            scope: EffectScope::Owner,
            raw: value,
            value,
            style,
        }
    }

    #[test]
    fn substitutes_level_placeholder() {
        assert_eq!(code_for_level("skill_gunnery_%d", 3), "skill_gunnery_3");
        assert_eq!(code_for_level("no_placeholder", 3), "no_placeholder");
    }

    #[test]
    fn percent_values_are_signed_and_scaled() {
        assert_eq!(effect(0.05, ValueStyle::Percent).display_value(), "+5.00%");
        assert_eq!(effect(-0.1, ValueStyle::Percent).display_value(), "-10.00%");
        assert_eq!(effect(0.0, ValueStyle::Percent).display_value(), "0.00%");
    }

    #[test]
    fn plain_values_use_two_decimals_only_when_transformed() {
        let transformed = ValueStyle::Plain { transformed: true };
        let raw = ValueStyle::Plain { transformed: false };
        assert_eq!(effect(5.0, transformed).display_value(), "+5.00");
        assert_eq!(effect(5.0, raw).display_value(), "+5");
        assert_eq!(effect(-0.5, raw).display_value(), "-0.5");
    }
}
