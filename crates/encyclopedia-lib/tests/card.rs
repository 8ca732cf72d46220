mod common;

use encyclopedia_lib::card::{CardField, CardOptions, IndustrySection, MISSING_VALUE};
use encyclopedia_lib::modifiers::EffectScope;
use encyclopedia_lib::{build_card, AttributeId, Error, ItemId, Timespan};

use common::fixture_data;

fn field<'a>(fields: &'a [CardField], key: &str) -> &'a CardField {
    fields
        .iter()
        .find(|field| field.key == key)
        .unwrap_or_else(|| panic!("field {key} missing from {fields:?}"))
}

#[test]
fn weapon_card_shows_damage_and_ranges() {
    let data = fixture_data();
    let card = build_card(&data, ItemId(1001), CardOptions::default()).expect("card");

    assert_eq!(card.name, "125mm Autocannon");
    assert_eq!(card.group.as_deref(), Some("Projectile Weapon"));
    assert!(card.classification.weapon);
    assert_eq!(field(&card.basic, "dps").value, "15.00");
    assert_eq!(field(&card.basic, "is_omega").value, "yes");
    assert_eq!(
        card.built_by.as_ref().map(|link| link.name.as_str()),
        Some("125mm Autocannon Blueprint")
    );

    let weapon = card.weapon.expect("weapon section");
    assert_eq!(weapon.dps, Some(15.0));
    assert_eq!(field(&weapon.damage, "emDamage").value, "20.00");
    assert_eq!(field(&weapon.damage, "kineticDamage").value, "10.00");
    assert_eq!(field(&weapon.damage, "thermalDamage").value, MISSING_VALUE);

    let range = field(&weapon.stats, "maxRange");
    assert_eq!(range.label, "Optimal Range");
    assert_eq!(range.value, "1.2");
    assert_eq!(range.unit.as_deref(), Some("km"));
    assert_eq!(field(&weapon.stats, "power").unit.as_deref(), Some("MW"));
}

#[test]
fn ship_card_lists_slots_bonuses_and_resists() {
    let data = fixture_data();
    let card = build_card(&data, ItemId(587), CardOptions::default()).expect("card");

    assert_eq!(card.description.as_deref(), Some("A fast Minmatar frigate."));
    assert_eq!(
        card.built_by.map(|link| link.id),
        Some(ItemId(691)),
        "products link to their blueprint"
    );

    let ship = card.ship.expect("ship section");
    assert_eq!(field(&ship.slots, "highSlot").value, "4");
    assert_eq!(field(&ship.slots, "medSlot").label, "Medium");
    assert_eq!(ship.effective_hp, 1100.0);
    assert_eq!(field(&ship.stats, "ehp").value, "1100");
    assert_eq!(ship.shield.em, Some(25.0));
    assert_eq!(ship.shield.thermal, None);

    assert_eq!(ship.bonuses.len(), 2);
    let skill_bonus = &ship.bonuses[0];
    assert_eq!(skill_bonus.skill, Some(ItemId(3330)));
    assert_eq!(skill_bonus.skill_name.as_deref(), Some("Minmatar Frigate"));
    assert_eq!(skill_bonus.effects[0].display_value(), "+5.00%");
    assert_eq!(
        skill_bonus.effects[0].full_label(),
        "Small Projectile Turret Damage"
    );

    let role_bonus = &ship.bonuses[1];
    assert_eq!(role_bonus.skill, None);
    assert_eq!(role_bonus.effects[0].display_value(), "-50.00%");
    assert_eq!(role_bonus.effects[0].scope, EffectScope::Owner);
}

#[test]
fn skill_card_has_schedule_prerequisites_and_effects() {
    let data = fixture_data();
    let card = build_card(&data, ItemId(3330), CardOptions::default()).expect("card");
    let skill = card.skill.expect("skill section");
    assert_eq!(skill.starting_level, Some(1));
    assert_eq!(skill.prerequisites.len(), 1);
    assert_eq!(skill.prerequisites[0].skill.name, "Gunnery");
    assert_eq!(skill.prerequisites[0].level, 2);
    assert_eq!(skill.training.len(), 4);
    assert!(skill.effects.iter().all(|level| level.effects.is_empty()));

    let card = build_card(&data, ItemId(3300), CardOptions::default()).expect("card");
    assert!(card.ship.is_none() && card.weapon.is_none());
    let skill = card.skill.expect("skill section");
    assert_eq!(skill.training_rate, 30.0);
    assert_eq!(skill.effects.len(), 5);
    let first = &skill.effects[0];
    assert_eq!(first.level, 1);
    assert_eq!(first.effects.len(), 1, "null deltas are skipped");
    assert_eq!(first.effects[0].display_value(), "+2.00");
    assert_eq!(first.effects[0].unit.as_deref(), Some("%"));
    assert!(skill.effects[2].effects.is_empty());
}

#[test]
fn blueprint_card_shows_manufacturing_or_incomplete_notice() {
    let data = fixture_data();
    let card = build_card(&data, ItemId(1101), CardOptions::default()).expect("card");
    match card.industry.expect("industry section") {
        IndustrySection::Available {
            output,
            quantity,
            time,
            money,
            materials,
        } => {
            assert_eq!(output.id, ItemId(1001));
            assert_eq!(quantity, 10);
            assert_eq!(time, Timespan(90_061));
            assert_eq!(time.to_string(), "1:01:01:01");
            assert_eq!(money, 200);
            assert_eq!(materials.len(), 1);
            assert_eq!(materials[0].material.name, "Pyerite");
            assert_eq!(materials[0].quantity, 5);
        }
        IndustrySection::Incomplete => panic!("1101 has a product record"),
    }

    let card = build_card(&data, ItemId(1201), CardOptions::default()).expect("card");
    assert_eq!(card.industry, Some(IndustrySection::Incomplete));
    assert_eq!(card.name, "Prototype Blueprint", "rest of the card still renders");
}

#[test]
fn strict_cards_fail_on_unknown_attribute_codes() {
    let mut data = fixture_data();
    if let Some(item) = data
        .items
        .as_mut()
        .and_then(|items| items.get_mut(&ItemId(34)))
    {
        item.attrs
            .get_or_insert_with(Default::default)
            .insert(AttributeId(999), 1.0);
    }

    let strict = CardOptions {
        strict: true,
        ..CardOptions::default()
    };
    assert!(matches!(
        build_card(&data, ItemId(34), strict),
        Err(Error::UnknownAttribute {
            code: AttributeId(999)
        })
    ));
    let card = build_card(&data, ItemId(34), CardOptions::default()).expect("lenient card");
    assert!(card.classification.is_generic());
}

#[test]
fn missing_items_dataset_is_unavailable() {
    let mut data = fixture_data();
    data.items = None;
    assert!(matches!(
        build_card(&data, ItemId(587), CardOptions::default()),
        Err(Error::DatasetUnavailable { .. })
    ));
}

#[test]
fn card_serializes_to_json() {
    let data = fixture_data();
    let card = build_card(&data, ItemId(1201), CardOptions::default()).expect("card");
    let json = serde_json::to_value(&card).expect("serialize");
    assert_eq!(json["id"], 1201);
    assert_eq!(json["industry"]["status"], "incomplete");
    assert!(json.get("skill").is_none());
}

#[test]
fn dangling_modifier_records_only_drop_their_own_effects() {
    let mut data = fixture_data();
    data.reference
        .cal_code_modifier
        .code
        .remove("ship_bonus_rifter_role");

    let card = build_card(&data, ItemId(587), CardOptions::default())
        .expect("ship card builds without the role bonus record");
    let ship = card.ship.expect("ship section");
    assert_eq!(ship.bonuses.len(), 2);
    assert_eq!(ship.bonuses[0].effects[0].display_value(), "+5.00%");
    assert!(ship.bonuses[1].effects.is_empty());

    data.reference.cal_code_modifier.meta.remove("skill_damage");
    let card = build_card(&data, ItemId(3300), CardOptions::default())
        .expect("skill card builds without the modifier type meta");
    let skill = card.skill.expect("skill section");
    assert_eq!(skill.training.len(), 5);
    assert_eq!(skill.effects.len(), 5);
    assert!(skill.effects.iter().all(|level| level.effects.is_empty()));
}

#[test]
fn owner_scope_follows_the_source_of_the_code() {
    let mut data = fixture_data();
    let meta = &mut data.reference.cal_code_modifier.meta;
    if let Some(skill_damage) = meta.get_mut("skill_damage") {
        skill_damage.change_types[0] = "ship".to_string();
    }
    if let Some(velocity) = meta.get_mut("ship_velocity_bonus") {
        velocity.change_types[0] = "character".to_string();
        velocity.change_ranges[0] = "small_projectile".to_string();
    }

    let card = build_card(&data, ItemId(3300), CardOptions::default()).expect("skill card");
    let skill = card.skill.expect("skill section");
    let effect = &skill.effects[0].effects[0];
    assert!(
        matches!(&effect.scope, EffectScope::Range { code, .. } if code == "small_projectile"),
        "{:?}",
        effect.scope
    );
    assert!(effect.full_label().starts_with("Small Projectile Turret "));

    let card = build_card(&data, ItemId(587), CardOptions::default()).expect("ship card");
    let role_bonus = &card.ship.expect("ship section").bonuses[1];
    assert!(matches!(
        &role_bonus.effects[0].scope,
        EffectScope::Range { label: Some(label), .. } if label == "Small Projectile Turret"
    ));
}

#[test]
fn zero_damage_weapons_have_no_dps_row() {
    let mut data = fixture_data();
    if let Some(attrs) = data
        .items
        .as_mut()
        .and_then(|items| items.get_mut(&ItemId(1001)))
        .and_then(|item| item.attrs.as_mut())
    {
        for code in [4, 5] {
            attrs.insert(AttributeId(code), 0.0);
        }
    }

    let card = build_card(&data, ItemId(1001), CardOptions::default()).expect("card");
    assert!(card.basic.iter().all(|field| field.key != "dps"));
    assert_eq!(card.weapon.expect("weapon section").dps, Some(0.0));
}
