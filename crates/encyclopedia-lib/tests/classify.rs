mod common;

use std::collections::BTreeMap;

use encyclopedia_lib::{
    classify, is_blueprint, is_ship, is_skill, is_weapon, project_attributes, AttributeId, Item,
    ItemId,
};

use common::fixture_data;

fn item(id: i64) -> Item {
    fixture_data()
        .item(ItemId(id))
        .expect("fixture item present")
        .clone()
}

#[test]
fn skills_have_no_attribute_table() {
    let gunnery = item(3300);
    assert!(is_skill(&gunnery));

    let mut with_attrs = gunnery.clone();
    with_attrs.attrs = Some(BTreeMap::new());
    assert!(!is_skill(&with_attrs), "any attrs map disqualifies a skill");

    let mut no_exp = gunnery;
    no_exp.exp = Some(0.0);
    assert!(!is_skill(&no_exp));
}

#[test]
fn blueprints_keep_their_product_id() {
    let blueprint = item(691);
    assert!(is_blueprint(&blueprint));
    assert_eq!(blueprint.product, Some(ItemId(587)));
    assert!(!is_blueprint(&item(587)));
}

#[test]
fn weapon_needs_all_three_attributes() {
    let data = fixture_data();
    let autocannon = item(1001);
    let attrs = project_attributes(&autocannon, &data.reference.attributes).expect("project");
    assert!(is_weapon(&attrs));

    for code in [1, 2, 3] {
        let mut stripped = autocannon.clone();
        if let Some(attrs) = stripped.attrs.as_mut() {
            attrs.remove(&AttributeId(code));
        }
        let projected =
            project_attributes(&stripped, &data.reference.attributes).expect("project");
        assert!(!is_weapon(&projected), "removing code {code} flips is_weapon");
    }
}

#[test]
fn zero_ship_size_is_a_ship() {
    let data = fixture_data();
    let rifter = item(587);
    let attrs = project_attributes(&rifter, &data.reference.attributes).expect("project");
    assert_eq!(attrs.value("shipSize"), Some(0.0));
    assert!(is_ship(&attrs));

    let mut negative = rifter;
    if let Some(attrs) = negative.attrs.as_mut() {
        attrs.insert(AttributeId(9), -1.0);
    }
    let attrs = project_attributes(&negative, &data.reference.attributes).expect("project");
    assert!(!is_ship(&attrs));
}

#[test]
fn materials_are_generic() {
    let data = fixture_data();
    let tritanium = item(34);
    let attrs = project_attributes(&tritanium, &data.reference.attributes).expect("project");
    assert!(classify(&tritanium, &attrs).is_generic());
}
