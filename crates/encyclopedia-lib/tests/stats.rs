mod common;

use encyclopedia_lib::stats::{missile_range_km, SkillLevelCost};
use encyclopedia_lib::{
    dps, effective_hp, project_attributes, training_schedule, ItemId, Timespan, TrainingRate,
};

use common::fixture_data;

#[test]
fn autocannon_dps_matches_worked_example() {
    let data = fixture_data();
    let item = data.item(ItemId(1001)).expect("autocannon");
    let attrs = project_attributes(item, &data.reference.attributes).expect("project");
    // (10 + 5 + 0 + 0) * 2 / (2000 / 1000)
    assert_eq!(dps(&attrs), Some(15.0));
}

#[test]
fn dps_is_none_for_non_weapons() {
    let data = fixture_data();
    let item = data.item(ItemId(587)).expect("rifter");
    let attrs = project_attributes(item, &data.reference.attributes).expect("project");
    assert_eq!(dps(&attrs), None);
    assert_eq!(missile_range_km(&attrs), None);
}

#[test]
fn ehp_sums_the_three_layers() {
    let data = fixture_data();
    let item = data.item(ItemId(587)).expect("rifter");
    let attrs = project_attributes(item, &data.reference.attributes).expect("project");
    assert_eq!(effective_hp(&attrs), Some(1100.0));
}

#[test]
fn first_level_of_gunnery_takes_eight_minutes_twenty() {
    let data = fixture_data();
    let item = data.item(ItemId(3300)).expect("gunnery");
    let schedule = training_schedule(item, TrainingRate::default());

    assert_eq!(schedule.len(), 5);
    assert_eq!(
        schedule[0],
        SkillLevelCost {
            level: 1,
            skill_points: 250,
            duration: Timespan(500),
        }
    );
    assert_eq!(schedule[0].duration.to_string(), "0:00:08:20");
    assert_eq!(schedule[4].skill_points, 256_000);
}

#[test]
fn attained_levels_are_skipped() {
    let data = fixture_data();
    let item = data.item(ItemId(3330)).expect("frigate skill");
    let schedule = training_schedule(item, TrainingRate::new(60.0).expect("rate"));

    let levels: Vec<u8> = schedule.iter().map(|cost| cost.level).collect();
    assert_eq!(levels, vec![2, 3, 4, 5]);
    // round(2000 * 1415 / 1000) = 2830 SP; 2830 * 60 / 60 = 2830 s
    assert_eq!(schedule[0].skill_points, 2830);
    assert_eq!(schedule[0].duration.to_string(), "0:00:47:10");
}
