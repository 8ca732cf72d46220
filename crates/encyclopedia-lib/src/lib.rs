//! Encyclopedia library entry points.
//!
//! This crate loads the static game datasets, projects raw item attributes
//! onto named attributes, classifies items and derives the values shown on
//! item cards (DPS, hit points, training time, modifier effects, blueprint
//! costs). Front ends should only depend on the functions exported here
//! instead of reimplementing behavior.

#![deny(warnings)]

pub mod attributes;
pub mod card;
pub mod classify;
pub mod dataset;
pub mod error;
pub mod export;
pub mod formula;
pub mod ids;
pub mod model;
pub mod modifiers;
pub mod search;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;

pub use attributes::{project_attributes, project_attributes_lenient, ProjectedAttributes};
pub use card::{build_card, CardOptions, IndustrySection, ItemCard};
pub use classify::{classify, is_blueprint, is_ship, is_skill, is_weapon, Classification};
pub use dataset::{default_data_dir, DatasetSource};
pub use error::{Error, Result};
pub use export::{build_cost_sheet, save_sheet, write_sheet, CostSheet, ExportSelection, SheetFormat};
pub use formula::Formula;
pub use ids::{AttributeId, GroupId, ItemId};
pub use model::Item;
pub use search::{search_items, SearchHit, SearchOptions};
pub use session::Session;
pub use settings::Settings;
pub use stats::{dps, effective_hp, training_schedule, Timespan, TrainingRate};
pub use store::{GameData, ReferenceData};
