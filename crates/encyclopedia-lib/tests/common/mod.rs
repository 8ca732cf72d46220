//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use encyclopedia_lib::{DatasetSource, GameData, ReferenceData, Session, Settings};

/// Directory holding the fixture datasets.
pub fn fixture_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/data")
}

pub fn fixture_source() -> DatasetSource {
    DatasetSource::Directory(fixture_data_dir())
}

/// Game data with every fixture dataset loaded and English strings.
#[allow(dead_code)]
pub fn fixture_data() -> GameData {
    let source = fixture_source();
    let mut data = GameData::new(ReferenceData::load(&source).expect("load reference tables"));
    data.items = Some(source.load("items.json").expect("load items"));
    data.industry = Some(source.load("industry.json").expect("load industry"));
    data.strings = Some(source.load("en.json").expect("load strings"));
    data
}

/// Session over the fixtures with items and industry fetched.
#[allow(dead_code)]
pub fn fixture_session() -> Session {
    let mut session =
        Session::open(fixture_source(), &Settings::default()).expect("open fixture session");
    assert!(session.fetch_items(), "items load from fixtures");
    assert!(session.fetch_industry(), "industry loads from fixtures");
    session
}
