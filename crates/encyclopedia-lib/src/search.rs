//! Keyword search over localized item names.

use serde::Serialize;

use crate::ids::ItemId;
use crate::store::GameData;

/// Queries shorter than this return no results.
pub const MIN_QUERY_LEN: usize = 3;

/// Keywords must be longer than this to count.
const MIN_KEYWORD_LEN: usize = 2;

/// Marker in localized group names identifying test items.
const TEST_GROUP_MARKER: &str = "test";

/// Search behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Include items from groups whose name contains "test".
    pub include_test: bool,
    /// Maximum number of hits; `None` for all.
    pub limit: Option<usize>,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: ItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// Split a query into lowercase keywords longer than two characters.
pub fn keywords(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split(' ')
        .filter(|word| word.chars().count() > MIN_KEYWORD_LEN)
        .map(str::to_string)
        .collect()
}

/// Find items whose localized name contains every keyword of `query`.
///
/// Results are ordered by item id.
pub fn search_items(data: &GameData, query: &str, options: SearchOptions) -> Vec<SearchHit> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let words = keywords(query);

    let mut hits: Vec<SearchHit> = data
        .indexed_names()
        .filter(|(_, name)| {
            let lowered = name.to_lowercase();
            words.iter().all(|word| lowered.contains(word.as_str()))
        })
        .filter(|(id, _)| options.include_test || !is_test_item(data, *id))
        .map(|(id, name)| SearchHit {
            id,
            name: name.to_string(),
            group: data.group_name(id),
        })
        .collect();

    hits.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.name.cmp(&b.name)));
    if let Some(limit) = options.limit {
        hits.truncate(limit);
    }
    hits
}

fn is_test_item(data: &GameData, id: ItemId) -> bool {
    data.group_of(id)
        .and_then(|group| data.localize(&group.name))
        .is_some_and(|name| name.contains(TEST_GROUP_MARKER))
}
