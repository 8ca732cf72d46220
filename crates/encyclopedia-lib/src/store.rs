//! In-memory dataset store.
//!
//! Reference tables (attributes, groups, modifiers) are required and loaded
//! up front. Items, industry data and localization strings are loaded
//! separately and may be absent when a fetch fails; lookups against an
//! absent dataset report [`Error::DatasetUnavailable`].

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::dataset::{files, DatasetSource};
use crate::error::{Error, Result};
use crate::ids::{AttributeId, ItemId};
use crate::model::{
    AttributeMeta, AttributeTable, CalCodeModifiers, EquipAttr, EquipAttrs, Group, Groups,
    IndustryData, Item, ItemGroups, Items, ItemsIndex, ModuleCodeList, Strings,
};

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Static reference tables shared by every item.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub groups: Groups,
    pub item_groups: ItemGroups,
    pub items_index: ItemsIndex,
    pub attributes: AttributeTable,
    pub cal_code_modifier: CalCodeModifiers,
    pub module_code_list: ModuleCodeList,
    pub equip_attr: EquipAttrs,
}

impl ReferenceData {
    /// Load every reference table from `source`. Any failure is fatal.
    pub fn load(source: &DatasetSource) -> Result<Self> {
        let data = Self {
            groups: source.load(files::GROUPS)?,
            item_groups: source.load(files::ITEM_GROUPS)?,
            items_index: source.load(files::ITEMS_INDEX)?,
            attributes: source.load(files::ATTRIBUTES)?,
            cal_code_modifier: source.load(files::CAL_CODE_MODIFIER)?,
            module_code_list: source.load(files::MODULE_CODE_LIST)?,
            equip_attr: source.load(files::EQUIP_ATTR)?,
        };
        debug!(
            attributes = data.attributes.len(),
            groups = data.groups.len(),
            indexed_items = data.items_index.len(),
            "loaded reference tables from {}",
            source
        );
        Ok(data)
    }
}

/// Load a dataset whose absence is tolerated, logging the failure.
pub fn load_optional<T: DeserializeOwned>(source: &DatasetSource, name: &str) -> Option<T> {
    match source.load(name) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(%error, dataset = name, "failed to load dataset; continuing without it");
            None
        }
    }
}

/// All loaded game data.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub reference: ReferenceData,
    pub items: Option<Items>,
    pub industry: Option<IndustryData>,
    pub strings: Option<Strings>,
}

impl GameData {
    /// Create a store with reference tables only.
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            ..Self::default()
        }
    }

    /// Lookup an item by id.
    pub fn item(&self, id: ItemId) -> Result<&Item> {
        let items = self.items.as_ref().ok_or_else(|| Error::DatasetUnavailable {
            name: files::ITEMS.to_string(),
        })?;
        items.get(&id).ok_or_else(|| Error::UnknownItem {
            query: id.to_string(),
            suggestions: Vec::new(),
        })
    }

    /// Attribute metadata for a code.
    pub fn attribute(&self, code: AttributeId) -> Option<&AttributeMeta> {
        self.reference.attributes.get(&code)
    }

    /// Equipment display metadata for a code.
    pub fn equip_attr(&self, code: AttributeId) -> Option<&EquipAttr> {
        self.reference.equip_attr.get(&code)
    }

    /// Localized text for a key in the current language.
    pub fn localize(&self, key: &str) -> Option<&str> {
        self.strings.as_ref()?.get(key).map(String::as_str)
    }

    /// Localized text for a key, falling back to the key itself.
    pub fn text(&self, key: &str) -> String {
        self.localize(key).unwrap_or(key).to_string()
    }

    /// Localized item name, falling back to the name key and then to `#<id>`.
    pub fn item_name(&self, id: ItemId) -> String {
        match self.item(id).ok().and_then(|item| item.name.as_deref()) {
            Some(key) => self.text(key),
            None => format!("#{id}"),
        }
    }

    /// Group an item belongs to.
    pub fn group_of(&self, id: ItemId) -> Option<&Group> {
        let group_id = self.reference.item_groups.get(&id)?;
        self.reference.groups.get(group_id)
    }

    /// Localized name of the group an item belongs to.
    pub fn group_name(&self, id: ItemId) -> Option<String> {
        self.group_of(id).map(|group| self.text(&group.name))
    }

    /// Resolve a user query to an item id.
    ///
    /// Accepts a numeric id or a localized item name (case-insensitive). Unknown
    /// names produce [`Error::UnknownItem`] with up to three suggestions.
    pub fn find_item(&self, query: &str) -> Result<ItemId> {
        if let Ok(id) = query.parse::<ItemId>() {
            self.item(id)?;
            return Ok(id);
        }

        let needle = query.trim().to_lowercase();
        let mut matches: Vec<ItemId> = self
            .indexed_names()
            .filter(|(_, name)| name.to_lowercase() == needle)
            .map(|(id, _)| id)
            .collect();
        matches.sort();

        match matches.first() {
            Some(id) => Ok(*id),
            None => Err(Error::UnknownItem {
                query: query.to_string(),
                suggestions: self.fuzzy_item_matches(query, 3),
            }),
        }
    }

    /// Localized item names most similar to `query`, best first.
    pub fn fuzzy_item_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .indexed_names()
            .map(|(_, name)| (strsim::jaro_winkler(&needle, &name.to_lowercase()), name))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.dedup_by(|a, b| a.1 == b.1);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    /// Indexed items paired with their localized names.
    pub(crate) fn indexed_names(&self) -> impl Iterator<Item = (ItemId, &str)> + '_ {
        self.reference
            .items_index
            .iter()
            .filter_map(move |(key, id)| self.localize(key).map(|name| (*id, name)))
    }
}
