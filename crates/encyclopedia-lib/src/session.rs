//! Session state and the actions that change it.
//!
//! Everything mutable lives here: the chosen language, the training rate, the
//! datasets fetched so far and the blueprint export selection. Derivations
//! read the session's [`GameData`] and never modify it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::card::{build_card, CardOptions, ItemCard};
use crate::classify::is_blueprint;
use crate::dataset::{files, DatasetSource};
use crate::error::{Error, Result};
use crate::export::{build_cost_sheet, CostSheet, ExportSelection};
use crate::ids::ItemId;
use crate::search::{search_items, SearchHit, SearchOptions};
use crate::settings::Settings;
use crate::stats::TrainingRate;
use crate::store::{load_optional, GameData, ReferenceData};

/// Number of dataset requests in flight, shareable with a busy indicator.
#[derive(Debug, Clone, Default)]
pub struct LoadingCounter(Arc<AtomicUsize>);

impl LoadingCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.get() > 0
    }

    fn start(&self) -> LoadingGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        LoadingGuard(self)
    }
}

struct LoadingGuard<'a>(&'a LoadingCounter);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0 .0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One user's browsing session.
#[derive(Debug)]
pub struct Session {
    source: DatasetSource,
    data: GameData,
    language: String,
    training_rate: TrainingRate,
    export: ExportSelection,
    loading: LoadingCounter,
    strict: bool,
}

impl Session {
    /// Open a session: load the reference tables and the strings for the
    /// configured language. Items and industry data are fetched on demand.
    pub fn open(source: DatasetSource, settings: &Settings) -> Result<Self> {
        let loading = LoadingCounter::default();
        let reference = {
            let _guard = loading.start();
            ReferenceData::load(&source)?
        };
        let mut session = Self {
            source,
            data: GameData::new(reference),
            language: String::new(),
            training_rate: settings.training_rate()?,
            export: ExportSelection::new(),
            loading,
            strict: cfg!(debug_assertions),
        };
        session.set_language(&settings.language);
        Ok(session)
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn training_rate(&self) -> TrainingRate {
        self.training_rate
    }

    pub fn export_selection(&self) -> &ExportSelection {
        &self.export
    }

    /// Handle on the in-flight request counter.
    pub fn loading(&self) -> LoadingCounter {
        self.loading.clone()
    }

    /// Use strict attribute projection for cards. Defaults to strict in
    /// debug builds and lenient in release builds.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Switch language, replacing the loaded strings. A failed fetch leaves
    /// the session without strings.
    pub fn set_language(&mut self, language: &str) {
        let _guard = self.loading.start();
        self.language = language.to_string();
        self.data.strings = load_optional(&self.source, &files::strings(language));
        debug!(
            language,
            loaded = self.data.strings.is_some(),
            "switched language"
        );
    }

    /// Fetch the item table. Returns whether it is now loaded.
    pub fn fetch_items(&mut self) -> bool {
        let _guard = self.loading.start();
        self.data.items = load_optional(&self.source, files::ITEMS);
        if let Some(items) = &self.data.items {
            info!(items = items.len(), "loaded items");
        }
        self.data.items.is_some()
    }

    /// Fetch the industry table. Returns whether it is now loaded.
    pub fn fetch_industry(&mut self) -> bool {
        let _guard = self.loading.start();
        self.data.industry = load_optional(&self.source, files::INDUSTRY);
        self.data.industry.is_some()
    }

    pub fn set_training_rate(&mut self, rate: f64) -> Result<()> {
        self.training_rate = TrainingRate::new(rate)?;
        Ok(())
    }

    /// Add a blueprint to the export selection. Returns `false` when it was
    /// already selected.
    pub fn add_blueprint_export(&mut self, id: ItemId) -> Result<bool> {
        let item = self.data.item(id)?;
        if !is_blueprint(item) {
            return Err(Error::NotABlueprint { id });
        }
        Ok(self.export.add(id))
    }

    pub fn remove_blueprint_export(&mut self, index: usize) -> Option<ItemId> {
        self.export.remove(index)
    }

    pub fn clear_blueprint_export(&mut self) {
        self.export.clear();
    }

    /// Card for an item at the session's training rate.
    pub fn card(&self, id: ItemId) -> Result<ItemCard> {
        build_card(
            &self.data,
            id,
            CardOptions {
                training_rate: self.training_rate,
                strict: self.strict,
            },
        )
    }

    pub fn search(&self, query: &str, options: SearchOptions) -> Vec<SearchHit> {
        search_items(&self.data, query, options)
    }

    /// Cost sheet for the current export selection.
    pub fn cost_sheet(&self) -> Result<CostSheet> {
        build_cost_sheet(&self.data, &self.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_guard_decrements_on_drop() {
        let counter = LoadingCounter::default();
        {
            let _first = counter.start();
            let _second = counter.start();
            assert_eq!(counter.get(), 2);
        }
        assert!(!counter.is_loading());
    }
}
