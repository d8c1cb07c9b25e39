use std::{fs, path::Path};

use log::{debug, info};

use crate::codec::{ItemRecord, RecordId};
use crate::error::ItemError;
use crate::factory::ItemFactory;
use crate::item::{Item, AIR};

pub const CREATIVE_ITEMS_JSON: &str = include_str!("../../assets/creative_items.json");

/// The items offered in the creative inventory, in display order.
///
/// Entries are always copies, changing an item after handing it over never changes the list.
#[derive(Debug, Clone, Default)]
pub struct CreativeInventory {
    items: Vec<Item>,
}

impl CreativeInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents with the records in `json`, a JSON array of item records.
    ///
    /// Records of kinds the factory doesn't know, and legacy names it can't resolve, are
    /// skipped. On error the contents are left as they were.
    pub fn init(&mut self, factory: &dyn ItemFactory, json: &str) -> Result<(), ItemError> {
        let records: Vec<ItemRecord> = serde_json::from_str(json)?;
        let mut items = Vec::with_capacity(records.len());
        for record in &records {
            let item = Item::json_deserialize(record, factory)?;
            let unresolved = matches!(record.id, RecordId::Legacy(_)) && item.get_id() == AIR;
            if item.is_unknown() || unresolved {
                debug!("Skipping creative item {:?}", record.id);
                continue;
            }
            items.push(item);
        }

        self.items = items;
        info!("Loaded {} creative items", self.items.len());
        Ok(())
    }

    pub fn init_vanilla(&mut self, factory: &dyn ItemFactory) -> Result<(), ItemError> {
        self.init(factory, CREATIVE_ITEMS_JSON)
    }

    pub fn init_from_path(
        &mut self,
        factory: &dyn ItemFactory,
        path: &Path,
    ) -> Result<(), ItemError> {
        let json = fs::read_to_string(path).map_err(|source| ItemError::Io {
            path: path.display().to_string(),
            source,
        })?;
        self.init(factory, &json)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a copy of `item`. The same item may be added more than once.
    pub fn add(&mut self, item: &Item) {
        self.items.push(item.clone());
    }

    /// Removes the first entry matching `item`, see [`CreativeInventory::index_of`].
    pub fn remove(&mut self, item: &Item) -> Option<Item> {
        let index = self.index_of(item)?;
        Some(self.items.remove(index))
    }

    /// Position of the first entry matching `item`. Variants only have to match for kinds that
    /// don't wear out, since the variant of a durable item is its damage.
    pub fn index_of(&self, item: &Item) -> Option<usize> {
        self.items
            .iter()
            .position(|entry| entry.equals(item, !item.is_durable(), true))
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.index_of(item).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }
}
