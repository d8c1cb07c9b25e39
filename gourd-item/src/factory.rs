use std::{collections::HashMap, fs, path::Path, sync::Arc};

use gourd_nbt::NbtCompound;
use serde::Deserialize;

use crate::error::ItemError;
use crate::item::{Item, DEFAULT_MAX_STACK_SIZE};

pub const ITEMS_JSON: &str = include_str!("../../assets/items.json");

const NAMESPACE: &str = "minecraft:";

/// Produces items of registered kinds.
pub trait ItemFactory {
    /// An item of kind `id`. Kinds the factory doesn't know give an item named
    /// [`crate::item::UNKNOWN_NAME`].
    fn get(&self, id: i16, meta: i16, count: i32, tag: Option<&NbtCompound>) -> Item;

    /// Looks an item up by a name like `wool`, `wool:14`, `minecraft:wool:14` or `35:14`.
    fn parse(&self, name: &str) -> Option<Item>;
}

#[derive(Deserialize, Clone, Debug)]
struct ItemKindEntry {
    id: i16,
    name: String,
    display_name: String,
    #[serde(default = "default_max_stack")]
    max_stack: u8,
    #[serde(default)]
    max_durability: u16,
}

const fn default_max_stack() -> u8 {
    DEFAULT_MAX_STACK_SIZE
}

#[derive(Clone, Debug)]
pub struct ItemKind {
    pub id: i16,
    pub name: String,
    pub display_name: Arc<str>,
    pub max_stack: u8,
    pub max_durability: u16,
}

impl From<ItemKindEntry> for ItemKind {
    fn from(entry: ItemKindEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            display_name: entry.display_name.into(),
            max_stack: entry.max_stack,
            max_durability: entry.max_durability,
        }
    }
}

/// Item kinds read from a JSON table.
#[derive(Clone, Debug, Default)]
pub struct ItemRegistry {
    kinds: HashMap<i16, ItemKind>,
    by_name: HashMap<String, i16>,
}

impl ItemRegistry {
    /// The table bundled with the server.
    pub fn vanilla() -> Result<Self, ItemError> {
        Self::from_json(ITEMS_JSON)
    }

    pub fn from_json(json: &str) -> Result<Self, ItemError> {
        let entries: Vec<ItemKindEntry> = serde_json::from_str(json)?;
        let mut registry = Self::default();
        for entry in entries {
            registry.register(entry.into());
        }
        Ok(registry)
    }

    pub fn load(path: &Path) -> Result<Self, ItemError> {
        let json = fs::read_to_string(path).map_err(|source| ItemError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Adds `kind`, replacing a kind registered under the same id.
    pub fn register(&mut self, kind: ItemKind) {
        if let Some(old) = self.kinds.get(&kind.id) {
            self.by_name.remove(&old.name);
        }
        self.by_name.insert(kind.name.clone(), kind.id);
        self.kinds.insert(kind.id, kind);
    }

    pub fn kind(&self, id: i16) -> Option<&ItemKind> {
        self.kinds.get(&id)
    }

    pub fn kind_by_name(&self, name: &str) -> Option<&ItemKind> {
        self.by_name.get(name).and_then(|id| self.kinds.get(id))
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl ItemFactory for ItemRegistry {
    fn get(&self, id: i16, meta: i16, count: i32, tag: Option<&NbtCompound>) -> Item {
        let mut item = match self.kinds.get(&id) {
            Some(kind) => Item::from_kind(id, meta, kind.display_name.clone())
                .with_max_stack_size(kind.max_stack)
                .with_max_durability(kind.max_durability),
            None => Item::unknown(id, meta),
        };
        item.set_count(count);
        if let Some(tag) = tag {
            item.set_named_tag(tag);
        }
        item
    }

    fn parse(&self, name: &str) -> Option<Item> {
        let name = name.trim().to_lowercase().replace(' ', "_");
        let name = name.strip_prefix(NAMESPACE).unwrap_or(&name);

        let (kind, meta) = match name.rsplit_once(':') {
            Some((kind, meta)) => (kind, meta.parse::<i16>().ok()?),
            None => (name, 0),
        };

        let id = match kind.parse::<i16>() {
            Ok(id) => id,
            Err(_) => *self.by_name.get(kind)?,
        };
        Some(self.get(id, meta, 1, None))
    }
}
