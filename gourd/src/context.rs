use gourd_config::{ItemConfig, NbtEncoding};
use gourd_item::{CreativeInventory, Item, ItemError, ItemRegistry, PayloadEncoding};
use parking_lot::RwLock;

/// Item state shared by everything running in the process.
pub struct ItemContext {
    pub registry: ItemRegistry,
    /// Guarded here since the catalog itself does no locking.
    pub creative: RwLock<CreativeInventory>,
    pub encoding: PayloadEncoding,
}

impl ItemContext {
    pub fn new(config: &ItemConfig) -> Result<Self, ItemError> {
        let registry = match &config.item_table {
            Some(path) => ItemRegistry::load(path)?,
            None => ItemRegistry::vanilla()?,
        };
        log::info!("Registered {} item kinds", registry.len());

        let mut creative = CreativeInventory::new();
        match &config.creative_items {
            Some(path) => creative.init_from_path(&registry, path)?,
            None => creative.init_vanilla(&registry)?,
        }

        Ok(Self {
            registry,
            creative: RwLock::new(creative),
            encoding: payload_encoding(config.interchange_nbt),
        })
    }

    pub fn creative_items(&self) -> Vec<Item> {
        self.creative.read().items().to_vec()
    }
}

const fn payload_encoding(encoding: NbtEncoding) -> PayloadEncoding {
    match encoding {
        NbtEncoding::Base64 => PayloadEncoding::Base64,
        NbtEncoding::Hex => PayloadEncoding::Hex,
    }
}
