pub mod codec;
pub mod creative;
pub mod data;
pub mod enchantment;
pub mod error;
pub mod factory;
pub mod item;
pub mod load;

pub use codec::{ItemRecord, PayloadEncoding, RecordId};
pub use creative::CreativeInventory;
pub use data::ItemData;
pub use enchantment::{EnchantmentInstance, EnchantmentType};
pub use error::ItemError;
pub use factory::{ItemFactory, ItemKind, ItemRegistry};
pub use item::Item;
