//! Conversions between [`Item`] and its persisted or interchange forms.

use gourd_nbt::NbtCompound;
use log::debug;

use crate::factory::ItemFactory;
use crate::item::Item;

pub mod json;
pub mod nbt;

pub use json::{ItemRecord, PayloadEncoding, RecordId};

/// Resolves a legacy `namespace:name` id. Names the factory can't resolve give air.
pub(crate) fn resolve_legacy(
    factory: &dyn ItemFactory,
    name: &str,
    meta: i16,
    count: i32,
    tag: Option<&NbtCompound>,
) -> Item {
    match factory.parse(&format!("{name}:{meta}")) {
        Some(mut item) => {
            item.set_count(count);
            if let Some(tag) = tag {
                item.set_named_tag(tag);
            }
            item
        }
        None => {
            debug!("Unknown legacy item id {name}:{meta}, using air instead");
            Item::air()
        }
    }
}
