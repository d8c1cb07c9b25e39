//! Loading many stored items at once, where one broken item must not lose the rest.

use gourd_nbt::{NbtCompound, NbtTag};
use log::warn;

use crate::codec::nbt::TAG_SLOT;
use crate::codec::ItemRecord;
use crate::factory::ItemFactory;
use crate::item::Item;

/// Reads persisted item records. Records that fail to decode are logged and become air.
pub fn deserialize_items(tags: &[NbtCompound], factory: &dyn ItemFactory) -> Vec<Item> {
    tags.iter()
        .map(|tag| {
            Item::nbt_deserialize(tag, factory).unwrap_or_else(|err| {
                err.log();
                Item::air()
            })
        })
        .collect()
}

/// Reads interchange records. Records that fail to decode are logged and become air.
pub fn load_records(records: &[ItemRecord], factory: &dyn ItemFactory) -> Vec<Item> {
    records
        .iter()
        .map(|record| {
            Item::json_deserialize(record, factory).unwrap_or_else(|err| {
                err.log();
                Item::air()
            })
        })
        .collect()
}

/// Writes the non-empty slots of an inventory as a list of slotted item records.
pub fn serialize_inventory(items: &[Item]) -> NbtTag {
    NbtTag::List(
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_null())
            .filter_map(|(slot, item)| {
                let slot = u8::try_from(slot).ok()?;
                Some(NbtTag::Compound(item.nbt_serialize(Some(slot))))
            })
            .collect(),
    )
}

/// Reads a list written by [`serialize_inventory`] back into `size` slots.
///
/// Slots nothing was stored in, and slots whose record couldn't be read, hold air.
pub fn deserialize_inventory(
    list: &[NbtTag],
    size: usize,
    factory: &dyn ItemFactory,
) -> Vec<Item> {
    let mut items = vec![Item::air(); size];

    for tag in list {
        let NbtTag::Compound(record) = tag else {
            warn!("Skipping inventory entry stored as a {} tag", tag.type_name());
            continue;
        };
        let Some(slot) = record.get_byte(TAG_SLOT).map(|slot| slot as u8 as usize) else {
            warn!("Skipping inventory entry without a slot");
            continue;
        };
        if slot >= size {
            warn!("Skipping inventory entry for slot {slot}, the inventory has {size}");
            continue;
        }
        match Item::nbt_deserialize(record, factory) {
            Ok(item) => items[slot] = item,
            Err(err) => err.log(),
        }
    }

    items
}
