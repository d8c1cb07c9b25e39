use gourd_nbt::{NbtCompound, NbtTag};
use log::debug;

use crate::error::ItemError;
use crate::factory::ItemFactory;
use crate::item::Item;

pub const TAG_ID: &str = "id";
pub const TAG_COUNT: &str = "Count";
pub const TAG_DAMAGE: &str = "Damage";
pub const TAG_TAG: &str = "tag";
pub const TAG_SLOT: &str = "Slot";

impl Item {
    /// Writes the persisted item record. `Slot` is only written when a slot is given.
    ///
    /// `Count` is a single byte read back unsigned, so only counts in `0..=255` come back
    /// unchanged. Others wrap.
    pub fn nbt_serialize(&self, slot: Option<u8>) -> NbtCompound {
        let count = self.get_count();
        if !(0..=255).contains(&count) {
            debug!("Item count {count} doesn't fit the Count byte and wraps to {}", count as u8);
        }

        let mut result = NbtCompound::new();
        result.put(TAG_ID.to_string(), NbtTag::Short(self.get_id()));
        result.put(TAG_COUNT.to_string(), NbtTag::Byte(count as i8));
        result.put(TAG_DAMAGE.to_string(), NbtTag::Short(self.get_meta()));

        if let Some(tag) = self.get_named_tag() {
            result.put(TAG_TAG.to_string(), NbtTag::Compound(tag));
        }

        if let Some(slot) = slot {
            result.put(TAG_SLOT.to_string(), NbtTag::Byte(slot as i8));
        }

        result
    }

    /// Reads a persisted item record.
    ///
    /// Records without an `id` or `Count` are air. The id may be a short or a legacy string
    /// name, legacy names the factory doesn't know also give air. Known fields holding the
    /// wrong kind of tag are an error.
    pub fn nbt_deserialize(
        tag: &NbtCompound,
        factory: &dyn ItemFactory,
    ) -> Result<Item, ItemError> {
        let (Some(id), Some(count)) = (tag.get(TAG_ID), tag.get(TAG_COUNT)) else {
            return Ok(Item::air());
        };

        let count = match count {
            NbtTag::Byte(count) => *count as u8 as i32,
            other => return Err(wrong_type(TAG_COUNT, "byte", other)),
        };
        let meta = match tag.get(TAG_DAMAGE) {
            None => 0,
            Some(NbtTag::Short(meta)) => *meta,
            Some(other) => return Err(wrong_type(TAG_DAMAGE, "short", other)),
        };
        let named_tag = match tag.get(TAG_TAG) {
            None => None,
            Some(NbtTag::Compound(named_tag)) => Some(named_tag),
            Some(other) => return Err(wrong_type(TAG_TAG, "compound", other)),
        };

        match id {
            NbtTag::Short(id) => Ok(factory.get(*id, meta, count, named_tag)),
            NbtTag::String(name) => Ok(super::resolve_legacy(
                factory, name, meta, count, named_tag,
            )),
            other => Err(wrong_type(TAG_ID, "short or string", other)),
        }
    }
}

fn wrong_type(field: &str, expected: &str, found: &NbtTag) -> ItemError {
    ItemError::Format(format!(
        "{field} must be a {expected} tag, found {}",
        found.type_name()
    ))
}
