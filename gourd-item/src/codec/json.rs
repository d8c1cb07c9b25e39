use base64::{engine::general_purpose, Engine as _};
use gourd_nbt::NbtCompound;
use serde::{Deserialize, Serialize};

use crate::error::ItemError;
use crate::factory::ItemFactory;
use crate::item::Item;

/// Item id of an interchange record. Old records name the kind instead of numbering it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecordId {
    Numeric(i32),
    Legacy(String),
}

/// Flat record used to move items through JSON.
///
/// At most one of the payload fields is expected. When several are present `nbt` wins over
/// `nbt_hex`, which wins over `nbt_b64`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub damage: i16,
    #[serde(default = "default_count", skip_serializing_if = "is_one")]
    pub count: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt_b64: Option<String>,
}

fn is_zero(value: &i16) -> bool {
    *value == 0
}

fn is_one(value: &i32) -> bool {
    *value == 1
}

const fn default_count() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    #[default]
    Base64,
    Hex,
}

impl ItemRecord {
    /// Decodes the tag payload. Empty payload fields count as missing.
    pub fn payload(&self) -> Result<Option<NbtCompound>, ItemError> {
        let bytes = if let Some(raw) = self.nbt.as_ref().filter(|raw| !raw.is_empty()) {
            raw.clone()
        } else if let Some(encoded) = self.nbt_hex.as_ref().filter(|hex| !hex.is_empty()) {
            hex::decode(encoded)?
        } else if let Some(encoded) = self.nbt_b64.as_ref().filter(|b64| !b64.is_empty()) {
            general_purpose::STANDARD.decode(encoded)?
        } else {
            return Ok(None);
        };

        let tag = NbtCompound::from_bytes(&bytes)?;
        Ok((!tag.is_empty()).then_some(tag))
    }
}

impl Item {
    /// Fails when the attached data holds a string too long for the tag encoding.
    pub fn json_serialize(&self) -> Result<ItemRecord, ItemError> {
        self.json_serialize_with(PayloadEncoding::Base64)
    }

    /// Like [`Item::json_serialize`], choosing which field carries the tag payload.
    pub fn json_serialize_with(&self, encoding: PayloadEncoding) -> Result<ItemRecord, ItemError> {
        let mut record = ItemRecord {
            id: RecordId::Numeric(self.get_id() as i32),
            damage: self.get_meta(),
            count: self.get_count(),
            nbt: None,
            nbt_hex: None,
            nbt_b64: None,
        };

        if let Some(tag) = self.get_named_tag() {
            let bytes = tag.to_bytes()?;
            match encoding {
                PayloadEncoding::Base64 => {
                    record.nbt_b64 = Some(general_purpose::STANDARD.encode(&bytes))
                }
                PayloadEncoding::Hex => record.nbt_hex = Some(hex::encode(&bytes)),
            }
        }

        Ok(record)
    }

    /// Builds an item from an interchange record.
    ///
    /// Legacy string ids the factory can't resolve give air, like they do in
    /// [`Item::nbt_deserialize`].
    pub fn json_deserialize(
        record: &ItemRecord,
        factory: &dyn ItemFactory,
    ) -> Result<Item, ItemError> {
        let tag = record.payload()?;
        match &record.id {
            RecordId::Numeric(id) => {
                let id = i16::try_from(*id).map_err(|_| ItemError::Construction { id: *id })?;
                Ok(factory.get(id, record.damage, record.count, tag.as_ref()))
            }
            RecordId::Legacy(name) => Ok(super::resolve_legacy(
                factory,
                name,
                record.damage,
                record.count,
                tag.as_ref(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::factory::ItemRegistry;

    #[test]
    fn test_minimal_record() {
        let registry = ItemRegistry::vanilla().unwrap();
        let record = registry.get(1, 0, 1, None).json_serialize().unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({ "id": 1 })
        );

        let record = registry.get(35, 3, 20, None).json_serialize().unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            serde_json::json!({ "id": 35, "damage": 3, "count": 20 })
        );
    }

    #[test]
    fn test_defaults_when_missing() {
        let record: ItemRecord = serde_json::from_str(r#"{"id": 5}"#).unwrap();
        assert_eq!(record.id, RecordId::Numeric(5));
        assert_eq!(record.damage, 0);
        assert_eq!(record.count, 1);
        assert_eq!(record.payload().unwrap(), None);
    }

    #[test]
    fn test_payload_priority() {
        let registry = ItemRegistry::vanilla().unwrap();
        let mut named = registry.get(1, 0, 1, None);
        named.set_custom_name("from hex");
        let mut other = registry.get(1, 0, 1, None);
        other.set_custom_name("from b64");

        let mut record = named.json_serialize_with(PayloadEncoding::Hex).unwrap();
        record.nbt_b64 = other.json_serialize().unwrap().nbt_b64;
        let decoded = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!(decoded.get_custom_name(), "from hex");

        record.nbt_hex = Some(String::new());
        let decoded = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!(decoded.get_custom_name(), "from b64");

        record.nbt = Some(named.serialize_compound_tag().to_bytes().unwrap().to_vec());
        let decoded = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!(decoded.get_custom_name(), "from hex");
    }

    #[test]
    fn test_enchanted_book_payload() {
        let registry = ItemRegistry::vanilla().unwrap();
        let record: ItemRecord = serde_json::from_str(
            r#"{"id": 403, "nbt_b64": "CgkABGVuY2gKAAAAAQIAAmlkAA8CAANsdmwAAQAA"}"#,
        )
        .unwrap();
        let book = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!(book.get_vanilla_name(), "Enchanted Book");
        assert_eq!(
            book.enchantment_level(crate::enchantment::EnchantmentType::Efficiency),
            1
        );
        assert_eq!(book.json_serialize().unwrap(), record);
    }

    #[test]
    fn test_overlong_strings_are_refused() {
        let registry = ItemRegistry::vanilla().unwrap();
        let mut item = registry.get(1, 0, 1, None);
        item.set_lore(["x".repeat(70_000)]);
        assert!(matches!(
            item.json_serialize(),
            Err(ItemError::Nbt(gourd_nbt::Error::StringTooLong(70_000)))
        ));

        item.set_lore(["x".repeat(u16::MAX as usize)]);
        let record = item.json_serialize().unwrap();
        let decoded = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_bad_payloads() {
        let registry = ItemRegistry::vanilla().unwrap();
        let record: ItemRecord =
            serde_json::from_str(r#"{"id": 1, "nbt_hex": "zz"}"#).unwrap();
        assert!(matches!(
            Item::json_deserialize(&record, &registry),
            Err(ItemError::Hex(_))
        ));

        let record: ItemRecord =
            serde_json::from_str(r#"{"id": 1, "nbt_b64": "!!!"}"#).unwrap();
        assert!(matches!(
            Item::json_deserialize(&record, &registry),
            Err(ItemError::Base64(_))
        ));

        let record: ItemRecord = serde_json::from_str(r#"{"id": 1, "nbt": [10, 1]}"#).unwrap();
        assert!(matches!(
            Item::json_deserialize(&record, &registry),
            Err(ItemError::Nbt(_))
        ));
    }

    #[test]
    fn test_ids() {
        let registry = ItemRegistry::vanilla().unwrap();

        let record: ItemRecord = serde_json::from_str(r#"{"id": 70000}"#).unwrap();
        assert!(matches!(
            Item::json_deserialize(&record, &registry),
            Err(ItemError::Construction { id: 70000 })
        ));

        let record: ItemRecord =
            serde_json::from_str(r#"{"id": "minecraft:planks", "damage": 2, "count": 3}"#)
                .unwrap();
        let planks = Item::json_deserialize(&record, &registry).unwrap();
        assert_eq!((planks.get_id(), planks.get_meta(), planks.get_count()), (5, 2, 3));

        let record: ItemRecord = serde_json::from_str(r#"{"id": "minecraft:nope"}"#).unwrap();
        assert!(Item::json_deserialize(&record, &registry).unwrap().is_null());

        let record: ItemRecord = serde_json::from_str(r#"{"id": 4321}"#).unwrap();
        assert!(Item::json_deserialize(&record, &registry).unwrap().is_unknown());
    }
}
