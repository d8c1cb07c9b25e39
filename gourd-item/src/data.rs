use std::collections::{BTreeMap, BTreeSet};

use gourd_nbt::{NbtCompound, NbtTag};
use log::debug;

use crate::enchantment::EnchantmentInstance;
use crate::error::ItemError;

pub const TAG_DISPLAY: &str = "display";
pub const TAG_DISPLAY_NAME: &str = "Name";
pub const TAG_DISPLAY_LORE: &str = "Lore";
pub const TAG_ENCH: &str = "ench";
pub const TAG_BLOCK_ENTITY_TAG: &str = "BlockEntityTag";
pub const TAG_CAN_PLACE_ON: &str = "CanPlaceOn";
pub const TAG_CAN_DESTROY: &str = "CanDestroy";

/// Mutable state an item stack carries beyond its kind and count.
///
/// Every field is owned, so cloning an [`ItemData`] never aliases another stack's data.
#[derive(Debug, Clone, Default)]
pub struct ItemData {
    pub(crate) enchantments: BTreeMap<i16, EnchantmentInstance>,
    /// Empty means no custom name.
    pub(crate) custom_name: String,
    pub(crate) lore: Vec<String>,
    pub(crate) block_entity_tag: Option<NbtCompound>,
    pub(crate) can_place_on: BTreeSet<String>,
    pub(crate) can_destroy: BTreeSet<String>,
    /// Keys we don't model, written back untouched.
    pub(crate) extra: NbtCompound,
    pub(crate) display_extra: NbtCompound,
}

impl ItemData {
    pub fn is_empty(&self) -> bool {
        self.enchantments.is_empty()
            && self.custom_name.is_empty()
            && self.lore.is_empty()
            && self.block_entity_tag.is_none()
            && self.can_place_on.is_empty()
            && self.can_destroy.is_empty()
            && self.extra.is_empty()
            && self.display_extra.is_empty()
    }

    /// Builds the tag tree this data is persisted as. Empty data gives an empty compound.
    pub fn to_compound(&self) -> NbtCompound {
        let mut tag = self.extra.clone();

        if !self.custom_name.is_empty() || !self.lore.is_empty() || !self.display_extra.is_empty() {
            let mut display = self.display_extra.clone();
            if !self.custom_name.is_empty() {
                display.put(
                    TAG_DISPLAY_NAME.to_string(),
                    NbtTag::String(self.custom_name.clone()),
                );
            }
            if !self.lore.is_empty() {
                display.put(TAG_DISPLAY_LORE.to_string(), string_list(&self.lore));
            }
            tag.put(TAG_DISPLAY.to_string(), NbtTag::Compound(display));
        }

        if !self.enchantments.is_empty() {
            let entries = self
                .enchantments
                .values()
                .map(|enchantment| enchantment.to_tag())
                .collect::<Vec<_>>();
            tag.put(TAG_ENCH.to_string(), NbtTag::List(entries));
        }

        if let Some(block_entity) = &self.block_entity_tag {
            tag.put(
                TAG_BLOCK_ENTITY_TAG.to_string(),
                NbtTag::Compound(block_entity.clone()),
            );
        }

        if !self.can_place_on.is_empty() {
            tag.put(TAG_CAN_PLACE_ON.to_string(), string_list(&self.can_place_on));
        }
        if !self.can_destroy.is_empty() {
            tag.put(TAG_CAN_DESTROY.to_string(), string_list(&self.can_destroy));
        }

        tag
    }

    /// Replaces everything with what `tag` holds. Fields missing from `tag` end up empty.
    ///
    /// Malformed optional parts are dropped instead of failing the whole read.
    pub fn read_compound(&mut self, tag: &NbtCompound) {
        *self = ItemData::default();

        for (key, value) in tag.iter() {
            match (key.as_str(), value) {
                (TAG_DISPLAY, NbtTag::Compound(display)) => self.read_display(display),
                (TAG_ENCH, NbtTag::List(entries)) => match enchantments_from_tags(entries) {
                    Ok(enchantments) => self.enchantments = enchantments,
                    Err(err) => debug!("Skipping enchantment list: {err}"),
                },
                (TAG_BLOCK_ENTITY_TAG, NbtTag::Compound(block_entity)) => {
                    self.block_entity_tag = Some(block_entity.clone());
                }
                (TAG_CAN_PLACE_ON, NbtTag::List(entries)) => {
                    match strings_from_tags(TAG_CAN_PLACE_ON, entries) {
                        Ok(names) => self.can_place_on = names.into_iter().collect(),
                        Err(err) => debug!("Skipping placement restrictions: {err}"),
                    }
                }
                (TAG_CAN_DESTROY, NbtTag::List(entries)) => {
                    match strings_from_tags(TAG_CAN_DESTROY, entries) {
                        Ok(names) => self.can_destroy = names.into_iter().collect(),
                        Err(err) => debug!("Skipping destroy restrictions: {err}"),
                    }
                }
                (
                    TAG_DISPLAY | TAG_ENCH | TAG_BLOCK_ENTITY_TAG | TAG_CAN_PLACE_ON
                    | TAG_CAN_DESTROY,
                    other,
                ) => debug!("Ignoring {key} stored as a {} tag", other.type_name()),
                _ => self.extra.put(key.clone(), value.clone()),
            }
        }
    }

    fn read_display(&mut self, display: &NbtCompound) {
        for (key, value) in display.iter() {
            match (key.as_str(), value) {
                (TAG_DISPLAY_NAME, NbtTag::String(name)) => self.custom_name = name.clone(),
                (TAG_DISPLAY_LORE, NbtTag::List(lines)) => {
                    match strings_from_tags(TAG_DISPLAY_LORE, lines) {
                        Ok(lines) => self.lore = lines,
                        Err(err) => debug!("Skipping lore: {err}"),
                    }
                }
                (TAG_DISPLAY_NAME | TAG_DISPLAY_LORE, other) => {
                    debug!("Ignoring display {key} stored as a {} tag", other.type_name())
                }
                _ => self.display_extra.put(key.clone(), value.clone()),
            }
        }
    }
}

fn string_list<'a>(strings: impl IntoIterator<Item = &'a String>) -> NbtTag {
    NbtTag::List(strings.into_iter().cloned().map(NbtTag::String).collect())
}

/// Checks every element is a string tag before taking any of them.
pub(crate) fn strings_from_tags(
    field: &'static str,
    tags: &[NbtTag],
) -> Result<Vec<String>, ItemError> {
    tags.iter()
        .enumerate()
        .map(|(index, tag)| match tag {
            NbtTag::String(string) => Ok(string.clone()),
            other => Err(ItemError::TypeMismatch {
                field,
                index,
                expected: "string",
                found: other.type_name(),
            }),
        })
        .collect()
}

/// Checks every element is a compound, then keeps the entries that describe a known
/// enchantment with a positive level.
pub(crate) fn enchantments_from_tags(
    tags: &[NbtTag],
) -> Result<BTreeMap<i16, EnchantmentInstance>, ItemError> {
    let entries = tags
        .iter()
        .enumerate()
        .map(|(index, tag)| match tag {
            NbtTag::Compound(entry) => Ok(entry),
            other => Err(ItemError::TypeMismatch {
                field: TAG_ENCH,
                index,
                expected: "compound",
                found: other.type_name(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut enchantments = BTreeMap::new();
    for entry in entries {
        match EnchantmentInstance::from_tag(entry) {
            Some(enchantment) => {
                enchantments.insert(enchantment.kind().id(), enchantment);
            }
            None => debug!("Dropping invalid enchantment entry {entry:?}"),
        }
    }
    Ok(enchantments)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::enchantment::EnchantmentType;

    fn ench_entry(id: i16, level: i16) -> NbtTag {
        let mut entry = NbtCompound::new();
        entry.put("id".to_string(), NbtTag::Short(id));
        entry.put("lvl".to_string(), NbtTag::Short(level));
        NbtTag::Compound(entry)
    }

    #[test]
    fn test_empty_data_writes_nothing() {
        let data = ItemData::default();
        assert!(data.is_empty());
        assert!(data.to_compound().is_empty());
    }

    #[test]
    fn test_display_only_when_named_or_lore() {
        let mut data = ItemData::default();
        data.lore = vec!["first".to_string(), "second".to_string()];
        let tag = data.to_compound();
        let display = tag.get_compound(TAG_DISPLAY).unwrap();
        assert!(display.get(TAG_DISPLAY_NAME).is_none());
        assert_eq!(
            display.get_list(TAG_DISPLAY_LORE),
            Some(&vec![
                NbtTag::String("first".to_string()),
                NbtTag::String("second".to_string())
            ])
        );
        assert!(tag.get(TAG_ENCH).is_none());
    }

    #[test]
    fn test_read_resets_previous_state() {
        let mut data = ItemData::default();
        data.custom_name = "Old".to_string();
        data.can_destroy.insert("stone".to_string());
        data.enchantments.insert(
            9,
            EnchantmentInstance::new(EnchantmentType::Sharpness, 2).unwrap(),
        );

        let mut tag = NbtCompound::new();
        tag.put(
            TAG_CAN_PLACE_ON.to_string(),
            NbtTag::List(vec![NbtTag::String("dirt".to_string())]),
        );
        data.read_compound(&tag);

        assert!(data.custom_name.is_empty());
        assert!(data.enchantments.is_empty());
        assert!(data.can_destroy.is_empty());
        assert!(data.can_place_on.contains("dirt"));
    }

    #[test]
    fn test_bad_lore_list_is_skipped() {
        let mut display = NbtCompound::new();
        display.put(TAG_DISPLAY_NAME.to_string(), NbtTag::String("Named".to_string()));
        display.put(
            TAG_DISPLAY_LORE.to_string(),
            NbtTag::List(vec![NbtTag::Int(1), NbtTag::Int(2)]),
        );
        let mut tag = NbtCompound::new();
        tag.put(TAG_DISPLAY.to_string(), NbtTag::Compound(display));

        let mut data = ItemData::default();
        data.read_compound(&tag);
        assert_eq!(data.custom_name, "Named");
        assert!(data.lore.is_empty());
    }

    #[test]
    fn test_bad_enchantment_entries() {
        let mut tag = NbtCompound::new();
        tag.put(
            TAG_ENCH.to_string(),
            NbtTag::List(vec![ench_entry(9, 0), ench_entry(17, 2), ench_entry(-4, 1)]),
        );
        let mut data = ItemData::default();
        data.read_compound(&tag);
        assert_eq!(data.enchantments.len(), 1);
        assert_eq!(data.enchantments[&17].level(), 2);

        // a list of the wrong element kind is dropped entirely
        tag.put(
            TAG_ENCH.to_string(),
            NbtTag::List(vec![NbtTag::Short(9), NbtTag::Short(3)]),
        );
        data.read_compound(&tag);
        assert!(data.enchantments.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let mut display = NbtCompound::new();
        display.put("color".to_string(), NbtTag::Int(0xff0000));
        let mut tag = NbtCompound::new();
        tag.put("Unbreakable".to_string(), NbtTag::Byte(1));
        tag.put(TAG_DISPLAY.to_string(), NbtTag::Compound(display));

        let mut data = ItemData::default();
        data.read_compound(&tag);
        assert!(!data.is_empty());
        assert_eq!(data.to_compound(), tag);
    }

    #[test]
    fn test_strict_string_check() {
        let tags = vec![NbtTag::String("a".to_string()), NbtTag::Byte(0)];
        match strings_from_tags(TAG_DISPLAY_LORE, &tags) {
            Err(ItemError::TypeMismatch {
                field,
                index,
                expected,
                found,
            }) => {
                assert_eq!(field, TAG_DISPLAY_LORE);
                assert_eq!(index, 1);
                assert_eq!(expected, "string");
                assert_eq!(found, "byte");
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        }
    }
}
