use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use gourd_nbt::{NbtCompound, NbtTag};

use crate::data::{
    enchantments_from_tags, strings_from_tags, ItemData, TAG_CAN_DESTROY, TAG_CAN_PLACE_ON,
    TAG_DISPLAY_LORE,
};
use crate::enchantment::{EnchantmentInstance, EnchantmentType};
use crate::error::ItemError;

pub const AIR: i16 = 0;
/// Declared name of kinds the factory doesn't know about.
pub const UNKNOWN_NAME: &str = "Unknown";
/// Variant that matches every variant of a kind in factory lookups.
pub const ANY_META: i16 = -1;
pub const DEFAULT_MAX_STACK_SIZE: u8 = 64;

/// A stack of items: the kind it is made of plus everything that was done to it.
#[derive(Debug, Clone)]
pub struct Item {
    id: i16,
    meta: i16,
    count: i32,
    /// Shared between clones, it never changes after construction.
    name: Arc<str>,
    max_stack_size: u8,
    /// 0 for kinds that don't wear out.
    max_durability: u16,
    data: ItemData,
}

fn normalize_meta(meta: i16) -> i16 {
    if meta == ANY_META {
        meta
    } else {
        meta & 0x7fff
    }
}

impl Item {
    /// Defines an item of kind `id`. Fails when `id` doesn't fit in a signed short.
    pub fn new(id: i32, meta: i16, name: impl Into<Arc<str>>) -> Result<Self, ItemError> {
        let id = i16::try_from(id).map_err(|_| ItemError::Construction { id })?;
        Ok(Self::from_kind(id, meta, name))
    }

    pub fn from_kind(id: i16, meta: i16, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            meta: normalize_meta(meta),
            count: 1,
            name: name.into(),
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            max_durability: 0,
            data: ItemData::default(),
        }
    }

    /// An item of a kind nobody registered.
    pub fn unknown(id: i16, meta: i16) -> Self {
        Self::from_kind(id, meta, UNKNOWN_NAME)
    }

    /// The canonical empty stack.
    pub fn air() -> Self {
        Self::from_kind(AIR, 0, "Air").with_count(0)
    }

    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    pub fn with_max_stack_size(mut self, max_stack_size: u8) -> Self {
        self.max_stack_size = max_stack_size;
        self
    }

    pub fn with_max_durability(mut self, max_durability: u16) -> Self {
        self.max_durability = max_durability;
        self
    }

    pub fn get_id(&self) -> i16 {
        self.id
    }

    pub fn get_meta(&self) -> i16 {
        self.meta
    }

    pub fn has_any_damage_value(&self) -> bool {
        self.meta == ANY_META
    }

    pub fn get_count(&self) -> i32 {
        self.count
    }

    pub fn set_count(&mut self, count: i32) {
        self.count = count;
    }

    pub fn get_max_stack_size(&self) -> u8 {
        self.max_stack_size
    }

    pub fn get_max_durability(&self) -> u16 {
        self.max_durability
    }

    /// Whether this kind wears out with use. The variant of such items is their damage.
    pub fn is_durable(&self) -> bool {
        self.max_durability > 0
    }

    pub fn is_null(&self) -> bool {
        self.count <= 0 || self.id == AIR
    }

    /// The custom name if one is set, otherwise the name the kind was declared with.
    pub fn get_name(&self) -> &str {
        if self.has_custom_name() {
            &self.data.custom_name
        } else {
            &self.name
        }
    }

    pub fn get_vanilla_name(&self) -> &str {
        &self.name
    }

    pub fn is_unknown(&self) -> bool {
        &*self.name == UNKNOWN_NAME
    }

    /// Splits `count` items off this stack.
    ///
    /// The returned stack is a full copy of this one holding `count` items, and this stack loses
    /// that many.
    pub fn pop(&mut self, count: i32) -> Result<Item, ItemError> {
        if count < 0 || count > self.count {
            return Err(ItemError::Range {
                requested: count,
                available: self.count,
            });
        }
        let mut popped = self.clone();
        popped.count = count;
        self.count -= count;
        Ok(popped)
    }

    pub fn has_custom_name(&self) -> bool {
        !self.data.custom_name.is_empty()
    }

    pub fn get_custom_name(&self) -> &str {
        &self.data.custom_name
    }

    pub fn set_custom_name(&mut self, name: impl Into<String>) {
        self.data.custom_name = name.into();
    }

    pub fn clear_custom_name(&mut self) {
        self.data.custom_name.clear();
    }

    pub fn get_lore(&self) -> &[String] {
        &self.data.lore
    }

    pub fn set_lore<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.lore = lines.into_iter().map(Into::into).collect();
    }

    /// Replaces the lore with `lines`. Nothing changes unless every element is a string tag.
    pub fn set_lore_tags(&mut self, lines: &[NbtTag]) -> Result<(), ItemError> {
        self.data.lore = strings_from_tags(TAG_DISPLAY_LORE, lines)?;
        Ok(())
    }

    /// Enchantments ordered by id.
    pub fn enchantments(&self) -> impl Iterator<Item = &EnchantmentInstance> {
        self.data.enchantments.values()
    }

    pub fn has_enchantments(&self) -> bool {
        !self.data.enchantments.is_empty()
    }

    /// With `level` set, the enchantment only counts when it has exactly that level.
    pub fn has_enchantment(&self, kind: EnchantmentType, level: Option<i16>) -> bool {
        self.enchantment(kind)
            .is_some_and(|enchantment| level.map_or(true, |level| enchantment.level() == level))
    }

    pub fn enchantment(&self, kind: EnchantmentType) -> Option<&EnchantmentInstance> {
        self.data.enchantments.get(&kind.id())
    }

    /// 0 when the item doesn't carry `kind`.
    pub fn enchantment_level(&self, kind: EnchantmentType) -> i16 {
        self.enchantment(kind).map_or(0, EnchantmentInstance::level)
    }

    /// Adds `enchantment`, replacing any enchantment of the same kind.
    pub fn add_enchantment(&mut self, enchantment: EnchantmentInstance) {
        self.data
            .enchantments
            .insert(enchantment.kind().id(), enchantment);
    }

    /// With `level` set, only an enchantment of exactly that level is removed.
    pub fn remove_enchantment(&mut self, kind: EnchantmentType, level: Option<i16>) {
        if self.has_enchantment(kind, level) {
            self.data.enchantments.remove(&kind.id());
        }
    }

    pub fn remove_enchantments(&mut self) {
        self.data.enchantments.clear();
    }

    /// Replaces all enchantments with the `{id, lvl}` compounds in `entries`.
    ///
    /// Fails without changing anything if an element isn't a compound. Entries that don't
    /// describe a known enchantment with a positive level are left out.
    pub fn set_enchantment_tags(&mut self, entries: &[NbtTag]) -> Result<(), ItemError> {
        self.data.enchantments = enchantments_from_tags(entries)?;
        Ok(())
    }

    pub fn get_custom_block_data(&self) -> Option<&NbtCompound> {
        self.data.block_entity_tag.as_ref()
    }

    pub fn has_custom_block_data(&self) -> bool {
        self.data.block_entity_tag.is_some()
    }

    pub fn set_custom_block_data(&mut self, compound: NbtCompound) {
        self.data.block_entity_tag = Some(compound);
    }

    pub fn clear_custom_block_data(&mut self) {
        self.data.block_entity_tag = None;
    }

    pub fn can_place_on(&self) -> &BTreeSet<String> {
        &self.data.can_place_on
    }

    pub fn set_can_place_on<I, S>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.can_place_on = blocks.into_iter().map(Into::into).collect();
    }

    pub fn set_can_place_on_tags(&mut self, blocks: &[NbtTag]) -> Result<(), ItemError> {
        self.data.can_place_on = strings_from_tags(TAG_CAN_PLACE_ON, blocks)?
            .into_iter()
            .collect();
        Ok(())
    }

    pub fn can_destroy(&self) -> &BTreeSet<String> {
        &self.data.can_destroy
    }

    pub fn set_can_destroy<I, S>(&mut self, blocks: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.can_destroy = blocks.into_iter().map(Into::into).collect();
    }

    pub fn set_can_destroy_tags(&mut self, blocks: &[NbtTag]) -> Result<(), ItemError> {
        self.data.can_destroy = strings_from_tags(TAG_CAN_DESTROY, blocks)?
            .into_iter()
            .collect();
        Ok(())
    }

    /// The tag tree the attached data is persisted as, empty when there is none.
    pub fn serialize_compound_tag(&self) -> NbtCompound {
        self.data.to_compound()
    }

    /// Replaces all attached data with what `tag` holds.
    pub fn deserialize_compound_tag(&mut self, tag: &NbtCompound) {
        self.data.read_compound(tag);
    }

    pub fn get_named_tag(&self) -> Option<NbtCompound> {
        self.has_named_tag().then(|| self.serialize_compound_tag())
    }

    pub fn has_named_tag(&self) -> bool {
        !self.data.is_empty()
    }

    pub fn set_named_tag(&mut self, tag: &NbtCompound) {
        self.deserialize_compound_tag(tag);
    }

    pub fn clear_named_tag(&mut self) {
        self.data = ItemData::default();
    }

    /// Compares kind, and optionally variant and attached data. Counts are not compared.
    ///
    /// The variant is compared literally, [`ANY_META`] only matches [`ANY_META`].
    pub fn equals(&self, other: &Item, check_meta: bool, check_compound: bool) -> bool {
        self.id == other.id
            && (!check_meta || self.meta == other.meta)
            && (!check_compound || self.get_named_tag() == other.get_named_tag())
    }

    pub fn equals_exact(&self, other: &Item) -> bool {
        self.equals(other, true, true) && self.count == other.count
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.equals_exact(other)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item {} ({}:", self.name, self.id)?;
        if self.has_any_damage_value() {
            write!(f, "?")?;
        } else {
            write!(f, "{}", self.meta)?;
        }
        write!(f, ")x{}", self.count)?;
        if let Some(bytes) = self.get_named_tag().and_then(|tag| tag.to_bytes().ok()) {
            write!(f, " tags:0x{}", hex::encode(bytes))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sword() -> Item {
        Item::from_kind(276, 0, "Diamond Sword")
            .with_max_stack_size(1)
            .with_max_durability(1562)
    }

    #[test]
    fn test_construction_range() {
        assert!(Item::new(i16::MAX as i32, 0, "Max").is_ok());
        assert!(Item::new(i16::MIN as i32, 0, "Min").is_ok());
        assert!(matches!(
            Item::new(40000, 0, "Too big"),
            Err(ItemError::Construction { id: 40000 })
        ));
        assert!(matches!(
            Item::new(-40000, 0, "Too small"),
            Err(ItemError::Construction { id: -40000 })
        ));
    }

    #[test]
    fn test_meta_normalization() {
        assert_eq!(Item::from_kind(1, -1, "Stone").get_meta(), -1);
        assert!(Item::from_kind(1, -1, "Stone").has_any_damage_value());
        assert_eq!(Item::from_kind(1, -2, "Stone").get_meta(), 0x7ffe);
        assert_eq!(Item::from_kind(1, 5, "Stone").get_meta(), 5);
    }

    #[test]
    fn test_null_items() {
        assert!(Item::air().is_null());
        assert!(Item::from_kind(AIR, 0, "Air").is_null());
        assert!(Item::from_kind(1, 0, "Stone").with_count(0).is_null());
        assert!(Item::from_kind(1, 0, "Stone").with_count(-2).is_null());
        assert!(!Item::from_kind(1, 0, "Stone").is_null());
    }

    #[test]
    fn test_pop() {
        let mut stack = Item::from_kind(1, 0, "Stone").with_count(5);
        let popped = stack.pop(2).unwrap();
        assert_eq!(popped.get_count(), 2);
        assert_eq!(stack.get_count(), 3);

        assert!(matches!(
            stack.pop(4),
            Err(ItemError::Range {
                requested: 4,
                available: 3
            })
        ));
        assert_eq!(stack.get_count(), 3);

        let rest = stack.pop(3).unwrap();
        assert_eq!(rest.get_count(), 3);
        assert_eq!(stack.get_count(), 0);
        assert!(stack.is_null());
    }

    #[test]
    fn test_pop_does_not_alias() {
        let mut stack = Item::from_kind(1, 0, "Stone").with_count(4);
        stack.set_lore(["shared?"]);
        let mut popped = stack.pop(1).unwrap();
        popped.set_lore(["mine"]);
        popped.set_custom_block_data(NbtCompound::new());
        assert_eq!(stack.get_lore(), ["shared?".to_string()]);
        assert!(!stack.has_custom_block_data());
    }

    #[test]
    fn test_custom_name() {
        let mut item = sword();
        assert!(!item.has_custom_name());
        assert_eq!(item.get_name(), "Diamond Sword");
        item.set_custom_name("Excalibur");
        assert!(item.has_custom_name());
        assert_eq!(item.get_name(), "Excalibur");
        assert_eq!(item.get_vanilla_name(), "Diamond Sword");
        item.set_custom_name("");
        assert!(!item.has_custom_name());
    }

    #[test]
    fn test_enchantments() {
        let mut item = sword();
        let sharpness = EnchantmentInstance::new(EnchantmentType::Sharpness, 3).unwrap();
        item.add_enchantment(sharpness);
        item.add_enchantment(EnchantmentInstance::new(EnchantmentType::Unbreaking, 1).unwrap());

        assert!(item.has_enchantments());
        assert!(item.has_enchantment(EnchantmentType::Sharpness, None));
        assert!(item.has_enchantment(EnchantmentType::Sharpness, Some(3)));
        assert!(!item.has_enchantment(EnchantmentType::Sharpness, Some(2)));
        assert_eq!(item.enchantment_level(EnchantmentType::Unbreaking), 1);
        assert_eq!(item.enchantment_level(EnchantmentType::Mending), 0);

        item.remove_enchantment(EnchantmentType::Sharpness, Some(1));
        assert!(item.has_enchantment(EnchantmentType::Sharpness, None));
        item.remove_enchantment(EnchantmentType::Sharpness, None);
        assert!(!item.has_enchantment(EnchantmentType::Sharpness, None));

        item.remove_enchantments();
        assert!(!item.has_enchantments());
        assert!(!item.has_named_tag());
    }

    #[test]
    fn test_strict_setters_are_atomic() {
        let mut item = sword();
        item.set_lore(["kept"]);
        let result = item.set_lore_tags(&[NbtTag::String("new".to_string()), NbtTag::Int(3)]);
        assert!(matches!(
            result,
            Err(ItemError::TypeMismatch { index: 1, .. })
        ));
        assert_eq!(item.get_lore(), ["kept".to_string()]);

        item.set_can_destroy(["stone"]);
        assert!(item
            .set_can_destroy_tags(&[NbtTag::Short(1)])
            .is_err());
        assert!(item.can_destroy().contains("stone"));

        item.set_can_place_on_tags(&[
            NbtTag::String("grass".to_string()),
            NbtTag::String("grass".to_string()),
        ])
        .unwrap();
        assert_eq!(item.can_place_on().len(), 1);

        assert!(item.set_enchantment_tags(&[NbtTag::Int(9)]).is_err());
    }

    #[test]
    fn test_equality() {
        let plain = Item::from_kind(35, 1, "Wool");
        let other_color = Item::from_kind(35, 2, "Wool");
        assert!(plain.equals(&other_color, false, true));
        assert!(!plain.equals(&other_color, true, true));

        let any = Item::from_kind(35, ANY_META, "Wool");
        assert!(!any.equals(&plain, true, false));

        let mut named = plain.clone();
        named.set_custom_name("Fancy");
        assert!(plain.equals(&named, true, false));
        assert!(!plain.equals(&named, true, true));

        let bigger = plain.clone().with_count(3);
        assert!(plain.equals(&bigger, true, true));
        assert!(!plain.equals_exact(&bigger));
        assert_ne!(plain, bigger);
    }

    #[test]
    fn test_projection_ignores_insertion_order() {
        let mut first = sword();
        first.add_enchantment(EnchantmentInstance::new(EnchantmentType::Sharpness, 1).unwrap());
        first.add_enchantment(EnchantmentInstance::new(EnchantmentType::Unbreaking, 2).unwrap());
        first.set_can_destroy(["stone", "dirt"]);

        let mut second = sword();
        second.set_can_destroy(["dirt", "stone"]);
        second.add_enchantment(EnchantmentInstance::new(EnchantmentType::Unbreaking, 2).unwrap());
        second.add_enchantment(EnchantmentInstance::new(EnchantmentType::Sharpness, 1).unwrap());

        assert_eq!(first, second);
        assert_eq!(
            first.serialize_compound_tag().to_bytes().unwrap(),
            second.serialize_compound_tag().to_bytes().unwrap()
        );
    }

    #[test]
    fn test_display() {
        let mut item = Item::from_kind(1, 0, "Stone").with_count(5);
        assert_eq!(item.to_string(), "Item Stone (1:0)x5");
        assert_eq!(
            Item::from_kind(1, ANY_META, "Stone").to_string(),
            "Item Stone (1:?)x1"
        );
        item.set_custom_name("A");
        assert!(item.to_string().starts_with("Item Stone (1:0)x5 tags:0x0a"));
    }
}
