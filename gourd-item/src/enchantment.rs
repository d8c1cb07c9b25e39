use gourd_nbt::{NbtCompound, NbtTag};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

pub(crate) const TAG_ID: &str = "id";
pub(crate) const TAG_LEVEL: &str = "lvl";

/// Enchantment kinds, numbered as the client numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
#[repr(i16)]
pub enum EnchantmentType {
    Protection = 0,
    FireProtection = 1,
    FeatherFalling = 2,
    BlastProtection = 3,
    ProjectileProtection = 4,
    Thorns = 5,
    Respiration = 6,
    DepthStrider = 7,
    AquaAffinity = 8,
    Sharpness = 9,
    Smite = 10,
    BaneOfArthropods = 11,
    Knockback = 12,
    FireAspect = 13,
    Looting = 14,
    Efficiency = 15,
    SilkTouch = 16,
    Unbreaking = 17,
    Fortune = 18,
    Power = 19,
    Punch = 20,
    Flame = 21,
    Infinity = 22,
    LuckOfTheSea = 23,
    Lure = 24,
    FrostWalker = 25,
    Mending = 26,
    Binding = 27,
    Vanishing = 28,
    Impaling = 29,
    Riptide = 30,
    Loyalty = 31,
    Channeling = 32,
}

impl EnchantmentType {
    pub fn from_id(id: i16) -> Option<Self> {
        Self::from_i16(id)
    }

    pub const fn id(self) -> i16 {
        self as i16
    }

    pub const fn name(self) -> &'static str {
        match self {
            EnchantmentType::Protection => "protection",
            EnchantmentType::FireProtection => "fire_protection",
            EnchantmentType::FeatherFalling => "feather_falling",
            EnchantmentType::BlastProtection => "blast_protection",
            EnchantmentType::ProjectileProtection => "projectile_protection",
            EnchantmentType::Thorns => "thorns",
            EnchantmentType::Respiration => "respiration",
            EnchantmentType::DepthStrider => "depth_strider",
            EnchantmentType::AquaAffinity => "aqua_affinity",
            EnchantmentType::Sharpness => "sharpness",
            EnchantmentType::Smite => "smite",
            EnchantmentType::BaneOfArthropods => "bane_of_arthropods",
            EnchantmentType::Knockback => "knockback",
            EnchantmentType::FireAspect => "fire_aspect",
            EnchantmentType::Looting => "looting",
            EnchantmentType::Efficiency => "efficiency",
            EnchantmentType::SilkTouch => "silk_touch",
            EnchantmentType::Unbreaking => "unbreaking",
            EnchantmentType::Fortune => "fortune",
            EnchantmentType::Power => "power",
            EnchantmentType::Punch => "punch",
            EnchantmentType::Flame => "flame",
            EnchantmentType::Infinity => "infinity",
            EnchantmentType::LuckOfTheSea => "luck_of_the_sea",
            EnchantmentType::Lure => "lure",
            EnchantmentType::FrostWalker => "frost_walker",
            EnchantmentType::Mending => "mending",
            EnchantmentType::Binding => "binding",
            EnchantmentType::Vanishing => "vanishing",
            EnchantmentType::Impaling => "impaling",
            EnchantmentType::Riptide => "riptide",
            EnchantmentType::Loyalty => "loyalty",
            EnchantmentType::Channeling => "channeling",
        }
    }

    /// Highest level obtainable in survival. Higher levels can still be applied.
    pub const fn max_level(self) -> i16 {
        match self {
            EnchantmentType::AquaAffinity
            | EnchantmentType::SilkTouch
            | EnchantmentType::Flame
            | EnchantmentType::Infinity
            | EnchantmentType::Mending
            | EnchantmentType::Binding
            | EnchantmentType::Vanishing
            | EnchantmentType::Channeling => 1,
            EnchantmentType::Knockback
            | EnchantmentType::FireAspect
            | EnchantmentType::Punch
            | EnchantmentType::FrostWalker => 2,
            EnchantmentType::Thorns
            | EnchantmentType::Respiration
            | EnchantmentType::DepthStrider
            | EnchantmentType::Looting
            | EnchantmentType::Unbreaking
            | EnchantmentType::Fortune
            | EnchantmentType::LuckOfTheSea
            | EnchantmentType::Lure
            | EnchantmentType::Riptide
            | EnchantmentType::Loyalty => 3,
            EnchantmentType::Protection
            | EnchantmentType::FireProtection
            | EnchantmentType::FeatherFalling
            | EnchantmentType::BlastProtection
            | EnchantmentType::ProjectileProtection => 4,
            EnchantmentType::Sharpness
            | EnchantmentType::Smite
            | EnchantmentType::BaneOfArthropods
            | EnchantmentType::Efficiency
            | EnchantmentType::Power
            | EnchantmentType::Impaling => 5,
        }
    }
}

/// An enchantment applied to an item. The level is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnchantmentInstance {
    kind: EnchantmentType,
    level: i16,
}

impl EnchantmentInstance {
    /// `None` for non-positive levels, and for kinds with a non-positive id since stored
    /// `ench` entries can't carry those.
    pub fn new(kind: EnchantmentType, level: i16) -> Option<Self> {
        (level > 0 && kind.id() > 0).then_some(Self { kind, level })
    }

    pub fn kind(&self) -> EnchantmentType {
        self.kind
    }

    pub fn level(&self) -> i16 {
        self.level
    }

    pub(crate) fn to_tag(self) -> NbtTag {
        let mut tag = NbtCompound::new();
        tag.put(TAG_ID.to_string(), NbtTag::Short(self.kind.id()));
        tag.put(TAG_LEVEL.to_string(), NbtTag::Short(self.level));
        NbtTag::Compound(tag)
    }

    /// Reads one `ench` entry. Entries with a non-positive id or level, or an id no enchantment
    /// is registered under, give `None`.
    pub(crate) fn from_tag(tag: &NbtCompound) -> Option<Self> {
        let id = tag.get_short(TAG_ID).unwrap_or(-1);
        let level = tag.get_short(TAG_LEVEL).unwrap_or(0);
        if id <= 0 || level <= 0 {
            return None;
        }
        Self::new(EnchantmentType::from_id(id)?, level)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(id: i16, level: i16) -> NbtCompound {
        let mut tag = NbtCompound::new();
        tag.put(TAG_ID.to_string(), NbtTag::Short(id));
        tag.put(TAG_LEVEL.to_string(), NbtTag::Short(level));
        tag
    }

    #[test]
    fn test_ids_round_trip() {
        for id in 0..=32 {
            assert_eq!(EnchantmentType::from_id(id).map(EnchantmentType::id), Some(id));
        }
        assert_eq!(EnchantmentType::from_id(33), None);
        assert_eq!(EnchantmentType::from_id(-1), None);
    }

    #[test]
    fn test_zero_level_is_rejected() {
        assert!(EnchantmentInstance::new(EnchantmentType::Sharpness, 0).is_none());
        assert!(EnchantmentInstance::new(EnchantmentType::Sharpness, -3).is_none());
        assert_eq!(
            EnchantmentInstance::new(EnchantmentType::Sharpness, 3).map(|e| e.level()),
            Some(3)
        );
    }

    #[test]
    fn test_unstorable_kinds_are_rejected() {
        assert!(EnchantmentInstance::new(EnchantmentType::Protection, 4).is_none());
        assert!(EnchantmentInstance::new(EnchantmentType::FireProtection, 4).is_some());
    }

    #[test]
    fn test_entry_decoding() {
        let decoded = EnchantmentInstance::from_tag(&entry(9, 3)).unwrap();
        assert_eq!(decoded.kind(), EnchantmentType::Sharpness);
        assert_eq!(decoded.level(), 3);

        assert!(EnchantmentInstance::from_tag(&entry(9, 0)).is_none());
        assert!(EnchantmentInstance::from_tag(&entry(0, 1)).is_none());
        assert!(EnchantmentInstance::from_tag(&entry(500, 1)).is_none());
        assert!(EnchantmentInstance::from_tag(&NbtCompound::new()).is_none());
    }

    #[test]
    fn test_entry_encoding() {
        let instance = EnchantmentInstance::new(EnchantmentType::Efficiency, 2).unwrap();
        let NbtTag::Compound(tag) = instance.to_tag() else {
            panic!("enchantment entries are compounds")
        };
        assert_eq!(tag.get_short(TAG_ID), Some(15));
        assert_eq!(tag.get_short(TAG_LEVEL), Some(2));
    }
}
