use crate::tag::NbtTag;
use crate::{ensure_remaining, get_nbt_string, put_nbt_string, Error, Nbt, END_ID};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::vec::IntoIter;

/// Named child tags, kept in insertion order.
///
/// Order only matters for the bytes written out. Two compounds compare equal when they hold the
/// same keys with equal values, whatever order the keys were inserted in.
#[derive(Clone, Debug, Default)]
pub struct NbtCompound {
    pub child_tags: Vec<(String, NbtTag)>,
}

impl NbtCompound {
    pub fn new() -> NbtCompound {
        NbtCompound {
            child_tags: Vec::new(),
        }
    }

    pub fn deserialize_content(bytes: &mut impl Buf) -> Result<NbtCompound, Error> {
        let mut compound = NbtCompound::new();

        loop {
            ensure_remaining(bytes, 1)?;
            let tag_id = bytes.get_u8();
            if tag_id == END_ID {
                break;
            }

            let name = get_nbt_string(bytes)?;
            let tag = NbtTag::deserialize_data(bytes, tag_id)?;
            compound.put(name, tag);
        }

        Ok(compound)
    }

    pub fn serialize_content(&self) -> Result<Bytes, Error> {
        let mut bytes = BytesMut::new();
        for (name, tag) in &self.child_tags {
            bytes.put_u8(tag.get_type_id());
            put_nbt_string(&mut bytes, name)?;
            bytes.put(tag.serialize_data()?);
        }
        bytes.put_u8(END_ID);
        Ok(bytes.freeze())
    }

    /// Writes this compound as an unnamed root.
    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        let mut bytes = BytesMut::new();
        bytes.put_u8(crate::COMPOUND_ID);
        bytes.put(self.serialize_content()?);
        Ok(bytes.freeze())
    }

    /// Reads a compound written by [`NbtCompound::to_bytes`].
    pub fn from_bytes(mut bytes: &[u8]) -> Result<NbtCompound, Error> {
        Nbt::read_unnamed(&mut bytes).map(NbtCompound::from)
    }

    /// Sets `name` to `value`. An existing entry keeps its position and has its value replaced.
    pub fn put(&mut self, name: String, value: impl Into<NbtTag>) {
        let value = value.into();
        match self.child_tags.iter_mut().find(|(key, _)| key == &name) {
            Some((_, existing)) => *existing = value,
            None => self.child_tags.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<NbtTag> {
        let index = self.child_tags.iter().position(|(key, _)| key == name)?;
        Some(self.child_tags.remove(index).1)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.child_tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.child_tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &NbtTag)> {
        self.child_tags.iter().map(|(key, value)| (key, value))
    }

    pub fn get_byte(&self, name: &str) -> Option<i8> {
        self.get(name).and_then(|tag| tag.extract_byte())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        for (key, value) in &self.child_tags {
            if key.as_str() == name {
                return Some(value);
            }
        }
        None
    }

    pub fn get_short(&self, name: &str) -> Option<i16> {
        self.get(name).and_then(|tag| tag.extract_short())
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|tag| tag.extract_int())
    }

    pub fn get_long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|tag| tag.extract_long())
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|tag| tag.extract_float())
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|tag| tag.extract_double())
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|tag| tag.extract_bool())
    }

    pub fn get_string(&self, name: &str) -> Option<&String> {
        self.get(name).and_then(|tag| tag.extract_string())
    }

    pub fn get_list(&self, name: &str) -> Option<&Vec<NbtTag>> {
        self.get(name).and_then(|tag| tag.extract_list())
    }

    pub fn get_compound(&self, name: &str) -> Option<&NbtCompound> {
        self.get(name).and_then(|tag| tag.extract_compound())
    }

    pub fn get_int_array(&self, name: &str) -> Option<&Vec<i32>> {
        self.get(name).and_then(|tag| tag.extract_int_array())
    }

    pub fn get_long_array(&self, name: &str) -> Option<&Vec<i64>> {
        self.get(name).and_then(|tag| tag.extract_long_array())
    }
}

impl PartialEq for NbtCompound {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .child_tags
                .iter()
                .all(|(key, value)| other.get(key) == Some(value))
    }
}

impl From<Nbt> for NbtCompound {
    fn from(value: Nbt) -> Self {
        value.root_tag
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        let mut compound = NbtCompound::new();
        for (key, value) in iter {
            compound.put(key, value);
        }
        compound
    }
}

impl IntoIterator for NbtCompound {
    type Item = (String, NbtTag);
    type IntoIter = IntoIter<(String, NbtTag)>;

    fn into_iter(self) -> Self::IntoIter {
        self.child_tags.into_iter()
    }
}

impl Extend<(String, NbtTag)> for NbtCompound {
    fn extend<T: IntoIterator<Item = (String, NbtTag)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

// Rust's AsRef is currently not reflexive so we need to implement it manually
impl AsRef<NbtCompound> for NbtCompound {
    fn as_ref(&self) -> &NbtCompound {
        self
    }
}
