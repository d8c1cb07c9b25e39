use std::ops::Deref;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

pub mod compound;
pub mod tag;

pub use compound::NbtCompound;
pub use tag::NbtTag;

pub const END_ID: u8 = 0;
pub const BYTE_ID: u8 = 1;
pub const SHORT_ID: u8 = 2;
pub const INT_ID: u8 = 3;
pub const LONG_ID: u8 = 4;
pub const FLOAT_ID: u8 = 5;
pub const DOUBLE_ID: u8 = 6;
pub const BYTE_ARRAY_ID: u8 = 7;
pub const STRING_ID: u8 = 8;
pub const LIST_ID: u8 = 9;
pub const COMPOUND_ID: u8 = 10;
pub const INT_ARRAY_ID: u8 = 11;
pub const LONG_ARRAY_ID: u8 = 12;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("The root tag of the NBT file is not a compound tag. Received tag id: {0}")]
    NoRootCompound(u8),
    #[error("Encountered an unknown NBT tag id {0}.")]
    UnknownTagId(u8),
    #[error("Failed to Cesu 8 Decode")]
    Cesu8DecodingError,
    #[error("Unexpected end of NBT data, needed {needed} more bytes but only {remaining} remain")]
    UnexpectedEof { needed: usize, remaining: usize },
    #[error("Negative length {0} for NBT array or list")]
    NegativeLength(i32),
    #[error("List of end tags claims {0} elements")]
    NonEmptyEndList(usize),
    #[error("String of {0} bytes doesn't fit the 16-bit NBT length prefix")]
    StringTooLong(usize),
}

/// Fails with [`Error::UnexpectedEof`] unless `bytes` has at least `needed` bytes left.
pub(crate) fn ensure_remaining(bytes: &impl Buf, needed: usize) -> Result<(), Error> {
    let remaining = bytes.remaining();
    if remaining < needed {
        return Err(Error::UnexpectedEof { needed, remaining });
    }
    Ok(())
}

/// Reads a signed length prefix, rejecting negative values.
pub(crate) fn get_length(bytes: &mut impl Buf) -> Result<usize, Error> {
    ensure_remaining(bytes, 4)?;
    let len = bytes.get_i32();
    usize::try_from(len).map_err(|_| Error::NegativeLength(len))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Nbt {
    pub name: String,
    pub root_tag: NbtCompound,
}

impl Nbt {
    pub fn new(name: String, tag: NbtCompound) -> Self {
        Nbt {
            name,
            root_tag: tag,
        }
    }

    pub fn read(bytes: &mut impl Buf) -> Result<Nbt, Error> {
        ensure_remaining(bytes, 1)?;
        let tag_type_id = bytes.get_u8();

        if tag_type_id != COMPOUND_ID {
            return Err(Error::NoRootCompound(tag_type_id));
        }

        Ok(Nbt {
            name: get_nbt_string(bytes)?,
            root_tag: NbtCompound::deserialize_content(bytes)?,
        })
    }

    /// Reads NBT tag, that doesn't contain the name of root compound.
    pub fn read_unnamed(bytes: &mut impl Buf) -> Result<Nbt, Error> {
        ensure_remaining(bytes, 1)?;
        let tag_type_id = bytes.get_u8();

        if tag_type_id != COMPOUND_ID {
            return Err(Error::NoRootCompound(tag_type_id));
        }

        Ok(Nbt {
            name: String::new(),
            root_tag: NbtCompound::deserialize_content(bytes)?,
        })
    }

    pub fn write(&self) -> Result<Bytes, Error> {
        let mut bytes = BytesMut::new();
        bytes.put_u8(COMPOUND_ID);
        put_nbt_string(&mut bytes, &self.name)?;
        bytes.put(self.root_tag.serialize_content()?);
        Ok(bytes.freeze())
    }

    /// Writes NBT tag, without name of root compound.
    pub fn write_unnamed(&self) -> Result<Bytes, Error> {
        self.root_tag.to_bytes()
    }
}

impl Deref for Nbt {
    type Target = NbtCompound;

    fn deref(&self) -> &Self::Target {
        &self.root_tag
    }
}

impl From<NbtCompound> for Nbt {
    fn from(value: NbtCompound) -> Self {
        Nbt::new(String::new(), value)
    }
}

impl AsMut<NbtCompound> for Nbt {
    fn as_mut(&mut self) -> &mut NbtCompound {
        &mut self.root_tag
    }
}

pub fn get_nbt_string(bytes: &mut impl Buf) -> Result<String, Error> {
    ensure_remaining(bytes, 2)?;
    let len = bytes.get_u16() as usize;
    ensure_remaining(bytes, len)?;
    let string_bytes = bytes.copy_to_bytes(len);
    let string = cesu8::from_java_cesu8(&string_bytes).map_err(|_| Error::Cesu8DecodingError)?;
    Ok(string.to_string())
}

/// Fails with [`Error::StringTooLong`] when the encoded string doesn't fit a `u16` length,
/// nothing is written then.
pub fn put_nbt_string(bytes: &mut impl BufMut, string: &str) -> Result<(), Error> {
    let java_string = cesu8::to_java_cesu8(string);
    let len = u16::try_from(java_string.len())
        .map_err(|_| Error::StringTooLong(java_string.len()))?;
    bytes.put_u16(len);
    bytes.put_slice(&java_string);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_named_root_reserialize() {
        let mut compound = NbtCompound::new();
        compound.put("Count".to_string(), NbtTag::Byte(5));
        compound.put("id".to_string(), NbtTag::Short(1));
        let nbt = Nbt::new("item".to_string(), compound);

        let mut bytes = nbt.write().unwrap();
        let read = Nbt::read(&mut bytes).unwrap();
        assert_eq!(read, nbt);
        assert_eq!(read.get_short("id"), Some(1));
    }

    #[test]
    fn test_unnamed_root_reserialize() {
        let mut compound = NbtCompound::new();
        compound.put("Name".to_string(), "Sword");
        let nbt = Nbt::from(compound);

        let mut bytes = nbt.write_unnamed().unwrap();
        assert_eq!(Nbt::read_unnamed(&mut bytes).unwrap(), nbt);
    }

    #[test]
    fn test_root_must_be_compound() {
        let mut bytes = Bytes::from_static(&[STRING_ID, 0, 0]);
        assert_eq!(
            Nbt::read_unnamed(&mut bytes),
            Err(Error::NoRootCompound(STRING_ID))
        );
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        let mut compound = NbtCompound::new();
        compound.put("Damage".to_string(), NbtTag::Short(3));
        let full = Nbt::from(compound).write_unnamed().unwrap();

        let mut truncated = full.slice(..full.len() - 2);
        assert!(matches!(
            Nbt::read_unnamed(&mut truncated),
            Err(Error::UnexpectedEof { .. })
        ));
        assert!(matches!(
            Nbt::read_unnamed(&mut Bytes::new()),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_java_string_encoding() {
        let mut bytes = BytesMut::new();
        put_nbt_string(&mut bytes, "\u{1F383} gourd").unwrap();
        let mut bytes = bytes.freeze();
        assert_eq!(get_nbt_string(&mut bytes).unwrap(), "\u{1F383} gourd");
    }

    #[test]
    fn test_string_length_limit() {
        let mut bytes = BytesMut::new();
        put_nbt_string(&mut bytes, &"x".repeat(u16::MAX as usize)).unwrap();
        assert_eq!(bytes.len(), 2 + u16::MAX as usize);

        let mut bytes = BytesMut::new();
        assert_eq!(
            put_nbt_string(&mut bytes, &"x".repeat(70_000)),
            Err(Error::StringTooLong(70_000))
        );
        assert!(bytes.is_empty());

        let mut compound = NbtCompound::new();
        compound.put("Name".to_string(), "x".repeat(70_000));
        assert_eq!(compound.to_bytes(), Err(Error::StringTooLong(70_000)));
        assert!(Nbt::from(compound).write().is_err());
    }
}
