use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::compound::NbtCompound;
use crate::*;

#[derive(Clone, Debug)]
#[repr(u8)]
pub enum NbtTag {
    End = END_ID,
    Byte(i8) = BYTE_ID,
    Short(i16) = SHORT_ID,
    Int(i32) = INT_ID,
    Long(i64) = LONG_ID,
    Float(f32) = FLOAT_ID,
    Double(f64) = DOUBLE_ID,
    ByteArray(Bytes) = BYTE_ARRAY_ID,
    String(String) = STRING_ID,
    List(Vec<NbtTag>) = LIST_ID,
    Compound(NbtCompound) = COMPOUND_ID,
    IntArray(Vec<i32>) = INT_ARRAY_ID,
    LongArray(Vec<i64>) = LONG_ARRAY_ID,
}

impl NbtTag {
    /// Returns the numeric id associated with the data type.
    pub const fn get_type_id(&self) -> u8 {
        // See https://doc.rust-lang.org/reference/items/enumerations.html#pointer-casting
        unsafe { *(self as *const Self as *const u8) }
    }

    /// Human readable name of the tag kind, used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            NbtTag::End => "end",
            NbtTag::Byte(_) => "byte",
            NbtTag::Short(_) => "short",
            NbtTag::Int(_) => "int",
            NbtTag::Long(_) => "long",
            NbtTag::Float(_) => "float",
            NbtTag::Double(_) => "double",
            NbtTag::ByteArray(_) => "byte array",
            NbtTag::String(_) => "string",
            NbtTag::List(_) => "list",
            NbtTag::Compound(_) => "compound",
            NbtTag::IntArray(_) => "int array",
            NbtTag::LongArray(_) => "long array",
        }
    }

    pub fn serialize(&self) -> Result<Bytes, Error> {
        let mut bytes = BytesMut::new();
        bytes.put_u8(self.get_type_id());
        bytes.put(self.serialize_data()?);
        Ok(bytes.freeze())
    }

    pub fn serialize_data(&self) -> Result<Bytes, Error> {
        let mut bytes = BytesMut::new();
        match self {
            NbtTag::End => {}
            NbtTag::Byte(byte) => bytes.put_i8(*byte),
            NbtTag::Short(short) => bytes.put_i16(*short),
            NbtTag::Int(int) => bytes.put_i32(*int),
            NbtTag::Long(long) => bytes.put_i64(*long),
            NbtTag::Float(float) => bytes.put_f32(*float),
            NbtTag::Double(double) => bytes.put_f64(*double),
            NbtTag::ByteArray(byte_array) => {
                bytes.put_i32(byte_array.len() as i32);
                bytes.put_slice(byte_array);
            }
            NbtTag::String(string) => put_nbt_string(&mut bytes, string)?,
            NbtTag::List(list) => {
                bytes.put_u8(list.first().unwrap_or(&NbtTag::End).get_type_id());
                bytes.put_i32(list.len() as i32);
                for nbt_tag in list {
                    bytes.put(nbt_tag.serialize_data()?)
                }
            }
            NbtTag::Compound(compound) => {
                bytes.put(compound.serialize_content()?);
            }
            NbtTag::IntArray(int_array) => {
                bytes.put_i32(int_array.len() as i32);
                for int in int_array {
                    bytes.put_i32(*int)
                }
            }
            NbtTag::LongArray(long_array) => {
                bytes.put_i32(long_array.len() as i32);
                for long in long_array {
                    bytes.put_i64(*long)
                }
            }
        }
        Ok(bytes.freeze())
    }

    pub fn deserialize(bytes: &mut impl Buf) -> Result<NbtTag, Error> {
        ensure_remaining(bytes, 1)?;
        let tag_id = bytes.get_u8();
        Self::deserialize_data(bytes, tag_id)
    }

    pub fn deserialize_data(bytes: &mut impl Buf, tag_id: u8) -> Result<NbtTag, Error> {
        match tag_id {
            END_ID => Ok(NbtTag::End),
            BYTE_ID => {
                ensure_remaining(bytes, 1)?;
                Ok(NbtTag::Byte(bytes.get_i8()))
            }
            SHORT_ID => {
                ensure_remaining(bytes, 2)?;
                Ok(NbtTag::Short(bytes.get_i16()))
            }
            INT_ID => {
                ensure_remaining(bytes, 4)?;
                Ok(NbtTag::Int(bytes.get_i32()))
            }
            LONG_ID => {
                ensure_remaining(bytes, 8)?;
                Ok(NbtTag::Long(bytes.get_i64()))
            }
            FLOAT_ID => {
                ensure_remaining(bytes, 4)?;
                Ok(NbtTag::Float(bytes.get_f32()))
            }
            DOUBLE_ID => {
                ensure_remaining(bytes, 8)?;
                Ok(NbtTag::Double(bytes.get_f64()))
            }
            BYTE_ARRAY_ID => {
                let len = get_length(bytes)?;
                ensure_remaining(bytes, len)?;
                Ok(NbtTag::ByteArray(bytes.copy_to_bytes(len)))
            }
            STRING_ID => Ok(NbtTag::String(get_nbt_string(bytes)?)),
            LIST_ID => {
                ensure_remaining(bytes, 1)?;
                let tag_type_id = bytes.get_u8();
                let len = get_length(bytes)?;
                // Every element takes at least one byte, end tags only appear in empty lists.
                if tag_type_id == END_ID && len > 0 {
                    return Err(Error::NonEmptyEndList(len));
                }
                ensure_remaining(bytes, len)?;
                let mut list = Vec::with_capacity(len);
                for _ in 0..len {
                    list.push(NbtTag::deserialize_data(bytes, tag_type_id)?);
                }
                Ok(NbtTag::List(list))
            }
            COMPOUND_ID => Ok(NbtTag::Compound(NbtCompound::deserialize_content(bytes)?)),
            INT_ARRAY_ID => {
                let len = get_length(bytes)?;
                ensure_remaining(bytes, len.saturating_mul(4))?;
                let mut int_array = Vec::with_capacity(len);
                for _ in 0..len {
                    int_array.push(bytes.get_i32());
                }
                Ok(NbtTag::IntArray(int_array))
            }
            LONG_ARRAY_ID => {
                let len = get_length(bytes)?;
                ensure_remaining(bytes, len.saturating_mul(8))?;
                let mut long_array = Vec::with_capacity(len);
                for _ in 0..len {
                    long_array.push(bytes.get_i64());
                }
                Ok(NbtTag::LongArray(long_array))
            }
            _ => Err(Error::UnknownTagId(tag_id)),
        }
    }

    /// Returns the element tag id of a list, `None` for non-lists.
    ///
    /// Empty lists report [`END_ID`], the same id they are written with.
    pub fn list_type(&self) -> Option<u8> {
        match self {
            NbtTag::List(list) => Some(list.first().map_or(END_ID, NbtTag::get_type_id)),
            _ => None,
        }
    }

    pub fn extract_byte(&self) -> Option<i8> {
        match self {
            NbtTag::Byte(byte) => Some(*byte),
            _ => None,
        }
    }

    pub fn extract_short(&self) -> Option<i16> {
        match self {
            NbtTag::Short(short) => Some(*short),
            _ => None,
        }
    }

    pub fn extract_int(&self) -> Option<i32> {
        match self {
            NbtTag::Int(int) => Some(*int),
            _ => None,
        }
    }

    pub fn extract_long(&self) -> Option<i64> {
        match self {
            NbtTag::Long(long) => Some(*long),
            _ => None,
        }
    }

    pub fn extract_float(&self) -> Option<f32> {
        match self {
            NbtTag::Float(float) => Some(*float),
            _ => None,
        }
    }

    pub fn extract_double(&self) -> Option<f64> {
        match self {
            NbtTag::Double(double) => Some(*double),
            _ => None,
        }
    }

    pub fn extract_bool(&self) -> Option<bool> {
        match self {
            NbtTag::Byte(byte) => Some(*byte != 0),
            _ => None,
        }
    }

    pub fn extract_byte_array(&self) -> Option<Bytes> {
        match self {
            // Note: Bytes are free to clone, so we can hand out an owned type
            NbtTag::ByteArray(byte_array) => Some(byte_array.clone()),
            _ => None,
        }
    }

    pub fn extract_string(&self) -> Option<&String> {
        match self {
            NbtTag::String(string) => Some(string),
            _ => None,
        }
    }

    pub fn extract_list(&self) -> Option<&Vec<NbtTag>> {
        match self {
            NbtTag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn extract_compound(&self) -> Option<&NbtCompound> {
        match self {
            NbtTag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn extract_int_array(&self) -> Option<&Vec<i32>> {
        match self {
            NbtTag::IntArray(int_array) => Some(int_array),
            _ => None,
        }
    }

    pub fn extract_long_array(&self) -> Option<&Vec<i64>> {
        match self {
            NbtTag::LongArray(long_array) => Some(long_array),
            _ => None,
        }
    }
}

/// Floats compare by bit pattern, so a tag always equals its own clone, NaN included.
impl PartialEq for NbtTag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NbtTag::End, NbtTag::End) => true,
            (NbtTag::Byte(a), NbtTag::Byte(b)) => a == b,
            (NbtTag::Short(a), NbtTag::Short(b)) => a == b,
            (NbtTag::Int(a), NbtTag::Int(b)) => a == b,
            (NbtTag::Long(a), NbtTag::Long(b)) => a == b,
            (NbtTag::Float(a), NbtTag::Float(b)) => a.to_bits() == b.to_bits(),
            (NbtTag::Double(a), NbtTag::Double(b)) => a.to_bits() == b.to_bits(),
            (NbtTag::ByteArray(a), NbtTag::ByteArray(b)) => a == b,
            (NbtTag::String(a), NbtTag::String(b)) => a == b,
            (NbtTag::List(a), NbtTag::List(b)) => a == b,
            (NbtTag::Compound(a), NbtTag::Compound(b)) => a == b,
            (NbtTag::IntArray(a), NbtTag::IntArray(b)) => a == b,
            (NbtTag::LongArray(a), NbtTag::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for NbtTag {
    fn from(value: &str) -> Self {
        NbtTag::String(value.to_string())
    }
}

impl From<String> for NbtTag {
    fn from(value: String) -> Self {
        NbtTag::String(value)
    }
}

impl From<&[u8]> for NbtTag {
    fn from(value: &[u8]) -> Self {
        NbtTag::ByteArray(Bytes::copy_from_slice(value))
    }
}

impl From<bool> for NbtTag {
    fn from(value: bool) -> Self {
        NbtTag::Byte(value as i8)
    }
}

impl From<i8> for NbtTag {
    fn from(value: i8) -> Self {
        NbtTag::Byte(value)
    }
}

impl From<i16> for NbtTag {
    fn from(value: i16) -> Self {
        NbtTag::Short(value)
    }
}

impl From<i32> for NbtTag {
    fn from(value: i32) -> Self {
        NbtTag::Int(value)
    }
}

impl From<NbtCompound> for NbtTag {
    fn from(value: NbtCompound) -> Self {
        NbtTag::Compound(value)
    }
}

impl From<Vec<NbtTag>> for NbtTag {
    fn from(value: Vec<NbtTag>) -> Self {
        NbtTag::List(value)
    }
}
