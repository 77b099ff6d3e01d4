// src/application/codec/finite.rs
//! Walks a context before encoding and rejects non-finite floats, which JSON
//! would otherwise write as `null` and never read back as a number.
use serde::ser::{
    self, Serialize, SerializeMap, SerializeSeq, SerializeStruct,
    SerializeStructVariant, SerializeTuple, SerializeTupleStruct, SerializeTupleVariant,
};
use std::fmt;

#[derive(Debug)]
pub struct NonFiniteFloat(String);

impl fmt::Display for NonFiniteFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for NonFiniteFloat {}

impl ser::Error for NonFiniteFloat {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

pub fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<(), NonFiniteFloat> {
    value.serialize(&mut FiniteCheck)
}

struct FiniteCheck;

impl FiniteCheck {
    fn check(value: f64) -> Result<(), NonFiniteFloat> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(NonFiniteFloat(format!("non-finite float {value} cannot be stored")))
        }
    }
}

impl ser::Serializer for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_i8(self, _v: i8) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_i16(self, _v: i16) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_i32(self, _v: i32) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_i64(self, _v: i64) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_i128(self, _v: i128) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_u8(self, _v: u8) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_u16(self, _v: u16) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_u32(self, _v: u32) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_u64(self, _v: u64) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_u128(self, _v: u128) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), NonFiniteFloat> {
        FiniteCheck::check(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), NonFiniteFloat> {
        FiniteCheck::check(v)
    }

    fn serialize_char(self, _v: char) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_str(self, _v: &str) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), NonFiniteFloat> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, NonFiniteFloat> {
        Ok(self)
    }
}

impl SerializeSeq for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeTuple for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeTupleStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeTupleVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeMap for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), NonFiniteFloat> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}

impl SerializeStructVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = NonFiniteFloat;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _key: &'static str,
        value: &T,
    ) -> Result<(), NonFiniteFloat> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), NonFiniteFloat> {
        Ok(())
    }
}
