//! Serde serializer that flattens a struct into catalogued scalar fields
//!
//! Values go straight from `serialize_*` calls to [`ParamValue`], so floats
//! keep their exact bits (including `NaN` and infinities).

use serde::ser::{self, Impossible, Serialize};

use super::ParamValue;
use crate::{Error, Result};

const SCALARS_ONLY: &str = "only scalar values (string, integer, float, boolean) can be catalogued";

fn not_a_map() -> Error {
    Error::InvalidParameter("parameters must serialize to a map of named fields".to_string())
}

/// Top-level serializer: accepts structs and string-keyed maps.
pub(super) struct FieldCollector;

/// Accumulates `(name, value)` pairs of a struct or map.
pub(super) struct Fields {
    fields: Vec<(String, ParamValue)>,
    pending_key: Option<String>,
}

impl Fields {
    fn with_capacity(len: usize) -> Self {
        Self {
            fields: Vec::with_capacity(len),
            pending_key: None,
        }
    }
}

impl ser::SerializeStruct for Fields {
    type Ok = Vec<(String, ParamValue)>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let value = value.serialize(ScalarSerializer { name: key })?;
        self.fields.push((key.to_string(), value));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.fields)
    }
}

impl ser::SerializeMap for Fields {
    type Ok = Vec<(String, ParamValue)>;
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        match key.serialize(ScalarSerializer { name: "<key>" })? {
            ParamValue::Str(name) => {
                self.pending_key = Some(name);
                Ok(())
            }
            other => Err(Error::InvalidField {
                name: other.to_string(),
                reason: "field names must be strings".to_string(),
            }),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let name = self.pending_key.take().ok_or_else(not_a_map)?;
        let value = value.serialize(ScalarSerializer { name: &name })?;
        self.fields.push((name, value));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(self.fields)
    }
}

macro_rules! reject {
    ($($method:ident($($arg:ty),*);)*) => {
        $(fn $method(self, $(_: $arg),*) -> Result<Self::Ok> {
            Err(not_a_map())
        })*
    };
}

impl ser::Serializer for FieldCollector {
    type Ok = Vec<(String, ParamValue)>;
    type Error = Error;
    type SerializeSeq = Impossible<Self::Ok, Error>;
    type SerializeTuple = Impossible<Self::Ok, Error>;
    type SerializeTupleStruct = Impossible<Self::Ok, Error>;
    type SerializeTupleVariant = Impossible<Self::Ok, Error>;
    type SerializeMap = Fields;
    type SerializeStruct = Fields;
    type SerializeStructVariant = Impossible<Self::Ok, Error>;

    reject! {
        serialize_bool(bool);
        serialize_i8(i8);
        serialize_i16(i16);
        serialize_i32(i32);
        serialize_i64(i64);
        serialize_u8(u8);
        serialize_u16(u16);
        serialize_u32(u32);
        serialize_u64(u64);
        serialize_f32(f32);
        serialize_f64(f64);
        serialize_char(char);
        serialize_str(&str);
        serialize_bytes(&[u8]);
        serialize_none();
        serialize_unit();
        serialize_unit_struct(&'static str);
        serialize_unit_variant(&'static str, u32, &'static str);
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok> {
        Err(not_a_map())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(not_a_map())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(not_a_map())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(not_a_map())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(not_a_map())
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(Fields::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(Fields::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(not_a_map())
    }
}

/// Serializer for a single field value.
struct ScalarSerializer<'a> {
    name: &'a str,
}

impl ScalarSerializer<'_> {
    fn not_scalar(&self) -> Error {
        Error::InvalidField {
            name: self.name.to_string(),
            reason: SCALARS_ONLY.to_string(),
        }
    }
}

impl ser::Serializer for ScalarSerializer<'_> {
    type Ok = ParamValue;
    type Error = Error;
    type SerializeSeq = Impossible<ParamValue, Error>;
    type SerializeTuple = Impossible<ParamValue, Error>;
    type SerializeTupleStruct = Impossible<ParamValue, Error>;
    type SerializeTupleVariant = Impossible<ParamValue, Error>;
    type SerializeMap = Impossible<ParamValue, Error>;
    type SerializeStruct = Impossible<ParamValue, Error>;
    type SerializeStructVariant = Impossible<ParamValue, Error>;

    fn serialize_bool(self, v: bool) -> Result<ParamValue> {
        Ok(ParamValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<ParamValue> {
        Ok(ParamValue::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<ParamValue> {
        Ok(ParamValue::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<ParamValue> {
        i64::try_from(v)
            .map(ParamValue::Int)
            .map_err(|_| Error::InvalidField {
                name: self.name.to_string(),
                reason: format!("integer {v} does not fit in i64"),
            })
    }

    fn serialize_f32(self, v: f32) -> Result<ParamValue> {
        Ok(ParamValue::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<ParamValue> {
        Ok(ParamValue::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<ParamValue> {
        Ok(ParamValue::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ParamValue> {
        Ok(ParamValue::Str(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<ParamValue> {
        Err(self.not_scalar())
    }

    fn serialize_none(self) -> Result<ParamValue> {
        Err(self.not_scalar())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<ParamValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<ParamValue> {
        Err(self.not_scalar())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ParamValue> {
        Err(self.not_scalar())
    }

    // Fieldless enum variants are catalogued by (renamed) variant name
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<ParamValue> {
        Ok(ParamValue::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<ParamValue> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<ParamValue> {
        Err(self.not_scalar())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.not_scalar())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.not_scalar())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.not_scalar())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.not_scalar())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.not_scalar())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.not_scalar())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.not_scalar())
    }
}
