// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::error::Error;
use crate::object::InterfaceRef;
use crate::types::{InterfaceId, VarType, ARG_SLOT_SIZE, POINTER_SIZE};
use std::fmt;
use std::sync::Arc;

/// A dynamically typed argument, field, return value or variant payload.
///
/// The walker checks every value against the descriptor it is marshaled
/// with; a value of the wrong shape is a [`Error::TypeMismatch`].
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Empty,
    Null,
    Bool(bool),
    I1(i8),
    U1(u8),
    I2(i16),
    U2(u16),
    I4(i32),
    U4(u32),
    I8(i64),
    U8(u64),
    Int(i32),
    UInt(u32),
    R4(f32),
    R8(f64),
    /// Fixed-point currency scaled by 10 000.
    Currency(i64),
    /// Days since 1899-12-30 with the time of day as fraction.
    Date(f64),
    HResult(i32),
    Error(i32),
    Str(String),
    Variant(Box<Value>),
    Ptr(Option<Box<Value>>),
    /// Field values in layout order.
    Record(Vec<Value>),
    Interface(Option<InterfaceRef>),
}

impl Value {
    pub fn ptr(pointee: Value) -> Value {
        Value::Ptr(Some(Box::new(pointee)))
    }

    pub fn null_ptr() -> Value {
        Value::Ptr(None)
    }

    pub fn variant(inner: Value) -> Value {
        Value::Variant(Box::new(inner))
    }

    pub fn interface(object: InterfaceRef) -> Value {
        Value::Interface(Some(object))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "Empty",
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I1(_) => "I1",
            Value::U1(_) => "U1",
            Value::I2(_) => "I2",
            Value::U2(_) => "U2",
            Value::I4(_) => "I4",
            Value::U4(_) => "U4",
            Value::I8(_) => "I8",
            Value::U8(_) => "U8",
            Value::Int(_) => "Int",
            Value::UInt(_) => "UInt",
            Value::R4(_) => "R4",
            Value::R8(_) => "R8",
            Value::Currency(_) => "Currency",
            Value::Date(_) => "Date",
            Value::HResult(_) => "HResult",
            Value::Error(_) => "Error",
            Value::Str(_) => "Str",
            Value::Variant(_) => "Variant",
            Value::Ptr(_) => "Ptr",
            Value::Record(_) => "Record",
            Value::Interface(_) => "Interface",
        }
    }

    /// Tag written in front of this value when it is a variant payload.
    ///
    /// Interface references carry no interface id, so every one is tagged
    /// `VT_UNKNOWN`: a variant that arrived as `VT_DISPATCH` goes back out
    /// as `VT_UNKNOWN`, marshaled for `IID_IUNKNOWN`.
    pub fn var_type(&self) -> Result<VarType, Error> {
        let vt = match self {
            Value::Empty => VarType::EMPTY,
            Value::Null => VarType::NULL,
            Value::Bool(_) => VarType::BOOL,
            Value::I1(_) => VarType::I1,
            Value::U1(_) => VarType::UI1,
            Value::I2(_) => VarType::I2,
            Value::U2(_) => VarType::UI2,
            Value::I4(_) => VarType::I4,
            Value::U4(_) => VarType::UI4,
            Value::I8(_) => VarType::I8,
            Value::U8(_) => VarType::UI8,
            Value::Int(_) => VarType::INT,
            Value::UInt(_) => VarType::UINT,
            Value::R4(_) => VarType::R4,
            Value::R8(_) => VarType::R8,
            Value::Currency(_) => VarType::CY,
            Value::Date(_) => VarType::DATE,
            Value::HResult(_) => VarType::HRESULT,
            Value::Error(_) => VarType::ERROR,
            Value::Str(_) => VarType::BSTR,
            Value::Interface(_) => VarType::UNKNOWN,
            Value::Variant(_) | Value::Ptr(_) | Value::Record(_) => {
                return Err(Error::unsupported_type_kind(format!(
                    "{} cannot be carried inside a variant",
                    self.kind_name()
                )))
            }
        };
        Ok(vt)
    }

    /// Size in native memory; mirrors [`TypeDesc::native_size`].
    ///
    /// [`TypeDesc::native_size`]: crate::meta::TypeDesc::native_size
    pub fn native_size(&self) -> usize {
        match self {
            Value::Empty | Value::Null => 0,
            Value::I1(_) | Value::U1(_) => 1,
            Value::Bool(_) | Value::I2(_) | Value::U2(_) => 2,
            Value::I4(_)
            | Value::U4(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::R4(_)
            | Value::HResult(_)
            | Value::Error(_) => 4,
            Value::I8(_) | Value::U8(_) | Value::R8(_) | Value::Currency(_) | Value::Date(_) => 8,
            Value::Variant(_) => 16,
            Value::Str(_) | Value::Ptr(_) | Value::Interface(_) => POINTER_SIZE,
            Value::Record(fields) => fields.iter().map(Value::native_size).sum(),
        }
    }

    /// Argument slots this value spans in an [`ArgFrame`](crate::frame::ArgFrame).
    pub fn stack_slots(&self) -> usize {
        self.native_size().div_ceil(ARG_SLOT_SIZE).max(1)
    }

    /// Reads a `GUID` record back as an interface id.
    pub fn as_interface_id(&self) -> Option<InterfaceId> {
        match self {
            Value::Record(fields) => match fields.as_slice() {
                [Value::U4(d1), Value::U2(d2), Value::U2(d3), Value::U8(d4)] => {
                    let mut raw = [0u8; 16];
                    raw[0..4].copy_from_slice(&d1.to_le_bytes());
                    raw[4..6].copy_from_slice(&d2.to_le_bytes());
                    raw[6..8].copy_from_slice(&d3.to_le_bytes());
                    raw[8..16].copy_from_slice(&d4.to_le_bytes());
                    Some(InterfaceId::from_bytes(raw))
                }
                _ => None,
            },
            Value::Ptr(Some(inner)) => inner.as_interface_id(),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceRef> {
        match self {
            Value::Interface(Some(obj)) => Some(obj),
            Value::Ptr(Some(inner)) | Value::Variant(inner) => inner.as_interface(),
            _ => None,
        }
    }

    pub fn pointee(&self) -> Option<&Value> {
        match self {
            Value::Ptr(Some(inner)) => Some(inner),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Ptr(None) | Value::Interface(None) | Value::Null)
    }
}

impl From<InterfaceId> for Value {
    fn from(iid: InterfaceId) -> Self {
        let d4 = u64::from_le_bytes(iid.data4());
        Value::Record(vec![
            Value::U4(iid.data1()),
            Value::U2(iid.data2()),
            Value::U2(iid.data3()),
            Value::U8(d4),
        ])
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    i8 => I1,
    u8 => U1,
    i16 => I2,
    u16 => U2,
    i32 => I4,
    u32 => U4,
    i64 => I8,
    u64 => U8,
    f32 => R4,
    f64 => R8,
    String => Str
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<InterfaceRef> for Value {
    fn from(object: InterfaceRef) -> Self {
        Value::Interface(Some(object))
    }
}

fn same_object(a: &InterfaceRef, b: &InterfaceRef) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Empty, Empty) | (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (I1(a), I1(b)) => a == b,
            (U1(a), U1(b)) => a == b,
            (I2(a), I2(b)) => a == b,
            (U2(a), U2(b)) => a == b,
            (I4(a), I4(b)) | (Int(a), Int(b)) | (HResult(a), HResult(b)) | (Error(a), Error(b)) => {
                a == b
            }
            (U4(a), U4(b)) | (UInt(a), UInt(b)) => a == b,
            (I8(a), I8(b)) | (Currency(a), Currency(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (R4(a), R4(b)) => a == b,
            (R8(a), R8(b)) | (Date(a), Date(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Variant(a), Variant(b)) => a == b,
            (Ptr(a), Ptr(b)) => a == b,
            (Record(a), Record(b)) => a == b,
            (Interface(None), Interface(None)) => true,
            (Interface(Some(a)), Interface(Some(b))) => same_object(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("Empty"),
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::I1(v) => write!(f, "I1({v})"),
            Value::U1(v) => write!(f, "U1({v})"),
            Value::I2(v) => write!(f, "I2({v})"),
            Value::U2(v) => write!(f, "U2({v})"),
            Value::I4(v) => write!(f, "I4({v})"),
            Value::U4(v) => write!(f, "U4({v})"),
            Value::I8(v) => write!(f, "I8({v})"),
            Value::U8(v) => write!(f, "U8({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::UInt(v) => write!(f, "UInt({v})"),
            Value::R4(v) => write!(f, "R4({v})"),
            Value::R8(v) => write!(f, "R8({v})"),
            Value::Currency(v) => write!(f, "Currency({v})"),
            Value::Date(v) => write!(f, "Date({v})"),
            Value::HResult(v) => write!(f, "HResult(0x{:08x})", *v as u32),
            Value::Error(v) => write!(f, "Error(0x{:08x})", *v as u32),
            Value::Str(v) => write!(f, "Str({v:?})"),
            Value::Variant(v) => write!(f, "Variant({v:?})"),
            Value::Ptr(None) => f.write_str("Ptr(null)"),
            Value::Ptr(Some(v)) => write!(f, "Ptr({v:?})"),
            Value::Record(fields) => f.debug_tuple("Record").field(fields).finish(),
            Value::Interface(None) => f.write_str("Interface(null)"),
            Value::Interface(Some(obj)) => {
                write!(f, "Interface({:p})", Arc::as_ptr(obj) as *const ())
            }
        }
    }
}
