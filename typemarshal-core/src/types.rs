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
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Size of one native argument slot. Argument frames are laid out in
/// 32-bit slots; wider values span several.
pub const ARG_SLOT_SIZE: usize = 4;

/// Native size of a pointer in the emulated calling convention.
pub const POINTER_SIZE: usize = 4;

/// How deep size computation and default allocation follow records and
/// aliases before giving up on a self-referential description.
pub const MAX_LAYOUT_DEPTH: u32 = 32;

/// Parameter and field name that feeds interface id inference for
/// untyped interface references.
pub const RIID_NAME: &str = "riid";

/// Variant type tags. These double as the 4-byte tag written in front of
/// a variant payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[allow(non_camel_case_types)]
#[repr(u16)]
pub enum VarType {
    EMPTY = 0,
    NULL = 1,
    I2 = 2,
    I4 = 3,
    R4 = 4,
    R8 = 5,
    CY = 6,
    DATE = 7,
    BSTR = 8,
    DISPATCH = 9,
    ERROR = 10,
    BOOL = 11,
    VARIANT = 12,
    UNKNOWN = 13,
    DECIMAL = 14,
    I1 = 16,
    UI1 = 17,
    UI2 = 18,
    UI4 = 19,
    I8 = 20,
    UI8 = 21,
    INT = 22,
    UINT = 23,
    VOID = 24,
    HRESULT = 25,
    PTR = 26,
    SAFEARRAY = 27,
    CARRAY = 28,
    USERDEFINED = 29,
    LPSTR = 30,
    LPWSTR = 31,
    RECORD = 36,
}

impl VarType {
    pub fn from_tag(tag: u32) -> Result<VarType, Error> {
        u16::try_from(tag)
            .ok()
            .and_then(|t| VarType::try_from(t).ok())
            .ok_or_else(|| Error::unsupported_type_kind(format!("unknown variant tag {tag}")))
    }
}

/// Handle of a user-defined type inside a type library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(pub u32);

impl TypeRef {
    /// The `GUID` record every registry carries.
    pub const GUID: TypeRef = TypeRef(0);
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "href:{}", self.0)
    }
}

/// 16-byte interface identifier, stored in its in-memory GUID layout
/// (little-endian `data1`, `data2`, `data3`, then `data4` verbatim).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InterfaceId([u8; 16]);

impl InterfaceId {
    pub const NIL: InterfaceId = InterfaceId([0; 16]);

    /// Builds an id from its canonical 128-bit reading
    /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
    pub const fn from_u128(v: u128) -> InterfaceId {
        let data1 = ((v >> 96) as u32).to_le_bytes();
        let data2 = ((v >> 80) as u16).to_le_bytes();
        let data3 = ((v >> 64) as u16).to_le_bytes();
        let data4 = (v as u64).to_be_bytes();
        InterfaceId([
            data1[0], data1[1], data1[2], data1[3], data2[0], data2[1], data3[0], data3[1],
            data4[0], data4[1], data4[2], data4[3], data4[4], data4[5], data4[6], data4[7],
        ])
    }

    pub const fn from_bytes(bytes: [u8; 16]) -> InterfaceId {
        InterfaceId(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<InterfaceId, Error> {
        let raw: [u8; 16] = bytes.try_into().map_err(|_| {
            Error::invalid_data(format!("interface id needs 16 bytes, got {}", bytes.len()))
        })?;
        Ok(InterfaceId(raw))
    }

    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub fn data1(&self) -> u32 {
        u32::from_le_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn data2(&self) -> u16 {
        u16::from_le_bytes([self.0[4], self.0[5]])
    }

    pub fn data3(&self) -> u16 {
        u16::from_le_bytes([self.0[6], self.0[7]])
    }

    pub fn data4(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&self.0[8..]);
        out
    }
}

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d4 = self.data4();
        write!(
            f,
            "{{{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}}}",
            self.data1(),
            self.data2(),
            self.data3(),
            d4[0],
            d4[1],
            d4[2],
            d4[3],
            d4[4],
            d4[5],
            d4[6],
            d4[7]
        )
    }
}

impl fmt::Debug for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

pub const IID_IUNKNOWN: InterfaceId = InterfaceId::from_u128(0x00000000_0000_0000_c000_000000000046);
pub const IID_IDISPATCH: InterfaceId =
    InterfaceId::from_u128(0x00020400_0000_0000_c000_000000000046);

/// Ordinals of the root interface. Every interface inherits them.
pub mod ordinal {
    pub const QUERY_INTERFACE: u32 = 0;
    pub const ADD_REF: u32 = 1;
    pub const RELEASE: u32 = 2;
}
