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
use crate::meta::UserType;
use crate::resolver::TypeLibrary;
use crate::types::{TypeRef, VarType, ARG_SLOT_SIZE, MAX_LAYOUT_DEPTH, POINTER_SIZE};

/// Recursive description of a value's shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// No value; only meaningful as a method's return type.
    Void,
    /// Variant payload kinds that carry no bytes.
    Empty,
    Null,
    Bool,
    I1,
    U1,
    I2,
    U2,
    I4,
    U4,
    I8,
    U8,
    Int,
    UInt,
    R4,
    R8,
    Currency,
    Date,
    HResult,
    /// SCODE carried as a value.
    Error,
    /// Length-prefixed string.
    Bstr,
    /// Self-describing value carrying its own tag.
    Variant,
    Ptr(Box<TypeDesc>),
    UserDefined(TypeRef),
    /// Reference to the root interface.
    Unknown,
    /// Reference to the automation interface.
    Dispatch,
    /// Interface reference whose id is only known from a sibling `riid`.
    UntypedInterface,
    // Kinds a type library may describe but the walker refuses.
    Decimal,
    LpStr,
    LpWStr,
    SafeArray(Box<TypeDesc>),
    CArray(Box<TypeDesc>, u32),
}

impl TypeDesc {
    pub fn ptr(pointee: TypeDesc) -> TypeDesc {
        TypeDesc::Ptr(Box::new(pointee))
    }

    /// The `GUID` record, by value.
    pub fn guid() -> TypeDesc {
        TypeDesc::UserDefined(TypeRef::GUID)
    }

    /// Synthetic descriptor for a variant tag.
    pub fn from_var_type(vt: VarType) -> Result<TypeDesc, Error> {
        let desc = match vt {
            VarType::EMPTY => TypeDesc::Empty,
            VarType::NULL => TypeDesc::Null,
            VarType::I2 => TypeDesc::I2,
            VarType::I4 => TypeDesc::I4,
            VarType::R4 => TypeDesc::R4,
            VarType::R8 => TypeDesc::R8,
            VarType::CY => TypeDesc::Currency,
            VarType::DATE => TypeDesc::Date,
            VarType::BSTR => TypeDesc::Bstr,
            VarType::DISPATCH => TypeDesc::Dispatch,
            VarType::ERROR => TypeDesc::Error,
            VarType::BOOL => TypeDesc::Bool,
            VarType::UNKNOWN => TypeDesc::Unknown,
            VarType::I1 => TypeDesc::I1,
            VarType::UI1 => TypeDesc::U1,
            VarType::UI2 => TypeDesc::U2,
            VarType::UI4 => TypeDesc::U4,
            VarType::I8 => TypeDesc::I8,
            VarType::UI8 => TypeDesc::U8,
            VarType::INT => TypeDesc::Int,
            VarType::UINT => TypeDesc::UInt,
            VarType::HRESULT => TypeDesc::HResult,
            other => {
                return Err(Error::unsupported_type_kind(format!(
                    "{other:?} cannot be carried inside a variant"
                )))
            }
        };
        Ok(desc)
    }

    pub fn var_type(&self) -> VarType {
        match self {
            TypeDesc::Void => VarType::VOID,
            TypeDesc::Empty => VarType::EMPTY,
            TypeDesc::Null => VarType::NULL,
            TypeDesc::Bool => VarType::BOOL,
            TypeDesc::I1 => VarType::I1,
            TypeDesc::U1 => VarType::UI1,
            TypeDesc::I2 => VarType::I2,
            TypeDesc::U2 => VarType::UI2,
            TypeDesc::I4 => VarType::I4,
            TypeDesc::U4 => VarType::UI4,
            TypeDesc::I8 => VarType::I8,
            TypeDesc::U8 => VarType::UI8,
            TypeDesc::Int => VarType::INT,
            TypeDesc::UInt => VarType::UINT,
            TypeDesc::R4 => VarType::R4,
            TypeDesc::R8 => VarType::R8,
            TypeDesc::Currency => VarType::CY,
            TypeDesc::Date => VarType::DATE,
            TypeDesc::HResult => VarType::HRESULT,
            TypeDesc::Error => VarType::ERROR,
            TypeDesc::Bstr => VarType::BSTR,
            TypeDesc::Variant => VarType::VARIANT,
            TypeDesc::Ptr(_) | TypeDesc::UntypedInterface => VarType::PTR,
            TypeDesc::UserDefined(_) => VarType::USERDEFINED,
            TypeDesc::Unknown => VarType::UNKNOWN,
            TypeDesc::Dispatch => VarType::DISPATCH,
            TypeDesc::Decimal => VarType::DECIMAL,
            TypeDesc::LpStr => VarType::LPSTR,
            TypeDesc::LpWStr => VarType::LPWSTR,
            TypeDesc::SafeArray(_) => VarType::SAFEARRAY,
            TypeDesc::CArray(..) => VarType::CARRAY,
        }
    }

    /// Size the value occupies in native memory. Records are packed.
    pub fn native_size(&self, library: &dyn TypeLibrary) -> Result<usize, Error> {
        self.native_size_at(library, 0)
    }

    pub(crate) fn native_size_at(
        &self,
        library: &dyn TypeLibrary,
        depth: u32,
    ) -> Result<usize, Error> {
        if depth > MAX_LAYOUT_DEPTH {
            return Err(Error::depth_exceed(format!(
                "size of {:?} nests deeper than {MAX_LAYOUT_DEPTH}",
                self.var_type()
            )));
        }
        let size = match self {
            TypeDesc::Void | TypeDesc::Empty | TypeDesc::Null => 0,
            TypeDesc::I1 | TypeDesc::U1 => 1,
            TypeDesc::Bool | TypeDesc::I2 | TypeDesc::U2 => 2,
            TypeDesc::I4
            | TypeDesc::U4
            | TypeDesc::Int
            | TypeDesc::UInt
            | TypeDesc::R4
            | TypeDesc::HResult
            | TypeDesc::Error => 4,
            TypeDesc::I8 | TypeDesc::U8 | TypeDesc::R8 | TypeDesc::Currency | TypeDesc::Date => 8,
            TypeDesc::Variant | TypeDesc::Decimal => 16,
            TypeDesc::Bstr
            | TypeDesc::Ptr(_)
            | TypeDesc::Unknown
            | TypeDesc::Dispatch
            | TypeDesc::UntypedInterface
            | TypeDesc::LpStr
            | TypeDesc::LpWStr
            | TypeDesc::SafeArray(_) => POINTER_SIZE,
            TypeDesc::CArray(elem, count) => elem.native_size_at(library, depth + 1)? * *count as usize,
            TypeDesc::UserDefined(href) => match library.user_type(*href) {
                Some(UserType::Record(layout)) => layout.native_size_at(library, depth + 1)?,
                Some(UserType::Alias(target)) => target.native_size_at(library, depth + 1)?,
                Some(UserType::Interface(_)) => POINTER_SIZE,
                Some(UserType::Enum) => 4,
                None => return Err(Error::unknown_type(*href)),
            },
        };
        Ok(size)
    }

    /// Number of 32-bit argument slots a value of this type consumes when
    /// passed by value. Eight-byte scalars take two, variants four, records
    /// their rounded-up layout size.
    pub fn stack_slots(&self, library: &dyn TypeLibrary) -> Result<usize, Error> {
        let size = self.native_size(library)?;
        Ok(size.div_ceil(ARG_SLOT_SIZE).max(1))
    }
}
