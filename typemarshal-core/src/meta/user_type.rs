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
use crate::meta::TypeDesc;
use crate::resolver::TypeLibrary;
use crate::types::InterfaceId;

/// What a [`TypeDesc::UserDefined`] reference resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserType {
    /// Plain sequence of typed fields, copied by value.
    Record(RecordLayout),
    /// Reference to a live object implementing this interface.
    Interface(InterfaceId),
    /// Typedef of another descriptor.
    Alias(TypeDesc),
    /// Enumeration, carried as a 4-byte integer.
    Enum,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDesc {
    pub name: String,
    pub ty: TypeDesc,
}

impl FieldDesc {
    pub fn new(name: impl Into<String>, ty: TypeDesc) -> FieldDesc {
        FieldDesc {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    pub name: String,
    pub fields: Vec<FieldDesc>,
}

impl RecordLayout {
    pub fn new(name: impl Into<String>) -> RecordLayout {
        RecordLayout {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeDesc) -> RecordLayout {
        self.fields.push(FieldDesc::new(name, ty));
        self
    }

    /// `{data1: u32, data2: u16, data3: u16, data4: [u8; 8]}`; the last
    /// member travels as one little-endian `u64`, which keeps its bytes
    /// in place.
    pub fn guid() -> RecordLayout {
        RecordLayout::new("GUID")
            .field("Data1", TypeDesc::U4)
            .field("Data2", TypeDesc::U2)
            .field("Data3", TypeDesc::U2)
            .field("Data4", TypeDesc::U8)
    }

    pub fn native_size(&self, library: &dyn TypeLibrary) -> Result<usize, Error> {
        self.native_size_at(library, 0)
    }

    pub(crate) fn native_size_at(
        &self,
        library: &dyn TypeLibrary,
        depth: u32,
    ) -> Result<usize, Error> {
        self.fields
            .iter()
            .try_fold(0usize, |acc, f| Ok(acc + f.ty.native_size_at(library, depth)?))
    }
}
