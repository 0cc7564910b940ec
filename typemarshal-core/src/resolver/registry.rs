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

use crate::meta::{InterfaceDesc, MethodDesc, ParamDesc, RecordLayout, TypeDesc, UserType};
use crate::resolver::TypeLibrary;
use crate::types::{ordinal, InterfaceId, TypeRef, IID_IUNKNOWN};
use std::collections::HashMap;

/// In-memory [`TypeLibrary`] filled by registration calls.
///
/// Every registry starts with the `GUID` record under [`TypeRef::GUID`] and
/// the root interface with its three methods.
pub struct TypeRegistry {
    interfaces: HashMap<InterfaceId, InterfaceDesc>,
    user_types: Vec<UserType>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut registry = TypeRegistry {
            interfaces: HashMap::new(),
            user_types: vec![UserType::Record(RecordLayout::guid())],
        };
        registry.register_interface(root_interface());
        registry
    }
}

fn root_interface() -> InterfaceDesc {
    InterfaceDesc::new(IID_IUNKNOWN, "IUnknown")
        .method(
            MethodDesc::new("QueryInterface", ordinal::QUERY_INTERFACE)
                .param(ParamDesc::input("riid", TypeDesc::guid()))
                .param(ParamDesc::output(
                    "ppvObject",
                    TypeDesc::ptr(TypeDesc::UntypedInterface),
                ))
                .returns(TypeDesc::HResult),
        )
        .method(MethodDesc::new("AddRef", ordinal::ADD_REF).returns(TypeDesc::U4))
        .method(MethodDesc::new("Release", ordinal::RELEASE).returns(TypeDesc::U4))
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    /// Adds or replaces an interface description.
    pub fn register_interface(&mut self, desc: InterfaceDesc) -> &mut Self {
        self.interfaces.insert(desc.iid, desc);
        self
    }

    fn push(&mut self, user_type: UserType) -> TypeRef {
        let href = TypeRef(self.user_types.len() as u32);
        self.user_types.push(user_type);
        href
    }

    pub fn register_record(&mut self, layout: RecordLayout) -> TypeRef {
        self.push(UserType::Record(layout))
    }

    /// A user type standing for a reference to `iid`.
    pub fn register_interface_ref(&mut self, iid: InterfaceId) -> TypeRef {
        self.push(UserType::Interface(iid))
    }

    pub fn register_alias(&mut self, target: TypeDesc) -> TypeRef {
        self.push(UserType::Alias(target))
    }

    pub fn register_enum(&mut self) -> TypeRef {
        self.push(UserType::Enum)
    }
}

impl TypeLibrary for TypeRegistry {
    fn interface(&self, iid: &InterfaceId) -> Option<&InterfaceDesc> {
        self.interfaces.get(iid)
    }

    fn user_type(&self, type_ref: TypeRef) -> Option<&UserType> {
        self.user_types.get(type_ref.0 as usize)
    }
}
