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

use crate::meta::MethodDesc;
use crate::types::InterfaceId;

/// One interface as a type library describes it: its own methods plus an
/// optional base whose methods it inherits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfaceDesc {
    pub iid: InterfaceId,
    pub name: String,
    pub base: Option<InterfaceId>,
    pub methods: Vec<MethodDesc>,
}

impl InterfaceDesc {
    pub fn new(iid: InterfaceId, name: impl Into<String>) -> InterfaceDesc {
        InterfaceDesc {
            iid,
            name: name.into(),
            base: None,
            methods: Vec::new(),
        }
    }

    pub fn inherits(mut self, base: InterfaceId) -> InterfaceDesc {
        self.base = Some(base);
        self
    }

    pub fn method(mut self, method: MethodDesc) -> InterfaceDesc {
        self.methods.push(method);
        self
    }

    /// Own method with this ordinal; base interfaces are not searched.
    pub fn find(&self, ordinal: u32) -> Option<&MethodDesc> {
        self.methods.iter().find(|m| m.ordinal == ordinal)
    }

    pub fn max_ordinal(&self) -> Option<u32> {
        self.methods.iter().map(|m| m.ordinal).max()
    }
}
