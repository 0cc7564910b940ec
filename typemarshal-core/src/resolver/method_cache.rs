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
use crate::meta::MethodDesc;
use crate::resolver::{resolve_method, TypeLibrary};
use crate::types::InterfaceId;
use crate::util::Spinlock;
use std::collections::HashMap;
use std::sync::Arc;

/// Method descriptors of one interface, resolved on first use.
///
/// Only successful resolutions are stored.
pub struct MethodCache {
    iid: InterfaceId,
    methods: Spinlock<HashMap<u32, Arc<MethodDesc>>>,
}

impl MethodCache {
    pub fn new(iid: InterfaceId) -> MethodCache {
        MethodCache {
            iid,
            methods: Spinlock::new(HashMap::new()),
        }
    }

    pub fn get(&self, library: &dyn TypeLibrary, ordinal: u32) -> Result<Arc<MethodDesc>, Error> {
        if let Some(method) = self.methods.lock().get(&ordinal) {
            return Ok(method.clone());
        }
        // Resolve outside the lock; a racing thread resolves the same thing.
        let method = Arc::new(resolve_method(library, &self.iid, ordinal)?.clone());
        Ok(self
            .methods
            .lock()
            .entry(ordinal)
            .or_insert(method)
            .clone())
    }

    pub fn len(&self) -> usize {
        self.methods.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.methods.lock().clear();
    }
}
