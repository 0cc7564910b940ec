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
use crate::meta::{InterfaceDesc, MethodDesc, UserType};
use crate::types::{InterfaceId, TypeRef};

/// Upper bound on inheritance chains; guards against cyclic libraries.
const MAX_INHERITANCE_DEPTH: usize = 64;

/// Read-only source of interface and user-type descriptions.
pub trait TypeLibrary: Send + Sync {
    fn interface(&self, iid: &InterfaceId) -> Option<&InterfaceDesc>;

    fn user_type(&self, type_ref: TypeRef) -> Option<&UserType>;
}

/// Walks `iid` and then its bases, most derived first.
fn chain<'a>(
    library: &'a dyn TypeLibrary,
    iid: &InterfaceId,
) -> impl Iterator<Item = Result<&'a InterfaceDesc, Error>> + 'a {
    let mut next = Some(*iid);
    std::iter::from_fn(move || {
        let current = next.take()?;
        match library.interface(&current) {
            Some(desc) => {
                next = desc.base;
                Some(Ok(desc))
            }
            None => Some(Err(Error::unknown_interface(current))),
        }
    })
    .take(MAX_INHERITANCE_DEPTH)
}

/// Finds the method descriptor for `ordinal`, searching the base chain.
pub fn resolve_method<'a>(
    library: &'a dyn TypeLibrary,
    iid: &InterfaceId,
    ordinal: u32,
) -> Result<&'a MethodDesc, Error> {
    for desc in chain(library, iid) {
        if let Some(method) = desc?.find(ordinal) {
            return Ok(method);
        }
    }
    Err(Error::unknown_method(*iid, ordinal))
}

/// Highest ordinal declared by `iid` or any of its bases.
pub fn max_ordinal(library: &dyn TypeLibrary, iid: &InterfaceId) -> Result<u32, Error> {
    let mut max = None;
    for desc in chain(library, iid) {
        max = max.max(desc?.max_ordinal());
    }
    max.ok_or_else(|| Error::unknown_interface(*iid))
}
