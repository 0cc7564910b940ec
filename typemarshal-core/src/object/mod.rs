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

//! Live objects and the transport of interface references.
//!
//! The engine never looks inside an interface reference. It asks the
//! [`InterfaceMarshaler`] to turn one into an opaque blob on the sending
//! side and back into a live reference on the receiving side.

mod table;

pub use table::ObjectTable;

use crate::error::Error;
use crate::meta::CallConv;
use crate::status::Status;
use crate::types::InterfaceId;
use crate::value::Value;
use std::sync::Arc;

/// Shared, atomically reference-counted handle to a live object.
pub type InterfaceRef = Arc<dyn Unknown>;

/// Result of running a method: the raw status and the return value
/// ([`Value::Empty`] when the method returns nothing).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Outcome {
    pub status: Status,
    pub retval: Value,
}

impl Outcome {
    pub fn ok(retval: Value) -> Outcome {
        Outcome {
            status: Status::S_OK,
            retval,
        }
    }

    pub fn status(status: Status) -> Outcome {
        Outcome {
            status,
            retval: Value::Empty,
        }
    }

    pub fn with(status: Status, retval: Value) -> Outcome {
        Outcome { status, retval }
    }
}

/// The object protocol every live object speaks.
pub trait Unknown: Send + Sync {
    /// Returns a reference to this object's implementation of `iid`, or
    /// `None` if it does not implement it.
    fn query_interface(self: Arc<Self>, iid: &InterfaceId) -> Option<InterfaceRef>;

    /// Method table entry `ordinal`. `args` holds one value per declared
    /// parameter; `[out]` parameters arrive default-initialized and are
    /// written in place.
    fn invoke(&self, ordinal: u32, call_conv: CallConv, args: &mut [Value]) -> Outcome {
        let _ = (ordinal, call_conv, args);
        Outcome::status(Status::E_NOTIMPL)
    }
}

/// Serializes live interface references into opaque blobs and back.
pub trait InterfaceMarshaler: Send + Sync {
    fn marshal_interface(&self, iid: &InterfaceId, object: &InterfaceRef)
        -> Result<Vec<u8>, Error>;

    /// `Ok(None)` means the blob stands for no object.
    fn unmarshal_interface(
        &self,
        iid: &InterfaceId,
        data: &[u8],
    ) -> Result<Option<InterfaceRef>, Error>;

    /// Discards a blob that will never be unmarshaled, dropping whatever
    /// `marshal_interface` kept alive for it. Releasing a blob that was
    /// already unmarshaled must succeed and do nothing.
    fn release_marshal_data(&self, iid: &InterfaceId, data: &[u8]) -> Result<(), Error> {
        let _ = (iid, data);
        Ok(())
    }
}
