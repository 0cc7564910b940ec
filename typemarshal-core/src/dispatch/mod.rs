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

//! The generic dispatchers. A [`Proxy`] turns native-style calls into
//! requests; a [`Stub`] turns requests back into calls on a live object.
//! Both work for any interface the type library describes.

pub mod alloc;
mod lifetime;
mod proxy;
mod stub;

pub use proxy::{Proxy, Slot};
pub use stub::Stub;

use crate::buffer::MarshalBuffer;
use crate::ensure;
use crate::error::Error;
use crate::util::hex;

/// Traces a request or reply when buffer dumps are enabled.
fn dump(enabled: bool, what: &'static str, bytes: &[u8]) {
    if enabled {
        tracing::trace!(len = bytes.len(), bytes = %hex(bytes), "{what}");
    }
}

/// Trailing bytes mean the peer encoded a different signature.
fn expect_consumed(buffer: &MarshalBuffer) -> Result<(), Error> {
    ensure!(
        buffer.remaining() == 0,
        Error::invalid_data(format!(
            "{} unread bytes after the last value",
            buffer.remaining()
        ))
    );
    Ok(())
}
