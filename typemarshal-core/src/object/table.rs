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
use crate::{bail, ensure};
use crate::object::{InterfaceMarshaler, InterfaceRef};
use crate::types::InterfaceId;
use crate::util::Spinlock;
use byteorder::{ByteOrder, LittleEndian};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

const BLOB_SIZE: usize = 16 + 8;

/// In-process interface transport backed by a handle table.
///
/// Marshaling pins the object under a fresh handle and emits
/// `[16-byte iid][u64 handle]`. Unmarshaling is single-use: it removes the
/// entry and hands the pinned reference to the receiver.
#[derive(Default)]
pub struct ObjectTable {
    entries: Spinlock<HashMap<u64, (InterfaceId, InterfaceRef)>>,
    next_handle: AtomicU64,
}

impl ObjectTable {
    pub fn new() -> ObjectTable {
        ObjectTable::default()
    }

    /// Number of marshaled references not yet unmarshaled.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops a pinned reference whose blob will never be unmarshaled.
    pub fn revoke(&self, data: &[u8]) -> Option<InterfaceRef> {
        let (_, handle) = decode(data).ok()?;
        self.entries.lock().remove(&handle).map(|(_, obj)| obj)
    }
}

fn decode(data: &[u8]) -> Result<(InterfaceId, u64), Error> {
    ensure!(
        data.len() == BLOB_SIZE,
        Error::invalid_data(format!(
            "object reference blob must be {BLOB_SIZE} bytes, got {}",
            data.len()
        ))
    );
    let iid = InterfaceId::from_slice(&data[..16])?;
    Ok((iid, LittleEndian::read_u64(&data[16..])))
}

impl InterfaceMarshaler for ObjectTable {
    fn marshal_interface(
        &self,
        iid: &InterfaceId,
        object: &InterfaceRef,
    ) -> Result<Vec<u8>, Error> {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed) + 1;
        self.entries.lock().insert(handle, (*iid, object.clone()));
        let mut blob = Vec::with_capacity(BLOB_SIZE);
        blob.extend_from_slice(iid.as_bytes());
        let mut raw = [0u8; 8];
        LittleEndian::write_u64(&mut raw, handle);
        blob.extend_from_slice(&raw);
        Ok(blob)
    }

    fn unmarshal_interface(
        &self,
        iid: &InterfaceId,
        data: &[u8],
    ) -> Result<Option<InterfaceRef>, Error> {
        let (marshaled_iid, handle) = decode(data)?;
        if marshaled_iid != *iid {
            bail!("object reference was marshaled as {marshaled_iid}, unmarshaled as {iid}");
        }
        match self.entries.lock().remove(&handle) {
            Some((_, object)) => Ok(Some(object)),
            None => Err(Error::invalid_data(format!(
                "object reference handle {handle} is not live"
            ))),
        }
    }

    fn release_marshal_data(&self, _: &InterfaceId, data: &[u8]) -> Result<(), Error> {
        let (_, handle) = decode(data)?;
        self.entries.lock().remove(&handle);
        Ok(())
    }
}
