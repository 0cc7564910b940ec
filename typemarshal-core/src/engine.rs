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

use crate::channel::LoopbackChannel;
use crate::config::Config;
use crate::dispatch::{Proxy, Stub};
use crate::error::Error;
use crate::object::{InterfaceMarshaler, InterfaceRef};
use crate::resolver::TypeLibrary;
use crate::types::InterfaceId;
use std::sync::Arc;

/// Entry point: a type library and an interface transport, plus the
/// [`Config`] every proxy and stub created here inherits.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use typemarshal_core::object::ObjectTable;
/// use typemarshal_core::resolver::TypeRegistry;
/// use typemarshal_core::types::IID_IUNKNOWN;
/// use typemarshal_core::Engine;
///
/// let engine = Engine::new(Arc::new(TypeRegistry::new()), Arc::new(ObjectTable::new()))
///     .max_depth(32)
///     .dump_buffers(true);
/// let proxy = engine.create_proxy(IID_IUNKNOWN).unwrap();
/// assert_eq!(proxy.slot_count(), 3);
/// ```
#[derive(Clone)]
pub struct Engine {
    library: Arc<dyn TypeLibrary>,
    marshaler: Arc<dyn InterfaceMarshaler>,
    config: Config,
}

impl Engine {
    pub fn new(library: Arc<dyn TypeLibrary>, marshaler: Arc<dyn InterfaceMarshaler>) -> Engine {
        Engine {
            library,
            marshaler,
            config: Config::default(),
        }
    }

    /// Sets how deep the walker follows pointers, records and variants
    /// before failing with [`Error::DepthExceed`].
    ///
    /// # Returns
    ///
    /// Returns `self` for method chaining.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Bytes reserved up front in every request and reply buffer.
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.config.initial_capacity = initial_capacity;
        self
    }

    /// Emits every request and reply as hex at `trace` level.
    pub fn dump_buffers(mut self, dump_buffers: bool) -> Self {
        self.config.dump_buffers = dump_buffers;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn library(&self) -> &Arc<dyn TypeLibrary> {
        &self.library
    }

    pub fn marshaler(&self) -> &Arc<dyn InterfaceMarshaler> {
        &self.marshaler
    }

    /// An unconnected proxy for `iid`. Fails with
    /// [`Error::UnknownInterface`] if the library does not describe it.
    pub fn create_proxy(&self, iid: InterfaceId) -> Result<Proxy, Error> {
        Proxy::new(
            iid,
            self.library.clone(),
            self.marshaler.clone(),
            self.config.clone(),
        )
    }

    /// A stub for `iid` already connected to `target`.
    pub fn create_stub(&self, iid: InterfaceId, target: InterfaceRef) -> Result<Arc<Stub>, Error> {
        let stub = Stub::new(
            iid,
            self.library.clone(),
            self.marshaler.clone(),
            self.config.clone(),
        );
        stub.connect(target)?;
        Ok(Arc::new(stub))
    }

    /// Proxy and stub for `iid` wired together through a
    /// [`LoopbackChannel`] on the calling thread.
    pub fn loopback(
        &self,
        iid: InterfaceId,
        target: InterfaceRef,
    ) -> Result<(Proxy, Arc<Stub>), Error> {
        let stub = self.create_stub(iid, target)?;
        let proxy = self.create_proxy(iid)?;
        proxy.connect(Arc::new(LoopbackChannel::new(stub.clone())));
        Ok((proxy, stub))
    }
}
