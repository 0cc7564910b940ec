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

use crate::buffer::MarshalBuffer;
use crate::config::Config;
use crate::error::Error;
use crate::object::InterfaceMarshaler;
use crate::resolver::TypeLibrary;
use crate::types::InterfaceId;
use tracing::warn;

/// State of one marshaling pass.
///
/// A proxy call keeps the same context across marshaling the request and
/// unmarshaling the reply, swapping only the buffer, so an interface id
/// captured from an `[in] riid` still applies to the `[out]` reference.
pub struct MarshalContext<'a> {
    pub buffer: MarshalBuffer,
    library: &'a dyn TypeLibrary,
    marshaler: &'a dyn InterfaceMarshaler,
    config: &'a Config,
    /// Interface id of the most recent record named `riid`.
    pub riid: Option<InterfaceId>,
    current_depth: u32,
    /// Blobs written by this pass that the peer has not taken over yet.
    pinned: Vec<(InterfaceId, Vec<u8>)>,
}

impl<'a> MarshalContext<'a> {
    pub fn new(
        buffer: MarshalBuffer,
        library: &'a dyn TypeLibrary,
        marshaler: &'a dyn InterfaceMarshaler,
        config: &'a Config,
    ) -> MarshalContext<'a> {
        MarshalContext {
            buffer,
            library,
            marshaler,
            config,
            riid: None,
            current_depth: 0,
            pinned: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn library(&self) -> &'a dyn TypeLibrary {
        self.library
    }

    #[inline(always)]
    pub fn marshaler(&self) -> &'a dyn InterfaceMarshaler {
        self.marshaler
    }

    #[inline(always)]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Swaps in a new buffer and returns the old one.
    pub fn replace_buffer(&mut self, buffer: MarshalBuffer) -> MarshalBuffer {
        std::mem::replace(&mut self.buffer, buffer)
    }

    /// Remembers an interface blob written into the buffer.
    pub fn pin(&mut self, iid: InterfaceId, blob: Vec<u8>) {
        self.pinned.push((iid, blob));
    }

    /// The peer now owns every blob written so far.
    pub fn hand_over_pinned(&mut self) {
        self.pinned.clear();
    }

    /// Gives back every pinned blob to the marshaler. Runs on failure paths,
    /// so a release error is logged and the rest still go.
    pub fn release_pinned(&mut self) {
        for (iid, blob) in self.pinned.drain(..) {
            if let Err(err) = self.marshaler.release_marshal_data(&iid, &blob) {
                warn!(%iid, %err, "failed to release marshaled interface");
            }
        }
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.config.max_depth() {
            return Err(Error::depth_exceed(format!(
                "Maximum nesting depth ({}) exceeded. Current depth: {}. \
                This may indicate a self-referential type description.",
                self.config.max_depth(),
                self.current_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}
