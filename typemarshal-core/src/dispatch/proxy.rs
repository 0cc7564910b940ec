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
use crate::channel::{Channel, Reply};
use crate::config::Config;
use crate::dispatch::lifetime::RefCount;
use crate::dispatch::{dump, expect_consumed};
use crate::error::Error;
use crate::frame::ArgFrame;
use crate::meta::{MethodDesc, TypeDesc};
use crate::object::{InterfaceMarshaler, InterfaceRef, Outcome};
use crate::resolver::{max_ordinal, MarshalContext, MethodCache, TypeLibrary};
use crate::serializer;
use crate::status::Status;
use crate::types::{ordinal, InterfaceId, RIID_NAME};
use crate::util::Spinlock;
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

/// One entry of a proxy's method table.
pub type Slot = Box<dyn Fn(&Proxy, &mut ArgFrame) -> Result<Outcome, Error> + Send + Sync>;

/// Client-side stand-in for a remote object implementing one interface.
///
/// Every method of the interface goes through the same [`Proxy::invoke`];
/// the method table only binds the ordinal.
pub struct Proxy {
    iid: InterfaceId,
    library: Arc<dyn TypeLibrary>,
    marshaler: Arc<dyn InterfaceMarshaler>,
    config: Config,
    cache: MethodCache,
    channel: Spinlock<Option<Arc<dyn Channel>>>,
    slots: Vec<Slot>,
    refs: RefCount,
}

fn bind(ordinal: u32) -> Slot {
    Box::new(move |proxy: &Proxy, frame: &mut ArgFrame| proxy.invoke(ordinal, frame))
}

impl Proxy {
    pub fn new(
        iid: InterfaceId,
        library: Arc<dyn TypeLibrary>,
        marshaler: Arc<dyn InterfaceMarshaler>,
        config: Config,
    ) -> Result<Proxy, Error> {
        let slot_count = max_ordinal(&*library, &iid)? + 1;
        let slots = (0..slot_count).map(bind).collect();
        debug!(%iid, slot_count, "proxy created");
        Ok(Proxy {
            iid,
            library,
            marshaler,
            config,
            cache: MethodCache::new(iid),
            channel: Spinlock::new(None),
            slots,
            refs: RefCount::new(),
        })
    }

    pub fn iid(&self) -> &InterfaceId {
        &self.iid
    }

    /// Number of entries in the method table.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn connect(&self, channel: Arc<dyn Channel>) {
        *self.channel.lock() = Some(channel);
    }

    pub fn disconnect(&self) -> Result<(), Error> {
        match self.channel.lock().take() {
            Some(_) => Ok(()),
            None => Err(Error::not_connected()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.channel.lock().is_some()
    }

    pub fn add_ref(&self) -> u32 {
        self.refs.add_ref()
    }

    /// Drops one reference; the last one disconnects and clears the
    /// method cache.
    pub fn release(&self) -> u32 {
        let count = self.refs.release();
        if count == 0 {
            self.shutdown();
        }
        count
    }

    pub fn ref_count(&self) -> u32 {
        self.refs.count()
    }

    pub fn cached_methods(&self) -> usize {
        self.cache.len()
    }

    fn shutdown(&self) {
        if !self.refs.begin_shutdown() {
            return;
        }
        if self.channel.lock().take().is_some() {
            debug!(iid = %self.iid, "proxy disconnected on final release");
        }
        self.cache.clear();
    }

    /// Calls through the method table and reports failures the way a native
    /// caller sees them: as a status.
    pub fn call_slot(&self, index: usize, frame: &mut ArgFrame) -> Outcome {
        let result = match self.slots.get(index) {
            Some(slot) => slot(self, frame),
            None => Err(Error::unknown_method(self.iid, index as u32)),
        };
        result.unwrap_or_else(|err| {
            debug!(iid = %self.iid, index, %err, "proxy call failed");
            Outcome::status(err.status())
        })
    }

    /// Asks the remote object for another interface.
    pub fn query_interface(&self, iid: &InterfaceId) -> Result<Option<InterfaceRef>, Error> {
        let mut frame = ArgFrame::new()
            .arg(Value::from(*iid))
            .arg(Value::ptr(Value::Interface(None)));
        self.invoke(ordinal::QUERY_INTERFACE, &mut frame)?;
        Ok(frame.nth(1).and_then(Value::as_interface).cloned())
    }

    /// Runs method `ordinal` with the arguments in `frame`. `[out]`
    /// arguments are overwritten in place with what the peer sent back.
    pub fn invoke(&self, ordinal: u32, frame: &mut ArgFrame) -> Result<Outcome, Error> {
        let span = debug_span!("proxy_call", iid = %self.iid, ordinal);
        let _enter = span.enter();
        match ordinal {
            ordinal::ADD_REF => return Ok(Outcome::ok(Value::U4(self.add_ref()))),
            ordinal::RELEASE => return Ok(Outcome::ok(Value::U4(self.release()))),
            _ => {}
        }
        let channel = self.channel.lock().clone().ok_or_else(Error::not_connected)?;
        let mut context = MarshalContext::new(
            MarshalBuffer::with_capacity(self.config.initial_capacity()),
            &*self.library,
            &*self.marshaler,
            &self.config,
        );
        if ordinal == ordinal::QUERY_INTERFACE {
            return self.query_remote(&*channel, frame, &mut context);
        }

        let library = &*self.library;
        let method = self.cache.get(library, ordinal)?;
        trace!(method = %method.name, "resolved");
        let sent = self.marshal_request(&method, frame, &mut context).and_then(|()| {
            self.round_trip(&*channel, ordinal, &mut context)
        });
        let (status, payload) = match sent {
            Ok(reply) => reply,
            Err(err) => {
                context.release_pinned();
                return Err(err);
            }
        };
        // the stub has unmarshaled every [in] reference by now
        context.hand_over_pinned();
        context.replace_buffer(MarshalBuffer::from_bytes(payload));

        let mut cursor = 0;
        for param in &method.params {
            if param.is_out() {
                let value = serializer::read(&param.ty, &param.name, &mut context)?;
                trace!(param = %param.name, ?value, "unmarshal out");
                frame.replace(cursor, value)?;
            }
            cursor += param.ty.stack_slots(library)?;
        }
        let retval = if method.has_return() {
            serializer::read(&method.ret, "retval", &mut context)?
        } else {
            Value::Empty
        };
        expect_consumed(&context.buffer)?;
        debug!(%status, "proxy call done");
        Ok(Outcome::with(status, retval))
    }

    fn marshal_request(
        &self,
        method: &MethodDesc,
        frame: &ArgFrame,
        context: &mut MarshalContext,
    ) -> Result<(), Error> {
        let library = &*self.library;
        let mut cursor = 0;
        for param in &method.params {
            let value = frame.get(cursor)?;
            if param.is_in() {
                trace!(param = %param.name, ?value, "marshal in");
                serializer::write(&param.ty, value, &param.name, context)?;
            }
            cursor += param.ty.stack_slots(library)?;
        }
        Ok(())
    }

    /// Method 0: no descriptor lookup. The first argument is the requested
    /// id, the second the out-pointer receiving the reference.
    fn query_remote(
        &self,
        channel: &dyn Channel,
        frame: &mut ArgFrame,
        context: &mut MarshalContext,
    ) -> Result<Outcome, Error> {
        let requested = frame.get(0)?;
        let width = requested.stack_slots();
        let requested = requested.pointee().unwrap_or(requested);
        serializer::write(&TypeDesc::guid(), requested, RIID_NAME, context)?;

        let (status, payload) = self.round_trip(channel, ordinal::QUERY_INTERFACE, context)?;
        context.replace_buffer(MarshalBuffer::from_bytes(payload));
        let object = serializer::read(&TypeDesc::UntypedInterface, "ppvObject", context)?;
        expect_consumed(&context.buffer)?;
        frame.replace(width, Value::ptr(object))?;
        debug!(%status, "query interface done");
        Ok(Outcome::status(status))
    }

    fn round_trip(
        &self,
        channel: &dyn Channel,
        ordinal: u32,
        context: &mut MarshalContext,
    ) -> Result<(Status, Vec<u8>), Error> {
        let request = context.replace_buffer(MarshalBuffer::new()).into_bytes();
        dump(self.config.is_dump_buffers(), "request", &request);
        match channel.send_receive(ordinal, request)? {
            Reply::Response { status, payload } => {
                dump(self.config.is_dump_buffers(), "reply", &payload);
                Ok((status, payload))
            }
            Reply::Fault(status) => Err(Error::remote_fault(status)),
        }
    }
}

impl Drop for Proxy {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Proxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("iid", &self.iid)
            .field("slots", &self.slots.len())
            .field("refs", &self.refs.count())
            .field("connected", &self.is_connected())
            .finish()
    }
}
