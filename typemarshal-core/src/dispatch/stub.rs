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
use crate::channel::{Reply, RequestHandler};
use crate::config::Config;
use crate::dispatch::alloc;
use crate::dispatch::lifetime::RefCount;
use crate::dispatch::{dump, expect_consumed};
use crate::error::Error;
use crate::meta::{MethodDesc, TypeDesc};
use crate::object::{InterfaceMarshaler, InterfaceRef};
use crate::resolver::{MarshalContext, MethodCache, TypeLibrary};
use crate::serializer;
use crate::status::Status;
use crate::types::{ordinal, InterfaceId, RIID_NAME};
use crate::util::Spinlock;
use crate::value::Value;
use std::sync::Arc;
use tracing::{debug, debug_span, trace, warn};

/// Server-side counterpart of a [`Proxy`](crate::dispatch::Proxy): decodes
/// requests, calls the target object and encodes the reply.
pub struct Stub {
    iid: InterfaceId,
    library: Arc<dyn TypeLibrary>,
    marshaler: Arc<dyn InterfaceMarshaler>,
    config: Config,
    cache: MethodCache,
    target: Spinlock<Option<InterfaceRef>>,
    refs: RefCount,
}

impl Stub {
    pub fn new(
        iid: InterfaceId,
        library: Arc<dyn TypeLibrary>,
        marshaler: Arc<dyn InterfaceMarshaler>,
        config: Config,
    ) -> Stub {
        Stub {
            iid,
            library,
            marshaler,
            config,
            cache: MethodCache::new(iid),
            target: Spinlock::new(None),
            refs: RefCount::new(),
        }
    }

    pub fn iid(&self) -> &InterfaceId {
        &self.iid
    }

    /// Binds the stub to `target`'s implementation of the stub's interface.
    pub fn connect(&self, target: InterfaceRef) -> Result<(), Error> {
        let object = target
            .query_interface(&self.iid)
            .ok_or_else(|| Error::target_interface_unsupported(self.iid))?;
        *self.target.lock() = Some(object);
        Ok(())
    }

    pub fn disconnect(&self) -> Result<(), Error> {
        match self.target.lock().take() {
            Some(_) => Ok(()),
            None => Err(Error::not_connected()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.target.lock().is_some()
    }

    pub fn add_ref(&self) -> u32 {
        self.refs.add_ref()
    }

    /// Drops one reference; the last one lets go of the target and clears
    /// the method cache.
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
        if self.target.lock().take().is_some() {
            debug!(iid = %self.iid, "stub released its target");
        }
        self.cache.clear();
    }

    fn new_context(&self, request: &[u8]) -> MarshalContext<'_> {
        MarshalContext::new(
            MarshalBuffer::from_bytes(request.to_vec()),
            &*self.library,
            &*self.marshaler,
            &self.config,
        )
    }

    fn fresh_buffer(&self) -> MarshalBuffer {
        MarshalBuffer::with_capacity(self.config.initial_capacity())
    }

    fn dispatch(
        &self,
        target: &InterfaceRef,
        ordinal: u32,
        request: &[u8],
    ) -> Result<Reply, Error> {
        if ordinal == ordinal::QUERY_INTERFACE {
            return self.query_local(target, request);
        }
        let library = &*self.library;
        let method = self.cache.get(library, ordinal)?;
        trace!(method = %method.name, "resolved");

        let mut args = alloc::allocate(&method.params, library)?;
        let mut context = self.new_context(request);
        for (param, slot) in method.params.iter().zip(args.iter_mut()) {
            if param.is_in() {
                *slot = serializer::read(&param.ty, &param.name, &mut context)?;
                trace!(param = %param.name, value = ?slot, "unmarshal in");
            }
        }
        expect_consumed(&context.buffer)?;

        let outcome = target.invoke(ordinal, method.call_conv, &mut args);
        debug!(status = %outcome.status, "target returned");

        context.replace_buffer(self.fresh_buffer());
        if let Err(err) = marshal_reply(&method, args, outcome.retval, &mut context) {
            context.release_pinned();
            return Err(err);
        }
        Ok(Reply::Response {
            status: outcome.status,
            payload: context.buffer.into_bytes(),
        })
    }

    /// Method 0: read the requested id, ask the target, send back the
    /// reference or a null one.
    fn query_local(&self, target: &InterfaceRef, request: &[u8]) -> Result<Reply, Error> {
        let mut context = self.new_context(request);
        let requested = serializer::read(&TypeDesc::guid(), RIID_NAME, &mut context)?;
        expect_consumed(&context.buffer)?;
        let iid = requested
            .as_interface_id()
            .ok_or_else(|| Error::invalid_data("query interface request without an id"))?;

        let object = target.clone().query_interface(&iid);
        let status = if object.is_some() {
            Status::S_OK
        } else {
            Status::E_NOINTERFACE
        };
        trace!(%iid, found = object.is_some(), "query interface");
        context.replace_buffer(self.fresh_buffer());
        serializer::write(
            &TypeDesc::UntypedInterface,
            &Value::Interface(object),
            "ppvObject",
            &mut context,
        )?;
        Ok(Reply::Response {
            status,
            payload: context.buffer.into_bytes(),
        })
    }
}

/// `[out]` values in declared order, then the return value. A target that
/// produced no return value, typically because it failed, gets the zero
/// value of the return type so the reply keeps its shape and the status
/// reaches the caller.
fn marshal_reply(
    method: &MethodDesc,
    args: Vec<Value>,
    retval: Value,
    context: &mut MarshalContext,
) -> Result<(), Error> {
    for (param, value) in method.params.iter().zip(args) {
        if param.is_out() {
            trace!(param = %param.name, ?value, "marshal out");
            serializer::write(&param.ty, &value, &param.name, context)?;
        }
    }
    if method.has_return() {
        let retval = match retval {
            Value::Empty => alloc::default_for(&method.ret, context.library())?,
            retval => retval,
        };
        serializer::write(&method.ret, &retval, "retval", context)?;
    }
    Ok(())
}

impl RequestHandler for Stub {
    fn handle(&self, ordinal: u32, request: &[u8]) -> Reply {
        let span = debug_span!("stub_call", iid = %self.iid, ordinal);
        let _enter = span.enter();
        dump(self.config.is_dump_buffers(), "request", request);
        let Some(target) = self.target.lock().clone() else {
            warn!("request for a disconnected stub");
            return Reply::Fault(Status::RPC_E_DISCONNECTED);
        };
        let reply = match self.dispatch(&target, ordinal, request) {
            Ok(reply) => reply,
            Err(err) => {
                debug!(%err, "stub call failed");
                Reply::Fault(err.status())
            }
        };
        if let Reply::Response { payload, .. } = &reply {
            dump(self.config.is_dump_buffers(), "reply", payload);
        }
        trace!(status = %reply.status(), "stub call done");
        reply
    }
}

impl Drop for Stub {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Stub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stub")
            .field("iid", &self.iid)
            .field("refs", &self.refs.count())
            .field("connected", &self.is_connected())
            .finish()
    }
}
