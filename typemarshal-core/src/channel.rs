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

//! Request/response transport between a proxy and a stub.

use crate::error::Error;
use crate::status::Status;
use std::sync::Arc;

/// What comes back for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The method ran. `status` is its own result, which may be a failure;
    /// `payload` carries the `[out]` parameters and the return value.
    Response { status: Status, payload: Vec<u8> },
    /// The peer could not run the method at all.
    Fault(Status),
}

impl Reply {
    pub fn status(&self) -> Status {
        match self {
            Reply::Response { status, .. } | Reply::Fault(status) => *status,
        }
    }
}

/// Proxy side of a transport. Blocks until the reply arrives; timeouts and
/// cancellation belong to the implementation and surface as
/// [`Error::TransportFailure`].
pub trait Channel: Send + Sync {
    fn send_receive(&self, ordinal: u32, request: Vec<u8>) -> Result<Reply, Error>;
}

/// Stub side of a transport.
pub trait RequestHandler: Send + Sync {
    fn handle(&self, ordinal: u32, request: &[u8]) -> Reply;
}

/// Channel that hands each request straight to an in-process handler on
/// the calling thread.
#[derive(Clone)]
pub struct LoopbackChannel {
    handler: Arc<dyn RequestHandler>,
}

impl LoopbackChannel {
    pub fn new(handler: Arc<dyn RequestHandler>) -> LoopbackChannel {
        LoopbackChannel { handler }
    }
}

impl Channel for LoopbackChannel {
    fn send_receive(&self, ordinal: u32, request: Vec<u8>) -> Result<Reply, Error> {
        Ok(self.handler.handle(ordinal, &request))
    }
}
