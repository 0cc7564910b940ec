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

//! # Typemarshal Core
//!
//! A reflection-driven marshaling engine for object interfaces. Given a
//! runtime description of an interface, it turns calls on a local stand-in
//! (the proxy) into byte buffers, carries them over a channel, and turns
//! them back into calls on a live object (the stub's target), with no code
//! generated per interface.
//!
//! ## Architecture
//!
//! - **`buffer`**: growable byte buffer with independent read and write cursors
//! - **`meta`**: type, parameter, method, record and interface descriptors
//! - **`resolver`**: type library access, method cache and per-call context
//! - **`serializer`**: the type-descriptor walker, one module per encoding
//! - **`dispatch`**: generic proxy and stub, parameter allocator, refcounting
//! - **`channel`**: request/response transport abstraction
//! - **`object`**: live object protocol and interface reference transport
//! - **`frame`**: native-style argument frames in 32-bit slots
//! - **`engine`**: builder tying a type library and transport together
//! - **`error`** and **`status`**: error taxonomy and the status codes it maps to
//!
//! ## Call flow
//!
//! ```text
//!  caller ── ArgFrame ──> Proxy ── [in] params ──> Channel ──> Stub ──> target.invoke
//!  caller <─ ArgFrame ─── Proxy <─ [out] + retval ─ Channel <── Stub <──┘
//! ```
//!
//! Parameters travel in declared order in both directions. A record
//! parameter named `riid` supplies the interface id of any later untyped
//! interface reference in the same call; this is a naming convention the
//! interface author has to follow, nothing checks it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use typemarshal_core::meta::{InterfaceDesc, MethodDesc, ParamDesc, TypeDesc};
//! use typemarshal_core::object::{InterfaceRef, ObjectTable, Outcome, Unknown};
//! use typemarshal_core::resolver::TypeRegistry;
//! use typemarshal_core::types::{InterfaceId, IID_IUNKNOWN};
//! use typemarshal_core::{ArgFrame, CallConv, Engine, Value};
//!
//! const IID_ICOUNTER: InterfaceId =
//!     InterfaceId::from_u128(0x6f0e_4c2a_1b1d_4a77_9c55_0d3e_8a41_2b90);
//!
//! struct Counter;
//!
//! impl Unknown for Counter {
//!     fn query_interface(self: Arc<Self>, iid: &InterfaceId) -> Option<InterfaceRef> {
//!         (*iid == IID_IUNKNOWN || *iid == IID_ICOUNTER).then(|| self as InterfaceRef)
//!     }
//!
//!     fn invoke(&self, _: u32, _: CallConv, args: &mut [Value]) -> Outcome {
//!         match &args[0] {
//!             Value::I4(n) => Outcome::ok(Value::I4(n + 1)),
//!             _ => Outcome::status(typemarshal_core::Status::E_INVALIDARG),
//!         }
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_interface(
//!     InterfaceDesc::new(IID_ICOUNTER, "ICounter")
//!         .inherits(IID_IUNKNOWN)
//!         .method(
//!             MethodDesc::new("Next", 3)
//!                 .param(ParamDesc::input("n", TypeDesc::I4))
//!                 .returns(TypeDesc::I4),
//!         ),
//! );
//! let engine = Engine::new(Arc::new(registry), Arc::new(ObjectTable::new()));
//! let (proxy, _stub) = engine.loopback(IID_ICOUNTER, Arc::new(Counter)).unwrap();
//!
//! let mut frame = ArgFrame::new().arg(Value::I4(41));
//! let outcome = proxy.invoke(3, &mut frame).unwrap();
//! assert_eq!(outcome.retval, Value::I4(42));
//! ```

pub mod buffer;
pub mod channel;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod frame;
pub mod meta;
pub mod object;
pub mod resolver;
pub mod serializer;
pub mod status;
pub mod types;
pub mod util;
pub mod value;

pub use buffer::MarshalBuffer;
pub use channel::{Channel, LoopbackChannel, Reply, RequestHandler};
pub use config::Config;
pub use dispatch::{Proxy, Stub};
pub use engine::Engine;
pub use error::Error;
pub use frame::ArgFrame;
pub use meta::{
    CallConv, FieldDesc, InterfaceDesc, InvokeKind, MethodDesc, ParamDesc, ParamFlags,
    RecordLayout, TypeDesc, UserType,
};
pub use object::{InterfaceMarshaler, InterfaceRef, ObjectTable, Outcome, Unknown};
pub use resolver::{MarshalContext, MethodCache, TypeLibrary, TypeRegistry};
pub use status::Status;
pub use types::{InterfaceId, TypeRef, VarType, IID_IDISPATCH, IID_IUNKNOWN};
pub use value::Value;
