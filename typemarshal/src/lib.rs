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

//! # Typemarshal
//!
//! Descriptor-driven interface marshaling. Describe an interface in a
//! [`TypeRegistry`], hand the [`Engine`] a transport for interface
//! references, and call any of its methods through a generic [`Proxy`]
//! that a generic [`Stub`] turns back into calls on the real object.
//!
//! ```rust
//! use std::sync::Arc;
//! use typemarshal::{Engine, ObjectTable, TypeRegistry, IID_IUNKNOWN};
//!
//! let engine = Engine::new(Arc::new(TypeRegistry::new()), Arc::new(ObjectTable::new()));
//! let proxy = engine.create_proxy(IID_IUNKNOWN).unwrap();
//! assert!(!proxy.is_connected());
//! ```
//!
//! The building blocks live in [`typemarshal_core`], re-exported here.

pub use typemarshal_core::{
    buffer, channel, config, dispatch, engine, error, frame, meta, object, resolver, serializer,
    status, types, value,
};
pub use typemarshal_core::{
    ArgFrame, CallConv, Channel, Config, Engine, Error, FieldDesc, InterfaceDesc, InterfaceId,
    InterfaceMarshaler, InterfaceRef, InvokeKind, LoopbackChannel, MarshalBuffer, MethodDesc,
    ObjectTable, Outcome, ParamDesc, ParamFlags, Proxy, RecordLayout, Reply, RequestHandler,
    Status, Stub, TypeDesc, TypeLibrary, TypeRef, TypeRegistry, Unknown, UserType, Value,
    VarType, IID_IDISPATCH, IID_IUNKNOWN,
};
