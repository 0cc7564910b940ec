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

//! Reflection data driving the engine: type, parameter, method, record and
//! interface descriptors, as handed out by a [`TypeLibrary`].
//!
//! [`TypeLibrary`]: crate::resolver::TypeLibrary

mod interface;
mod method;
mod type_desc;
mod user_type;

pub use interface::InterfaceDesc;
pub use method::{CallConv, InvokeKind, MethodDesc, ParamDesc, ParamFlags};
pub use type_desc::TypeDesc;
pub use user_type::{FieldDesc, RecordLayout, UserType};
