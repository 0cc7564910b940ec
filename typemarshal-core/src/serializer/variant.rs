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
use crate::meta::TypeDesc;
use crate::resolver::MarshalContext;
use crate::serializer::{self, mismatch};
use crate::types::VarType;
use crate::value::Value;

/// Tag first, then the payload under the descriptor the tag implies.
pub(super) fn write(value: &Value, name: &str, context: &mut MarshalContext) -> Result<(), Error> {
    let Value::Variant(inner) = value else {
        return Err(mismatch(&TypeDesc::Variant, value));
    };
    let vt = inner.var_type()?;
    let desc = TypeDesc::from_var_type(vt)?;
    context.buffer.write_u32(u16::from(vt) as u32);
    serializer::write(&desc, inner, name, context)
}

pub(super) fn read(name: &str, context: &mut MarshalContext) -> Result<Value, Error> {
    let vt = VarType::from_tag(context.buffer.read_u32()?)?;
    let desc = TypeDesc::from_var_type(vt)?;
    let inner = serializer::read(&desc, name, context)?;
    Ok(Value::variant(inner))
}
