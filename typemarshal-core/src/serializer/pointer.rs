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

use crate::bail;
use crate::error::Error;
use crate::meta::TypeDesc;
use crate::resolver::MarshalContext;
use crate::serializer::{self, mismatch};
use crate::value::Value;

/// A null pointer is a zero length. The pointee keeps the pointer's name so
/// a `riid` passed by reference is still recognized.
pub(super) fn write(
    pointee: &TypeDesc,
    value: &Value,
    name: &str,
    context: &mut MarshalContext,
) -> Result<(), Error> {
    let Value::Ptr(target) = value else {
        return Err(mismatch(&TypeDesc::Ptr(Box::new(pointee.clone())), value));
    };
    let Some(target) = target else {
        context.buffer.write_u32(0);
        return Ok(());
    };
    let at = context.buffer.reserve_u32();
    serializer::write(pointee, target, name, context)?;
    let len = context.buffer.written_since(at + 4).len();
    context.buffer.set_u32(at, len as u32)
}

pub(super) fn read(
    pointee: &TypeDesc,
    name: &str,
    context: &mut MarshalContext,
) -> Result<Value, Error> {
    let len = context.buffer.read_u32()? as usize;
    if len == 0 {
        return Ok(Value::null_ptr());
    }
    context.buffer.check_remaining(len)?;
    let start = context.buffer.read_cursor();
    let target = serializer::read(pointee, name, context)?;
    let consumed = context.buffer.read_cursor() - start;
    if consumed != len {
        bail!("pointee announced {len} bytes but decoded {consumed}");
    }
    Ok(Value::ptr(target))
}
