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
use crate::resolver::MarshalContext;
use crate::types::{InterfaceId, IID_IUNKNOWN};
use crate::value::Value;

/// Interface id for an untyped reference: the last `riid` seen in this
/// call, else the root interface.
pub(super) fn implied_iid(context: &MarshalContext) -> InterfaceId {
    context.riid.unwrap_or_else(|| {
        tracing::warn!("untyped interface reference without a preceding riid, assuming IUnknown");
        IID_IUNKNOWN
    })
}

pub(super) fn write(
    iid: &InterfaceId,
    value: &Value,
    context: &mut MarshalContext,
) -> Result<(), Error> {
    let object = match value {
        Value::Interface(object) => object.as_ref(),
        Value::Null | Value::Empty => None,
        _ => return Err(Error::type_mismatch(format!("interface {iid}"), value.kind_name())),
    };
    let Some(object) = object else {
        context.buffer.write_u32(0);
        return Ok(());
    };
    let blob = context.marshaler().marshal_interface(iid, object)?;
    if blob.is_empty() {
        return Err(Error::invalid_data(format!(
            "interface transport produced an empty blob for {iid}"
        )));
    }
    context.buffer.write_u32(blob.len() as u32);
    context.buffer.append(&blob);
    context.pin(*iid, blob);
    Ok(())
}

pub(super) fn read(iid: &InterfaceId, context: &mut MarshalContext) -> Result<Value, Error> {
    let len = context.buffer.read_u32()? as usize;
    if len == 0 {
        return Ok(Value::Interface(None));
    }
    let marshaler = context.marshaler();
    let blob = context.buffer.read(len)?;
    Ok(Value::Interface(marshaler.unmarshal_interface(iid, blob)?))
}
