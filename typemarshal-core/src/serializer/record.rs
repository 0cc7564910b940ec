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
use crate::meta::RecordLayout;
use crate::resolver::MarshalContext;
use crate::serializer;
use crate::types::{InterfaceId, RIID_NAME};
use crate::value::Value;

/// Captures the interface id carried by a record named `riid`.
fn capture_riid(name: &str, body: &[u8], context: &mut MarshalContext) -> Result<(), Error> {
    if name == RIID_NAME && body.len() == 16 {
        let iid = InterfaceId::from_slice(body)?;
        tracing::trace!(%iid, "riid captured");
        context.riid = Some(iid);
    }
    Ok(())
}

pub(super) fn write(
    layout: &RecordLayout,
    value: &Value,
    name: &str,
    context: &mut MarshalContext,
) -> Result<(), Error> {
    let fields = match value {
        Value::Record(fields) if fields.len() == layout.fields.len() => fields,
        _ => {
            return Err(Error::type_mismatch(
                format!("record {} of {} fields", layout.name, layout.fields.len()),
                value.kind_name(),
            ))
        }
    };
    let at = context.buffer.reserve_u32();
    for (field, v) in layout.fields.iter().zip(fields) {
        serializer::write(&field.ty, v, &field.name, context)?;
    }
    let body = context.buffer.written_since(at + 4).to_vec();
    context.buffer.set_u32(at, body.len() as u32)?;
    capture_riid(name, &body, context)
}

pub(super) fn read(
    layout: &RecordLayout,
    name: &str,
    context: &mut MarshalContext,
) -> Result<Value, Error> {
    let len = context.buffer.read_u32()? as usize;
    context.buffer.check_remaining(len)?;
    let start = context.buffer.read_cursor();
    let mut fields = Vec::with_capacity(layout.fields.len());
    for field in &layout.fields {
        fields.push(serializer::read(&field.ty, &field.name, context)?);
    }
    let end = context.buffer.read_cursor();
    if end - start != len {
        bail!(
            "record {} announced {} bytes but decoded {}",
            layout.name,
            len,
            end - start
        );
    }
    let body = context.buffer.slice(start, end).to_vec();
    capture_riid(name, &body, context)?;
    Ok(Value::Record(fields))
}
