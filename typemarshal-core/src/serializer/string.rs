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
use crate::error::Error;
use crate::meta::TypeDesc;
use crate::serializer::mismatch;
use crate::value::Value;

pub(super) fn write(value: &Value, buffer: &mut MarshalBuffer) -> Result<(), Error> {
    let Value::Str(s) = value else {
        return Err(mismatch(&TypeDesc::Bstr, value));
    };
    let len = u32::try_from(s.len())
        .map_err(|_| Error::invalid_argument(format!("string of {} bytes", s.len())))?;
    buffer.write_u32(len);
    buffer.append(s.as_bytes());
    Ok(())
}

pub(super) fn read(buffer: &mut MarshalBuffer) -> Result<Value, Error> {
    let len = buffer.read_u32()? as usize;
    let bytes = buffer.read(len)?;
    let s = std::str::from_utf8(bytes)
        .map_err(|e| Error::invalid_data(format!("string is not UTF-8: {e}")))?;
    Ok(Value::Str(s.to_owned()))
}
