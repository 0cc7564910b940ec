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
use crate::serializer::{mismatch, unsupported};
use crate::value::Value;

const VARIANT_TRUE: i16 = -1;
const VARIANT_FALSE: i16 = 0;

macro_rules! impl_numeric_kinds {
    ($($kind:ident: $ty:ident),* $(,)?) => {
        paste::paste! {
            pub(super) fn is_numeric(desc: &TypeDesc) -> bool {
                matches!(desc, TypeDesc::Bool $(| TypeDesc::$kind)*)
            }

            pub(super) fn write(
                desc: &TypeDesc,
                value: &Value,
                buffer: &mut MarshalBuffer,
            ) -> Result<(), Error> {
                match (desc, value) {
                    (TypeDesc::Bool, Value::Bool(v)) => {
                        buffer.write_i16(if *v { VARIANT_TRUE } else { VARIANT_FALSE })
                    }
                    $((TypeDesc::$kind, Value::$kind(v)) => buffer.[<write_ $ty>](*v),)*
                    _ => return Err(mismatch(desc, value)),
                }
                Ok(())
            }

            pub(super) fn read(desc: &TypeDesc, buffer: &mut MarshalBuffer) -> Result<Value, Error> {
                let value = match desc {
                    TypeDesc::Bool => Value::Bool(buffer.read_i16()? != VARIANT_FALSE),
                    $(TypeDesc::$kind => Value::$kind(buffer.[<read_ $ty>]()?),)*
                    _ => return Err(unsupported(desc)),
                };
                Ok(value)
            }
        }
    };
}

impl_numeric_kinds!(
    I1: i8,
    U1: u8,
    I2: i16,
    U2: u16,
    I4: i32,
    U4: u32,
    I8: i64,
    U8: u64,
    Int: i32,
    UInt: u32,
    R4: f32,
    R8: f64,
    Currency: i64,
    Date: f64,
    HResult: i32,
    Error: i32,
);
