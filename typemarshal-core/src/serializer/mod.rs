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

//! The type-descriptor walker.
//!
//! [`write`] and [`read`] recurse over a [`TypeDesc`] and move a [`Value`]
//! into or out of the context's buffer, one encoding per kind:
//!
//! | kind                 | encoding                                        |
//! |----------------------|-------------------------------------------------|
//! | fixed-width numerics | raw little-endian bytes, booleans as `i16` -1/0  |
//! | string               | `u32` byte length, UTF-8 bytes                  |
//! | variant              | `u32` tag, payload of the tag's descriptor      |
//! | pointer              | `u32` pointee length (0 = null), pointee        |
//! | record               | `u32` body length, fields in layout order       |
//! | interface reference  | `u32` blob length (0 = null), transport blob    |
//!
//! Every read checks the remaining length first, so malformed input fails
//! with [`Error::TruncatedBuffer`] instead of reading past the end.

mod interface;
mod number;
mod pointer;
mod record;
mod string;
mod variant;

use crate::error::Error;
use crate::meta::{TypeDesc, UserType};
use crate::resolver::MarshalContext;
use crate::types::{IID_IDISPATCH, IID_IUNKNOWN};
use crate::value::Value;

/// Appends the encoding of `value` as `desc`. `name` is the parameter or
/// field name the value travels under.
pub fn write(
    desc: &TypeDesc,
    value: &Value,
    name: &str,
    context: &mut MarshalContext,
) -> Result<(), Error> {
    match desc {
        TypeDesc::Empty | TypeDesc::Null => match value {
            Value::Empty | Value::Null => Ok(()),
            _ => Err(mismatch(desc, value)),
        },
        TypeDesc::Bstr => string::write(value, &mut context.buffer),
        TypeDesc::Variant => nested(context, |ctx| variant::write(value, name, ctx)),
        TypeDesc::Ptr(pointee) => nested(context, |ctx| pointer::write(pointee, value, name, ctx)),
        TypeDesc::Unknown => interface::write(&IID_IUNKNOWN, value, context),
        TypeDesc::Dispatch => interface::write(&IID_IDISPATCH, value, context),
        TypeDesc::UntypedInterface => {
            let iid = interface::implied_iid(context);
            interface::write(&iid, value, context)
        }
        TypeDesc::UserDefined(href) => match context.library().user_type(*href) {
            Some(UserType::Record(layout)) => {
                nested(context, |ctx| record::write(layout, value, name, ctx))
            }
            Some(UserType::Interface(iid)) => interface::write(iid, value, context),
            Some(UserType::Alias(target)) => nested(context, |ctx| write(target, value, name, ctx)),
            Some(UserType::Enum) => number::write(&TypeDesc::I4, value, &mut context.buffer),
            None => Err(Error::unknown_type(*href)),
        },
        _ if number::is_numeric(desc) => number::write(desc, value, &mut context.buffer),
        _ => Err(unsupported(desc)),
    }
}

/// Decodes one value of type `desc` at the read cursor.
pub fn read(desc: &TypeDesc, name: &str, context: &mut MarshalContext) -> Result<Value, Error> {
    match desc {
        TypeDesc::Empty => Ok(Value::Empty),
        TypeDesc::Null => Ok(Value::Null),
        TypeDesc::Bstr => string::read(&mut context.buffer),
        TypeDesc::Variant => nested(context, |ctx| variant::read(name, ctx)),
        TypeDesc::Ptr(pointee) => nested(context, |ctx| pointer::read(pointee, name, ctx)),
        TypeDesc::Unknown => interface::read(&IID_IUNKNOWN, context),
        TypeDesc::Dispatch => interface::read(&IID_IDISPATCH, context),
        TypeDesc::UntypedInterface => {
            let iid = interface::implied_iid(context);
            interface::read(&iid, context)
        }
        TypeDesc::UserDefined(href) => match context.library().user_type(*href) {
            Some(UserType::Record(layout)) => nested(context, |ctx| record::read(layout, name, ctx)),
            Some(UserType::Interface(iid)) => interface::read(iid, context),
            Some(UserType::Alias(target)) => nested(context, |ctx| read(target, name, ctx)),
            Some(UserType::Enum) => number::read(&TypeDesc::I4, &mut context.buffer),
            None => Err(Error::unknown_type(*href)),
        },
        _ if number::is_numeric(desc) => number::read(desc, &mut context.buffer),
        _ => Err(unsupported(desc)),
    }
}

fn nested<'a, T>(
    context: &mut MarshalContext<'a>,
    f: impl FnOnce(&mut MarshalContext<'a>) -> Result<T, Error>,
) -> Result<T, Error> {
    context.inc_depth()?;
    let result = f(context);
    context.dec_depth();
    result
}

#[cold]
fn mismatch(desc: &TypeDesc, value: &Value) -> Error {
    Error::type_mismatch(format!("{:?}", desc.var_type()), value.kind_name())
}

#[cold]
fn unsupported(desc: &TypeDesc) -> Error {
    Error::unsupported_type_kind(format!("{:?}", desc.var_type()))
}
