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

//! Parameter allocator for the stub side: storage for every declared
//! parameter before the in-values are decoded into it.

use crate::error::Error;
use crate::meta::{ParamDesc, TypeDesc, UserType};
use crate::resolver::TypeLibrary;
use crate::types::MAX_LAYOUT_DEPTH;
use crate::value::Value;

/// Default storage for a parameter of type `desc`.
///
/// A top-level pointer gets a fresh pointee so the callee has somewhere to
/// write an `[out]` result; pointers nested deeper start out null.
pub fn default_for(desc: &TypeDesc, library: &dyn TypeLibrary) -> Result<Value, Error> {
    match desc {
        TypeDesc::Ptr(pointee) => Ok(Value::ptr(zeroed(pointee, library, 0)?)),
        _ => zeroed(desc, library, 0),
    }
}

/// Storage for each parameter of a method, in declared order.
pub fn allocate(params: &[ParamDesc], library: &dyn TypeLibrary) -> Result<Vec<Value>, Error> {
    params
        .iter()
        .map(|param| default_for(&param.ty, library))
        .collect()
}

fn zeroed(desc: &TypeDesc, library: &dyn TypeLibrary, depth: u32) -> Result<Value, Error> {
    if depth > MAX_LAYOUT_DEPTH {
        return Err(Error::depth_exceed(format!(
            "default value of {:?} nests deeper than {MAX_LAYOUT_DEPTH}",
            desc.var_type()
        )));
    }
    let value = match desc {
        TypeDesc::Void | TypeDesc::Empty => Value::Empty,
        TypeDesc::Null => Value::Null,
        TypeDesc::Bool => Value::Bool(false),
        TypeDesc::I1 => Value::I1(0),
        TypeDesc::U1 => Value::U1(0),
        TypeDesc::I2 => Value::I2(0),
        TypeDesc::U2 => Value::U2(0),
        TypeDesc::I4 => Value::I4(0),
        TypeDesc::U4 => Value::U4(0),
        TypeDesc::I8 => Value::I8(0),
        TypeDesc::U8 => Value::U8(0),
        TypeDesc::Int => Value::Int(0),
        TypeDesc::UInt => Value::UInt(0),
        TypeDesc::R4 => Value::R4(0.0),
        TypeDesc::R8 => Value::R8(0.0),
        TypeDesc::Currency => Value::Currency(0),
        TypeDesc::Date => Value::Date(0.0),
        TypeDesc::HResult => Value::HResult(0),
        TypeDesc::Error => Value::Error(0),
        TypeDesc::Bstr => Value::Str(String::new()),
        TypeDesc::Variant => Value::variant(Value::Empty),
        TypeDesc::Ptr(_) => Value::null_ptr(),
        TypeDesc::Unknown | TypeDesc::Dispatch | TypeDesc::UntypedInterface => {
            Value::Interface(None)
        }
        TypeDesc::UserDefined(href) => match library.user_type(*href) {
            Some(UserType::Record(layout)) => Value::Record(
                layout
                    .fields
                    .iter()
                    .map(|f| zeroed(&f.ty, library, depth + 1))
                    .collect::<Result<_, _>>()?,
            ),
            Some(UserType::Interface(_)) => Value::Interface(None),
            Some(UserType::Alias(target)) => zeroed(target, library, depth + 1)?,
            Some(UserType::Enum) => Value::I4(0),
            None => return Err(Error::unknown_type(*href)),
        },
        TypeDesc::Decimal
        | TypeDesc::LpStr
        | TypeDesc::LpWStr
        | TypeDesc::SafeArray(_)
        | TypeDesc::CArray(..) => {
            return Err(Error::unsupported_type_kind(format!(
                "{:?}",
                desc.var_type()
            )))
        }
    };
    Ok(value)
}
