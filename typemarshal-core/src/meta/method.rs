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

use crate::meta::TypeDesc;
use crate::types::POINTER_SIZE;
use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};

bitflags! {
    /// Direction and role flags of a parameter.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ParamFlags: u16 {
        const IN = 0x01;
        const OUT = 0x02;
        const LCID = 0x04;
        const RETVAL = 0x08;
        const OPT = 0x10;
        const HASDEFAULT = 0x20;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum CallConv {
    FastCall = 0,
    Cdecl = 1,
    Pascal = 2,
    MacPascal = 3,
    #[default]
    StdCall = 4,
    SysCall = 6,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InvokeKind {
    #[default]
    Func,
    PropertyGet,
    PropertyPut,
    PropertyPutRef,
}

impl InvokeKind {
    #[inline(always)]
    pub fn is_put(&self) -> bool {
        matches!(self, InvokeKind::PropertyPut | InvokeKind::PropertyPutRef)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamDesc {
    /// Only consulted for the `riid` inference.
    pub name: String,
    pub flags: ParamFlags,
    pub ty: TypeDesc,
}

impl ParamDesc {
    pub fn new(name: impl Into<String>, flags: ParamFlags, ty: TypeDesc) -> ParamDesc {
        ParamDesc {
            name: name.into(),
            flags,
            ty,
        }
    }

    pub fn input(name: impl Into<String>, ty: TypeDesc) -> ParamDesc {
        ParamDesc::new(name, ParamFlags::IN, ty)
    }

    pub fn output(name: impl Into<String>, ty: TypeDesc) -> ParamDesc {
        ParamDesc::new(name, ParamFlags::OUT, ty)
    }

    pub fn in_out(name: impl Into<String>, ty: TypeDesc) -> ParamDesc {
        ParamDesc::new(name, ParamFlags::IN | ParamFlags::OUT, ty)
    }

    /// `IN` is implied when neither direction is set.
    #[inline(always)]
    pub fn is_in(&self) -> bool {
        self.flags.contains(ParamFlags::IN)
            || !self.flags.intersects(ParamFlags::IN | ParamFlags::OUT)
    }

    #[inline(always)]
    pub fn is_out(&self) -> bool {
        self.flags.contains(ParamFlags::OUT)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodDesc {
    pub name: String,
    /// Position in the interface's method table; the wire id of the method.
    pub ordinal: u32,
    pub call_conv: CallConv,
    pub invoke_kind: InvokeKind,
    pub params: Vec<ParamDesc>,
    /// [`TypeDesc::Void`] when the method returns nothing.
    pub ret: TypeDesc,
}

impl MethodDesc {
    pub fn new(name: impl Into<String>, ordinal: u32) -> MethodDesc {
        MethodDesc {
            name: name.into(),
            ordinal,
            call_conv: CallConv::default(),
            invoke_kind: InvokeKind::default(),
            params: Vec::new(),
            ret: TypeDesc::Void,
        }
    }

    /// Builds a descriptor from the byte offset of its method-table entry.
    pub fn from_vtable_offset(name: impl Into<String>, offset: u32) -> MethodDesc {
        MethodDesc::new(name, offset / POINTER_SIZE as u32)
    }

    pub fn param(mut self, param: ParamDesc) -> MethodDesc {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ret: TypeDesc) -> MethodDesc {
        self.ret = ret;
        self
    }

    pub fn invoke_kind(mut self, kind: InvokeKind) -> MethodDesc {
        self.invoke_kind = kind;
        self
    }

    pub fn call_conv(mut self, call_conv: CallConv) -> MethodDesc {
        self.call_conv = call_conv;
        self
    }

    /// Whether a return value travels after the parameters. Property puts
    /// never carry one, whatever their descriptor says.
    pub fn has_return(&self) -> bool {
        self.ret != TypeDesc::Void && !self.invoke_kind.is_put()
    }
}
