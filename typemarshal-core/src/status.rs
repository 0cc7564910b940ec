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

//! HRESULT-style status codes exchanged with native callers and over channels.

use std::fmt;

/// A 32-bit call status. Negative values are failures.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

macro_rules! status_codes {
    ($($name:ident = $value:expr;)*) => {
        impl Status {
            $(pub const $name: Status = Status($value as i32);)*

            /// Symbolic name of a well-known status, if it is one.
            pub fn name(&self) -> Option<&'static str> {
                match *self {
                    $(Status::$name => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

status_codes! {
    S_OK = 0x0000_0000_u32;
    S_FALSE = 0x0000_0001_u32;
    E_NOTIMPL = 0x8000_4001_u32;
    E_NOINTERFACE = 0x8000_4002_u32;
    E_POINTER = 0x8000_4003_u32;
    E_FAIL = 0x8000_4005_u32;
    E_UNEXPECTED = 0x8000_FFFF_u32;
    E_INVALIDARG = 0x8007_0057_u32;
    DISP_E_MEMBERNOTFOUND = 0x8002_0003_u32;
    DISP_E_TYPEMISMATCH = 0x8002_0005_u32;
    DISP_E_BADVARTYPE = 0x8002_0008_u32;
    TYPE_E_ELEMENTNOTFOUND = 0x8002_802B_u32;
    RPC_E_INVALID_DATAPACKET = 0x8001_0009_u32;
    RPC_E_SYS_CALL_FAILED = 0x8001_0100_u32;
    RPC_E_SERVERFAULT = 0x8001_0105_u32;
    RPC_E_DISCONNECTED = 0x8001_0108_u32;
}

impl Status {
    #[inline(always)]
    pub fn is_success(&self) -> bool {
        self.0 >= 0
    }

    #[inline(always)]
    pub fn is_failure(&self) -> bool {
        self.0 < 0
    }

    #[inline(always)]
    pub fn code(&self) -> i32 {
        self.0
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::S_OK
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} (0x{:08x})", self.0 as u32),
            None => write!(f, "0x{:08x}", self.0 as u32),
        }
    }
}

impl fmt::Debug for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
