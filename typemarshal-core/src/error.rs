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

//! Error taxonomy of the marshaling engine.
//!
//! Every error is fatal to the call that produced it and to nothing else:
//! proxies and stubs keep their cached state intact, so the next call on the
//! same instance can succeed. Nothing here is retried.
//!
//! Errors are mapped to a distinguished [`Status`] through [`Error::status`];
//! that is what a native caller or a channel sees.

use std::borrow::Cow;

use thiserror::Error;

use crate::status::Status;
use crate::types::{InterfaceId, TypeRef};

/// Global flag to check if TYPEMARSHAL_PANIC_ON_ERROR environment variable is set at compile time.
/// Set TYPEMARSHAL_PANIC_ON_ERROR=1 at compile time to enable panic on error.
pub const PANIC_ON_ERROR: bool = option_env!("TYPEMARSHAL_PANIC_ON_ERROR").is_some();

/// Check if TYPEMARSHAL_PANIC_ON_ERROR environment variable is set.
#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Error type for marshaling, dispatch and transport.
///
/// # Always use the static constructors
///
/// Do not build variants with enum syntax; use [`Error::truncated_buffer`],
/// [`Error::unsupported_type_kind`], [`Error::unknown_method`] and friends.
/// They accept anything convertible into `Cow<'static, str>` and honor the
/// `TYPEMARSHAL_PANIC_ON_ERROR` debug switch:
///
/// ```bash
/// RUST_BACKTRACE=1 TYPEMARSHAL_PANIC_ON_ERROR=1 cargo test
/// ```
///
/// With the switch set, every constructor panics at the creation site so the
/// backtrace points at the exact place the error came from.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Fewer bytes remain than the encoding needs.
    #[error("Truncated buffer: {offset} + {needed} > {len}")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// A type descriptor the walker cannot encode.
    #[error("Unsupported type kind: {0}")]
    UnsupportedTypeKind(Cow<'static, str>),

    /// No method with this ordinal, even after walking the base interfaces.
    #[error("Unknown method: ordinal {ordinal} on {iid}")]
    UnknownMethod { iid: InterfaceId, ordinal: u32 },

    /// The type library has no description of this interface.
    #[error("Unknown interface: {0}")]
    UnknownInterface(InterfaceId),

    /// A user-defined type reference the type library cannot resolve.
    #[error("Unknown user-defined type: {0}")]
    UnknownType(TypeRef),

    /// The target object does not implement the requested interface.
    #[error("Target does not implement {0}")]
    TargetInterfaceUnsupported(InterfaceId),

    /// Opaque failure passed through from a channel or interface transport.
    #[error("Transport failure: {0}")]
    TransportFailure(anyhow::Error),

    /// The instance holds no channel or target.
    #[error("Not connected")]
    NotConnected,

    /// A value does not have the shape its descriptor requires.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },

    /// Wire data that is well-sized but malformed.
    #[error("{0}")]
    InvalidData(Cow<'static, str>),

    /// A caller-supplied argument frame that does not fit the method.
    #[error("{0}")]
    InvalidArgument(Cow<'static, str>),

    /// The walker recursed deeper than the configured maximum.
    #[error("{0}")]
    DepthExceed(Cow<'static, str>),

    /// The peer failed the call before running it.
    #[error("Remote fault: {0}")]
    RemoteFault(Status),
}

macro_rules! error_ctor {
    ($(#[$doc:meta])* $fn_name:ident => $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $fn_name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            Error::raise(Error::$variant(s.into()))
        }
    };
}

impl Error {
    #[inline(always)]
    #[track_caller]
    fn raise(err: Error) -> Error {
        if PANIC_ON_ERROR {
            panic!("TYPEMARSHAL_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    /// Creates a new [`Error::TruncatedBuffer`].
    ///
    /// ```
    /// use typemarshal_core::error::Error;
    ///
    /// let err = Error::truncated_buffer(10, 4, 12);
    /// assert_eq!(err.to_string(), "Truncated buffer: 10 + 4 > 12");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn truncated_buffer(offset: usize, needed: usize, len: usize) -> Self {
        Error::raise(Error::TruncatedBuffer {
            offset,
            needed,
            len,
        })
    }

    error_ctor!(
        /// Creates a new [`Error::UnsupportedTypeKind`].
        unsupported_type_kind => UnsupportedTypeKind
    );

    error_ctor!(
        /// Creates a new [`Error::InvalidData`].
        invalid_data => InvalidData
    );

    error_ctor!(
        /// Creates a new [`Error::InvalidArgument`].
        invalid_argument => InvalidArgument
    );

    error_ctor!(
        /// Creates a new [`Error::DepthExceed`].
        depth_exceed => DepthExceed
    );

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_method(iid: InterfaceId, ordinal: u32) -> Self {
        Error::raise(Error::UnknownMethod { iid, ordinal })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_interface(iid: InterfaceId) -> Self {
        Error::raise(Error::UnknownInterface(iid))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn unknown_type(type_ref: TypeRef) -> Self {
        Error::raise(Error::UnknownType(type_ref))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn target_interface_unsupported(iid: InterfaceId) -> Self {
        Error::raise(Error::TargetInterfaceUnsupported(iid))
    }

    /// Wraps an opaque transport error.
    ///
    /// ```
    /// use typemarshal_core::error::Error;
    ///
    /// let err = Error::transport_failure(anyhow::anyhow!("pipe closed"));
    /// assert_eq!(err.to_string(), "Transport failure: pipe closed");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn transport_failure<E: Into<anyhow::Error>>(err: E) -> Self {
        Error::raise(Error::TransportFailure(err.into()))
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn not_connected() -> Self {
        Error::raise(Error::NotConnected)
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn type_mismatch<E, F>(expected: E, found: F) -> Self
    where
        E: Into<Cow<'static, str>>,
        F: Into<Cow<'static, str>>,
    {
        Error::raise(Error::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        })
    }

    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn remote_fault(status: Status) -> Self {
        Error::raise(Error::RemoteFault(status))
    }

    /// The status a native caller sees for this error.
    pub fn status(&self) -> Status {
        match self {
            Error::TruncatedBuffer { .. } | Error::InvalidData(_) => {
                Status::RPC_E_INVALID_DATAPACKET
            }
            Error::UnsupportedTypeKind(_) => Status::DISP_E_BADVARTYPE,
            Error::UnknownMethod { .. } => Status::DISP_E_MEMBERNOTFOUND,
            Error::UnknownInterface(_) | Error::UnknownType(_) => Status::TYPE_E_ELEMENTNOTFOUND,
            Error::TargetInterfaceUnsupported(_) => Status::E_NOINTERFACE,
            Error::TransportFailure(_) => Status::RPC_E_SYS_CALL_FAILED,
            Error::NotConnected => Status::RPC_E_DISCONNECTED,
            Error::TypeMismatch { .. } => Status::DISP_E_TYPEMISMATCH,
            Error::InvalidArgument(_) => Status::E_INVALIDARG,
            Error::DepthExceed(_) => Status::E_FAIL,
            Error::RemoteFault(status) => *status,
        }
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use typemarshal_core::ensure;
/// use typemarshal_core::error::Error;
///
/// fn check(len: usize) -> Result<(), Error> {
///     ensure!(len == 16, Error::invalid_data("bad length"));
///     Ok(())
/// }
/// assert!(check(3).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
}

/// Returns early with an [`Error::InvalidData`].
#[macro_export]
macro_rules! bail {
    ($msg:literal) => {
        return Err($crate::error::Error::invalid_data(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_data(format!($fmt, $($arg)*)))
    };
}
