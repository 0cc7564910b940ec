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
use byteorder::{ByteOrder, LittleEndian};
use std::mem;

/// Growable byte sequence with independent write and read cursors.
///
/// Writes always append at the end. Reads start at the read cursor, which
/// only moves forward until [`MarshalBuffer::reset_read`] rewinds it, so the
/// buffer a request was built in can be handed a reply and read from the
/// start again.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct MarshalBuffer {
    bf: Vec<u8>,
    cursor: usize,
}

macro_rules! impl_fixed_rw {
    ($($ty:ident),*) => {
        paste::paste! {
            $(
                #[inline(always)]
                pub fn [<write_ $ty>](&mut self, value: $ty) {
                    let mut raw = [0u8; mem::size_of::<$ty>()];
                    LittleEndian::[<write_ $ty>](&mut raw, value);
                    self.append(&raw);
                }

                #[inline(always)]
                pub fn [<read_ $ty>](&mut self) -> Result<$ty, Error> {
                    let raw = self.read(mem::size_of::<$ty>())?;
                    Ok(LittleEndian::[<read_ $ty>](raw))
                }
            )*
        }
    };
}

impl MarshalBuffer {
    pub fn new() -> MarshalBuffer {
        MarshalBuffer::default()
    }

    pub fn with_capacity(capacity: usize) -> MarshalBuffer {
        MarshalBuffer {
            bf: Vec::with_capacity(capacity),
            cursor: 0,
        }
    }

    pub fn from_bytes(bf: Vec<u8>) -> MarshalBuffer {
        MarshalBuffer { bf, cursor: 0 }
    }

    /// Logical length: everything written so far.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.bf.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    #[inline(always)]
    pub fn read_cursor(&self) -> usize {
        self.cursor
    }

    /// Bytes left between the read cursor and the end.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.bf.capacity()
    }

    /// Makes room for `additional` more bytes, at least doubling on growth.
    pub fn reserve(&mut self, additional: usize) {
        let free = self.bf.capacity() - self.bf.len();
        if free < additional {
            let wanted = additional.max(self.bf.capacity());
            self.bf.reserve(wanted);
        }
    }

    pub fn append(&mut self, v: &[u8]) {
        self.reserve(v.len());
        self.bf.extend_from_slice(v);
    }

    /// Copies out `count` bytes at the read cursor and advances it.
    pub fn read(&mut self, count: usize) -> Result<&[u8], Error> {
        self.check_remaining(count)?;
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.bf[start..self.cursor])
    }

    pub fn skip(&mut self, count: usize) -> Result<(), Error> {
        self.check_remaining(count)?;
        self.cursor += count;
        Ok(())
    }

    #[inline(always)]
    pub fn check_remaining(&self, count: usize) -> Result<(), Error> {
        if count > self.remaining() {
            return Err(Error::truncated_buffer(self.cursor, count, self.bf.len()));
        }
        Ok(())
    }

    /// Writes a zero `u32` and returns its offset, to be patched with
    /// [`MarshalBuffer::set_u32`] once the length it stands for is known.
    pub fn reserve_u32(&mut self) -> usize {
        let offset = self.bf.len();
        self.write_u32(0);
        offset
    }

    pub fn set_u32(&mut self, offset: usize, value: u32) -> Result<(), Error> {
        let len = self.bf.len();
        let slot = self
            .bf
            .get_mut(offset..offset + 4)
            .ok_or_else(|| Error::truncated_buffer(offset, 4, len))?;
        LittleEndian::write_u32(slot, value);
        Ok(())
    }

    /// Bytes written from `offset` to the end.
    pub fn written_since(&self, offset: usize) -> &[u8] {
        self.bf.get(offset..).unwrap_or(&[])
    }

    /// Bytes between two read positions.
    pub fn slice(&self, start: usize, end: usize) -> &[u8] {
        self.bf.get(start..end).unwrap_or(&[])
    }

    pub fn reset_read(&mut self) {
        self.cursor = 0;
    }

    /// Drops the content but keeps the allocation.
    pub fn reset(&mut self) {
        self.bf.clear();
        self.cursor = 0;
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) {
        self.reserve(1);
        self.bf.push(value);
    }

    #[inline(always)]
    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.read(1)?[0])
    }

    #[inline(always)]
    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    impl_fixed_rw!(u16, i16, u32, i32, u64, i64, f32, f64);
}

impl From<Vec<u8>> for MarshalBuffer {
    fn from(bf: Vec<u8>) -> Self {
        MarshalBuffer::from_bytes(bf)
    }
}

impl std::fmt::Debug for MarshalBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarshalBuffer")
            .field("len", &self.bf.len())
            .field("cursor", &self.cursor)
            .field("bytes", &crate::util::hex(&self.bf))
            .finish()
    }
}
