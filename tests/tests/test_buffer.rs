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

use typemarshal_core::buffer::MarshalBuffer;
use typemarshal_core::error::Error;

#[test]
fn test_append_then_read_back() {
    let mut buffer = MarshalBuffer::with_capacity(1);
    buffer.append(b"abc");
    buffer.write_u32(0xdead_beef);
    buffer.write_f64(1.5);
    assert_eq!(buffer.len(), 3 + 4 + 8);

    assert_eq!(buffer.read(3).unwrap(), b"abc");
    assert_eq!(buffer.read_u32().unwrap(), 0xdead_beef);
    assert_eq!(buffer.read_f64().unwrap(), 1.5);
    assert_eq!(buffer.remaining(), 0);
}

#[test]
fn test_growth_at_least_doubles() {
    let mut buffer = MarshalBuffer::with_capacity(8);
    buffer.append(&[0; 8]);
    buffer.append(&[1]);
    assert!(buffer.capacity() >= 16);
    buffer.append(&[2; 100]);
    assert!(buffer.capacity() >= 109);
    assert_eq!(buffer.as_slice()[8], 1);
    assert_eq!(buffer.as_slice()[108], 2);
}

#[test]
fn test_skip_and_truncation() {
    let mut buffer = MarshalBuffer::from_bytes(vec![1, 2, 3, 4, 5]);
    buffer.skip(2).unwrap();
    assert_eq!(buffer.read_u8().unwrap(), 3);
    let err = buffer.read(3).unwrap_err();
    assert!(matches!(
        err,
        Error::TruncatedBuffer {
            offset: 3,
            needed: 3,
            len: 5
        }
    ));
    assert!(matches!(buffer.skip(3), Err(Error::TruncatedBuffer { .. })));
    assert_eq!(buffer.read(2).unwrap(), &[4, 5]);
}

#[test]
fn test_request_buffer_reused_for_reply() {
    let mut buffer = MarshalBuffer::new();
    buffer.write_i32(-7);
    let request = buffer.clone().into_bytes();
    assert_eq!(request, (-7i32).to_le_bytes());

    buffer.reset();
    assert!(buffer.is_empty());
    buffer.write_u16(9);
    buffer.reset_read();
    assert_eq!(buffer.read_u16().unwrap(), 9);
}
