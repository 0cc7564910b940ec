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

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Atomic reference count shared by proxies and stubs.
///
/// Starts at one. The instance is shut down exactly once: either by the
/// release that reaches zero or, failing that, on drop.
pub(super) struct RefCount {
    count: AtomicU32,
    shut_down: AtomicBool,
}

impl RefCount {
    pub(super) fn new() -> RefCount {
        RefCount {
            count: AtomicU32::new(1),
            shut_down: AtomicBool::new(false),
        }
    }

    pub(super) fn add_ref(&self) -> u32 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Returns the new count. Releasing at zero stays at zero.
    pub(super) fn release(&self) -> u32 {
        match self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(previous) => previous - 1,
            Err(_) => 0,
        }
    }

    pub(super) fn count(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// True for the one caller that gets to run the shutdown.
    pub(super) fn begin_shutdown(&self) -> bool {
        self.shut_down
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(super) fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}
