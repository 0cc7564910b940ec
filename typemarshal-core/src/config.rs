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

/// Configuration for the marshaling engine.
///
/// Held by the [`Engine`](crate::engine::Engine) and copied into every proxy
/// and stub it creates, so all calls made through one instance observe the
/// same limits.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum nesting of pointers, records and variants the walker follows.
    pub max_depth: u32,
    /// Bytes reserved up front in every fresh marshal buffer.
    pub initial_capacity: usize,
    /// Whether request and reply buffers are traced as hex inside each call span.
    pub dump_buffers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: 16,
            initial_capacity: 64,
            dump_buffers: false,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    #[inline(always)]
    pub fn is_dump_buffers(&self) -> bool {
        self.dump_buffers
    }
}
