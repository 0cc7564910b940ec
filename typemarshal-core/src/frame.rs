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
use crate::value::Value;

enum FrameSlot {
    Arg(Value),
    /// Continuation of a wider argument.
    Spill,
}

/// Native-style argument list handed to a proxy slot.
///
/// The frame is laid out in 32-bit slots like a stack-passed argument area:
/// each argument occupies [`Value::stack_slots`] consecutive slots. The proxy
/// walks it with a cursor advanced by each parameter descriptor's width, so
/// a frame built for a different signature is caught as misaligned instead
/// of silently shifting every later argument.
#[derive(Default)]
pub struct ArgFrame {
    slots: Vec<FrameSlot>,
}

impl ArgFrame {
    pub fn new() -> ArgFrame {
        ArgFrame::default()
    }

    /// Appends an argument; returns the slot it starts at.
    pub fn push(&mut self, value: Value) -> usize {
        let at = self.slots.len();
        let width = value.stack_slots();
        self.slots.push(FrameSlot::Arg(value));
        self.slots
            .extend(std::iter::repeat_with(|| FrameSlot::Spill).take(width - 1));
        at
    }

    pub fn arg(mut self, value: Value) -> ArgFrame {
        self.push(value);
        self
    }

    /// Total slots, spills included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Argument starting at `slot`.
    pub fn get(&self, slot: usize) -> Result<&Value, Error> {
        match self.slots.get(slot) {
            Some(FrameSlot::Arg(value)) => Ok(value),
            Some(FrameSlot::Spill) => Err(misaligned(slot)),
            None => Err(Error::invalid_argument(format!(
                "argument frame has {} slots, slot {slot} requested",
                self.slots.len()
            ))),
        }
    }

    /// Replaces the argument starting at `slot`, returning the old one.
    pub fn replace(&mut self, slot: usize, value: Value) -> Result<Value, Error> {
        let len = self.slots.len();
        match self.slots.get_mut(slot) {
            Some(FrameSlot::Arg(current)) => {
                if current.stack_slots() != value.stack_slots() {
                    return Err(Error::invalid_argument(format!(
                        "slot {slot}: {} cannot take a {} wide {}",
                        current.kind_name(),
                        value.stack_slots(),
                        value.kind_name()
                    )));
                }
                Ok(std::mem::replace(current, value))
            }
            Some(FrameSlot::Spill) => Err(misaligned(slot)),
            None => Err(Error::invalid_argument(format!(
                "argument frame has {len} slots, slot {slot} requested"
            ))),
        }
    }

    /// Arguments in order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter().filter_map(|slot| match slot {
            FrameSlot::Arg(value) => Some(value),
            FrameSlot::Spill => None,
        })
    }

    /// `index`-th argument, counting arguments rather than slots.
    pub fn nth(&self, index: usize) -> Option<&Value> {
        self.values().nth(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.slots
            .into_iter()
            .filter_map(|slot| match slot {
                FrameSlot::Arg(value) => Some(value),
                FrameSlot::Spill => None,
            })
            .collect()
    }
}

impl FromIterator<Value> for ArgFrame {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut frame = ArgFrame::new();
        for value in iter {
            frame.push(value);
        }
        frame
    }
}

impl std::fmt::Debug for ArgFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}

#[cold]
fn misaligned(slot: usize) -> Error {
    Error::invalid_argument(format!(
        "argument frame misaligned: slot {slot} is inside a wider argument"
    ))
}
