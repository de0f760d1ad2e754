/*
 *  display/drivers/mock.rs
 *
 *  oledfb - monochrome OLED framebuffer
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock bus for testing without hardware
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::display::error::{BusError, BusErrorKind};
use crate::display::traits::{Bus, COMMAND_REGISTER};

/// One transaction that reached the (pretend) device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    Command(u8),
    Block { register: u8, bytes: Vec<u8> },
}

/// Mock bus for testing
///
/// This bus simulates a display controller without requiring hardware. It's useful for:
/// - Unit tests
/// - Integration tests
/// - Dry runs of the demo binary
///
/// Every successful transaction is recorded in order; failures can be
/// injected for error-path testing. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockBusState>>,
}

/// Internal state for the mock bus (shared for inspection in tests)
#[derive(Debug)]
pub struct MockBusState {
    /// Successful transactions, oldest first
    pub ops: Vec<BusOp>,

    /// Number of write_command calls, failed or not
    pub command_calls: usize,

    /// Number of write_block calls, failed or not
    pub block_calls: usize,

    /// Number of failed calls
    pub failures: usize,

    /// Let this many commands succeed, then fail every later one
    pub fail_commands_after: Option<usize>,

    /// Fail every block write
    pub fail_blocks: bool,

    /// Kind reported for injected failures
    pub failure_kind: BusErrorKind,
}

impl Default for MockBusState {
    fn default() -> Self {
        Self {
            ops: Vec::new(),
            command_calls: 0,
            block_calls: 0,
            failures: 0,
            fail_commands_after: None,
            fail_blocks: false,
            failure_kind: BusErrorKind::Nack,
        }
    }
}

impl MockBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockBusState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockBusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Command bytes that went out, in order
    pub fn commands(&self) -> Vec<u8> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Command(c) => Some(*c),
                BusOp::Block { .. } => None,
            })
            .collect()
    }

    /// Data blocks that went out, in order
    pub fn blocks(&self) -> Vec<(u8, Vec<u8>)> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                BusOp::Block { register, bytes } => Some((*register, bytes.clone())),
                BusOp::Command(_) => None,
            })
            .collect()
    }

    /// Make every transaction fail (or succeed again)
    pub fn fail_all(&self, fail: bool) {
        let mut state = self.lock();
        state.fail_commands_after = fail.then_some(0);
        state.fail_blocks = fail;
    }

    /// Reset recorded traffic and failure injection
    pub fn reset(&self) {
        *self.lock() = MockBusState::default();
    }
}

impl Bus for MockBus {
    fn write_command(&mut self, cmd: u8) -> Result<(), BusError> {
        let mut state = self.lock();
        let seen = state.command_calls;
        state.command_calls += 1;

        if state.fail_commands_after.is_some_and(|n| seen >= n) {
            state.failures += 1;
            return Err(BusError::new(
                state.failure_kind,
                format!("simulated failure writing 0x{:02X} to 0x{:02X}", cmd, COMMAND_REGISTER),
            ));
        }

        state.ops.push(BusOp::Command(cmd));
        Ok(())
    }

    fn write_block(&mut self, register: u8, bytes: &[u8]) -> Result<(), BusError> {
        let mut state = self.lock();
        state.block_calls += 1;

        if state.fail_blocks {
            state.failures += 1;
            return Err(BusError::new(
                state.failure_kind,
                format!("simulated failure writing {} bytes to 0x{:02X}", bytes.len(), register),
            ));
        }

        state.ops.push(BusOp::Block { register, bytes: bytes.to_vec() });
        Ok(())
    }
}
