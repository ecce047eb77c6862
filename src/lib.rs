//! A cycle-exact 65C816 interpreter core.
//!
//! The 65C816 is the hybrid 8/16-bit CPU at the heart of the SNES: an
//! emulation mode that behaves like a 6502 (8-bit registers, stack confined
//! to page 1) and a native mode whose accumulator and index widths are
//! switched independently by the M and X status bits. One opcode byte can
//! therefore mean up to four different operations with different cycle
//! counts, which is why dispatch runs through five specialized 256-entry
//! handler tables keyed by (E, M, X), plus a runtime-checking "slow" table
//! used while interrupts or other events are pending.
//!
//! The core executes against a [`Bus`] supplied by the host: memory mapping,
//! per-region access times, peripherals and co-processors all live behind
//! that trait. [`RamBus`] is a flat image good enough for tests and the
//! bundled runner.
//!
//! ```
//! use w65c816::{Cpu, RamBus};
//!
//! let mut bus = RamBus::new(0x20000);
//! bus.load(0x00FFFC, &[0x00, 0x80]); // reset vector -> $8000
//! bus.load(0x008000, &[0xA9, 0x42]); // LDA #$42
//! let mut cpu = Cpu::new(bus);
//! cpu.reset();
//! cpu.step();
//! assert_eq!(cpu.regs.a & 0xFF, 0x42);
//! ```

mod addressing;
pub mod cpu;
pub mod dispatch;
pub mod execute;
pub mod memory;
mod ops_alu;
mod ops_flow;
mod ops_mem;
mod ops_stack;
mod ops_sys;
pub mod registers;
#[cfg(test)]
mod test_support;

pub use cpu::{Cpu, CpuState, EventFlags, StateError};
pub use dispatch::{OpcodeFn, TableKey, MNEMONICS};
pub use execute::{Interrupt, RESET_VECTOR};
pub use memory::{Bus, RamBus, Wrap, WriteOrder, ONE_CYCLE, SLOW_ONE_CYCLE, TWO_CYCLES};
pub use registers::Registers;
