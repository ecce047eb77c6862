//! Shared helpers for the unit tests: a flat-memory CPU with a program at
//! the reset target, and mode setup shortcuts.

use crate::memory::RamBus;
use crate::registers::{FLAG_M, FLAG_X};
use crate::Cpu;

pub(crate) const RESET: u16 = 0x8000;

/// A freshly reset CPU over 128 KiB of flat memory with `program` at
/// $008000 and the reset vector pointing at it.
pub(crate) fn cpu_with_program(program: &[u8]) -> Cpu<RamBus> {
    let mut bus = RamBus::new(0x20000);
    bus.load(0x00FFFC, &[0x00, 0x80]);
    bus.load(RESET as u32, program);
    let mut cpu = Cpu::new(bus);
    cpu.reset();
    cpu
}

pub(crate) fn step_n(cpu: &mut Cpu<RamBus>, n: usize) {
    for _ in 0..n {
        cpu.step();
    }
}

/// Put the CPU in native mode with the requested register widths, as a
/// program would after CLC/XCE and REP/SEP.
pub(crate) fn native_mode(cpu: &mut Cpu<RamBus>, m8: bool, x8: bool) {
    cpu.regs.e = false;
    if m8 {
        cpu.regs.pl |= FLAG_M;
    } else {
        cpu.regs.pl &= !FLAG_M;
    }
    if x8 {
        cpu.regs.pl |= FLAG_X;
    } else {
        cpu.regs.pl &= !FLAG_X;
    }
    cpu.update_mode();
}
