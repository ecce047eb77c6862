//! The instruction-step driver and interrupt entry.

use log::{debug, trace};

use crate::cpu::{Cpu, EventFlags};
use crate::dispatch::{TableKey, MNEMONICS};
use crate::memory::{Bus, Wrap, ONE_CYCLE};
use crate::registers::{Registers, FLAG_D, FLAG_I, FLAG_M, FLAG_X};

/// Bank-0 address of the 16-bit reset vector.
pub const RESET_VECTOR: u32 = 0x00FFFC;

/// An interrupt source, used to pick the vector and to let a co-processor
/// claim redirection through [`crate::Bus::vector_override`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interrupt {
    Nmi,
    Irq,
    Brk,
    Cop,
}

impl Interrupt {
    /// Bank-0 vector address for this source in the given mode.
    pub fn vector(self, emulation: bool) -> u32 {
        match (self, emulation) {
            (Interrupt::Nmi, false) => 0xFFEA,
            (Interrupt::Nmi, true) => 0xFFFA,
            (Interrupt::Irq, false) => 0xFFEE,
            (Interrupt::Irq, true) => 0xFFFE,
            (Interrupt::Brk, false) => 0xFFE6,
            (Interrupt::Brk, true) => 0xFFFE,
            (Interrupt::Cop, false) => 0xFFE4,
            (Interrupt::Cop, true) => 0xFFF4,
        }
    }
}

impl<B: Bus> Cpu<B> {
    /// Architectural power-on state: emulation mode, 8-bit widths,
    /// interrupts masked, stack at the top of page 1, PC from the reset
    /// vector.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.regs.s = 0x01FF;
        self.regs.e = true;
        self.regs.pl = FLAG_M | FLAG_X | FLAG_I;
        self.unpack_status();
        self.shifted_pb = 0;
        self.shifted_db = 0;
        self.open_bus = 0;
        self.cycles = 0;
        self.next_event = 0;
        self.flags = EventFlags::empty();
        self.wait_pc = 0;
        self.wait_counter = 0;
        self.waiting_for_interrupt = false;
        self.branch_skip = false;
        self.opcode_start = 0;
        self.mode_key = TableKey::Emulation;
        let lo = self.bus.read(RESET_VECTOR).unwrap_or(0) as u32;
        let hi = self.bus.read(RESET_VECTOR + 1).unwrap_or(0) as u32;
        self.set_pc_base(hi << 8 | lo);
        debug!("reset, entry ${:04X}", self.regs.pc);
    }

    /// Service pending interrupts, then execute one instruction.
    pub fn step(&mut self) {
        if self.flags.contains(EventFlags::HALTED) {
            return;
        }
        if self.flags.contains(EventFlags::NMI) {
            self.flags.remove(EventFlags::NMI);
            if self.waiting_for_interrupt {
                self.waiting_for_interrupt = false;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            self.interrupt(Interrupt::Nmi);
            return;
        }
        if self.flags.contains(EventFlags::IRQ) {
            if self.waiting_for_interrupt {
                self.waiting_for_interrupt = false;
                self.regs.pc = self.regs.pc.wrapping_add(1);
            }
            if !self.irq_disabled() {
                self.interrupt(Interrupt::Irq);
                return;
            }
        }
        self.opcode_start = self.shifted_pb | self.regs.pc as u32;
        let op = self.fetch_byte();
        trace!(
            "${:02X}:{:04X}  {}",
            self.regs.pb,
            self.opcode_start as u16,
            MNEMONICS[op as usize]
        );
        let handler = self.handler_for(op);
        handler(self);
    }

    /// Execute until the cycle counter reaches `target_cycles` or the CPU
    /// halts; returns the cycles consumed.
    pub fn step_until(&mut self, target_cycles: u64) -> u64 {
        let start = self.cycles;
        self.next_event = target_cycles;
        while self.cycles < self.next_event && !self.flags.contains(EventFlags::HALTED) {
            self.step();
        }
        self.cycles - start
    }

    /// Tighten the scheduler deadline mid-run.
    pub fn set_next_event(&mut self, cycles: u64) {
        self.next_event = cycles;
    }

    /// Latch an NMI edge; serviced before the next instruction.
    pub fn raise_nmi(&mut self) {
        self.flags.insert(EventFlags::NMI);
    }

    /// Assert the level-triggered IRQ line.
    pub fn raise_irq(&mut self) {
        self.flags.insert(EventFlags::IRQ);
    }

    /// Release the IRQ line.
    pub fn clear_irq(&mut self) {
        self.flags.remove(EventFlags::IRQ);
    }

    /// True after STP until the next reset.
    pub fn halted(&self) -> bool {
        self.flags.contains(EventFlags::HALTED)
    }

    /// Hardware interrupt entry. The first cycle is an opcode fetch, the
    /// second an internal cycle.
    fn interrupt(&mut self, source: Interrupt) {
        debug!("{:?} -> vector", source);
        self.cycles += self.mem_speed + ONE_CYCLE;
        if self.shutdown_enabled {
            self.wait_counter += 1;
        }
        let e = self.regs.e;
        self.pack_status();
        if e {
            self.push_w_e(self.regs.pc);
            // Bit 4 of the pushed byte tells BRK from hardware.
            self.push_b_e(self.regs.pl & !FLAG_X);
        } else {
            self.push_b(self.regs.pb);
            self.push_w(self.regs.pc);
            self.push_b(self.regs.pl);
        }
        self.regs.pl = (self.regs.pl | FLAG_I) & !FLAG_D;
        match self.bus.vector_override(source) {
            Some(addr) => {
                self.cycles += 2 * ONE_CYCLE;
                self.open_bus = (addr >> 8) as u8;
                self.set_pc_base(addr as u32);
            }
            None => {
                let addr = self.get_word(source.vector(e), Wrap::None);
                self.set_pc_base(addr as u32);
            }
        }
    }

    /// BRK/COP entry: like a hardware interrupt, but the signature byte is
    /// fetched (and skipped) and no vector redirection applies.
    pub(crate) fn software_interrupt(&mut self, source: Interrupt) {
        self.cycles += self.mem_speed;
        if self.shutdown_enabled {
            self.wait_counter += 1;
        }
        let e = self.regs.e;
        self.pack_status();
        let ret = self.regs.pc.wrapping_add(1);
        if e {
            self.push_w_e(ret);
            self.push_b_e(self.regs.pl | FLAG_X);
        } else {
            self.push_b(self.regs.pb);
            self.push_w(ret);
            self.push_b(self.regs.pl);
        }
        self.regs.pl = (self.regs.pl | FLAG_I) & !FLAG_D;
        let addr = self.get_word(source.vector(e), Wrap::None);
        self.set_pc_base(addr as u32);
    }

    /// A taken branch landed on the idle-loop anchor: fast-forward to the
    /// next event unless an interrupt could be observed early.
    pub(crate) fn cpu_shutdown(&mut self) {
        if !self.shutdown_enabled || self.shifted_pb | self.regs.pc as u32 != self.wait_pc {
            return;
        }
        if self.wait_counter == 0 && !self.flags.intersects(EventFlags::IRQ | EventFlags::NMI) {
            self.force_shutdown();
        } else if self.wait_counter >= 2 {
            self.wait_counter = 1;
        } else {
            self.wait_counter = self.wait_counter.saturating_sub(1);
        }
    }

    pub(crate) fn force_shutdown(&mut self) {
        self.wait_pc = 0;
        if self.cycles < self.next_event {
            self.cycles = self.next_event;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RamBus;
    use crate::test_support::{cpu_with_program, native_mode, step_n, RESET};

    #[test]
    fn reset_state() {
        let cpu = cpu_with_program(&[]);
        assert!(cpu.regs.e);
        assert_eq!(cpu.regs.s, 0x01FF);
        assert_ne!(cpu.regs.pl & (FLAG_M | FLAG_X | FLAG_I), 0);
        assert_eq!(cpu.regs.pl & FLAG_D, 0);
        assert_eq!(cpu.regs.pc, RESET);
        assert_eq!(cpu.regs.pb, 0);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn scenario_store_immediate() {
        // LDA #$42 / STA $2000
        let mut cpu = cpu_with_program(&[0xA9, 0x42, 0x8D, 0x00, 0x20]);
        step_n(&mut cpu, 2);
        assert_eq!(cpu.regs.al(), 0x42);
        assert_eq!(cpu.bus.read(0x002000), Some(0x42));
        assert_ne!(cpu.zero, 0);
        assert_eq!(cpu.negative & 0x80, 0);
        assert_eq!(cpu.cycles, 6 * ONE_CYCLE);
    }

    #[test]
    fn scenario_enter_native_and_widen() {
        // CLC / XCE / REP #$30 / LDA #$1234
        let mut cpu = cpu_with_program(&[0x18, 0xFB, 0xC2, 0x30, 0xA9, 0x34, 0x12]);
        step_n(&mut cpu, 4);
        assert!(!cpu.regs.e);
        assert_eq!(cpu.regs.pl & (FLAG_M | FLAG_X), 0);
        assert_eq!(cpu.regs.a, 0x1234);
        assert_ne!(cpu.zero, 0);
        assert_eq!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn scenario_countdown_loop() {
        // LDX #5 / loop: DEX / BNE loop
        let mut cpu = cpu_with_program(&[0xA2, 0x05, 0xCA, 0xD0, 0xFD]);
        step_n(&mut cpu, 11);
        assert_eq!(cpu.regs.x, 0);
        assert_eq!(cpu.zero, 0);
        assert_eq!(cpu.regs.pc, RESET + 5);
        // LDX 2 + 5*DEX 2 + 4 taken BNE 3 + 1 fallthrough BNE 2.
        assert_eq!(cpu.cycles, 26 * ONE_CYCLE);
    }

    #[test]
    fn scenario_binary_adc_wrap() {
        let mut cpu = cpu_with_program(&[0xA9, 0xFF, 0x69, 0x01]);
        step_n(&mut cpu, 2);
        assert_eq!(cpu.regs.al(), 0x00);
        assert!(cpu.carry);
        assert_eq!(cpu.zero, 0);
        assert!(!cpu.overflow);
        assert_eq!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn scenario_decimal_adc_wrap() {
        // Non-BCD 0xFF plus 1 in decimal mode: carry out, nibble-adjusted
        // result.
        let mut cpu = cpu_with_program(&[0xA9, 0xFF, 0xF8, 0x69, 0x01]);
        step_n(&mut cpu, 3);
        assert!(cpu.carry);
        assert_eq!(cpu.regs.al(), 0x66);
    }

    #[test]
    fn scenario_brk_emulation() {
        let mut cpu = cpu_with_program(&[0x00]);
        cpu.bus.load(0x00FFFE, &[0x00, 0x90]);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x9000);
        assert_eq!(cpu.regs.pb, 0);
        assert_ne!(cpu.regs.pl & FLAG_I, 0);
        assert_eq!(cpu.regs.pl & FLAG_D, 0);
        // Stack frame: PCH, PCL of the byte after the signature, then P
        // with the break bit set.
        assert_eq!(cpu.bus.read(0x0001FF), Some(0x80));
        assert_eq!(cpu.bus.read(0x0001FE), Some(0x02));
        let p = cpu.bus.read(0x0001FD).unwrap();
        assert_ne!(p & FLAG_X, 0, "break bit set for BRK");
        assert_eq!(cpu.regs.s, 0x01FC);
        // 7 cycles in emulation mode.
        assert_eq!(cpu.cycles, 7 * ONE_CYCLE);
        // Open bus holds the vector high byte.
        assert_eq!(cpu.open_bus, 0x90);
    }

    #[test]
    fn brk_native_pushes_program_bank() {
        let mut cpu = cpu_with_program(&[0x00]);
        native_mode(&mut cpu, true, true);
        cpu.bus.load(0x00FFE6, &[0x00, 0x90]);
        let start = cpu.cycles;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x9000);
        assert_eq!(cpu.bus.read(0x0001FF), Some(0x00), "PB");
        assert_eq!(cpu.bus.read(0x0001FE), Some(0x80));
        assert_eq!(cpu.bus.read(0x0001FD), Some(0x02));
        assert_eq!(cpu.regs.s, 0x01FB);
        assert_eq!(cpu.cycles - start, 8 * ONE_CYCLE);
    }

    #[test]
    fn nmi_entry_and_rti() {
        let mut cpu = cpu_with_program(&[0xA9, 0x01, 0xA9, 0x02]);
        cpu.bus.load(0x00FFFA, &[0x00, 0x90]);
        cpu.bus.load(0x009000, &[0x40]); // RTI
        step_n(&mut cpu, 1);
        cpu.raise_nmi();
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x9000);
        // Hardware interrupts clear the break bit in the pushed byte.
        let p = cpu.bus.read(0x0001FD).unwrap();
        assert_eq!(p & FLAG_X, 0);
        step_n(&mut cpu, 1); // RTI
        assert_eq!(cpu.regs.pc, RESET + 2);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x02);
    }

    #[test]
    fn irq_respects_interrupt_disable() {
        let mut cpu = cpu_with_program(&[0xA9, 0x01, 0x58, 0xA9, 0x02]);
        cpu.bus.load(0x00FFFE, &[0x00, 0x90]);
        cpu.raise_irq();
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x01, "masked IRQ does not fire");
        step_n(&mut cpu, 1); // CLI
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x9000, "unmasked level IRQ fires");
        // The line is level triggered; clearing it stops redelivery.
        cpu.clear_irq();
        assert!(cpu.flags.is_empty());
    }

    #[test]
    fn wai_wakes_on_masked_irq() {
        // WAI / LDA #$7E — IRQ with I set resumes after the WAI.
        let mut cpu = cpu_with_program(&[0xCB, 0xA9, 0x7E]);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, RESET, "WAI re-points at itself");
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, RESET, "still waiting");
        cpu.raise_irq();
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x7E);
        cpu.clear_irq();
    }

    #[test]
    fn stp_halts_until_reset() {
        let mut cpu = cpu_with_program(&[0xDB, 0xA9, 0x01]);
        step_n(&mut cpu, 1);
        assert!(cpu.halted());
        assert_eq!(cpu.step_until(cpu.cycles + 1000), 0);
        assert_eq!(cpu.regs.al(), 0x00);
        cpu.reset();
        assert!(!cpu.halted());
    }

    #[test]
    fn step_until_returns_delta() {
        let mut cpu = cpu_with_program(&[0xEA, 0xEA, 0xEA, 0xEA, 0x80, 0xFA]);
        let used = cpu.step_until(10 * ONE_CYCLE);
        assert!(used >= 10 * ONE_CYCLE);
        assert_eq!(used, cpu.cycles);
    }

    #[test]
    fn idle_loop_fast_forward() {
        // loop: LDA $4012 / BEQ loop — a classic status poll.
        let mut cpu = cpu_with_program(&[0xAD, 0x12, 0x40, 0xF0, 0xFB]);
        cpu.bus.mark_wait_address(0x004012);
        cpu.set_shutdown_enabled(true);
        let target = 100_000 * ONE_CYCLE;
        let used = cpu.step_until(target);
        assert_eq!(used, target, "cycles jumped to the deadline");
        assert_eq!(cpu.regs.pc, RESET, "still parked on the loop head");
    }

    #[test]
    fn fast_forward_does_not_fire_with_pending_irq() {
        let mut cpu = cpu_with_program(&[0xAD, 0x12, 0x40, 0xF0, 0xFB]);
        cpu.bus.load(0x00FFFE, &[0x00, 0x90]);
        cpu.bus.load(0x009000, &[0xDB]); // handler: STP
        cpu.bus.mark_wait_address(0x004012);
        cpu.set_shutdown_enabled(true);
        cpu.regs.pl &= !FLAG_I;
        cpu.raise_irq();
        let target = 100_000 * ONE_CYCLE;
        cpu.step_until(target);
        assert!(cpu.halted(), "IRQ was delivered, not skipped");
        assert!(cpu.cycles < target);
    }

    #[test]
    fn wai_fast_forwards_when_enabled() {
        let mut cpu = cpu_with_program(&[0xCB]);
        cpu.set_shutdown_enabled(true);
        let target = 50_000 * ONE_CYCLE;
        let used = cpu.step_until(target);
        assert_eq!(used, target);
    }

    #[test]
    fn inc_disarms_idle_detector() {
        // The polled value is changed by the loop body, so the shutdown
        // anchor must be dropped each time.
        let mut cpu = cpu_with_program(&[0xAD, 0x12, 0x40, 0xEE, 0x12, 0x40, 0xF0, 0xF8]);
        cpu.bus.mark_wait_address(0x004012);
        cpu.set_shutdown_enabled(true);
        cpu.bus.load(0x004012, &[0xFF]);
        cpu.set_next_event(1_000_000 * ONE_CYCLE);
        // Two trips round the loop; INC clears wait_pc before each branch.
        step_n(&mut cpu, 6);
        assert!(cpu.cycles < 1_000_000 * ONE_CYCLE);
        assert_eq!(cpu.regs.pc, RESET + 8, "loop exited normally");
    }

    struct RedirectBus {
        ram: RamBus,
        claimed: bool,
    }

    impl Bus for RedirectBus {
        fn speed(&self, addr: u32) -> u64 {
            self.ram.speed(addr)
        }
        fn read(&mut self, addr: u32) -> Option<u8> {
            self.ram.read(addr)
        }
        fn write(&mut self, addr: u32, value: u8) {
            self.ram.write(addr, value)
        }
        fn vector_override(&mut self, source: Interrupt) -> Option<u16> {
            (self.claimed && source == Interrupt::Irq).then_some(0xA000)
        }
    }

    #[test]
    fn coprocessor_vector_redirection() {
        let mut ram = RamBus::new(0x20000);
        ram.load(0x00FFFC, &[0x00, 0x80]);
        ram.load(0x008000, &[0xEA]);
        let mut cpu = crate::Cpu::new(RedirectBus { ram, claimed: true });
        cpu.reset();
        cpu.regs.pl &= !FLAG_I;
        cpu.raise_irq();
        let before = cpu.cycles;
        cpu.step();
        assert_eq!(cpu.regs.pc, 0xA000);
        assert_eq!(cpu.open_bus, 0xA0, "redirected vector high byte on the bus");
        // Opcode fetch + internal + 3 pushes + 2 redirect cycles.
        assert_eq!(cpu.cycles - before, 7 * ONE_CYCLE);
        cpu.clear_irq();
    }

    #[test]
    fn php_plp_restores_flags_via_program() {
        // SEC / PHP / CLC / PLP leaves carry set again.
        let mut cpu = cpu_with_program(&[0x38, 0x08, 0x18, 0x28]);
        step_n(&mut cpu, 4);
        assert!(cpu.carry);
        assert_eq!(cpu.regs.s, 0x01FF);
    }
}
