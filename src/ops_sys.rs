//! Flag control, register transfers, mode switches and system
//! instructions, including the repurposed speed-hack opcodes.

use crate::cpu::{Cpu, EventFlags};
use crate::execute::Interrupt;
use crate::memory::Bus;
use crate::registers::{FLAG_C, FLAG_D, FLAG_I, FLAG_V, FLAG_Z};

impl<B: Bus> Cpu<B> {
    // --- flag set/clear ---------------------------------------------------
    pub(crate) fn clc(cpu: &mut Self) {
        cpu.carry = false;
        cpu.one_cycle();
    }

    pub(crate) fn sec(cpu: &mut Self) {
        cpu.carry = true;
        cpu.one_cycle();
    }

    pub(crate) fn cld(cpu: &mut Self) {
        cpu.regs.pl &= !FLAG_D;
        cpu.one_cycle();
    }

    pub(crate) fn sed(cpu: &mut Self) {
        cpu.regs.pl |= FLAG_D;
        cpu.one_cycle();
    }

    pub(crate) fn cli(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.regs.pl &= !FLAG_I;
    }

    pub(crate) fn sei(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.regs.pl |= FLAG_I;
    }

    pub(crate) fn clv(cpu: &mut Self) {
        cpu.overflow = false;
        cpu.one_cycle();
    }

    // --- REP / SEP --------------------------------------------------------
    pub(crate) fn rep(cpu: &mut Self) {
        let mask = !cpu.fetch_byte();
        cpu.regs.pl &= mask;
        cpu.carry &= mask & FLAG_C != 0;
        cpu.overflow &= mask & FLAG_V != 0;
        cpu.negative &= mask;
        cpu.zero |= !mask & FLAG_Z;
        cpu.one_cycle();
        cpu.update_mode();
    }

    pub(crate) fn sep(cpu: &mut Self) {
        let bits = cpu.fetch_byte();
        cpu.regs.pl |= bits;
        cpu.carry |= bits & FLAG_C != 0;
        cpu.overflow |= bits & FLAG_V != 0;
        cpu.negative |= bits;
        if bits & FLAG_Z != 0 {
            cpu.zero = 0;
        }
        cpu.one_cycle();
        cpu.update_mode();
    }

    // --- transfers --------------------------------------------------------
    pub(crate) fn tax_x1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.al();
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn tax_x0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a;
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tax_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::tax_x1(cpu);
        } else {
            Self::tax_x0(cpu);
        }
    }

    pub(crate) fn tay_x1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.al();
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn tay_x0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a;
        cpu.regs.y = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tay_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::tay_x1(cpu);
        } else {
            Self::tay_x0(cpu);
        }
    }

    pub(crate) fn txa_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.xl();
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn txa_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.x;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn txa_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::txa_m1(cpu);
        } else {
            Self::txa_m0(cpu);
        }
    }

    pub(crate) fn tya_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.yl();
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn tya_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.y;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tya_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::tya_m1(cpu);
        } else {
            Self::tya_m0(cpu);
        }
    }

    pub(crate) fn txy_x1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.xl();
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn txy_x0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.x;
        cpu.regs.y = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn txy_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::txy_x1(cpu);
        } else {
            Self::txy_x0(cpu);
        }
    }

    pub(crate) fn tyx_x1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.yl();
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn tyx_x0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.y;
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tyx_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::tyx_x1(cpu);
        } else {
            Self::tyx_x0(cpu);
        }
    }

    pub(crate) fn tsx_x1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.sl();
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn tsx_x0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.s;
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tsx_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::tsx_x1(cpu);
        } else {
            Self::tsx_x0(cpu);
        }
    }

    /// TXS is always a 16-bit transfer and sets no flags; emulation mode
    /// re-latches the stack page.
    pub(crate) fn txs(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.regs.s = cpu.regs.x;
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    pub(crate) fn tcd(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a;
        cpu.regs.d = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tdc(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.d;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn tcs(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.regs.s = cpu.regs.a;
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    pub(crate) fn tsc(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.s;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    // --- XBA / XCE --------------------------------------------------------
    pub(crate) fn xba(cpu: &mut Self) {
        let lo = cpu.regs.al();
        let hi = cpu.regs.ah();
        cpu.regs.set_al(hi);
        cpu.regs.set_ah(lo);
        cpu.set_zn8(hi);
        cpu.two_cycles();
    }

    pub(crate) fn xce(cpu: &mut Self) {
        cpu.one_cycle();
        let carry = cpu.carry;
        cpu.carry = cpu.regs.e;
        cpu.regs.e = carry;
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
        cpu.update_mode();
    }

    // --- NOP / WDM --------------------------------------------------------
    pub(crate) fn nop(cpu: &mut Self) {
        cpu.one_cycle();
    }

    /// Opcode 0x42. Architecturally WDM, a two-byte reserved no-op; with
    /// speed hacks enabled the operand encodes a compact backward branch.
    pub(crate) fn wdm_or_hack(cpu: &mut Self) {
        if !cpu.speed_hacks {
            let _ = cpu.fetch_byte();
            return;
        }
        let next = cpu.fetch_byte();
        cpu.force_shutdown();
        let offset = (0xF0 | (next & 0x0F)) as i8;
        let target = cpu.regs.pc.wrapping_add(offset as u16);
        let e = cpu.regs.e;
        match next & 0xF0 {
            0x10 => {
                let cond = cpu.negative & 0x80 == 0;
                cpu.hack_branch(target, cond, e);
            }
            0x30 => {
                let cond = cpu.negative & 0x80 != 0;
                cpu.hack_branch(target, cond, e);
            }
            0x50 => {
                let cond = !cpu.overflow;
                cpu.hack_branch(target, cond, e);
            }
            0x70 => {
                let cond = cpu.overflow;
                cpu.hack_branch(target, cond, e);
            }
            0x80 => cpu.take_branch(target, e),
            0x90 => {
                let cond = !cpu.carry;
                cpu.hack_branch(target, cond, e);
            }
            0xB0 => {
                let cond = cpu.carry;
                cpu.hack_branch(target, cond, e);
            }
            0xD0 => {
                let cond = cpu.zero != 0;
                cpu.hack_branch(target, cond, e);
            }
            0xF0 => {
                let cond = cpu.zero == 0;
                cpu.hack_branch(target, cond, e);
            }
            _ => {}
        }
    }

    fn hack_branch(&mut self, target: u16, cond: bool, e_penalty: bool) {
        if self.branch_skip {
            self.branch_skip = false;
            if self.regs.pc > target {
                return;
            }
        }
        if cond {
            self.take_branch(target, e_penalty);
        }
    }

    // --- WAI / STP --------------------------------------------------------
    pub(crate) fn wai(cpu: &mut Self) {
        cpu.waiting_for_interrupt = true;
        cpu.regs.pc = cpu.regs.pc.wrapping_sub(1);
        if cpu.shutdown_enabled && !cpu.flags.intersects(EventFlags::IRQ | EventFlags::NMI) {
            if cpu.cycles < cpu.next_event {
                cpu.cycles = cpu.next_event;
            }
        } else {
            cpu.one_cycle();
        }
    }

    fn stp(cpu: &mut Self) {
        cpu.regs.pc = cpu.regs.pc.wrapping_sub(1);
        cpu.one_cycle();
        cpu.flags.insert(EventFlags::HALTED);
    }

    /// Opcode 0xDB. Architecturally STP; with speed hacks enabled the next
    /// byte encodes a BNE/BEQ with a widened offset.
    pub(crate) fn stp_or_hack(cpu: &mut Self) {
        if !cpu.speed_hacks {
            Self::stp(cpu);
            return;
        }
        let next = cpu.fetch_byte();
        cpu.force_shutdown();
        let offset = ((next & 0x7F) | ((next & 0x40) << 1)) as i8;
        let target = cpu.regs.pc.wrapping_add(offset as u16);
        let e = cpu.regs.e;
        if next & 0x80 == 0 {
            let cond = cpu.zero != 0;
            cpu.hack_branch(target, cond, e);
        } else {
            let cond = cpu.zero == 0;
            cpu.hack_branch(target, cond, e);
        }
    }

    // --- software interrupts ----------------------------------------------
    pub(crate) fn brk(cpu: &mut Self) {
        cpu.software_interrupt(Interrupt::Brk);
    }

    pub(crate) fn cop(cpu: &mut Self) {
        cpu.software_interrupt(Interrupt::Cop);
    }
}

#[cfg(test)]
mod tests {
    use crate::dispatch::TableKey;
    use crate::registers::{FLAG_D, FLAG_I, FLAG_M, FLAG_X};
    use crate::test_support::{cpu_with_program, native_mode, step_n};

    #[test]
    fn flag_instructions() {
        let mut cpu = cpu_with_program(&[0x38, 0x18, 0xF8, 0xD8, 0x78, 0x58, 0xB8]);
        step_n(&mut cpu, 1);
        assert!(cpu.carry);
        step_n(&mut cpu, 1);
        assert!(!cpu.carry);
        step_n(&mut cpu, 1);
        assert_ne!(cpu.regs.pl & FLAG_D, 0);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pl & FLAG_D, 0);
        step_n(&mut cpu, 1);
        assert_ne!(cpu.regs.pl & FLAG_I, 0);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pl & FLAG_I, 0);
        cpu.overflow = true;
        step_n(&mut cpu, 1);
        assert!(!cpu.overflow);
    }

    #[test]
    fn xce_enters_native_mode() {
        // CLC / XCE
        let mut cpu = cpu_with_program(&[0x18, 0xFB]);
        step_n(&mut cpu, 2);
        assert!(!cpu.regs.e);
        assert!(cpu.carry, "old emulation latch lands in carry");
        assert_ne!(cpu.regs.pl & FLAG_M, 0, "M stays 8-bit until REP");
        assert_eq!(cpu.mode_key, TableKey::M1X1);
    }

    #[test]
    fn xce_back_to_emulation_forces_widths() {
        let mut cpu = cpu_with_program(&[0x38, 0xFB]);
        native_mode(&mut cpu, false, false);
        cpu.regs.s = 0x12FF;
        cpu.regs.x = 0x1234;
        step_n(&mut cpu, 2);
        assert!(cpu.regs.e);
        assert!(!cpu.carry);
        assert_ne!(cpu.regs.pl & (FLAG_M | FLAG_X), 0);
        assert_eq!(cpu.regs.sh(), 0x01);
        assert_eq!(cpu.regs.x, 0x0034, "X high byte cleared");
        assert_eq!(cpu.mode_key, TableKey::Emulation);
    }

    #[test]
    fn rep_sep_update_widths_and_flags() {
        let mut cpu = cpu_with_program(&[0xC2, 0x30, 0xE2, 0x21]);
        native_mode(&mut cpu, true, true);
        cpu.regs.x = 0x0012;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pl & (FLAG_M | FLAG_X), 0);
        assert_eq!(cpu.mode_key, TableKey::M0X0);
        cpu.regs.x = 0xAB12;
        step_n(&mut cpu, 1);
        // SEP #$21 also sets carry; X stays 16-bit.
        assert_ne!(cpu.regs.pl & FLAG_M, 0);
        assert!(cpu.carry);
        assert_eq!(cpu.regs.x, 0xAB12);
        assert_eq!(cpu.mode_key, TableKey::M1X0);
    }

    #[test]
    fn rep_clears_individual_flags() {
        let mut cpu = cpu_with_program(&[0xC2, 0x02]);
        native_mode(&mut cpu, true, true);
        cpu.zero = 0;
        step_n(&mut cpu, 1);
        assert_ne!(cpu.zero, 0, "Z cleared by REP #$02");
    }

    #[test]
    fn sep_zeroes_index_high_bytes() {
        let mut cpu = cpu_with_program(&[0xE2, 0x10]);
        native_mode(&mut cpu, true, false);
        cpu.regs.x = 0x1234;
        cpu.regs.y = 0x5678;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.x, 0x0034);
        assert_eq!(cpu.regs.y, 0x0078);
    }

    #[test]
    fn transfers() {
        let mut cpu = cpu_with_program(&[0xAA, 0xA8, 0x9B, 0xBB, 0xBA, 0x9A]);
        cpu.regs.a = 0x0042;
        step_n(&mut cpu, 2);
        assert_eq!(cpu.regs.xl(), 0x42);
        assert_eq!(cpu.regs.yl(), 0x42);
        cpu.regs.x = 0x0011;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.yl(), 0x11);
        cpu.regs.y = 0x0022;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.xl(), 0x22);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.xl(), 0xFF, "TSX copies SL");
        cpu.regs.x = 0x0080;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.s, 0x0180, "TXS keeps SH latched in emulation");
    }

    #[test]
    fn sixteen_bit_transfers_ignore_m() {
        let mut cpu = cpu_with_program(&[0x5B, 0x7B, 0x1B, 0x3B]);
        native_mode(&mut cpu, true, true);
        cpu.regs.a = 0x1234;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.d, 0x1234, "TCD moves all 16 bits despite M=1");
        cpu.regs.a = 0;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0x1234);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.s, 0x1234);
        cpu.regs.s = 0x01FD;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0x01FD);
    }

    #[test]
    fn xba_swaps_and_flags_low_byte() {
        let mut cpu = cpu_with_program(&[0xEB, 0xEB]);
        cpu.regs.a = 0x80FF;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0xFF80);
        assert_ne!(cpu.negative & 0x80, 0, "N from the new AL");
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0x80FF, "XBA twice restores A");
        assert_eq!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn wdm_is_two_byte_nop_by_default() {
        let mut cpu = cpu_with_program(&[0x42, 0x55, 0xA9, 0x01]);
        step_n(&mut cpu, 2);
        assert_eq!(cpu.regs.pc, 0x8004);
        assert_eq!(cpu.regs.al(), 0x01);
    }

    #[test]
    fn speed_hack_0x42_decodes_branch() {
        // 0x42 0xD0: BNE with offset 0xF0 (-16).
        let mut cpu = cpu_with_program(&[0x42, 0xD0]);
        cpu.set_speed_hacks(true);
        cpu.zero = 1;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x8002u16.wrapping_sub(16));

        // Not taken falls through.
        let mut cpu = cpu_with_program(&[0x42, 0xD0]);
        cpu.set_speed_hacks(true);
        cpu.zero = 0;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.pc, 0x8002);
    }

    #[test]
    fn speed_hack_0xdb_decodes_bne_beq() {
        // Bit 7 selects BEQ; low bits widen to a negative offset.
        let mut cpu = cpu_with_program(&[0xDB, 0xFD]);
        cpu.set_speed_hacks(true);
        cpu.zero = 0;
        step_n(&mut cpu, 1);
        // offset = (0x7D | 0x80) as i8 = -3
        assert_eq!(cpu.regs.pc, 0x7FFF);
    }
}
