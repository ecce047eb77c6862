//! Push and pull handlers.
//!
//! Emulation-mode variants keep the stack pointer inside page 1. The
//! 65C816-only instructions (PEA, PEI, PER, PHD, PLD) push full words even
//! in emulation mode and only re-latch SH afterwards.

use crate::addressing::Access;
use crate::cpu::Cpu;
use crate::memory::Bus;

impl<B: Bus> Cpu<B> {
    // --- PHP --------------------------------------------------------------
    pub(crate) fn php_e1(cpu: &mut Self) {
        cpu.pack_status();
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.pl);
    }

    pub(crate) fn php_e0(cpu: &mut Self) {
        cpu.pack_status();
        cpu.one_cycle();
        cpu.push_b(cpu.regs.pl);
    }

    pub(crate) fn php_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::php_e1(cpu);
        } else {
            Self::php_e0(cpu);
        }
    }

    // --- PHA --------------------------------------------------------------
    pub(crate) fn pha_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.al());
    }

    pub(crate) fn pha_m1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b(cpu.regs.al());
    }

    pub(crate) fn pha_m0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.a);
    }

    pub(crate) fn pha_slow(cpu: &mut Self) {
        cpu.one_cycle();
        if cpu.regs.e {
            cpu.push_b_e(cpu.regs.al());
        } else if cpu.mem8() {
            cpu.push_b(cpu.regs.al());
        } else {
            cpu.push_w(cpu.regs.a);
        }
    }

    // --- PHB / PHK --------------------------------------------------------
    pub(crate) fn phb_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.db);
    }

    pub(crate) fn phb_e0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b(cpu.regs.db);
    }

    pub(crate) fn phb_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::phb_e1(cpu);
        } else {
            Self::phb_e0(cpu);
        }
    }

    pub(crate) fn phk_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.pb);
    }

    pub(crate) fn phk_e0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b(cpu.regs.pb);
    }

    pub(crate) fn phk_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::phk_e1(cpu);
        } else {
            Self::phk_e0(cpu);
        }
    }

    // --- PHD --------------------------------------------------------------
    pub(crate) fn phd_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.d);
        cpu.regs.set_sh(0x01);
    }

    pub(crate) fn phd_e0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.d);
    }

    pub(crate) fn phd_slow(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.d);
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    // --- PHX / PHY --------------------------------------------------------
    pub(crate) fn phx_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.xl());
    }

    pub(crate) fn phx_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b(cpu.regs.xl());
    }

    pub(crate) fn phx_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.x);
    }

    pub(crate) fn phx_slow(cpu: &mut Self) {
        cpu.one_cycle();
        if cpu.regs.e {
            cpu.push_b_e(cpu.regs.xl());
        } else if cpu.index8() {
            cpu.push_b(cpu.regs.xl());
        } else {
            cpu.push_w(cpu.regs.x);
        }
    }

    pub(crate) fn phy_e1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b_e(cpu.regs.yl());
    }

    pub(crate) fn phy_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_b(cpu.regs.yl());
    }

    pub(crate) fn phy_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.push_w(cpu.regs.y);
    }

    pub(crate) fn phy_slow(cpu: &mut Self) {
        cpu.one_cycle();
        if cpu.regs.e {
            cpu.push_b_e(cpu.regs.yl());
        } else if cpu.index8() {
            cpu.push_b(cpu.regs.yl());
        } else {
            cpu.push_w(cpu.regs.y);
        }
    }

    // --- PLA --------------------------------------------------------------
    pub(crate) fn pla_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b_e();
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn pla_m1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b();
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn pla_m0(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn pla_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::pla_e1(cpu);
        } else if cpu.mem8() {
            Self::pla_m1(cpu);
        } else {
            Self::pla_m0(cpu);
        }
    }

    // --- PLB --------------------------------------------------------------
    pub(crate) fn plb_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b_e();
        cpu.regs.db = v;
        cpu.shifted_db = (v as u32) << 16;
        cpu.set_zn8(v);
    }

    pub(crate) fn plb_e0(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b();
        cpu.regs.db = v;
        cpu.shifted_db = (v as u32) << 16;
        cpu.set_zn8(v);
    }

    pub(crate) fn plb_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::plb_e1(cpu);
        } else {
            Self::plb_e0(cpu);
        }
    }

    // --- PLD --------------------------------------------------------------
    pub(crate) fn pld_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.d = v;
        cpu.set_zn16(v);
        cpu.regs.set_sh(0x01);
    }

    pub(crate) fn pld_e0(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.d = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn pld_slow(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.d = v;
        cpu.set_zn16(v);
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    // --- PLP --------------------------------------------------------------
    pub(crate) fn plp_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let p = cpu.pull_b_e();
        cpu.regs.pl = p;
        cpu.unpack_status();
        cpu.update_mode();
    }

    pub(crate) fn plp_e0(cpu: &mut Self) {
        cpu.two_cycles();
        let p = cpu.pull_b();
        cpu.regs.pl = p;
        cpu.unpack_status();
        cpu.update_mode();
    }

    pub(crate) fn plp_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::plp_e1(cpu);
        } else {
            Self::plp_e0(cpu);
        }
    }

    // --- PLX / PLY --------------------------------------------------------
    pub(crate) fn plx_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b_e();
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn plx_x1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b();
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn plx_x0(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn plx_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::plx_e1(cpu);
        } else if cpu.index8() {
            Self::plx_x1(cpu);
        } else {
            Self::plx_x0(cpu);
        }
    }

    pub(crate) fn ply_e1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b_e();
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn ply_x1(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_b();
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn ply_x0(cpu: &mut Self) {
        cpu.two_cycles();
        let v = cpu.pull_w();
        cpu.regs.y = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn ply_slow(cpu: &mut Self) {
        if cpu.regs.e {
            Self::ply_e1(cpu);
        } else if cpu.index8() {
            Self::ply_x1(cpu);
        } else {
            Self::ply_x0(cpu);
        }
    }

    // --- PEA / PEI / PER --------------------------------------------------
    pub(crate) fn pea_e1(cpu: &mut Self) {
        let val = cpu.fetch_word();
        cpu.push_w(val);
        cpu.regs.set_sh(0x01);
    }

    pub(crate) fn pea_e0(cpu: &mut Self) {
        let val = cpu.fetch_word();
        cpu.push_w(val);
    }

    pub(crate) fn pea_slow(cpu: &mut Self) {
        let val = cpu.fetch_word();
        cpu.push_w(val);
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    pub(crate) fn pei_e1(cpu: &mut Self) {
        let val = cpu.direct_indirect_e1(Access::None) as u16;
        cpu.push_w(val);
        cpu.regs.set_sh(0x01);
    }

    pub(crate) fn pei_e0(cpu: &mut Self) {
        let val = cpu.direct_indirect_e0(Access::None) as u16;
        cpu.push_w(val);
    }

    pub(crate) fn pei_slow(cpu: &mut Self) {
        let val = cpu.direct_indirect_slow(Access::None) as u16;
        cpu.push_w(val);
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }

    pub(crate) fn per_e1(cpu: &mut Self) {
        let val = cpu.relative_long(Access::None);
        cpu.one_cycle();
        cpu.push_w(val);
        cpu.regs.set_sh(0x01);
    }

    pub(crate) fn per_e0(cpu: &mut Self) {
        let val = cpu.relative_long(Access::None);
        cpu.one_cycle();
        cpu.push_w(val);
    }

    pub(crate) fn per_slow(cpu: &mut Self) {
        let val = cpu.relative_long(Access::None);
        cpu.one_cycle();
        cpu.push_w(val);
        if cpu.regs.e {
            cpu.regs.set_sh(0x01);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::{Bus, ONE_CYCLE};
    use crate::test_support::{cpu_with_program, native_mode, step_n};

    #[test]
    fn php_plp_roundtrip() {
        let mut cpu = cpu_with_program(&[0x08, 0x28]);
        cpu.carry = true;
        cpu.overflow = true;
        cpu.zero = 1;
        cpu.negative = 0x80;
        step_n(&mut cpu, 1);
        let pushed = cpu.bus.read(0x0001FF).unwrap();
        // Scramble, then pull back.
        cpu.carry = false;
        cpu.overflow = false;
        cpu.negative = 0;
        step_n(&mut cpu, 1);
        assert!(cpu.carry);
        assert!(cpu.overflow);
        assert_ne!(cpu.negative & 0x80, 0);
        assert_ne!(cpu.zero, 0);
        cpu.pack_status();
        assert_eq!(cpu.regs.pl, pushed);
    }

    #[test]
    fn pha_pla_preserves_width() {
        let mut cpu = cpu_with_program(&[0x48, 0x68]);
        native_mode(&mut cpu, false, false);
        cpu.regs.s = 0x1FF;
        cpu.regs.a = 0xCAFE;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.s, 0x1FD);
        cpu.regs.a = 0;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0xCAFE);
        assert_eq!(cpu.regs.s, 0x1FF);
    }

    #[test]
    fn word_push_pops_low_byte_first() {
        // PHA (16-bit) then two 8-bit PLAs: low byte comes off first.
        let mut cpu = cpu_with_program(&[0x48, 0xE2, 0x20, 0x68, 0x68]);
        native_mode(&mut cpu, false, false);
        cpu.regs.a = 0x1234;
        step_n(&mut cpu, 2);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x34);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x12);
    }

    #[test]
    fn emulation_stack_wraps_in_page_one() {
        let mut cpu = cpu_with_program(&[0x48, 0x48]);
        cpu.regs.s = 0x0100;
        cpu.regs.set_al(0xAB);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.s, 0x01FF, "SL wraps, SH stays 0x01");
        assert_eq!(cpu.bus.read(0x000100), Some(0xAB));
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x0001FF), Some(0xAB));
    }

    #[test]
    fn phd_ignores_emulation_bounds_but_relatches() {
        let mut cpu = cpu_with_program(&[0x0B]);
        cpu.regs.s = 0x0100;
        cpu.regs.d = 0x1234;
        step_n(&mut cpu, 1);
        // The 16-bit push went below page 1, then SH snapped back.
        assert_eq!(cpu.bus.read(0x000100), Some(0x12));
        assert_eq!(cpu.bus.read(0x0000FF), Some(0x34));
        assert_eq!(cpu.regs.sh(), 0x01);
        assert_eq!(cpu.regs.sl(), 0xFE);
    }

    #[test]
    fn phd_pld_roundtrip() {
        let mut cpu = cpu_with_program(&[0x0B, 0x2B]);
        native_mode(&mut cpu, true, true);
        cpu.regs.d = 0x4321;
        step_n(&mut cpu, 1);
        cpu.regs.d = 0;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.d, 0x4321);
        assert_eq!(cpu.regs.s, 0x01FF);
        assert_eq!(cpu.zero, 1);
        assert_eq!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn phb_plb_refreshes_shifted_bank() {
        let mut cpu = cpu_with_program(&[0xAB]);
        cpu.bus.load(0x000100, &[0x7E]);
        cpu.regs.s = 0x00FF;
        native_mode(&mut cpu, true, true);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.db, 0x7E);
        assert_eq!(cpu.shifted_db, 0x7E0000);
    }

    #[test]
    fn pea_pushes_operand() {
        let mut cpu = cpu_with_program(&[0xF4, 0x34, 0x12]);
        let start = cpu.cycles;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x0001FF), Some(0x12));
        assert_eq!(cpu.bus.read(0x0001FE), Some(0x34));
        assert_eq!(cpu.cycles - start, 5 * ONE_CYCLE);
    }

    #[test]
    fn per_pushes_pc_relative_value() {
        let mut cpu = cpu_with_program(&[0x62, 0x10, 0x00]);
        let start = cpu.cycles;
        step_n(&mut cpu, 1);
        // PC after the operand is 0x8003; +0x10 = 0x8013.
        assert_eq!(cpu.bus.read(0x0001FF), Some(0x80));
        assert_eq!(cpu.bus.read(0x0001FE), Some(0x13));
        assert_eq!(cpu.cycles - start, 6 * ONE_CYCLE);
    }

    #[test]
    fn pei_pushes_pointer() {
        let mut cpu = cpu_with_program(&[0xD4, 0x20]);
        cpu.bus.load(0x000020, &[0xCD, 0xAB]);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x0001FF), Some(0xAB));
        assert_eq!(cpu.bus.read(0x0001FE), Some(0xCD));
    }
}
