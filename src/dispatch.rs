//! Opcode dispatch.
//!
//! Five 256-entry tables of handler pointers cover the fast paths: one for
//! emulation mode and one per native (M, X) width combination. A sixth
//! "slow" table of runtime-branching handlers takes over while any
//! asynchronous event flag is set. The five fast tables are monomorphized
//! from one entry selector keyed by the compile-time (E, M, X) triple, so
//! the per-opcode variant wiring exists exactly once.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::cpu::Cpu;
use crate::memory::Bus;

/// One opcode handler: fetches its own operands, performs the operation,
/// updates flags and cycles.
pub type OpcodeFn<B> = fn(&mut Cpu<B>);

/// Which dispatch table the mode bits select.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TableKey {
    M0X0 = 0,
    M0X1 = 1,
    M1X0 = 2,
    M1X1 = 3,
    Emulation = 4,
}

/// Table selection is a lookup on the 3-bit (E, M, X) key; emulation mode
/// forces M=X=1, so all four E=1 slots map to the emulation table.
const MODE_TABLES: [TableKey; 8] = [
    TableKey::M0X0,
    TableKey::M0X1,
    TableKey::M1X0,
    TableKey::M1X1,
    TableKey::Emulation,
    TableKey::Emulation,
    TableKey::Emulation,
    TableKey::Emulation,
];

impl TableKey {
    pub(crate) fn select(e: bool, m8: bool, x8: bool) -> TableKey {
        MODE_TABLES[(e as usize) << 2 | (m8 as usize) << 1 | x8 as usize]
    }
}

impl<B: Bus> Cpu<B> {
    pub(crate) const OPS_E1: [OpcodeFn<B>; 256] = Self::fast_table::<true, true, true>();
    pub(crate) const OPS_M1X1: [OpcodeFn<B>; 256] = Self::fast_table::<false, true, true>();
    pub(crate) const OPS_M1X0: [OpcodeFn<B>; 256] = Self::fast_table::<false, true, false>();
    pub(crate) const OPS_M0X1: [OpcodeFn<B>; 256] = Self::fast_table::<false, false, true>();
    pub(crate) const OPS_M0X0: [OpcodeFn<B>; 256] = Self::fast_table::<false, false, false>();
    pub(crate) const OPS_SLOW: [OpcodeFn<B>; 256] = Self::slow_table();

    /// The handler for `op` under the current mode, or the slow table while
    /// any event flag is pending.
    pub(crate) fn handler_for(&self, op: u8) -> OpcodeFn<B> {
        if !self.flags.is_empty() {
            return Self::OPS_SLOW[op as usize];
        }
        match self.mode_key {
            TableKey::Emulation => Self::OPS_E1[op as usize],
            TableKey::M1X1 => Self::OPS_M1X1[op as usize],
            TableKey::M1X0 => Self::OPS_M1X0[op as usize],
            TableKey::M0X1 => Self::OPS_M0X1[op as usize],
            TableKey::M0X0 => Self::OPS_M0X0[op as usize],
        }
    }

    const fn fast_table<const E1: bool, const M1: bool, const X1: bool>() -> [OpcodeFn<B>; 256] {
        let mut table = [Self::nop as OpcodeFn<B>; 256];
        let mut op = 0usize;
        while op < 256 {
            table[op] = Self::fast_entry::<E1, M1, X1>(op as u8);
            op += 1;
        }
        table
    }

    const fn slow_table() -> [OpcodeFn<B>; 256] {
        let mut table = [Self::nop as OpcodeFn<B>; 256];
        let mut op = 0usize;
        while op < 256 {
            table[op] = Self::slow_entry(op as u8);
            op += 1;
        }
        table
    }

    #[rustfmt::skip]
    const fn fast_entry<const E1: bool, const M1: bool, const X1: bool>(op: u8) -> OpcodeFn<B> {
        match op {
            0x00 => Self::brk,
            0x01 => if E1 { Self::ora_dpix_e1 } else if M1 { Self::ora_dpix_m1 } else { Self::ora_dpix_m0 },
            0x02 => Self::cop,
            0x03 => if M1 { Self::ora_sr_m1 } else { Self::ora_sr_m0 },
            0x04 => if M1 { Self::tsb_dp_m1 } else { Self::tsb_dp_m0 },
            0x05 => if M1 { Self::ora_dp_m1 } else { Self::ora_dp_m0 },
            0x06 => if M1 { Self::asl_dp_m1 } else { Self::asl_dp_m0 },
            0x07 => if M1 { Self::ora_dpil_m1 } else { Self::ora_dpil_m0 },
            0x08 => if E1 { Self::php_e1 } else { Self::php_e0 },
            0x09 => if M1 { Self::ora_imm_m1 } else { Self::ora_imm_m0 },
            0x0A => if M1 { Self::asl_a_m1 } else { Self::asl_a_m0 },
            0x0B => if E1 { Self::phd_e1 } else { Self::phd_e0 },
            0x0C => if M1 { Self::tsb_abs_m1 } else { Self::tsb_abs_m0 },
            0x0D => if M1 { Self::ora_abs_m1 } else { Self::ora_abs_m0 },
            0x0E => if M1 { Self::asl_abs_m1 } else { Self::asl_abs_m0 },
            0x0F => if M1 { Self::ora_abl_m1 } else { Self::ora_abl_m0 },
            0x10 => if E1 { Self::bpl_e1 } else { Self::bpl_e0 },
            0x11 => if E1 { Self::ora_dpiy_e1 } else if M1 { Self::ora_dpiy_m1 } else { Self::ora_dpiy_m0 },
            0x12 => if E1 { Self::ora_dpi_e1 } else if M1 { Self::ora_dpi_m1 } else { Self::ora_dpi_m0 },
            0x13 => if M1 { Self::ora_sriy_m1 } else { Self::ora_sriy_m0 },
            0x14 => if M1 { Self::trb_dp_m1 } else { Self::trb_dp_m0 },
            0x15 => if E1 { Self::ora_dpx_e1 } else if M1 { Self::ora_dpx_m1 } else { Self::ora_dpx_m0 },
            0x16 => if E1 { Self::asl_dpx_e1 } else if M1 { Self::asl_dpx_m1 } else { Self::asl_dpx_m0 },
            0x17 => if M1 { Self::ora_dpily_m1 } else { Self::ora_dpily_m0 },
            0x18 => Self::clc,
            0x19 => if M1 { if X1 { Self::ora_absy_m1x1 } else { Self::ora_absy_m1x0 } }
                    else if X1 { Self::ora_absy_m0x1 } else { Self::ora_absy_m0x0 },
            0x1A => if M1 { Self::inc_a_m1 } else { Self::inc_a_m0 },
            0x1B => Self::tcs,
            0x1C => if M1 { Self::trb_abs_m1 } else { Self::trb_abs_m0 },
            0x1D => if M1 { if X1 { Self::ora_absx_m1x1 } else { Self::ora_absx_m1x0 } }
                    else if X1 { Self::ora_absx_m0x1 } else { Self::ora_absx_m0x0 },
            0x1E => if M1 { if X1 { Self::asl_absx_m1x1 } else { Self::asl_absx_m1x0 } }
                    else if X1 { Self::asl_absx_m0x1 } else { Self::asl_absx_m0x0 },
            0x1F => if M1 { Self::ora_ablx_m1 } else { Self::ora_ablx_m0 },
            0x20 => if E1 { Self::jsr_e1 } else { Self::jsr_e0 },
            0x21 => if E1 { Self::and_dpix_e1 } else if M1 { Self::and_dpix_m1 } else { Self::and_dpix_m0 },
            0x22 => if E1 { Self::jsl_e1 } else { Self::jsl_e0 },
            0x23 => if M1 { Self::and_sr_m1 } else { Self::and_sr_m0 },
            0x24 => if M1 { Self::bit_dp_m1 } else { Self::bit_dp_m0 },
            0x25 => if M1 { Self::and_dp_m1 } else { Self::and_dp_m0 },
            0x26 => if M1 { Self::rol_dp_m1 } else { Self::rol_dp_m0 },
            0x27 => if M1 { Self::and_dpil_m1 } else { Self::and_dpil_m0 },
            0x28 => if E1 { Self::plp_e1 } else { Self::plp_e0 },
            0x29 => if M1 { Self::and_imm_m1 } else { Self::and_imm_m0 },
            0x2A => if M1 { Self::rol_a_m1 } else { Self::rol_a_m0 },
            0x2B => if E1 { Self::pld_e1 } else { Self::pld_e0 },
            0x2C => if M1 { Self::bit_abs_m1 } else { Self::bit_abs_m0 },
            0x2D => if M1 { Self::and_abs_m1 } else { Self::and_abs_m0 },
            0x2E => if M1 { Self::rol_abs_m1 } else { Self::rol_abs_m0 },
            0x2F => if M1 { Self::and_abl_m1 } else { Self::and_abl_m0 },
            0x30 => if E1 { Self::bmi_e1 } else { Self::bmi_e0 },
            0x31 => if E1 { Self::and_dpiy_e1 } else if M1 { Self::and_dpiy_m1 } else { Self::and_dpiy_m0 },
            0x32 => if E1 { Self::and_dpi_e1 } else if M1 { Self::and_dpi_m1 } else { Self::and_dpi_m0 },
            0x33 => if M1 { Self::and_sriy_m1 } else { Self::and_sriy_m0 },
            0x34 => if E1 { Self::bit_dpx_e1 } else if M1 { Self::bit_dpx_m1 } else { Self::bit_dpx_m0 },
            0x35 => if E1 { Self::and_dpx_e1 } else if M1 { Self::and_dpx_m1 } else { Self::and_dpx_m0 },
            0x36 => if E1 { Self::rol_dpx_e1 } else if M1 { Self::rol_dpx_m1 } else { Self::rol_dpx_m0 },
            0x37 => if M1 { Self::and_dpily_m1 } else { Self::and_dpily_m0 },
            0x38 => Self::sec,
            0x39 => if M1 { if X1 { Self::and_absy_m1x1 } else { Self::and_absy_m1x0 } }
                    else if X1 { Self::and_absy_m0x1 } else { Self::and_absy_m0x0 },
            0x3A => if M1 { Self::dec_a_m1 } else { Self::dec_a_m0 },
            0x3B => Self::tsc,
            0x3C => if M1 { if X1 { Self::bit_absx_m1x1 } else { Self::bit_absx_m1x0 } }
                    else if X1 { Self::bit_absx_m0x1 } else { Self::bit_absx_m0x0 },
            0x3D => if M1 { if X1 { Self::and_absx_m1x1 } else { Self::and_absx_m1x0 } }
                    else if X1 { Self::and_absx_m0x1 } else { Self::and_absx_m0x0 },
            0x3E => if M1 { if X1 { Self::rol_absx_m1x1 } else { Self::rol_absx_m1x0 } }
                    else if X1 { Self::rol_absx_m0x1 } else { Self::rol_absx_m0x0 },
            0x3F => if M1 { Self::and_ablx_m1 } else { Self::and_ablx_m0 },
            0x40 => Self::rti,
            0x41 => if E1 { Self::eor_dpix_e1 } else if M1 { Self::eor_dpix_m1 } else { Self::eor_dpix_m0 },
            0x42 => Self::wdm_or_hack,
            0x43 => if M1 { Self::eor_sr_m1 } else { Self::eor_sr_m0 },
            0x44 => if X1 { Self::mvp_x1 } else { Self::mvp_x0 },
            0x45 => if M1 { Self::eor_dp_m1 } else { Self::eor_dp_m0 },
            0x46 => if M1 { Self::lsr_dp_m1 } else { Self::lsr_dp_m0 },
            0x47 => if M1 { Self::eor_dpil_m1 } else { Self::eor_dpil_m0 },
            0x48 => if E1 { Self::pha_e1 } else if M1 { Self::pha_m1 } else { Self::pha_m0 },
            0x49 => if M1 { Self::eor_imm_m1 } else { Self::eor_imm_m0 },
            0x4A => if M1 { Self::lsr_a_m1 } else { Self::lsr_a_m0 },
            0x4B => if E1 { Self::phk_e1 } else { Self::phk_e0 },
            0x4C => Self::jmp_abs,
            0x4D => if M1 { Self::eor_abs_m1 } else { Self::eor_abs_m0 },
            0x4E => if M1 { Self::lsr_abs_m1 } else { Self::lsr_abs_m0 },
            0x4F => if M1 { Self::eor_abl_m1 } else { Self::eor_abl_m0 },
            0x50 => if E1 { Self::bvc_e1 } else { Self::bvc_e0 },
            0x51 => if E1 { Self::eor_dpiy_e1 } else if M1 { Self::eor_dpiy_m1 } else { Self::eor_dpiy_m0 },
            0x52 => if E1 { Self::eor_dpi_e1 } else if M1 { Self::eor_dpi_m1 } else { Self::eor_dpi_m0 },
            0x53 => if M1 { Self::eor_sriy_m1 } else { Self::eor_sriy_m0 },
            0x54 => if X1 { Self::mvn_x1 } else { Self::mvn_x0 },
            0x55 => if E1 { Self::eor_dpx_e1 } else if M1 { Self::eor_dpx_m1 } else { Self::eor_dpx_m0 },
            0x56 => if E1 { Self::lsr_dpx_e1 } else if M1 { Self::lsr_dpx_m1 } else { Self::lsr_dpx_m0 },
            0x57 => if M1 { Self::eor_dpily_m1 } else { Self::eor_dpily_m0 },
            0x58 => Self::cli,
            0x59 => if M1 { if X1 { Self::eor_absy_m1x1 } else { Self::eor_absy_m1x0 } }
                    else if X1 { Self::eor_absy_m0x1 } else { Self::eor_absy_m0x0 },
            0x5A => if E1 { Self::phy_e1 } else if X1 { Self::phy_x1 } else { Self::phy_x0 },
            0x5B => Self::tcd,
            0x5C => Self::jmp_abl,
            0x5D => if M1 { if X1 { Self::eor_absx_m1x1 } else { Self::eor_absx_m1x0 } }
                    else if X1 { Self::eor_absx_m0x1 } else { Self::eor_absx_m0x0 },
            0x5E => if M1 { if X1 { Self::lsr_absx_m1x1 } else { Self::lsr_absx_m1x0 } }
                    else if X1 { Self::lsr_absx_m0x1 } else { Self::lsr_absx_m0x0 },
            0x5F => if M1 { Self::eor_ablx_m1 } else { Self::eor_ablx_m0 },
            0x60 => if E1 { Self::rts_e1 } else { Self::rts_e0 },
            0x61 => if E1 { Self::adc_dpix_e1 } else if M1 { Self::adc_dpix_m1 } else { Self::adc_dpix_m0 },
            0x62 => if E1 { Self::per_e1 } else { Self::per_e0 },
            0x63 => if M1 { Self::adc_sr_m1 } else { Self::adc_sr_m0 },
            0x64 => if M1 { Self::stz_dp_m1 } else { Self::stz_dp_m0 },
            0x65 => if M1 { Self::adc_dp_m1 } else { Self::adc_dp_m0 },
            0x66 => if M1 { Self::ror_dp_m1 } else { Self::ror_dp_m0 },
            0x67 => if M1 { Self::adc_dpil_m1 } else { Self::adc_dpil_m0 },
            0x68 => if E1 { Self::pla_e1 } else if M1 { Self::pla_m1 } else { Self::pla_m0 },
            0x69 => if M1 { Self::adc_imm_m1 } else { Self::adc_imm_m0 },
            0x6A => if M1 { Self::ror_a_m1 } else { Self::ror_a_m0 },
            0x6B => if E1 { Self::rtl_e1 } else { Self::rtl_e0 },
            0x6C => Self::jmp_ind,
            0x6D => if M1 { Self::adc_abs_m1 } else { Self::adc_abs_m0 },
            0x6E => if M1 { Self::ror_abs_m1 } else { Self::ror_abs_m0 },
            0x6F => if M1 { Self::adc_abl_m1 } else { Self::adc_abl_m0 },
            0x70 => if E1 { Self::bvs_e1 } else { Self::bvs_e0 },
            0x71 => if E1 { Self::adc_dpiy_e1 } else if M1 { Self::adc_dpiy_m1 } else { Self::adc_dpiy_m0 },
            0x72 => if E1 { Self::adc_dpi_e1 } else if M1 { Self::adc_dpi_m1 } else { Self::adc_dpi_m0 },
            0x73 => if M1 { Self::adc_sriy_m1 } else { Self::adc_sriy_m0 },
            0x74 => if E1 { Self::stz_dpx_e1 } else if M1 { Self::stz_dpx_m1 } else { Self::stz_dpx_m0 },
            0x75 => if E1 { Self::adc_dpx_e1 } else if M1 { Self::adc_dpx_m1 } else { Self::adc_dpx_m0 },
            0x76 => if E1 { Self::ror_dpx_e1 } else if M1 { Self::ror_dpx_m1 } else { Self::ror_dpx_m0 },
            0x77 => if M1 { Self::adc_dpily_m1 } else { Self::adc_dpily_m0 },
            0x78 => Self::sei,
            0x79 => if M1 { if X1 { Self::adc_absy_m1x1 } else { Self::adc_absy_m1x0 } }
                    else if X1 { Self::adc_absy_m0x1 } else { Self::adc_absy_m0x0 },
            0x7A => if E1 { Self::ply_e1 } else if X1 { Self::ply_x1 } else { Self::ply_x0 },
            0x7B => Self::tdc,
            0x7C => Self::jmp_indx,
            0x7D => if M1 { if X1 { Self::adc_absx_m1x1 } else { Self::adc_absx_m1x0 } }
                    else if X1 { Self::adc_absx_m0x1 } else { Self::adc_absx_m0x0 },
            0x7E => if M1 { if X1 { Self::ror_absx_m1x1 } else { Self::ror_absx_m1x0 } }
                    else if X1 { Self::ror_absx_m0x1 } else { Self::ror_absx_m0x0 },
            0x7F => if M1 { Self::adc_ablx_m1 } else { Self::adc_ablx_m0 },
            0x80 => if E1 { Self::bra_e1 } else { Self::bra_e0 },
            0x81 => if E1 { Self::sta_dpix_e1 } else if M1 { Self::sta_dpix_m1 } else { Self::sta_dpix_m0 },
            0x82 => Self::brl,
            0x83 => if M1 { Self::sta_sr_m1 } else { Self::sta_sr_m0 },
            0x84 => if X1 { Self::sty_dp_x1 } else { Self::sty_dp_x0 },
            0x85 => if M1 { Self::sta_dp_m1 } else { Self::sta_dp_m0 },
            0x86 => if X1 { Self::stx_dp_x1 } else { Self::stx_dp_x0 },
            0x87 => if M1 { Self::sta_dpil_m1 } else { Self::sta_dpil_m0 },
            0x88 => if X1 { Self::dey_x1 } else { Self::dey_x0 },
            0x89 => if M1 { Self::bit_imm_m1 } else { Self::bit_imm_m0 },
            0x8A => if M1 { Self::txa_m1 } else { Self::txa_m0 },
            0x8B => if E1 { Self::phb_e1 } else { Self::phb_e0 },
            0x8C => if X1 { Self::sty_abs_x1 } else { Self::sty_abs_x0 },
            0x8D => if M1 { Self::sta_abs_m1 } else { Self::sta_abs_m0 },
            0x8E => if X1 { Self::stx_abs_x1 } else { Self::stx_abs_x0 },
            0x8F => if M1 { Self::sta_abl_m1 } else { Self::sta_abl_m0 },
            0x90 => if E1 { Self::bcc_e1 } else { Self::bcc_e0 },
            0x91 => if E1 { Self::sta_dpiy_e1 } else if M1 { Self::sta_dpiy_m1 } else { Self::sta_dpiy_m0 },
            0x92 => if E1 { Self::sta_dpi_e1 } else if M1 { Self::sta_dpi_m1 } else { Self::sta_dpi_m0 },
            0x93 => if M1 { Self::sta_sriy_m1 } else { Self::sta_sriy_m0 },
            0x94 => if E1 { Self::sty_dpx_e1 } else if X1 { Self::sty_dpx_x1 } else { Self::sty_dpx_x0 },
            0x95 => if E1 { Self::sta_dpx_e1 } else if M1 { Self::sta_dpx_m1 } else { Self::sta_dpx_m0 },
            0x96 => if E1 { Self::stx_dpy_e1 } else if X1 { Self::stx_dpy_x1 } else { Self::stx_dpy_x0 },
            0x97 => if M1 { Self::sta_dpily_m1 } else { Self::sta_dpily_m0 },
            0x98 => if M1 { Self::tya_m1 } else { Self::tya_m0 },
            0x99 => if M1 { if X1 { Self::sta_absy_m1x1 } else { Self::sta_absy_m1x0 } }
                    else if X1 { Self::sta_absy_m0x1 } else { Self::sta_absy_m0x0 },
            0x9A => Self::txs,
            0x9B => if X1 { Self::txy_x1 } else { Self::txy_x0 },
            0x9C => if M1 { Self::stz_abs_m1 } else { Self::stz_abs_m0 },
            0x9D => if M1 { if X1 { Self::sta_absx_m1x1 } else { Self::sta_absx_m1x0 } }
                    else if X1 { Self::sta_absx_m0x1 } else { Self::sta_absx_m0x0 },
            0x9E => if M1 { if X1 { Self::stz_absx_m1x1 } else { Self::stz_absx_m1x0 } }
                    else if X1 { Self::stz_absx_m0x1 } else { Self::stz_absx_m0x0 },
            0x9F => if M1 { Self::sta_ablx_m1 } else { Self::sta_ablx_m0 },
            0xA0 => if X1 { Self::ldy_imm_x1 } else { Self::ldy_imm_x0 },
            0xA1 => if E1 { Self::lda_dpix_e1 } else if M1 { Self::lda_dpix_m1 } else { Self::lda_dpix_m0 },
            0xA2 => if X1 { Self::ldx_imm_x1 } else { Self::ldx_imm_x0 },
            0xA3 => if M1 { Self::lda_sr_m1 } else { Self::lda_sr_m0 },
            0xA4 => if X1 { Self::ldy_dp_x1 } else { Self::ldy_dp_x0 },
            0xA5 => if M1 { Self::lda_dp_m1 } else { Self::lda_dp_m0 },
            0xA6 => if X1 { Self::ldx_dp_x1 } else { Self::ldx_dp_x0 },
            0xA7 => if M1 { Self::lda_dpil_m1 } else { Self::lda_dpil_m0 },
            0xA8 => if X1 { Self::tay_x1 } else { Self::tay_x0 },
            0xA9 => if M1 { Self::lda_imm_m1 } else { Self::lda_imm_m0 },
            0xAA => if X1 { Self::tax_x1 } else { Self::tax_x0 },
            0xAB => if E1 { Self::plb_e1 } else { Self::plb_e0 },
            0xAC => if X1 { Self::ldy_abs_x1 } else { Self::ldy_abs_x0 },
            0xAD => if M1 { Self::lda_abs_m1 } else { Self::lda_abs_m0 },
            0xAE => if X1 { Self::ldx_abs_x1 } else { Self::ldx_abs_x0 },
            0xAF => if M1 { Self::lda_abl_m1 } else { Self::lda_abl_m0 },
            0xB0 => if E1 { Self::bcs_e1 } else { Self::bcs_e0 },
            0xB1 => if E1 { Self::lda_dpiy_e1 } else if M1 { Self::lda_dpiy_m1 } else { Self::lda_dpiy_m0 },
            0xB2 => if E1 { Self::lda_dpi_e1 } else if M1 { Self::lda_dpi_m1 } else { Self::lda_dpi_m0 },
            0xB3 => if M1 { Self::lda_sriy_m1 } else { Self::lda_sriy_m0 },
            0xB4 => if E1 { Self::ldy_dpx_e1 } else if X1 { Self::ldy_dpx_x1 } else { Self::ldy_dpx_x0 },
            0xB5 => if E1 { Self::lda_dpx_e1 } else if M1 { Self::lda_dpx_m1 } else { Self::lda_dpx_m0 },
            0xB6 => if E1 { Self::ldx_dpy_e1 } else if X1 { Self::ldx_dpy_x1 } else { Self::ldx_dpy_x0 },
            0xB7 => if M1 { Self::lda_dpily_m1 } else { Self::lda_dpily_m0 },
            0xB8 => Self::clv,
            0xB9 => if M1 { if X1 { Self::lda_absy_m1x1 } else { Self::lda_absy_m1x0 } }
                    else if X1 { Self::lda_absy_m0x1 } else { Self::lda_absy_m0x0 },
            0xBA => if X1 { Self::tsx_x1 } else { Self::tsx_x0 },
            0xBB => if X1 { Self::tyx_x1 } else { Self::tyx_x0 },
            0xBC => if X1 { Self::ldy_absx_x1 } else { Self::ldy_absx_x0 },
            0xBD => if M1 { if X1 { Self::lda_absx_m1x1 } else { Self::lda_absx_m1x0 } }
                    else if X1 { Self::lda_absx_m0x1 } else { Self::lda_absx_m0x0 },
            0xBE => if X1 { Self::ldx_absy_x1 } else { Self::ldx_absy_x0 },
            0xBF => if M1 { Self::lda_ablx_m1 } else { Self::lda_ablx_m0 },
            0xC0 => if X1 { Self::cpy_imm_x1 } else { Self::cpy_imm_x0 },
            0xC1 => if E1 { Self::cmp_dpix_e1 } else if M1 { Self::cmp_dpix_m1 } else { Self::cmp_dpix_m0 },
            0xC2 => Self::rep,
            0xC3 => if M1 { Self::cmp_sr_m1 } else { Self::cmp_sr_m0 },
            0xC4 => if X1 { Self::cpy_dp_x1 } else { Self::cpy_dp_x0 },
            0xC5 => if M1 { Self::cmp_dp_m1 } else { Self::cmp_dp_m0 },
            0xC6 => if M1 { Self::dec_dp_m1 } else { Self::dec_dp_m0 },
            0xC7 => if M1 { Self::cmp_dpil_m1 } else { Self::cmp_dpil_m0 },
            0xC8 => if X1 { Self::iny_x1 } else { Self::iny_x0 },
            0xC9 => if M1 { Self::cmp_imm_m1 } else { Self::cmp_imm_m0 },
            0xCA => if X1 { Self::dex_x1 } else { Self::dex_x0 },
            0xCB => Self::wai,
            0xCC => if X1 { Self::cpy_abs_x1 } else { Self::cpy_abs_x0 },
            0xCD => if M1 { Self::cmp_abs_m1 } else { Self::cmp_abs_m0 },
            0xCE => if M1 { Self::dec_abs_m1 } else { Self::dec_abs_m0 },
            0xCF => if M1 { Self::cmp_abl_m1 } else { Self::cmp_abl_m0 },
            0xD0 => if E1 { Self::bne_e1 } else { Self::bne_e0 },
            0xD1 => if E1 { Self::cmp_dpiy_e1 } else if M1 { Self::cmp_dpiy_m1 } else { Self::cmp_dpiy_m0 },
            0xD2 => if E1 { Self::cmp_dpi_e1 } else if M1 { Self::cmp_dpi_m1 } else { Self::cmp_dpi_m0 },
            0xD3 => if M1 { Self::cmp_sriy_m1 } else { Self::cmp_sriy_m0 },
            0xD4 => if E1 { Self::pei_e1 } else { Self::pei_e0 },
            0xD5 => if E1 { Self::cmp_dpx_e1 } else if M1 { Self::cmp_dpx_m1 } else { Self::cmp_dpx_m0 },
            0xD6 => if E1 { Self::dec_dpx_e1 } else if M1 { Self::dec_dpx_m1 } else { Self::dec_dpx_m0 },
            0xD7 => if M1 { Self::cmp_dpily_m1 } else { Self::cmp_dpily_m0 },
            0xD8 => Self::cld,
            0xD9 => if M1 { if X1 { Self::cmp_absy_m1x1 } else { Self::cmp_absy_m1x0 } }
                    else if X1 { Self::cmp_absy_m0x1 } else { Self::cmp_absy_m0x0 },
            0xDA => if E1 { Self::phx_e1 } else if X1 { Self::phx_x1 } else { Self::phx_x0 },
            0xDB => Self::stp_or_hack,
            0xDC => Self::jml_ind,
            0xDD => if M1 { if X1 { Self::cmp_absx_m1x1 } else { Self::cmp_absx_m1x0 } }
                    else if X1 { Self::cmp_absx_m0x1 } else { Self::cmp_absx_m0x0 },
            0xDE => if M1 { if X1 { Self::dec_absx_m1x1 } else { Self::dec_absx_m1x0 } }
                    else if X1 { Self::dec_absx_m0x1 } else { Self::dec_absx_m0x0 },
            0xDF => if M1 { Self::cmp_ablx_m1 } else { Self::cmp_ablx_m0 },
            0xE0 => if X1 { Self::cpx_imm_x1 } else { Self::cpx_imm_x0 },
            0xE1 => if E1 { Self::sbc_dpix_e1 } else if M1 { Self::sbc_dpix_m1 } else { Self::sbc_dpix_m0 },
            0xE2 => Self::sep,
            0xE3 => if M1 { Self::sbc_sr_m1 } else { Self::sbc_sr_m0 },
            0xE4 => if X1 { Self::cpx_dp_x1 } else { Self::cpx_dp_x0 },
            0xE5 => if M1 { Self::sbc_dp_m1 } else { Self::sbc_dp_m0 },
            0xE6 => if M1 { Self::inc_dp_m1 } else { Self::inc_dp_m0 },
            0xE7 => if M1 { Self::sbc_dpil_m1 } else { Self::sbc_dpil_m0 },
            0xE8 => if X1 { Self::inx_x1 } else { Self::inx_x0 },
            0xE9 => if M1 { Self::sbc_imm_m1 } else { Self::sbc_imm_m0 },
            0xEA => Self::nop,
            0xEB => Self::xba,
            0xEC => if X1 { Self::cpx_abs_x1 } else { Self::cpx_abs_x0 },
            0xED => if M1 { Self::sbc_abs_m1 } else { Self::sbc_abs_m0 },
            0xEE => if M1 { Self::inc_abs_m1 } else { Self::inc_abs_m0 },
            0xEF => if M1 { Self::sbc_abl_m1 } else { Self::sbc_abl_m0 },
            0xF0 => if E1 { Self::beq_e1 } else { Self::beq_e0 },
            0xF1 => if E1 { Self::sbc_dpiy_e1 } else if M1 { Self::sbc_dpiy_m1 } else { Self::sbc_dpiy_m0 },
            0xF2 => if E1 { Self::sbc_dpi_e1 } else if M1 { Self::sbc_dpi_m1 } else { Self::sbc_dpi_m0 },
            0xF3 => if M1 { Self::sbc_sriy_m1 } else { Self::sbc_sriy_m0 },
            0xF4 => if E1 { Self::pea_e1 } else { Self::pea_e0 },
            0xF5 => if E1 { Self::sbc_dpx_e1 } else if M1 { Self::sbc_dpx_m1 } else { Self::sbc_dpx_m0 },
            0xF6 => if E1 { Self::inc_dpx_e1 } else if M1 { Self::inc_dpx_m1 } else { Self::inc_dpx_m0 },
            0xF7 => if M1 { Self::sbc_dpily_m1 } else { Self::sbc_dpily_m0 },
            0xF8 => Self::sed,
            0xF9 => if M1 { if X1 { Self::sbc_absy_m1x1 } else { Self::sbc_absy_m1x0 } }
                    else if X1 { Self::sbc_absy_m0x1 } else { Self::sbc_absy_m0x0 },
            0xFA => if E1 { Self::plx_e1 } else if X1 { Self::plx_x1 } else { Self::plx_x0 },
            0xFB => Self::xce,
            0xFC => if E1 { Self::jsr_indx_e1 } else { Self::jsr_indx_e0 },
            0xFD => if M1 { if X1 { Self::sbc_absx_m1x1 } else { Self::sbc_absx_m1x0 } }
                    else if X1 { Self::sbc_absx_m0x1 } else { Self::sbc_absx_m0x0 },
            0xFE => if M1 { if X1 { Self::inc_absx_m1x1 } else { Self::inc_absx_m1x0 } }
                    else if X1 { Self::inc_absx_m0x1 } else { Self::inc_absx_m0x0 },
            0xFF => if M1 { Self::sbc_ablx_m1 } else { Self::sbc_ablx_m0 },
        }
    }

    #[rustfmt::skip]
    const fn slow_entry(op: u8) -> OpcodeFn<B> {
        match op {
            0x00 => Self::brk,
            0x01 => Self::ora_dpix_slow,
            0x02 => Self::cop,
            0x03 => Self::ora_sr_slow,
            0x04 => Self::tsb_dp_slow,
            0x05 => Self::ora_dp_slow,
            0x06 => Self::asl_dp_slow,
            0x07 => Self::ora_dpil_slow,
            0x08 => Self::php_slow,
            0x09 => Self::ora_imm_slow,
            0x0A => Self::asl_a_slow,
            0x0B => Self::phd_slow,
            0x0C => Self::tsb_abs_slow,
            0x0D => Self::ora_abs_slow,
            0x0E => Self::asl_abs_slow,
            0x0F => Self::ora_abl_slow,
            0x10 => Self::bpl_slow,
            0x11 => Self::ora_dpiy_slow,
            0x12 => Self::ora_dpi_slow,
            0x13 => Self::ora_sriy_slow,
            0x14 => Self::trb_dp_slow,
            0x15 => Self::ora_dpx_slow,
            0x16 => Self::asl_dpx_slow,
            0x17 => Self::ora_dpily_slow,
            0x18 => Self::clc,
            0x19 => Self::ora_absy_slow,
            0x1A => Self::inc_a_slow,
            0x1B => Self::tcs,
            0x1C => Self::trb_abs_slow,
            0x1D => Self::ora_absx_slow,
            0x1E => Self::asl_absx_slow,
            0x1F => Self::ora_ablx_slow,
            0x20 => Self::jsr_slow,
            0x21 => Self::and_dpix_slow,
            0x22 => Self::jsl_slow,
            0x23 => Self::and_sr_slow,
            0x24 => Self::bit_dp_slow,
            0x25 => Self::and_dp_slow,
            0x26 => Self::rol_dp_slow,
            0x27 => Self::and_dpil_slow,
            0x28 => Self::plp_slow,
            0x29 => Self::and_imm_slow,
            0x2A => Self::rol_a_slow,
            0x2B => Self::pld_slow,
            0x2C => Self::bit_abs_slow,
            0x2D => Self::and_abs_slow,
            0x2E => Self::rol_abs_slow,
            0x2F => Self::and_abl_slow,
            0x30 => Self::bmi_slow,
            0x31 => Self::and_dpiy_slow,
            0x32 => Self::and_dpi_slow,
            0x33 => Self::and_sriy_slow,
            0x34 => Self::bit_dpx_slow,
            0x35 => Self::and_dpx_slow,
            0x36 => Self::rol_dpx_slow,
            0x37 => Self::and_dpily_slow,
            0x38 => Self::sec,
            0x39 => Self::and_absy_slow,
            0x3A => Self::dec_a_slow,
            0x3B => Self::tsc,
            0x3C => Self::bit_absx_slow,
            0x3D => Self::and_absx_slow,
            0x3E => Self::rol_absx_slow,
            0x3F => Self::and_ablx_slow,
            0x40 => Self::rti,
            0x41 => Self::eor_dpix_slow,
            0x42 => Self::wdm_or_hack,
            0x43 => Self::eor_sr_slow,
            0x44 => Self::mvp_slow,
            0x45 => Self::eor_dp_slow,
            0x46 => Self::lsr_dp_slow,
            0x47 => Self::eor_dpil_slow,
            0x48 => Self::pha_slow,
            0x49 => Self::eor_imm_slow,
            0x4A => Self::lsr_a_slow,
            0x4B => Self::phk_slow,
            0x4C => Self::jmp_abs,
            0x4D => Self::eor_abs_slow,
            0x4E => Self::lsr_abs_slow,
            0x4F => Self::eor_abl_slow,
            0x50 => Self::bvc_slow,
            0x51 => Self::eor_dpiy_slow,
            0x52 => Self::eor_dpi_slow,
            0x53 => Self::eor_sriy_slow,
            0x54 => Self::mvn_slow,
            0x55 => Self::eor_dpx_slow,
            0x56 => Self::lsr_dpx_slow,
            0x57 => Self::eor_dpily_slow,
            0x58 => Self::cli,
            0x59 => Self::eor_absy_slow,
            0x5A => Self::phy_slow,
            0x5B => Self::tcd,
            0x5C => Self::jmp_abl,
            0x5D => Self::eor_absx_slow,
            0x5E => Self::lsr_absx_slow,
            0x5F => Self::eor_ablx_slow,
            0x60 => Self::rts_slow,
            0x61 => Self::adc_dpix_slow,
            0x62 => Self::per_slow,
            0x63 => Self::adc_sr_slow,
            0x64 => Self::stz_dp_slow,
            0x65 => Self::adc_dp_slow,
            0x66 => Self::ror_dp_slow,
            0x67 => Self::adc_dpil_slow,
            0x68 => Self::pla_slow,
            0x69 => Self::adc_imm_slow,
            0x6A => Self::ror_a_slow,
            0x6B => Self::rtl_slow,
            0x6C => Self::jmp_ind,
            0x6D => Self::adc_abs_slow,
            0x6E => Self::ror_abs_slow,
            0x6F => Self::adc_abl_slow,
            0x70 => Self::bvs_slow,
            0x71 => Self::adc_dpiy_slow,
            0x72 => Self::adc_dpi_slow,
            0x73 => Self::adc_sriy_slow,
            0x74 => Self::stz_dpx_slow,
            0x75 => Self::adc_dpx_slow,
            0x76 => Self::ror_dpx_slow,
            0x77 => Self::adc_dpily_slow,
            0x78 => Self::sei,
            0x79 => Self::adc_absy_slow,
            0x7A => Self::ply_slow,
            0x7B => Self::tdc,
            0x7C => Self::jmp_indx,
            0x7D => Self::adc_absx_slow,
            0x7E => Self::ror_absx_slow,
            0x7F => Self::adc_ablx_slow,
            0x80 => Self::bra_slow,
            0x81 => Self::sta_dpix_slow,
            0x82 => Self::brl,
            0x83 => Self::sta_sr_slow,
            0x84 => Self::sty_dp_slow,
            0x85 => Self::sta_dp_slow,
            0x86 => Self::stx_dp_slow,
            0x87 => Self::sta_dpil_slow,
            0x88 => Self::dey_slow,
            0x89 => Self::bit_imm_slow,
            0x8A => Self::txa_slow,
            0x8B => Self::phb_slow,
            0x8C => Self::sty_abs_slow,
            0x8D => Self::sta_abs_slow,
            0x8E => Self::stx_abs_slow,
            0x8F => Self::sta_abl_slow,
            0x90 => Self::bcc_slow,
            0x91 => Self::sta_dpiy_slow,
            0x92 => Self::sta_dpi_slow,
            0x93 => Self::sta_sriy_slow,
            0x94 => Self::sty_dpx_slow,
            0x95 => Self::sta_dpx_slow,
            0x96 => Self::stx_dpy_slow,
            0x97 => Self::sta_dpily_slow,
            0x98 => Self::tya_slow,
            0x99 => Self::sta_absy_slow,
            0x9A => Self::txs,
            0x9B => Self::txy_slow,
            0x9C => Self::stz_abs_slow,
            0x9D => Self::sta_absx_slow,
            0x9E => Self::stz_absx_slow,
            0x9F => Self::sta_ablx_slow,
            0xA0 => Self::ldy_imm_slow,
            0xA1 => Self::lda_dpix_slow,
            0xA2 => Self::ldx_imm_slow,
            0xA3 => Self::lda_sr_slow,
            0xA4 => Self::ldy_dp_slow,
            0xA5 => Self::lda_dp_slow,
            0xA6 => Self::ldx_dp_slow,
            0xA7 => Self::lda_dpil_slow,
            0xA8 => Self::tay_slow,
            0xA9 => Self::lda_imm_slow,
            0xAA => Self::tax_slow,
            0xAB => Self::plb_slow,
            0xAC => Self::ldy_abs_slow,
            0xAD => Self::lda_abs_slow,
            0xAE => Self::ldx_abs_slow,
            0xAF => Self::lda_abl_slow,
            0xB0 => Self::bcs_slow,
            0xB1 => Self::lda_dpiy_slow,
            0xB2 => Self::lda_dpi_slow,
            0xB3 => Self::lda_sriy_slow,
            0xB4 => Self::ldy_dpx_slow,
            0xB5 => Self::lda_dpx_slow,
            0xB6 => Self::ldx_dpy_slow,
            0xB7 => Self::lda_dpily_slow,
            0xB8 => Self::clv,
            0xB9 => Self::lda_absy_slow,
            0xBA => Self::tsx_slow,
            0xBB => Self::tyx_slow,
            0xBC => Self::ldy_absx_slow,
            0xBD => Self::lda_absx_slow,
            0xBE => Self::ldx_absy_slow,
            0xBF => Self::lda_ablx_slow,
            0xC0 => Self::cpy_imm_slow,
            0xC1 => Self::cmp_dpix_slow,
            0xC2 => Self::rep,
            0xC3 => Self::cmp_sr_slow,
            0xC4 => Self::cpy_dp_slow,
            0xC5 => Self::cmp_dp_slow,
            0xC6 => Self::dec_dp_slow,
            0xC7 => Self::cmp_dpil_slow,
            0xC8 => Self::iny_slow,
            0xC9 => Self::cmp_imm_slow,
            0xCA => Self::dex_slow,
            0xCB => Self::wai,
            0xCC => Self::cpy_abs_slow,
            0xCD => Self::cmp_abs_slow,
            0xCE => Self::dec_abs_slow,
            0xCF => Self::cmp_abl_slow,
            0xD0 => Self::bne_slow,
            0xD1 => Self::cmp_dpiy_slow,
            0xD2 => Self::cmp_dpi_slow,
            0xD3 => Self::cmp_sriy_slow,
            0xD4 => Self::pei_slow,
            0xD5 => Self::cmp_dpx_slow,
            0xD6 => Self::dec_dpx_slow,
            0xD7 => Self::cmp_dpily_slow,
            0xD8 => Self::cld,
            0xD9 => Self::cmp_absy_slow,
            0xDA => Self::phx_slow,
            0xDB => Self::stp_or_hack,
            0xDC => Self::jml_ind,
            0xDD => Self::cmp_absx_slow,
            0xDE => Self::dec_absx_slow,
            0xDF => Self::cmp_ablx_slow,
            0xE0 => Self::cpx_imm_slow,
            0xE1 => Self::sbc_dpix_slow,
            0xE2 => Self::sep,
            0xE3 => Self::sbc_sr_slow,
            0xE4 => Self::cpx_dp_slow,
            0xE5 => Self::sbc_dp_slow,
            0xE6 => Self::inc_dp_slow,
            0xE7 => Self::sbc_dpil_slow,
            0xE8 => Self::inx_slow,
            0xE9 => Self::sbc_imm_slow,
            0xEA => Self::nop,
            0xEB => Self::xba,
            0xEC => Self::cpx_abs_slow,
            0xED => Self::sbc_abs_slow,
            0xEE => Self::inc_abs_slow,
            0xEF => Self::sbc_abl_slow,
            0xF0 => Self::beq_slow,
            0xF1 => Self::sbc_dpiy_slow,
            0xF2 => Self::sbc_dpi_slow,
            0xF3 => Self::sbc_sriy_slow,
            0xF4 => Self::pea_slow,
            0xF5 => Self::sbc_dpx_slow,
            0xF6 => Self::inc_dpx_slow,
            0xF7 => Self::sbc_dpily_slow,
            0xF8 => Self::sed,
            0xF9 => Self::sbc_absy_slow,
            0xFA => Self::plx_slow,
            0xFB => Self::xce,
            0xFC => Self::jsr_indx_slow,
            0xFD => Self::sbc_absx_slow,
            0xFE => Self::inc_absx_slow,
            0xFF => Self::sbc_ablx_slow,
        }
    }
}

/// Mnemonics for the trace log.
#[rustfmt::skip]
pub static MNEMONICS: [&str; 256] = [
    "BRK", "ORA", "COP", "ORA", "TSB", "ORA", "ASL", "ORA",
    "PHP", "ORA", "ASL", "PHD", "TSB", "ORA", "ASL", "ORA",
    "BPL", "ORA", "ORA", "ORA", "TRB", "ORA", "ASL", "ORA",
    "CLC", "ORA", "INC", "TCS", "TRB", "ORA", "ASL", "ORA",
    "JSR", "AND", "JSL", "AND", "BIT", "AND", "ROL", "AND",
    "PLP", "AND", "ROL", "PLD", "BIT", "AND", "ROL", "AND",
    "BMI", "AND", "AND", "AND", "BIT", "AND", "ROL", "AND",
    "SEC", "AND", "DEC", "TSC", "BIT", "AND", "ROL", "AND",
    "RTI", "EOR", "WDM", "EOR", "MVP", "EOR", "LSR", "EOR",
    "PHA", "EOR", "LSR", "PHK", "JMP", "EOR", "LSR", "EOR",
    "BVC", "EOR", "EOR", "EOR", "MVN", "EOR", "LSR", "EOR",
    "CLI", "EOR", "PHY", "TCD", "JMP", "EOR", "LSR", "EOR",
    "RTS", "ADC", "PER", "ADC", "STZ", "ADC", "ROR", "ADC",
    "PLA", "ADC", "ROR", "RTL", "JMP", "ADC", "ROR", "ADC",
    "BVS", "ADC", "ADC", "ADC", "STZ", "ADC", "ROR", "ADC",
    "SEI", "ADC", "PLY", "TDC", "JMP", "ADC", "ROR", "ADC",
    "BRA", "STA", "BRL", "STA", "STY", "STA", "STX", "STA",
    "DEY", "BIT", "TXA", "PHB", "STY", "STA", "STX", "STA",
    "BCC", "STA", "STA", "STA", "STY", "STA", "STX", "STA",
    "TYA", "STA", "TXS", "TXY", "STZ", "STA", "STZ", "STA",
    "LDY", "LDA", "LDX", "LDA", "LDY", "LDA", "LDX", "LDA",
    "TAY", "LDA", "TAX", "PLB", "LDY", "LDA", "LDX", "LDA",
    "BCS", "LDA", "LDA", "LDA", "LDY", "LDA", "LDX", "LDA",
    "CLV", "LDA", "TSX", "TYX", "LDY", "LDA", "LDX", "LDA",
    "CPY", "CMP", "REP", "CMP", "CPY", "CMP", "DEC", "CMP",
    "INY", "CMP", "DEX", "WAI", "CPY", "CMP", "DEC", "CMP",
    "BNE", "CMP", "CMP", "CMP", "PEI", "CMP", "DEC", "CMP",
    "CLD", "CMP", "PHX", "STP", "JML", "CMP", "DEC", "CMP",
    "CPX", "SBC", "SEP", "SBC", "CPX", "SBC", "INC", "SBC",
    "INX", "SBC", "NOP", "XBA", "CPX", "SBC", "INC", "SBC",
    "BEQ", "SBC", "SBC", "SBC", "PEA", "SBC", "INC", "SBC",
    "SED", "SBC", "PLX", "XCE", "JSR", "SBC", "INC", "SBC",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::EventFlags;
    use crate::test_support::{cpu_with_program, native_mode, step_n};

    #[test]
    fn mode_key_lookup() {
        assert_eq!(TableKey::select(true, true, true), TableKey::Emulation);
        assert_eq!(TableKey::select(false, true, true), TableKey::M1X1);
        assert_eq!(TableKey::select(false, true, false), TableKey::M1X0);
        assert_eq!(TableKey::select(false, false, true), TableKey::M0X1);
        assert_eq!(TableKey::select(false, false, false), TableKey::M0X0);
    }

    #[test]
    fn table_matches_mode_after_every_instruction() {
        // CLC / XCE / REP #$30 / SEP #$10 exercises every reselection path.
        let mut cpu = cpu_with_program(&[0x18, 0xFB, 0xC2, 0x30, 0xE2, 0x10]);
        let expect = [
            TableKey::Emulation,
            TableKey::M1X1,
            TableKey::M0X0,
            TableKey::M0X1,
        ];
        for key in expect {
            step_n(&mut cpu, 1);
            let want = TableKey::select(cpu.regs.e, cpu.mem8(), cpu.index8());
            assert_eq!(want, key);
            assert_eq!(cpu.mode_key, want);
        }
    }

    #[test]
    fn pending_flags_select_slow_table() {
        let mut cpu = cpu_with_program(&[0xA9, 0x42]);
        cpu.regs.pl |= crate::registers::FLAG_I;
        cpu.flags.insert(EventFlags::IRQ);
        let slow = cpu.handler_for(0xA9);
        assert_eq!(
            slow as usize,
            <crate::Cpu<crate::memory::RamBus>>::OPS_SLOW[0xA9] as usize
        );
        // The slow handler still executes correctly.
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x42);
    }

    #[test]
    fn slow_and_fast_agree() {
        // Same program with and without a masked pending IRQ: identical
        // architectural results and cycle counts.
        let program = [0x18, 0xFB, 0xC2, 0x30, 0xA9, 0x34, 0x12, 0x1A, 0x48, 0x68];
        let mut fast = cpu_with_program(&program);
        let mut slow = cpu_with_program(&program);
        slow.regs.pl |= crate::registers::FLAG_I;
        slow.flags.insert(EventFlags::IRQ);
        fast.regs.pl |= crate::registers::FLAG_I;
        step_n(&mut fast, 6);
        step_n(&mut slow, 6);
        assert_eq!(fast.regs.a, slow.regs.a);
        assert_eq!(fast.regs.pc, slow.regs.pc);
        assert_eq!(fast.cycles, slow.cycles);
        assert_eq!(fast.regs.s, slow.regs.s);
    }

    #[test]
    fn mnemonic_spot_checks() {
        assert_eq!(MNEMONICS[0x00], "BRK");
        assert_eq!(MNEMONICS[0xA9], "LDA");
        assert_eq!(MNEMONICS[0xFB], "XCE");
        assert_eq!(MNEMONICS[0x54], "MVN");
        assert_eq!(MNEMONICS[0xDB], "STP");
    }

    #[test]
    fn index_width_picks_block_move_variant() {
        let mut cpu = cpu_with_program(&[]);
        native_mode(&mut cpu, true, false);
        let x0 = cpu.handler_for(0x54);
        native_mode(&mut cpu, true, true);
        let x1 = cpu.handler_for(0x54);
        assert_ne!(x0 as usize, x1 as usize);
    }
}
