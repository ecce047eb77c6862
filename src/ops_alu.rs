//! Arithmetic, logic, compare, bit-test, shift and increment handlers.
//!
//! The regular families (a read, a write or a read-modify-write against one
//! addressing mode) are generated by the macros below, one handler per
//! (opcode, mode-variant) pair; the dispatch tables pick the variant that
//! matches their mode bits. Irregular instructions are written out long-hand
//! in the other `ops_` modules.

use crate::addressing::Access;
use crate::cpu::Cpu;
use crate::memory::{Bus, Wrap};

macro_rules! read_op8 {
    ($name:ident, $addr:ident, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Read);
            let val = cpu.get_byte(addr);
            cpu.$func(val);
        }
    };
}

macro_rules! read_op16 {
    ($name:ident, $addr:ident, $wrap:expr, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Read);
            let val = cpu.get_word(addr, $wrap);
            cpu.$func(val);
        }
    };
}

/// Slow-table read: the accumulator width is decided at runtime.
macro_rules! read_op_m {
    ($name:ident, $addr:ident, $wrap:expr, $f8:ident, $f16:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Read);
            if cpu.mem8() {
                let val = cpu.get_byte(addr);
                cpu.$f8(val);
            } else {
                let val = cpu.get_word(addr, $wrap);
                cpu.$f16(val);
            }
        }
    };
}

/// Slow-table read: the index width is decided at runtime.
macro_rules! read_op_x {
    ($name:ident, $addr:ident, $wrap:expr, $f8:ident, $f16:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Read);
            if cpu.index8() {
                let val = cpu.get_byte(addr);
                cpu.$f8(val);
            } else {
                let val = cpu.get_word(addr, $wrap);
                cpu.$f16(val);
            }
        }
    };
}

macro_rules! write_op8 {
    ($name:ident, $addr:ident, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Write);
            cpu.$func(addr);
        }
    };
}

macro_rules! write_op16 {
    ($name:ident, $addr:ident, $wrap:expr, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Write);
            cpu.$func(addr, $wrap);
        }
    };
}

macro_rules! write_op_m {
    ($name:ident, $addr:ident, $wrap:expr, $f8:ident, $f16:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Write);
            if cpu.mem8() {
                cpu.$f8(addr);
            } else {
                cpu.$f16(addr, $wrap);
            }
        }
    };
}

macro_rules! write_op_x {
    ($name:ident, $addr:ident, $wrap:expr, $f8:ident, $f16:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Write);
            if cpu.index8() {
                cpu.$f8(addr);
            } else {
                cpu.$f16(addr, $wrap);
            }
        }
    };
}

macro_rules! rmw_op8 {
    ($name:ident, $addr:ident, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Modify);
            cpu.$func(addr);
        }
    };
}

macro_rules! rmw_op16 {
    ($name:ident, $addr:ident, $wrap:expr, $func:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Modify);
            cpu.$func(addr, $wrap);
        }
    };
}

macro_rules! rmw_op_m {
    ($name:ident, $addr:ident, $wrap:expr, $f8:ident, $f16:ident) => {
        pub(crate) fn $name(cpu: &mut Self) {
            let addr = cpu.$addr(Access::Modify);
            if cpu.mem8() {
                cpu.$f8(addr);
            } else {
                cpu.$f16(addr, $wrap);
            }
        }
    };
}

/// Immediate operands read straight from the program stream.
macro_rules! imm_ops_m {
    ($m1:ident, $m0:ident, $slow:ident, $f8:ident, $f16:ident) => {
        pub(crate) fn $m1(cpu: &mut Self) {
            let val = cpu.fetch_byte();
            cpu.$f8(val);
        }
        pub(crate) fn $m0(cpu: &mut Self) {
            let val = cpu.fetch_word();
            cpu.$f16(val);
        }
        pub(crate) fn $slow(cpu: &mut Self) {
            if cpu.mem8() {
                let val = cpu.fetch_byte();
                cpu.$f8(val);
            } else {
                let val = cpu.fetch_word();
                cpu.$f16(val);
            }
        }
    };
}

macro_rules! imm_ops_x {
    ($x1:ident, $x0:ident, $slow:ident, $f8:ident, $f16:ident) => {
        pub(crate) fn $x1(cpu: &mut Self) {
            let val = cpu.fetch_byte();
            cpu.$f8(val);
        }
        pub(crate) fn $x0(cpu: &mut Self) {
            let val = cpu.fetch_word();
            cpu.$f16(val);
        }
        pub(crate) fn $slow(cpu: &mut Self) {
            if cpu.index8() {
                let val = cpu.fetch_byte();
                cpu.$f8(val);
            } else {
                let val = cpu.fetch_word();
                cpu.$f16(val);
            }
        }
    };
}

pub(crate) use imm_ops_m;
pub(crate) use imm_ops_x;
pub(crate) use read_op16;
pub(crate) use read_op8;
pub(crate) use read_op_m;
pub(crate) use read_op_x;
pub(crate) use rmw_op16;
pub(crate) use rmw_op8;
pub(crate) use rmw_op_m;
pub(crate) use write_op16;
pub(crate) use write_op8;
pub(crate) use write_op_m;
pub(crate) use write_op_x;

impl<B: Bus> Cpu<B> {
    // --- ADC --------------------------------------------------------------
    imm_ops_m!(adc_imm_m1, adc_imm_m0, adc_imm_slow, adc8, adc16);

    read_op8!(adc_dp_m1, direct, adc8);
    read_op16!(adc_dp_m0, direct, Wrap::Bank, adc16);
    read_op_m!(adc_dp_slow, direct, Wrap::Bank, adc8, adc16);

    read_op8!(adc_dpx_e1, direct_indexed_x_e1, adc8);
    read_op8!(adc_dpx_m1, direct_indexed_x_e0, adc8);
    read_op16!(adc_dpx_m0, direct_indexed_x_e0, Wrap::Bank, adc16);
    read_op_m!(adc_dpx_slow, direct_indexed_x_slow, Wrap::Bank, adc8, adc16);

    read_op8!(adc_dpi_e1, direct_indirect_e1, adc8);
    read_op8!(adc_dpi_m1, direct_indirect_e0, adc8);
    read_op16!(adc_dpi_m0, direct_indirect_e0, Wrap::None, adc16);
    read_op_m!(adc_dpi_slow, direct_indirect_slow, Wrap::None, adc8, adc16);

    read_op8!(adc_dpix_e1, direct_indexed_indirect_e1, adc8);
    read_op8!(adc_dpix_m1, direct_indexed_indirect_e0, adc8);
    read_op16!(adc_dpix_m0, direct_indexed_indirect_e0, Wrap::None, adc16);
    read_op_m!(adc_dpix_slow, direct_indexed_indirect_slow, Wrap::None, adc8, adc16);

    read_op8!(adc_dpiy_e1, direct_indirect_indexed_e1, adc8);
    read_op8!(adc_dpiy_m1, direct_indirect_indexed_e0, adc8);
    read_op16!(adc_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, adc16);
    read_op_m!(adc_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, adc8, adc16);

    read_op8!(adc_dpil_m1, direct_indirect_long, adc8);
    read_op16!(adc_dpil_m0, direct_indirect_long, Wrap::None, adc16);
    read_op_m!(adc_dpil_slow, direct_indirect_long, Wrap::None, adc8, adc16);

    read_op8!(adc_dpily_m1, direct_indirect_indexed_long, adc8);
    read_op16!(adc_dpily_m0, direct_indirect_indexed_long, Wrap::None, adc16);
    read_op_m!(adc_dpily_slow, direct_indirect_indexed_long, Wrap::None, adc8, adc16);

    read_op8!(adc_abs_m1, absolute, adc8);
    read_op16!(adc_abs_m0, absolute, Wrap::None, adc16);
    read_op_m!(adc_abs_slow, absolute, Wrap::None, adc8, adc16);

    read_op8!(adc_absx_m1x1, absolute_indexed_x_x1, adc8);
    read_op16!(adc_absx_m0x1, absolute_indexed_x_x1, Wrap::None, adc16);
    read_op8!(adc_absx_m1x0, absolute_indexed_x_x0, adc8);
    read_op16!(adc_absx_m0x0, absolute_indexed_x_x0, Wrap::None, adc16);
    read_op_m!(adc_absx_slow, absolute_indexed_x_slow, Wrap::None, adc8, adc16);

    read_op8!(adc_absy_m1x1, absolute_indexed_y_x1, adc8);
    read_op16!(adc_absy_m0x1, absolute_indexed_y_x1, Wrap::None, adc16);
    read_op8!(adc_absy_m1x0, absolute_indexed_y_x0, adc8);
    read_op16!(adc_absy_m0x0, absolute_indexed_y_x0, Wrap::None, adc16);
    read_op_m!(adc_absy_slow, absolute_indexed_y_slow, Wrap::None, adc8, adc16);

    read_op8!(adc_abl_m1, absolute_long, adc8);
    read_op16!(adc_abl_m0, absolute_long, Wrap::None, adc16);
    read_op_m!(adc_abl_slow, absolute_long, Wrap::None, adc8, adc16);

    read_op8!(adc_ablx_m1, absolute_long_indexed_x, adc8);
    read_op16!(adc_ablx_m0, absolute_long_indexed_x, Wrap::None, adc16);
    read_op_m!(adc_ablx_slow, absolute_long_indexed_x, Wrap::None, adc8, adc16);

    read_op8!(adc_sr_m1, stack_relative, adc8);
    read_op16!(adc_sr_m0, stack_relative, Wrap::None, adc16);
    read_op_m!(adc_sr_slow, stack_relative, Wrap::None, adc8, adc16);

    read_op8!(adc_sriy_m1, stack_relative_indirect_indexed, adc8);
    read_op16!(adc_sriy_m0, stack_relative_indirect_indexed, Wrap::None, adc16);
    read_op_m!(adc_sriy_slow, stack_relative_indirect_indexed, Wrap::None, adc8, adc16);

    // --- SBC --------------------------------------------------------------
    imm_ops_m!(sbc_imm_m1, sbc_imm_m0, sbc_imm_slow, sbc8, sbc16);

    read_op8!(sbc_dp_m1, direct, sbc8);
    read_op16!(sbc_dp_m0, direct, Wrap::Bank, sbc16);
    read_op_m!(sbc_dp_slow, direct, Wrap::Bank, sbc8, sbc16);

    read_op8!(sbc_dpx_e1, direct_indexed_x_e1, sbc8);
    read_op8!(sbc_dpx_m1, direct_indexed_x_e0, sbc8);
    read_op16!(sbc_dpx_m0, direct_indexed_x_e0, Wrap::Bank, sbc16);
    read_op_m!(sbc_dpx_slow, direct_indexed_x_slow, Wrap::Bank, sbc8, sbc16);

    read_op8!(sbc_dpi_e1, direct_indirect_e1, sbc8);
    read_op8!(sbc_dpi_m1, direct_indirect_e0, sbc8);
    read_op16!(sbc_dpi_m0, direct_indirect_e0, Wrap::None, sbc16);
    read_op_m!(sbc_dpi_slow, direct_indirect_slow, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_dpix_e1, direct_indexed_indirect_e1, sbc8);
    read_op8!(sbc_dpix_m1, direct_indexed_indirect_e0, sbc8);
    read_op16!(sbc_dpix_m0, direct_indexed_indirect_e0, Wrap::None, sbc16);
    read_op_m!(sbc_dpix_slow, direct_indexed_indirect_slow, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_dpiy_e1, direct_indirect_indexed_e1, sbc8);
    read_op8!(sbc_dpiy_m1, direct_indirect_indexed_e0, sbc8);
    read_op16!(sbc_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, sbc16);
    read_op_m!(sbc_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_dpil_m1, direct_indirect_long, sbc8);
    read_op16!(sbc_dpil_m0, direct_indirect_long, Wrap::None, sbc16);
    read_op_m!(sbc_dpil_slow, direct_indirect_long, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_dpily_m1, direct_indirect_indexed_long, sbc8);
    read_op16!(sbc_dpily_m0, direct_indirect_indexed_long, Wrap::None, sbc16);
    read_op_m!(sbc_dpily_slow, direct_indirect_indexed_long, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_abs_m1, absolute, sbc8);
    read_op16!(sbc_abs_m0, absolute, Wrap::None, sbc16);
    read_op_m!(sbc_abs_slow, absolute, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_absx_m1x1, absolute_indexed_x_x1, sbc8);
    read_op16!(sbc_absx_m0x1, absolute_indexed_x_x1, Wrap::None, sbc16);
    read_op8!(sbc_absx_m1x0, absolute_indexed_x_x0, sbc8);
    read_op16!(sbc_absx_m0x0, absolute_indexed_x_x0, Wrap::None, sbc16);
    read_op_m!(sbc_absx_slow, absolute_indexed_x_slow, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_absy_m1x1, absolute_indexed_y_x1, sbc8);
    read_op16!(sbc_absy_m0x1, absolute_indexed_y_x1, Wrap::None, sbc16);
    read_op8!(sbc_absy_m1x0, absolute_indexed_y_x0, sbc8);
    read_op16!(sbc_absy_m0x0, absolute_indexed_y_x0, Wrap::None, sbc16);
    read_op_m!(sbc_absy_slow, absolute_indexed_y_slow, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_abl_m1, absolute_long, sbc8);
    read_op16!(sbc_abl_m0, absolute_long, Wrap::None, sbc16);
    read_op_m!(sbc_abl_slow, absolute_long, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_ablx_m1, absolute_long_indexed_x, sbc8);
    read_op16!(sbc_ablx_m0, absolute_long_indexed_x, Wrap::None, sbc16);
    read_op_m!(sbc_ablx_slow, absolute_long_indexed_x, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_sr_m1, stack_relative, sbc8);
    read_op16!(sbc_sr_m0, stack_relative, Wrap::None, sbc16);
    read_op_m!(sbc_sr_slow, stack_relative, Wrap::None, sbc8, sbc16);

    read_op8!(sbc_sriy_m1, stack_relative_indirect_indexed, sbc8);
    read_op16!(sbc_sriy_m0, stack_relative_indirect_indexed, Wrap::None, sbc16);
    read_op_m!(sbc_sriy_slow, stack_relative_indirect_indexed, Wrap::None, sbc8, sbc16);

    // --- AND --------------------------------------------------------------
    imm_ops_m!(and_imm_m1, and_imm_m0, and_imm_slow, and8, and16);

    read_op8!(and_dp_m1, direct, and8);
    read_op16!(and_dp_m0, direct, Wrap::Bank, and16);
    read_op_m!(and_dp_slow, direct, Wrap::Bank, and8, and16);

    read_op8!(and_dpx_e1, direct_indexed_x_e1, and8);
    read_op8!(and_dpx_m1, direct_indexed_x_e0, and8);
    read_op16!(and_dpx_m0, direct_indexed_x_e0, Wrap::Bank, and16);
    read_op_m!(and_dpx_slow, direct_indexed_x_slow, Wrap::Bank, and8, and16);

    read_op8!(and_dpi_e1, direct_indirect_e1, and8);
    read_op8!(and_dpi_m1, direct_indirect_e0, and8);
    read_op16!(and_dpi_m0, direct_indirect_e0, Wrap::None, and16);
    read_op_m!(and_dpi_slow, direct_indirect_slow, Wrap::None, and8, and16);

    read_op8!(and_dpix_e1, direct_indexed_indirect_e1, and8);
    read_op8!(and_dpix_m1, direct_indexed_indirect_e0, and8);
    read_op16!(and_dpix_m0, direct_indexed_indirect_e0, Wrap::None, and16);
    read_op_m!(and_dpix_slow, direct_indexed_indirect_slow, Wrap::None, and8, and16);

    read_op8!(and_dpiy_e1, direct_indirect_indexed_e1, and8);
    read_op8!(and_dpiy_m1, direct_indirect_indexed_e0, and8);
    read_op16!(and_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, and16);
    read_op_m!(and_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, and8, and16);

    read_op8!(and_dpil_m1, direct_indirect_long, and8);
    read_op16!(and_dpil_m0, direct_indirect_long, Wrap::None, and16);
    read_op_m!(and_dpil_slow, direct_indirect_long, Wrap::None, and8, and16);

    read_op8!(and_dpily_m1, direct_indirect_indexed_long, and8);
    read_op16!(and_dpily_m0, direct_indirect_indexed_long, Wrap::None, and16);
    read_op_m!(and_dpily_slow, direct_indirect_indexed_long, Wrap::None, and8, and16);

    read_op8!(and_abs_m1, absolute, and8);
    read_op16!(and_abs_m0, absolute, Wrap::None, and16);
    read_op_m!(and_abs_slow, absolute, Wrap::None, and8, and16);

    read_op8!(and_absx_m1x1, absolute_indexed_x_x1, and8);
    read_op16!(and_absx_m0x1, absolute_indexed_x_x1, Wrap::None, and16);
    read_op8!(and_absx_m1x0, absolute_indexed_x_x0, and8);
    read_op16!(and_absx_m0x0, absolute_indexed_x_x0, Wrap::None, and16);
    read_op_m!(and_absx_slow, absolute_indexed_x_slow, Wrap::None, and8, and16);

    read_op8!(and_absy_m1x1, absolute_indexed_y_x1, and8);
    read_op16!(and_absy_m0x1, absolute_indexed_y_x1, Wrap::None, and16);
    read_op8!(and_absy_m1x0, absolute_indexed_y_x0, and8);
    read_op16!(and_absy_m0x0, absolute_indexed_y_x0, Wrap::None, and16);
    read_op_m!(and_absy_slow, absolute_indexed_y_slow, Wrap::None, and8, and16);

    read_op8!(and_abl_m1, absolute_long, and8);
    read_op16!(and_abl_m0, absolute_long, Wrap::None, and16);
    read_op_m!(and_abl_slow, absolute_long, Wrap::None, and8, and16);

    read_op8!(and_ablx_m1, absolute_long_indexed_x, and8);
    read_op16!(and_ablx_m0, absolute_long_indexed_x, Wrap::None, and16);
    read_op_m!(and_ablx_slow, absolute_long_indexed_x, Wrap::None, and8, and16);

    read_op8!(and_sr_m1, stack_relative, and8);
    read_op16!(and_sr_m0, stack_relative, Wrap::None, and16);
    read_op_m!(and_sr_slow, stack_relative, Wrap::None, and8, and16);

    read_op8!(and_sriy_m1, stack_relative_indirect_indexed, and8);
    read_op16!(and_sriy_m0, stack_relative_indirect_indexed, Wrap::None, and16);
    read_op_m!(and_sriy_slow, stack_relative_indirect_indexed, Wrap::None, and8, and16);

    // --- ORA --------------------------------------------------------------
    imm_ops_m!(ora_imm_m1, ora_imm_m0, ora_imm_slow, ora8, ora16);

    read_op8!(ora_dp_m1, direct, ora8);
    read_op16!(ora_dp_m0, direct, Wrap::Bank, ora16);
    read_op_m!(ora_dp_slow, direct, Wrap::Bank, ora8, ora16);

    read_op8!(ora_dpx_e1, direct_indexed_x_e1, ora8);
    read_op8!(ora_dpx_m1, direct_indexed_x_e0, ora8);
    read_op16!(ora_dpx_m0, direct_indexed_x_e0, Wrap::Bank, ora16);
    read_op_m!(ora_dpx_slow, direct_indexed_x_slow, Wrap::Bank, ora8, ora16);

    read_op8!(ora_dpi_e1, direct_indirect_e1, ora8);
    read_op8!(ora_dpi_m1, direct_indirect_e0, ora8);
    read_op16!(ora_dpi_m0, direct_indirect_e0, Wrap::None, ora16);
    read_op_m!(ora_dpi_slow, direct_indirect_slow, Wrap::None, ora8, ora16);

    read_op8!(ora_dpix_e1, direct_indexed_indirect_e1, ora8);
    read_op8!(ora_dpix_m1, direct_indexed_indirect_e0, ora8);
    read_op16!(ora_dpix_m0, direct_indexed_indirect_e0, Wrap::None, ora16);
    read_op_m!(ora_dpix_slow, direct_indexed_indirect_slow, Wrap::None, ora8, ora16);

    read_op8!(ora_dpiy_e1, direct_indirect_indexed_e1, ora8);
    read_op8!(ora_dpiy_m1, direct_indirect_indexed_e0, ora8);
    read_op16!(ora_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, ora16);
    read_op_m!(ora_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, ora8, ora16);

    read_op8!(ora_dpil_m1, direct_indirect_long, ora8);
    read_op16!(ora_dpil_m0, direct_indirect_long, Wrap::None, ora16);
    read_op_m!(ora_dpil_slow, direct_indirect_long, Wrap::None, ora8, ora16);

    read_op8!(ora_dpily_m1, direct_indirect_indexed_long, ora8);
    read_op16!(ora_dpily_m0, direct_indirect_indexed_long, Wrap::None, ora16);
    read_op_m!(ora_dpily_slow, direct_indirect_indexed_long, Wrap::None, ora8, ora16);

    read_op8!(ora_abs_m1, absolute, ora8);
    read_op16!(ora_abs_m0, absolute, Wrap::None, ora16);
    read_op_m!(ora_abs_slow, absolute, Wrap::None, ora8, ora16);

    read_op8!(ora_absx_m1x1, absolute_indexed_x_x1, ora8);
    read_op16!(ora_absx_m0x1, absolute_indexed_x_x1, Wrap::None, ora16);
    read_op8!(ora_absx_m1x0, absolute_indexed_x_x0, ora8);
    read_op16!(ora_absx_m0x0, absolute_indexed_x_x0, Wrap::None, ora16);
    read_op_m!(ora_absx_slow, absolute_indexed_x_slow, Wrap::None, ora8, ora16);

    read_op8!(ora_absy_m1x1, absolute_indexed_y_x1, ora8);
    read_op16!(ora_absy_m0x1, absolute_indexed_y_x1, Wrap::None, ora16);
    read_op8!(ora_absy_m1x0, absolute_indexed_y_x0, ora8);
    read_op16!(ora_absy_m0x0, absolute_indexed_y_x0, Wrap::None, ora16);
    read_op_m!(ora_absy_slow, absolute_indexed_y_slow, Wrap::None, ora8, ora16);

    read_op8!(ora_abl_m1, absolute_long, ora8);
    read_op16!(ora_abl_m0, absolute_long, Wrap::None, ora16);
    read_op_m!(ora_abl_slow, absolute_long, Wrap::None, ora8, ora16);

    read_op8!(ora_ablx_m1, absolute_long_indexed_x, ora8);
    read_op16!(ora_ablx_m0, absolute_long_indexed_x, Wrap::None, ora16);
    read_op_m!(ora_ablx_slow, absolute_long_indexed_x, Wrap::None, ora8, ora16);

    read_op8!(ora_sr_m1, stack_relative, ora8);
    read_op16!(ora_sr_m0, stack_relative, Wrap::None, ora16);
    read_op_m!(ora_sr_slow, stack_relative, Wrap::None, ora8, ora16);

    read_op8!(ora_sriy_m1, stack_relative_indirect_indexed, ora8);
    read_op16!(ora_sriy_m0, stack_relative_indirect_indexed, Wrap::None, ora16);
    read_op_m!(ora_sriy_slow, stack_relative_indirect_indexed, Wrap::None, ora8, ora16);

    // --- EOR --------------------------------------------------------------
    imm_ops_m!(eor_imm_m1, eor_imm_m0, eor_imm_slow, eor8, eor16);

    read_op8!(eor_dp_m1, direct, eor8);
    read_op16!(eor_dp_m0, direct, Wrap::Bank, eor16);
    read_op_m!(eor_dp_slow, direct, Wrap::Bank, eor8, eor16);

    read_op8!(eor_dpx_e1, direct_indexed_x_e1, eor8);
    read_op8!(eor_dpx_m1, direct_indexed_x_e0, eor8);
    read_op16!(eor_dpx_m0, direct_indexed_x_e0, Wrap::Bank, eor16);
    read_op_m!(eor_dpx_slow, direct_indexed_x_slow, Wrap::Bank, eor8, eor16);

    read_op8!(eor_dpi_e1, direct_indirect_e1, eor8);
    read_op8!(eor_dpi_m1, direct_indirect_e0, eor8);
    read_op16!(eor_dpi_m0, direct_indirect_e0, Wrap::None, eor16);
    read_op_m!(eor_dpi_slow, direct_indirect_slow, Wrap::None, eor8, eor16);

    read_op8!(eor_dpix_e1, direct_indexed_indirect_e1, eor8);
    read_op8!(eor_dpix_m1, direct_indexed_indirect_e0, eor8);
    read_op16!(eor_dpix_m0, direct_indexed_indirect_e0, Wrap::None, eor16);
    read_op_m!(eor_dpix_slow, direct_indexed_indirect_slow, Wrap::None, eor8, eor16);

    read_op8!(eor_dpiy_e1, direct_indirect_indexed_e1, eor8);
    read_op8!(eor_dpiy_m1, direct_indirect_indexed_e0, eor8);
    read_op16!(eor_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, eor16);
    read_op_m!(eor_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, eor8, eor16);

    read_op8!(eor_dpil_m1, direct_indirect_long, eor8);
    read_op16!(eor_dpil_m0, direct_indirect_long, Wrap::None, eor16);
    read_op_m!(eor_dpil_slow, direct_indirect_long, Wrap::None, eor8, eor16);

    read_op8!(eor_dpily_m1, direct_indirect_indexed_long, eor8);
    read_op16!(eor_dpily_m0, direct_indirect_indexed_long, Wrap::None, eor16);
    read_op_m!(eor_dpily_slow, direct_indirect_indexed_long, Wrap::None, eor8, eor16);

    read_op8!(eor_abs_m1, absolute, eor8);
    read_op16!(eor_abs_m0, absolute, Wrap::None, eor16);
    read_op_m!(eor_abs_slow, absolute, Wrap::None, eor8, eor16);

    read_op8!(eor_absx_m1x1, absolute_indexed_x_x1, eor8);
    read_op16!(eor_absx_m0x1, absolute_indexed_x_x1, Wrap::None, eor16);
    read_op8!(eor_absx_m1x0, absolute_indexed_x_x0, eor8);
    read_op16!(eor_absx_m0x0, absolute_indexed_x_x0, Wrap::None, eor16);
    read_op_m!(eor_absx_slow, absolute_indexed_x_slow, Wrap::None, eor8, eor16);

    read_op8!(eor_absy_m1x1, absolute_indexed_y_x1, eor8);
    read_op16!(eor_absy_m0x1, absolute_indexed_y_x1, Wrap::None, eor16);
    read_op8!(eor_absy_m1x0, absolute_indexed_y_x0, eor8);
    read_op16!(eor_absy_m0x0, absolute_indexed_y_x0, Wrap::None, eor16);
    read_op_m!(eor_absy_slow, absolute_indexed_y_slow, Wrap::None, eor8, eor16);

    read_op8!(eor_abl_m1, absolute_long, eor8);
    read_op16!(eor_abl_m0, absolute_long, Wrap::None, eor16);
    read_op_m!(eor_abl_slow, absolute_long, Wrap::None, eor8, eor16);

    read_op8!(eor_ablx_m1, absolute_long_indexed_x, eor8);
    read_op16!(eor_ablx_m0, absolute_long_indexed_x, Wrap::None, eor16);
    read_op_m!(eor_ablx_slow, absolute_long_indexed_x, Wrap::None, eor8, eor16);

    read_op8!(eor_sr_m1, stack_relative, eor8);
    read_op16!(eor_sr_m0, stack_relative, Wrap::None, eor16);
    read_op_m!(eor_sr_slow, stack_relative, Wrap::None, eor8, eor16);

    read_op8!(eor_sriy_m1, stack_relative_indirect_indexed, eor8);
    read_op16!(eor_sriy_m0, stack_relative_indirect_indexed, Wrap::None, eor16);
    read_op_m!(eor_sriy_slow, stack_relative_indirect_indexed, Wrap::None, eor8, eor16);

    // --- CMP --------------------------------------------------------------
    imm_ops_m!(cmp_imm_m1, cmp_imm_m0, cmp_imm_slow, cmp8, cmp16);

    read_op8!(cmp_dp_m1, direct, cmp8);
    read_op16!(cmp_dp_m0, direct, Wrap::Bank, cmp16);
    read_op_m!(cmp_dp_slow, direct, Wrap::Bank, cmp8, cmp16);

    read_op8!(cmp_dpx_e1, direct_indexed_x_e1, cmp8);
    read_op8!(cmp_dpx_m1, direct_indexed_x_e0, cmp8);
    read_op16!(cmp_dpx_m0, direct_indexed_x_e0, Wrap::Bank, cmp16);
    read_op_m!(cmp_dpx_slow, direct_indexed_x_slow, Wrap::Bank, cmp8, cmp16);

    read_op8!(cmp_dpi_e1, direct_indirect_e1, cmp8);
    read_op8!(cmp_dpi_m1, direct_indirect_e0, cmp8);
    read_op16!(cmp_dpi_m0, direct_indirect_e0, Wrap::None, cmp16);
    read_op_m!(cmp_dpi_slow, direct_indirect_slow, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_dpix_e1, direct_indexed_indirect_e1, cmp8);
    read_op8!(cmp_dpix_m1, direct_indexed_indirect_e0, cmp8);
    read_op16!(cmp_dpix_m0, direct_indexed_indirect_e0, Wrap::None, cmp16);
    read_op_m!(cmp_dpix_slow, direct_indexed_indirect_slow, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_dpiy_e1, direct_indirect_indexed_e1, cmp8);
    read_op8!(cmp_dpiy_m1, direct_indirect_indexed_e0, cmp8);
    read_op16!(cmp_dpiy_m0, direct_indirect_indexed_e0, Wrap::None, cmp16);
    read_op_m!(cmp_dpiy_slow, direct_indirect_indexed_slow, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_dpil_m1, direct_indirect_long, cmp8);
    read_op16!(cmp_dpil_m0, direct_indirect_long, Wrap::None, cmp16);
    read_op_m!(cmp_dpil_slow, direct_indirect_long, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_dpily_m1, direct_indirect_indexed_long, cmp8);
    read_op16!(cmp_dpily_m0, direct_indirect_indexed_long, Wrap::None, cmp16);
    read_op_m!(cmp_dpily_slow, direct_indirect_indexed_long, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_abs_m1, absolute, cmp8);
    read_op16!(cmp_abs_m0, absolute, Wrap::None, cmp16);
    read_op_m!(cmp_abs_slow, absolute, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_absx_m1x1, absolute_indexed_x_x1, cmp8);
    read_op16!(cmp_absx_m0x1, absolute_indexed_x_x1, Wrap::None, cmp16);
    read_op8!(cmp_absx_m1x0, absolute_indexed_x_x0, cmp8);
    read_op16!(cmp_absx_m0x0, absolute_indexed_x_x0, Wrap::None, cmp16);
    read_op_m!(cmp_absx_slow, absolute_indexed_x_slow, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_absy_m1x1, absolute_indexed_y_x1, cmp8);
    read_op16!(cmp_absy_m0x1, absolute_indexed_y_x1, Wrap::None, cmp16);
    read_op8!(cmp_absy_m1x0, absolute_indexed_y_x0, cmp8);
    read_op16!(cmp_absy_m0x0, absolute_indexed_y_x0, Wrap::None, cmp16);
    read_op_m!(cmp_absy_slow, absolute_indexed_y_slow, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_abl_m1, absolute_long, cmp8);
    read_op16!(cmp_abl_m0, absolute_long, Wrap::None, cmp16);
    read_op_m!(cmp_abl_slow, absolute_long, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_ablx_m1, absolute_long_indexed_x, cmp8);
    read_op16!(cmp_ablx_m0, absolute_long_indexed_x, Wrap::None, cmp16);
    read_op_m!(cmp_ablx_slow, absolute_long_indexed_x, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_sr_m1, stack_relative, cmp8);
    read_op16!(cmp_sr_m0, stack_relative, Wrap::None, cmp16);
    read_op_m!(cmp_sr_slow, stack_relative, Wrap::None, cmp8, cmp16);

    read_op8!(cmp_sriy_m1, stack_relative_indirect_indexed, cmp8);
    read_op16!(cmp_sriy_m0, stack_relative_indirect_indexed, Wrap::None, cmp16);
    read_op_m!(cmp_sriy_slow, stack_relative_indirect_indexed, Wrap::None, cmp8, cmp16);

    // --- CPX / CPY --------------------------------------------------------
    imm_ops_x!(cpx_imm_x1, cpx_imm_x0, cpx_imm_slow, cpx8, cpx16);
    imm_ops_x!(cpy_imm_x1, cpy_imm_x0, cpy_imm_slow, cpy8, cpy16);

    read_op8!(cpx_dp_x1, direct, cpx8);
    read_op16!(cpx_dp_x0, direct, Wrap::Bank, cpx16);
    read_op_x!(cpx_dp_slow, direct, Wrap::Bank, cpx8, cpx16);

    read_op8!(cpx_abs_x1, absolute, cpx8);
    read_op16!(cpx_abs_x0, absolute, Wrap::None, cpx16);
    read_op_x!(cpx_abs_slow, absolute, Wrap::None, cpx8, cpx16);

    read_op8!(cpy_dp_x1, direct, cpy8);
    read_op16!(cpy_dp_x0, direct, Wrap::Bank, cpy16);
    read_op_x!(cpy_dp_slow, direct, Wrap::Bank, cpy8, cpy16);

    read_op8!(cpy_abs_x1, absolute, cpy8);
    read_op16!(cpy_abs_x0, absolute, Wrap::None, cpy16);
    read_op_x!(cpy_abs_slow, absolute, Wrap::None, cpy8, cpy16);

    // --- BIT --------------------------------------------------------------
    /// BIT # only touches Z; the N/V update of the other forms is
    /// suppressed.
    pub(crate) fn bit_imm_m1(cpu: &mut Self) {
        let val = cpu.fetch_byte();
        cpu.zero = val & cpu.regs.al();
    }

    pub(crate) fn bit_imm_m0(cpu: &mut Self) {
        let val = cpu.fetch_word();
        cpu.zero = (val & cpu.regs.a != 0) as u8;
    }

    pub(crate) fn bit_imm_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::bit_imm_m1(cpu);
        } else {
            Self::bit_imm_m0(cpu);
        }
    }

    read_op8!(bit_dp_m1, direct, bit8);
    read_op16!(bit_dp_m0, direct, Wrap::Bank, bit16);
    read_op_m!(bit_dp_slow, direct, Wrap::Bank, bit8, bit16);

    read_op8!(bit_dpx_e1, direct_indexed_x_e1, bit8);
    read_op8!(bit_dpx_m1, direct_indexed_x_e0, bit8);
    read_op16!(bit_dpx_m0, direct_indexed_x_e0, Wrap::Bank, bit16);
    read_op_m!(bit_dpx_slow, direct_indexed_x_slow, Wrap::Bank, bit8, bit16);

    read_op8!(bit_abs_m1, absolute, bit8);
    read_op16!(bit_abs_m0, absolute, Wrap::None, bit16);
    read_op_m!(bit_abs_slow, absolute, Wrap::None, bit8, bit16);

    read_op8!(bit_absx_m1x1, absolute_indexed_x_x1, bit8);
    read_op16!(bit_absx_m0x1, absolute_indexed_x_x1, Wrap::None, bit16);
    read_op8!(bit_absx_m1x0, absolute_indexed_x_x0, bit8);
    read_op16!(bit_absx_m0x0, absolute_indexed_x_x0, Wrap::None, bit16);
    read_op_m!(bit_absx_slow, absolute_indexed_x_slow, Wrap::None, bit8, bit16);

    // --- TSB / TRB --------------------------------------------------------
    rmw_op8!(tsb_dp_m1, direct, tsb8_at);
    rmw_op16!(tsb_dp_m0, direct, Wrap::Bank, tsb16_at);
    rmw_op_m!(tsb_dp_slow, direct, Wrap::Bank, tsb8_at, tsb16_at);

    rmw_op8!(tsb_abs_m1, absolute, tsb8_at);
    rmw_op16!(tsb_abs_m0, absolute, Wrap::Bank, tsb16_at);
    rmw_op_m!(tsb_abs_slow, absolute, Wrap::Bank, tsb8_at, tsb16_at);

    rmw_op8!(trb_dp_m1, direct, trb8_at);
    rmw_op16!(trb_dp_m0, direct, Wrap::Bank, trb16_at);
    rmw_op_m!(trb_dp_slow, direct, Wrap::Bank, trb8_at, trb16_at);

    rmw_op8!(trb_abs_m1, absolute, trb8_at);
    rmw_op16!(trb_abs_m0, absolute, Wrap::Bank, trb16_at);
    rmw_op_m!(trb_abs_slow, absolute, Wrap::Bank, trb8_at, trb16_at);

    // --- shifts and rotates -----------------------------------------------
    pub(crate) fn asl_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.al();
        cpu.carry = v & 0x80 != 0;
        let v = v << 1;
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn asl_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a;
        cpu.carry = v & 0x8000 != 0;
        let v = v << 1;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn asl_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::asl_a_m1(cpu);
        } else {
            Self::asl_a_m0(cpu);
        }
    }

    rmw_op8!(asl_dp_m1, direct, asl8_at);
    rmw_op16!(asl_dp_m0, direct, Wrap::Bank, asl16_at);
    rmw_op_m!(asl_dp_slow, direct, Wrap::Bank, asl8_at, asl16_at);

    rmw_op8!(asl_dpx_e1, direct_indexed_x_e1, asl8_at);
    rmw_op8!(asl_dpx_m1, direct_indexed_x_e0, asl8_at);
    rmw_op16!(asl_dpx_m0, direct_indexed_x_e0, Wrap::Bank, asl16_at);
    rmw_op_m!(asl_dpx_slow, direct_indexed_x_slow, Wrap::Bank, asl8_at, asl16_at);

    rmw_op8!(asl_abs_m1, absolute, asl8_at);
    rmw_op16!(asl_abs_m0, absolute, Wrap::None, asl16_at);
    rmw_op_m!(asl_abs_slow, absolute, Wrap::None, asl8_at, asl16_at);

    rmw_op8!(asl_absx_m1x1, absolute_indexed_x_x1, asl8_at);
    rmw_op16!(asl_absx_m0x1, absolute_indexed_x_x1, Wrap::None, asl16_at);
    rmw_op8!(asl_absx_m1x0, absolute_indexed_x_x0, asl8_at);
    rmw_op16!(asl_absx_m0x0, absolute_indexed_x_x0, Wrap::None, asl16_at);
    rmw_op_m!(asl_absx_slow, absolute_indexed_x_slow, Wrap::None, asl8_at, asl16_at);

    pub(crate) fn lsr_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.al();
        cpu.carry = v & 1 != 0;
        let v = v >> 1;
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn lsr_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a;
        cpu.carry = v & 1 != 0;
        let v = v >> 1;
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn lsr_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::lsr_a_m1(cpu);
        } else {
            Self::lsr_a_m0(cpu);
        }
    }

    rmw_op8!(lsr_dp_m1, direct, lsr8_at);
    rmw_op16!(lsr_dp_m0, direct, Wrap::Bank, lsr16_at);
    rmw_op_m!(lsr_dp_slow, direct, Wrap::Bank, lsr8_at, lsr16_at);

    rmw_op8!(lsr_dpx_e1, direct_indexed_x_e1, lsr8_at);
    rmw_op8!(lsr_dpx_m1, direct_indexed_x_e0, lsr8_at);
    rmw_op16!(lsr_dpx_m0, direct_indexed_x_e0, Wrap::Bank, lsr16_at);
    rmw_op_m!(lsr_dpx_slow, direct_indexed_x_slow, Wrap::Bank, lsr8_at, lsr16_at);

    rmw_op8!(lsr_abs_m1, absolute, lsr8_at);
    rmw_op16!(lsr_abs_m0, absolute, Wrap::None, lsr16_at);
    rmw_op_m!(lsr_abs_slow, absolute, Wrap::None, lsr8_at, lsr16_at);

    rmw_op8!(lsr_absx_m1x1, absolute_indexed_x_x1, lsr8_at);
    rmw_op16!(lsr_absx_m0x1, absolute_indexed_x_x1, Wrap::None, lsr16_at);
    rmw_op8!(lsr_absx_m1x0, absolute_indexed_x_x0, lsr8_at);
    rmw_op16!(lsr_absx_m0x0, absolute_indexed_x_x0, Wrap::None, lsr16_at);
    rmw_op_m!(lsr_absx_slow, absolute_indexed_x_slow, Wrap::None, lsr8_at, lsr16_at);

    pub(crate) fn rol_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let w = (cpu.regs.al() as u16) << 1 | cpu.carry as u16;
        cpu.carry = w > 0xFF;
        let w = w as u8;
        cpu.regs.set_al(w);
        cpu.set_zn8(w);
    }

    pub(crate) fn rol_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let w = (cpu.regs.a as u32) << 1 | cpu.carry as u32;
        cpu.carry = w > 0xFFFF;
        let w = w as u16;
        cpu.regs.a = w;
        cpu.set_zn16(w);
    }

    pub(crate) fn rol_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::rol_a_m1(cpu);
        } else {
            Self::rol_a_m0(cpu);
        }
    }

    rmw_op8!(rol_dp_m1, direct, rol8_at);
    rmw_op16!(rol_dp_m0, direct, Wrap::Bank, rol16_at);
    rmw_op_m!(rol_dp_slow, direct, Wrap::Bank, rol8_at, rol16_at);

    rmw_op8!(rol_dpx_e1, direct_indexed_x_e1, rol8_at);
    rmw_op8!(rol_dpx_m1, direct_indexed_x_e0, rol8_at);
    rmw_op16!(rol_dpx_m0, direct_indexed_x_e0, Wrap::Bank, rol16_at);
    rmw_op_m!(rol_dpx_slow, direct_indexed_x_slow, Wrap::Bank, rol8_at, rol16_at);

    rmw_op8!(rol_abs_m1, absolute, rol8_at);
    rmw_op16!(rol_abs_m0, absolute, Wrap::None, rol16_at);
    rmw_op_m!(rol_abs_slow, absolute, Wrap::None, rol8_at, rol16_at);

    rmw_op8!(rol_absx_m1x1, absolute_indexed_x_x1, rol8_at);
    rmw_op16!(rol_absx_m0x1, absolute_indexed_x_x1, Wrap::None, rol16_at);
    rmw_op8!(rol_absx_m1x0, absolute_indexed_x_x0, rol8_at);
    rmw_op16!(rol_absx_m0x0, absolute_indexed_x_x0, Wrap::None, rol16_at);
    rmw_op_m!(rol_absx_slow, absolute_indexed_x_slow, Wrap::None, rol8_at, rol16_at);

    pub(crate) fn ror_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.al() as u16 | (cpu.carry as u16) << 8;
        cpu.carry = v & 1 != 0;
        let w = (v >> 1) as u8;
        cpu.regs.set_al(w);
        cpu.set_zn8(w);
    }

    pub(crate) fn ror_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        let v = cpu.regs.a as u32 | (cpu.carry as u32) << 16;
        cpu.carry = v & 1 != 0;
        let w = (v >> 1) as u16;
        cpu.regs.a = w;
        cpu.set_zn16(w);
    }

    pub(crate) fn ror_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::ror_a_m1(cpu);
        } else {
            Self::ror_a_m0(cpu);
        }
    }

    rmw_op8!(ror_dp_m1, direct, ror8_at);
    rmw_op16!(ror_dp_m0, direct, Wrap::Bank, ror16_at);
    rmw_op_m!(ror_dp_slow, direct, Wrap::Bank, ror8_at, ror16_at);

    rmw_op8!(ror_dpx_e1, direct_indexed_x_e1, ror8_at);
    rmw_op8!(ror_dpx_m1, direct_indexed_x_e0, ror8_at);
    rmw_op16!(ror_dpx_m0, direct_indexed_x_e0, Wrap::Bank, ror16_at);
    rmw_op_m!(ror_dpx_slow, direct_indexed_x_slow, Wrap::Bank, ror8_at, ror16_at);

    rmw_op8!(ror_abs_m1, absolute, ror8_at);
    rmw_op16!(ror_abs_m0, absolute, Wrap::None, ror16_at);
    rmw_op_m!(ror_abs_slow, absolute, Wrap::None, ror8_at, ror16_at);

    rmw_op8!(ror_absx_m1x1, absolute_indexed_x_x1, ror8_at);
    rmw_op16!(ror_absx_m0x1, absolute_indexed_x_x1, Wrap::None, ror16_at);
    rmw_op8!(ror_absx_m1x0, absolute_indexed_x_x0, ror8_at);
    rmw_op16!(ror_absx_m0x0, absolute_indexed_x_x0, Wrap::None, ror16_at);
    rmw_op_m!(ror_absx_slow, absolute_indexed_x_slow, Wrap::None, ror8_at, ror16_at);

    // --- INC / DEC --------------------------------------------------------
    pub(crate) fn inc_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.al().wrapping_add(1);
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn inc_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.a.wrapping_add(1);
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn inc_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::inc_a_m1(cpu);
        } else {
            Self::inc_a_m0(cpu);
        }
    }

    pub(crate) fn dec_a_m1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.al().wrapping_sub(1);
        cpu.regs.set_al(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn dec_a_m0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.a.wrapping_sub(1);
        cpu.regs.a = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn dec_a_slow(cpu: &mut Self) {
        if cpu.mem8() {
            Self::dec_a_m1(cpu);
        } else {
            Self::dec_a_m0(cpu);
        }
    }

    rmw_op8!(inc_dp_m1, direct, inc8_at);
    rmw_op16!(inc_dp_m0, direct, Wrap::Bank, inc16_at);
    rmw_op_m!(inc_dp_slow, direct, Wrap::Bank, inc8_at, inc16_at);

    rmw_op8!(inc_dpx_e1, direct_indexed_x_e1, inc8_at);
    rmw_op8!(inc_dpx_m1, direct_indexed_x_e0, inc8_at);
    rmw_op16!(inc_dpx_m0, direct_indexed_x_e0, Wrap::Bank, inc16_at);
    rmw_op_m!(inc_dpx_slow, direct_indexed_x_slow, Wrap::Bank, inc8_at, inc16_at);

    rmw_op8!(inc_abs_m1, absolute, inc8_at);
    rmw_op16!(inc_abs_m0, absolute, Wrap::None, inc16_at);
    rmw_op_m!(inc_abs_slow, absolute, Wrap::None, inc8_at, inc16_at);

    rmw_op8!(inc_absx_m1x1, absolute_indexed_x_x1, inc8_at);
    rmw_op16!(inc_absx_m0x1, absolute_indexed_x_x1, Wrap::None, inc16_at);
    rmw_op8!(inc_absx_m1x0, absolute_indexed_x_x0, inc8_at);
    rmw_op16!(inc_absx_m0x0, absolute_indexed_x_x0, Wrap::None, inc16_at);
    rmw_op_m!(inc_absx_slow, absolute_indexed_x_slow, Wrap::None, inc8_at, inc16_at);

    rmw_op8!(dec_dp_m1, direct, dec8_at);
    rmw_op16!(dec_dp_m0, direct, Wrap::Bank, dec16_at);
    rmw_op_m!(dec_dp_slow, direct, Wrap::Bank, dec8_at, dec16_at);

    rmw_op8!(dec_dpx_e1, direct_indexed_x_e1, dec8_at);
    rmw_op8!(dec_dpx_m1, direct_indexed_x_e0, dec8_at);
    rmw_op16!(dec_dpx_m0, direct_indexed_x_e0, Wrap::Bank, dec16_at);
    rmw_op_m!(dec_dpx_slow, direct_indexed_x_slow, Wrap::Bank, dec8_at, dec16_at);

    rmw_op8!(dec_abs_m1, absolute, dec8_at);
    rmw_op16!(dec_abs_m0, absolute, Wrap::None, dec16_at);
    rmw_op_m!(dec_abs_slow, absolute, Wrap::None, dec8_at, dec16_at);

    rmw_op8!(dec_absx_m1x1, absolute_indexed_x_x1, dec8_at);
    rmw_op16!(dec_absx_m0x1, absolute_indexed_x_x1, Wrap::None, dec16_at);
    rmw_op8!(dec_absx_m1x0, absolute_indexed_x_x0, dec8_at);
    rmw_op16!(dec_absx_m0x0, absolute_indexed_x_x0, Wrap::None, dec16_at);
    rmw_op_m!(dec_absx_slow, absolute_indexed_x_slow, Wrap::None, dec8_at, dec16_at);

    // --- INX / INY / DEX / DEY --------------------------------------------
    pub(crate) fn inx_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.xl().wrapping_add(1);
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn inx_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.x.wrapping_add(1);
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn inx_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::inx_x1(cpu);
        } else {
            Self::inx_x0(cpu);
        }
    }

    pub(crate) fn iny_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.yl().wrapping_add(1);
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn iny_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.y.wrapping_add(1);
        cpu.regs.y = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn iny_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::iny_x1(cpu);
        } else {
            Self::iny_x0(cpu);
        }
    }

    pub(crate) fn dex_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.xl().wrapping_sub(1);
        cpu.regs.set_xl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn dex_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.x.wrapping_sub(1);
        cpu.regs.x = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn dex_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::dex_x1(cpu);
        } else {
            Self::dex_x0(cpu);
        }
    }

    pub(crate) fn dey_x1(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.yl().wrapping_sub(1);
        cpu.regs.set_yl(v);
        cpu.set_zn8(v);
    }

    pub(crate) fn dey_x0(cpu: &mut Self) {
        cpu.one_cycle();
        cpu.wait_pc = 0;
        let v = cpu.regs.y.wrapping_sub(1);
        cpu.regs.y = v;
        cpu.set_zn16(v);
    }

    pub(crate) fn dey_slow(cpu: &mut Self) {
        if cpu.index8() {
            Self::dey_x1(cpu);
        } else {
            Self::dey_x0(cpu);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::{Bus, ONE_CYCLE};
    use crate::test_support::{cpu_with_program, native_mode, step_n};

    #[test]
    fn logic_ops_8bit() {
        // LDA #$F0 / AND #$3C / ORA #$01 / EOR #$FF
        let mut cpu = cpu_with_program(&[0xA9, 0xF0, 0x29, 0x3C, 0x09, 0x01, 0x49, 0xFF]);
        step_n(&mut cpu, 2);
        assert_eq!(cpu.regs.al(), 0x30);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x31);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0xCE);
        assert_ne!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn logic_ops_16bit() {
        let mut cpu = cpu_with_program(&[0x29, 0x0F, 0xF0]);
        native_mode(&mut cpu, false, false);
        cpu.regs.a = 0xABCD;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.a, 0xA00D);
    }

    #[test]
    fn asl_rol_carry_chain() {
        // ASL A then ROL A rotates the shifted-out bit back in.
        let mut cpu = cpu_with_program(&[0x0A, 0x2A]);
        cpu.regs.set_al(0x80);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x00);
        assert!(cpu.carry);
        assert_eq!(cpu.zero, 0);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x01);
        assert!(!cpu.carry);
    }

    #[test]
    fn ror_through_carry() {
        let mut cpu = cpu_with_program(&[0x6A]);
        cpu.regs.set_al(0x01);
        cpu.carry = true;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.al(), 0x80);
        assert!(cpu.carry);
        assert_ne!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn rmw_direct_page_cycles() {
        // ASL $10 with DL=0: 5 cycles.
        let mut cpu = cpu_with_program(&[0x06, 0x10]);
        cpu.bus.load(0x000010, &[0x41]);
        let start = cpu.cycles;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.cycles - start, 5 * ONE_CYCLE);
        assert_eq!(cpu.bus.read(0x000010), Some(0x82));
    }

    #[test]
    fn rmw_16bit_memory() {
        let mut cpu = cpu_with_program(&[0x0E, 0x00, 0x10]);
        native_mode(&mut cpu, false, false);
        cpu.bus.load(0x001000, &[0x00, 0x80]);
        let start = cpu.cycles;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x001000), Some(0x00));
        assert_eq!(cpu.bus.read(0x001001), Some(0x00));
        assert!(cpu.carry);
        assert_eq!(cpu.zero, 0);
        // 8 cycles: fetch, two operands, two reads, internal, two writes.
        assert_eq!(cpu.cycles - start, 8 * ONE_CYCLE);
    }

    #[test]
    fn bit_memory_and_immediate() {
        // BIT $10 sets N/V from the operand; BIT # leaves them alone.
        let mut cpu = cpu_with_program(&[0x24, 0x10, 0x89, 0x00]);
        cpu.bus.load(0x000010, &[0xC0]);
        cpu.regs.set_al(0x00);
        step_n(&mut cpu, 1);
        assert_ne!(cpu.negative & 0x80, 0);
        assert!(cpu.overflow);
        assert_eq!(cpu.zero, 0);

        cpu.negative = 0;
        cpu.overflow = false;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.negative, 0, "BIT # must not touch N");
        assert!(!cpu.overflow, "BIT # must not touch V");
        assert_eq!(cpu.zero, 0);
    }

    #[test]
    fn tsb_trb() {
        let mut cpu = cpu_with_program(&[0x04, 0x20, 0x14, 0x20]);
        cpu.bus.load(0x000020, &[0x0F]);
        cpu.regs.set_al(0x81);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x000020), Some(0x8F));
        assert_eq!(cpu.zero, 0x01, "Z from old value AND A");
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x000020), Some(0x0E));
        assert_eq!(cpu.zero, 0x81);
    }

    #[test]
    fn cpx_widths() {
        let mut cpu = cpu_with_program(&[0xE0, 0x10, 0xE0, 0x34, 0x12]);
        cpu.regs.x = 0x0010;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.zero, 0);
        assert!(cpu.carry);

        let mut cpu = cpu_with_program(&[0xE0, 0x34, 0x12]);
        native_mode(&mut cpu, true, false);
        cpu.regs.x = 0x1234;
        step_n(&mut cpu, 1);
        assert_eq!(cpu.zero, 0);
        assert!(cpu.carry);
    }

    #[test]
    fn inc_dec_memory_and_registers() {
        let mut cpu = cpu_with_program(&[0xE6, 0x40, 0xC6, 0x40, 0xE8, 0x88]);
        cpu.bus.load(0x000040, &[0xFF]);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x000040), Some(0x00));
        assert_eq!(cpu.zero, 0);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.bus.read(0x000040), Some(0xFF));
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.x, 1);
        step_n(&mut cpu, 1);
        assert_eq!(cpu.regs.y, 0xFF, "8-bit DEY wraps in the low byte");
    }
}
