use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::dispatch::TableKey;
use crate::memory::{Bus, Wrap, WriteOrder, ONE_CYCLE, TWO_CYCLES};
use crate::registers::{Registers, FLAG_C, FLAG_D, FLAG_I, FLAG_M, FLAG_N, FLAG_V, FLAG_X, FLAG_Z};

bitflags! {
    /// Asynchronous events pending between instructions. While any bit is
    /// set the slow dispatch table is in force.
    pub struct EventFlags: u32 {
        /// Edge-triggered NMI waiting to be serviced.
        const NMI = 0x01;
        /// Level-triggered IRQ line held active.
        const IRQ = 0x02;
        /// STP was executed; only reset recovers.
        const HALTED = 0x04;
    }
}

/// The interpreter context: register file, fast status flags, cycle
/// bookkeeping and the bus it executes against.
///
/// C, Z, V and N are kept out of the packed status byte because most
/// instructions touch only a subset of them; they are folded into
/// `regs.pl` by [`Cpu::pack_status`] at PHP/interrupt boundaries and pulled
/// back out by [`Cpu::unpack_status`] at PLP/RTI.
pub struct Cpu<B> {
    pub regs: Registers,
    /// Carry flag.
    pub carry: bool,
    /// Zero flag image: Z is set exactly when this is zero.
    pub zero: u8,
    /// Negative flag image: N is bit 7.
    pub negative: u8,
    /// Overflow flag.
    pub overflow: bool,
    /// Cached `PB << 16`.
    pub shifted_pb: u32,
    /// Cached `DB << 16`.
    pub shifted_db: u32,
    /// Last byte driven on the data bus.
    pub open_bus: u8,
    /// Master cycles consumed since reset.
    pub cycles: u64,
    /// Cycle count at which the scheduler regains control.
    pub next_event: u64,
    /// Access time of the current program-fetch region.
    pub mem_speed: u64,
    /// Pending asynchronous events.
    pub flags: EventFlags,
    /// 24-bit address of the opcode whose read armed the idle-loop
    /// detector; 0 when disarmed.
    pub(crate) wait_pc: u32,
    pub(crate) wait_counter: u32,
    pub(crate) waiting_for_interrupt: bool,
    /// Suppress the next stale forward branch (speed-hack bookkeeping).
    pub(crate) branch_skip: bool,
    /// 24-bit address of the opcode currently executing.
    pub(crate) opcode_start: u32,
    pub(crate) mode_key: TableKey,
    pub(crate) shutdown_enabled: bool,
    pub(crate) speed_hacks: bool,
    pub bus: B,
}

impl<B: Bus> Cpu<B> {
    pub fn new(bus: B) -> Self {
        Cpu {
            regs: Registers::default(),
            carry: false,
            zero: 0,
            negative: 0,
            overflow: false,
            shifted_pb: 0,
            shifted_db: 0,
            open_bus: 0,
            cycles: 0,
            next_event: 0,
            mem_speed: ONE_CYCLE,
            flags: EventFlags::empty(),
            wait_pc: 0,
            wait_counter: 0,
            waiting_for_interrupt: false,
            branch_skip: false,
            opcode_start: 0,
            mode_key: TableKey::Emulation,
            shutdown_enabled: false,
            speed_hacks: false,
            bus,
        }
    }

    /// Enable the idle-loop fast-forward optimization.
    pub fn set_shutdown_enabled(&mut self, on: bool) {
        self.shutdown_enabled = on;
    }

    /// Repurpose opcodes 0xDB/0x42 as speed-hack branch trampolines instead
    /// of their architectural STP/WDM behavior.
    pub fn set_speed_hacks(&mut self, on: bool) {
        self.speed_hacks = on;
    }

    /// Arm the stale-branch suppression used by patched images.
    pub fn set_branch_skip(&mut self) {
        self.branch_skip = true;
    }

    #[inline]
    pub(crate) fn mem8(&self) -> bool {
        self.regs.pl & FLAG_M != 0
    }

    #[inline]
    pub(crate) fn index8(&self) -> bool {
        self.regs.pl & FLAG_X != 0
    }

    #[inline]
    pub(crate) fn decimal(&self) -> bool {
        self.regs.pl & FLAG_D != 0
    }

    #[inline]
    pub(crate) fn irq_disabled(&self) -> bool {
        self.regs.pl & FLAG_I != 0
    }

    #[inline]
    pub(crate) fn one_cycle(&mut self) {
        self.cycles += ONE_CYCLE;
    }

    #[inline]
    pub(crate) fn two_cycles(&mut self) {
        self.cycles += TWO_CYCLES;
    }

    /// Fold the fast flags into the packed status byte.
    pub fn pack_status(&mut self) {
        let mut pl = self.regs.pl & !(FLAG_C | FLAG_Z | FLAG_V | FLAG_N);
        pl |= self.carry as u8;
        if self.zero == 0 {
            pl |= FLAG_Z;
        }
        if self.overflow {
            pl |= FLAG_V;
        }
        pl |= self.negative & FLAG_N;
        self.regs.pl = pl;
    }

    /// Refresh the fast flags from the packed status byte.
    pub fn unpack_status(&mut self) {
        let pl = self.regs.pl;
        self.carry = pl & FLAG_C != 0;
        self.zero = (pl & FLAG_Z == 0) as u8;
        self.overflow = pl & FLAG_V != 0;
        self.negative = pl & FLAG_N;
    }

    /// Re-establish the mode invariants and dispatch table after anything
    /// that may have changed E, M or X.
    pub(crate) fn update_mode(&mut self) {
        if self.regs.e {
            self.regs.pl |= FLAG_M | FLAG_X;
        }
        if self.index8() {
            self.regs.set_xh(0);
            self.regs.set_yh(0);
        }
        self.mode_key = TableKey::select(self.regs.e, self.mem8(), self.index8());
    }

    #[inline]
    pub(crate) fn set_zn8(&mut self, v: u8) {
        self.zero = v;
        self.negative = v;
    }

    #[inline]
    pub(crate) fn set_zn16(&mut self, v: u16) {
        self.zero = (v != 0) as u8;
        self.negative = (v >> 8) as u8;
    }

    // --- arithmetic -------------------------------------------------------

    pub(crate) fn adc8(&mut self, w: u8) {
        let al = self.regs.al();
        let res = if self.decimal() {
            let mut r = (al & 0x0F) as u32 + (w & 0x0F) as u32 + self.carry as u32;
            if r > 0x09 {
                r += 0x06;
            }
            let c = (r > 0x0F) as u32;
            r = (al & 0xF0) as u32 + (w & 0xF0) as u32 + (r & 0x0F) + c * 0x10;
            self.overflow = !(al ^ w) & (w ^ r as u8) & 0x80 != 0;
            if r > 0x9F {
                r += 0x60;
            }
            self.carry = r > 0xFF;
            r as u8
        } else {
            let r = al as u32 + w as u32 + self.carry as u32;
            self.carry = r > 0xFF;
            self.overflow = !(al ^ w) & (w ^ r as u8) & 0x80 != 0;
            r as u8
        };
        self.regs.set_al(res);
        self.set_zn8(res);
    }

    pub(crate) fn adc16(&mut self, w: u16) {
        let a = self.regs.a;
        let res = if self.decimal() {
            let mut r = (a & 0x000F) as u32 + (w & 0x000F) as u32 + self.carry as u32;
            if r > 0x0009 {
                r += 0x0006;
            }
            let c = (r > 0x000F) as u32;
            r = (a & 0x00F0) as u32 + (w & 0x00F0) as u32 + (r & 0x000F) + c * 0x10;
            if r > 0x009F {
                r += 0x0060;
            }
            let c = (r > 0x00FF) as u32;
            r = (a & 0x0F00) as u32 + (w & 0x0F00) as u32 + (r & 0x00FF) + c * 0x100;
            if r > 0x09FF {
                r += 0x0600;
            }
            let c = (r > 0x0FFF) as u32;
            r = (a & 0xF000) as u32 + (w & 0xF000) as u32 + (r & 0x0FFF) + c * 0x1000;
            self.overflow = !(a ^ w) & (w ^ r as u16) & 0x8000 != 0;
            if r > 0x9FFF {
                r += 0x6000;
            }
            self.carry = r > 0xFFFF;
            r as u16
        } else {
            let r = a as u32 + w as u32 + self.carry as u32;
            self.carry = r > 0xFFFF;
            self.overflow = !(a ^ w) & (w ^ r as u16) & 0x8000 != 0;
            r as u16
        };
        self.regs.a = res;
        self.set_zn16(res);
    }

    pub(crate) fn sbc8(&mut self, w: u8) {
        let al = self.regs.al();
        let res = if self.decimal() {
            let mut lo = (al & 0x0F) as i32 - (w & 0x0F) as i32 - (1 - self.carry as i32);
            let mut hi = (al >> 4) as i32 - (w >> 4) as i32;
            if lo < 0 {
                lo += 10;
                hi -= 1;
            }
            let borrow = hi < 0;
            if borrow {
                hi += 10;
            }
            self.carry = !borrow;
            let r = ((hi as u8 & 0x0F) << 4) | (lo as u8 & 0x0F);
            self.overflow = (al ^ w) & (al ^ r) & 0x80 != 0;
            r
        } else {
            let r = al as i32 - w as i32 - (1 - self.carry as i32);
            self.carry = r >= 0;
            let r = r as u8;
            self.overflow = (al ^ w) & (al ^ r) & 0x80 != 0;
            r
        };
        self.regs.set_al(res);
        self.set_zn8(res);
    }

    pub(crate) fn sbc16(&mut self, w: u16) {
        let a = self.regs.a;
        let res = if self.decimal() {
            let mut n0 = (a & 0x000F) as i32 - (w & 0x000F) as i32 - (1 - self.carry as i32);
            let mut n1 = ((a >> 4) & 0x0F) as i32 - ((w >> 4) & 0x0F) as i32;
            let mut n2 = ((a >> 8) & 0x0F) as i32 - ((w >> 8) & 0x0F) as i32;
            let mut n3 = (a >> 12) as i32 - (w >> 12) as i32;
            if n0 < 0 {
                n0 += 10;
                n1 -= 1;
            }
            if n1 < 0 {
                n1 += 10;
                n2 -= 1;
            }
            if n2 < 0 {
                n2 += 10;
                n3 -= 1;
            }
            let borrow = n3 < 0;
            if borrow {
                n3 += 10;
            }
            self.carry = !borrow;
            let r = ((n3 as u16 & 0x0F) << 12)
                | ((n2 as u16 & 0x0F) << 8)
                | ((n1 as u16 & 0x0F) << 4)
                | (n0 as u16 & 0x0F);
            self.overflow = (a ^ w) & (a ^ r) & 0x8000 != 0;
            r
        } else {
            let r = a as i32 - w as i32 - (1 - self.carry as i32);
            self.carry = r >= 0;
            let r = r as u16;
            self.overflow = (a ^ w) & (a ^ r) & 0x8000 != 0;
            r
        };
        self.regs.a = res;
        self.set_zn16(res);
    }

    pub(crate) fn cmp8(&mut self, w: u8) {
        let r = self.regs.al() as i16 - w as i16;
        self.carry = r >= 0;
        self.set_zn8(r as u8);
    }

    pub(crate) fn cmp16(&mut self, w: u16) {
        let r = self.regs.a as i32 - w as i32;
        self.carry = r >= 0;
        self.set_zn16(r as u16);
    }

    pub(crate) fn cpx8(&mut self, w: u8) {
        let r = self.regs.xl() as i16 - w as i16;
        self.carry = r >= 0;
        self.set_zn8(r as u8);
    }

    pub(crate) fn cpx16(&mut self, w: u16) {
        let r = self.regs.x as i32 - w as i32;
        self.carry = r >= 0;
        self.set_zn16(r as u16);
    }

    pub(crate) fn cpy8(&mut self, w: u8) {
        let r = self.regs.yl() as i16 - w as i16;
        self.carry = r >= 0;
        self.set_zn8(r as u8);
    }

    pub(crate) fn cpy16(&mut self, w: u16) {
        let r = self.regs.y as i32 - w as i32;
        self.carry = r >= 0;
        self.set_zn16(r as u16);
    }

    // --- logic and loads --------------------------------------------------

    pub(crate) fn and8(&mut self, w: u8) {
        let v = self.regs.al() & w;
        self.regs.set_al(v);
        self.set_zn8(v);
    }

    pub(crate) fn and16(&mut self, w: u16) {
        self.regs.a &= w;
        let v = self.regs.a;
        self.set_zn16(v);
    }

    pub(crate) fn ora8(&mut self, w: u8) {
        let v = self.regs.al() | w;
        self.regs.set_al(v);
        self.set_zn8(v);
    }

    pub(crate) fn ora16(&mut self, w: u16) {
        self.regs.a |= w;
        let v = self.regs.a;
        self.set_zn16(v);
    }

    pub(crate) fn eor8(&mut self, w: u8) {
        let v = self.regs.al() ^ w;
        self.regs.set_al(v);
        self.set_zn8(v);
    }

    pub(crate) fn eor16(&mut self, w: u16) {
        self.regs.a ^= w;
        let v = self.regs.a;
        self.set_zn16(v);
    }

    pub(crate) fn bit8(&mut self, w: u8) {
        self.overflow = w & 0x40 != 0;
        self.negative = w;
        self.zero = w & self.regs.al();
    }

    pub(crate) fn bit16(&mut self, w: u16) {
        self.overflow = w & 0x4000 != 0;
        self.negative = (w >> 8) as u8;
        self.zero = (w & self.regs.a != 0) as u8;
    }

    pub(crate) fn lda8(&mut self, w: u8) {
        self.regs.set_al(w);
        self.set_zn8(w);
    }

    pub(crate) fn lda16(&mut self, w: u16) {
        self.regs.a = w;
        self.set_zn16(w);
    }

    pub(crate) fn ldx8(&mut self, w: u8) {
        self.regs.set_xl(w);
        self.set_zn8(w);
    }

    pub(crate) fn ldx16(&mut self, w: u16) {
        self.regs.x = w;
        self.set_zn16(w);
    }

    pub(crate) fn ldy8(&mut self, w: u8) {
        self.regs.set_yl(w);
        self.set_zn8(w);
    }

    pub(crate) fn ldy16(&mut self, w: u16) {
        self.regs.y = w;
        self.set_zn16(w);
    }

    // --- stores -----------------------------------------------------------

    pub(crate) fn sta8_to(&mut self, addr: u32) {
        self.set_byte(self.regs.al(), addr);
    }

    pub(crate) fn sta16_to(&mut self, addr: u32, wrap: Wrap) {
        self.set_word(self.regs.a, addr, wrap, WriteOrder::LowFirst);
    }

    pub(crate) fn stx8_to(&mut self, addr: u32) {
        self.set_byte(self.regs.xl(), addr);
    }

    pub(crate) fn stx16_to(&mut self, addr: u32, wrap: Wrap) {
        self.set_word(self.regs.x, addr, wrap, WriteOrder::LowFirst);
    }

    pub(crate) fn sty8_to(&mut self, addr: u32) {
        self.set_byte(self.regs.yl(), addr);
    }

    pub(crate) fn sty16_to(&mut self, addr: u32, wrap: Wrap) {
        self.set_word(self.regs.y, addr, wrap, WriteOrder::LowFirst);
    }

    pub(crate) fn stz8_to(&mut self, addr: u32) {
        self.set_byte(0, addr);
    }

    pub(crate) fn stz16_to(&mut self, addr: u32, wrap: Wrap) {
        self.set_word(0, addr, wrap, WriteOrder::LowFirst);
    }

    // --- read-modify-write ------------------------------------------------

    pub(crate) fn asl8_at(&mut self, addr: u32) {
        let mut w = self.get_byte(addr);
        self.carry = w & 0x80 != 0;
        w <<= 1;
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn asl16_at(&mut self, addr: u32, wrap: Wrap) {
        let mut w = self.get_word(addr, wrap);
        self.carry = w & 0x8000 != 0;
        w <<= 1;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn lsr8_at(&mut self, addr: u32) {
        let mut w = self.get_byte(addr);
        self.carry = w & 1 != 0;
        w >>= 1;
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn lsr16_at(&mut self, addr: u32, wrap: Wrap) {
        let mut w = self.get_word(addr, wrap);
        self.carry = w & 1 != 0;
        w >>= 1;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn rol8_at(&mut self, addr: u32) {
        let v = self.get_byte(addr);
        let w = (v as u16) << 1 | self.carry as u16;
        self.carry = w > 0xFF;
        let w = w as u8;
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn rol16_at(&mut self, addr: u32, wrap: Wrap) {
        let v = self.get_word(addr, wrap);
        let w = (v as u32) << 1 | self.carry as u32;
        self.carry = w > 0xFFFF;
        let w = w as u16;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn ror8_at(&mut self, addr: u32) {
        let v = self.get_byte(addr) as u16 | (self.carry as u16) << 8;
        self.carry = v & 1 != 0;
        let w = (v >> 1) as u8;
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn ror16_at(&mut self, addr: u32, wrap: Wrap) {
        let v = self.get_word(addr, wrap) as u32 | (self.carry as u32) << 16;
        self.carry = v & 1 != 0;
        let w = (v >> 1) as u16;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn inc8_at(&mut self, addr: u32) {
        self.wait_pc = 0;
        let w = self.get_byte(addr).wrapping_add(1);
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn inc16_at(&mut self, addr: u32, wrap: Wrap) {
        self.wait_pc = 0;
        let w = self.get_word(addr, wrap).wrapping_add(1);
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn dec8_at(&mut self, addr: u32) {
        self.wait_pc = 0;
        let w = self.get_byte(addr).wrapping_sub(1);
        self.one_cycle();
        self.set_byte(w, addr);
        self.set_zn8(w);
    }

    pub(crate) fn dec16_at(&mut self, addr: u32, wrap: Wrap) {
        self.wait_pc = 0;
        let w = self.get_word(addr, wrap).wrapping_sub(1);
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
        self.set_zn16(w);
    }

    pub(crate) fn tsb8_at(&mut self, addr: u32) {
        let w = self.get_byte(addr);
        self.zero = w & self.regs.al();
        let w = w | self.regs.al();
        self.one_cycle();
        self.set_byte(w, addr);
    }

    pub(crate) fn tsb16_at(&mut self, addr: u32, wrap: Wrap) {
        let w = self.get_word(addr, wrap);
        self.zero = (w & self.regs.a != 0) as u8;
        let w = w | self.regs.a;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
    }

    pub(crate) fn trb8_at(&mut self, addr: u32) {
        let w = self.get_byte(addr);
        self.zero = w & self.regs.al();
        let w = w & !self.regs.al();
        self.one_cycle();
        self.set_byte(w, addr);
    }

    pub(crate) fn trb16_at(&mut self, addr: u32, wrap: Wrap) {
        let w = self.get_word(addr, wrap);
        self.zero = (w & self.regs.a != 0) as u8;
        let w = w & !self.regs.a;
        self.one_cycle();
        self.set_word(w, addr, wrap, WriteOrder::HighFirst);
    }

    // --- stack ------------------------------------------------------------

    pub(crate) fn push_b(&mut self, b: u8) {
        self.set_byte(b, self.regs.s as u32);
        self.regs.s = self.regs.s.wrapping_sub(1);
    }

    /// Emulation-mode push: the stack pointer wraps within page 1.
    pub(crate) fn push_b_e(&mut self, b: u8) {
        self.set_byte(b, self.regs.s as u32);
        let sl = self.regs.sl().wrapping_sub(1);
        self.regs.set_sl(sl);
    }

    pub(crate) fn push_w(&mut self, w: u16) {
        let addr = self.regs.s.wrapping_sub(1) as u32;
        self.set_word(w, addr, Wrap::Bank, WriteOrder::HighFirst);
        self.regs.s = self.regs.s.wrapping_sub(2);
    }

    pub(crate) fn push_w_e(&mut self, w: u16) {
        let sl = self.regs.sl().wrapping_sub(1);
        self.regs.set_sl(sl);
        self.set_word(w, self.regs.s as u32, Wrap::Page, WriteOrder::HighFirst);
        let sl = self.regs.sl().wrapping_sub(1);
        self.regs.set_sl(sl);
    }

    pub(crate) fn pull_b(&mut self) -> u8 {
        self.regs.s = self.regs.s.wrapping_add(1);
        self.get_byte(self.regs.s as u32)
    }

    pub(crate) fn pull_b_e(&mut self) -> u8 {
        let sl = self.regs.sl().wrapping_add(1);
        self.regs.set_sl(sl);
        self.get_byte(self.regs.s as u32)
    }

    pub(crate) fn pull_w(&mut self) -> u16 {
        let w = self.get_word(self.regs.s.wrapping_add(1) as u32, Wrap::Bank);
        self.regs.s = self.regs.s.wrapping_add(2);
        w
    }

    pub(crate) fn pull_w_e(&mut self) -> u16 {
        let sl = self.regs.sl().wrapping_add(1);
        self.regs.set_sl(sl);
        let w = self.get_word(self.regs.s as u32, Wrap::Page);
        let sl = self.regs.sl().wrapping_add(1);
        self.regs.set_sl(sl);
        w
    }

    // --- state snapshots --------------------------------------------------

    /// Capture everything needed to resume execution bit-identically.
    pub fn save_state(&mut self) -> CpuState {
        self.pack_status();
        CpuState {
            a: self.regs.a,
            x: self.regs.x,
            y: self.regs.y,
            s: self.regs.s,
            d: self.regs.d,
            db: self.regs.db,
            pb: self.regs.pb,
            pc: self.regs.pc,
            p: self.regs.pl,
            emulation: self.regs.e,
            shifted_pb: self.shifted_pb,
            shifted_db: self.shifted_db,
            open_bus: self.open_bus,
            cycles: self.cycles,
            next_event: self.next_event,
            flags: self.flags.bits(),
            wait_pc: self.wait_pc,
            wait_counter: self.wait_counter,
            waiting_for_interrupt: self.waiting_for_interrupt,
            branch_skip: self.branch_skip,
            table: TableKey::select(self.regs.e, self.mem8(), self.index8()).into(),
        }
    }

    /// Restore a snapshot, validating the mode invariants first.
    pub fn restore_state(&mut self, state: &CpuState) -> Result<(), StateError> {
        let table = TableKey::try_from_primitive(state.table)
            .map_err(|_| StateError::BadTableKey(state.table))?;
        if state.emulation && state.p & (FLAG_M | FLAG_X) != FLAG_M | FLAG_X {
            return Err(StateError::ModeConflict);
        }
        if state.emulation && state.s & 0xFF00 != 0x0100 {
            return Err(StateError::StackPage(state.s));
        }
        if state.shifted_pb != (state.pb as u32) << 16 || state.shifted_db != (state.db as u32) << 16
        {
            return Err(StateError::StaleBankCache);
        }
        self.regs.a = state.a;
        self.regs.x = state.x;
        self.regs.y = state.y;
        self.regs.s = state.s;
        self.regs.d = state.d;
        self.regs.db = state.db;
        self.regs.pb = state.pb;
        self.regs.pc = state.pc;
        self.regs.pl = state.p;
        self.regs.e = state.emulation;
        self.unpack_status();
        self.shifted_pb = state.shifted_pb;
        self.shifted_db = state.shifted_db;
        self.open_bus = state.open_bus;
        self.cycles = state.cycles;
        self.next_event = state.next_event;
        self.flags = EventFlags::from_bits_truncate(state.flags);
        self.wait_pc = state.wait_pc;
        self.wait_counter = state.wait_counter;
        self.waiting_for_interrupt = state.waiting_for_interrupt;
        self.branch_skip = state.branch_skip;
        self.mode_key = table;
        self.update_mode();
        self.mem_speed = self.bus.speed(self.shifted_pb | self.regs.pc as u32);
        Ok(())
    }
}

/// The persisted execution state: register file, packed flags, cycle
/// bookkeeping and the idle-loop detector fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuState {
    pub a: u16,
    pub x: u16,
    pub y: u16,
    pub s: u16,
    pub d: u16,
    pub db: u8,
    pub pb: u8,
    pub pc: u16,
    pub p: u8,
    pub emulation: bool,
    pub shifted_pb: u32,
    pub shifted_db: u32,
    pub open_bus: u8,
    pub cycles: u64,
    pub next_event: u64,
    pub flags: u32,
    pub wait_pc: u32,
    pub wait_counter: u32,
    pub waiting_for_interrupt: bool,
    pub branch_skip: bool,
    pub table: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("unknown dispatch table key {0:#04x}")]
    BadTableKey(u8),
    #[error("emulation mode requires 8-bit M and X")]
    ModeConflict,
    #[error("emulation-mode stack pointer {0:#06x} outside page 1")]
    StackPage(u16),
    #[error("cached shifted bank registers disagree with PB/DB")]
    StaleBankCache,
}

impl<B: Bus> std::fmt::Display for Cpu<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut flagstring = String::new();
        flagstring.push(if self.negative & 0x80 != 0 { 'N' } else { 'n' });
        flagstring.push(if self.overflow { 'V' } else { 'v' });
        flagstring.push(if self.mem8() { 'M' } else { 'm' });
        flagstring.push(if self.index8() { 'X' } else { 'x' });
        flagstring.push(if self.decimal() { 'D' } else { 'd' });
        flagstring.push(if self.irq_disabled() { 'I' } else { 'i' });
        flagstring.push(if self.zero == 0 { 'Z' } else { 'z' });
        flagstring.push(if self.carry { 'C' } else { 'c' });
        flagstring.push(if self.regs.e { 'E' } else { 'e' });
        write!(f, "{}\nP:   {}\nCYC: {}", self.regs, flagstring, self.cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::cpu_with_program;

    #[test]
    fn status_pack_unpack_roundtrip() {
        let mut cpu = cpu_with_program(&[]);
        cpu.carry = true;
        cpu.zero = 0;
        cpu.overflow = true;
        cpu.negative = 0x80;
        cpu.pack_status();
        let packed = cpu.regs.pl;
        assert_eq!(packed & FLAG_C, FLAG_C);
        assert_eq!(packed & FLAG_Z, FLAG_Z);
        assert_eq!(packed & FLAG_V, FLAG_V);
        assert_eq!(packed & FLAG_N, FLAG_N);
        cpu.carry = false;
        cpu.zero = 1;
        cpu.overflow = false;
        cpu.negative = 0;
        cpu.unpack_status();
        assert!(cpu.carry && cpu.zero == 0 && cpu.overflow && cpu.negative & 0x80 != 0);
    }

    #[test]
    fn zero_flag_image_is_width_aware() {
        let mut cpu = cpu_with_program(&[]);
        cpu.set_zn16(0x0100);
        assert_ne!(cpu.zero, 0, "0x0100 is not zero at 16 bits");
        assert_eq!(cpu.negative & 0x80, 0);
        cpu.set_zn16(0x8000);
        assert_ne!(cpu.negative & 0x80, 0);
        cpu.set_zn8(0x00);
        assert_eq!(cpu.zero, 0);
    }

    #[test]
    fn binary_adc_carry_and_overflow() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.set_al(0xFF);
        cpu.adc8(0x01);
        assert_eq!(cpu.regs.al(), 0x00);
        assert!(cpu.carry);
        assert!(!cpu.overflow);
        assert_eq!(cpu.zero, 0);

        cpu.carry = false;
        cpu.regs.set_al(0x7F);
        cpu.adc8(0x01);
        assert_eq!(cpu.regs.al(), 0x80);
        assert!(cpu.overflow, "0x7F + 1 overflows signed 8-bit");
        assert!(!cpu.carry);
    }

    #[test]
    fn decimal_adc_follows_hardware() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.pl |= FLAG_D;
        cpu.regs.set_al(0x99);
        cpu.carry = false;
        cpu.adc8(0x01);
        assert_eq!(cpu.regs.al(), 0x00);
        assert!(cpu.carry);
        assert_eq!(cpu.zero, 0);

        // Non-BCD input: the nibble adjusts still run, giving the
        // hardware's well-defined result.
        cpu.carry = false;
        cpu.regs.set_al(0xFF);
        cpu.adc8(0x01);
        assert_eq!(cpu.regs.al(), 0x66);
        assert!(cpu.carry);
    }

    #[test]
    fn decimal_sbc() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.pl |= FLAG_D;
        cpu.regs.set_al(0x50);
        cpu.carry = true;
        cpu.sbc8(0x21);
        assert_eq!(cpu.regs.al(), 0x29);
        assert!(cpu.carry);

        cpu.regs.set_al(0x00);
        cpu.carry = true;
        cpu.sbc8(0x01);
        assert_eq!(cpu.regs.al(), 0x99);
        assert!(!cpu.carry, "borrow out");
    }

    #[test]
    fn decimal_adc16() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.pl |= FLAG_D;
        cpu.regs.a = 0x1234;
        cpu.carry = false;
        cpu.adc16(0x0766);
        assert_eq!(cpu.regs.a, 0x2000);
        assert!(!cpu.carry);

        cpu.regs.a = 0x9999;
        cpu.carry = false;
        cpu.adc16(0x0001);
        assert_eq!(cpu.regs.a, 0x0000);
        assert!(cpu.carry);
    }

    #[test]
    fn compare_sets_carry_on_greater_or_equal() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.set_al(0x40);
        cpu.cmp8(0x40);
        assert!(cpu.carry);
        assert_eq!(cpu.zero, 0);
        cpu.cmp8(0x41);
        assert!(!cpu.carry);
        assert_ne!(cpu.negative & 0x80, 0);
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut cpu = cpu_with_program(&[]);
        cpu.regs.a = 0xBEEF;
        cpu.regs.x = 0x0012;
        cpu.regs.d = 0x0100;
        cpu.cycles = 1234;
        cpu.open_bus = 0x42;
        cpu.carry = true;
        let state = cpu.save_state();

        let mut other = cpu_with_program(&[]);
        other.restore_state(&state).unwrap();
        assert_eq!(other.save_state(), state);
        assert!(other.carry);
    }

    #[test]
    fn snapshot_rejects_mode_conflicts() {
        let mut cpu = cpu_with_program(&[]);
        let mut state = cpu.save_state();
        state.p &= !FLAG_M;
        assert_eq!(
            cpu.restore_state(&state),
            Err(StateError::ModeConflict),
            "emulation mode with a 16-bit accumulator is not a reachable state"
        );

        let mut state = cpu.save_state();
        state.table = 0xEE;
        assert_eq!(cpu.restore_state(&state), Err(StateError::BadTableKey(0xEE)));

        let mut state = cpu.save_state();
        state.shifted_db = 0x7F0000;
        assert_eq!(cpu.restore_state(&state), Err(StateError::StaleBankCache));
    }
}
