//! Near-zero symbol coding: integers coded as zero/sign/exponent/mantissa
//! bits, each against its own adaptive chance.
//!
//! The ranged codec never spends bits on outcomes the `[min, max]` interval
//! rules out: the zero bit only appears when 0 is inside the interval, the
//! sign bit only when both signs are possible, and mantissa bits that are
//! forced by the magnitude bounds are skipped entirely. Both sides derive
//! the same bounds, so the elisions stay in lockstep.

use crate::coder::chance::{BitChance, ChanceTable};
use crate::coder::rac::{RacRead, RacWrite};
use crate::utils::error::{CodecError, Result};

/// Default update-table configuration for [`SimpleSymbolCoder`].
pub const SIMPLE_SYMBOL_CUT: u32 = 2;
pub const SIMPLE_SYMBOL_ALPHA: u32 = 0xFFFF_FFFF / 19;

/// Role of a single coded bit within a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitKind {
    Zero,
    Sign,
    Exp,
    Mant,
}

// Initial 12-bit chances, indexed by exponent level / mantissa position.
const ZERO_CHANCE: u16 = 1000;
const SIGN_CHANCE: u16 = 2048;
const EXP_CHANCES: [u16; 19] = [
    3200, 2800, 2600, 2400, 2000, 1500, 800, 300, 300, 300, 300, 300, 300, 300, 300, 300, 300,
    300, 300,
];
const MANT_CHANCES: [u16; 18] = [
    1800, 1800, 1800, 1700, 1600, 1200, 1000, 800, 800, 800, 800, 800, 800, 800, 800, 800, 800,
    800,
];

#[inline]
fn ilog2(x: u32) -> u32 {
    if x == 0 {
        0
    } else {
        31 - x.leading_zeros()
    }
}

/// Bundle of bit chances for one symbol alphabet, keyed by `(BitKind, index)`.
///
/// Exponent slots are keyed `(e << 1) | sign` so positive and negative
/// magnitudes adapt independently; mantissa slots are keyed by bit position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolChance {
    bits: u32,
    chances: Vec<BitChance>,
}

impl SymbolChance {
    pub fn new(bits: u32) -> Self {
        debug_assert!(bits >= 2 && bits as usize <= MANT_CHANCES.len());
        let mut chances = Vec::with_capacity(2 + 2 * (bits as usize - 1) + bits as usize);
        chances.push(BitChance::with_12bit(ZERO_CHANCE));
        chances.push(BitChance::with_12bit(SIGN_CHANCE));
        for e in 0..bits as usize - 1 {
            // one slot per sign
            chances.push(BitChance::with_12bit(EXP_CHANCES[e]));
            chances.push(BitChance::with_12bit(EXP_CHANCES[e]));
        }
        for i in 0..bits as usize {
            chances.push(BitChance::with_12bit(MANT_CHANCES[i]));
        }
        Self { bits, chances }
    }

    #[inline]
    fn index(&self, kind: BitKind, i: usize) -> usize {
        match kind {
            BitKind::Zero => 0,
            BitKind::Sign => 1,
            BitKind::Exp => 2 + i,
            BitKind::Mant => 2 + 2 * (self.bits as usize - 1) + i,
        }
    }

    #[inline]
    pub fn bit(&self, kind: BitKind, i: usize) -> &BitChance {
        &self.chances[self.index(kind, i)]
    }

    #[inline]
    pub fn bit_mut(&mut self, kind: BitKind, i: usize) -> &mut BitChance {
        let idx = self.index(kind, i);
        &mut self.chances[idx]
    }
}

/// A sink/source of symbol bits; implemented by the bit coders that tie a
/// chance bundle to a RAC.
pub trait BitRead {
    fn read(&mut self, kind: BitKind, i: usize) -> Result<bool>;
}

pub trait BitWrite {
    fn write(&mut self, bit: bool, kind: BitKind, i: usize) -> Result<()>;
}

/// Decodes an integer in `[min, max]` from `bc`.
///
/// The caller guarantees `min <= max`; when they are equal no bits are
/// consumed.
pub fn read_int<B: BitRead>(bc: &mut B, mut min: i32, mut max: i32) -> Result<i32> {
    debug_assert!(min <= max);
    if min == max {
        return Ok(min);
    }

    let sign;
    if max >= 0 && min <= 0 {
        if bc.read(BitKind::Zero, 0)? {
            return Ok(0);
        }
        if min < 0 {
            if max > 0 {
                sign = bc.read(BitKind::Sign, 0)?;
            } else {
                sign = false;
            }
        } else {
            sign = true;
        }
    } else {
        sign = min > 0;
    }
    if sign && min <= 0 {
        min = 1;
    }
    if !sign && max >= 0 {
        max = -1;
    }

    let amin = (if sign { min } else { -max }) as u32;
    let amax = (if sign { max } else { -min }) as u32;

    let emax = ilog2(amax);
    let mut e = ilog2(amin);
    while e < emax {
        // at least one more exponent is possible, so code whether this is it
        if bc.read(BitKind::Exp, ((e << 1) | sign as u32) as usize)? {
            break;
        }
        e += 1;
    }

    let mut have = 1u32 << e;
    let mut left = have - 1;
    let mut pos = e;
    while pos > 0 {
        pos -= 1;
        left >>= 1;
        let minabs1 = have | (1 << pos);
        let maxabs0 = have | left;
        if minabs1 > amax {
            // the bit must be zero
        } else if maxabs0 >= amin {
            if bc.read(BitKind::Mant, pos as usize)? {
                have = minabs1;
            }
        } else {
            // the bit must be one
            have = minabs1;
        }
    }
    Ok(if sign { have as i32 } else { -(have as i32) })
}

/// Encodes `value` into `[min, max]`; exact mirror of [`read_int`].
pub fn write_int<B: BitWrite>(bc: &mut B, mut min: i32, mut max: i32, value: i32) -> Result<()> {
    debug_assert!(min <= max);
    debug_assert!(value >= min && value <= max);
    if min == max {
        return Ok(());
    }

    if min <= 0 && max >= 0 {
        if value == 0 {
            return bc.write(true, BitKind::Zero, 0);
        }
        bc.write(false, BitKind::Zero, 0)?;
    }
    let sign = value > 0;
    if min < 0 && max > 0 {
        bc.write(sign, BitKind::Sign, 0)?;
    }
    if sign && min <= 0 {
        min = 1;
    }
    if !sign && max >= 0 {
        max = -1;
    }

    let a = value.unsigned_abs();
    let e = ilog2(a);
    let amin = (if sign { min } else { -max }) as u32;
    let amax = (if sign { max } else { -min }) as u32;

    let emax = ilog2(amax);
    let mut i = ilog2(amin);
    while i < emax {
        bc.write(i == e, BitKind::Exp, ((i << 1) | sign as u32) as usize)?;
        if i == e {
            break;
        }
        i += 1;
    }

    let mut have = 1u32 << e;
    let mut left = have - 1;
    let mut pos = e;
    while pos > 0 {
        pos -= 1;
        left >>= 1;
        let minabs1 = have | (1 << pos);
        let maxabs0 = have | left;
        let mut bit = true;
        if minabs1 > amax {
            bit = false;
        } else if maxabs0 >= amin {
            bit = (a >> pos) & 1 == 1;
            bc.write(bit, BitKind::Mant, pos as usize)?;
        }
        if bit {
            have = minabs1;
        }
    }
    Ok(())
}

/// Decodes a fixed-width unsigned integer of `nbits` bits, LSB first.
pub fn read_uint<B: BitRead>(bc: &mut B, nbits: u32) -> Result<i32> {
    let mut value = 0i32;
    for pos in 0..nbits {
        if bc.read(BitKind::Mant, pos as usize)? {
            value |= 1 << pos;
        }
    }
    Ok(value)
}

/// Encodes a fixed-width unsigned integer of `nbits` bits, LSB first.
pub fn write_uint<B: BitWrite>(bc: &mut B, nbits: u32, value: i32) -> Result<()> {
    debug_assert!(value >= 0 && (value as u32) >> nbits == 0);
    for pos in 0..nbits {
        bc.write((value >> pos) & 1 == 1, BitKind::Mant, pos as usize)?;
    }
    Ok(())
}

struct SimpleSymbolBitCoder<'a, RAC> {
    table: &'a ChanceTable,
    ctx: &'a mut SymbolChance,
    rac: &'a mut RAC,
}

impl<RAC: RacRead> BitRead for SimpleSymbolBitCoder<'_, RAC> {
    fn read(&mut self, kind: BitKind, i: usize) -> Result<bool> {
        let chance = self.ctx.bit(kind, i).get_12bit();
        let bit = self.rac.read_12bit_chance(chance)?;
        self.ctx.bit_mut(kind, i).put(bit, self.table);
        Ok(bit)
    }
}

impl<RAC: RacWrite> BitWrite for SimpleSymbolBitCoder<'_, RAC> {
    fn write(&mut self, bit: bool, kind: BitKind, i: usize) -> Result<()> {
        let chance = self.ctx.bit(kind, i).get_12bit();
        self.rac.write_12bit_chance(chance, bit)?;
        self.ctx.bit_mut(kind, i).put(bit, self.table);
        Ok(())
    }
}

/// Integer coder with a single context: one chance bundle adapting across
/// every symbol it codes.
pub struct SimpleSymbolCoder {
    ctx: SymbolChance,
    table: ChanceTable,
}

impl SimpleSymbolCoder {
    pub fn new(bits: u32) -> Self {
        Self::with_table(bits, SIMPLE_SYMBOL_CUT, SIMPLE_SYMBOL_ALPHA)
    }

    pub fn with_table(bits: u32, cut: u32, alpha: u32) -> Self {
        Self {
            ctx: SymbolChance::new(bits),
            table: ChanceTable::new(cut, alpha),
        }
    }

    pub fn read_int<R: RacRead>(&mut self, rac: &mut R, min: i32, max: i32) -> Result<i32> {
        let mut bc = SimpleSymbolBitCoder {
            table: &self.table,
            ctx: &mut self.ctx,
            rac,
        };
        read_int(&mut bc, min, max)
    }

    pub fn read_uint<R: RacRead>(&mut self, rac: &mut R, nbits: u32) -> Result<i32> {
        let mut bc = SimpleSymbolBitCoder {
            table: &self.table,
            ctx: &mut self.ctx,
            rac,
        };
        read_uint(&mut bc, nbits)
    }

    pub fn write_int<W: RacWrite>(
        &mut self,
        rac: &mut W,
        min: i32,
        max: i32,
        value: i32,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(CodecError::ValueOutOfRange { value, min, max });
        }
        let mut bc = SimpleSymbolBitCoder {
            table: &self.table,
            ctx: &mut self.ctx,
            rac,
        };
        write_int(&mut bc, min, max, value)
    }

    pub fn write_uint<W: RacWrite>(&mut self, rac: &mut W, nbits: u32, value: i32) -> Result<()> {
        if value < 0 || (value as u32) >> nbits != 0 {
            return Err(CodecError::ValueOutOfRange {
                value,
                min: 0,
                max: ((1u32 << nbits) - 1) as i32,
            });
        }
        let mut bc = SimpleSymbolBitCoder {
            table: &self.table,
            ctx: &mut self.ctx,
            rac,
        };
        write_uint(&mut bc, nbits, value)
    }
}

/// Adaptation-free integer coding by binary search over `[min, max]`, each
/// step spending one bit at chance 1/2. Used for header fields.
pub struct UniformSymbolCoder;

impl UniformSymbolCoder {
    pub fn read_int<R: RacRead>(rac: &mut R, mut min: i32, mut max: i32) -> Result<i32> {
        while max > min {
            let med = min + (max - min) / 2;
            if rac.read_bit()? {
                min = med + 1;
            } else {
                max = med;
            }
        }
        Ok(min)
    }

    pub fn write_int<W: RacWrite>(
        rac: &mut W,
        mut min: i32,
        mut max: i32,
        value: i32,
    ) -> Result<()> {
        if value < min || value > max {
            return Err(CodecError::ValueOutOfRange { value, min, max });
        }
        while max > min {
            let med = min + (max - min) / 2;
            if value > med {
                rac.write_bit(true)?;
                min = med + 1;
            } else {
                rac.write_bit(false)?;
                max = med;
            }
        }
        Ok(())
    }
}
