//! 24-bit carry-less binary range coder.
//!
//! The coder keeps a 24-bit `(low, range)` interval and renormalizes one
//! byte at a time whenever `range` drops to 16 bits. Probabilities enter as
//! 12-bit chances and are scaled into the current range width. Reading past
//! the end of the input is not an error: missing bytes decode as `0xFF`
//! padding, which is what the encoder-side flush relies on.

use std::io::{ErrorKind, Read, Write};

use crate::utils::error::Result;

pub const MAX_RANGE_BITS: u32 = 24;
pub const MIN_RANGE_BITS: u32 = 16;
const MIN_RANGE: u32 = 1 << MIN_RANGE_BITS;
const BASE_RANGE: u32 = 1 << MAX_RANGE_BITS;

/// Scales a 12-bit chance into the current range width.
#[inline]
fn chance_to_range(b12: u16, range: u32) -> u32 {
    debug_assert!(b12 > 0 && b12 < 4096);
    ((range as u64 * b12 as u64 + 0x800) >> 12) as u32
}

/// Decoding side of the range coder.
pub trait RacRead {
    /// Decodes one bit that was coded with the given 12-bit chance.
    fn read_12bit_chance(&mut self, b12: u16) -> Result<bool>;
    /// Decodes one bit coded at chance 1/2.
    fn read_bit(&mut self) -> Result<bool>;
}

/// Encoding side of the range coder.
pub trait RacWrite {
    /// Codes one bit at the given 12-bit chance.
    fn write_12bit_chance(&mut self, b12: u16, bit: bool) -> Result<()>;
    /// Codes one bit at chance 1/2.
    fn write_bit(&mut self, bit: bool) -> Result<()>;
}

/// Range decoder over a byte stream.
pub struct RacInput<R: Read> {
    io: R,
    range: u32,
    low: u32,
}

impl<R: Read> RacInput<R> {
    /// Creates a decoder and preloads the code register.
    pub fn new(io: R) -> Result<Self> {
        let mut rac = Self {
            io,
            range: BASE_RANGE,
            low: 0,
        };
        let mut r = BASE_RANGE;
        while r > 1 {
            rac.low = (rac.low << 8) | rac.read_catch_eof()?;
            r >>= 8;
        }
        Ok(rac)
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.io
    }

    fn read_catch_eof(&mut self) -> Result<u32> {
        let mut buf = [0u8; 1];
        loop {
            match self.io.read(&mut buf) {
                Ok(0) => return Ok(0xFF), // past-end bytes decode as padding
                Ok(_) => return Ok(buf[0] as u32),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(0xFF),
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn input(&mut self) -> Result<()> {
        while self.range <= MIN_RANGE {
            self.low <<= 8;
            self.range <<= 8;
            self.low |= self.read_catch_eof()?;
        }
        Ok(())
    }

    fn get(&mut self, chance: u32) -> Result<bool> {
        debug_assert!(chance > 0);
        debug_assert!(chance < self.range);
        if self.low >= self.range - chance {
            self.low -= self.range - chance;
            self.range = chance;
            self.input()?;
            Ok(true)
        } else {
            self.range -= chance;
            self.input()?;
            Ok(false)
        }
    }
}

impl<R: Read> RacRead for RacInput<R> {
    #[inline]
    fn read_12bit_chance(&mut self, b12: u16) -> Result<bool> {
        let chance = chance_to_range(b12, self.range);
        self.get(chance)
    }

    #[inline]
    fn read_bit(&mut self) -> Result<bool> {
        let chance = self.range >> 1;
        self.get(chance)
    }
}

/// Range encoder over a byte stream.
///
/// Carries cannot be resolved as soon as a byte leaves the register, so one
/// byte is held back together with a run count of `0xFF` bytes: a later
/// carry increments the held byte and turns the run into `0x00`s.
pub struct RacOutput<W: Write> {
    io: W,
    range: u32,
    low: u32,
    delayed_byte: i32,
    delayed_count: u32,
}

impl<W: Write> RacOutput<W> {
    pub fn new(io: W) -> Self {
        Self {
            io,
            range: BASE_RANGE,
            low: 0,
            delayed_byte: -1,
            delayed_count: 0,
        }
    }

    fn output(&mut self) -> Result<()> {
        while self.range <= MIN_RANGE {
            let byte = (self.low >> MIN_RANGE_BITS) as i32;
            if self.delayed_byte < 0 {
                // first byte of the stream
                self.delayed_byte = byte;
            } else if (self.low + self.range) >> 8 < MIN_RANGE {
                // no carry can reach the delayed byte anymore
                self.io.write_all(&[self.delayed_byte as u8])?;
                for _ in 0..self.delayed_count {
                    self.io.write_all(&[0xFF])?;
                }
                self.delayed_count = 0;
                self.delayed_byte = byte;
            } else if self.low >> 8 >= MIN_RANGE {
                // a carry has happened
                self.io.write_all(&[(self.delayed_byte + 1) as u8])?;
                for _ in 0..self.delayed_count {
                    self.io.write_all(&[0x00])?;
                }
                self.delayed_count = 0;
                self.delayed_byte = byte & 0xFF;
            } else {
                // still ambiguous, extend the pending run
                self.delayed_count += 1;
            }
            self.low = (self.low & (MIN_RANGE - 1)) << 8;
            self.range <<= 8;
        }
        Ok(())
    }

    fn put(&mut self, chance: u32, bit: bool) -> Result<()> {
        debug_assert!(chance > 0);
        debug_assert!(chance < self.range);
        if bit {
            self.low += self.range - chance;
            self.range = chance;
        } else {
            self.range -= chance;
        }
        self.output()
    }

    /// Flushes the final interval so that any continuation of the emitted
    /// bytes decodes inside it. The encoder must not be used afterwards;
    /// prefer [`RacOutput::finish`].
    pub fn flush(&mut self) -> Result<()> {
        self.low += MIN_RANGE - 1;
        self.low &= !(MIN_RANGE - 1);
        for _ in 0..MAX_RANGE_BITS / 8 {
            self.range = MIN_RANGE;
            self.output()?;
        }
        if self.delayed_byte >= 0 {
            self.io.write_all(&[self.delayed_byte as u8])?;
            for _ in 0..self.delayed_count {
                self.io.write_all(&[0xFF])?;
            }
            self.delayed_byte = -1;
            self.delayed_count = 0;
        }
        self.io.flush()?;
        Ok(())
    }

    /// Flushes all internal state and returns the underlying writer.
    /// This method MUST be called to ensure all data reaches the stream.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.io)
    }
}

impl<W: Write> RacWrite for RacOutput<W> {
    #[inline]
    fn write_12bit_chance(&mut self, b12: u16, bit: bool) -> Result<()> {
        let chance = chance_to_range(b12, self.range);
        self.put(chance, bit)
    }

    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        let chance = self.range >> 1;
        self.put(chance, bit)
    }
}
