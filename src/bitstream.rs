#![allow(
    clippy::if_not_else,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]

//! This file exposes a single struct that can decode a huffman encoded
//! bitstream in a baseline JPEG scan.
//!
//! This code is optimized for speed.
//! It's (annoyingly) serial hence we can't use parallel bitstreams(it's
//! variable length coding.)
//!
//! Furthermore, on the case of refills, we have to do bytewise processing
//! because the standard decided that we want to support markers in the
//! middle of streams(restart markers).
//!
//! So we pull in the usual optimization steps:
//! - `#[inline(always)]` on the hot path
//! - fast 4-byte refills when we know the next 4 bytes hold no 0xFF
//! - no unsafe here
//!
//! Readability comes as a second priority, but not a distant one.

use std::io::Cursor;

use crate::errors::DecodeErrors;
use crate::huffman::{HuffmanTable, HUFF_LOOKAHEAD};
use crate::marker::Marker;
use crate::misc::UN_ZIGZAG;

macro_rules! decode_huff {
    ($stream:tt,$symbol:tt,$table:tt) => {
        let mut code_length = $symbol >> HUFF_LOOKAHEAD;

        ($symbol) &= (1 << HUFF_LOOKAHEAD) - 1;

        if code_length > i32::from(HUFF_LOOKAHEAD)
        {
            // if the symbol cannot be resolved in the first HUFF_LOOKAHEAD bits,
            // we know it lies somewhere between HUFF_LOOKAHEAD and 16 bits since jpeg
            // imposes a 16 bit limit, so we peek 16 bits ahead and resolve starting
            // from 1+HUFF_LOOKAHEAD bits.
            $symbol = ($stream).peek_bits::<16>() as i32;

            // maxcode is pre-shifted so there are (16-code_length) zeroes at the end,
            // so we don't need to shift in the inner loop.
            while code_length < 17
            {
                if $symbol < $table.maxcode[code_length as usize]
                {
                    break;
                }
                code_length += 1;
            }

            if code_length == 17
            {
                // symbol could not be decoded. Everything after this is probably
                // corrupt, so bail instead of faking zeroes.
                return Err(DecodeErrors::HuffmanOutOfRange(format!(
                    "Bad Huffman Code 0x{:X}, corrupt JPEG",
                    $symbol
                )));
            }

            $symbol >>= 16 - code_length;
            ($symbol) = i32::from(
                ($table).values[(($symbol + ($table).offset[code_length as usize]) & 0xFF) as usize]
            );
        }
        // drop bits read
        ($stream).drop_bits(code_length as u8);
    };
}

/// A `BitStream` struct, a bit by bit reader with super powers.
pub(crate) struct BitStream
{
    /// A MSB type buffer used for refills.
    pub buffer: u64,
    /// A top-aligned MSB buffer used to accelerate `peek_bits`/`get_bits`.
    /// By top aligned, I mean the top bit (63) represents the top bit in
    /// the buffer.
    aligned_buffer: u64,
    /// Bits left the buffer currently holds.
    pub(crate) bits_left: u8,
    /// Did we find a marker (RSTm/EOI) while refilling?
    pub marker: Option<Marker>
}

impl BitStream
{
    /// Create a new, empty bitstream.
    pub(crate) const fn new() -> BitStream
    {
        BitStream {
            buffer: 0,
            aligned_buffer: 0,
            bits_left: 0,
            marker: None
        }
    }

    /// Refill the bit buffer by (a maximum of) 32 bits.
    ///
    /// This function will only refill if `self.bits_left` is less than 32.
    #[inline(never)]
    fn refill(&mut self, reader: &mut Cursor<Vec<u8>>) -> Result<bool, DecodeErrors>
    {
        macro_rules! refill {
            ($buffer:expr,$byte:expr,$bits_left:expr) => {
                $byte = read_u8(reader);

                // JPEG is MSB-first, so append to the low end and push
                // existing bits up.
                $buffer = ($buffer << 8) | $byte;

                $bits_left += 8;

                if $byte == 0xff
                {
                    let mut next_byte = read_u8(reader);

                    if next_byte != 0x00
                    {
                        // Fill bytes (0xFF repeated) are swallowed here too.
                        while next_byte == 0xFF
                        {
                            next_byte = read_u8(reader);
                        }

                        if next_byte != 0x00
                        {
                            // Undo the byte append and report the marker.
                            self.buffer >>= 8;

                            $bits_left -= 8;
                            if $bits_left != 0
                            {
                                self.aligned_buffer = $buffer << (64 - $bits_left);
                            }
                            self.marker =
                                Some(Marker::from_u8(next_byte as u8).ok_or_else(|| {
                                    DecodeErrors::Format(format!(
                                        "Unknown marker 0xFF{:X} inside entropy-coded data",
                                        next_byte
                                    ))
                                })?);
                            return Ok(false);
                        }
                    }
                }
            };
        }

        // 32 bits is enough for a decode (16 bits) plus receive_extend (max 16 bits).
        if self.bits_left <= 32 && self.marker.is_none()
        {
            if ((reader.position() + 4) as usize) < (reader.get_ref().len())
            {
                let pos = reader.position() as usize;
                let mut buf = [0; 4];
                buf.copy_from_slice(reader.get_ref().get(pos..pos + 4).unwrap());
                let msb_buf = u32::from_be_bytes(buf);

                if !has_byte(msb_buf, 255)
                {
                    reader.set_position((pos + 4) as u64);
                    self.bits_left += 32;
                    self.buffer <<= 32;
                    self.buffer |= u64::from(msb_buf);
                    self.aligned_buffer = self.buffer << (64 - self.bits_left);
                    return Ok(true);
                }
            }

            let mut byte;

            refill!(self.buffer, byte, self.bits_left);
            refill!(self.buffer, byte, self.bits_left);
            refill!(self.buffer, byte, self.bits_left);
            refill!(self.buffer, byte, self.bits_left);

            self.aligned_buffer = self.buffer << (64 - self.bits_left);
        }
        else if self.marker.is_some()
        {
            self.bits_left = 63;
        }

        Ok(true)
    }

    /// Decode the DC coefficient in an MCU block, updating `dc_prediction`
    /// in place.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[inline(always)]
    fn decode_dc(
        &mut self, reader: &mut Cursor<Vec<u8>>, dc_table: &HuffmanTable, dc_prediction: &mut i32
    ) -> Result<(), DecodeErrors>
    {
        let (mut symbol, r);

        if self.bits_left < 16
        {
            self.refill(reader)?;
        }
        symbol = self.peek_bits::<HUFF_LOOKAHEAD>();

        symbol = dc_table.lookup[symbol as usize];

        decode_huff!(self, symbol, dc_table);

        if symbol != 0
        {
            r = self.get_bits(symbol as u8);

            symbol = huff_extend(r, symbol);
        }
        *dc_prediction = dc_prediction.wrapping_add(symbol);

        Ok(())
    }

    /// Decode one 8x8 block's worth of DC + AC coefficients into `block`,
    /// still in zig-zag order... actually de-zig-zagged on the fly via
    /// [`UN_ZIGZAG`], ready for dequantization.
    #[allow(clippy::many_single_char_names, clippy::cast_possible_truncation)]
    #[inline(always)]
    pub fn decode_mcu_block(
        &mut self, reader: &mut Cursor<Vec<u8>>, dc_table: &HuffmanTable, ac_table: &HuffmanTable,
        block: &mut [i16; 64], dc_prediction: &mut i32
    ) -> Result<(), DecodeErrors>
    {
        self.decode_dc(reader, dc_table, dc_prediction)?;

        block[0] = *dc_prediction as i16;

        let (mut symbol, mut r);
        let mut pos: usize = 1;

        while pos < 64
        {
            self.refill(reader)?;

            symbol = self.peek_bits::<HUFF_LOOKAHEAD>();
            symbol = ac_table.lookup[symbol as usize];

            decode_huff!(self, symbol, ac_table);

            r = symbol >> 4;
            symbol &= 15;

            if symbol != 0
            {
                pos += r as usize;

                r = self.get_bits(symbol as u8);

                symbol = huff_extend(r, symbol);

                if pos >= 64
                {
                    return Err(DecodeErrors::EntropyOverflow(format!(
                        "zig-zag position {} overflows an 8x8 block, corrupt JPEG",
                        pos
                    )));
                }
                block[UN_ZIGZAG[pos] & 63] = symbol as i16;

                pos += 1;
            }
            else
            {
                if r != 15
                {
                    // EOB: everything else in this block is zero.
                    return Ok(());
                }
                // ZRL: run of 16 zero coefficients.
                pos += 16;
            }
        }
        Ok(())
    }

    /// Peek `LOOKAHEAD` bits ahead without discarding them from the buffer.
    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    const fn peek_bits<const LOOKAHEAD: u8>(&self) -> i32
    {
        (self.aligned_buffer >> (64 - LOOKAHEAD)) as i32
    }

    /// Discard the next `n` bits without checking.
    #[inline]
    fn drop_bits(&mut self, n: u8)
    {
        self.bits_left = self.bits_left.saturating_sub(n);
        self.aligned_buffer <<= n;
    }

    /// Read `n_bits` from the buffer and discard them.
    #[inline(always)]
    #[allow(clippy::cast_possible_truncation)]
    fn get_bits(&mut self, n_bits: u8) -> i32
    {
        let mask = (1_u64 << n_bits) - 1;
        self.aligned_buffer = self.aligned_buffer.rotate_left(u32::from(n_bits));
        let bits = (self.aligned_buffer & mask) as i32;

        self.bits_left = self.bits_left.saturating_sub(n_bits);

        bits
    }

    /// Consume a pending marker and resynchronise: on an expected restart
    /// marker this means the caller resets DC predictors and calls
    /// [`BitStream::reset`] to clear any bits leftover before the marker.
    pub fn take_marker(&mut self) -> Option<Marker>
    {
        self.marker.take()
    }

    /// Force one refill pass. Entropy decoding only refills as it consumes
    /// bits, so the marker that ends a restart segment or the scan itself
    /// isn't always discovered by the time the last coefficient is decoded -
    /// the caller drains with this after an MCU or the whole scan to make
    /// sure it's sitting in `self.marker` before dispatch resumes.
    pub fn drain_to_marker(&mut self, reader: &mut Cursor<Vec<u8>>) -> Result<(), DecodeErrors>
    {
        while self.marker.is_none() && self.bits_left <= 32
        {
            if !self.refill(reader)?
            {
                break;
            }
        }
        Ok(())
    }

    /// Reset the stream on a restart marker: drop any leftover bits and
    /// clear the pending-marker flag so decoding can resume right after it.
    #[cold]
    pub fn reset(&mut self)
    {
        self.bits_left = 0;
        self.marker = None;
        self.buffer = 0;
        self.aligned_buffer = 0;
    }
}

/// Do the equivalent of JPEG's `HUFF_EXTEND`: sign-extend a `s`-bit
/// magnitude `x` into the symmetric range the DCT coefficient actually
/// occupies.
#[inline(always)]
fn huff_extend(x: i32, s: i32) -> i32
{
    // if x < 2^(s-1) return x + offset[s] else return x, where
    // offset[s] = (-1<<s)+1
    (x) + ((((x) - (1 << ((s) - 1))) >> 31) & (((-1) << (s)) + 1))
}

/// Read a byte from the underlying buffer, or zero once we've run past the
/// end (a truncated stream decodes as if padded with zero bits).
#[inline(always)]
#[allow(clippy::cast_possible_truncation)]
fn read_u8(reader: &mut Cursor<Vec<u8>>) -> u64
{
    let pos = reader.position();

    reader.set_position(pos + 1);
    u64::from(*reader.get_ref().get(pos as usize).unwrap_or(&0))
}

fn has_zero(v: u32) -> bool
{
    // Stanford bithacks: https://graphics.stanford.edu/~seander/bithacks.html#ZeroInWord
    !((((v & 0x7F7F_7F7F) + 0x7F7F_7F7F) | v) | 0x7F7F_7F7F) != 0
}

fn has_byte(b: u32, val: u8) -> bool
{
    has_zero(b ^ ((!0_u32 / 255) * u32::from(val)))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn huff_extend_matches_jpeg_annex_f()
    {
        // s=1: codes {0,1} map to {-1,1}
        assert_eq!(huff_extend(0, 1), -1);
        assert_eq!(huff_extend(1, 1), 1);
        // s=3: range is -7..=-4, 4..=7
        assert_eq!(huff_extend(0, 3), -7);
        assert_eq!(huff_extend(7, 3), 7);
    }

    #[test]
    fn has_byte_detects_ff_in_any_lane()
    {
        assert!(has_byte(0x00FF_0000, 0xFF));
        assert!(!has_byte(0x0011_2233, 0xFF));
    }
}
