//! Component B: turn a DHT segment's `(counts[1..16], symbols)` pair into a
//! table that decodes one symbol in O(code length).
//!
//! This follows the canonical construction of JPEG Annex C together with
//! the length-indexed flat-table decode loop of Annex F (`maxcode`/
//! `offset`), plus a small lookahead table (same trick as stb_image and the
//! teacher this crate grew out of) so that the overwhelming majority of
//! codes - anything that fits in [`HUFF_LOOKAHEAD`] bits - resolve with a
//! single array load instead of a length-by-length scan.

#![allow(clippy::similar_names, clippy::module_name_repetitions)]

use crate::errors::DecodeErrors;

/// Bits of lookahead the fast path resolves directly.
pub const HUFF_LOOKAHEAD: u8 = 9;

/// A canonical JPEG Huffman table, built once per DHT table and consulted
/// for the rest of the scan.
pub struct HuffmanTable
{
    /// `maxcode[l]`: largest code of length `l`, or -1 if no code has that
    /// length. Index 0 unused; index 17 is a sentinel that always
    /// terminates the slow-path scan.
    pub(crate) maxcode: [i32; 18],
    /// `offset[l]`: added to a left-justified code of length `l` to get its
    /// index into `values`.
    pub(crate) offset: [i32; 18],
    /// Fast lookup table: for bit patterns that resolve within
    /// `HUFF_LOOKAHEAD` bits, `lookup[bits] = (code_length << LOOKAHEAD) |
    /// symbol`. Entries for codes longer than the lookahead are marked with
    /// a code length one past the lookahead, so the caller always checks
    /// `code_length > HUFF_LOOKAHEAD` before trusting `lookup` alone.
    pub(crate) lookup: [i32; 1 << HUFF_LOOKAHEAD],
    /// Number of codes of each length, directly from the DHT segment.
    /// Index 0 unused.
    pub(crate) bits: [u8; 17],
    /// Symbols in order of increasing code length, directly from the DHT
    /// segment.
    pub(crate) values: Vec<u8>
}

impl HuffmanTable
{
    /// Build a table from a DHT group's `bits`/`values` arrays.
    ///
    /// `is_dc` additionally validates that every symbol is a legal DC
    /// bit-length (0..=15); AC symbols are unconstrained run/size bytes.
    pub fn new(bits: &[u8; 17], values: Vec<u8>, is_dc: bool) -> Result<HuffmanTable, DecodeErrors>
    {
        let mut table = HuffmanTable {
            maxcode: [0; 18],
            offset: [0; 18],
            lookup: [0; 1 << HUFF_LOOKAHEAD],
            bits: *bits,
            values
        };
        table.build(is_dc)?;
        Ok(table)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn build(&mut self, is_dc: bool) -> Result<(), DecodeErrors>
    {
        // Figure C.1: table of code lengths, one entry per symbol in
        // `values` order.
        let mut size = [0u8; 257];
        let mut p = 0usize;
        for l in 1..=16
        {
            let mut i = self.bits[l];
            while i != 0
            {
                size[p] = l as u8;
                p += 1;
                i -= 1;
            }
        }
        let num_symbols = p;
        size[p] = 0;

        if num_symbols != self.values.len()
        {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "bits table claims {} symbols but {} values were supplied",
                num_symbols,
                self.values.len()
            )));
        }

        // Figure C.2: generate the canonical codes themselves, validating
        // that the counts describe a legal prefix code on the way.
        let mut huff_code = [0u32; 257];
        let mut code = 0u32;
        let mut si = size[0];
        p = 0;
        while size[p] != 0
        {
            while size[p] == si
            {
                huff_code[p] = code;
                code += 1;
                p += 1;
            }
            if code >= (1 << si)
            {
                return Err(DecodeErrors::HuffmanDecode(
                    "over-subscribed Huffman table: too many codes for the declared lengths"
                        .to_string()
                ));
            }
            code <<= 1;
            si += 1;
        }

        // Figure F.15: build the length-indexed maxcode/offset tables used
        // by the slow path for codes longer than the lookahead.
        p = 0;
        for l in 1..=16usize
        {
            if self.bits[l] == 0
            {
                self.maxcode[l] = -1;
            }
            else
            {
                self.offset[l] = i32::try_from(p).unwrap() - (huff_code[p] as i32);
                p += usize::from(self.bits[l]);
                self.maxcode[l] = huff_code[p - 1] as i32;
            }
        }
        self.offset[17] = 0;
        self.maxcode[17] = 0x000F_FFFF;

        // Fast lookahead table: mark everything "too long" first, then fill
        // in every bit pattern that starts with a short enough code.
        for entry in self.lookup.iter_mut()
        {
            *entry = (i32::from(HUFF_LOOKAHEAD) + 1) << HUFF_LOOKAHEAD;
        }
        p = 0;
        for l in 1..=HUFF_LOOKAHEAD
        {
            for _ in 0..self.bits[usize::from(l)]
            {
                let mut look_bits = (huff_code[p] as usize) << (HUFF_LOOKAHEAD - l);
                for _ in 0..(1usize << (HUFF_LOOKAHEAD - l))
                {
                    self.lookup[look_bits] = (i32::from(l) << HUFF_LOOKAHEAD)
                        | i32::from(self.values[p]);
                    look_bits += 1;
                }
                p += 1;
            }
        }

        if is_dc
        {
            for &sym in &self.values
            {
                if sym > 15
                {
                    return Err(DecodeErrors::HuffmanDecode(format!(
                        "DC symbol {} out of range, expected 0..=15",
                        sym
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    /// A single-symbol table: one code of length 1.
    #[test]
    fn trivial_table_builds()
    {
        let mut bits = [0u8; 17];
        bits[1] = 1;
        let table = HuffmanTable::new(&bits, vec![5], true).unwrap();
        assert_eq!(table.maxcode[1], 0);
        assert_eq!(table.values[0], 5);
    }

    #[test]
    fn mismatched_symbol_count_is_rejected()
    {
        let mut bits = [0u8; 17];
        bits[1] = 2;
        assert!(HuffmanTable::new(&bits, vec![5], true).is_err());
    }

    #[test]
    fn oversubscribed_table_is_rejected()
    {
        // Three codes of length 1 cannot exist (only 0 and 1 are available).
        let mut bits = [0u8; 17];
        bits[1] = 3;
        assert!(HuffmanTable::new(&bits, vec![1, 2, 3], false).is_err());
    }

    #[test]
    fn dc_symbol_out_of_range_is_rejected()
    {
        let mut bits = [0u8; 17];
        bits[1] = 1;
        assert!(HuffmanTable::new(&bits, vec![16], true).is_err());
    }
}
