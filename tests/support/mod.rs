//! Hand-built JPEG byte streams for the integration tests in this
//! directory. Nothing here reads a fixture file - every stream is a small,
//! deliberately minimal segment sequence assembled byte by byte, so a test
//! failure points at an exact, reconstructable cause instead of "some
//! camera-generated JPEG changed".

#![allow(dead_code)]

pub fn soi() -> Vec<u8>
{
    vec![0xFF, 0xD8]
}

pub fn eoi() -> Vec<u8>
{
    vec![0xFF, 0xD9]
}

fn segment(code: u8, payload: &[u8]) -> Vec<u8>
{
    let mut out = vec![0xFF, code];
    let length = (payload.len() + 2) as u16;
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// A DQT segment defining one table with every entry set to `value`.
pub fn dqt_uniform(id: u8, value: u8) -> Vec<u8>
{
    let mut payload = vec![id];
    payload.extend(std::iter::repeat(value).take(64));
    segment(0xDB, &payload)
}

/// `components`: `(id, h_samp, v_samp, quant_table_id)`.
pub fn sof0(width: u16, height: u16, components: &[(u8, u8, u8, u8)]) -> Vec<u8>
{
    let mut payload = vec![8u8];
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&width.to_be_bytes());
    payload.push(components.len() as u8);
    for &(id, h, v, qt) in components
    {
        payload.push(id);
        payload.push((h << 4) | v);
        payload.push(qt);
    }
    segment(0xC0, &payload)
}

/// A progressive (SOF2) frame header, to exercise profile rejection - the
/// field values themselves don't matter since the marker byte alone is
/// enough for the dispatcher to bail.
pub fn sof2_stub() -> Vec<u8>
{
    segment(0xC2, &[8, 0, 8, 0, 8, 1, 1, 0x11, 0])
}

/// A DHT segment defining a single table with one codeword of length
/// `code_length` mapped to `symbol`.
pub fn dht_single(class: u8, id: u8, code_length: u8, symbol: u8) -> Vec<u8>
{
    let mut payload = vec![(class << 4) | id];
    let mut counts = [0u8; 16];
    counts[usize::from(code_length) - 1] = 1;
    payload.extend_from_slice(&counts);
    payload.push(symbol);
    segment(0xC4, &payload)
}

/// `components`: `(selector, dc_table, ac_table)`. Always baseline
/// (`Ss=0 Se=63 Ah/Al=0`), since that's the only scan shape this crate
/// understands.
pub fn sos(components: &[(u8, u8, u8)]) -> Vec<u8>
{
    let mut payload = vec![components.len() as u8];
    for &(selector, dc, ac) in components
    {
        payload.push(selector);
        payload.push((dc << 4) | ac);
    }
    payload.push(0);
    payload.push(63);
    payload.push(0);
    segment(0xDA, &payload)
}

pub fn dri(interval: u16) -> Vec<u8>
{
    segment(0xDD, &interval.to_be_bytes())
}

pub fn rst(index: u8) -> Vec<u8>
{
    vec![0xFF, 0xD0 + index]
}

pub fn app1_xmp(text: &str) -> Vec<u8>
{
    let mut payload = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    payload.extend_from_slice(text.as_bytes());
    segment(0xE1, &payload)
}

/// A bit-by-bit writer matching JPEG's entropy-coded data layout: MSB
/// first, padded with 1 bits to the next byte boundary, and 0xFF bytes
/// stuffed with a trailing 0x00 the way an encoder emits them.
pub struct BitWriter
{
    bits: Vec<bool>
}

impl BitWriter
{
    pub fn new() -> BitWriter
    {
        BitWriter { bits: Vec::new() }
    }

    pub fn push_bits(&mut self, value: u32, n: u8) -> &mut BitWriter
    {
        for i in (0..n).rev()
        {
            self.bits.push((value >> i) & 1 == 1);
        }
        self
    }

    pub fn finish(mut self) -> Vec<u8>
    {
        while self.bits.len() % 8 != 0
        {
            self.bits.push(true);
        }

        let mut bytes = Vec::with_capacity(self.bits.len() / 8);
        for chunk in self.bits.chunks(8)
        {
            let mut byte = 0u8;
            for &bit in chunk
            {
                byte = (byte << 1) | u8::from(bit);
            }
            bytes.push(byte);
        }

        let mut stuffed = Vec::with_capacity(bytes.len());
        for byte in bytes
        {
            stuffed.push(byte);
            if byte == 0xFF
            {
                stuffed.push(0x00);
            }
        }
        stuffed
    }
}

/// A single DC-only 8x8 block: one Huffman-coded DC diff of `dc_value`
/// (category 8, i.e. any value in -255..=255... here always used with
/// `dc_value` in 0..=255 so the raw bits are just its 8-bit form) followed
/// by an immediate end-of-block. Pairs with [`dc8_tables`].
pub fn dc_only_block(dc_value: u8) -> Vec<u8>
{
    let mut writer = BitWriter::new();
    writer.push_bits(0, 1); // DC huffman code (the only code, length 1)
    writer.push_bits(u32::from(dc_value), 8); // category-8 magnitude bits
    writer.push_bits(0, 1); // AC huffman code: EOB (the only code, length 1)
    writer.finish()
}

/// DHT segments matching [`dc_only_block`]: DC table 0 has one length-1
/// code mapped to category 8, AC table 0 has one length-1 code mapped to
/// EOB (run/size byte 0x00).
pub fn dc8_tables() -> Vec<u8>
{
    let mut out = dht_single(0, 0, 1, 8);
    out.extend(dht_single(1, 0, 1, 0));
    out
}
