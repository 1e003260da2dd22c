//! Numeric codecs for register payloads.
//!
//! The coprocessor reports results as little-endian IEEE-754 floats and
//! little-endian two's-complement words, but expects float *parameters*
//! byte-reversed (big-endian). All conversions go through integer bit
//! patterns so the byte order is visible at the call site.

/// Little-endian IEEE-754 single (quaternion registers).
#[inline]
pub fn f32_from_le(b: &[u8; 4]) -> f32 {
  let bits = (b[0] as u32) | (b[1] as u32) << 8 | (b[2] as u32) << 16 | (b[3] as u32) << 24;
  f32::from_bits(bits)
}

/// Big-endian IEEE-754 single, the layout float parameters are loaded in.
#[inline]
pub fn f32_to_be(v: f32) -> [u8; 4] {
  let bits = v.to_bits();
  [(bits >> 24) as u8, (bits >> 16) as u8, (bits >> 8) as u8, bits as u8]
}

/// Inverse of [`f32_to_be`].
#[inline]
pub fn f32_from_be(b: &[u8; 4]) -> f32 {
  let bits = (b[0] as u32) << 24 | (b[1] as u32) << 16 | (b[2] as u32) << 8 | (b[3] as u32);
  f32::from_bits(bits)
}

/// Signed 16-bit sample from its two register bytes.
#[inline]
pub fn i16_from_le(lsb: u8, msb: u8) -> i16 {
  ((msb as u16) << 8 | lsb as u16) as i16
}

/// Four little-endian floats from a 16-byte block.
pub fn f32x4_from_le(b: &[u8; 16]) -> [f32; 4] {
  let mut out = [0f32; 4];
  for (v, chunk) in out.iter_mut().zip(b.chunks_exact(4)) {
    *v = f32_from_le(&[chunk[0], chunk[1], chunk[2], chunk[3]]);
  }
  out
}

/// Three little-endian i16 words from a 6-byte block.
pub fn i16x3_from_le(b: &[u8; 6]) -> [i16; 3] {
  [i16_from_le(b[0], b[1]), i16_from_le(b[2], b[3]), i16_from_le(b[4], b[5])]
}
