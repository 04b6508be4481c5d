#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Premultiplied source-over of one pixel.
#[inline]
pub(crate) fn src_over_premul(dst: &mut [u8], src: &[u8]) {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        dst[..4].copy_from_slice(&src[..4]);
        return;
    }
    let inv = 255 - sa;
    for c in 0..4 {
        let v = u16::from(src[c]) + mul_div255_u16(u16::from(dst[c]), inv);
        dst[c] = v.min(255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
