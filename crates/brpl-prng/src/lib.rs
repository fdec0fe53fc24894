//! Small, non-cryptographic PRNGs for constrained nodes.
//!
//! Two members of the [PractRand](http://pracrand.sourceforge.net/) "sfc"
//! family are ported here: [`Sfc16`] (16-bit state words, used on 8/16-bit
//! MCUs) and [`Sfc32`] (32-bit state words, used where a 32-bit ALU is
//! available). Both satisfy [`Prng`] and [`rand_core::RngCore`], so they
//! plug into anything built against the `rand` ecosystem.
//!
//! Neither generator is suitable for cryptographic use; nothing here claims
//! otherwise. For key material, see `brpl-ecc`.

use rand_core::RngCore;

/// Common interface of a seedable 16-bit pseudo-random source, mirroring
/// the `struct random_prng` vtable (`seed`/`rand` function pointers) this
/// corpus is built around.
pub trait Prng {
    /// Re-seeds the generator, discarding all prior state.
    fn reseed(&mut self, seed: u64);
    /// Draws the next 16-bit pseudo-random value in `0..=65535`.
    fn next_u16(&mut self) -> u16;
}

/// Upper bound of [`Prng::next_u16`], matching `RANDOM_RAND_MAX`.
pub const RAND_MAX: u16 = u16::MAX;

/// Folds up to 8 bytes of a link-layer address (or any other
/// low-entropy identifier) into a 64-bit seed, the same way the reference
/// stack seeds its PRNG from a node's MAC address when no hardware CSPRNG
/// is present. Fewer than 8 input bytes are zero-extended; more are
/// truncated.
pub fn seed_from_bytes(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_le_bytes(buf)
}

/// sfc16: three 16-bit state words plus a 16-bit counter, barrel-shifted
/// every round. Default PRNG on nodes without a 32-bit-efficient ALU.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sfc16 {
    a: u16,
    b: u16,
    c: u16,
    counter: u16,
}

const SFC16_BARREL_SHIFT: u32 = 6;
const SFC16_RSHIFT: u32 = 5;
const SFC16_LSHIFT: u32 = 3;
const SFC16_WARMUP: u32 = 10;

impl Sfc16 {
    /// Builds and seeds a generator in one step.
    pub fn new(seed: u64) -> Self {
        let mut prng = Self::default();
        prng.reseed(seed);
        prng
    }
}

impl Prng for Sfc16 {
    fn reseed(&mut self, seed: u64) {
        self.a = seed as u16;
        self.b = (seed >> 16) as u16;
        self.c = (seed >> 32) as u16;
        self.counter = (seed >> 48) as u16;
        for _ in 0..SFC16_WARMUP {
            self.next_u16();
        }
    }

    fn next_u16(&mut self) -> u16 {
        let tmp = self.a.wrapping_add(self.b).wrapping_add(self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.a = self.b ^ (self.b >> SFC16_RSHIFT);
        self.b = self.c.wrapping_add(self.c << SFC16_LSHIFT);
        self.c = self.c.rotate_left(SFC16_BARREL_SHIFT).wrapping_add(tmp);
        tmp
    }
}

impl RngCore for Sfc16 {
    fn next_u32(&mut self) -> u32 {
        let lo = self.next_u16() as u32;
        let hi = self.next_u16() as u32;
        (hi << 16) | lo
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_from_u16(self, dst);
    }
}

/// sfc32: 32-bit state words. Caches the high half-word of each internal
/// round so every other call to [`Prng::next_u16`] is free of fresh state
/// advancement, matching the reference implementation's `static cached`
/// flag exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sfc32 {
    a: u32,
    b: u32,
    c: u32,
    counter: u32,
    tmp: u32,
    cached: bool,
}

const SFC32_BARREL_SHIFT: u32 = 21;
const SFC32_RSHIFT: u32 = 9;
const SFC32_LSHIFT: u32 = 3;
const SFC32_WARMUP: u32 = 24;

impl Sfc32 {
    pub fn new(seed: u64) -> Self {
        let mut prng = Self::default();
        prng.reseed(seed);
        prng
    }
}

impl Prng for Sfc32 {
    fn reseed(&mut self, seed: u64) {
        self.cached = false;
        self.a = 0;
        self.b = seed as u32;
        self.c = (seed >> 32) as u32;
        self.counter = 1;
        self.tmp = 0;
        for _ in 0..SFC32_WARMUP {
            self.next_u16();
        }
    }

    fn next_u16(&mut self) -> u16 {
        if self.cached {
            self.cached = false;
            return (self.tmp >> 16) as u16;
        }
        self.tmp = self.a.wrapping_add(self.b).wrapping_add(self.counter);
        self.counter = self.counter.wrapping_add(1);
        self.a = self.b ^ (self.b >> SFC32_RSHIFT);
        self.b = self.c.wrapping_add(self.c << SFC32_LSHIFT);
        self.c = self.c.rotate_left(SFC32_BARREL_SHIFT).wrapping_add(self.tmp);
        self.cached = true;
        (self.tmp & 0xFFFF) as u16
    }
}

impl RngCore for Sfc32 {
    fn next_u32(&mut self) -> u32 {
        let lo = self.next_u16() as u32;
        let hi = self.next_u16() as u32;
        (hi << 16) | lo
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_u32() as u64;
        let hi = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        fill_bytes_from_u16(self, dst);
    }
}

fn fill_bytes_from_u16(prng: &mut impl Prng, dst: &mut [u8]) {
    let mut chunks = dst.chunks_exact_mut(2);
    for chunk in &mut chunks {
        chunk.copy_from_slice(&prng.next_u16().to_le_bytes());
    }
    let rem = chunks.into_remainder();
    if !rem.is_empty() {
        rem.copy_from_slice(&prng.next_u16().to_le_bytes()[..rem.len()]);
    }
}
