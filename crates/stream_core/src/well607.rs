//! WELL607a: Well Equidistributed Long-period Linear generator, 607 bits of
//! state, period `2^607 - 1`.
//!
//! The 19 state words live in a 32-word ring so the cursor can move with a
//! mask instead of a modulo. The cursor walks downwards: after each step the
//! old `v0` becomes `v1`, and the freshly written word becomes the new `v0`
//! and the output.

use crate::recurrence::Recurrence;
use crate::seed::{JumpTable, SeedVector};

/// Number of 32-bit words in a WELL607 seed.
pub const WORDS: usize = 19;

const BUFFER_SIZE: usize = 32;
const MASK_STATE: usize = BUFFER_SIZE - 1;

const M1: usize = 16;
const M2: usize = 15;
const M3: usize = 14;
const R1: usize = WORDS - 1;
const R2: usize = WORDS - 2;

// One bit of the last word is outside the 607-bit state.
const MASKU: u32 = u32::MAX >> 31;
const MASKL: u32 = !MASKU;

/// `P(z)`; bit 31 of the last word is the `z^607` term.
pub const CHARACTERISTIC: [u32; WORDS] = [
    0x987b2631, 0x2e33283d, 0x6a398474, 0xe9d24da1, 0x31235359, 0x6a2baf48, 0x7f97efd4,
    0x468280f4, 0x7d9d9424, 0xa3238f8e, 0xe3edb4ef, 0x0e0a25f7, 0x92c4dff5, 0x55d0b8da,
    0x7b982dec, 0xa06c078f, 0x38b65c31, 0xc8c3788d, 0x8000b200,
];

/// `z^(2^250) mod P(z)`.
pub const SUBSTREAM_JUMP: JumpTable<WORDS> = JumpTable::new([
    0x83167621, 0x6b5515c8, 0x61a62bd2, 0xbceaa78f, 0xac04b304, 0x28a75ea4, 0xa9104058,
    0x595ea53b, 0x35687e95, 0x7f8eca9b, 0x30beffb8, 0xc61e6111, 0x284ee30e, 0x4e9cd901,
    0x659633ba, 0x344cc69e, 0xd6052ac1, 0x5d508b69, 0x062cf130,
]);

/// `z^(2^400) mod P(z)`.
pub const STREAM_JUMP: JumpTable<WORDS> = JumpTable::new([
    0x70b2bdee, 0x595828f1, 0x85a17885, 0x5100c7b2, 0xd3333da2, 0xb42857de, 0xf8a7a4a7,
    0xabad2a33, 0x0a2580cf, 0xf94c465e, 0x7df951d5, 0x35467053, 0x0b3c9a4e, 0x06a33977,
    0x0443910e, 0xc25aec3d, 0xeb72e8c5, 0x08873b01, 0x7da57636,
]);

pub const SUBSTREAM_EXPONENT: u32 = 250;
pub const STREAM_EXPONENT: u32 = 400;

pub const DEFAULT_PACKAGE_SEED: SeedVector<WORDS> = SeedVector::new([
    0xD6AFB71C, 0x82ADB18E, 0x326E714E, 0xB1EE42B6, 0xF1A834ED, 0x04AE5721, 0xC5EA2843,
    0xFA04116B, 0x6ACE14EF, 0xCD5781A0, 0x6B1F731C, 0x7E3B8E3D, 0x8B34DE2A, 0x74EC15F5,
    0x84EBC216, 0x83EA2C61, 0xE4A83B1E, 0xA5D82CB9, 0x9E1A6C89,
]);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Well607 {
    buffer: [u32; BUFFER_SIZE],
    cursor: usize,
}

impl Well607 {
    #[inline]
    fn word(&self, offset: usize) -> u32 {
        self.buffer[(self.cursor + offset) & MASK_STATE]
    }
}

impl Recurrence<WORDS> for Well607 {
    const NAME: &'static str = "WELL607";
    const CHARACTERISTIC: [u32; WORDS] = CHARACTERISTIC;
    const DEFAULT_PACKAGE_SEED: SeedVector<WORDS> = DEFAULT_PACKAGE_SEED;
    const SUBSTREAM_JUMP: JumpTable<WORDS> = SUBSTREAM_JUMP;
    const STREAM_JUMP: JumpTable<WORDS> = STREAM_JUMP;

    fn from_seed(seed: &SeedVector<WORDS>) -> Self {
        let mut generator = Self {
            buffer: [0; BUFFER_SIZE],
            cursor: 0,
        };
        generator.load(seed);
        generator
    }

    fn load(&mut self, seed: &SeedVector<WORDS>) {
        self.cursor = 0;
        self.buffer = [0; BUFFER_SIZE];
        self.buffer[..WORDS].copy_from_slice(seed.words());
    }

    fn step_raw(&mut self) -> u32 {
        let v0 = self.word(0);
        let vm1 = self.word(M1);
        let vm2 = self.word(M2);
        let vm3 = self.word(M3);

        let z0 = (self.word(R1) & MASKL) | (self.word(R2) & MASKU);
        let z1 = (v0 ^ (v0 >> 19)) ^ (vm1 ^ (vm1 >> 11));
        let z2 = (vm2 ^ (vm2 << 14)) ^ vm3;
        let new_v1 = z1 ^ z2;
        let new_v0 = (z0 ^ (z0 >> 18)) ^ z1 ^ (new_v1 ^ (new_v1 << 5));

        self.buffer[self.cursor] = new_v1;
        self.cursor = (self.cursor + MASK_STATE) & MASK_STATE;
        self.buffer[self.cursor] = new_v0;
        new_v0
    }

    fn state(&self) -> SeedVector<WORDS> {
        let mut words = [0u32; WORDS];
        for (offset, word) in words.iter_mut().enumerate() {
            *word = self.word(offset);
        }
        SeedVector::new(words)
    }
}
