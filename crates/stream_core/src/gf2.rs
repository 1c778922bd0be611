//! Polynomial arithmetic over GF(2).
//!
//! Polynomials are little-endian word arrays: bit `k` of word `j` is the
//! coefficient of `z^(32j + k)`. Residues modulo a characteristic polynomial
//! of degree `d < 32R` always fit in `R` words.

fn bit(poly: &[u32], index: usize) -> bool {
    (poly[index / 32] >> (index % 32)) & 1 == 1
}

fn set_bit(poly: &mut [u32], index: usize) {
    poly[index / 32] |= 1 << (index % 32);
}

/// Index of the highest non-zero coefficient.
pub fn degree(poly: &[u32]) -> Option<usize> {
    poly.iter()
        .rposition(|&word| word != 0)
        .map(|index| index * 32 + 31 - poly[index].leading_zeros() as usize)
}

/// `target ^= source * z^shift`. Bits shifted past the end of `target` must be zero.
fn xor_shifted(target: &mut [u32], source: &[u32], shift: usize) {
    let word_shift = shift / 32;
    let bit_shift = shift % 32;
    for (index, &word) in source.iter().enumerate() {
        if word == 0 {
            continue;
        }
        target[index + word_shift] ^= word << bit_shift;
        if bit_shift != 0 {
            let carry = word >> (32 - bit_shift);
            if carry != 0 {
                target[index + word_shift + 1] ^= carry;
            }
        }
    }
}

fn modulus_degree(modulus: &[u32]) -> usize {
    match degree(modulus) {
        Some(degree) => degree,
        None => panic!("the zero polynomial cannot be used as a modulus"),
    }
}

/// Reduce an arbitrary-length polynomial modulo `modulus`.
fn reduce<const R: usize>(mut poly: Vec<u32>, modulus: &[u32; R]) -> [u32; R] {
    let modulus_degree = modulus_degree(modulus);
    while let Some(top) = degree(&poly) {
        if top < modulus_degree {
            break;
        }
        xor_shifted(&mut poly, modulus, top - modulus_degree);
    }
    let mut residue = [0u32; R];
    for (slot, word) in residue.iter_mut().zip(poly) {
        *slot = word;
    }
    residue
}

/// Carry-less product of `a` and `b`, reduced modulo `modulus`.
pub fn mul_mod<const R: usize>(a: &[u32; R], b: &[u32; R], modulus: &[u32; R]) -> [u32; R] {
    let mut product = vec![0u32; 2 * R + 1];
    for index in 0..R * 32 {
        if bit(a, index) {
            xor_shifted(&mut product, b, index);
        }
    }
    reduce(product, modulus)
}

/// `a^2 mod modulus`. Squaring over GF(2) only spreads the coefficients.
pub fn square_mod<const R: usize>(a: &[u32; R], modulus: &[u32; R]) -> [u32; R] {
    let mut square = vec![0u32; 2 * R + 1];
    for index in 0..R * 32 {
        if bit(a, index) {
            set_bit(&mut square, 2 * index);
        }
    }
    reduce(square, modulus)
}

fn monomial<const R: usize>(power: usize, modulus: &[u32; R]) -> [u32; R] {
    let mut poly = vec![0u32; power / 32 + 1];
    set_bit(&mut poly, power);
    reduce(poly, modulus)
}

/// `z^(2^k) mod modulus`, the jump table for a distance of `2^k` steps.
pub fn power_of_two_residue<const R: usize>(modulus: &[u32; R], k: u32) -> [u32; R] {
    let mut residue = monomial(1, modulus);
    for _ in 0..k {
        residue = square_mod(&residue, modulus);
    }
    residue
}

/// `z^exponent mod modulus` by square-and-multiply.
pub fn power_residue<const R: usize>(modulus: &[u32; R], exponent: u64) -> [u32; R] {
    let mut result = monomial(0, modulus);
    let mut base = monomial(1, modulus);
    let mut remaining = exponent;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = mul_mod(&result, &base, modulus);
        }
        base = square_mod(&base, modulus);
        remaining >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // z^3 + z + 1, primitive: z has multiplicative order 7.
    const CUBIC: [u32; 1] = [0b1011];

    #[test]
    fn degree_of_words() {
        assert_eq!(degree(&[0u32, 0]), None);
        assert_eq!(degree(&[1u32, 0]), Some(0));
        assert_eq!(degree(&[0u32, 0x8000_0000]), Some(63));
    }

    #[test]
    fn cubic_reduction() {
        assert_eq!(power_residue(&CUBIC, 3), [0b011]);
        assert_eq!(power_residue(&CUBIC, 7), [0b001]);
        assert_eq!(power_residue(&CUBIC, 8), [0b010]);
        assert_eq!(power_of_two_residue(&CUBIC, 3), [0b010]);
    }

    #[test]
    fn squaring_matches_multiplication() {
        let a = [0b110u32];
        assert_eq!(square_mod(&a, &CUBIC), mul_mod(&a, &a, &CUBIC));
    }

    #[test]
    fn shifted_xor_carries_across_words() {
        let mut target = [0u32; 3];
        xor_shifted(&mut target, &[0x8000_0001, 0], 4);
        assert_eq!(target, [0x10, 0x8, 0]);
    }

    proptest! {
        #[test]
        fn exponents_add_under_multiplication(a in 0u64..5_000, b in 0u64..5_000) {
            let modulus = [0x987b_2631u32, 0x8000_b200];
            let lhs = mul_mod(
                &power_residue(&modulus, a),
                &power_residue(&modulus, b),
                &modulus,
            );
            prop_assert_eq!(lhs, power_residue(&modulus, a + b));
        }

        #[test]
        fn multiplication_commutes(
            a in proptest::array::uniform2(any::<u32>()),
            b in proptest::array::uniform2(any::<u32>()),
        ) {
            let modulus = [0x987b_2631u32, 0x8000_b200];
            prop_assert_eq!(mul_mod(&a, &b, &modulus), mul_mod(&b, &a, &modulus));
        }
    }
}
