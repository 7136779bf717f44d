// RSA Big Integer Operations
// Wrapper around num-bigint for RSA-specific operations

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Convert big integer to bytes (big-endian)
pub fn to_bytes(n: &RsaBigInt) -> Vec<u8> {
    n.to_bytes_be()
}

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply algorithm
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if inverse doesn't exist
///
/// Runs the extended Euclidean algorithm over signed integers; the
/// Bezout coefficient for `a` can go negative before the final reduction.
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> Option<RsaBigInt> {
    let mut r = BigInt::from_biguint(Sign::Plus, m.clone());
    let mut new_r = BigInt::from_biguint(Sign::Plus, a % m);
    let mut t = BigInt::zero();
    let mut new_t = BigInt::one();

    while !new_r.is_zero() {
        let quotient = &r / &new_r;
        let tmp_t = &t - &quotient * &new_t;
        t = std::mem::replace(&mut new_t, tmp_t);
        let tmp_r = &r - &quotient * &new_r;
        r = std::mem::replace(&mut new_r, tmp_r);
    }

    if !r.is_one() {
        // gcd(a, m) != 1
        return None;
    }

    if t.sign() == Sign::Minus {
        t += BigInt::from_biguint(Sign::Plus, m.clone());
    }
    t.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}

// Small primes used to cheaply reject composites before Miller-Rabin
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

/// Miller-Rabin primality test
/// Returns true if n is probably prime after `iterations` witness rounds;
/// the error probability is at most 4^-iterations
pub fn is_probable_prime(n: &RsaBigInt, iterations: u32) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }
    for &sp in &SMALL_PRIMES {
        let sp = RsaBigInt::from(sp);
        if n == &sp {
            return true;
        }
        if (n % &sp).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let mut d = n.clone() - 1u8;
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Witness loop
    let mut rng = thread_rng();
    let two = RsaBigInt::from(2u8);
    let n_minus_one = n - 1u8;
    let n_minus_two = n - RsaBigInt::from(2u8);

    for _ in 0..iterations {
        // Pick random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_two);

        let mut x = mod_pow(&a, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut witnessed = true;
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                witnessed = false;
                break;
            }
        }

        if witnessed {
            // Composite
            return false;
        }
    }

    // Probably prime
    true
}

/// Generate a random prime of exactly `bit_length` bits
///
/// The top two bits are forced so that the product of two such primes
/// keeps the full modulus width. Candidates are screened by the small
/// prime table, then pass `iterations` Miller-Rabin rounds.
pub fn random_prime(bit_length: u32, iterations: u32) -> RsaBigInt {
    assert!(bit_length >= 16, "prime bit length too small");

    let mut rng = thread_rng();
    let high_bits = (RsaBigInt::one() << (bit_length - 1)) | (RsaBigInt::one() << (bit_length - 2));
    let upper = RsaBigInt::one() << bit_length;

    loop {
        let mut candidate = rng.gen_biguint_range(&high_bits, &upper);
        if candidate.is_even() {
            candidate += 1u8;
        }

        if is_probable_prime(&candidate, iterations) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow() {
        // 3^5 mod 7 = 243 mod 7 = 5
        let base = from_u64(3);
        let exp = from_u64(5);
        let modulus = from_u64(7);
        let result = mod_pow(&base, &exp, &modulus);
        assert_eq!(result, from_u64(5));
    }

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let a = from_u64(3);
        let m = from_u64(7);
        let inv = mod_inverse(&a, &m).unwrap();
        assert_eq!(inv, from_u64(5));

        // Verify: 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!((a * inv) % m, from_u64(1));
    }

    #[test]
    fn test_mod_inverse_none_when_not_coprime() {
        assert!(mod_inverse(&from_u64(6), &from_u64(9)).is_none());
    }

    #[test]
    fn test_mod_inverse_large() {
        let e = from_u64(65537);
        let m = from_u64(2305843009213693950); // 2^61 - 2, coprime with 65537
        let inv = mod_inverse(&e, &m).unwrap();
        assert_eq!((e * inv) % m, from_u64(1));
    }

    #[test]
    fn test_is_probable_prime() {
        assert!(is_probable_prime(&from_u64(2), 5));
        assert!(is_probable_prime(&from_u64(3), 5));
        assert!(is_probable_prime(&from_u64(7), 5));
        assert!(!is_probable_prime(&from_u64(4), 5));
        assert!(!is_probable_prime(&from_u64(9), 5));
        // Mersenne prime 2^61 - 1
        assert!(is_probable_prime(&from_u64(2305843009213693951), 10));
        // Carmichael number 561 = 3 * 11 * 17
        assert!(!is_probable_prime(&from_u64(561), 10));
    }

    #[test]
    fn test_random_prime_bit_length() {
        let p = random_prime(64, 10);
        assert_eq!(p.bits(), 64);
        assert!(p.is_odd());
        assert!(is_probable_prime(&p, 10));
    }
}
