// ---------------------------------------------------------------------------
// Primitives mathématiques partagées : pgcd, inverse modulaire, ppcm,
// appartenance à Z*_m, génération de premiers.
// ---------------------------------------------------------------------------

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::error::CryptoError;

/// Taille minimale de clé acceptée (en bits, par facteur premier).
pub const MIN_KEY_BITS: u64 = 128;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire, couvre jusqu'à 2999)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,1009,1013,1021,
];

/// pgcd(a, b)
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// ppcm(a, b)
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

/// `a` est-il dans le groupe multiplicatif Z*_m (0 <= a < m et gcd(a, m) = 1) ?
pub fn in_z_star(a: &BigUint, m: &BigUint) -> bool {
    a < m && gcd(a, m) == BigUint::one()
}

/// Inverse modulaire de `a` mod `n` (PGCD étendu). Err si gcd(a, n) != 1.
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    let (g, x, _) = extended_gcd(a, n);
    if g != BigUint::one() {
        return Err(CryptoError::Crypto("no modular inverse (gcd != 1)"));
    }

    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint().ok_or(CryptoError::NegativeConversion)
}

fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while r != BigInt::zero() {
        let quotient = &old_r / &r;

        let temp_r = r.clone();
        r = old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = old_t - &quotient * &t;
        old_t = temp_t;
    }

    let gcd_val = old_r.to_biguint().unwrap_or_default();
    (gcd_val, old_s, old_t)
}

fn miller_rabin_rounds(_bits: u64) -> u32 {
    40
}

fn is_divisible_by_small_prime(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        let bp = BigUint::from(p);
        if n == &bp {
            return false;
        }
        if (n % &bp).is_zero() {
            return true;
        }
    }
    false
}

fn is_probable_prime<R: RngCore + CryptoRng>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    if n <= &BigUint::one() {
        return false;
    }
    if n == &BigUint::from(2u32) || n == &BigUint::from(3u32) {
        return true;
    }
    if n.is_even() {
        return false;
    }
    for &p in SMALL_PRIMES {
        if n == &BigUint::from(p) {
            return true;
        }
    }
    if n < &BigUint::from(5u32) {
        return false;
    }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&BigUint::from(2u32), &(n - BigUint::from(2u32)));
        let mut x = a.modpow(&d, n);
        if x == BigUint::one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Génère un nombre premier probable de `bits` bits.
///
/// Contrairement au générateur de safe primes du cryptosystème Paillier
/// "classique" (p = 2p'+1), ce schéma CRT n'impose aucune structure
/// supplémentaire sur p et q (cf. `original_source`, qui appelle
/// `BN_generate_prime` avec l'argument "safe" désactivé) : un premier
/// probable ordinaire suffit.
pub fn generate_prime<R: RngCore + CryptoRng>(
    bits: u64,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    if bits < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: bits,
            minimum: MIN_KEY_BITS,
        });
    }

    let rounds = miller_rabin_rounds(bits);

    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true); // garantit exactement `bits` bits
        candidate.set_bit(0, true); // impair

        if is_divisible_by_small_prime(&candidate) {
            continue;
        }
        if is_probable_prime(&candidate, rounds, rng) {
            debug_assert_eq!(candidate.bits(), bits);
            return Ok(candidate);
        }
    }
}
