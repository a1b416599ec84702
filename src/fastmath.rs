// ---------------------------------------------------------------------------
// Astuce de Paillier-Pointcheval (fast-L) et recombinaison CRT (forme de
// Garner) utilisées par le déchiffrement accéléré.
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;

/// L(u) = (u - 1) / x, calculée sans division grâce au masquage des w bits
/// de poids faible puis multiplication par x^-1 mod 2^w, où w = bits(x).
///
/// `x_inv_2w` doit être l'inverse de `x` modulo `2^w` avec `w = x.bits()`.
pub fn fast_l(u: &BigUint, x: &BigUint, x_inv_2w: &BigUint) -> BigUint {
    let w = x.bits();
    let mask = (BigUint::one() << w) - BigUint::one();

    let u_minus_1 = u - BigUint::one();
    let low_bits = &u_minus_1 & &mask;

    (&low_bits * x_inv_2w) & &mask
}

/// Recombinaison CRT (forme de Garner) : étant donné g1 = g mod p et
/// g2 = g mod q, avec `q_inv` = (q mod p)^-1 mod p, reconstruit g mod (p*q).
pub fn crt(g1: &BigUint, p: &BigUint, g2: &BigUint, q: &BigUint, q_inv: &BigUint) -> BigUint {
    let g1_int = g1.clone();
    let g2_mod_p = g2 % p;

    let t = if g1_int >= g2_mod_p {
        &g1_int - &g2_mod_p
    } else {
        p - (&g2_mod_p - &g1_int)
    };

    let h = (&t * q_inv) % p;
    g2 + q * h
}

/// Inverse de `x` modulo `2^w`, avec `w = x.bits()` — utilisé pour précalculer
/// `p_inv_2w` / `q_inv_2w` une fois par clé (x impair garanti par construction
/// puisque p et q sont premiers et impairs).
pub fn inv_mod_2w(x: &BigUint) -> BigUint {
    let w = x.bits();
    debug_assert!(x.is_odd(), "fast_l requiert un module x impair");

    // Relèvement de Hensel : inverse modulo 2, puis doublement de la
    // précision à chaque itération jusqu'à atteindre 2^w.
    let mut inv = BigUint::one();
    let mut prec = 1u64;
    while prec < w {
        prec = (prec * 2).min(w);
        let modulus = BigUint::one() << prec;
        let two = BigUint::from(2u32);
        // inv_{k+1} = inv_k * (2 - x * inv_k) mod 2^prec
        let t = (&two + &modulus - (x * &inv) % &modulus) % &modulus;
        inv = (&inv * &t) % &modulus;
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_l_matches_plain_division() {
        let n = BigUint::from(143u32); // 11 * 13
        let n_inv_2w = inv_mod_2w(&n);
        // u = n+1 + k*n for some k, so (u-1)/n = k
        let u = &n * BigUint::from(7u32) + BigUint::one();
        let expected = (&u - BigUint::one()) / &n;
        let got = fast_l(&u, &n, &n_inv_2w);
        assert_eq!(got, expected);
    }

    #[test]
    fn inv_mod_2w_is_a_real_inverse() {
        let x = BigUint::from(12345u32); // odd
        let w = x.bits();
        let inv = inv_mod_2w(&x);
        let modulus = BigUint::one() << w;
        assert_eq!((&x * &inv) % &modulus, BigUint::one());
    }

    #[test]
    fn crt_recombines_known_residues() {
        let p = BigUint::from(11u32);
        let q = BigUint::from(13u32);
        let q_inv = crate::math::mod_inverse(&(&q % &p), &p).unwrap();

        let g = BigUint::from(77u32); // arbitrary value < p*q
        let g1 = &g % &p;
        let g2 = &g % &q;

        let recombined = crt(&g1, &p, &g2, &q, &q_inv);
        assert_eq!(recombined, g);
    }
}
