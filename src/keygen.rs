// ---------------------------------------------------------------------------
// Génération de clés : facteurs premiers, synthèse du générateur par CRT,
// précalcul des constantes accélérées (fast-L, Garner).
// ---------------------------------------------------------------------------

use std::time::Instant;

use num_bigint::BigUint;
use num_traits::One;
use rand_core::{CryptoRng, RngCore};

use crate::error::CryptoError;
use crate::fastmath::{crt, fast_l, inv_mod_2w};
use crate::keys::{KeyPair, PrivateKey, PublicKey};
use crate::math::{self, MIN_KEY_BITS};

/// Nombre maximal d'essais de rejet lors de la synthèse du générateur par
/// facteur avant d'abandonner (un échec à ce stade trahirait un bug, pas une
/// malchance statistique : la probabilité de rejet répété est négligeable).
const GENERATOR_SYNTHESIS_MAX_TRIES: u32 = 1000;

/// Génère une paire de clés Paillier CRT de `bits_per_factor` bits par
/// facteur premier (la clé publique n a donc environ `2 * bits_per_factor`
/// bits).
pub fn keygen<R: RngCore + CryptoRng>(
    bits_per_factor: u64,
    rng: &mut R,
) -> Result<KeyPair, CryptoError> {
    if bits_per_factor < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: bits_per_factor,
            minimum: MIN_KEY_BITS,
        });
    }

    let start = Instant::now();
    log::debug!("génération de clé Paillier : {bits_per_factor} bits par facteur");

    let (p, q) = generate_distinct_factors(bits_per_factor, rng)?;

    let n = &p * &q;
    let p_squared = &p * &p;
    let q_squared = &q * &q;

    let g_p = synthesize_generator_factor(&p, &p_squared, rng)?;
    let g_q = synthesize_generator_factor(&q, &q_squared, rng)?;

    let inv_q2_mod_p2 = math::mod_inverse(&(&q_squared % &p_squared), &p_squared)?;
    let g = crt(&g_p, &p_squared, &g_q, &q_squared, &inv_q2_mod_p2);

    let keypair = derive_keypair_from_factors(p, q, g)?;

    log::debug!(
        "clé générée en {:.3}s (n = {} bits)",
        start.elapsed().as_secs_f64(),
        keypair.public_key.n.bits()
    );

    Ok(keypair)
}

/// Reconstruit une paire de clés complète à partir de p, q et g — le point
/// commun entre `keygen` (juste après la synthèse du générateur) et toute
/// reconstruction à partir des seuls facteurs premiers.
pub(crate) fn derive_keypair_from_factors(
    p: BigUint,
    q: BigUint,
    g: BigUint,
) -> Result<KeyPair, CryptoError> {
    let n = &p * &q;
    let n_squared = &n * &n;
    if g >= n_squared {
        return Err(CryptoError::KeyCoherenceError);
    }

    let p_squared = &p * &p;
    let q_squared = &q * &q;

    let p_inv_2w = inv_mod_2w(&p);
    let q_inv_2w = inv_mod_2w(&q);

    let h_p = h_constant(&g, &p, &p_squared, &p_inv_2w)?;
    let h_q = h_constant(&g, &q, &q_squared, &q_inv_2w)?;

    let q_inv = math::mod_inverse(&(&q % &p), &p)?;

    Ok(KeyPair {
        public_key: PublicKey::new(n, g),
        secret_key: PrivateKey {
            p,
            q,
            p_squared,
            q_squared,
            p_inv_2w,
            q_inv_2w,
            h_p,
            h_q,
            q_inv,
        },
    })
}

fn generate_distinct_factors<R: RngCore + CryptoRng>(
    bits: u64,
    rng: &mut R,
) -> Result<(BigUint, BigUint), CryptoError> {
    let p = math::generate_prime(bits, rng)?;
    loop {
        let q = math::generate_prime(bits, rng)?;
        if q != p {
            return Ok((p, q));
        }
    }
}

/// Échantillonne g_x mod x² par rejet : g_x doit être dans Z*_{x²} et
/// vérifier g_x^(x-1) mod x² != 1, condition qui garantit que l'ordre de
/// g_x dans Z*_{x²} est un multiple de x (propriété utilisée par `h_constant`
/// et le déchiffrement CRT).
fn synthesize_generator_factor<R: RngCore + CryptoRng>(
    x: &BigUint,
    x_squared: &BigUint,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    let x_minus_1 = x - BigUint::one();

    for _ in 0..GENERATOR_SYNTHESIS_MAX_TRIES {
        let candidate = crate::rng::uniform_below(rng, x_squared);
        if !math::in_z_star(&candidate, x_squared) {
            continue;
        }
        if candidate.modpow(&x_minus_1, x_squared) != BigUint::one() {
            return Ok(candidate);
        }
    }

    Err(CryptoError::Crypto(
        "generator synthesis exceeded its rejection-sampling budget",
    ))
}

/// h_x = (L_x(g^(x-1) mod x²))^-1 mod x
fn h_constant(
    g: &BigUint,
    x: &BigUint,
    x_squared: &BigUint,
    x_inv_2w: &BigUint,
) -> Result<BigUint, CryptoError> {
    let x_minus_1 = x - BigUint::one();
    let u = g.modpow(&x_minus_1, x_squared);
    let l = fast_l(&u, x, x_inv_2w);
    math::mod_inverse(&l, x)
}
