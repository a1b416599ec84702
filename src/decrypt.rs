// ---------------------------------------------------------------------------
// Déchiffrement accéléré par CRT : décrypte séparément mod p² et mod q²
// (exposants de taille moitié), puis recombine par la forme de Garner — le
// gain que l'accélération Paillier-Pointcheval/CRT apporte par rapport au
// déchiffrement direct mod n².
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use num_traits::ToPrimitive;

use crate::counter::Counter;
use crate::error::CryptoError;
use crate::fastmath::{crt, fast_l};
use crate::keys::{PrivateKey, PublicKey};

/// Déchiffre `counter` sous `(sk, pk)` et projette le résultat sur u64.
/// Renvoie `CryptoError::Overflow` si le texte en clair dépasse la plage
/// u64 (le protocole de comptage n'a pas vocation à porter des valeurs
/// plus grandes — cf. le contrôle équivalent par `strtoull`/`ULLONG_MAX`
/// dans le pilote d'origine).
pub fn decrypt(sk: &PrivateKey, pk: &PublicKey, counter: &Counter) -> Result<u64, CryptoError> {
    let m = decrypt_raw(sk, pk, &counter.c)?;

    m.to_u64().ok_or_else(|| {
        log::warn!("déchiffrement : texte en clair hors plage u64");
        CryptoError::Overflow
    })
}

/// Déchiffre `c` et renvoie le texte en clair complet, sans projection sur
/// u64. Réservé à l'usage interne (ex. `compare::private_compare`, où la
/// valeur masquée par un aléa peut légitimement dépasser u64).
pub(crate) fn decrypt_raw(
    sk: &PrivateKey,
    pk: &PublicKey,
    c: &BigUint,
) -> Result<BigUint, CryptoError> {
    if c >= &pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }

    let m_p = partial_decrypt(c, &sk.p, &sk.p_squared, &sk.p_inv_2w, &sk.h_p);
    let m_q = partial_decrypt(c, &sk.q, &sk.q_squared, &sk.q_inv_2w, &sk.h_q);

    Ok(crt(&m_p, &sk.p, &m_q, &sk.q, &sk.q_inv))
}

fn partial_decrypt(
    c: &BigUint,
    x: &BigUint,
    x_squared: &BigUint,
    x_inv_2w: &BigUint,
    h_x: &BigUint,
) -> BigUint {
    let x_minus_1 = x - BigUint::from(1u32);
    let u = (c % x_squared).modpow(&x_minus_1, x_squared);
    let l = fast_l(&u, x, x_inv_2w);
    (&l * h_x) % x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encrypt::encrypt;
    use crate::keygen::keygen;
    use crate::math::MIN_KEY_BITS;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(55)
    }

    #[test]
    fn decrypt_recovers_encrypted_plaintext() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        for m in [0u64, 1, 42, 1_000_000] {
            let c = encrypt(&kp.public_key, &BigUint::from(m), &mut rng).unwrap();
            let recovered = decrypt(&kp.secret_key, &kp.public_key, &c).unwrap();
            assert_eq!(recovered, m);
        }
    }

    #[test]
    fn decrypt_rejects_ciphertext_out_of_range() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let bad = Counter::new(kp.public_key.n_squared.clone());
        assert!(matches!(
            decrypt(&kp.secret_key, &kp.public_key, &bad),
            Err(CryptoError::CiphertextOutOfRange)
        ));
    }

    #[test]
    fn decrypt_rejects_plaintext_overflowing_u64() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let huge = kp.public_key.n.clone() - BigUint::from(1u32);
        if huge > BigUint::from(u64::MAX) {
            let c = encrypt(&kp.public_key, &huge, &mut rng).unwrap();
            assert!(matches!(
                decrypt(&kp.secret_key, &kp.public_key, &c),
                Err(CryptoError::Overflow)
            ));
        }
    }
}
