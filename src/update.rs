// ---------------------------------------------------------------------------
// Mises à jour homomorphes : chaque opération combine un changement de
// texte clair avec une re-randomisation fraîche, pour qu'un observateur ne
// puisse jamais relier deux chiffrés consécutifs du même compteur. Toutes
// passent par `apply_prefactor`, seul endroit qui multiplie un chiffré par
// un facteur mod n².
//
// `original_source`'s `paillierAddSub` effaçait deux fois le même
// temporaire (`tmp`) et jamais `tmp2` lors du nettoyage ; ici chaque valeur
// intermédiaire a sa propre liaison et n'est jamais réutilisée après son
// usage, donc il n'y a rien à effacer deux fois.
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::counter::Counter;
use crate::encrypt::rerandomize_factor;
use crate::error::CryptoError;
use crate::keys::PublicKey;
use crate::math;

/// c * factor mod n² — le seul endroit qui combine un chiffré avec un
/// facteur multiplicatif. `inc_by`/`dec_by`/`add`/`sub` appellent ceci
/// directement ; `mul_by`/`mul_by_random` l'appellent pour la passe de
/// re-randomisation finale, après avoir élevé `c` à la puissance voulue.
fn apply_prefactor(c: &BigUint, factor: &BigUint, pk: &PublicKey) -> BigUint {
    (c * factor) % &pk.n_squared
}

impl Counter {
    /// self := Enc(Dec(self) + k), re-randomisé.
    pub fn inc_by<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        k: &BigUint,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        if k >= &pk.n {
            return Err(CryptoError::MessageOutOfRange);
        }

        let shift_factor = pk.g.modpow(k, &pk.n_squared);
        let shifted = apply_prefactor(&self.c, &shift_factor, pk);
        let blind = rerandomize_factor(pk, rng)?;
        self.replace_ciphertext(apply_prefactor(&shifted, &blind, pk));
        Ok(())
    }

    /// self := Enc(Dec(self) - k), re-randomisé.
    pub fn dec_by<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        k: &BigUint,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        if k >= &pk.n {
            return Err(CryptoError::MessageOutOfRange);
        }

        let negated_exponent = (&pk.n - k) % &pk.n;
        let shift_factor = pk.g.modpow(&negated_exponent, &pk.n_squared);
        let shifted = apply_prefactor(&self.c, &shift_factor, pk);
        let blind = rerandomize_factor(pk, rng)?;
        self.replace_ciphertext(apply_prefactor(&shifted, &blind, pk));
        Ok(())
    }

    /// self := Enc(Dec(self) + Dec(other)), re-randomisé.
    pub fn add<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        other: &Counter,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared || other.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        let combined = apply_prefactor(&self.c, &other.c, pk);
        let blind = rerandomize_factor(pk, rng)?;
        self.replace_ciphertext(apply_prefactor(&combined, &blind, pk));
        Ok(())
    }

    /// self := Enc(Dec(self) - Dec(other)), re-randomisé.
    pub fn sub<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        other: &Counter,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared || other.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        let other_inverse = math::mod_inverse(&other.c, &pk.n_squared)?;
        let combined = apply_prefactor(&self.c, &other_inverse, pk);
        let blind = rerandomize_factor(pk, rng)?;
        self.replace_ciphertext(apply_prefactor(&combined, &blind, pk));
        Ok(())
    }

    /// self := Enc(Dec(self) * k), re-randomisé. `k` est un scalaire public
    /// connu de l'appelant (pas un second chiffré : Paillier n'autorise pas
    /// la multiplication de deux textes clairs chiffrés).
    pub fn mul_by<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        k: &BigUint,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }
        if k >= &pk.n {
            return Err(CryptoError::MessageOutOfRange);
        }

        let scaled = self.c.modpow(k, &pk.n_squared);
        let blind = rerandomize_factor(pk, rng)?;
        self.replace_ciphertext(apply_prefactor(&scaled, &blind, pk));
        Ok(())
    }

    /// self := Enc(Dec(self) * rho) pour rho <-$ random_bits(S+2), tiré par
    /// l'appel lui-même plutôt que fourni par l'appelant — utile pour
    /// masquer une valeur avant une comparaison privée. Renvoie rho.
    pub fn mul_by_random<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<BigUint, CryptoError> {
        if self.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        let rho = crate::rng::random_bits(rng, crate::rng::RANDOMIZER_SECLEVEL + 2);
        self.mul_by(pk, &rho, rng)?;
        Ok(rho)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decrypt::decrypt;
    use crate::encrypt::encrypt;
    use crate::keygen::keygen;
    use crate::math::MIN_KEY_BITS;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(2024)
    }

    #[test]
    fn inc_by_and_dec_by_round_trip() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let mut c = encrypt(&kp.public_key, &BigUint::from(10u32), &mut rng).unwrap();

        c.inc_by(&kp.public_key, &BigUint::from(5u32), &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &c).unwrap(), 15);

        c.dec_by(&kp.public_key, &BigUint::from(3u32), &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &c).unwrap(), 12);
    }

    #[test]
    fn add_and_sub_are_consistent_with_plaintext_arithmetic() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let mut c1 = encrypt(&kp.public_key, &BigUint::from(30u32), &mut rng).unwrap();
        let c2 = encrypt(&kp.public_key, &BigUint::from(12u32), &mut rng).unwrap();

        let mut sum = c1.dup();
        sum.add(&kp.public_key, &c2, &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &sum).unwrap(), 42);

        c1.sub(&kp.public_key, &c2, &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &c1).unwrap(), 18);
    }

    #[test]
    fn mul_by_scales_the_plaintext() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let mut c = encrypt(&kp.public_key, &BigUint::from(6u32), &mut rng).unwrap();

        c.mul_by(&kp.public_key, &BigUint::from(7u32), &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &c).unwrap(), 42);
    }

    #[test]
    fn mul_by_random_returns_a_consistent_scalar() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let mut c = encrypt(&kp.public_key, &BigUint::from(9u32), &mut rng).unwrap();

        let rho = c.mul_by_random(&kp.public_key, &mut rng).unwrap();
        assert_eq!(rho.bits(), crate::rng::RANDOMIZER_SECLEVEL + 2);

        let expected_plain = (BigUint::from(9u32) * &rho) % &kp.public_key.n;
        // La valeur déchiffrée (9 * rho mod n) peut dépasser u64 pour une
        // clé de cette taille : on passe par `decrypt_raw` plutôt que par
        // l'API publique tronquée à u64.
        let got = crate::decrypt::decrypt_raw(&kp.secret_key, &kp.public_key, &c.c).unwrap();
        assert_eq!(got, expected_plain);
    }

    #[test]
    fn mul_by_random_on_a_zero_plaintext_stays_zero() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let mut c = encrypt(&kp.public_key, &BigUint::from(0u32), &mut rng).unwrap();

        c.mul_by_random(&kp.public_key, &mut rng).unwrap();
        assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &c).unwrap(), 0);
    }
}
