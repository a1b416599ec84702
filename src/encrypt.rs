// ---------------------------------------------------------------------------
// Chiffrement et re-randomisation. Le facteur r^n mod n² est l'ingrédient
// commun à Encrypt, Touch et à chaque mise à jour homomorphe : on ne le
// synthétise qu'à un seul endroit.
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};

use crate::counter::Counter;
use crate::error::CryptoError;
use crate::keys::PublicKey;
use crate::math;

/// Chiffre `m` (doit vérifier 0 <= m < n) sous `pk`.
pub fn encrypt<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    m: &BigUint,
    rng: &mut R,
) -> Result<Counter, CryptoError> {
    if m >= &pk.n {
        return Err(CryptoError::MessageOutOfRange);
    }

    let g_m = pk.g.modpow(m, &pk.n_squared);
    let blind = rerandomize_factor(pk, rng)?;

    Ok(Counter::new((&g_m * &blind) % &pk.n_squared))
}

impl Counter {
    /// Re-randomise ce compteur en place : multiplie le chiffré par r^n
    /// mod n² pour un r frais tiré dans Z*_n. Le plaintext sous-jacent est
    /// inchangé.
    pub fn touch<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        if self.c >= pk.n_squared {
            return Err(CryptoError::CiphertextOutOfRange);
        }

        let blind = rerandomize_factor(pk, rng)?;
        let new_c = (&self.c * &blind) % &pk.n_squared;
        self.replace_ciphertext(new_c);
        Ok(())
    }

    /// Copie le chiffré de `from` dans `self` puis re-randomise : `self`
    /// porte alors le même texte clair que `from`, sous un chiffré
    /// différent, de sorte qu'un observateur ne puisse pas relier les deux
    /// compteurs par inspection du ciphertext seul.
    pub fn copy_from<R: RngCore + CryptoRng>(
        &mut self,
        pk: &PublicKey,
        from: &Counter,
        rng: &mut R,
    ) -> Result<(), CryptoError> {
        self.replace_ciphertext(from.c.clone());
        self.touch(pk, rng)
    }
}

/// Tire r dans Z*_n par rejet et renvoie r^n mod n², le facteur de
/// re-randomisation partagé par `encrypt`, `Counter::touch` et toutes les
/// opérations homomorphes de `update.rs`.
pub(crate) fn rerandomize_factor<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    rng: &mut R,
) -> Result<BigUint, CryptoError> {
    loop {
        let r = crate::rng::uniform_below(rng, &pk.n);
        if math::in_z_star(&r, &pk.n) {
            return Ok(r.modpow(&pk.n, &pk.n_squared));
        }
    }
}
