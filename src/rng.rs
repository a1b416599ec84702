// ---------------------------------------------------------------------------
// Source d'aléa. Toute fonction cryptographique du coeur est générique sur
// `RngCore + CryptoRng` : aucune dépendance directe à `OsRng` en dehors de
// `SystemRng`, ce qui permet aux tests de semer un CSPRNG déterministe.
// ---------------------------------------------------------------------------

use num_bigint::{BigUint, RandBigInt};
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::error::CryptoError;

/// Niveau de sécurité statistique (en bits) du paramètre `S` des masques
/// additifs/exponentiels aléatoires (`MulByRandom`, `PrivateCompare`) :
/// cf. `PAILLIER_RANDOMIZER_SECLEVEL` dans `original_source`.
pub(crate) const RANDOMIZER_SECLEVEL: u64 = 80;

/// Tire un entier uniforme dans [0, borne).
pub fn uniform_below<R: RngCore + CryptoRng>(rng: &mut R, borne: &BigUint) -> BigUint {
    rng.gen_biguint_below(borne)
}

/// Tire un entier uniforme de `bits` bits (bit de poids fort forcé à 1).
pub fn random_bits<R: RngCore + CryptoRng>(rng: &mut R, bits: u64) -> BigUint {
    let mut v = rng.gen_biguint(bits);
    v.set_bit(bits - 1, true);
    v
}

/// Générateur adossé à la source d'entropie du système d'exploitation.
///
/// `original_source`'s `rng_init()` vérifie `RAND_status()` avant de faire
/// confiance au générateur OpenSSL ; l'équivalent ici est de sonder
/// `OsRng` une fois à la construction, de sorte qu'un échec de la source
/// d'entropie système remonte comme `CryptoError::Os` au lieu de paniquer
/// plus tard au premier tirage.
pub struct SystemRng {
    inner: OsRng,
}

impl SystemRng {
    pub fn new() -> Result<Self, CryptoError> {
        let mut probe = [0u8; 32];
        OsRng.try_fill_bytes(&mut probe).map_err(|_| CryptoError::Os)?;
        Ok(SystemRng { inner: OsRng })
    }
}

impl RngCore for SystemRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

impl CryptoRng for SystemRng {}
