// ---------------------------------------------------------------------------
// Cycle de vie du compteur chiffré : création, duplication, copie, horodatage
// de la dernière mutation.
// ---------------------------------------------------------------------------

use std::time::SystemTime;

use num_bigint::BigUint;

use crate::error::CryptoError;

/// Schéma de chiffrement sous-jacent au compteur. Un seul variant existe
/// aujourd'hui ; le champ existe pour permettre une migration de schéma
/// sans casser la sérialisation des compteurs déjà émis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CounterVersion {
    PaillierV1 = 1,
}

impl TryFrom<u8> for CounterVersion {
    type Error = CryptoError;

    fn try_from(value: u8) -> Result<Self, CryptoError> {
        match value {
            1 => Ok(CounterVersion::PaillierV1),
            _ => Err(CryptoError::Data),
        }
    }
}

/// Compteur chiffré : un chiffré Paillier accompagné de son horodatage de
/// dernière mutation. Le chiffré est effacé de la mémoire à la destruction,
/// au même titre que les autres secrets du coeur.
pub struct Counter {
    pub version: CounterVersion,
    pub c: BigUint,
    pub last_modified: SystemTime,
}

impl Counter {
    /// Construit un compteur tout juste chiffré.
    pub fn new(c: BigUint) -> Self {
        Counter {
            version: CounterVersion::PaillierV1,
            c,
            last_modified: SystemTime::now(),
        }
    }

    /// Reconstruction à partir de champs déjà validés (utilisé par
    /// `serialize::string_to_counter`) ; l'horodatage redémarre à
    /// l'instant du chargement, car le format sérialisé n'en transporte
    /// pas.
    pub(crate) fn from_parts(version: CounterVersion, c: BigUint) -> Self {
        Counter {
            version,
            c,
            last_modified: SystemTime::now(),
        }
    }

    /// Duplique le compteur (nouvelle allocation, même chiffré, horodatage
    /// préservé).
    pub fn dup(&self) -> Self {
        Counter {
            version: self.version,
            c: self.c.clone(),
            last_modified: self.last_modified,
        }
    }

    /// Remplace le chiffré de `self`, met à jour l'horodatage de dernière
    /// mutation à l'instant de l'appel. Utilisé par les opérations de mise
    /// à jour homomorphe (`update.rs`) et par `Counter::touch`/`copy_from`
    /// (`encrypt.rs`), qui portent chacune leur propre logique de
    /// re-randomisation avant d'appeler ce point d'entrée commun.
    pub(crate) fn replace_ciphertext(&mut self, c: BigUint) {
        self.c = c;
        self.last_modified = SystemTime::now();
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        self.c = BigUint::from(0u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_counter_carries_its_ciphertext() {
        let c = Counter::new(BigUint::from(999u32));
        assert_eq!(c.c, BigUint::from(999u32));
        assert_eq!(c.version, CounterVersion::PaillierV1);
    }

    #[test]
    fn dup_copies_without_aliasing() {
        let original = Counter::new(BigUint::from(10u32));
        let mut copy = original.dup();
        copy.replace_ciphertext(BigUint::from(20u32));
        assert_eq!(original.c, BigUint::from(10u32));
        assert_eq!(copy.c, BigUint::from(20u32));
    }

    #[test]
    fn replace_ciphertext_advances_last_modified() {
        let mut c = Counter::new(BigUint::from(1u32));
        let before = c.last_modified;
        std::thread::sleep(std::time::Duration::from_millis(2));
        c.replace_ciphertext(BigUint::from(2u32));
        assert!(c.last_modified >= before);
    }

    #[test]
    fn unknown_version_byte_is_rejected() {
        assert!(CounterVersion::try_from(7u8).is_err());
    }
}
