// ---------------------------------------------------------------------------
// Partage thread-safe de la paire de clés courante. La clé privée n'est
// jamais clonée hors du registre : les appelants passent une closure qui
// reçoit un emprunt, l'exécutent, et rendent la main — "lend, don't clone".
// ---------------------------------------------------------------------------

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    NoKeyPair,
    LockPoisoned,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NoKeyPair => write!(f, "aucune paire de clés chargée dans le registre"),
            RegistryError::LockPoisoned => write!(f, "verrou du registre empoisonné"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<RegistryError> for CryptoError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::NoKeyPair => CryptoError::Param("no keypair loaded"),
            RegistryError::LockPoisoned => CryptoError::Crypto("registry lock poisoned"),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    keypair: Option<KeyPair>,
}

/// Registre partageable (`Clone` + `Send` + `Sync`) portant au plus une
/// paire de clés Paillier à la fois.
#[derive(Clone)]
pub struct KeyRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

impl KeyRegistry {
    pub fn new() -> Self {
        KeyRegistry {
            inner: Arc::new(RwLock::new(RegistryState::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RegistryState>, RegistryError> {
        self.inner.read().map_err(|_| RegistryError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    pub fn set_keypair(&self, keypair: KeyPair) -> Result<(), RegistryError> {
        self.write()?.keypair = Some(keypair);
        Ok(())
    }

    /// Retire la paire de clés du registre, ce qui déclenche l'effacement
    /// de la clé privée via son `Drop`.
    pub fn clear_keypair(&self) -> Result<(), RegistryError> {
        self.write()?.keypair = None;
        Ok(())
    }

    pub fn has_keypair(&self) -> Result<bool, RegistryError> {
        Ok(self.read()?.keypair.is_some())
    }

    /// Clone la clé publique courante (elle ne porte aucun secret).
    pub fn public_key(&self) -> Result<PublicKey, RegistryError> {
        self.read()?
            .keypair
            .as_ref()
            .map(|kp| kp.public_key.clone())
            .ok_or(RegistryError::NoKeyPair)
    }

    /// Prête la clé privée courante à `f` le temps de l'appel, sans jamais
    /// la cloner hors du verrou.
    pub fn with_secret_key<T>(
        &self,
        f: impl FnOnce(&KeyPair) -> T,
    ) -> Result<T, RegistryError> {
        let guard = self.read()?;
        let kp = guard.keypair.as_ref().ok_or(RegistryError::NoKeyPair)?;
        Ok(f(kp))
    }
}

impl Default for KeyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::keygen;
    use crate::math::MIN_KEY_BITS;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::thread;

    fn dummy_keypair() -> KeyPair {
        let mut rng = ChaCha20Rng::seed_from_u64(31337);
        keygen(MIN_KEY_BITS, &mut rng).unwrap()
    }

    #[test]
    fn empty_registry_reports_no_keypair() {
        let reg = KeyRegistry::new();
        assert!(!reg.has_keypair().unwrap());
        assert_eq!(reg.public_key().unwrap_err(), RegistryError::NoKeyPair);
    }

    #[test]
    fn set_then_get_round_trips() {
        let reg = KeyRegistry::new();
        let kp = dummy_keypair();
        let n = kp.public_key.n.clone();
        reg.set_keypair(kp).unwrap();
        assert!(reg.has_keypair().unwrap());
        assert_eq!(reg.public_key().unwrap().n, n);
    }

    #[test]
    fn clear_drops_the_keypair() {
        let reg = KeyRegistry::new();
        reg.set_keypair(dummy_keypair()).unwrap();
        reg.clear_keypair().unwrap();
        assert!(!reg.has_keypair().unwrap());
    }

    #[test]
    fn with_secret_key_does_not_leak_a_clone() {
        let reg = KeyRegistry::new();
        reg.set_keypair(dummy_keypair()).unwrap();
        let p_bits = reg.with_secret_key(|kp| kp.secret_key.p.bits()).unwrap();
        assert!(p_bits >= MIN_KEY_BITS);
    }

    #[test]
    fn concurrent_reads_do_not_panic() {
        let reg = KeyRegistry::new();
        reg.set_keypair(dummy_keypair()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let reg = reg.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let _ = reg.has_keypair().unwrap();
                        let _ = reg.public_key().unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
    }
}
