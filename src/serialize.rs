// ---------------------------------------------------------------------------
// Sérialisation hexadécimale / JSON des clés et compteurs. Pas de
// persistance sur disque ici : on produit et consomme des `String`,
// l'appelant décide où elles vivent.
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use num_traits::Num;
use serde::{Deserialize, Serialize};

use crate::counter::{Counter, CounterVersion};
use crate::error::CryptoError;
use crate::keys::{KeyPair, PrivateKey, PublicKey};

/// Borne DoS : au-delà de cette longueur, convertir un champ hex en BigUint
/// devient un travail délibérément coûteux à infliger à l'appelant.
pub const MAX_HEX_FIELD_LEN: usize = 3072;

/// Longueur maximale d'un document JSON complet passé à `string_to_key` /
/// `string_to_counter`, avant même d'en extraire les champs hex
/// individuels.
const MAX_KEY_DOCUMENT_LEN: usize = 4 * MAX_HEX_FIELD_LEN;

/// Forme taguée d'une clé Paillier, sérialisable telle quelle : le type
/// Rust *est* le tag de discrimination, `serde` rejette tout `"type"`
/// inconnu comme `CryptoError::Data` avant même d'atteindre le code
/// applicatif.
///
/// `Private` porte les neuf champs de `PrivateKey` tels quels (pas
/// seulement `p, q`) : toutes les constantes CRT dérivées voyagent sur le
/// fil, de sorte que recharger une clé privée ne les recalcule jamais.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum KeyString {
    #[serde(rename = "public")]
    Public { n: String, g: String, n_squared: String },
    #[serde(rename = "private")]
    Private {
        p: String,
        q: String,
        p_squared: String,
        q_squared: String,
        p_inv_2w: String,
        q_inv_2w: String,
        h_sub_p: String,
        h_sub_q: String,
        q_inv: String,
    },
}

impl KeyString {
    pub fn from_public_key(pk: &PublicKey) -> Self {
        KeyString::Public {
            n: biguint_to_hex(&pk.n),
            g: biguint_to_hex(&pk.g),
            n_squared: biguint_to_hex(&pk.n_squared),
        }
    }

    pub fn from_private_key(sk: &PrivateKey) -> Self {
        KeyString::Private {
            p: biguint_to_hex(&sk.p),
            q: biguint_to_hex(&sk.q),
            p_squared: biguint_to_hex(&sk.p_squared),
            q_squared: biguint_to_hex(&sk.q_squared),
            p_inv_2w: biguint_to_hex(&sk.p_inv_2w),
            q_inv_2w: biguint_to_hex(&sk.q_inv_2w),
            h_sub_p: biguint_to_hex(&sk.h_p),
            h_sub_q: biguint_to_hex(&sk.h_q),
            q_inv: biguint_to_hex(&sk.q_inv),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CounterJson {
    version: u8,
    c: String,
}

fn biguint_to_hex(v: &BigUint) -> String {
    v.to_str_radix(16).to_uppercase()
}

fn hex_to_biguint(s: &str) -> Result<BigUint, CryptoError> {
    if s.len() > MAX_HEX_FIELD_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual: s.len(),
            maximum: MAX_HEX_FIELD_LEN,
        });
    }
    BigUint::from_str_radix(s, 16).map_err(|_| CryptoError::Data)
}

/// Sérialise une clé (publique ou privée) en JSON tagué, hex majuscule.
pub fn key_to_string(key: &KeyString) -> Result<String, CryptoError> {
    serde_json::to_string(key).map_err(|_| CryptoError::Crypto("JSON serialization failed"))
}

/// Désérialise une clé depuis le format produit par `key_to_string`.
pub fn string_to_key(s: &str) -> Result<KeyString, CryptoError> {
    if s.len() > MAX_KEY_DOCUMENT_LEN {
        return Err(CryptoError::HexFieldTooLong {
            actual: s.len(),
            maximum: MAX_KEY_DOCUMENT_LEN,
        });
    }
    let key: KeyString = serde_json::from_str(s).map_err(|_| CryptoError::Data)?;

    // Les champs hex n'ont pas encore été validés individuellement par
    // serde (ce ne sont que des String) : on les repasse par le garde-fou
    // de longueur avant toute conversion BigUint coûteuse.
    match &key {
        KeyString::Public { n, g, n_squared } => {
            hex_to_biguint(n)?;
            hex_to_biguint(g)?;
            hex_to_biguint(n_squared)?;
        }
        KeyString::Private {
            p,
            q,
            p_squared,
            q_squared,
            p_inv_2w,
            q_inv_2w,
            h_sub_p,
            h_sub_q,
            q_inv,
        } => {
            hex_to_biguint(p)?;
            hex_to_biguint(q)?;
            hex_to_biguint(p_squared)?;
            hex_to_biguint(q_squared)?;
            hex_to_biguint(p_inv_2w)?;
            hex_to_biguint(q_inv_2w)?;
            hex_to_biguint(h_sub_p)?;
            hex_to_biguint(h_sub_q)?;
            hex_to_biguint(q_inv)?;
        }
    }

    Ok(key)
}

/// Reconstruit la clé publique portée par un `KeyString::Public`, en
/// vérifiant l'identité structurelle n² = n * n.
pub fn public_key_from(key: &KeyString) -> Result<PublicKey, CryptoError> {
    match key {
        KeyString::Public { n, g, n_squared } => {
            let n = hex_to_biguint(n)?;
            let g = hex_to_biguint(g)?;
            let n_squared_claimed = hex_to_biguint(n_squared)?;
            if n_squared_claimed != &n * &n {
                return Err(CryptoError::KeyCoherenceError);
            }
            Ok(PublicKey::new(n, g))
        }
        KeyString::Private { .. } => Err(CryptoError::Param("expected a public KeyString")),
    }
}

/// Reconstruit une paire de clés complète à partir d'un `KeyString::Public`
/// et d'un `KeyString::Private` assortis. Les neuf champs de la clé privée
/// voyagent tels quels sur le fil (cf. `KeyString`) : on ne recalcule rien,
/// on vérifie seulement les identités structurelles qui les relient.
pub fn keypair_from_key_strings(
    public: &KeyString,
    private: &KeyString,
) -> Result<KeyPair, CryptoError> {
    let (n, g) = match public {
        KeyString::Public { n, g, n_squared } => {
            let n = hex_to_biguint(n)?;
            let g = hex_to_biguint(g)?;
            let n_squared_claimed = hex_to_biguint(n_squared)?;
            if n_squared_claimed != &n * &n {
                return Err(CryptoError::KeyCoherenceError);
            }
            (n, g)
        }
        KeyString::Private { .. } => return Err(CryptoError::Param("expected a public KeyString")),
    };

    let sk = match private {
        KeyString::Private {
            p,
            q,
            p_squared,
            q_squared,
            p_inv_2w,
            q_inv_2w,
            h_sub_p,
            h_sub_q,
            q_inv,
        } => {
            let p = hex_to_biguint(p)?;
            let q = hex_to_biguint(q)?;
            let p_squared = hex_to_biguint(p_squared)?;
            let q_squared = hex_to_biguint(q_squared)?;
            if p_squared != &p * &p || q_squared != &q * &q {
                return Err(CryptoError::KeyCoherenceError);
            }
            PrivateKey {
                p,
                q,
                p_squared,
                q_squared,
                p_inv_2w: hex_to_biguint(p_inv_2w)?,
                q_inv_2w: hex_to_biguint(q_inv_2w)?,
                h_p: hex_to_biguint(h_sub_p)?,
                h_q: hex_to_biguint(h_sub_q)?,
                q_inv: hex_to_biguint(q_inv)?,
            }
        }
        KeyString::Public { .. } => return Err(CryptoError::Param("expected a private KeyString")),
    };

    if &sk.p * &sk.q != n {
        return Err(CryptoError::KeyCoherenceError);
    }

    Ok(KeyPair {
        public_key: PublicKey::new(n, g),
        secret_key: sk,
    })
}

/// Sérialise un compteur chiffré (version + chiffré hex).
pub fn counter_to_string(counter: &Counter) -> Result<String, CryptoError> {
    let json = CounterJson {
        version: counter.version as u8,
        c: biguint_to_hex(&counter.c),
    };
    serde_json::to_string(&json).map_err(|_| CryptoError::Crypto("JSON serialization failed"))
}

/// Désérialise un compteur chiffré depuis le format de `counter_to_string`.
pub fn string_to_counter(s: &str) -> Result<Counter, CryptoError> {
    if s.len() > MAX_HEX_FIELD_LEN * 2 {
        return Err(CryptoError::HexFieldTooLong {
            actual: s.len(),
            maximum: MAX_HEX_FIELD_LEN * 2,
        });
    }
    let json: CounterJson = serde_json::from_str(s).map_err(|_| CryptoError::Data)?;
    let version = CounterVersion::try_from(json.version)?;
    let c = hex_to_biguint(&json.c)?;
    Ok(Counter::from_parts(version, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::keygen;
    use crate::math::MIN_KEY_BITS;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(321)
    }

    #[test]
    fn public_key_round_trips_through_string() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let ks = KeyString::from_public_key(&kp.public_key);
        let s = key_to_string(&ks).unwrap();
        let restored = string_to_key(&s).unwrap();
        assert_eq!(public_key_from(&restored).unwrap(), kp.public_key);
    }

    #[test]
    fn keypair_round_trips_through_public_and_private_key_strings() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let pub_s = key_to_string(&KeyString::from_public_key(&kp.public_key)).unwrap();
        let priv_s = key_to_string(&KeyString::from_private_key(&kp.secret_key)).unwrap();

        let restored = keypair_from_key_strings(
            &string_to_key(&pub_s).unwrap(),
            &string_to_key(&priv_s).unwrap(),
        )
        .unwrap();

        assert_eq!(restored.public_key, kp.public_key);
        assert_eq!(restored.secret_key.p, kp.secret_key.p);
        assert_eq!(restored.secret_key.q, kp.secret_key.q);
        assert_eq!(restored.secret_key.p_squared, kp.secret_key.p_squared);
        assert_eq!(restored.secret_key.q_squared, kp.secret_key.q_squared);
        assert_eq!(restored.secret_key.p_inv_2w, kp.secret_key.p_inv_2w);
        assert_eq!(restored.secret_key.q_inv_2w, kp.secret_key.q_inv_2w);
        assert_eq!(restored.secret_key.h_p, kp.secret_key.h_p);
        assert_eq!(restored.secret_key.h_q, kp.secret_key.h_q);
        assert_eq!(restored.secret_key.q_inv, kp.secret_key.q_inv);
    }

    #[test]
    fn mismatched_factors_are_rejected_as_incoherent() {
        let mut rng = test_rng();
        let kp1 = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let kp2 = keygen(MIN_KEY_BITS, &mut rng).unwrap();

        let pub_s = key_to_string(&KeyString::from_public_key(&kp1.public_key)).unwrap();
        let priv_s = key_to_string(&KeyString::from_private_key(&kp2.secret_key)).unwrap();

        assert!(matches!(
            keypair_from_key_strings(&string_to_key(&pub_s).unwrap(), &string_to_key(&priv_s).unwrap()),
            Err(CryptoError::KeyCoherenceError)
        ));
    }

    #[test]
    fn oversized_hex_field_is_rejected() {
        let huge = "F".repeat(MAX_HEX_FIELD_LEN + 1);
        assert!(matches!(
            hex_to_biguint(&huge),
            Err(CryptoError::HexFieldTooLong { .. })
        ));
    }

    #[test]
    fn counter_round_trips_through_string() {
        let mut rng = test_rng();
        let kp = keygen(MIN_KEY_BITS, &mut rng).unwrap();
        let c = crate::encrypt::encrypt(&kp.public_key, &BigUint::from(7u32), &mut rng).unwrap();
        let s = counter_to_string(&c).unwrap();
        let restored = string_to_counter(&s).unwrap();
        assert_eq!(restored.c, c.c);
        assert_eq!(restored.version, CounterVersion::PaillierV1);
    }
}
