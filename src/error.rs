// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// L'appelant reçoit une Err(...) et peut répondre proprement sans crasher
// le thread. Pas de contexte ambiant ni de dernier-code-d'erreur latché :
// chaque appel renvoie son propre Result (cf. DESIGN.md, §6).
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// Un paramètre requis est absent, une taille de clé ou un type de clé
    /// est hors de l'ensemble accepté, ou une combinaison d'arguments est
    /// invalide (ex. Compare sans aucune clé privée).
    Param(&'static str),
    /// La taille de clé demandée est trop petite (< MIN_KEY_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },
    /// Le message m est >= n (hors domaine plaintext Paillier)
    MessageOutOfRange,
    /// Le chiffré c est >= n² (hors domaine ciphertext Paillier)
    CiphertextOutOfRange,

    // --- Erreurs d'allocation ---
    Mem,

    // --- Erreurs cryptographiques internes ---
    /// L'inverse modulaire n'existe pas (gcd != 1), la génération de
    /// premiers a échoué, ou une boucle de synthèse de générateur a
    /// dépassé sa limite d'implémentation.
    Crypto(&'static str),
    /// Conversion BigInt -> BigUint échouée (résultat négatif — invariant
    /// interne)
    NegativeConversion,

    // --- Erreurs de (dé)sérialisation ---
    /// Entrée sérialisée malformée (JSON invalide, champ hex tronqué,
    /// type de clé non reconnu) ou version de compteur inconnue.
    Data,
    /// Champ hex trop long : vecteur DoS potentiel (conversion BigUint
    /// coûteuse)
    HexFieldTooLong { actual: usize, maximum: usize },
    /// n_squared != n*n, ou p*q != n au chargement : entrée incohérente
    KeyCoherenceError,

    // --- Dépassement de capacité ---
    /// Le texte en clair déchiffré dépasse l'intervalle u64
    Overflow,

    // --- Source d'entropie système ---
    /// La source RNG de la plateforme n'a pas pu être ouverte/validée
    Os,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::Param(what) => write!(f, "paramètre invalide : {what}"),
            CryptoError::KeySizeTooSmall { requested, minimum } => write!(
                f,
                "taille de clé {requested} bits insuffisante, minimum requis : {minimum} bits"
            ),
            CryptoError::MessageOutOfRange => write!(f, "le message doit être dans [0, n)"),
            CryptoError::CiphertextOutOfRange => write!(f, "le chiffré doit être dans [0, n²)"),
            CryptoError::Mem => write!(f, "échec d'allocation"),
            CryptoError::Crypto(what) => write!(f, "échec cryptographique : {what}"),
            CryptoError::NegativeConversion => write!(
                f,
                "conversion interne BigInt -> BigUint : résultat négatif inattendu"
            ),
            CryptoError::Data => write!(f, "entrée sérialisée malformée ou type non reconnu"),
            CryptoError::HexFieldTooLong { actual, maximum } => write!(
                f,
                "champ hexadécimal trop long : {actual} caractères (maximum autorisé : {maximum})"
            ),
            CryptoError::KeyCoherenceError => write!(
                f,
                "données incohérentes : une identité structurelle de clé ne tient pas"
            ),
            CryptoError::Overflow => write!(f, "le texte en clair dépasse la plage u64"),
            CryptoError::Os => write!(f, "source d'entropie système indisponible"),
        }
    }
}

impl std::error::Error for CryptoError {}
