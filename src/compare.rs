// ---------------------------------------------------------------------------
// Comparaison de textes clairs et comparaison privée (oblivious) de deux
// compteurs chiffrés sans jamais révéler leur valeur individuelle au
// déchiffreur — seul l'ordre relatif fuite. Le résultat suit la convention
// `i8` usuelle : négatif si a < b, zéro si égal, positif si a > b.
// ---------------------------------------------------------------------------

use rand_core::{CryptoRng, RngCore};

use crate::counter::Counter;
use crate::decrypt::decrypt;
use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};

/// Taille du masque additif utilisé par `private_compare` : assez grand
/// pour engloutir statistiquement toute différence tenant sur u64, assez
/// petit pour ne jamais déborder n.
const MASK_BITS: u64 = 64 + crate::rng::RANDOMIZER_SECLEVEL;

/// Compare `Dec(a)` à `Dec(b)` en déchiffrant chacun avec la première clé
/// privée disponible. Renvoie `CryptoError::Param` si ni `priv_a` ni
/// `priv_b` ne sont fournis — il n'existe alors aucun moyen de retrouver
/// un texte clair à comparer.
pub fn compare(
    pk: &PublicKey,
    a: &Counter,
    b: &Counter,
    priv_a: Option<&PrivateKey>,
    priv_b: Option<&PrivateKey>,
) -> Result<i8, CryptoError> {
    let sk = priv_a
        .or(priv_b)
        .ok_or(CryptoError::Param("compare requires at least one private key"))?;

    let va = decrypt(sk, pk, a)?;
    let vb = decrypt(sk, pk, b)?;

    Ok(match va.cmp(&vb) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}

/// Compare `Dec(a)` à `Dec(b)` sans jamais faire apparaître `Dec(a)` ou
/// `Dec(b)` individuellement : la différence chiffrée est masquée par un
/// aléa additif avant déchiffrement, et seul l'ordre masqué-vs-masque est
/// comparé.
///
/// Solidité : valide lorsque `|Dec(a) - Dec(b)| < n / 2^(RANDOMIZER_SECLEVEL + 3)`.
/// Au-delà, le masque peut faire déborder le modulo n et l'ordre déduit peut
/// être erroné ; c'est à l'appelant de garantir que ses compteurs restent
/// dans cette plage s'il a besoin d'une garantie stricte.
pub fn private_compare<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    sk: &PrivateKey,
    a: &Counter,
    b: &Counter,
    rng: &mut R,
) -> Result<i8, CryptoError> {
    if a.c >= pk.n_squared || b.c >= pk.n_squared {
        return Err(CryptoError::CiphertextOutOfRange);
    }
    if pk.n.bits() <= MASK_BITS + 3 {
        return Err(CryptoError::Param("key too small for private comparison"));
    }

    let rho = crate::rng::random_bits(rng, MASK_BITS);

    let mut masked = a.dup();
    masked.sub(pk, b, rng)?;
    masked.inc_by(pk, &rho, rng)?;

    let v = crate::decrypt::decrypt_raw(sk, pk, &masked.c)?;

    // v = (Dec(a) - Dec(b) + rho) mod n, sans report tant que la borne de
    // solidité ci-dessus est respectée : on compare donc directement à rho.
    Ok(match v.cmp(&rho) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}
