// ---------------------------------------------------------------------------
// Types de clés. `PrivateKey` porte toutes les constantes CRT précalculées
// à la génération et s'efface de la mémoire à la destruction.
// ---------------------------------------------------------------------------

use num_bigint::BigUint;
use zeroize::Zeroize;

/// Clé publique : n, g et n² (aucune donnée secrète).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey {
    pub n: BigUint,
    pub g: BigUint,
    pub n_squared: BigUint,
}

impl PublicKey {
    pub fn new(n: BigUint, g: BigUint) -> Self {
        let n_squared = &n * &n;
        PublicKey { n, g, n_squared }
    }
}

fn zeroize_biguint(v: &mut BigUint) {
    // BigUint n'implémente pas Zeroize directement : on écrase le stockage
    // en le remplaçant par une valeur nulle après avoir consommé ses octets.
    let _ = std::mem::replace(v, BigUint::from(0u32));
}

/// Clé privée CRT : facteurs p, q et les constantes dérivées utilisées par
/// le déchiffrement et la comparaison privée accélérés.
pub struct PrivateKey {
    pub p: BigUint,
    pub q: BigUint,
    pub p_squared: BigUint,
    pub q_squared: BigUint,
    /// p^-1 mod 2^bits(p), pour `fast_l` côté p
    pub p_inv_2w: BigUint,
    /// q^-1 mod 2^bits(q), pour `fast_l` côté q
    pub q_inv_2w: BigUint,
    /// (L_p(g^(p-1) mod p²))^-1 mod p
    pub h_p: BigUint,
    /// (L_q(g^(q-1) mod q²))^-1 mod q
    pub h_q: BigUint,
    /// (q mod p)^-1 mod p, pour la recombinaison CRT de Garner
    pub q_inv: BigUint,
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.p);
        zeroize_biguint(&mut self.q);
        zeroize_biguint(&mut self.p_squared);
        zeroize_biguint(&mut self.q_squared);
        zeroize_biguint(&mut self.p_inv_2w);
        zeroize_biguint(&mut self.q_inv_2w);
        zeroize_biguint(&mut self.h_p);
        zeroize_biguint(&mut self.h_q);
        zeroize_biguint(&mut self.q_inv);
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: PrivateKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_computes_n_squared() {
        let pk = PublicKey::new(BigUint::from(77u32), BigUint::from(78u32));
        assert_eq!(pk.n_squared, BigUint::from(77u32 * 77u32));
    }

    #[test]
    fn private_key_zeroizes_on_drop() {
        let mut sk = PrivateKey {
            p: BigUint::from(11u32),
            q: BigUint::from(13u32),
            p_squared: BigUint::from(121u32),
            q_squared: BigUint::from(169u32),
            p_inv_2w: BigUint::from(3u32),
            q_inv_2w: BigUint::from(5u32),
            h_p: BigUint::from(2u32),
            h_q: BigUint::from(4u32),
            q_inv: BigUint::from(6u32),
        };
        sk.zeroize();
        assert_eq!(sk.p, BigUint::from(0u32));
        assert_eq!(sk.q_inv, BigUint::from(0u32));
    }
}
