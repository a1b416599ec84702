// ---------------------------------------------------------------------------
// Petite démonstration du comptage homomorphe : génère une clé, chiffre
// quelques valeurs, les combine sans jamais les déchiffrer individuellement,
// puis vérifie le résultat. Pas d'interface CLI, juste un point d'entrée
// pour observer le coeur tourner.
// ---------------------------------------------------------------------------

use std::fmt;
use std::time::Instant;

use num_bigint::BigUint;

use paillier_counter::{decrypt, encrypt, keygen, private_compare, CryptoError, SystemRng};

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "{e}"),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self {
        AppError::Crypto(e)
    }
}

fn demonstration_paillier() -> Result<(), AppError> {
    let mut rng = SystemRng::new()?;

    println!("Génération de la paire de clés (512 bits par facteur)...");
    let t0 = Instant::now();
    let kp = keygen(512, &mut rng)?;
    println!("  terminé en {:.3}s", t0.elapsed().as_secs_f64());

    println!("Chiffrement de 30 et 12...");
    let c1 = encrypt(&kp.public_key, &BigUint::from(30u32), &mut rng)?;
    let c2 = encrypt(&kp.public_key, &BigUint::from(12u32), &mut rng)?;

    println!("Addition homomorphe (sans déchiffrement intermédiaire)...");
    let mut sum = c1.dup();
    sum.add(&kp.public_key, &c2, &mut rng)?;
    let plain_sum = decrypt(&kp.secret_key, &kp.public_key, &sum)?;
    println!("  Dec(c1) + Dec(c2) = {plain_sum} (attendu : 42)");
    assert_eq!(plain_sum, 42);

    println!("Multiplication par un scalaire public (x7)...");
    let mut scaled = c1.dup();
    scaled.mul_by(&kp.public_key, &BigUint::from(7u32), &mut rng)?;
    let plain_scaled = decrypt(&kp.secret_key, &kp.public_key, &scaled)?;
    println!("  Dec(c1) * 7 = {plain_scaled} (attendu : 210)");
    assert_eq!(plain_scaled, 210);

    println!("Re-randomisation de c1 (Touch)...");
    let mut touched = c1.dup();
    touched.touch(&kp.public_key, &mut rng)?;
    assert_ne!(touched.c, c1.c);
    assert_eq!(decrypt(&kp.secret_key, &kp.public_key, &touched)?, 30);
    println!("  chiffré changé, texte clair inchangé");

    println!("Comparaison privée (30 vs 12)...");
    let order = private_compare(&kp.public_key, &kp.secret_key, &c1, &c2, &mut rng)?;
    println!("  ordre : {order} (attendu : 1, c1 > c2)");

    Ok(())
}

fn main() {
    if let Err(e) = demonstration_paillier() {
        eprintln!("échec de la démonstration : {e}");
        std::process::exit(1);
    }
}
