// Coeur du compteur chiffré homomorphe (Paillier, accéléré par CRT).
//
// Aucune fonction ici ne panique sur une entrée attaquant-contrôlée : toute
// opération fallible renvoie un `CryptoError`.

pub mod compare;
pub mod counter;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod fastmath;
pub mod keygen;
pub mod keys;
pub mod math;
pub mod registry;
pub mod rng;
pub mod serialize;
pub mod update;

pub use compare::{compare, private_compare};
pub use counter::{Counter, CounterVersion};
pub use decrypt::decrypt;
pub use encrypt::encrypt;
pub use error::CryptoError;
pub use keygen::keygen;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use registry::{KeyRegistry, RegistryError};
pub use rng::SystemRng;
pub use serialize::KeyString;
