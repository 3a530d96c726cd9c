//! The issuer signing identity.

use ed25519_dalek::{Signature, Signer, SigningKey};
use sha2::{Digest, Sha256};

use super::LedgerError;

/// Number of leading digest bytes used for the issuer address.
const ADDRESS_BYTES: usize = 20;

/// Ed25519 signing identity of the issuer.
///
/// The address is derived from the verifying key; the transaction sequence
/// number (nonce) is tracked by [`super::LedgerClient`], which also
/// serializes submissions so only one transaction per identity is ever in
/// flight.
pub struct IssuerSigner {
    signing_key: SigningKey,
    address: String,
}

impl IssuerSigner {
    /// Build a signer from a hex-encoded 32-byte ed25519 secret key.
    pub fn from_hex(hex_key: &str) -> Result<Self, LedgerError> {
        let raw = hex::decode(hex_key.trim())
            .map_err(|e| LedgerError::InvalidKey(e.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| LedgerError::InvalidKey("signing key must be 32 bytes".to_string()))?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&bytes)))
    }

    /// Generate a fresh random identity. Test and bootstrap helper.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self::from_signing_key(SigningKey::generate(&mut rng))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying = signing_key.verifying_key();
        let digest = Sha256::digest(verifying.to_bytes());
        let address = format!("0x{}", hex::encode(&digest[..ADDRESS_BYTES]));
        Self {
            signing_key,
            address,
        }
    }

    /// The issuer address recorded on every transaction.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Hex-encoded public key, sent alongside each signature.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign the sha256 digest of a canonical payload; returns hex.
    pub fn sign_payload(&self, payload: &[u8]) -> String {
        let digest = Sha256::digest(payload);
        let signature: Signature = self.signing_key.sign(&digest);
        hex::encode(signature.to_bytes())
    }
}
