use ed25519_dalek::{Keypair, PublicKey, SecretKey, Signer};

use crate::error::{Result, SdkError};

/// A trading keypair for signing orders and cancellations.
///
/// The wallet address is derived from the public key once at construction
/// and cached for the lifetime of the keypair. Nothing is mutable afterwards.
pub struct TradingKeypair {
    inner: Keypair,
    address: String,
}

impl TradingKeypair {
    /// Import a keypair from a base58-encoded secret key (32 bytes).
    /// The public key is derived from the secret key.
    pub fn from_base58_secret(secret_b58: &str) -> Result<Self> {
        let secret_bytes = bs58::decode(secret_b58)
            .into_vec()
            .map_err(|e| SdkError::KeyImport(format!("Invalid base58: {}", e)))?;

        if secret_bytes.len() != 32 {
            return Err(SdkError::KeyImport(format!(
                "Secret key must be 32 bytes, got {}",
                secret_bytes.len()
            )));
        }

        let secret = SecretKey::from_bytes(&secret_bytes)
            .map_err(|e| SdkError::KeyImport(format!("Invalid secret key: {}", e)))?;
        let public = PublicKey::from(&secret);

        Ok(Self::from_parts(Keypair { secret, public }))
    }

    /// Create a keypair from raw 64-byte material.
    /// Format: [secret_key_32_bytes, public_key_32_bytes]
    pub fn from_bytes(bytes: &[u8; 64]) -> Result<Self> {
        let keypair = Keypair::from_bytes(bytes)
            .map_err(|e| SdkError::KeyImport(format!("Invalid keypair bytes: {}", e)))?;
        Ok(Self::from_parts(keypair))
    }

    /// Generate a new random keypair (useful for testing).
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        Self::from_parts(Keypair::generate(&mut csprng))
    }

    fn from_parts(inner: Keypair) -> Self {
        let address = bs58::encode(inner.public.to_bytes()).into_string();
        Self { inner, address }
    }

    /// The canonical wallet address: base58 of the public key.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.inner.public.to_bytes()
    }

    /// Sign a message and return the signature bytes.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.inner.sign(message).to_bytes()
    }

    /// Sign a message and return the signature as a hex string.
    pub fn sign_hex(&self, message: &[u8]) -> String {
        hex::encode(self.sign(message))
    }
}

impl From<Keypair> for TradingKeypair {
    /// Wrap an already-constructed key-pair.
    fn from(inner: Keypair) -> Self {
        Self::from_parts(inner)
    }
}

impl std::fmt::Debug for TradingKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradingKeypair")
            .field("address", &self.address)
            .finish()
    }
}
