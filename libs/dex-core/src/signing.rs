//! Signing Module: Order payloads and wallet signatures
//!
//! Builds the byte payloads the matcher verifies and signs them with the
//! wallet's signing capability. The create-order layout is a wire contract:
//! any change in field order or width makes the matcher reject the order
//! with a signature mismatch.
//!
//! Create-order layout:
//!
//! ```text
//! version(1) | sender pk(32) | matcher pk(32) | amount asset | price asset
//! | order type(1) | price(8) | amount(8) | timestamp(8) | expiration(8) | fee(8)
//! ```
//!
//! An asset is `0x00` for the native asset, else `0x01` followed by the raw
//! decoded id. All integers are big-endian `i64`.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};

use types::asset::AssetPair;
use types::errors::DexError;
use types::ids::{Address, AssetId, OrderId};
use types::keys::{PublicKey, Signature};
use types::order::{Order, OrderType, ORDER_VERSION};

// ---------------------------------------------------------------------------
// Wallet
// ---------------------------------------------------------------------------

/// Signing capability of an account.
///
/// `sign` fails with [`SigningError::AuthenticationRequired`] while the
/// private key is unavailable (locked or watch-only wallet).
pub trait Wallet: Send + Sync {
    fn address(&self) -> &Address;

    fn public_key(&self) -> PublicKey;

    fn sign(&self, message: &[u8]) -> Result<Signature, SigningError>;
}

/// Wallet backed by an in-memory Ed25519 key.
pub struct Ed25519Wallet {
    address: Address,
    public_key: PublicKey,
    signing_key: Option<SigningKey>,
}

impl Ed25519Wallet {
    /// Unlocked wallet from a 32-byte secret seed.
    pub fn from_seed(address: Address, seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let public_key = PublicKey::from_bytes(signing_key.verifying_key().to_bytes());
        Self {
            address,
            public_key,
            signing_key: Some(signing_key),
        }
    }

    /// Wallet that knows its public key but cannot sign.
    pub fn watch_only(address: Address, public_key: PublicKey) -> Self {
        Self {
            address,
            public_key,
            signing_key: None,
        }
    }

    /// Drop the private key; subsequent signing requires authentication.
    pub fn lock(&mut self) {
        self.signing_key = None;
    }

    pub fn is_unlocked(&self) -> bool {
        self.signing_key.is_some()
    }
}

impl std::fmt::Debug for Ed25519Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Wallet")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .field("unlocked", &self.is_unlocked())
            .finish()
    }
}

impl Wallet for Ed25519Wallet {
    fn address(&self) -> &Address {
        &self.address
    }

    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn sign(&self, message: &[u8]) -> Result<Signature, SigningError> {
        let key = self
            .signing_key
            .as_ref()
            .ok_or(SigningError::AuthenticationRequired)?;
        Ok(Signature::from_bytes(key.sign(message).to_bytes()))
    }
}

/// Verify an Ed25519 signature over `message`.
pub fn verify(
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), SigningError> {
    let verifying_key = VerifyingKey::from_bytes(public_key.as_bytes())
        .map_err(|_| SigningError::InvalidPublicKey)?;
    let signature = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
    verifying_key
        .verify(message, &signature)
        .map_err(|_| SigningError::VerificationFailed)
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Fields covered by a create-order signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderPayload {
    pub sender_public_key: PublicKey,
    pub matcher_public_key: PublicKey,
    pub pair: AssetPair,
    pub order_type: OrderType,
    pub price: i64,
    pub amount: i64,
    /// Matcher-relative creation time (unix millis)
    pub timestamp: i64,
    /// Matcher-relative expiration time (unix millis)
    pub expiration: i64,
    pub matcher_fee: i64,
}

impl CreateOrderPayload {
    /// Canonical bytes in wire order.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SigningError> {
        let mut bytes = Vec::with_capacity(1 + 32 + 32 + 2 * 33 + 1 + 5 * 8);
        bytes.push(ORDER_VERSION);
        bytes.extend_from_slice(self.sender_public_key.as_bytes());
        bytes.extend_from_slice(self.matcher_public_key.as_bytes());
        encode_asset(&self.pair.amount_asset, &mut bytes)?;
        encode_asset(&self.pair.price_asset, &mut bytes)?;
        bytes.push(self.order_type.as_byte());
        for value in [
            self.price,
            self.amount,
            self.timestamp,
            self.expiration,
            self.matcher_fee,
        ] {
            bytes.extend_from_slice(&value.to_be_bytes());
        }
        Ok(bytes)
    }

    /// Attach `proof` and produce the order body the matcher accepts.
    pub fn into_order(self, proof: Signature) -> Order {
        Order {
            version: ORDER_VERSION,
            sender_public_key: self.sender_public_key,
            matcher_public_key: self.matcher_public_key,
            asset_pair: self.pair,
            order_type: self.order_type,
            price: self.price,
            amount: self.amount,
            timestamp: self.timestamp,
            expiration: self.expiration,
            matcher_fee: self.matcher_fee,
            proofs: vec![proof],
        }
    }
}

/// Append the optional-asset encoding of `asset` to `out`.
pub fn encode_asset(asset: &AssetId, out: &mut Vec<u8>) -> Result<(), SigningError> {
    if asset.is_native() {
        out.push(0);
    } else {
        let raw = asset.decode()?;
        out.push(1);
        out.extend_from_slice(&raw);
    }
    Ok(())
}

/// `sender ‖ order id` bytes signed by a cancel request.
pub fn cancel_order_bytes(
    sender_public_key: &PublicKey,
    order_id: &OrderId,
) -> Result<Vec<u8>, SigningError> {
    let id = order_id.decode()?;
    let mut bytes = Vec::with_capacity(32 + id.len());
    bytes.extend_from_slice(sender_public_key.as_bytes());
    bytes.extend_from_slice(&id);
    Ok(bytes)
}

/// `sender ‖ timestamp` bytes authenticating a "my orders" query.
pub fn timestamp_bytes(sender_public_key: &PublicKey, timestamp: i64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32 + 8);
    bytes.extend_from_slice(sender_public_key.as_bytes());
    bytes.extend_from_slice(&timestamp.to_be_bytes());
    bytes
}

// ---------------------------------------------------------------------------
// Signatures
// ---------------------------------------------------------------------------

pub fn create_order_signature<W: Wallet + ?Sized>(
    wallet: &W,
    payload: &CreateOrderPayload,
) -> Result<Signature, SigningError> {
    wallet.sign(&payload.to_bytes()?)
}

pub fn cancel_order_signature<W: Wallet + ?Sized>(
    wallet: &W,
    order_id: &OrderId,
) -> Result<Signature, SigningError> {
    wallet.sign(&cancel_order_bytes(&wallet.public_key(), order_id)?)
}

pub fn timestamp_signature<W: Wallet + ?Sized>(
    wallet: &W,
    timestamp: i64,
) -> Result<Signature, SigningError> {
    wallet.sign(&timestamp_bytes(&wallet.public_key(), timestamp))
}

/// Sign `payload` and return the submittable order with a single proof.
pub fn sign_order<W: Wallet + ?Sized>(
    wallet: &W,
    payload: CreateOrderPayload,
) -> Result<Order, SigningError> {
    let proof = create_order_signature(wallet, &payload)?;
    Ok(payload.into_order(proof))
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Signing module errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Malformed payload field: {0}")]
    MalformedField(String),

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Signature verification failed")]
    VerificationFailed,
}

impl From<DexError> for SigningError {
    fn from(err: DexError) -> Self {
        match err {
            DexError::AuthenticationRequired => SigningError::AuthenticationRequired,
            other => SigningError::MalformedField(other.to_string()),
        }
    }
}

impl From<SigningError> for DexError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::AuthenticationRequired => DexError::AuthenticationRequired,
            other => DexError::DecodeFailure(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
