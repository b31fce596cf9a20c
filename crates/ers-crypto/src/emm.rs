use std::collections::BTreeMap;

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key as AesKey, Nonce};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::EmmError;

type HmacSha256 = Hmac<Sha256>;

const NONCE_LEN: usize = 12;

/// Opaque server-side storage: ciphertext label -> `nonce || ciphertext`.
/// Carries no information linking entries back to their plaintext label.
pub type EncryptedDb = BTreeMap<[u8; 32], Vec<u8>>;

/// The client's secret master key. Never touches the server: schemes thread
/// it through `build_index`/`trapdoor`/`resolve` explicitly rather than
/// holding it inside any server-visible state.
pub type Key = [u8; 32];

/// `setup(security_bits)` from the library surface: returns fresh random
/// master key material. The security parameter only selects the (fixed,
/// 256-bit) key length here — large enough for HMAC-SHA256 and AES-256-GCM,
/// the two primitives every scheme's [`EmmEngine`] is built from.
pub fn setup(security_bits: u32) -> Key {
    let _ = security_bits;
    let mut master = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut master);
    master
}

/// Derives the HMAC and AEAD subkeys from a single master key and exposes
/// `token`, `build`, `search`, and `resolve` over that key.
pub struct EmmEngine {
    hmac_key: [u8; 32],
    enc_key: [u8; 32],
}

impl EmmEngine {
    /// Rebuilds the engine from a previously generated master key.
    pub fn from_master_key(master: &Key) -> Self {
        Self {
            hmac_key: derive_subkey(master, b"hmac"),
            enc_key: derive_subkey(master, b"encryption"),
        }
    }

    /// `label -> token`: `HMAC-SHA256(hmac_key, label)`. Deterministic —
    /// identical label always yields identical token.
    pub fn token(&self, label: &[u8]) -> [u8; 32] {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.hmac_key)
            .expect("HMAC accepts any key length");
        mac.update(label);
        mac.finalize().into_bytes().into()
    }

    /// Encrypts a plaintext `label -> list<value>` multi-map into an
    /// [`EncryptedDb`]. Each value under a label gets its own ciphertext
    /// label `SHA-256(token || LE(i))`; a collision between two different
    /// labels' ciphertext labels is a [`EmmError::CorruptIndex`] — it would
    /// mean the server could not tell the two apart.
    pub fn build(
        &self,
        plaintext: &BTreeMap<Vec<u8>, Vec<Vec<u8>>>,
    ) -> Result<EncryptedDb, EmmError> {
        let mut db = EncryptedDb::new();
        let mut rng = rand::thread_rng();
        for (label, values) in plaintext {
            let token = self.token(label);
            for (i, value) in values.iter().enumerate() {
                let ct_label = ciphertext_label(&token, i as u64);
                if db.contains_key(&ct_label) {
                    return Err(EmmError::CorruptIndex(format!(
                        "ciphertext label collision at index {i}"
                    )));
                }
                let mut nonce_bytes = [0u8; NONCE_LEN];
                rng.fill_bytes(&mut nonce_bytes);
                let ciphertext = self.encrypt(&nonce_bytes, value);
                let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
                blob.extend_from_slice(&nonce_bytes);
                blob.extend_from_slice(&ciphertext);
                db.insert(ct_label, blob);
            }
        }
        Ok(db)
    }

    /// Walks `ciphertext_label(token, 0), ciphertext_label(token, 1), ...`
    /// against `db`, collecting encrypted blobs until the first miss — the
    /// multi-map's values under `token`'s label are stored contiguously
    /// from index 0, so a miss means there are no more.
    ///
    /// Takes no key: the server that holds `db` runs this against a
    /// client-issued token alone, never the master key.
    pub fn search<'a>(db: &'a EncryptedDb, token: &[u8; 32]) -> Vec<&'a [u8]> {
        let mut results = Vec::new();
        let mut i = 0u64;
        loop {
            let ct_label = ciphertext_label(token, i);
            match db.get(&ct_label) {
                Some(blob) => {
                    results.push(blob.as_slice());
                    i += 1;
                }
                None => break,
            }
        }
        results
    }

    /// Decrypts a set of raw `search` results. Any blob that fails AEAD
    /// verification is [`EmmError::Tampering`] — fatal for that blob, but
    /// does not poison the rest of the batch's decryption.
    pub fn resolve(&self, ciphertexts: &[&[u8]]) -> Result<Vec<Vec<u8>>, EmmError> {
        ciphertexts.iter().map(|blob| self.decrypt(blob)).collect()
    }

    fn encrypt(&self, nonce_bytes: &[u8; NONCE_LEN], plaintext: &[u8]) -> Vec<u8> {
        let key = AesKey::<Aes256Gcm>::from_slice(&self.enc_key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(nonce_bytes);
        cipher
            .encrypt(nonce, plaintext)
            .expect("AES-256-GCM encryption over an unbounded-length key cannot fail")
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, EmmError> {
        if blob.len() < NONCE_LEN {
            return Err(EmmError::CorruptIndex("ciphertext blob shorter than a nonce".into()));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let key = AesKey::<Aes256Gcm>::from_slice(&self.enc_key);
        let cipher = Aes256Gcm::new(key);
        let nonce = Nonce::from_slice(nonce_bytes);
        cipher.decrypt(nonce, ciphertext).map_err(|_| EmmError::Tampering)
    }
}

fn derive_subkey(master: &[u8; 32], domain_tag: &[u8]) -> [u8; 32] {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(master).expect("HMAC accepts any key length");
    mac.update(domain_tag);
    mac.finalize().into_bytes().into()
}

fn ciphertext_label(token: &[u8; 32], index: u64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(token);
    hasher.update(index.to_le_bytes());
    hasher.finalize().into()
}
