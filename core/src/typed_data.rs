//! EIP-712 typed-data signing for the staking precompile and r/s/v decomposition of the
//! resulting signature.
//!
//! Two messages are signed here: the `Staking` demo message under the page's domain, and the
//! `DelegateMessage` the precompile verifies in `delegateByMessage`, under the chain's own
//! domain (upper-cased application name, version `1.0.0`, string salt).

use alloy::primitives::{hex, keccak256, Address, Signature, B256, U256};
use alloy::sol_types::{eip712_domain, Eip712Domain, SolStruct};
use serde::Serialize;
use serde_json::{json, Value};

use crate::abi::IStakingCpc::DelegateMessage;
use crate::abi::{Staking, EIP712Domain};
use crate::error::{DappError, Result};

pub const DOMAIN_NAME: &str = "Staking - Precompiled Contract";
pub const DOMAIN_VERSION: &str = "1";
pub const PRIMARY_TYPE: &str = "Staking";

pub const MESSAGE_DOMAIN_VERSION: &str = "1.0.0";
pub const MESSAGE_PRIMARY_TYPE: &str = "DelegateMessage";
/// Only action `delegateByMessage` accepts.
pub const DELEGATE_ACTION: &str = "Delegate";

/// Hex characters in a 65-byte signature, marker excluded.
const SIGNATURE_HEX_LEN: usize = 130;

/// Components of a 65-byte secp256k1 signature, as hex text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureParts {
    /// Bytes [0, 32), 0x-prefixed.
    pub r: String,
    /// Bytes [32, 64), 0x-prefixed.
    pub s: String,
    /// Byte 64.
    pub v: u8,
}

impl std::fmt::Display for SignatureParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, " r = {} \n s = {} \n v = {}", self.r, self.s, self.v)
    }
}

impl SignatureParts {
    /// r and s as 32-byte words.
    pub fn words(&self) -> Result<(B256, B256)> {
        Ok((parse_word(&self.r)?, parse_word(&self.s)?))
    }

    /// Recover the signing address for `hash`. Accepts v as 0/1 or 27/28.
    pub fn recover(&self, hash: B256) -> Result<Address> {
        let (r, s) = self.words()?;
        let y_parity = match self.v {
            0 | 27 => false,
            1 | 28 => true,
            other => {
                return Err(DappError::InvalidSignature(format!(
                    "Unsupported recovery id v={other}"
                )))
            }
        };
        Signature::new(U256::from_be_bytes(r.0), U256::from_be_bytes(s.0), y_parity)
            .recover_address_from_prehash(&hash)
            .map_err(|e| DappError::InvalidSignature(format!("Cannot recover signer: {e}")))
    }
}

/// Split a `0x`-marked hex signature into r/s/v by fixed offsets.
pub fn split_signature(signature: &str) -> Result<SignatureParts> {
    let body = signature.get(2..).ok_or_else(|| {
        DappError::InvalidSignature(format!("Signature '{signature}' is too short"))
    })?;
    if body.len() != SIGNATURE_HEX_LEN {
        return Err(DappError::InvalidSignature(format!(
            "Expected {SIGNATURE_HEX_LEN} hex characters after the marker, got {}",
            body.len()
        )));
    }
    if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DappError::InvalidSignature(format!(
            "Signature '{signature}' is not hex-encoded"
        )));
    }

    let v = u8::from_str_radix(&body[128..130], 16)
        .map_err(|e| DappError::InvalidSignature(format!("Invalid v byte: {e}")))?;
    Ok(SignatureParts {
        r: format!("0x{}", &body[0..64]),
        s: format!("0x{}", &body[64..128]),
        v,
    })
}

fn parse_word(word: &str) -> Result<B256> {
    let bytes = hex::decode(word)
        .map_err(|e| DappError::InvalidSignature(format!("Invalid signature word '{word}': {e}")))?;
    if bytes.len() != 32 {
        return Err(DappError::InvalidSignature(format!(
            "Signature word '{word}' must be 32 bytes"
        )));
    }
    Ok(B256::from_slice(&bytes))
}

/// Signing domain for the staking contract on `chain_id`.
pub fn domain(chain_id: u64, verifying_contract: Address) -> Eip712Domain {
    eip712_domain! {
        name: DOMAIN_NAME,
        version: DOMAIN_VERSION,
        chain_id: chain_id,
        verifying_contract: verifying_contract,
    }
}

/// Demo message: delegate one whole token (18 decimals) to `validator`.
pub fn demo_message(account: Address, validator: &str, denom: &str) -> Staking {
    Staking {
        action: DELEGATE_ACTION.to_string(),
        account,
        toValidator: validator.to_string(),
        fromValidator: String::new(),
        amount: U256::from(10u64).pow(U256::from(18u64)),
        denom: denom.to_string(),
    }
}

/// `eth_signTypedData_v4` payload for `message`.
pub fn typed_data_payload(
    chain_id: u64,
    verifying_contract: Address,
    message: &Staking,
) -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
            ],
            PRIMARY_TYPE: [
                { "name": "action", "type": "string" },
                { "name": "account", "type": "address" },
                { "name": "toValidator", "type": "string" },
                { "name": "fromValidator", "type": "string" },
                { "name": "amount", "type": "uint256" },
                { "name": "denom", "type": "string" },
            ],
        },
        "primaryType": PRIMARY_TYPE,
        "domain": {
            "name": DOMAIN_NAME,
            "version": DOMAIN_VERSION,
            "chainId": chain_id,
            "verifyingContract": verifying_contract.to_string(),
        },
        "message": {
            "action": message.action,
            "account": message.account.to_string(),
            "toValidator": message.toValidator,
            "fromValidator": message.fromValidator,
            "amount": message.amount.to_string(),
            "denom": message.denom,
        },
    })
}

/// EIP-712 digest the wallet signs for `message`.
pub fn signing_hash(chain_id: u64, verifying_contract: Address, message: &Staking) -> B256 {
    message.eip712_signing_hash(&domain(chain_id, verifying_contract))
}

/// Domain `delegateByMessage` verifies against. The salt is the contract's last address
/// byte as minimal hex, e.g. `0x1`.
pub fn message_domain(name: &str, chain_id: u64, verifying_contract: Address) -> EIP712Domain {
    EIP712Domain {
        name: name.to_string(),
        version: MESSAGE_DOMAIN_VERSION.to_string(),
        chainId: U256::from(chain_id),
        verifyingContract: verifying_contract,
        salt: format!("0x{:x}", verifying_contract[19]),
    }
}

/// Delegation of `amount` base units from `delegator` to a bech32 `validator`.
pub fn delegate_message(
    delegator: Address,
    validator: &str,
    amount: U256,
    denom: &str,
) -> DelegateMessage {
    DelegateMessage {
        action: DELEGATE_ACTION.to_string(),
        delegator,
        validator: validator.to_string(),
        amount,
        denom: denom.to_string(),
    }
}

/// `eth_signTypedData_v4` payload for a `DelegateMessage`.
pub fn delegate_message_payload(domain: &EIP712Domain, message: &DelegateMessage) -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" },
                { "name": "salt", "type": "string" },
            ],
            MESSAGE_PRIMARY_TYPE: [
                { "name": "action", "type": "string" },
                { "name": "delegator", "type": "address" },
                { "name": "validator", "type": "string" },
                { "name": "amount", "type": "uint256" },
                { "name": "denom", "type": "string" },
            ],
        },
        "primaryType": MESSAGE_PRIMARY_TYPE,
        "domain": {
            "name": domain.name,
            "version": domain.version,
            "chainId": domain.chainId.saturating_to::<u64>(),
            "verifyingContract": domain.verifyingContract.to_string(),
            "salt": domain.salt,
        },
        "message": {
            "action": message.action,
            "delegator": message.delegator.to_string(),
            "validator": message.validator,
            "amount": message.amount.to_string(),
            "denom": message.denom,
        },
    })
}

/// EIP-712 digest of a `DelegateMessage` under the string-salted domain.
pub fn delegate_message_hash(domain: &EIP712Domain, message: &DelegateMessage) -> B256 {
    let mut digest = Vec::with_capacity(66);
    digest.extend_from_slice(&[0x19, 0x01]);
    digest.extend_from_slice(domain.eip712_hash_struct().as_slice());
    digest.extend_from_slice(message.eip712_hash_struct().as_slice());
    keccak256(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STAKING_FIXED_ADDRESS;
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;

    const R: &str = "1111111111111111111111111111111111111111111111111111111111111111";
    const S: &str = "2222222222222222222222222222222222222222222222222222222222222222";

    #[test]
    fn splits_by_fixed_offsets() {
        let sig = format!("0x{R}{S}1c");
        let parts = split_signature(&sig).unwrap();
        assert_eq!(parts.r, format!("0x{R}"));
        assert_eq!(parts.s, format!("0x{S}"));
        assert_eq!(parts.v, 28);
    }

    #[test]
    fn preserves_hex_case() {
        let r = "AB".repeat(32);
        let sig = format!("0x{r}{S}1B");
        let parts = split_signature(&sig).unwrap();
        assert_eq!(parts.r, format!("0x{r}"));
        assert_eq!(parts.v, 27);
    }

    #[test]
    fn rejects_wrong_length_or_non_hex() {
        assert!(split_signature("0x").is_err());
        assert!(split_signature("0").is_err());
        assert!(split_signature(&format!("0x{R}{S}")).is_err());
        assert!(split_signature(&format!("0x{R}{S}1c00")).is_err());
        assert!(split_signature(&format!("0x{R}{S}zz")).is_err());
    }

    #[test]
    fn display_lists_components() {
        let parts = split_signature(&format!("0x{R}{S}00")).unwrap();
        assert_eq!(
            parts.to_string(),
            format!(" r = 0x{R} \n s = 0x{S} \n v = 0")
        );
    }

    #[test]
    fn payload_describes_domain_and_message() {
        let account: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let msg = demo_message(account, "evmvaloper1xyz", "wei");
        let payload = typed_data_payload(9000, STAKING_FIXED_ADDRESS, &msg);

        assert_eq!(payload["primaryType"], "Staking");
        assert_eq!(payload["domain"]["name"], "Staking - Precompiled Contract");
        assert_eq!(payload["domain"]["version"], "1");
        assert_eq!(payload["domain"]["chainId"], 9000);
        assert_eq!(payload["message"]["amount"], "1000000000000000000");
        assert_eq!(payload["message"]["action"], "Delegate");
        assert_eq!(payload["message"]["fromValidator"], "");
        assert_eq!(payload["types"]["Staking"].as_array().unwrap().len(), 6);
        assert!(payload["types"].get("StakingMessage").is_none());
    }

    #[test]
    fn recovers_local_signer() {
        let signer = PrivateKeySigner::random();
        let msg = demo_message(signer.address(), "evmvaloper1xyz", "wei");
        let hash = signing_hash(9000, STAKING_FIXED_ADDRESS, &msg);
        let signature = signer.sign_hash_sync(&hash).unwrap();
        let encoded = format!("0x{}", hex::encode(signature.as_bytes()));

        let parts = split_signature(&encoded).unwrap();
        assert!(parts.v == 27 || parts.v == 28);
        assert_eq!(parts.recover(hash).unwrap(), signer.address());

        // The chain accepts 0/1 as well.
        let normalized = SignatureParts {
            v: parts.v - 27,
            ..parts.clone()
        };
        assert_eq!(normalized.recover(hash).unwrap(), signer.address());
    }

    #[test]
    fn message_domain_uses_string_salt() {
        let domain = message_domain("EVERMINT", 9000, STAKING_FIXED_ADDRESS);
        assert_eq!(domain.salt, "0x1");
        assert_eq!(domain.version, "1.0.0");
        assert_eq!(
            EIP712Domain::eip712_encode_type(),
            "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract,string salt)"
        );
        assert_eq!(
            DelegateMessage::eip712_encode_type(),
            "DelegateMessage(string action,address delegator,string validator,uint256 amount,string denom)"
        );
    }

    #[test]
    fn delegate_message_hash_matches_manual_encoding() {
        let domain = message_domain("EVERMINT", 9000, STAKING_FIXED_ADDRESS);
        let delegator: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let message = delegate_message(delegator, "evmvaloper1xyz", U256::from(5u64), "wei");

        let mut encoded = Vec::new();
        encoded.extend_from_slice(
            keccak256(
                "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract,string salt)",
            )
            .as_slice(),
        );
        encoded.extend_from_slice(keccak256("EVERMINT").as_slice());
        encoded.extend_from_slice(keccak256("1.0.0").as_slice());
        encoded.extend_from_slice(&U256::from(9000u64).to_be_bytes::<32>());
        encoded.extend_from_slice(STAKING_FIXED_ADDRESS.into_word().as_slice());
        encoded.extend_from_slice(keccak256("0x1").as_slice());
        let separator = keccak256(&encoded);

        let mut digest = vec![0x19, 0x01];
        digest.extend_from_slice(separator.as_slice());
        digest.extend_from_slice(message.eip712_hash_struct().as_slice());

        assert_eq!(delegate_message_hash(&domain, &message), keccak256(&digest));
    }

    #[test]
    fn delegate_message_payload_mirrors_chain_types() {
        let domain = message_domain("EVERMINT", 9000, STAKING_FIXED_ADDRESS);
        let delegator: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let message = delegate_message(delegator, "evmvaloper1xyz", U256::from(5u64), "wei");
        let payload = delegate_message_payload(&domain, &message);

        assert_eq!(payload["primaryType"], "DelegateMessage");
        assert_eq!(payload["domain"]["salt"], "0x1");
        assert_eq!(payload["domain"]["chainId"], 9000);
        assert_eq!(payload["types"]["EIP712Domain"].as_array().unwrap().len(), 5);
        assert_eq!(payload["message"]["action"], "Delegate");
        assert_eq!(payload["message"]["amount"], "5");
    }

    #[test]
    fn delegate_message_signature_recovers_delegator() {
        let signer = PrivateKeySigner::random();
        let domain = message_domain("EVERMINT", 9000, STAKING_FIXED_ADDRESS);
        let message = delegate_message(signer.address(), "evmvaloper1xyz", U256::from(5u64), "wei");
        let hash = delegate_message_hash(&domain, &message);
        let signature = signer.sign_hash_sync(&hash).unwrap();

        let parts = split_signature(&format!("0x{}", hex::encode(signature.as_bytes()))).unwrap();
        assert_eq!(parts.recover(hash).unwrap(), signer.address());
    }

    #[test]
    fn hash_depends_on_chain() {
        let account: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let msg = demo_message(account, "evmvaloper1xyz", "wei");
        assert_ne!(
            signing_hash(1, STAKING_FIXED_ADDRESS, &msg),
            signing_hash(2, STAKING_FIXED_ADDRESS, &msg)
        );
    }
}
