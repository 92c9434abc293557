// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.
//!
//! Tokens are compact HS256 JWTs. Besides the standard claims they carry the
//! role and an integrity tag over `(sub, role)`; see [`super::integrity`].

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use ring::rand::{SecureRandom, SystemRandom};

use super::claims::{IssuedToken, Principal, TokenClaims};
use super::error::IssuanceError;
use super::integrity::RoleIntegritySigner;
use crate::config::AuthSettings;

/// Random bytes per token id (256 bits).
const TOKEN_ID_BYTES: usize = 32;

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
    signer: RoleIntegritySigner,
    issuer: String,
    audience: String,
    ttl: TimeDelta,
    rng: SystemRandom,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings, signer: RoleIntegritySigner) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&settings.signing_secret),
            header: Header::new(Algorithm::HS256),
            signer,
            issuer: settings.issuer.clone(),
            audience: settings.audience.clone(),
            ttl: TimeDelta::from_std(settings.token_ttl).unwrap_or(TimeDelta::MAX),
            rng: SystemRandom::new(),
        }
    }

    /// Issue a token for an already-verified principal.
    pub fn issue(&self, principal: &Principal) -> Result<IssuedToken, IssuanceError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, IssuanceError> {
        // Claims carry whole seconds; truncate so issued_at/expires_at match them.
        let issued_at = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let token_id = self.token_id()?;

        let claims = TokenClaims {
            sub: principal.username.clone(),
            role: principal.role,
            integrity_tag: self.signer.tag(&principal.username, principal.role),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: token_id.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&self.header, &claims, &self.encoding_key)?;

        Ok(IssuedToken {
            access_token,
            token_id,
            issued_at,
            expires_at,
        })
    }

    fn token_id(&self) -> Result<String, IssuanceError> {
        let mut bytes = [0u8; TOKEN_ID_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| IssuanceError::Entropy)?;
        Ok(Base64UrlUnpadded::encode_string(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::testing::{test_settings, INTEGRITY_SECRET};
    use crate::auth::Role;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use std::collections::HashSet;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            &test_settings(),
            RoleIntegritySigner::new(INTEGRITY_SECRET.as_bytes().to_vec()),
        )
    }

    fn decode_payload(token: &str) -> serde_json::Value {
        let payload = token.split('.').nth(1).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn token_is_compact_hs256_jwt() {
        let token = issuer()
            .issue(&Principal::new("usuario", Role::User))
            .unwrap();

        let parts: Vec<&str> = token.access_token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[0]).unwrap()).unwrap();
        assert_eq!(header["alg"], "HS256");
    }

    #[test]
    fn claims_carry_identity_and_standard_fields() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = issuer()
            .issue_at(&Principal::new("admin", Role::Admin), now)
            .unwrap();

        let claims = decode_payload(&token.access_token);
        assert_eq!(claims["sub"], "admin");
        assert_eq!(claims["role"], "admin");
        assert_eq!(claims["iss"], "rolegate-api");
        assert_eq!(claims["aud"], "rolegate-client");
        assert_eq!(claims["iat"], 1_700_000_000);
        assert_eq!(claims["exp"], 1_700_000_000 + 30 * 60);
        assert_eq!(claims["jti"], token.token_id.as_str());

        let signer = RoleIntegritySigner::new(INTEGRITY_SECRET.as_bytes().to_vec());
        assert_eq!(
            claims["integrity_tag"],
            signer.tag("admin", Role::Admin).as_str()
        );
    }

    #[test]
    fn issued_and_expiry_times_follow_ttl() {
        let now = DateTime::from_timestamp(1_700_000_000, 750_000_000).unwrap();
        let token = issuer()
            .issue_at(&Principal::new("usuario", Role::User), now)
            .unwrap();

        assert_eq!(token.issued_at.timestamp(), 1_700_000_000);
        assert_eq!(token.issued_at.timestamp_subsec_nanos(), 0);
        assert_eq!(token.expires_at - token.issued_at, TimeDelta::minutes(30));
    }

    #[test]
    fn token_ids_are_unique_and_long() {
        let issuer = issuer();
        let principal = Principal::new("usuario", Role::User);

        let ids: HashSet<String> = (0..64)
            .map(|_| issuer.issue(&principal).unwrap().token_id)
            .collect();
        assert_eq!(ids.len(), 64);

        for id in &ids {
            assert_eq!(URL_SAFE_NO_PAD.decode(id).unwrap().len(), TOKEN_ID_BYTES);
        }
    }
}
