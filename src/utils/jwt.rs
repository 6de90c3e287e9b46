//! Utilidades JWT
//!
//! El cliente no conoce el secreto del servidor: sólo lee los claims del
//! access token para saber si ha caducado. La firma la verifica el servidor.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Claims del access token emitido por el backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub exp: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Validar formato de token (básico)
pub fn validate_token_format(token: &str) -> Result<(), AppError> {
    if token.is_empty() {
        return Err(AppError::Jwt("Token no puede estar vacío".to_string()));
    }

    if token.split('.').count() != 3 {
        return Err(AppError::Jwt("Token debe tener 3 partes separadas por puntos".to_string()));
    }

    Ok(())
}

/// Leer los claims sin verificar la firma
pub fn read_claims(token: &str) -> Result<AccessClaims, AppError> {
    validate_token_format(token)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AppError::Jwt(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

/// Verificar si un token ha expirado a una fecha dada
pub fn is_token_expired(claims: &AccessClaims, now: DateTime<Utc>) -> bool {
    claims.exp <= now.timestamp()
}
