//! Input validation for API requests.
//!
//! Field validators return a human-readable message; request validators
//! collect them into a single 400 response.

use lazy_static::lazy_static;
use regex::Regex;

use super::response::ApiResponse;
use crate::db::UpdateRenterRequest;

lazy_static! {
    /// ID card numbers: digits and letters, optionally grouped by dashes, dots or spaces
    static ref ID_CARD_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9]+([-. ][A-Za-z0-9]+)*$"
    ).unwrap();
}

const MAX_RENTER_LEN: usize = 100;
const MAX_ID_CARD_LEN: usize = 32;

/// Validate a renter's display name
pub fn validate_renter_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Renter name is required".to_string());
    }
    if name.chars().count() > MAX_RENTER_LEN {
        return Err(format!(
            "Renter name is too long (max {} characters)",
            MAX_RENTER_LEN
        ));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err("Renter name contains invalid characters".to_string());
    }
    Ok(())
}

/// Validate an ID card reference
pub fn validate_id_card(id_card: &str) -> Result<(), String> {
    let id_card = id_card.trim();
    if id_card.is_empty() {
        return Err("ID card is required".to_string());
    }
    if id_card.len() > MAX_ID_CARD_LEN {
        return Err(format!(
            "ID card is too long (max {} characters)",
            MAX_ID_CARD_LEN
        ));
    }
    if !ID_CARD_REGEX.is_match(id_card) {
        return Err("ID card may only contain letters, digits and separators".to_string());
    }
    Ok(())
}

/// Validate the body of a renter update
pub fn validate_renter_request(req: &UpdateRenterRequest) -> Result<(), ApiResponse> {
    let mut errors = Vec::new();

    if let Err(e) = validate_renter_name(&req.renter) {
        errors.push(e);
    }
    if let Err(e) = validate_id_card(&req.id_card) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiResponse::bad_request(errors.join("; ")))
    }
}
