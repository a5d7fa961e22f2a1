use axum::Json;
use axum::extract::{Path, State};
use tollgate_ledger::{Adjustment, User};

use crate::error::GatewayError;
use crate::state::GatewayState;

fn parse_user_id(raw: &str) -> Result<i64, GatewayError> {
    raw.parse().map_err(|_| GatewayError::InvalidPath {
        segment: "user id",
        value: raw.to_owned(),
        expected: "a 64-bit integer",
    })
}

fn parse_amount(raw: &str) -> Result<f64, GatewayError> {
    raw.parse().map_err(|_| GatewayError::InvalidPath {
        segment: "amount",
        value: raw.to_owned(),
        expected: "a decimal number",
    })
}

/// `GET /balance/{id}`
pub async fn get_balance(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<User>, GatewayError> {
    let user_id = parse_user_id(&id)?;
    Ok(Json(state.ledger.balance(user_id).await?))
}

/// `/balance-topup/{id}/{amount}`
pub async fn top_up(
    State(state): State<GatewayState>,
    Path((id, amount)): Path<(String, String)>,
) -> Result<Json<User>, GatewayError> {
    let adjustment = Adjustment::credit(parse_user_id(&id)?, parse_amount(&amount)?);
    Ok(Json(state.ledger.adjust(adjustment).await?))
}

/// `/balance-deduct/{id}/{amount}`
pub async fn deduct(
    State(state): State<GatewayState>,
    Path((id, amount)): Path<(String, String)>,
) -> Result<Json<User>, GatewayError> {
    let adjustment = Adjustment::debit(parse_user_id(&id)?, parse_amount(&amount)?);
    Ok(Json(state.ledger.adjust(adjustment).await?))
}
