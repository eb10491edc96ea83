//! HTTP endpoints of the loyalty read gateway.
//!
//! Every collection endpoint takes the same query parameters: `contract`
//! (required, the loyalty program address) and `network` (optional, defaults
//! to the reference deployment network). Member-scoped endpoints additionally
//! take `member` or `user`.
//!
//! Responses are JSON: `{ "success": true, "items": [...] }` on success, or
//! `{ "error": "..." }` with status 400 (bad input), 404 (network not
//! configured), or 500 (identifier-list fetch failed). Per-item fetch
//! failures never fail a request; they surface as placeholder items with
//! `available: false`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

use alloy_primitives::Address;

use crate::gateway::{GatewayError, LoyaltyGateway};
use crate::network::Network;
use crate::provider_cache::SourceMap;
use crate::types::{BatchResponse, ErrorResponse, MemberDetailsResponse};

/// Builds the gateway route set. State is attached by the caller.
pub fn routes<M>() -> Router<Arc<LoyaltyGateway<M>>>
where
    M: SourceMap + Send + Sync + 'static,
{
    Router::new()
        .route("/supported", get(get_supported::<M>))
        .route("/bounties", get(get_bounties::<M>))
        .route("/prizes", get(get_prizes::<M>))
        .route("/reward-templates", get(get_reward_templates::<M>))
        .route("/members", get(get_members::<M>))
        .route("/members/details", get(get_member_details::<M>))
        .route("/vouchers", get(get_user_vouchers::<M>))
}

#[derive(Debug, Deserialize)]
struct ContractQuery {
    network: Option<String>,
    contract: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemberQuery {
    network: Option<String>,
    contract: Option<String>,
    member: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoucherQuery {
    network: Option<String>,
    contract: Option<String>,
    user: Option<String>,
}

/// `GET /supported`: lists the networks this gateway serves.
#[instrument(skip_all)]
async fn get_supported<M>(State(gateway): State<Arc<LoyaltyGateway<M>>>) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    (StatusCode::OK, Json(gateway.supported())).into_response()
}

/// `GET /bounties`: active bounties of one loyalty program.
#[instrument(skip_all)]
async fn get_bounties<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<ContractQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    match gateway.active_bounties(network, contract).await {
        Ok(items) => batch_response(items),
        Err(error) => error_response(error, "Failed to fetch bounties from contract"),
    }
}

/// `GET /prizes`: active prizes of one loyalty program.
#[instrument(skip_all)]
async fn get_prizes<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<ContractQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    match gateway.active_prizes(network, contract).await {
        Ok(items) => batch_response(items),
        Err(error) => error_response(error, "Failed to fetch prizes from contract"),
    }
}

/// `GET /reward-templates`: active reward templates of one loyalty program.
#[instrument(skip_all)]
async fn get_reward_templates<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<ContractQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    match gateway.reward_templates(network, contract).await {
        Ok(items) => batch_response(items),
        Err(error) => error_response(error, "Failed to fetch reward templates from contract"),
    }
}

/// `GET /members`: enrolled members with their point totals.
#[instrument(skip_all)]
async fn get_members<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<ContractQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    match gateway.members(network, contract).await {
        Ok(items) => batch_response(items),
        Err(error) => error_response(error, "Failed to fetch members from contract"),
    }
}

/// `GET /members/details`: one member's completed bounties, owned vouchers,
/// and claimed prizes.
#[instrument(skip_all)]
async fn get_member_details<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<MemberQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    let member = match require_address(query.member.as_deref(), "member") {
        Ok(member) => member,
        Err(response) => return response,
    };
    match gateway.member_details(network, contract, member).await {
        Ok(details) => (
            StatusCode::OK,
            Json(MemberDetailsResponse {
                success: true,
                details,
            }),
        )
            .into_response(),
        Err(error) => error_response(error, "Failed to fetch member details from contract"),
    }
}

/// `GET /vouchers`: vouchers owned by one user.
#[instrument(skip_all)]
async fn get_user_vouchers<M>(
    State(gateway): State<Arc<LoyaltyGateway<M>>>,
    Query(query): Query<VoucherQuery>,
) -> Response
where
    M: SourceMap + Send + Sync + 'static,
{
    let (network, contract) = match scope(&query.network, &query.contract) {
        Ok(scope) => scope,
        Err(response) => return response,
    };
    let user = match require_address(query.user.as_deref(), "user") {
        Ok(user) => user,
        Err(response) => return response,
    };
    match gateway.user_vouchers(network, contract, user).await {
        Ok(items) => batch_response(items),
        Err(error) => error_response(error, "Failed to fetch user vouchers from contract"),
    }
}

/// Validates the shared `network`/`contract` parameters.
fn scope(
    network: &Option<String>,
    contract: &Option<String>,
) -> Result<(Network, Address), Response> {
    let network = match network {
        None => Network::default(),
        Some(name) => name
            .parse()
            .map_err(|_| bad_request(format!("unknown network: {name}")))?,
    };
    let contract = require_address(contract.as_deref(), "contract")?;
    Ok((network, contract))
}

fn require_address(value: Option<&str>, name: &str) -> Result<Address, Response> {
    let raw = value.ok_or_else(|| bad_request(format!("{name} parameter is required")))?;
    raw.parse()
        .map_err(|_| bad_request(format!("{name} parameter is not a valid address")))
}

fn batch_response<T: serde::Serialize>(items: Vec<T>) -> Response {
    (
        StatusCode::OK,
        Json(BatchResponse {
            success: true,
            items,
        }),
    )
        .into_response()
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
}

fn error_response(error: GatewayError, context: &str) -> Response {
    tracing::warn!(error = %error, "{}", context);
    match error {
        GatewayError::UnsupportedNetwork(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: error.to_string(),
            }),
        )
            .into_response(),
        GatewayError::ListFetch(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: context.to_string(),
            }),
        )
            .into_response(),
    }
}
