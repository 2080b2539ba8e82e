use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use crowdchain_contract::CampaignView;

use crate::{
    error::ApiError,
    state::ProxyState,
    types::{
        CreateCampaignRequest, CreateCampaignResponse, MISSING_GOAL_OR_DURATION,
        MISSING_PLEDGE_VALUE, PledgeRequest, TransactionResponse, parse_campaign_id, parse_uint,
    },
};

type PathId = Result<Path<String>, PathRejection>;
type Body<T> = Result<Json<T>, JsonRejection>;

/// Unwraps a JSON body. A request that is not `application/json` is treated as carrying no
/// fields and rejected with `missing`.
fn json_body<T>(payload: Body<T>, missing: &'static str) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(ApiError::invalid(missing)),
        Err(rejection) => Err(rejection.into()),
    }
}

pub(crate) async fn health() -> &'static str {
    "Backend API is running!"
}

pub(crate) async fn create_campaign(
    State(state): State<ProxyState>,
    payload: Body<CreateCampaignRequest>,
) -> Result<Json<CreateCampaignResponse>, ApiError> {
    let request = json_body(payload, MISSING_GOAL_OR_DURATION)?;
    let goal = parse_uint("goal", request.goal.as_ref())?;
    let duration = parse_uint("duration", request.duration.as_ref())?;
    let (Some(goal), Some(duration)) = (goal, duration) else {
        return Err(ApiError::invalid(MISSING_GOAL_OR_DURATION));
    };

    debug!(target: "proxy", %goal, %duration, "creating campaign");
    let confirmation = state.backend().create_campaign(goal, duration).await?;
    info!(
        target: "proxy",
        tx_hash = %confirmation.tx_hash, campaign_id = ?confirmation.campaign_id,
        "campaign created"
    );
    Ok(Json(confirmation.into()))
}

pub(crate) async fn get_campaign(
    State(state): State<ProxyState>,
    id: PathId,
) -> Result<Json<CampaignView>, ApiError> {
    let Path(id) = id?;
    let id = parse_campaign_id(&id)?;
    Ok(Json(state.backend().get_campaign(id).await?))
}

pub(crate) async fn pledge(
    State(state): State<ProxyState>,
    id: PathId,
    payload: Body<PledgeRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let Path(id) = id?;
    let id = parse_campaign_id(&id)?;
    let request = json_body(payload, MISSING_PLEDGE_VALUE)?;
    let value = parse_uint("value", request.value.as_ref())?
        .ok_or_else(|| ApiError::invalid(MISSING_PLEDGE_VALUE))?;

    debug!(target: "proxy", %id, %value, "pledging");
    let confirmation = state.backend().pledge(id, value).await?;
    Ok(Json(TransactionResponse::new("Pledge successful!", confirmation)))
}

pub(crate) async fn withdraw(
    State(state): State<ProxyState>,
    id: PathId,
) -> Result<Json<TransactionResponse>, ApiError> {
    let Path(id) = id?;
    let id = parse_campaign_id(&id)?;
    let confirmation = state.backend().withdraw(id).await?;
    Ok(Json(TransactionResponse::new("Funds withdrawn successfully!", confirmation)))
}

pub(crate) async fn refund(
    State(state): State<ProxyState>,
    id: PathId,
) -> Result<Json<TransactionResponse>, ApiError> {
    let Path(id) = id?;
    let id = parse_campaign_id(&id)?;
    let confirmation = state.backend().refund(id).await?;
    Ok(Json(TransactionResponse::new("Refund successful!", confirmation)))
}
