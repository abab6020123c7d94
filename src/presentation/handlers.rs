// HTTP request handlers
use crate::domain::panel::PanelId;
use crate::infrastructure::chunked_json::stream_from_store;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use crate::presentation::render::{render, RenderedPanel};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RefreshAccepted {
    pub panel: PanelId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Every panel in dashboard order
pub async fn list_panels(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let panels: Vec<RenderedPanel> = state
        .context
        .store()
        .snapshot_all()
        .iter()
        .map(render)
        .collect();

    match json_response(&panels, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// One panel
pub async fn get_panel(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let panel: PanelId = id.parse()?;
    let snapshot = state
        .context
        .store()
        .snapshot(panel)
        .ok_or(ApiError::NotScheduled(panel))?;

    Ok(match json_response(&render(&snapshot), accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    })
}

/// Manual refresh, optionally switching the panel's input (ticker, country, city)
pub async fn request_refresh(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RefreshAccepted>), ApiError> {
    let panel: PanelId = id.parse()?;
    if !state.context.store().contains(panel) {
        return Err(ApiError::NotScheduled(panel));
    }

    let request = match body {
        Ok(Json(request)) => request,
        // A bare POST carries no body and no content type
        Err(JsonRejection::MissingJsonContentType(_)) => RefreshRequest::default(),
        Err(rejection) => return Err(ApiError::InvalidBody(rejection.body_text())),
    };

    let input = match request.input {
        Some(raw) if panel.takes_input() => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::BlankInput(panel));
            }
            Some(trimmed.to_string())
        }
        Some(_) => {
            tracing::debug!("Ignoring input for {}, which takes none", panel);
            None
        }
        None => None,
    };

    state
        .context
        .request_refresh(panel, input.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error queueing refresh for {}: {:#}", panel, e);
            ApiError::SchedulerStopped
        })?;
    tracing::info!("Manual refresh queued for {} (input: {:?})", panel, input);

    Ok((StatusCode::ACCEPTED, Json(RefreshAccepted { panel, input })))
}

/// Live updates as newline-delimited JSON
pub async fn stream_panels(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    stream_from_store(
        state.context.store(),
        state.context.shutdown_signal(),
        accepts_brotli(&headers),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_context::DashboardContext;
    use crate::application::data_client::DataClient;
    use crate::application::scheduler::PanelSchedule;
    use crate::domain::panel::PanelStatus;
    use crate::infrastructure::clients::MarketCapClient;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};
    use std::time::Duration;

    fn app_state() -> Arc<AppState> {
        let clients: Vec<Arc<dyn DataClient>> = vec![Arc::new(MarketCapClient)];
        let schedules = vec![
            PanelSchedule::new(PanelId::MarketCap, Duration::from_secs(3600), None),
            PanelSchedule::new(PanelId::Equity, Duration::from_secs(3600), Some("AAPL".to_string())),
        ];
        Arc::new(AppState {
            context: Arc::new(DashboardContext::start(clients, schedules)),
        })
    }

    /// Run the JSON extractor over a raw request body, as the router would.
    async fn refresh_body(content_type: Option<&str>, body: &str) -> Result<Json<RefreshRequest>, JsonRejection> {
        let mut request = Request::builder().method("POST").uri("/panels/equity/refresh");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();
        Json::<RefreshRequest>::from_request(request, &()).await
    }

    fn with_input(input: &str) -> Result<Json<RefreshRequest>, JsonRejection> {
        Ok(Json(RefreshRequest {
            input: Some(input.to_string()),
        }))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_list_panels_in_dashboard_order() {
        let state = app_state();

        let response = list_panels(HeaderMap::new(), State(state.clone())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let panels = body_json(response).await;
        assert_eq!(panels[0]["panel"], "equity");
        assert_eq!(panels[1]["panel"], "market_cap");
        state.context.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_panel_rejects_unknown_and_disabled_panels() {
        let state = app_state();

        let unknown = get_panel(Path("stocks".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert!(matches!(unknown, Err(ApiError::UnknownPanel(_))));
        assert_eq!(unknown.into_response().status(), StatusCode::NOT_FOUND);

        let disabled = get_panel(Path("news".to_string()), HeaderMap::new(), State(state.clone())).await;
        assert!(matches!(disabled, Err(ApiError::NotScheduled(PanelId::News))));

        let equity = get_panel(Path("equity".to_string()), HeaderMap::new(), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(body_json(equity).await["input"], "AAPL");
        state.context.shutdown().await;
    }

    #[tokio::test]
    async fn test_refresh_validates_input() {
        let state = app_state();

        let blank = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            with_input("   "),
        )
        .await;
        assert_eq!(blank.unwrap_err().status(), StatusCode::BAD_REQUEST);

        let (status, Json(accepted)) = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            with_input(" GOOG "),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(
            accepted,
            RefreshAccepted {
                panel: PanelId::Equity,
                input: Some("GOOG".to_string()),
            }
        );

        let (_, Json(no_input)) = request_refresh(
            Path("market_cap".to_string()),
            State(state.clone()),
            with_input("ignored"),
        )
        .await
        .unwrap();
        assert_eq!(no_input.input, None);
        state.context.shutdown().await;
    }

    #[tokio::test]
    async fn test_refresh_body_must_be_well_formed() {
        let state = app_state();

        let wrong_type = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            refresh_body(Some("application/json"), r#"{"input": 123}"#).await,
        )
        .await;
        let error = wrong_type.unwrap_err();
        assert!(matches!(error, ApiError::InvalidBody(_)));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);

        let broken = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            refresh_body(Some("application/json"), r#"{"input": "#).await,
        )
        .await;
        assert_eq!(broken.unwrap_err().status(), StatusCode::BAD_REQUEST);

        let (status, Json(bare)) = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            refresh_body(None, "").await,
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(bare.input, None);

        let (_, Json(empty_object)) = request_refresh(
            Path("equity".to_string()),
            State(state.clone()),
            refresh_body(Some("application/json"), "{}").await,
        )
        .await
        .unwrap();
        assert_eq!(empty_object.input, None);
        state.context.shutdown().await;
    }

    #[tokio::test]
    async fn test_refresh_after_shutdown_is_unavailable() {
        let state = app_state();
        state.context.shutdown().await;

        let result = request_refresh(
            Path("market_cap".to_string()),
            State(state.clone()),
            refresh_body(None, "").await,
        )
        .await;

        assert_eq!(result.unwrap_err().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_market_cap_becomes_ready() {
        let state = app_state();
        let mut updates = state.context.store().subscribe();

        let ready = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let update = updates.recv().await.unwrap();
                if update.panel == PanelId::MarketCap && update.status == PanelStatus::Ready {
                    return update;
                }
            }
        })
        .await
        .unwrap();

        let body = body_json(
            get_panel(Path("market_cap".to_string()), HeaderMap::new(), State(state.clone()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(ready.request_seq, 1);
        assert_eq!(body["body"]["kind"], "bar_chart");
        assert_eq!(body["body"]["bars"].as_array().unwrap().len(), 8);
        state.context.shutdown().await;
    }
}
