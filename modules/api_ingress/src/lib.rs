//! HTTP ingress: owns the axum router every REST module mounts into,
//! serves `/health` and `/openapi.json`, and runs the listener.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use axum::{
    http::header,
    middleware::from_fn,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use modkit::api::OpenApiRegistry;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};
use utoipa::OpenApi as _;

mod config;
pub mod request_id;
mod web;

pub use config::ApiIngressConfig;

pub const MODULE_NAME: &str = "api_ingress";

const STOP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(utoipa::OpenApi)]
#[openapi(paths(web::health_check), components(schemas(web::Health)))]
struct IngressApiDoc;

/// API ingress module: REST host, OpenAPI registry and HTTP server.
pub struct ApiIngress {
    config: ArcSwap<ApiIngressConfig>,
    openapi: Mutex<OpenApi>,
    // Router produced by the REST phase, taken by `start`
    final_router: Mutex<Option<Router>>,
    local_addr: Mutex<Option<SocketAddr>>,
    server: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Default for ApiIngress {
    fn default() -> Self {
        Self::new(ApiIngressConfig::default())
    }
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        let mut doc = OpenApiBuilder::new()
            .info(
                InfoBuilder::new()
                    .title("Contacts API")
                    .version(env!("CARGO_PKG_VERSION"))
                    .description(Some("Contacts server API documentation"))
                    .build(),
            )
            .build();
        doc.merge(IngressApiDoc::openapi());

        Self {
            config: ArcSwap::from_pointee(config),
            openapi: Mutex::new(doc),
            final_router: Mutex::new(None),
            local_addr: Mutex::new(None),
            server: Mutex::new(None),
        }
    }

    pub fn get_config(&self) -> ApiIngressConfig {
        (**self.config.load()).clone()
    }

    /// Snapshot of the merged OpenAPI document.
    pub fn openapi_document(&self) -> OpenApi {
        self.openapi.lock().clone()
    }

    /// Address the listener is bound to, once started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    /// Wrap module routes with the ingress endpoints and the global middleware stack.
    ///
    /// Layers are added innermost first. Effective order, outermost to innermost:
    /// SetRequestId -> PropagateRequestId -> Trace -> push_req_id_to_extensions
    /// -> Timeout -> CORS -> BodyLimit.
    pub fn build_router(&self, routes: Router) -> Result<Router> {
        let config = self.get_config();
        let mut router = routes.route("/health", get(web::health_check));

        if config.enable_docs {
            let doc = Arc::new(
                serde_json::to_value(self.openapi_document()).context("serialize OpenAPI")?,
            );
            router = router.route(
                "/openapi.json",
                get(move || {
                    let doc = doc.clone();
                    async move {
                        ([(header::CACHE_CONTROL, "no-store")], Json((*doc).clone())).into_response()
                    }
                }),
            );
        }

        router = router.layer(RequestBodyLimitLayer::new(config.body_limit_bytes));

        if config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_sec,
        )));

        router = router.layer(from_fn(request_id::push_req_id_to_extensions));

        router = router.layer(
            TraceLayer::new_for_http()
                .make_span_with(request_id::make_span)
                .on_response(request_id::record_response),
        );

        let x_request_id = request_id::header();
        router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
        router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

        Ok(router)
    }

    /// Bind, then serve until `cancel` fires.
    async fn serve(&self, router: Router, cancel: CancellationToken) -> Result<()> {
        let cfg = self.get_config();
        let addr: SocketAddr = cfg
            .bind_addr
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", cfg.bind_addr, e))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        let bound = listener.local_addr()?;
        *self.local_addr.lock() = Some(bound);
        tracing::info!("HTTP server bound on {}", bound);

        let shutdown = async move {
            cancel.cancelled().await;
            tracing::info!("HTTP server shutting down gracefully (cancellation)");
        };

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
                .map_err(|e| anyhow::anyhow!(e))
        });
        *self.server.lock() = Some(handle);
        Ok(())
    }
}

#[async_trait]
impl modkit::Module for ApiIngress {
    async fn init(&self, ctx: &modkit::ModuleCtx) -> Result<()> {
        let cfg: ApiIngressConfig = ctx.module_config()?;
        tracing::debug!(module = MODULE_NAME, bind_addr = %cfg.bind_addr, "Module initialized");
        self.config.store(Arc::new(cfg));
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl modkit::RestHostModule for ApiIngress {
    fn rest_prepare(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        tracing::debug!("REST host prepared base router");
        Ok(router)
    }

    fn rest_finalize(&self, _ctx: &modkit::ModuleCtx, router: Router) -> Result<Router> {
        let router = self.build_router(router)?;
        *self.final_router.lock() = Some(router.clone());
        tracing::debug!(
            paths = self.openapi.lock().paths.paths.len(),
            "REST host finalized router"
        );
        Ok(router)
    }

    fn as_registry(&self) -> &dyn OpenApiRegistry {
        self
    }
}

impl OpenApiRegistry for ApiIngress {
    fn register_openapi(&self, doc: OpenApi) {
        let mut current = self.openapi.lock();
        for path in doc.paths.paths.keys() {
            if current.paths.paths.contains_key(path) {
                tracing::warn!(%path, "OpenAPI path registered twice; operations are merged");
            }
        }
        current.merge(doc);
    }
}

#[async_trait]
impl modkit::StatefulModule for ApiIngress {
    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        let stored = { self.final_router.lock().take() };
        let router = match stored {
            Some(r) => r,
            None => {
                tracing::debug!("No router from REST phase, building default router");
                self.build_router(Router::new())?
            }
        };
        self.serve(router, cancel).await
    }

    async fn stop(&self, _cancel: CancellationToken) -> Result<()> {
        let handle = { self.server.lock().take() };
        let Some(handle) = handle else {
            return Ok(());
        };
        match tokio::time::timeout(STOP_TIMEOUT, handle).await {
            Ok(joined) => joined.context("HTTP server task panicked")?,
            Err(_) => {
                tracing::warn!("HTTP server did not stop within {:?}", STOP_TIMEOUT);
                Ok(())
            }
        }
    }
}
