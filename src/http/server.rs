//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing, CORS)
//! - Dispatch requests to the route table
//! - Forward requests to the resolved upstream and stream the answer back
//!
//! # Design Decisions
//! - No retries and no circuit breaking; every failure reaches the caller
//! - Bodies are streamed in both directions, never buffered
//! - A client disconnect drops the handler future, which aborts the
//!   in-flight upstream request

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Version},
    middleware,
    response::Response,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response::GatewayError;
use crate::lifecycle::shutdown;
use crate::lifecycle::startup::StartupError;
use crate::observability::metrics;
use crate::registry::{ServiceResolver, StaticRegistry};
use crate::routing::{Route, RouteTable};
use crate::security::{cors, cors_layer, headers};

/// Pooled HTTP/1.1 client used to reach upstreams.
pub type UpstreamClient = Client<HttpConnector, Body>;

type UpstreamResponse = hyper::Response<hyper::body::Incoming>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub resolver: Arc<dyn ServiceResolver>,
    pub client: UpstreamClient,
    pub upstream_timeout: Duration,
}

/// HTTP server for the API gateway.
pub struct GatewayServer {
    router: Router,
    routes: Arc<RouteTable>,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a server that resolves services from `config.services`.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let registry = StaticRegistry::from_config(&config.services)?;
        Self::with_resolver(config, Arc::new(registry))
    }

    /// Create a server with a custom service resolver.
    ///
    /// Every route's target service must resolve at construction time.
    pub fn with_resolver(
        config: GatewayConfig,
        resolver: Arc<dyn ServiceResolver>,
    ) -> Result<Self, StartupError> {
        let routes = Arc::new(RouteTable::from_config(&config.routes)?);

        for route in routes.routes() {
            let address = resolver.resolve(route.service()).map_err(|source| {
                StartupError::UnresolvedService {
                    route: route.id().to_string(),
                    service: route.service().to_string(),
                    source,
                }
            })?;
            tracing::info!(
                route = %route.id(),
                paths = ?route.patterns(),
                upstream = %address.base_url(),
                "Route registered"
            );
        }

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        connector.set_nodelay(true);
        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.timeouts.idle_secs))
            .build(connector);

        let state = AppState {
            routes: routes.clone(),
            resolver,
            client,
            upstream_timeout: Duration::from_secs(config.timeouts.upstream_secs),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            routes,
            config,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(middleware::from_fn(cors::unmask_plain_options))
            .layer(cors_layer(&config.cors))
            .layer(middleware::from_fn(cors::mask_plain_options))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main proxy handler.
/// Looks up route, resolves the service, and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(request.headers()).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Proxying request"
    );

    let Some(route) = state.routes.match_path(&path) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        let error = GatewayError::NoRouteMatched { path };
        metrics::record_request(method.as_str(), error.status().as_u16(), "none", start_time);
        return error.to_response(Some(&request_id));
    };

    let response = match forward(&state, route, request).await {
        Ok(upstream) => {
            let (mut parts, body) = upstream.into_parts();
            headers::strip_hop_by_hop(&mut parts.headers);
            Response::from_parts(parts, Body::new(body))
        }
        Err(error) => {
            tracing::warn!(
                request_id = %request_id,
                route = %route.id(),
                error = %error,
                "Request failed at gateway"
            );
            error.to_response(Some(&request_id))
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        route.id(),
        start_time,
    );
    response
}

/// Send `request` to the upstream behind `route`.
async fn forward(
    state: &AppState,
    route: &Route,
    request: Request<Body>,
) -> Result<UpstreamResponse, GatewayError> {
    let service = route.service();
    let path = request.uri().path().to_string();

    let address = state.resolver.resolve(service).map_err(|e| {
        tracing::error!(service = %service, error = %e, "Service resolution failed");
        GatewayError::ServiceUnresolved {
            service: service.to_string(),
            path: path.clone(),
        }
    })?;

    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let (mut parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());

    parts.uri = address.upstream_uri(&path_and_query).map_err(|e| {
        tracing::error!(service = %service, error = %e, "Invalid upstream URI");
        GatewayError::InvalidUpstreamUri {
            service: service.to_string(),
            path: path.clone(),
        }
    })?;
    parts.version = Version::HTTP_11;
    headers::prepare_upstream_headers(&mut parts.headers, client_addr);

    tracing::debug!(upstream = %parts.uri, route = %route.id(), "Forwarding to upstream");

    let upstream_request = Request::from_parts(parts, body);
    match tokio::time::timeout(state.upstream_timeout, state.client.request(upstream_request)).await
    {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) => {
            tracing::error!(service = %service, error = %e, "Upstream error");
            metrics::record_upstream_failure(service, "unavailable");
            Err(GatewayError::UpstreamUnavailable {
                service: service.to_string(),
                path,
            })
        }
        Err(_) => {
            tracing::error!(
                service = %service,
                timeout_secs = state.upstream_timeout.as_secs(),
                "Upstream timed out"
            );
            metrics::record_upstream_failure(service, "timeout");
            Err(GatewayError::UpstreamTimeout {
                service: service.to_string(),
                path,
                timeout_secs: state.upstream_timeout.as_secs(),
            })
        }
    }
}
