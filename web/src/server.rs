use crate::handlers;
use crate::metrics::MetricsCollector;
use holdem_engine::engine::TournamentEngine;
use holdem_engine::ids::{GameId, HandId};
use holdem_engine::memory::InMemoryRepository;
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;
use warp::filters::BoxedFilter;
use warp::reply::Reply;
use warp::Filter;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

/// Shared state handed to every route: the engine (backed, in this
/// binary, by [`InMemoryRepository`] — spec.md §1 treats a relational
/// backend as out of scope) and the request metrics collector.
#[derive(Clone)]
pub struct AppContext {
    config: ServerConfig,
    engine: Arc<TournamentEngine>,
    metrics: Arc<MetricsCollector>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        let repo = Arc::new(InMemoryRepository::new());
        Self::new_with_engine(config, Arc::new(TournamentEngine::new(repo)))
    }

    pub fn new_with_engine(config: ServerConfig, engine: Arc<TournamentEngine>) -> Self {
        Self {
            config,
            engine,
            metrics: Arc::new(MetricsCollector::new()),
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn engine(&self) -> Arc<TournamentEngine> {
        Arc::clone(&self.engine)
    }

    pub fn metrics(&self) -> Arc<MetricsCollector> {
        Arc::clone(&self.metrics)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    ConfigError(String),
}

#[derive(Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let preflight = if bind_addr.port() != 0 {
            Some(std::net::TcpListener::bind(bind_addr).map_err(ServerError::BindError)?)
        } else {
            None
        };
        drop(preflight);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(|err| ServerError::ConfigError(err.to_string()))?;

        tracing::info!(%addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });

        Ok(ServerHandle::new(addr, shutdown_tx, task, context))
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }
        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;
        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        Self::health_route()
            .or(Self::game_routes(context))
            .unify()
            .boxed()
    }

    fn health_route() -> BoxedFilter<(warp::reply::Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    /// Binds the six commands of spec.md §6 to the routes tabulated in
    /// SPEC_FULL.md §6a.
    fn game_routes(context: &AppContext) -> BoxedFilter<(warp::reply::Response,)> {
        let engine = context.engine();
        let with_engine = Self::with_engine(engine);

        let start_game = warp::path!("api" / "games")
            .and(warp::post())
            .and(with_engine.clone())
            .and(warp::body::json())
            .and_then(
                |engine: Arc<TournamentEngine>, body: handlers::StartGameRequest| async move {
                    Ok::<_, Infallible>(handlers::start_game(engine, body).await)
                },
            );

        let end_game = warp::path!("api" / "games" / Uuid / "end")
            .and(warp::post())
            .and(with_engine.clone())
            .and_then(|id: Uuid, engine: Arc<TournamentEngine>| async move {
                Ok::<_, Infallible>(handlers::end_game(engine, GameId::from(id)).await)
            });

        let active_game = warp::path!("api" / "games" / "active")
            .and(warp::get())
            .and(with_engine.clone())
            .and_then(|engine: Arc<TournamentEngine>| async move {
                Ok::<_, Infallible>(handlers::get_active_game(engine).await)
            });

        let player_action = warp::path!("api" / "games" / Uuid / "hands" / Uuid / "actions")
            .and(warp::post())
            .and(with_engine.clone())
            .and(warp::body::json())
            .and_then(
                |game_id: Uuid,
                 hand_id: Uuid,
                 engine: Arc<TournamentEngine>,
                 body: handlers::PlayerActionBody| async move {
                    Ok::<_, Infallible>(
                        handlers::player_action(
                            engine,
                            GameId::from(game_id),
                            HandId::from(hand_id),
                            body,
                        )
                        .await,
                    )
                },
            );

        let next_hand = warp::path!("api" / "games" / Uuid / "hands" / Uuid / "next")
            .and(warp::post())
            .and(with_engine.clone())
            .and(warp::body::json())
            .and_then(
                |game_id: Uuid,
                 hand_id: Uuid,
                 engine: Arc<TournamentEngine>,
                 body: handlers::NextHandRequest| async move {
                    Ok::<_, Infallible>(
                        handlers::next_hand(
                            engine,
                            GameId::from(game_id),
                            HandId::from(hand_id),
                            body,
                        )
                        .await,
                    )
                },
            );

        let rebuy = warp::path!("api" / "games" / Uuid / "hands" / Uuid / "rebuy")
            .and(warp::post())
            .and(with_engine)
            .and(warp::body::json())
            .and_then(
                |game_id: Uuid,
                 hand_id: Uuid,
                 engine: Arc<TournamentEngine>,
                 body: handlers::RebuyRequest| async move {
                    Ok::<_, Infallible>(
                        handlers::rebuy(engine, GameId::from(game_id), HandId::from(hand_id), body)
                            .await,
                    )
                },
            );

        start_game
            .or(end_game)
            .unify()
            .or(active_game)
            .unify()
            .or(player_action)
            .unify()
            .or(next_hand)
            .unify()
            .or(rebuy)
            .unify()
            .boxed()
    }

    fn with_engine(
        engine: Arc<TournamentEngine>,
    ) -> impl Filter<Extract = (Arc<TournamentEngine>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&engine))
    }
}

pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!("server task join error: {err}")))
                }
            }
        }
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_route_reports_ok() {
        let ctx = AppContext::new_for_tests();
        let routes = WebServer::routes(&ctx);
        let response = warp::test::request().path("/health").reply(&routes).await;
        assert_eq!(response.status(), warp::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn start_game_route_returns_created() {
        let ctx = AppContext::new_for_tests();
        let routes = WebServer::routes(&ctx);
        let response = warp::test::request()
            .method("POST")
            .path("/api/games")
            .json(&serde_json::json!({
                "blind_time_secs": 60,
                "starting_chips": 10000,
                "player_names": ["a", "b", "c", "d"],
            }))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), warp::http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn active_game_route_is_null_before_start() {
        let ctx = AppContext::new_for_tests();
        let routes = WebServer::routes(&ctx);
        let response = warp::test::request()
            .path("/api/games/active")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), warp::http::StatusCode::OK);
        assert_eq!(response.body(), b"null");
    }
}
