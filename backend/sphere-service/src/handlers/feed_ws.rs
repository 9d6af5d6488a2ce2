use std::time::{Duration, Instant};

use actix::{Actor, ActorContext, AsyncContext, Handler, Message as ActixMessage, StreamHandler};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;
use uuid::Uuid;

use crate::domain::models::Post;
use crate::feed::{FeedScope, SubscriberId};
use crate::services::FeedService;
use crate::state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct FeedWsParams {
    /// Subscribe to one circle's feed; the global feed when absent
    pub circle_id: Option<Uuid>,
}

#[derive(ActixMessage)]
#[rtype(result = "()")]
struct Snapshot(Vec<Post>);

/// WebSocket session streaming feed snapshots for one scope.
///
/// The subscription is registered before the actor starts; a forwarding
/// task moves snapshots from the registry channel into the actor, and
/// the subscription is torn down when the session stops.
struct FeedWsSession {
    scope: FeedScope,
    subscriber_id: SubscriberId,
    rx: Option<UnboundedReceiver<Vec<Post>>>,
    feed: FeedService,
    hb: Instant,
}

impl FeedWsSession {
    fn hb(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.hb) > CLIENT_TIMEOUT {
                tracing::warn!("feed websocket heartbeat timed out, disconnecting");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }
}

impl Actor for FeedWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::info!(scope = ?self.scope, "feed websocket session started");
        self.hb(ctx);

        let addr = ctx.address();
        if let Some(mut rx) = self.rx.take() {
            tokio::spawn(async move {
                while let Some(snapshot) = rx.recv().await {
                    if addr.try_send(Snapshot(snapshot)).is_err() {
                        break;
                    }
                }
            });
        }
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(scope = ?self.scope, "feed websocket session stopped");
        let feed = self.feed.clone();
        let scope = self.scope;
        let id = self.subscriber_id;
        tokio::spawn(async move {
            feed.unsubscribe(scope, id).await;
        });
    }
}

impl Handler<Snapshot> for FeedWsSession {
    type Result = ();

    fn handle(&mut self, msg: Snapshot, ctx: &mut Self::Context) {
        match serde_json::to_string(&msg.0) {
            Ok(payload) => ctx.text(payload),
            Err(err) => tracing::error!(error = %err, "feed snapshot serialization failed"),
        }
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for FeedWsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.hb = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.hb = Instant::now();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(error = %err, "feed websocket protocol error");
                ctx.stop();
            }
        }
    }
}

/// GET /ws/feed
///
/// The current snapshot is delivered on connect, then a fresh one after
/// every write that touches this scope.
#[get("/ws/feed")]
pub async fn feed_ws(
    req: HttpRequest,
    stream: web::Payload,
    params: web::Query<FeedWsParams>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let scope = match params.circle_id {
        Some(circle_id) => FeedScope::Circle(circle_id),
        None => FeedScope::Global,
    };

    let (subscriber_id, rx) = state.feed.subscribe(scope).await?;

    let session = FeedWsSession {
        scope,
        subscriber_id,
        rx: Some(rx),
        feed: state.feed.clone(),
        hb: Instant::now(),
    };
    ws::start(session, &req, stream)
}
