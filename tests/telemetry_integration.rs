//! End-to-end: TreeWatch + TelemetryConnection over an in-memory connector.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use treewatch::behaviors::{fail, sequence, succeed};
use treewatch::{
    BackoffPolicy, Channel, ConnectionConfig, Connector, TelemetryConnection, TransportError,
    TreeWatch, WatchError,
};

#[derive(Clone, Debug, PartialEq)]
enum Frame {
    Emit(String, Vec<Value>),
    KeepAlive,
}

#[derive(Clone, Default)]
struct Wire {
    frames: Arc<Mutex<Vec<Frame>>>,
    opens: Arc<AtomicU32>,
    refuse: Arc<AtomicU32>,
}

impl Wire {
    fn frames(&self) -> Vec<Frame> {
        self.frames.lock().unwrap().clone()
    }

    fn introduces(&self) -> usize {
        self.frames()
            .iter()
            .filter(|f| matches!(f, Frame::Emit(e, _) if e == "introduce"))
            .count()
    }

    fn steps(&self) -> Vec<Vec<Value>> {
        self.frames()
            .into_iter()
            .filter_map(|f| match f {
                Frame::Emit(e, args) if e == "step" => Some(args),
                _ => None,
            })
            .collect()
    }
}

struct WireChannel(Arc<Mutex<Vec<Frame>>>);

#[async_trait]
impl Channel for WireChannel {
    async fn emit(&mut self, event: &str, args: Vec<Value>) -> Result<(), TransportError> {
        self.0.lock().unwrap().push(Frame::Emit(event.to_string(), args));
        Ok(())
    }

    async fn keep_alive(&mut self) -> Result<(), TransportError> {
        self.0.lock().unwrap().push(Frame::KeepAlive);
        Ok(())
    }

    async fn close(&mut self) {}
}

#[async_trait]
impl Connector for Wire {
    async fn open(&self, cfg: &ConnectionConfig) -> Result<Box<dyn Channel>, TransportError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.refuse.load(Ordering::SeqCst) > 0 {
            self.refuse.fetch_sub(1, Ordering::SeqCst);
            return Err(TransportError::Connect {
                endpoint: format!("{}:{}", cfg.host, cfg.port),
                error: "connection refused".into(),
            });
        }
        Ok(Box::new(WireChannel(Arc::clone(&self.frames))))
    }
}

fn config() -> ConnectionConfig {
    ConnectionConfig {
        reconnect: BackoffPolicy::fixed(Duration::from_millis(200)),
        ..ConnectionConfig::new("collector", 3000).with_room("integration")
    }
}

#[tokio::test(start_paused = true)]
async fn first_step_does_not_reconnect() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed(), fail()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();

    watch.run(&CancellationToken::new()).await;

    assert_eq!(wire.opens.load(Ordering::SeqCst), 1);
    assert_eq!(wire.introduces(), 1);
}

#[tokio::test(start_paused = true)]
async fn introduce_carries_room_and_structure() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();

    let Frame::Emit(event, args) = &wire.frames()[0] else {
        panic!("expected introduce first");
    };
    assert_eq!(event, "introduce");
    assert_eq!(args[0], json!("integration"));
    assert_eq!(args[1]["name"], json!("sequence"));
    assert_eq!(args[1]["id"], json!(watch.structure().id.as_str()));
    assert_eq!(args[1]["children"][0]["name"], json!("succeed"));
}

#[tokio::test(start_paused = true)]
async fn steps_follow_event_order() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed(), fail()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();
    watch.run(&CancellationToken::new()).await;

    let s = watch.structure();
    let (root, a, b) = (
        s.id.as_str().to_string(),
        s.children[0].id.as_str().to_string(),
        s.children[1].id.as_str().to_string(),
    );
    assert_eq!(
        wire.steps(),
        vec![
            vec![json!(root)],
            vec![json!(a)],
            vec![json!(a), json!(true)],
            vec![json!(b)],
            vec![json!(b), json!(false)],
            vec![json!(root), json!(false)],
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn keep_alive_follows_every_emit() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();
    watch.run(&CancellationToken::new()).await;

    let frames = wire.frames();
    assert_eq!(frames.len() % 2, 0);
    for pair in frames.chunks(2) {
        assert!(matches!(pair[0], Frame::Emit(..)));
        assert_eq!(pair[1], Frame::KeepAlive);
    }
}

#[tokio::test(start_paused = true)]
async fn step_after_inactivity_reintroduces_once() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();

    tokio::time::advance(Duration::from_secs(31)).await;
    watch.run(&CancellationToken::new()).await;

    assert_eq!(wire.opens.load(Ordering::SeqCst), 2);
    assert_eq!(wire.introduces(), 2);

    let frames = wire.frames();
    let second_intro = frames
        .iter()
        .rposition(|f| matches!(f, Frame::Emit(e, _) if e == "introduce"))
        .unwrap();
    let first_step_after = frames
        .iter()
        .skip(second_intro)
        .position(|f| matches!(f, Frame::Emit(e, _) if e == "step"));
    assert!(first_step_after.is_some());
    let steps_before_intro = frames[..second_intro]
        .iter()
        .filter(|f| matches!(f, Frame::Emit(e, _) if e == "step"))
        .count();
    assert_eq!(steps_before_intro, 0);
}

#[tokio::test(start_paused = true)]
async fn unreachable_collector_is_bounded_and_silent() {
    let wire = Wire::default();
    wire.refuse.store(u32::MAX, Ordering::SeqCst);
    let watch = TreeWatch::new(sequence([succeed(), fail()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();

    assert_eq!(wire.opens.load(Ordering::SeqCst), 3);

    let out = watch.run(&CancellationToken::new()).await;
    assert_eq!(out.len(), 3);
    assert_eq!(wire.opens.load(Ordering::SeqCst), 3);
    assert!(wire.frames().is_empty());

    tokio::time::advance(Duration::from_secs(31)).await;
    watch.run(&CancellationToken::new()).await;
    assert_eq!(wire.opens.load(Ordering::SeqCst), 6);
}

#[tokio::test(start_paused = true)]
async fn connect_twice_fails_without_touching_subscriptions() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed()]));
    watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();
    assert_eq!(watch.bus().len(), 1);

    let second = watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await;
    assert_eq!(second.unwrap_err(), WatchError::AlreadyConnected);
    assert_eq!(watch.bus().len(), 1);
    assert_eq!(wire.opens.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn close_stops_forwarding() {
    let wire = Wire::default();
    let watch = TreeWatch::new(sequence([succeed()]));
    let conn = watch
        .connect(TelemetryConnection::new(config(), wire.clone()))
        .await
        .unwrap();

    conn.close().await;
    watch.run(&CancellationToken::new()).await;

    assert!(wire.steps().is_empty());
    assert_eq!(wire.introduces(), 1);
}
