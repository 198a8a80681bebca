//! Integration test common infrastructure.
//!
//! Builds an in-process [`Server`] driven by a [`ManualClock`], with local
//! users and peer links whose outbound queues the tests drain directly.

#![allow(dead_code)]

use knockd::config::Config;
use knockd::handlers::Source;
use knockd::modules::KnockModule;
use knockd::state::{Channel, ManualClock, MemberModes, User};
use knockd::{HandlerResult, Server};
use knockd_proto::{Command, Message};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Server with a hand-driven clock.
pub struct TestNet {
    pub server: Server,
    pub clock: Arc<ManualClock>,
}

impl TestNet {
    /// Server `irc.test` / SID `0AA` with the KNOCK module loaded.
    pub fn new(knock_delay: u64, knock_delay_channel: u64) -> Self {
        let net = Self::without_module(knock_delay, knock_delay_channel);
        net.server.load(&KnockModule);
        net
    }

    pub fn without_module(knock_delay: u64, knock_delay_channel: u64) -> Self {
        let config: Config = toml::from_str(&format!(
            r#"
[server]
name = "irc.test"
network = "TestNet"
sid = "0AA"

[channel]
knock_delay = {knock_delay}
knock_delay_channel = {knock_delay_channel}

[limits]
sendq_capacity = 64
"#
        ))
        .expect("test config parses");
        let clock = Arc::new(ManualClock::new());
        let server = Server::with_clock(&config, clock.clone());
        Self { server, clock }
    }

    /// Move the clock to `secs` after start.
    pub fn at(&self, secs: u64) {
        self.clock.set(Duration::from_secs(secs));
    }

    /// Register a local user `nick!nick@<nick>.example`.
    pub fn local(&self, uid: &str, nick: &str) -> TestClient {
        let host = format!("{nick}.example");
        let rx = self
            .server
            .matrix
            .add_local_user(User::local(uid, nick, nick, &host));
        TestClient {
            uid: uid.to_string(),
            nick: nick.to_string(),
            rx,
        }
    }

    /// A connection that has not registered yet.
    pub fn unregistered(&self, uid: &str) -> TestClient {
        let rx = self.server.matrix.attach_connection(uid);
        TestClient {
            uid: uid.to_string(),
            nick: "*".to_string(),
            rx,
        }
    }

    /// A user living behind peer `sid`.
    pub fn remote(&self, uid: &str, nick: &str, sid: &str) {
        let host = format!("{nick}.remote");
        self.server
            .matrix
            .add_remote_user(User::remote(uid, nick, nick, &host, sid));
    }

    /// A user homed on `sid` but reached through the peer `link`.
    pub fn remote_behind(&self, uid: &str, nick: &str, sid: &str, link: &str) {
        let host = format!("{nick}.remote");
        self.server
            .matrix
            .add_remote_user(User::remote(uid, nick, nick, &host, sid).behind(link));
    }

    /// Drop a local user as if its connection closed.
    pub fn quit(&self, client: &TestClient) {
        self.server.matrix.remove_user(&client.uid);
    }

    /// A peer link that advertised `capab`.
    pub fn link(&self, sid: &str, capab: &[&str]) -> TestLink {
        let rx = self
            .server
            .link_peer(sid, &format!("{}.peer", sid.to_lowercase()), capab);
        TestLink {
            sid: sid.to_string(),
            rx,
        }
    }

    /// Create `name` and let `setup` shape it.
    pub fn channel(&self, name: &str, setup: impl FnOnce(&mut Channel)) {
        let channel = self.server.matrix.get_or_create_channel(name);
        let mut guard = channel.lock();
        setup(&mut *guard);
    }

    /// An invite-only channel with `ops` as operators.
    pub fn invite_only(&self, name: &str, ops: &[&TestClient]) {
        self.channel(name, |c| {
            c.modes.invite_only = true;
            for op in ops {
                c.add_member(op.uid.as_str(), MemberModes::op());
            }
        });
    }

    pub async fn client_line(&self, client: &TestClient, line: &str) -> HandlerResult {
        self.server
            .dispatch_line(&Source::client(&client.uid), line)
            .await
    }

    pub async fn knock(&self, client: &TestClient, channel: &str) -> HandlerResult {
        self.client_line(client, &format!("KNOCK {channel}")).await
    }

    /// Feed `line` as if it arrived on link `sid`.
    pub async fn relay(&self, sid: &str, line: &str) -> HandlerResult {
        self.server.dispatch_line(&Source::server(sid), line).await
    }
}

/// A local connection and its outbound queue.
pub struct TestClient {
    pub uid: String,
    pub nick: String,
    rx: mpsc::Receiver<Arc<Message>>,
}

impl TestClient {
    /// Everything queued so far.
    pub fn drain(&mut self) -> Vec<Message> {
        drain(&mut self.rx)
    }

    /// Numeric codes queued so far.
    pub fn numerics(&mut self) -> Vec<u16> {
        self.drain()
            .into_iter()
            .filter_map(|m| match m.command {
                Command::Response(r, _) => Some(r.code()),
                _ => None,
            })
            .collect()
    }

    /// Wire lines queued so far, without CRLF.
    pub fn lines(&mut self) -> Vec<String> {
        lines(&mut self.rx)
    }
}

/// A peer link and its outbound queue.
pub struct TestLink {
    pub sid: String,
    rx: mpsc::Receiver<Arc<Message>>,
}

impl TestLink {
    pub fn lines(&mut self) -> Vec<String> {
        lines(&mut self.rx)
    }
}

fn drain(rx: &mut mpsc::Receiver<Arc<Message>>) -> Vec<Message> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push((*msg).clone());
    }
    out
}

fn lines(rx: &mut mpsc::Receiver<Arc<Message>>) -> Vec<String> {
    drain(rx)
        .into_iter()
        .map(|m| m.to_string().trim_end().to_string())
        .collect()
}
