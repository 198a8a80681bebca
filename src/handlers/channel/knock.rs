//! KNOCK command handler
//!
//! `KNOCK <channel>` asks the operators of a restricted channel for an
//! invite. A request runs through an ordered list of guards; the first one
//! that refuses decides the single numeric the requester gets back, and
//! nothing else happens. An accepted request:
//!
//! 1. starts the requester's cooldown and confirms with `RPL_KNOCKDLVR`
//!    (local requesters only),
//! 2. starts the channel's cooldown,
//! 3. notices every local op-or-higher member,
//! 4. relays `:<uid> KNOCK <channel>` to each peer that negotiated the
//!    `KNOCK` capability, except the one it came from.
//!
//! Remote requesters were already vetted by their own server, so the
//! authorization and cooldown guards only apply to local users.

use crate::config::ChannelConfig;
use crate::error::{HandlerResult, KnockError, KnockScope};
use crate::handlers::core::{Context, Handler, Route, SourceKind};
use crate::handlers::helpers::{server_notice, server_reply, uid_message};
use crate::state::clock::cooling_down;
use crate::state::{Channel, Matrix, User};
use crate::sync::ServerCaps;
use async_trait::async_trait;
use knockd_proto::{Command, Message, Response};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Handler for KNOCK command.
///
/// `KNOCK <channel>`
pub struct KnockHandler;

#[async_trait]
impl Handler for KnockHandler {
    fn min_args(&self) -> usize {
        1
    }

    fn route(&self, kind: SourceKind) -> Route {
        match kind {
            SourceKind::Unregistered => Route::NotRegistered,
            SourceKind::Client | SourceKind::Oper | SourceKind::Server => Route::Handle,
            SourceKind::Encap | SourceKind::Dummy => Route::Ignore,
        }
    }

    async fn handle(&self, ctx: &Context<'_>, msg: &Message) -> HandlerResult {
        let Some(requester) = resolve_requester(ctx, msg) else {
            debug!(source = %ctx.source.label(), prefix = ?msg.prefix, "KNOCK from unknown requester");
            return Ok(());
        };

        let (uid, nick, local) = {
            let user = requester.lock();
            (user.uid.clone(), user.nick.clone(), user.is_local())
        };

        match knock(ctx.matrix, &requester, msg.arg(0), ctx.source.via.as_deref()) {
            Ok(delivered) => {
                crate::metrics::record_knock(delivered.notices, delivered.relays);
                info!(
                    uid = %uid,
                    nick = %nick,
                    channel = %delivered.channel,
                    notices = delivered.notices,
                    relays = delivered.relays,
                    "KNOCK delivered"
                );
                Ok(())
            }
            Err(err) => {
                crate::metrics::record_command_error("KNOCK", err.error_code());
                if local {
                    return ctx.send_to_source(err.to_irc_reply(ctx.server_name(), &nick));
                }
                // Peers get no numerics for malformed relays.
                if err == KnockError::NeedMoreParams {
                    debug!(uid = %uid, source = %ctx.source.label(), "Dropping KNOCK relay without a channel");
                    return Ok(());
                }
                // Remote requesters are addressed by UID from our SID.
                ctx.send_to_source(err.to_irc_reply(&ctx.matrix.server_info.sid, &uid))
            }
        }
    }
}

/// The user a KNOCK acts for, if it is one we may act for.
///
/// Local sources knock as themselves; a peer may only knock on behalf of a
/// remote user named in the prefix and reached through that same peer.
fn resolve_requester(ctx: &Context<'_>, msg: &Message) -> Option<Arc<Mutex<User>>> {
    match ctx.source.kind {
        SourceKind::Client | SourceKind::Oper => {
            let uid = ctx.source.uid.as_deref()?;
            ctx.matrix.user(uid).filter(|u| u.lock().is_local())
        }
        SourceKind::Server => {
            let uid = msg.source_nickname()?;
            let user = ctx.matrix.user(uid)?;
            let uplink = user.lock().uplink().map(str::to_string)?;
            if ctx.source.via.as_deref() != Some(uplink.as_str()) {
                debug!(
                    uid = %uid,
                    uplink = %uplink,
                    via = ?ctx.source.via,
                    "KNOCK from wrong direction"
                );
                return None;
            }
            Some(user)
        }
        SourceKind::Unregistered | SourceKind::Encap | SourceKind::Dummy => None,
    }
}

/// Outcome of an accepted KNOCK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockDelivered {
    /// Channel name as stored.
    pub channel: String,
    /// Operator notices queued.
    pub notices: usize,
    /// Peer links the request was relayed to.
    pub relays: usize,
}

/// Run one KNOCK for `requester` against the channel named by `arg`.
///
/// `via` is the link a relayed request arrived on; it never gets the
/// request back.
pub fn knock(
    matrix: &Matrix,
    requester: &Mutex<User>,
    arg: Option<&str>,
    via: Option<&str>,
) -> Result<KnockDelivered, KnockError> {
    let channel = locate(matrix, arg)?;

    let mut user = requester.lock();
    let mut chan = channel.lock();
    let now = matrix.now();

    let attempt = KnockAttempt {
        requester: &user,
        channel: &chan,
        now,
        delays: &matrix.channel_config,
    };
    if let Err((guard, err)) = run_guards(&attempt, GUARDS) {
        debug!(
            uid = %user.uid,
            channel = %chan.name,
            guard,
            reason = err.error_code(),
            "KNOCK refused"
        );
        return Err(err);
    }

    Ok(commit(matrix, &mut user, &mut chan, now, via))
}

/// Argument presence and channel existence.
fn locate(matrix: &Matrix, arg: Option<&str>) -> Result<Arc<Mutex<Channel>>, KnockError> {
    let name = arg
        .filter(|a| !a.is_empty())
        .ok_or(KnockError::NeedMoreParams)?;
    matrix
        .channel(name)
        .ok_or_else(|| KnockError::NoSuchChannel(name.to_string()))
}

// ============================================================================
// Guards
// ============================================================================

/// Requester and channel as seen under their locks.
struct KnockAttempt<'a> {
    requester: &'a User,
    channel: &'a Channel,
    now: Instant,
    delays: &'a ChannelConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applies {
    Always,
    LocalOnly,
}

struct Guard {
    name: &'static str,
    applies: Applies,
    check: fn(&KnockAttempt<'_>) -> Result<(), KnockError>,
}

/// Evaluated in order; the first refusal wins.
static GUARDS: &[Guard] = &[
    Guard {
        name: "membership",
        applies: Applies::Always,
        check: not_on_channel,
    },
    Guard {
        name: "restriction",
        applies: Applies::Always,
        check: channel_restricted,
    },
    Guard {
        name: "authorization",
        applies: Applies::LocalOnly,
        check: may_address_channel,
    },
    Guard {
        name: "user_cooldown",
        applies: Applies::LocalOnly,
        check: requester_rested,
    },
    Guard {
        name: "channel_cooldown",
        applies: Applies::LocalOnly,
        check: channel_rested,
    },
];

fn run_guards(attempt: &KnockAttempt<'_>, guards: &[Guard]) -> Result<(), (&'static str, KnockError)> {
    let local = attempt.requester.is_local();
    for guard in guards {
        if guard.applies == Applies::LocalOnly && !local {
            continue;
        }
        (guard.check)(attempt).map_err(|err| (guard.name, err))?;
    }
    Ok(())
}

fn not_on_channel(a: &KnockAttempt<'_>) -> Result<(), KnockError> {
    if a.channel.is_member(&a.requester.uid) {
        return Err(KnockError::KnockOnChan(a.channel.name.clone()));
    }
    Ok(())
}

fn channel_restricted(a: &KnockAttempt<'_>) -> Result<(), KnockError> {
    if !a.channel.is_restricted() {
        return Err(KnockError::ChanOpen(a.channel.name.clone()));
    }
    Ok(())
}

fn may_address_channel(a: &KnockAttempt<'_>) -> Result<(), KnockError> {
    if a.channel.modes.private {
        return Err(KnockError::CannotSendToChan(a.channel.name.clone()));
    }
    if let Some(ban) = a.channel.matching_ban(&a.requester.hostmask()) {
        debug!(
            channel = %a.channel.name,
            mask = %ban.mask,
            set_by = %ban.set_by,
            set_at = ban.set_at,
            "KNOCK requester matches ban"
        );
        return Err(KnockError::CannotSendToChan(a.channel.name.clone()));
    }
    Ok(())
}

fn requester_rested(a: &KnockAttempt<'_>) -> Result<(), KnockError> {
    if cooling_down(a.requester.last_knock_at(), a.delays.knock_delay(), a.now) {
        return Err(KnockError::TooManyKnocks {
            channel: a.channel.name.clone(),
            scope: KnockScope::User,
        });
    }
    Ok(())
}

fn channel_rested(a: &KnockAttempt<'_>) -> Result<(), KnockError> {
    if cooling_down(a.channel.last_knock_at(), a.delays.knock_delay_channel(), a.now) {
        return Err(KnockError::TooManyKnocks {
            channel: a.channel.name.clone(),
            scope: KnockScope::Channel,
        });
    }
    Ok(())
}

// ============================================================================
// Commit and fan-out
// ============================================================================

fn commit(
    matrix: &Matrix,
    user: &mut User,
    chan: &mut Channel,
    now: Instant,
    via: Option<&str>,
) -> KnockDelivered {
    let server = matrix.server_info.name.as_str();

    if user.is_local() {
        user.record_knock(now);
        let confirm = server_reply(
            server,
            Response::RPL_KNOCKDLVR,
            vec![
                user.nick.clone(),
                chan.name.clone(),
                "Your KNOCK has been delivered.".to_string(),
            ],
        );
        matrix.send_local(&user.uid, Arc::new(confirm));
    }

    chan.record_knock(now);

    let notice = Arc::new(server_notice(
        server,
        &format!("@{}", chan.name),
        format!(
            "KNOCK: {} ({} [{}@{}] has asked for an invite)",
            chan.name, user.nick, user.user, user.host
        ),
    ));
    // Remote members have no local queue and are skipped by send_local.
    let notices = chan
        .members
        .iter()
        .filter(|(_, modes)| modes.has_op_or_higher())
        .filter(|(uid, _)| matrix.send_local(uid, Arc::clone(&notice)))
        .count();

    let relay = Arc::new(uid_message(&user.uid, Command::KNOCK(chan.name.clone())));
    let relays = matrix
        .links
        .broadcast_capable(ServerCaps::KNOCK, via, &relay);

    KnockDelivered {
        channel: chan.name.clone(),
        notices,
        relays,
    }
}
