//! Integration tests for loading and unloading the KNOCK module.

mod common;

use common::TestNet;
use knockd::modules::{KnockModule, Module, ModuleHost};

fn snapshot(host: &ModuleHost) -> (Vec<&'static str>, String, Vec<String>) {
    (
        host.registry.commands(),
        host.capabs.advertisement(),
        host.isupport.lines(),
    )
}

#[test]
fn test_activation_is_idempotent() {
    let mut once = ModuleHost::new("TestNet");
    KnockModule.activate(&mut once);

    let mut twice = ModuleHost::new("TestNet");
    KnockModule.activate(&mut twice);
    KnockModule.activate(&mut twice);

    assert_eq!(snapshot(&once), snapshot(&twice));
    assert_eq!(once.capabs, twice.capabs);
    assert_eq!(once.isupport, twice.isupport);
}

#[test]
fn test_cycles_restore_fresh_host() {
    let fresh = ModuleHost::new("TestNet");

    let mut one = ModuleHost::new("TestNet");
    KnockModule.activate(&mut one);
    KnockModule.deactivate(&mut one);

    let mut two = ModuleHost::new("TestNet");
    for _ in 0..2 {
        KnockModule.activate(&mut two);
        KnockModule.deactivate(&mut two);
    }

    assert_eq!(snapshot(&one), snapshot(&fresh));
    assert_eq!(snapshot(&two), snapshot(&fresh));
    assert_eq!(two.capabs, fresh.capabs);
    assert_eq!(two.isupport, fresh.isupport);
}

#[test]
fn test_loaded_server_advertises_knock() {
    let net = TestNet::new(300, 60);

    let capab = net.server.capab_message().to_string();
    assert!(capab.starts_with("CAPAB :QS EX"), "{capab}");
    assert!(capab.trim_end().ends_with(" KNOCK"), "{capab}");

    let isupport = net.server.isupport_lines().join(" ");
    assert!(isupport.split(' ').any(|t| t == "KNOCK"), "{isupport}");
    assert!(isupport.contains("NETWORK=TestNet"));
}

#[tokio::test]
async fn test_unloaded_module_leaves_command_unknown() {
    let net = TestNet::new(300, 60);
    let mut alice = net.local("0AAAAAAAB", "alice");
    let oscar = net.local("0AAAAAAAO", "oscar");
    net.invite_only("#x", &[&oscar]);

    assert!(net.server.unload(&KnockModule));
    assert!(!net.server.unload(&KnockModule));

    net.knock(&alice, "#x").await.unwrap();
    assert_eq!(alice.lines(), vec![":irc.test 421 alice KNOCK :Unknown command"]);
    assert!(!net.server.capab_message().to_string().contains("KNOCK"));
    assert!(!net.server.isupport_lines().join(" ").contains("KNOCK"));

    assert!(net.server.load(&KnockModule));
    net.knock(&alice, "#x").await.unwrap();
    assert_eq!(alice.numerics(), vec![711]);
}

#[tokio::test]
async fn test_link_negotiated_before_load_gets_no_relay() {
    let net = TestNet::without_module(300, 60);
    let mut early = net.link("1BB", &["QS", "KNOCK"]);

    net.server.load(&KnockModule);
    let mut late = net.link("2CC", &["QS", "KNOCK"]);

    let alice = net.local("0AAAAAAAB", "alice");
    let oscar = net.local("0AAAAAAAO", "oscar");
    net.invite_only("#x", &[&oscar]);
    net.knock(&alice, "#x").await.unwrap();

    assert!(early.lines().is_empty());
    assert_eq!(late.lines(), vec![":0AAAAAAAB KNOCK #x"]);
}
