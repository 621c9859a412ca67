use std::path::PathBuf;

use clap::Parser;

use super::*;

#[test]
fn parses_collect_with_run_config() {
    let cli = Cli::try_parse_from([
        "fplab-cli",
        "collect",
        "--browser",
        "firefox",
        "--privacy-max",
        "--extension",
        "noscript.xpi",
        "--extension",
        "canvasblocker.xpi",
    ])
    .expect("expected valid cli args");

    let Commands::Collect(args) = cli.command else {
        panic!("expected collect command");
    };
    assert_eq!(args.browser, "firefox");
    assert!(args.privacy_max);
    assert!(!args.incognito);
    assert_eq!(args.extensions, ["noscript.xpi", "canvasblocker.xpi"]);
    assert_eq!(args.output, PathBuf::from("page_body.json"));
    assert!(!args.require_delivery);
}

#[test]
fn collect_requires_browser() {
    assert!(Cli::try_parse_from(["fplab-cli", "collect"]).is_err());
}

#[test]
fn parses_collect_delivery_and_timing() {
    let cli = Cli::try_parse_from([
        "fplab-cli",
        "collect",
        "--browser",
        "chrome",
        "--server",
        "http://localhost:3000",
        "--require-delivery",
        "--output",
        "out.json",
        "--settle-delay-ms",
        "250",
        "--bounded-timeout-ms",
        "100",
    ])
    .expect("expected valid cli args");

    let Commands::Collect(args) = cli.command else {
        panic!("expected collect command");
    };
    assert_eq!(args.server.as_deref(), Some("http://localhost:3000"));
    assert!(args.require_delivery);
    assert_eq!(args.output, PathBuf::from("out.json"));
    assert_eq!(args.timing.settle_delay_ms, Some(250));
    assert_eq!(args.timing.bounded_timeout_ms, Some(100));
}

#[test]
fn parses_behaviour_with_bump() {
    let cli = Cli::try_parse_from([
        "fplab-cli",
        "behaviour",
        "--server",
        "http://fp.test",
        "--bump",
        "3",
    ])
    .expect("expected valid cli args");

    let Commands::Behaviour(args) = cli.command else {
        panic!("expected behaviour command");
    };
    assert_eq!(args.server, "http://fp.test");
    assert_eq!(args.bump, 3);
}

#[test]
fn no_command_is_an_error() {
    assert!(Cli::try_parse_from(["fplab-cli"]).is_err());
}
