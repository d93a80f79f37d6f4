//! Library-level run of the whole pipeline: YAML text to tree, tree to a
//! resolved and validated invocation.

use bashgen::core::value::{ConfigMap, ConfigValue};
use bashgen::core::{builder, resolver, validator};
use bashgen::settings::Settings;

fn config(yaml: &str) -> ConfigMap {
    match ConfigValue::from_yaml_str(yaml).unwrap() {
        ConfigValue::Mapping(map) => map,
        other => panic!("expected a mapping, got {}", other.kind()),
    }
}

fn argv(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

#[test]
fn root_invocation_resolves_and_validates() {
    let cfg = config(
        r#"
name: mycli
args:
  - name: source
    required: true
flags:
  - long: --verbose
    short: -v
commands: []
"#,
    );
    let root = builder::build(&cfg, &Settings::default()).unwrap();

    let parsed = resolver::resolve(&argv(&["file.txt", "--verbose"]), &root).unwrap();
    assert_eq!(parsed.command, &root);
    assert_eq!(parsed.positional, ["file.txt"]);
    assert_eq!(parsed.flags.len(), 1);
    assert_eq!(parsed.flags["--verbose"], "true");

    let result = validator::validate(parsed.command, &parsed);
    assert!(result.valid);
    assert_eq!(result.exit_code, 0);
    assert!(result.error_msg.is_empty());
}

#[test]
fn nested_invocation_reports_the_first_failure() {
    let cfg = config(
        r#"
name: cli
commands:
  - name: deploy
    commands:
      - name: service
        alias: svc
        args:
          - name: target
            required: true
        flags:
          - long: --env
            short: -e
            required: true
            allowed: [staging, production]
"#,
    );
    let root = builder::build(&cfg, &Settings::default()).unwrap();

    let parsed = resolver::resolve(&argv(&["deploy", "svc", "api", "-e", "qa"]), &root).unwrap();
    assert_eq!(parsed.command.action_name, "deploy service");
    assert_eq!(parsed.remaining, ["api", "-e", "qa"]);

    let result = validator::validate(parsed.command, &parsed);
    assert!(!result.valid);
    assert_eq!(result.error_msg, "invalid value for --env: qa");
    assert_eq!(result.exit_code, 2);

    let parsed = resolver::resolve(&argv(&["deploy", "service", "api"]), &root).unwrap();
    let err = validator::check(parsed.command, &parsed).unwrap_err();
    assert_eq!(err.to_string(), "missing required flag: --env");
}

#[test]
fn help_short_circuits_at_any_depth() {
    let cfg = config("name: cli\ncommands:\n  - name: deploy\n");
    let root = builder::build(&cfg, &Settings::default()).unwrap();

    let parsed = resolver::resolve(&argv(&["deploy", "--bogus", "-h"]), &root).unwrap();
    assert!(parsed.help_asked);
    assert!(parsed.command.is_root());
}

#[test]
fn built_trees_always_resolve_to_a_command() {
    let root = builder::build(&config("description: nameless\n"), &Settings::default()).unwrap();

    let parsed = resolver::resolve(&argv(&["anything", "-x"]), &root).unwrap();
    assert_eq!(parsed.command.name, "root");
    assert_eq!(parsed.positional, ["anything"]);
}
