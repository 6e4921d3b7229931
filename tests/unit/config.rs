//! Option constraints through the full parse-then-validate path.

use clap::Parser;
use seedex::config::{validate, CliArgs};
use seedex::error::EngineError;

fn error_message(argv: &[&str]) -> String {
    let mut full = vec!["seedex"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("arguments parse");
    validate(args).unwrap_err().to_string()
}

#[test]
fn every_constraint_failure_names_its_option() {
    let cases: &[(&[&str], &str)] = &[
        (&["--benchmark"], "option \"--ii\" is mandatory"),
        (
            &["-v", "--ii", "a.fas", "a.fas", "a.fas"],
            "too many arguments",
        ),
        (
            &["--no-reverse", "--no-forward", "--ii", "a.fas"],
            "option \"--no-reverse\" and option \"--no-forward\" exclude each other",
        ),
        (
            &["--maxfreq", "1", "--ii", "a.fas"],
            "option \"--maxfreq\" must be >= 2 to find matching k-mers",
        ),
        (
            &["-t", "2", "--ii", "a.fas"],
            "option \"--threads\" must be >= 3 to find matching k-mers",
        ),
        (
            &["--memlimit", "0MB", "--ii", "a.fas"],
            "argument to option \"--memlimit\" must be at least 1MB",
        ),
        (
            &["--extendgreedy", "--history", "65", "--benchmark", "--ii", "a.fas"],
            "argument to option \"--history\" must be an integer <= 64",
        ),
        (
            &["--percmathistory", "140", "--extendgreedy", "-v", "--ii", "a.fas"],
            "option \"--percmathistory\" must be an integer <= 100",
        ),
        (
            &["--extendgreedy", "--cam", "invalidlongcamstring", "--ii", "a.fas"],
            "illegal parameter for option --cam",
        ),
    ];
    for (argv, expected) in cases {
        assert_eq!(&error_message(argv), expected);
    }
}

#[test]
fn memlimit_unit_errors_are_configuration_errors() {
    let mut full = vec!["seedex", "--memlimit", "1KB", "--ii", "a.fas"];
    let args = CliArgs::try_parse_from(full.drain(..)).unwrap();
    let err = validate(args).unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
    assert!(err
        .to_string()
        .contains("integer argument followed by one of the keywords MB and GB"));
}

#[test]
fn valid_configurations_resolve() {
    for argv in [
        vec!["--ii", "a.fas"],
        vec!["--extendxdrop", "90", "--xdropbelow", "5", "--cam", "buffered", "--ii", "a.fas"],
        vec!["--extendgreedy", "100", "--history", "64", "--percmathistory", "100", "--ii", "a.fas"],
        vec!["--maxfreq", "11", "--memlimit", "1GB", "--ii", "a.fas"],
    ] {
        let mut full = vec!["seedex"];
        full.extend_from_slice(&argv);
        let args = CliArgs::try_parse_from(full).unwrap();
        assert!(validate(args).is_ok(), "rejected: {argv:?}");
    }
}
