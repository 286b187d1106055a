//! End-to-end tests driving the `qcirc` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const HEADER: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n\n";
const BELL: &str = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\n\nqreg q[2];\ncreg c[2];\n\nh q[0];\ncx q[0], q[1];\n";

fn qcirc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_qcirc"))
        .args(args)
        .env_remove("QCIRC_CONFIG")
        .env_remove("QCIRC_MAX_QUBITS")
        .env_remove("QCIRC_SHOTS")
        .env_remove("QCIRC_SEED")
        .env_remove("QCIRC_LOG")
        .output()
        .expect("failed to run qcirc")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

mod fmt {
    use super::*;

    #[test]
    fn test_fmt_to_stdout_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", "  h q[0]\ncx   q[0],q[1]\n");

        let output = qcirc(&["fmt", "-i", &input]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(
            stdout(&output),
            format!("{HEADER}qreg q[2];\ncreg c[1];\n\nh q[0];\ncx q[0], q[1];\n")
        );
    }

    #[test]
    fn test_fmt_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);
        let out_path = dir.path().join("out.qasm");
        let out = out_path.to_string_lossy().into_owned();

        let output = qcirc(&["fmt", "-i", &input, "-o", &out]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(fs::read_to_string(&out_path).unwrap(), BELL);
    }

    #[test]
    fn test_fmt_lenient_drops_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bad.qasm", "h q[0];\nfoo q[0];\n");

        let output = qcirc(&["fmt", "-i", &input]);
        assert!(output.status.success());
        assert!(stdout(&output).contains("h q[0];"));
        assert!(!stdout(&output).contains("foo"));
        assert!(stderr(&output).contains("line 2"));
    }

    #[test]
    fn test_fmt_strict_fails_on_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bad.qasm", "h q[0];\nfoo q[0];\n");

        let output = qcirc(&["fmt", "-i", &input, "--strict"]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("could not be decoded"));
    }

    #[test]
    fn test_missing_file() {
        let output = qcirc(&["fmt", "-i", "/nonexistent/qcirc_test_12345.qasm"]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("File not found"));
    }
}

mod check {
    use super::*;

    #[test]
    fn test_check_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);

        let output = qcirc(&["check", "-i", &input]);
        assert!(output.status.success(), "{}", stderr(&output));
        assert!(stdout(&output).contains("No problems found"));
    }

    #[test]
    fn test_check_reports_skipped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "dup.qasm", "h q[0];\ncx q[1], q[1];\n");

        let output = qcirc(&["check", "-i", &input]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("1 problem(s)"));
    }
}

mod inspect {
    use super::*;

    #[test]
    fn test_inspect_lists_steps() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "par.qasm", "h q[0];\nh q[1];\ncx q[0], q[1];\n");

        let output = qcirc(&["inspect", "-i", &input]);
        assert!(output.status.success(), "{}", stderr(&output));
        let text = stdout(&output);
        assert!(text.contains("H_q0_s0"));
        assert!(text.contains("H_q1_s0"));
        assert!(text.contains("CX_q1_s1"));
    }

    #[test]
    fn test_inspect_json_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);

        let output = qcirc(&["inspect", "-i", &input, "--json"]);
        assert!(output.status.success(), "{}", stderr(&output));

        let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let nodes = nodes.as_array().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0]["id"], "H_q0_s0");
        assert_eq!(nodes[1]["step"], 1);
        assert_eq!(nodes[1]["dependencies"][0], "H_q0_s0");
    }
}

mod simulate {
    use super::*;

    #[test]
    fn test_simulate_json_bell() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);

        let output = qcirc(&["simulate", "-i", &input, "--json"]);
        assert!(output.status.success(), "{}", stderr(&output));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["num_qubits"], 2);
        let states = report["states"].as_array().unwrap();
        assert_eq!(states.len(), 2);
        assert_eq!(states[0]["bits"], "00");
        assert_eq!(states[1]["bits"], "11");
        assert!(report.get("counts").is_none());
    }

    #[test]
    fn test_simulate_up_to_step() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);

        let output = qcirc(&["simulate", "-i", &input, "--up-to-step", "0", "--json"]);
        assert!(output.status.success(), "{}", stderr(&output));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let states = report["states"].as_array().unwrap();
        assert_eq!(states[1]["bits"], "10");
        let p1 = report["qubits"][1]["p1"].as_f64().unwrap();
        assert!(p1.abs() < 1e-10);
    }

    #[test]
    fn test_simulate_seeded_shots_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);
        let args = ["simulate", "-i", &input, "--shots", "200", "--seed", "42", "--json"];

        let first = qcirc(&args);
        let second = qcirc(&args);
        assert!(first.status.success(), "{}", stderr(&first));
        assert_eq!(first.stdout, second.stdout);

        let report: serde_json::Value = serde_json::from_slice(&first.stdout).unwrap();
        let counts = report["counts"].as_object().unwrap();
        let total: u64 = counts.values().map(|v| v.as_u64().unwrap()).sum();
        assert_eq!(total, 200);
        assert!(counts.keys().all(|k| k == "00" || k == "11"));
    }

    #[test]
    fn test_simulate_respects_config_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);
        let config = write(dir.path(), "qcirc.yaml", "simulator:\n  max_qubits: 1\n");

        let output = qcirc(&["--config", &config, "simulate", "-i", &input]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Failed to simulate"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "bell.qasm", BELL);
        let config = write(dir.path(), "qcirc.yaml", "simulator:\n  max_qubits: 64\n");

        let output = qcirc(&["--config", &config, "simulate", "-i", &input]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Invalid configuration"));
    }
}

#[test]
fn test_version() {
    let output = qcirc(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}
