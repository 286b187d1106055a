//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - circuit graph tooling for OpenQASM 2.0",
        style("qcirc").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qcirc-ir    Circuit graph and step scheduling");
    println!("  qcirc-qasm  Parameter evaluator and OpenQASM 2.0 codec");
    println!("  qcirc-sim   Statevector preview simulator");
    println!("  qcirc-cli   Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
