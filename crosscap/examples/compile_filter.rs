//! Example: Compile a filter expression without opening a device
//!
//! Run with: cargo run --example compile_filter -- "tcp port 80"

use crosscap::{compile, FilterSpec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let expression = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tcp port 80".to_string());

    match compile(&FilterSpec::new(expression.as_str())) {
        Ok(program) => {
            println!(
                "'{}' compiled to {} BPF instructions",
                expression,
                program.len()
            );
        }
        Err(e) => {
            eprintln!("Compilation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
