//! Build script for cranecuber-robot
//!
//! Validates robot.toml at compile time, since it is embedded as the
//! default configuration.

use std::fs;
use std::path::Path;

/// Sections the program reads
const REQUIRED_SECTIONS: [&str; 4] = ["server", "motion", "ports", "emulate"];

/// Keys of the `[ports]` section
const PORT_KEYS: [&str; 5] = ["elevator", "flipper", "turntable", "squisher", "touch"];

fn main() {
    validate_config();
}

/// Validate robot.toml configuration at compile time
fn validate_config() {
    // Re-run if robot.toml changes
    println!("cargo:rerun-if-changed=robot.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("robot.toml");

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read robot.toml", &[e.to_string()]),
    };

    let config: toml::Table = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in robot.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    validate_server(&config, &mut errors);
    validate_ports(&config, &mut errors);
    validate_emulate(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in robot.toml", &errors);
    }
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let truncated = if line.len() > 62 {
                    format!("{}...", &line[..59])
                } else {
                    line.to_string()
                };
                format!("║  • {:<62} ║", truncated)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Table, errors: &mut Vec<String>) {
    for section in REQUIRED_SECTIONS {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("Missing [{}] section", section)),
        }
    }
}

fn validate_server(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(server) = config.get("server").and_then(|s| s.as_table()) else {
        return;
    };

    if let Some(toml::Value::Integer(port)) = server.get("port") {
        if !(1..=65535).contains(port) {
            errors.push("[server] port must be 1-65535".to_string());
        }
    }
    if let Some(toml::Value::Integer(timeout)) = server.get("timeout_s") {
        if *timeout <= 0 {
            errors.push("[server] timeout_s must be positive".to_string());
        }
    }
}

fn validate_ports(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(ports) = config.get("ports").and_then(|p| p.as_table()) else {
        return;
    };

    let mut outputs = Vec::new();
    for key in PORT_KEYS {
        match ports.get(key) {
            Some(toml::Value::String(port)) => {
                if key != "touch" {
                    if outputs.contains(port) {
                        errors.push(format!("[ports] output '{}' used twice", port));
                    }
                    outputs.push(port.clone());
                }
            }
            Some(_) => errors.push(format!("[ports] {} must be a string", key)),
            None => errors.push(format!("[ports] missing '{}'", key)),
        }
    }
}

fn validate_emulate(config: &toml::Table, errors: &mut Vec<String>) {
    let Some(emulate) = config.get("emulate").and_then(|e| e.as_table()) else {
        return;
    };

    if let Some(toml::Value::Integer(size)) = emulate.get("size") {
        if !(2..=7).contains(size) {
            errors.push("[emulate] size must be 2-7".to_string());
        }
    }
    if let Some(solution) = emulate.get("solution") {
        if !solution.is_str() {
            errors.push("[emulate] solution must be a string".to_string());
        }
    }
}
