//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, json_document, ndjson_line};
use propcheck_core::{BuildInfo, build_info};
use propcheck_rules::rules_crate_version;

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = build_info(env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));
    let rules_version = rules_crate_version();

    let stdout = if mode.is_ndjson() {
        let mut payload = build_json(&build, rules_version);
        if let Some(object) = payload.as_object_mut() {
            object.insert("type".to_owned(), "summary".into());
            object.insert("kind".to_owned(), "info".into());
        }
        ndjson_line(&payload)?
    } else if mode.is_json() {
        json_document(&build_json(&build, rules_version))?
    } else {
        format_info_text(&build, rules_version)
    };

    Ok(CliOutput {
        stdout,
        exit_code: ExitCode::Ok,
    })
}

fn format_info_text(build: &BuildInfo, rules_version: &str) -> String {
    format!(
        "status: ok\nbuild: {}\nname: {}\nversion: {}\nrules: {}\nrust: {}\nplatform: {}\nprofile: {}\ngit: {}\n",
        build.version_string(),
        build.name,
        build.version,
        rules_version,
        build.rust_version,
        build.platform(),
        build.profile,
        build.git_hash.unwrap_or("none"),
    )
}

fn build_json(build: &BuildInfo, rules_version: &str) -> serde_json::Value {
    serde_json::json!({
        "status": "ok",
        "build": {
            "display": build.version_string(),
            "name": build.name,
            "version": build.version,
            "rulesVersion": rules_version,
            "rustVersion": build.rust_version,
            "platform": build.platform(),
            "profile": build.profile,
            "gitHash": build.git_hash,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{OutputArgs, OutputFormat};

    #[test]
    fn json_build_has_stable_keys() -> Result<(), Box<dyn std::error::Error>> {
        let mode = OutputMode::from_args(&OutputArgs {
            output: Some(OutputFormat::Json),
            agent: false,
            json: false,
        });
        let output = run_info(mode)?;
        let value: serde_json::Value = serde_json::from_str(&output.stdout)?;
        let build = value
            .get("build")
            .and_then(serde_json::Value::as_object)
            .ok_or("build object missing")?;

        assert_eq!(build.get("name"), Some(&serde_json::json!("propcheck")));
        for key in ["display", "name", "version", "rulesVersion", "rustVersion", "platform", "profile", "gitHash"] {
            assert!(build.contains_key(key), "missing {key}");
        }
        Ok(())
    }

    #[test]
    fn text_reports_binary_name_and_version() -> Result<(), CliError> {
        let mode = OutputMode::from_args(&OutputArgs {
            output: Some(OutputFormat::Text),
            agent: false,
            json: false,
        });
        let output = run_info(mode)?;

        assert!(output.stdout.starts_with("status: ok\nbuild: propcheck "));
        assert!(output.stdout.contains("\nname: propcheck\n"));
        assert!(output.stdout.contains(&format!("\nversion: {}\n", env!("CARGO_PKG_VERSION"))));
        Ok(())
    }
}
