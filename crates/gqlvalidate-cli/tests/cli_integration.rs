//! End-to-end tests running the `gqlvalidate` binary

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const SCHEMA: &str = r#"
input SignupInput {
    name: String @validate(rule: "min=2,required", message: "name is required")
    email: String @validate(rule: "omitempty,email")
}

input OwnershipInput {
    userOwned: Boolean!
    legalName: String @validate(rule: "required_if=userOwned false")
}

type Mutation {
    signup(input: SignupInput!): Boolean!
}
"#;

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.graphql"), SCHEMA).unwrap();
        std::fs::write(dir.path().join("config.yaml"), "{}\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gqlvalidate"))
            .current_dir(self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .env_remove("GQLVALIDATE_CONFIG")
            .arg("--no-color")
            .arg("--config")
            .arg(self.path("config.yaml"))
            .args(args)
            .output()
            .unwrap()
    }

    fn generate(&self) -> PathBuf {
        let out = self.path("generated");
        let output = self.run(&["generate", "--schema", "schema.graphql", "--out", path_str(&out)]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        out.join("rules_gen.json")
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[cfg(test)]
mod generate_tests {
    use super::*;

    #[test]
    fn test_generate_writes_artifacts() {
        let ws = Workspace::new();
        let manifest = ws.generate();

        assert!(manifest.exists());
        assert!(ws.path("generated/models_gen.rs").exists());
        assert!(ws.path("generated/validatable_gen.rs").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let ws = Workspace::new();
        let output = ws.run(&[
            "--output",
            "json",
            "generate",
            "--schema",
            "schema.graphql",
            "--out",
            "generated",
            "--dry-run",
        ]);
        assert!(output.status.success());

        let report = stdout_json(&output);
        assert_eq!(report["compiled_rules"], 3);
        assert!(!ws.path("generated").exists());
    }

    #[test]
    fn test_annotation_error_exit_code() {
        let ws = Workspace::new();
        ws.write("bad.graphql", r#"input BadInput @validate(rule: "required") { name: String }"#);
        let output = ws.run(&["generate", "--schema", "bad.graphql"]);

        assert_eq!(output.status.code(), Some(3));
        assert!(String::from_utf8_lossy(&output.stderr)
            .contains("@validate may only be applied to input fields (found on BadInput)"));
    }
}

#[cfg(test)]
mod inspect_tests {
    use super::*;

    #[test]
    fn test_rewrite_prints_rule() {
        let ws = Workspace::new();
        let output = ws.run(&[
            "rewrite",
            "--schema",
            "schema.graphql",
            "--type",
            "OwnershipInput",
            "required_if=userOwned false",
        ]);
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "required_if=UserOwned false");
    }

    #[test]
    fn test_check_deny_unknown() {
        let ws = Workspace::new();
        ws.write("lint.graphql", r#"input T { f: String @validate(rule: "required,sparkly") }"#);

        let output = ws.run(&["--output", "json", "check", "--schema", "lint.graphql"]);
        assert!(output.status.success());
        assert_eq!(stdout_json(&output)["unknown_rules"][0]["rule"], "sparkly");

        let output = ws.run(&["check", "--schema", "lint.graphql", "--deny-unknown"]);
        assert_eq!(output.status.code(), Some(11));
    }
}

#[cfg(test)]
mod validate_tests {
    use super::*;

    #[test]
    fn test_invalid_input_reports_protocol_errors() {
        let ws = Workspace::new();
        let manifest = ws.generate();
        let input = ws.write("input.json", r#"{"name": "", "email": null}"#);

        let output = ws.run(&[
            "--output",
            "json",
            "validate",
            "--manifest",
            path_str(&manifest),
            "--type",
            "SignupInput",
            "--input",
            path_str(&input),
        ]);
        assert_eq!(output.status.code(), Some(10));

        let body = stdout_json(&output);
        assert_eq!(body["errors"][0]["message"], "name is required");
        assert_eq!(body["errors"][0]["path"], serde_json::json!(["name"]));
        assert_eq!(body["errors"][0]["extensions"]["code"], "BAD_USER_INPUT");
    }

    #[test]
    fn test_valid_input_passes() {
        let ws = Workspace::new();
        let manifest = ws.generate();
        let input = ws.write("input.yaml", "name: Ada\nemail: ada@example.com\n");

        let output = ws.run(&[
            "validate",
            "--manifest",
            path_str(&manifest),
            "--type",
            "SignupInput",
            "--input",
            path_str(&input),
        ]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
        assert!(String::from_utf8_lossy(&output.stdout).contains("Input is valid"));
    }

    #[test]
    fn test_translated_fallback_message() {
        let ws = Workspace::new();
        let manifest = ws.generate();
        ws.write("fr.yaml", "required_if: \"{0} est obligatoire\"\n");
        std::fs::write(
            ws.path("config.yaml"),
            format!("translations:\n  catalogs:\n    fr: {}\n", path_str(&ws.path("fr.yaml"))),
        )
        .unwrap();
        let input = ws.write("input.json", r#"{"userOwned": false, "legalName": null}"#);

        let output = ws.run(&[
            "--output",
            "json",
            "validate",
            "--manifest",
            path_str(&manifest),
            "--type",
            "OwnershipInput",
            "--input",
            path_str(&input),
            "--locale",
            "fr",
        ]);
        assert_eq!(output.status.code(), Some(10));
        assert_eq!(stdout_json(&output)["errors"][0]["message"], "legalName est obligatoire");
    }

    #[test]
    fn test_non_object_input_rejected() {
        let ws = Workspace::new();
        let manifest = ws.generate();
        let input = ws.write("input.json", r#"[{"name": "Ada"}]"#);

        let output = ws.run(&[
            "validate",
            "--manifest",
            path_str(&manifest),
            "--type",
            "SignupInput",
            "--input",
            path_str(&input),
        ]);
        assert_eq!(output.status.code(), Some(6));
    }

    #[test]
    fn test_unknown_type() {
        let ws = Workspace::new();
        let manifest = ws.generate();
        let input = ws.write("input.json", "{}");

        let output = ws.run(&[
            "validate",
            "--manifest",
            path_str(&manifest),
            "--type",
            "MissingInput",
            "--input",
            path_str(&input),
        ]);
        assert_eq!(output.status.code(), Some(9));
    }
}
