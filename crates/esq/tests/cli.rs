//! CLI integration tests for esq commands.
//!
//! Output is captured through a pipe, so it is never colored and stdout is plain JSON.

#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};

/// Creates a temp directory holding a `root = true` config, isolating tests from real configs.
fn workspace(config: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".esq.toml"), format!("root = true\n{config}")).unwrap();
    dir
}

/// Returns an `esq` command running in `dir` with HOME pointed at it.
fn esq(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("esq").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

/// Writes `filters` as `filters.json` in `dir`.
fn write_filters(dir: &Path, filters: &Value) {
    fs::write(dir.join("filters.json"), filters.to_string()).unwrap();
}

/// Runs `esq` with `args` and parses stdout as JSON.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = esq(dir).args(args).assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

/// Filters over the `people` index.
fn people_filters() -> Value {
    json!([
        {"indexName": "people", "fieldName": "status", "operator": "Is", "type": "Text",
         "values": ["active", "pending"], "evaluateValuesAsOr": true},
        {"indexName": "people", "fieldName": "age", "operator": "Between", "type": "Number",
         "values": ["18;_65"]}
    ])
}

mod compile {
    use super::*;

    #[test]
    fn prints_index_map() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        let map = run_json(dir.path(), &["compile", "filters.json"]);
        assert_eq!(
            map,
            json!({"people": {"bool": {"must": [
                {"bool": {"should": [
                    {"match": {"status": "active"}},
                    {"match": {"status": "pending"}}
                ]}},
                {"range": {"age": {"gt": "18", "lte": "65"}}}
            ]}}})
        );
    }

    #[test]
    fn or_flag_switches_mode() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        let map = run_json(dir.path(), &["compile", "filters.json", "--or"]);
        assert_eq!(map["people"]["bool"]["should"].as_array().unwrap().len(), 2);
        assert!(map["people"]["bool"].get("must").is_none());
    }

    #[test]
    fn config_sets_default_mode() {
        let dir = workspace("[filters]\nevaluate_as_or = true\n");
        write_filters(dir.path(), &people_filters());

        let map = run_json(dir.path(), &["compile", "filters.json"]);
        assert!(map["people"]["bool"].get("should").is_some());
    }

    #[test]
    fn grouped_file_prints_one_map_per_group() {
        let dir = workspace("");
        write_filters(
            dir.path(),
            &json!({"groups": [
                {"filters": people_filters()},
                {"evaluateAsOr": true, "filters": [
                    {"indexName": "orders", "fieldName": "total", "operator": "GreaterThan",
                     "type": "Number", "values": ["100"]}
                ]}
            ]}),
        );

        let maps = run_json(dir.path(), &["compile", "filters.json"]);
        let maps = maps.as_array().unwrap();
        assert_eq!(maps.len(), 2);
        assert!(maps[0].get("people").is_some());
        assert_eq!(
            maps[1],
            json!({"orders": {"bool": {"should": [{"range": {"total": {"gt": "100"}}}]}}})
        );
    }

    #[test]
    fn invalid_value_fails_with_hint() {
        let dir = workspace("");
        write_filters(
            dir.path(),
            &json!([{"indexName": "people", "fieldName": "born", "operator": "Is",
                     "type": "Date", "values": ["yesterday"]}]),
        );

        esq(dir.path())
            .args(["compile", "filters.json"])
            .assert()
            .failure()
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("error:").and(predicate::str::contains("yesterday")))
            .stderr(predicate::str::contains("hint:"));
    }

    #[test]
    fn unsupported_operator_names_the_filter() {
        let dir = workspace("");
        write_filters(
            dir.path(),
            &json!([{"indexName": "people", "fieldName": "age", "operator": "Contains",
                     "type": "Number", "values": ["1"]}]),
        );

        esq(dir.path())
            .args(["compile", "filters.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("group 0, filter 0"));
    }

    #[test]
    fn missing_file_fails() {
        let dir = workspace("");
        esq(dir.path())
            .args(["compile", "nope.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read filter file"));
    }

    #[test]
    fn verbose_logs_to_stderr_only() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        let assert = esq(dir.path())
            .args(["compile", "filters.json", "-v"])
            .assert()
            .success()
            .stderr(predicate::str::contains("compiled filter"));
        let stdout = assert.get_output().stdout.clone();
        assert!(serde_json::from_slice::<Value>(&stdout).is_ok());
    }
}

mod search {
    use super::*;

    #[test]
    fn builds_request_from_flags() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        let request = run_json(
            dir.path(),
            &["search", "filters.json", "-i", "people", "-p", "2", "-n", "25", "-s", "age:desc"],
        );
        assert_eq!(request["from"], 50);
        assert_eq!(request["size"], 25);
        assert_eq!(request["sort"], json!([{"age": "desc"}]));
        assert_eq!(request["query"]["bool"]["must"].as_array().unwrap().len(), 2);
        assert_eq!(request["query"]["bool"]["should"], json!([]));
    }

    #[test]
    fn falls_back_to_config() {
        let dir = workspace("[search]\npage_size = 5\nsort = [\"name\", \"age:desc\"]\n");
        write_filters(dir.path(), &people_filters());

        let request = run_json(dir.path(), &["search", "filters.json", "--index", "people"]);
        assert_eq!(request["from"], 0);
        assert_eq!(request["size"], 5);
        assert_eq!(request["sort"], json!([{"name": "asc"}, {"age": "desc"}]));
    }

    #[test]
    fn index_missing_from_filters_fails() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        esq(dir.path())
            .args(["search", "filters.json", "-i", "orders"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("'orders'"));
    }

    #[test]
    fn bad_config_sort_fails() {
        let dir = workspace("[search]\nsort = \"age:up\"\n");
        write_filters(dir.path(), &people_filters());

        esq(dir.path())
            .args(["search", "filters.json", "-i", "people"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("sort"));
    }
}

mod aggregate {
    use super::*;

    #[test]
    fn builds_composite_request() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        let request = run_json(
            dir.path(),
            &["aggregate", "filters.json", "-i", "people", "--name", "by_team", "-f", "team"],
        );
        assert_eq!(request["size"], 0);
        assert_eq!(
            request["aggs"],
            json!({"by_team": {"composite": {
                "size": 1000,
                "source": [{"key": {"terms": {"field": "team"}}}]
            }}})
        );
    }

    #[test]
    fn key_and_size_come_from_config_or_flags() {
        let dir = workspace("[aggregation]\nsize = 20\nkey = \"bucket\"\n");
        write_filters(dir.path(), &people_filters());

        let request = run_json(
            dir.path(),
            &["aggregate", "filters.json", "-i", "people", "--name", "t", "-f", "team"],
        );
        assert_eq!(request["aggs"]["t"]["composite"]["size"], 20);
        assert!(request["aggs"]["t"]["composite"]["source"][0].get("bucket").is_some());

        let request = run_json(
            dir.path(),
            &["aggregate", "filters.json", "-i", "people", "--name", "t", "-f", "team", "-k", "k2", "-n", "7"],
        );
        assert_eq!(request["aggs"]["t"]["composite"]["size"], 7);
        assert!(request["aggs"]["t"]["composite"]["source"][0].get("k2").is_some());
    }

    #[test]
    fn empty_field_fails() {
        let dir = workspace("");
        write_filters(dir.path(), &people_filters());

        esq(dir.path())
            .args(["aggregate", "filters.json", "-i", "people", "--name", "t", "-f", ""])
            .assert()
            .failure()
            .stderr(predicate::str::contains("fieldName"));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_commented_config() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        esq(dir.path())
            .current_dir(&project)
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(project.join(".esq.toml")).unwrap();
        assert!(contents.contains("# [search]"));
        assert!(contents.contains("# page_size = 10"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = workspace("");
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join(".esq.toml"), "old").unwrap();

        esq(dir.path())
            .current_dir(&project)
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("--force"));

        esq(dir.path())
            .current_dir(&project)
            .args(["init", "--force"])
            .assert()
            .success();
        assert_ne!(fs::read_to_string(project.join(".esq.toml")).unwrap(), "old");
    }

    #[test]
    fn global_writes_to_home() {
        let home = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();

        esq(home.path())
            .current_dir(cwd.path())
            .args(["init", "--global"])
            .assert()
            .success();

        assert!(home.path().join(".esq.toml").exists());
        assert!(!cwd.path().join(".esq.toml").exists());
    }

    #[test]
    fn works_with_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".esq.toml"), "[search\n").unwrap();
        let project = dir.path().join("project");
        fs::create_dir(&project).unwrap();

        esq(dir.path())
            .current_dir(&project)
            .arg("init")
            .assert()
            .success();
    }
}

mod check {
    use super::*;

    #[test]
    fn clean_config_succeeds() {
        let dir = workspace("[search]\npage_size = 20\n");
        esq(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains(".esq.toml"))
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn warnings_fail_with_hints() {
        let dir = workspace("[search]\npage_size = 0\n\n[aggregation]\nkey = \"\"\n");
        esq(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("Warnings (2):"))
            .stdout(predicate::str::contains("Hints:"));
    }

    #[test]
    fn broken_config_fails() {
        let dir = workspace("[search\n");
        esq(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod config {
    use super::*;

    #[test]
    fn prints_effective_settings() {
        let dir = workspace("[aggregation]\nkey = \"bucket\"\n");
        esq(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("[aggregation]"))
            .stdout(predicate::str::contains("key = \"bucket\""))
            .stdout(predicate::str::contains("page_size = 10"))
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}
