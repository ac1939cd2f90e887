use assert_cmd::Command;
use predicates::prelude::*;

fn ezml() -> Command {
	Command::cargo_bin("ezml").unwrap_or_else(|e| panic!("binary: {e}"))
}

#[test]
fn render_template_with_data_file() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(
		tmp.path().join("page.ezml"),
		r#"<ez-for var="items" element="row"><ez-value var="row"/></ez-for>"#,
	)
	.unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::write(tmp.path().join("vars.json"), r#"{"items": ["a", "b"]}"#)
		.unwrap_or_else(|e| panic!("write: {e}"));

	ezml()
		.current_dir(tmp.path())
		.args(["render", "page.ezml", "--data", "vars.json"])
		.assert()
		.success()
		.stdout(predicate::str::contains(
			r#"<ez-value var="row">a</ez-value><ez-value var="row">b</ez-value>"#,
		));
}

#[test]
fn render_uses_config_template_and_data() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(
		tmp.path().join("ezml.toml"),
		"template = \"page.ezml\"\ndata = [\"vars.json\"]\n",
	)
	.unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::write(tmp.path().join("page.ezml"), r#"<ez-value var="name"/>"#)
		.unwrap_or_else(|e| panic!("write: {e}"));
	std::fs::write(tmp.path().join("vars.json"), r#"{"name": "Bob"}"#)
		.unwrap_or_else(|e| panic!("write: {e}"));

	ezml()
		.current_dir(tmp.path())
		.arg("render")
		.assert()
		.success()
		.stdout(predicate::str::contains(
			r#"<ez-value var="name">Bob</ez-value>"#,
		));
}

#[test]
fn render_set_overrides_data() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(tmp.path().join("page.ezml"), r#"<ez-value var="name"/>"#)
		.unwrap_or_else(|e| panic!("write: {e}"));

	ezml()
		.current_dir(tmp.path())
		.args(["render", "page.ezml", "--set", "name=Alice", "--text"])
		.assert()
		.success()
		.stdout(predicate::str::contains("Alice"));
}

#[test]
fn render_missing_template_fails() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	ezml()
		.current_dir(tmp.path())
		.arg("render")
		.assert()
		.failure()
		.stderr(predicate::str::contains("no template specified"));
}

#[test]
fn render_reports_parse_errors() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(tmp.path().join("page.ezml"), "<div><p>")
		.unwrap_or_else(|e| panic!("write: {e}"));

	ezml()
		.current_dir(tmp.path())
		.args(["render", "page.ezml"])
		.assert()
		.failure()
		.stderr(predicate::str::contains("unclosed tag"));
}

#[test]
fn bindings_lists_registered_roles() {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
	std::fs::write(
		tmp.path().join("page.ezml"),
		r#"<ez-if condition="show">x</ez-if><ez-for var="items" element="row"><ez-value var="row"/></ez-for>"#,
	)
	.unwrap_or_else(|e| panic!("write: {e}"));

	ezml()
		.current_dir(tmp.path())
		.args(["bindings", "page.ezml"])
		.assert()
		.success()
		.stdout(predicate::str::contains("2 binding(s) registered."))
		.stdout(predicate::str::contains("show"))
		.stdout(predicate::str::contains("items"));
}

#[test]
fn no_subcommand_fails() {
	ezml()
		.assert()
		.failure()
		.stderr(predicate::str::contains("No subcommand specified"));
}
