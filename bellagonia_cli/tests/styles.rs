mod common;

use bellagonia_core::AnyEmptyResult;

#[test]
fn styles_prints_import_block_by_default() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	let output = common::bellagonia_cmd()
		.arg("styles")
		.arg("--base")
		.arg(".")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	similar_asserts::assert_eq!(
		String::from_utf8(output)?,
		"<style>\n@import url(\"/src/directives/counter.module.css\");\n</style>\n"
	);

	Ok(())
}

#[test]
fn styles_link_mode_with_prefix() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	common::bellagonia_cmd()
		.arg("styles")
		.arg("--mode")
		.arg("link")
		.arg("--prefix")
		.arg("/assets/")
		.arg("--base")
		.arg("src")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff(
			"<link rel=\"stylesheet\" href=\"/assets/directives/counter.module.css\">\n",
		));

	Ok(())
}

#[test]
fn styles_reads_tag_options_from_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("bellagonia.toml"),
		"[tags]\nbase = \".\"\nmode = \"link\"\n",
	)?;

	common::bellagonia_cmd()
		.arg("styles")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::diff(
			"<link rel=\"stylesheet\" href=\"/src/directives/counter.module.css\">\n",
		));

	Ok(())
}

#[test]
fn styles_collects_already_wired_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("src/directives/counter.ts"),
		common::COUNTER_REWRITTEN,
	)?;

	common::bellagonia_cmd()
		.arg("styles")
		.arg("--base")
		.arg(".")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("/src/directives/counter.module.css"));

	Ok(())
}

#[test]
fn styles_reports_nothing_collected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::bellagonia_cmd()
		.arg("styles")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("No stylesheets collected."));

	Ok(())
}
