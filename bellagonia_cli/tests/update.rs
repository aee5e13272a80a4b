mod common;

use bellagonia_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use similar_asserts::assert_eq;

#[test]
fn update_rewrites_directive_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 call site(s) in 1 file(s)."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("src/directives/counter.ts"))?,
		common::COUNTER_REWRITTEN
	);

	Ok(())
}

#[test]
fn update_is_idempotent() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("src/directives/counter.ts"))?,
		common::COUNTER_REWRITTEN
	);

	Ok(())
}

#[test]
fn update_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Dry run: would rewrite 1 call site(s)")
				.and(predicates::str::contains("src/directives/counter.ts")),
		);

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("src/directives/counter.ts"))?,
		common::COUNTER_SOURCE
	);

	Ok(())
}

#[test]
fn update_leaves_files_outside_directive_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;

	let components = tmp.path().join("src/components");
	std::fs::create_dir_all(&components)?;
	std::fs::write(components.join("widget.ts"), "directive('widget', fn)\n")?;
	std::fs::write(components.join("widget.css"), "")?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(components.join("widget.ts"))?,
		"directive('widget', fn)\n"
	);

	Ok(())
}

#[test]
fn update_uses_configured_sources_and_marker() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let components = tmp.path().join("lib/components");
	std::fs::create_dir_all(&components)?;
	std::fs::write(components.join("widget.ts"), "component('widget', fn)\n")?;
	std::fs::write(components.join("widget.css.ts"), "")?;
	std::fs::write(
		tmp.path().join("bellagonia.toml"),
		"directive_sources = [\"lib/components/**/*.ts\"]\n\n[rewrite]\ndirective = \
		 \"component\"\nmarker = \"$css\"\n",
	)?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(components.join("widget.ts"))?,
		"import * as $css from './widget.css'\ncomponent('widget', fn, { assign: { $css } })\n"
	);

	Ok(())
}

#[test]
fn update_respects_gitignore() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_counter_project(tmp.path())?;
	std::fs::write(tmp.path().join(".gitignore"), "src/directives/\n")?;

	common::bellagonia_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("src/directives/counter.ts"))?,
		common::COUNTER_SOURCE
	);

	Ok(())
}
