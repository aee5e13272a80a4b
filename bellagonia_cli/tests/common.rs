use std::path::Path;

use assert_cmd::Command;
use bellagonia_core::AnyEmptyResult;
use insta_cmd::get_cargo_bin;

pub fn bellagonia_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("bellagonia"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("BELLAGONIA_LOG");
	cmd
}

pub const COUNTER_SOURCE: &str = "import { directive } from 'gonia'\n\ndirective('counter', fn)\n";

pub const COUNTER_REWRITTEN: &str = "import { directive } from 'gonia'\nimport * as $styles from \
                                     './counter.module.css'\n\ndirective('counter', fn, { \
                                     assign: { $styles } })\n";

/// A project with one directive source that still needs its stylesheet.
pub fn write_counter_project(root: &Path) -> AnyEmptyResult {
	let directives = root.join("src/directives");
	std::fs::create_dir_all(&directives)?;
	std::fs::write(directives.join("counter.ts"), COUNTER_SOURCE)?;
	std::fs::write(directives.join("counter.module.css"), ".counter {}\n")?;

	Ok(())
}
