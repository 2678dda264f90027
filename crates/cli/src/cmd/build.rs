//! Implementation of a full `anglebuild` run.
//!
//! Runs every pipeline stage against real tools and prints where the
//! packaged headers and libraries ended up.

use std::time::Duration;

use anyhow::Result;

use anglebuild_lib::execute::SystemRunner;
use anglebuild_lib::pipeline::Pipeline;

use super::Target;
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success, truncate_hash};

pub fn cmd_build(target: &Target, output: OutputFormat) -> Result<()> {
  let runner = SystemRunner;
  let report = Pipeline::new(&runner, target.layout.clone(), target.settings.clone(), target.platform)
    .with_d3dcompiler(target.d3dcompiler.clone())
    .run()?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    println!();
    print_success("ANGLE build complete!");
    print_stat("Revision", report.revision.as_str());
    print_stat("Config", report.config.as_str());
    print_stat("Platform", &report.platform.to_string());
    print_stat("Headers", &report.headers.len().to_string());
    print_stat("Libraries", &report.libraries.len().to_string());
    print_stat("Output", &report.output_dir.display().to_string());
    print_stat("Digest", truncate_hash(&report.digest.0));
    print_stat("Duration", &format_duration(Duration::from_millis(report.elapsed_ms)));
  }

  Ok(())
}
