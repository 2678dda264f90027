//! Implementation of `anglebuild --dry-run`.
//!
//! Lists the external commands a build would run from the current workspace
//! state. Nothing is created, cloned or removed.

use anyhow::Result;
use serde::Serialize;

use anglebuild_lib::config::BuildConfig;
use anglebuild_lib::execute::SystemRunner;
use anglebuild_lib::pipeline::{Pipeline, PlannedStep};
use anglebuild_lib::platform::Platform;

use super::Target;
use crate::output::{OutputFormat, print_info, print_json, print_stat, print_step};

#[derive(Serialize)]
struct PlanOutput<'a> {
  revision: &'a str,
  config: BuildConfig,
  platform: Platform,
  steps: Vec<PlannedStep>,
}

pub fn cmd_plan(target: &Target, output: OutputFormat) -> Result<()> {
  let runner = SystemRunner;
  let steps = Pipeline::new(&runner, target.layout.clone(), target.settings.clone(), target.platform)
    .with_d3dcompiler(target.d3dcompiler.clone())
    .plan();

  if output.is_json() {
    return print_json(&PlanOutput {
      revision: target.settings.revision.as_str(),
      config: target.settings.config,
      platform: target.platform,
      steps,
    });
  }

  print_info("Dry run - no changes made");
  print_stat("Revision", target.settings.revision.as_str());
  print_stat("Config", target.settings.config.as_str());
  print_stat("Platform", &target.platform.to_string());
  println!();
  for step in &steps {
    print_step(step.stage.as_str(), &step.invocation.command_line());
  }

  Ok(())
}
