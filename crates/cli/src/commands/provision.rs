use anyhow::{Context, Result};
use tarxiv_core::TarxivConfig;
use tarxiv_storage::{ProvisionPlan, ProvisionRequest, Provisioner};

pub(crate) async fn run_provision(config: &TarxivConfig) -> Result<()> {
    let request = ProvisionRequest::from_config(&config.provision);
    let provisioner = Provisioner::new(&request)?;
    let options = super::admin_options(config)?;
    let report = provisioner
        .connect_and_run(&options)
        .await
        .with_context(|| format!("provisioning {} failed", request.database))?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn run_plan(config: &TarxivConfig, json: bool) -> Result<()> {
    let request = ProvisionRequest::from_config(&config.provision);
    let plan = ProvisionPlan::from_request(&request)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan.planned_steps())?);
    } else {
        print!("{}", plan.redacted_script());
    }
    Ok(())
}
