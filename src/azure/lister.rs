// file: src/azure/lister.rs
// version: 1.0.0
// guid: 0cef99e6-b5bb-4987-8168-febd142f3976

//! Azure CLI queries

use super::records::{first_public_ip, parse_subscription_list, parse_vm_list, Subscription, VirtualMachine};
use crate::error::{AzaError, Result};
use crate::executor::{argv, CommandExecutor, CommandOutput, RunOptions};
use tracing::{debug, error};

/// Thin query layer over the `az` binary
pub struct AzureCli<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> AzureCli<'a> {
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// `az vm list`; an empty result is returned as an empty vector
    pub async fn list_vms(&self) -> Result<Vec<VirtualMachine>> {
        let command = argv(["az", "vm", "list", "-o", "json"]);
        let output = self
            .query(&command, "Loading VMs, please wait...", "Listing VMs")
            .await?;

        let vms = parse_vm_list(&output.stdout).map_err(|e| AzaError::response_parse("az vm list", e))?;
        debug!("Found {} VMs", vms.len());
        Ok(vms)
    }

    /// `az account list`; an empty result is returned as an empty vector
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        let command = argv(["az", "account", "list", "-o", "json"]);
        let output = self
            .query(&command, "Loading subscriptions, please wait...", "Listing subscriptions")
            .await?;

        let subs = parse_subscription_list(&output.stdout)
            .map_err(|e| AzaError::response_parse("az account list", e))?;
        debug!("Found {} subscriptions", subs.len());
        Ok(subs)
    }

    /// Public IP of a VM via `az vm list-ip-addresses`
    ///
    /// Every failure along the way, including a non-zero exit from `az`,
    /// is an address resolution error.
    pub async fn public_ip(&self, vm: &VirtualMachine) -> Result<String> {
        let command = argv([
            "az",
            "vm",
            "list-ip-addresses",
            "--resource-group",
            vm.resource_group.as_str(),
            "--name",
            vm.name.as_str(),
            "-o",
            "json",
        ]);

        let output = self
            .executor
            .run(&command, RunOptions::captured("Resolving public IP..."))
            .await?;

        if !output.success() {
            log_failure("Resolving public IP", &output);
            return Err(AzaError::address_resolution(
                vm.name.clone(),
                format!("az vm list-ip-addresses exited with status {}", output.exit_code),
            ));
        }

        let ip = first_public_ip(&output.stdout).map_err(|reason| AzaError::address_resolution(vm.name.clone(), reason))?;
        debug!("Resolved {} to {}", vm.name, ip);
        Ok(ip)
    }

    async fn query(&self, command: &[String], label: &str, step: &str) -> Result<CommandOutput> {
        let output = self.executor.run(command, RunOptions::captured(label)).await?;

        if !output.success() {
            log_failure(step, &output);
            return Err(AzaError::CliUnavailable { step: step.to_string() });
        }

        Ok(output)
    }
}

fn log_failure(step: &str, output: &CommandOutput) {
    error!("{} failed with exit code {}", step, output.exit_code);
    if !output.stderr.trim().is_empty() {
        error!("STDERR: {}", output.stderr.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::fake::FakeExecutor;

    #[tokio::test]
    async fn test_list_vms_invokes_az_with_json_output() {
        let executor = FakeExecutor::new();
        executor.push_stdout(r#"[{"name": "web1", "resourceGroup": "rg1"}]"#);

        let vms = AzureCli::new(&executor).list_vms().await.unwrap();

        assert_eq!(vms, vec![VirtualMachine::new("web1", "rg1")]);
        let calls = executor.calls();
        assert_eq!(calls[0].argv, argv(["az", "vm", "list", "-o", "json"]));
        assert!(calls[0].captured);
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_an_error() {
        let executor = FakeExecutor::new();
        executor.push_stdout("[]");

        let vms = AzureCli::new(&executor).list_vms().await.unwrap();
        assert!(vms.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_cli_unavailable() {
        let executor = FakeExecutor::new();
        executor.push_exit(1);

        let result = AzureCli::new(&executor).list_subscriptions().await;
        assert!(matches!(result, Err(AzaError::CliUnavailable { step }) if step == "Listing subscriptions"));
    }

    #[tokio::test]
    async fn test_truncated_json_is_response_parse_error() {
        let executor = FakeExecutor::new();
        executor.push_stdout(r#"[{"name": "web1", "resourceGr"#);

        let result = AzureCli::new(&executor).list_vms().await;
        assert!(matches!(result, Err(AzaError::ResponseParse { command, .. }) if command == "az vm list"));
    }

    #[tokio::test]
    async fn test_launch_failure_propagates() {
        let executor = FakeExecutor::new();
        executor.push(Err(AzaError::launch("az", "cannot find binary path")));

        let result = AzureCli::new(&executor).list_vms().await;
        assert!(matches!(result, Err(AzaError::LaunchFailure { .. })));
    }

    #[tokio::test]
    async fn test_public_ip_lookup() {
        let executor = FakeExecutor::new();
        executor.push_stdout(
            r#"[{"virtualMachine": {"network": {"publicIpAddresses": [{"ipAddress": "20.1.2.3"}]}}}]"#,
        );

        let vm = VirtualMachine::new("web1", "rg1");
        let ip = AzureCli::new(&executor).public_ip(&vm).await.unwrap();

        assert_eq!(ip, "20.1.2.3");
        assert_eq!(
            executor.calls()[0].argv,
            argv(["az", "vm", "list-ip-addresses", "--resource-group", "rg1", "--name", "web1", "-o", "json"])
        );
    }

    #[tokio::test]
    async fn test_public_ip_lookup_failure_is_address_resolution() {
        let executor = FakeExecutor::new();
        executor.push_exit(3);

        let vm = VirtualMachine::new("web1", "rg1");
        let result = AzureCli::new(&executor).public_ip(&vm).await;

        assert!(matches!(result, Err(AzaError::AddressResolution { vm, .. }) if vm == "web1"));
    }
}
