// file: src/cli/commands.rs
// version: 1.0.1
// guid: ff145751-e34e-4bc5-b1cd-5c350c7e62b7

//! Operation dispatch
//!
//! Each operation is one linear pipeline: resolve the target (listing and
//! selecting when needed), build a single external command line, run it.
//! The first failing step aborts the whole operation.

use super::args::Commands;
use crate::{
    azure::{AzureCli, Subscription, VirtualMachine},
    config::Config,
    error::{AzaError, Result},
    executor::{argv, CommandExecutor, RunOptions},
    logging::with_async_operation_span,
    select::Selector,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncBufRead;
use tracing::{debug, info};

/// The supported operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SetUser,
    Ssh,
    Copy,
    SetSubscription,
    GenerateKey,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::SetUser => "setuser",
            Operation::Ssh => "ssh",
            Operation::Copy => "cp",
            Operation::SetSubscription => "setsub",
            Operation::GenerateKey => "genkey",
        }
    }

    fn vm_prompt(&self) -> &'static str {
        match self {
            Operation::SetUser => "VM Index to set user: ",
            Operation::Copy => "VM Index to copy from: ",
            _ => "VM Index to ssh: ",
        }
    }
}

/// One invocation's request, built once from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub operation: Operation,
    pub resource_group: Option<String>,
    pub vm_name: Option<String>,
    pub path: Option<String>,
}

impl OperationRequest {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            resource_group: None,
            vm_name: None,
            path: None,
        }
    }

    pub fn with_vm(mut self, resource_group: Option<String>, vm_name: Option<String>) -> Self {
        self.resource_group = resource_group;
        self.vm_name = vm_name;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// The target VM, only when both halves of its identity were given
    fn explicit_vm(&self) -> Option<VirtualMachine> {
        match (&self.resource_group, &self.vm_name) {
            (Some(rg), Some(name)) => Some(VirtualMachine::new(name.clone(), rg.clone())),
            _ => None,
        }
    }
}

impl From<Commands> for OperationRequest {
    fn from(command: Commands) -> Self {
        match command {
            Commands::SetUser { resource_group, vm_name } => {
                OperationRequest::new(Operation::SetUser).with_vm(resource_group, vm_name)
            }
            Commands::Ssh { resource_group, vm_name } => {
                OperationRequest::new(Operation::Ssh).with_vm(resource_group, vm_name)
            }
            Commands::Cp { path } => OperationRequest::new(Operation::Copy).with_path(path),
            Commands::SetSub => OperationRequest::new(Operation::SetSubscription),
            Commands::GenKey => OperationRequest::new(Operation::GenerateKey),
        }
    }
}

/// How a successful invocation ended; every outcome exits with status 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed(String),
    /// The listing came back empty, so there was nothing to choose from
    NoResources(String),
    /// `genkey` found a key already in place and did nothing
    KeyExists(PathBuf),
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Completed(msg) | Outcome::NoResources(msg) => msg.clone(),
            Outcome::KeyExists(path) => format!("SSH key already exists at {}", path.display()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// Maps an [`OperationRequest`] to its external commands
pub struct Dispatcher<'a, R, W> {
    config: &'a Config,
    executor: &'a dyn CommandExecutor,
    selector: Selector<R, W>,
}

impl<'a, R, W> Dispatcher<'a, R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(config: &'a Config, executor: &'a dyn CommandExecutor, selector: Selector<R, W>) -> Self {
        Self {
            config,
            executor,
            selector,
        }
    }

    /// Run the requested operation to completion
    pub async fn dispatch(&mut self, request: &OperationRequest) -> Result<Outcome> {
        let operation = request.operation;
        with_async_operation_span(operation.as_str(), move || async move {
            match operation {
                Operation::SetUser => self.set_user(request).await,
                Operation::Ssh => self.ssh(request).await,
                Operation::Copy => self.copy(request).await,
                Operation::SetSubscription => self.set_subscription().await,
                Operation::GenerateKey => self.generate_key().await,
            }
        })
        .await
    }

    async fn set_user(&mut self, request: &OperationRequest) -> Result<Outcome> {
        // Read the key first: a missing key must never trigger a listing
        // or a remote update.
        let public_key = read_public_key(self.config.ssh_key_pub_path()).await?;

        let Some(vm) = self.resolve_vm(request).await? else {
            return Ok(no_vms());
        };

        let username = self.config.remote_username();
        info!(
            "Setting user {} and SSH key for VM {} in RG {}",
            username, vm.name, vm.resource_group
        );

        let command = argv([
            "az",
            "vm",
            "user",
            "update",
            "--resource-group",
            vm.resource_group.as_str(),
            "--name",
            vm.name.as_str(),
            "--username",
            username,
            "--ssh-key-value",
            public_key.as_str(),
        ]);
        self.run_step(&command, RunOptions::interactive(), "az vm user update")
            .await?;

        Ok(Outcome::Completed("User and SSH key updated successfully.".to_string()))
    }

    async fn ssh(&mut self, request: &OperationRequest) -> Result<Outcome> {
        let Some(vm) = self.resolve_vm(request).await? else {
            return Ok(no_vms());
        };

        let key = self.config.ssh_key_path().display().to_string();
        let command = argv([
            "az",
            "ssh",
            "vm",
            "--resource-group",
            vm.resource_group.as_str(),
            "--name",
            vm.name.as_str(),
            "--local-user",
            self.config.remote_username(),
            "--private-key-file",
            key.as_str(),
            "--",
            "-o",
            "BatchMode=yes",
            "-o",
            "PasswordAuthentication=no",
            "-o",
            "StrictHostKeyChecking=no",
        ]);

        info!("SSHing into VM {}...", vm.name);
        self.run_step(&command, RunOptions::interactive(), "ssh session")
            .await?;

        Ok(Outcome::Completed(format!("SSH session to {} closed.", vm.name)))
    }

    async fn copy(&mut self, request: &OperationRequest) -> Result<Outcome> {
        let path = request
            .path
            .as_deref()
            .ok_or_else(|| AzaError::invalid_selection("no remote path given to copy"))?;

        let Some(vm) = self.resolve_vm(request).await? else {
            return Ok(no_vms());
        };

        let ip = AzureCli::new(self.executor).public_ip(&vm).await?;

        let dest = self.config.copy_dest_dir();
        tokio::fs::create_dir_all(dest).await?;

        let key = self.config.ssh_key_path().display().to_string();
        let source = format!("{}@{}:{}", self.config.remote_username(), ip, path);
        let target = dest.display().to_string();
        let command = argv([
            "scp",
            "-r",
            "-i",
            key.as_str(),
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=no",
            source.as_str(),
            target.as_str(),
        ]);

        info!("Copying {} from {} ({}) to {}", path, vm.name, ip, target);
        self.run_step(&command, RunOptions::interactive(), "scp").await?;

        Ok(Outcome::Completed(format!("Copied {} to {}", path, target)))
    }

    async fn set_subscription(&mut self) -> Result<Outcome> {
        let subscriptions = AzureCli::new(self.executor).list_subscriptions().await?;
        if subscriptions.is_empty() {
            return Ok(Outcome::NoResources("No subscriptions found for your account.".to_string()));
        }

        let chosen: Subscription = self
            .selector
            .select(&subscriptions, "Subscription Index to activate: ")
            .await?;

        let command = argv(["az", "account", "set", "--subscription", chosen.id.as_str()]);
        self.run_step(&command, RunOptions::interactive(), "az account set")
            .await?;

        Ok(Outcome::Completed(format!("Active subscription set to {}.", chosen.name)))
    }

    async fn generate_key(&mut self) -> Result<Outcome> {
        let key = self.config.ssh_key_path();
        let public = self.config.ssh_key_pub_path();

        if key.exists() {
            debug!("Key present at {}, nothing to do", key.display());
            return Ok(Outcome::KeyExists(key.to_path_buf()));
        }

        if let Some(parent) = key.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let key_arg = key.display().to_string();
        let command = argv([
            "ssh-keygen",
            "-t",
            "rsa",
            "-b",
            "4096",
            "-N",
            "",
            "-C",
            self.config.remote_username(),
            "-f",
            key_arg.as_str(),
        ]);
        let output = self.executor.run(&command, RunOptions::interactive()).await?;
        if !output.success() {
            return Err(AzaError::KeyGeneration(format!(
                "ssh-keygen exited with status {}",
                output.exit_code
            )));
        }

        self.restrict(key, "600").await?;
        self.restrict(public, "644").await?;

        Ok(Outcome::Completed(format!("SSH key pair generated at {}", key.display())))
    }

    /// Both halves of the VM identity, from the request or from one selection
    ///
    /// `None` means the listing was empty.
    async fn resolve_vm(&mut self, request: &OperationRequest) -> Result<Option<VirtualMachine>> {
        if let Some(vm) = request.explicit_vm() {
            return Ok(Some(vm));
        }

        let vms = AzureCli::new(self.executor).list_vms().await?;
        if vms.is_empty() {
            return Ok(None);
        }

        let vm = self
            .selector
            .select(&vms, request.operation.vm_prompt())
            .await?;
        Ok(Some(vm))
    }

    async fn restrict(&self, path: &Path, mode: &str) -> Result<()> {
        let target = path.display().to_string();
        let output = self
            .executor
            .run(&argv(["chmod", mode, target.as_str()]), RunOptions::interactive())
            .await?;
        if !output.success() {
            return Err(AzaError::PermissionSet { path: target });
        }
        Ok(())
    }

    async fn run_step(&self, command: &[String], options: RunOptions<'_>, step: &str) -> Result<()> {
        let output = self.executor.run(command, options).await?;
        if !output.success() {
            return Err(AzaError::command_failed(step, output.exit_code));
        }
        Ok(())
    }
}

fn no_vms() -> Outcome {
    Outcome::NoResources("No VMs found in your subscription.".to_string())
}

async fn read_public_key(path: &Path) -> Result<String> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AzaError::key_read(path, e))?;

    let key = content.trim();
    if key.is_empty() {
        return Err(AzaError::key_read(path, "file is empty"));
    }
    Ok(key.to_string())
}
