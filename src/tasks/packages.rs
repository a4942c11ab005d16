//! Package installation tasks, one per backend.
use std::sync::Arc;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::gate::{GatePolicy, Guard, Predicate, if_any_funcs};
use crate::resources::package::{Backend, PackageInstaller};
use crate::resources::{Applicable, ResourceChange};

/// Admit on Debian or Ubuntu.
fn on_debian_family(ctx: &Context) -> Guard {
    let debian = Arc::clone(&ctx.platform);
    let ubuntu = Arc::clone(&ctx.platform);
    if_any_funcs(
        vec![
            Predicate::new("is_debian", move || debian.is_debian()),
            Predicate::new("is_ubuntu", move || ubuntu.is_ubuntu()),
        ],
        GatePolicy::Silent,
    )
}

/// Admit on any Apple system.
fn on_osx(ctx: &Context) -> Guard {
    let platform = Arc::clone(&ctx.platform);
    if_any_funcs(
        vec![Predicate::new("is_osx", move || {
            platform.is_apple_system(None)
        })],
        GatePolicy::Silent,
    )
}

/// Refresh the cache and install `names` with `backend`.
fn install_packages(ctx: &Context, backend: Backend, names: &[String]) -> Result<TaskResult> {
    let installer = PackageInstaller::new(backend, names, ctx.executor.as_ref());
    if installer.names().is_empty() {
        return Ok(TaskResult::Skipped(format!(
            "no {backend} packages configured"
        )));
    }

    if let Some(program) = backend
        .required_programs()
        .iter()
        .find(|p| !ctx.executor.which(p))
    {
        ctx.log.debug(&format!("{program} not found in PATH"));
        return Ok(TaskResult::Skipped(format!("{program} not installed")));
    }

    ctx.log.debug(&installer.description());

    if ctx.dry_run {
        for command in installer.commands() {
            ctx.log.dry_run(&command.display());
        }
        return Ok(TaskResult::DryRun);
    }

    match installer.apply()? {
        ResourceChange::Applied | ResourceChange::AlreadyCorrect => {
            ctx.log.info(&format!(
                "{} {backend} packages processed",
                installer.names().len()
            ));
            Ok(TaskResult::Ok)
        }
        ResourceChange::Skipped { reason } => Ok(TaskResult::Skipped(reason)),
    }
}

/// Install command-line packages with apt-get.
#[derive(Debug)]
pub struct InstallAptPackages;

impl Task for InstallAptPackages {
    fn name(&self) -> &'static str {
        "Install apt packages"
    }

    fn guard(&self, ctx: &Context) -> Guard {
        on_debian_family(ctx)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_packages(ctx, Backend::Apt, &ctx.config.packages.apt)
    }
}

/// Install Homebrew formulae.
#[derive(Debug)]
pub struct InstallBrewPackages;

impl Task for InstallBrewPackages {
    fn name(&self) -> &'static str {
        "Install brew packages"
    }

    fn guard(&self, ctx: &Context) -> Guard {
        on_osx(ctx)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_packages(ctx, Backend::Brew, &ctx.config.packages.brew)
    }
}

/// Install Homebrew casks.
#[derive(Debug)]
pub struct InstallBrewCasks;

impl Task for InstallBrewCasks {
    fn name(&self) -> &'static str {
        "Install brew casks"
    }

    fn guard(&self, ctx: &Context) -> Guard {
        on_osx(ctx)
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        install_packages(ctx, Backend::BrewCask, &ctx.config.packages.cask)
    }
}
