// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod config;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use brand_core::GitVcsQuery;
use brand_store::RedisStoreClient;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Cli;
use crate::run::BooterContext;

fn init_tracing(log_dir: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "booter.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).compact().init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_ref());

    let store = match RedisStoreClient::connect(
        &format!("redis://{}:{}/", cli.store_host, cli.store_port),
        Duration::from_secs(1),
    )
    .await
    {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("could not connect to store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let project_dir = cli.project_dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let vcs = GitVcsQuery;
    let ctx = BooterContext {
        machine: &cli.machine,
        binary_dir: &cli.binary_dir,
        project_dir: &project_dir,
        vcs: &vcs,
    };

    match run::run(&store, &ctx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("booter exiting on fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
