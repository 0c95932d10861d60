// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod config;
mod lifecycle;
mod paths;
mod run;
mod startup;

use std::path::PathBuf;
use std::process::ExitCode;

use brand_core::{GitVcsQuery, GraphStatus, VcsQuery};
use brand_store::StoreClient;
use brand_wire::{GraphSource, GraphStatusEvent, Stream};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Cli;
use crate::lifecycle::{Lifecycle, LifecycleConfig};

fn init_tracing(log_dir: Option<&PathBuf>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "supervisor.log");
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

    let _store_process = match startup::spawn_store(&cli).await {
        Ok(process) => process,
        Err(err) => {
            tracing::error!("could not start store server: {err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match startup::connect(&cli).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!("could not connect to store: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = store.append(Stream::GraphStatus.as_str(), GraphStatusEvent::ok(GraphStatus::Stopped).to_fields()).await {
        tracing::error!("could not append initial graph_status: {err}");
        return ExitCode::FAILURE;
    }

    let vcs = GitVcsQuery;
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let brand_hash = vcs.head_hash(&cwd).unwrap_or_default();

    let config = LifecycleConfig {
        binary_dir: cli.binary_dir.clone(),
        data_dir: cli.data_dir.clone(),
        project_dir: cli.project_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        redis_host: cli.host.clone(),
        redis_port: cli.port,
        machine: cli.machine.clone(),
        brand_hash,
    };
    let mut lc = Lifecycle::new(config, &vcs);

    if let Some(graph) = &cli.graph {
        let source = GraphSource::File(graph.to_string_lossy().into_owned());
        if let Err(err) = lc.load_graph(&store, source, None, Utc::now()).await {
            tracing::error!("could not load initial graph: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run::run(&store, &mut lc).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("supervisor exiting on fatal error: {err}");
            ExitCode::FAILURE
        }
    }
}
