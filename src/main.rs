// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tidemark CLI entrypoint.
//!
//! By default this runs the dashboard TUI over the built-in demo commit feed and serves the same
//! feed as a JSON API at `http://127.0.0.1:<port>/api/0/commits/`.
//!
//! Use `--serve` to run only the API (intended for driving the request/response contract from
//! other tools).

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tidemark::controller::DataController;
use tidemark::nav::{self, MemoryNavigator};
use tidemark::server::{self, FixtureClient, COMMITS_ENDPOINT};
use tidemark::tui;
use tidemark::ui::ChangeSignal;

const DEFAULT_API_HTTP_PORT: u16 = 27630;
const DEFAULT_POLL_SECS: u64 = 30;
const DEMO_FETCH_LATENCY: Duration = Duration::from_millis(150);

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<query-string>] [--port <port>] [--poll <secs>]\n  {program} [--query <query-string>] [--port <port>] [--poll <secs>]\n  {program} --serve [--port <port>] [--page-size <n>]\n\nTUI mode (default) shows the demo commit feed and serves it as JSON at\n`http://127.0.0.1:<port>/api/0/commits/`. --port selects the port (0 = ephemeral;\ndefault {DEFAULT_API_HTTP_PORT}).\n\nA query string (positional or --query) restores a shared view, e.g. 'branch=main'.\n--poll sets the live-update interval in seconds (default {DEFAULT_POLL_SECS}; toggled with 'l').\n\n--serve runs only the API; --page-size overrides the feed page size."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    serve: bool,
    port: Option<u16>,
    poll_secs: Option<u64>,
    query: Option<String>,
    page_size: Option<usize>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serve" => {
                if options.serve {
                    return Err(());
                }
                options.serve = true;
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--poll" => {
                if options.poll_secs.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let secs: u64 = raw.parse().map_err(|_| ())?;
                if secs == 0 {
                    return Err(());
                }
                options.poll_secs = Some(secs);
            }
            "--query" => {
                if options.query.is_some() {
                    return Err(());
                }
                let query = args.next().ok_or(())?;
                options.query = Some(query);
            }
            "--page-size" => {
                if options.page_size.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let page_size: usize = raw.parse().map_err(|_| ())?;
                if page_size == 0 {
                    return Err(());
                }
                options.page_size = Some(page_size);
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.query.is_some() {
                    return Err(());
                }
                options.query = Some(arg);
            }
        }
    }

    if options.serve && (options.query.is_some() || options.poll_secs.is_some()) {
        return Err(());
    }

    Ok(options)
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "tidemark".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let store = Arc::new(match options.page_size {
            Some(page_size) => server::FixtureStore::demo_with_page_size(page_size),
            None => server::FixtureStore::demo(),
        });
        let port = options.port.unwrap_or(DEFAULT_API_HTTP_PORT);

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.serve {
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
                let local = listener.local_addr()?;
                eprintln!("tidemark: serving the commit feed at http://{local}{COMMITS_ENDPOINT}");
                axum::serve(listener, server::router(store)).await?;
                Ok::<(), Box<dyn Error>>(())
            })?;
            return Ok(());
        }

        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;

            let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
            let router = server::router(Arc::clone(&store));
            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                });
                if let Err(err) = serve.await {
                    eprintln!("tidemark: API server error: {err}");
                }
            });

            let navigator =
                Arc::new(MemoryNavigator::with_query(options.query.clone().unwrap_or_default()));
            let signal = Arc::new(ChangeSignal::new());
            let client =
                Arc::new(FixtureClient::new(Arc::clone(&store)).with_latency(DEMO_FETCH_LATENCY));
            let controller = DataController::new_with_navigator_and_host(
                COMMITS_ENDPOINT,
                client,
                navigator.clone(),
                signal.clone(),
            );

            let initial_params = nav::params_from_address(navigator.as_ref())?;
            let poll_interval = Duration::from_secs(options.poll_secs.unwrap_or(DEFAULT_POLL_SECS));
            let app = tui::App::new(
                controller,
                signal,
                navigator,
                store.branches(),
                poll_interval,
                initial_params,
            );

            let tui_join =
                tokio::task::spawn_blocking(move || tui::run(app).map_err(|err| err.to_string()))
                    .await;

            let _ = shutdown_tx.send(());
            let _ = server_handle.await;

            let tui_result = tui_join.map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| {
                Box::new(std::io::Error::new(std::io::ErrorKind::Other, err)) as Box<dyn Error>
            })?;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("tidemark: {err}");
        std::process::exit(1);
    }
}
