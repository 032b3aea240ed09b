use actix_server::ServerHandle;
use actix_web::{App, HttpServer, web::Data};
use anyhow::{Context, Result};
use log::{debug, error, info};
use std::sync::Arc;
use switch_panel::{
    api::Api,
    automation::Automation,
    board::{SimulatedBoard, SwitchBoard},
    config::{AppConfig, Environment},
    controller::Controller,
    logging::{self, LogBuffer},
};
use tokio::signal::unix::{SignalKind, signal};

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        error!("application error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let log_buffer = Arc::new(LogBuffer::default());
    logging::init(Arc::clone(&log_buffer))?;

    info!("module version: {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().context("failed to load configuration")?;
    debug!("configuration: {config:?}");

    match config.environment {
        Environment::Dev => run_until_shutdown(SimulatedBoard::default(), config, log_buffer).await,
        Environment::Prod => run_on_gpio(config, log_buffer).await,
    }
}

#[cfg(feature = "gpio")]
async fn run_on_gpio(config: AppConfig, log_buffer: Arc<LogBuffer>) -> Result<()> {
    let board = switch_panel::board::GpioBoard::new(&config.board)
        .context("failed to set up GPIO board")?;
    run_until_shutdown(board, config, log_buffer).await
}

#[cfg(not(feature = "gpio"))]
async fn run_on_gpio(_config: AppConfig, _log_buffer: Arc<LogBuffer>) -> Result<()> {
    anyhow::bail!("prod environment requires a build with the gpio feature")
}

async fn run_until_shutdown<B>(board: B, config: AppConfig, log_buffer: Arc<LogBuffer>) -> Result<()>
where
    B: SwitchBoard + Send + Sync + 'static,
{
    info!("starting server");

    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to install SIGTERM handler")?;

    let controller = Arc::new(Controller::new(board));
    let automation = controller.spawn_automation(Automation::new(config.automation.clone()));

    let (server_handle, server_task) =
        run_server(Api::new(Arc::clone(&controller), log_buffer), &config)?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => debug!("ctrl-c received"),
        _ = sigterm.recv() => debug!("SIGTERM received"),
        result = server_task => {
            match result {
                Ok(Ok(())) => debug!("server stopped normally"),
                Ok(Err(e)) => error!("server stopped with error: {e}"),
                Err(e) => error!("server task panicked: {e}"),
            }
        },
    }

    info!("shutting down");

    server_handle.stop(true).await;
    automation.stop().await;
    controller.shutdown();

    info!("shutdown complete");

    Ok(())
}

fn run_server<B>(
    api: Api<B>,
    config: &AppConfig,
) -> Result<(
    ServerHandle,
    tokio::task::JoinHandle<Result<(), std::io::Error>>,
)>
where
    B: SwitchBoard + Send + Sync + 'static,
{
    let webapp_dir = config.ui.webapp_dir.clone();
    let address = format!("{}:{}", config.ui.bind_address, config.ui.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(Data::new(api.clone()))
            .configure(Api::<B>::routes)
            .service(Api::<B>::static_files(&webapp_dir))
    })
    .bind(&address)
    .with_context(|| format!("failed to bind server to {address}"))?
    .disable_signals()
    .run();

    info!("listening on {address}");

    Ok((server.handle(), tokio::spawn(server)))
}
