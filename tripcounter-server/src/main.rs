use actix_web::web::Data;
use actix_web::{App, HttpServer};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode,
};
use std::sync::Arc;

use tripcounter_common::db::TableStore;
use tripcounter_common::gateway::{FileGateway, MemoryGateway, TableGateway};

mod env;
mod handlers;
mod middleware;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 9000u16;

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let base_addr = format!("127.0.0.1:{}", &port);

    let _logger = Logger::try_with_str(&env::CONF.log_level)
        .expect("Invalid log level")
        .log_to_file(FileSpec::default().directory("./logs"))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    env::startup_report();

    let gateway: Arc<dyn TableGateway> = match &env::CONF.data_dir {
        Some(dir) => {
            log::info!("Storing tables under '{}'", dir.display());

            match FileGateway::new(dir.clone()) {
                Ok(gateway) => Arc::new(gateway),
                Err(e) => {
                    eprintln!("ERROR: Failed to open the data directory: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            log::warn!("No data directory is configured. Tables will not survive a restart");
            Arc::new(MemoryGateway::new())
        }
    };

    let store = TableStore::new(gateway).with_retry(env::CONF.retry_policy());

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(store.clone()))
            .configure(services::api::configure)
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(env::CONF.actix_worker_count)
    .bind(base_addr)?
    .run()
    .await?;

    Ok(())
}
