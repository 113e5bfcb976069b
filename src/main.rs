use std::sync::Arc;

use catbridge::adapters::serial_port::SerialPortFactory;
use catbridge::cat::CatSession;
use catbridge::domain::BridgeConfig;
use catbridge::poller;
use catbridge::ports::{SerialConnection, SerialFactory};
use catbridge::service::RadioService;
use catbridge::web::WebServer;

fn main() {
    env_logger::init();

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("catbridge: {e}");
            std::process::exit(1);
        }
    };
    log::info!(
        "polling {} at {} baud, serving on {}",
        config.serial_port,
        config.baud_rate,
        config.bind_addr
    );

    match SerialPortFactory::list_ports() {
        Ok(ports) => {
            for port in ports {
                log::info!("detected serial port: {} ({})", port.name, port.port_type);
            }
        }
        Err(e) => log::warn!("could not enumerate serial ports: {e}"),
    }

    let opener = {
        let port = config.serial_port.clone();
        let baud = config.baud_rate;
        Box::new(move || -> catbridge::domain::CatResult<Box<dyn SerialConnection>> {
            SerialPortFactory::open(&port, baud)
        })
    };
    let service = Arc::new(RadioService::new(CatSession::new(opener)));

    poller::spawn(Arc::clone(&service));

    let server = match WebServer::bind(&config.bind_addr, service) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("catbridge: cannot bind {}: {e}", config.bind_addr);
            std::process::exit(1);
        }
    };
    if let Err(e) = server.run() {
        eprintln!("catbridge: http server failed: {e}");
        std::process::exit(1);
    }
}
