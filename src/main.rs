mod colors;
mod config;
mod error;
mod http;
mod log;
mod metrics;
mod routes;
mod server;
mod store;

fn main() {
    metrics::init();
    let c = config::load_config();
    log::init(c.server.logging);
    log::set_level(&c.server.log_level);
    log::separator();
    if let Err(e) = server::Server::new(c.server).run() {
        log::error(&format!("Server failed: {e}"));
        std::process::exit(1);
    }
}
