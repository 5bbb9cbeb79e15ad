//! Stand-in sensor board
//!
//! Serves simulated readings at `/api/sensors` in the same format a real device
//! uses, so the live path of the monitor can be exercised without hardware.

use envmon::{
    DeviceReport,
    sources::simulator,
    util::{get_addr, get_port},
};
use rocket::{figment::Figment, get, launch, routes, serde::json::Json};
use tracing::{instrument, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

#[get("/api/sensors")]
#[instrument]
fn sensors() -> Json<DeviceReport> {
    let reading = simulator::simulate();
    trace!("serving reading: {reading:?}");

    Json(DeviceReport::from(&reading))
}

#[get("/ping")]
fn ping() {}

fn init() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(true),
        )
        .with(filter::LevelFilter::DEBUG)
        .init();
}

fn get_config() -> Figment {
    rocket::Config::figment()
        .merge(("port", get_port()))
        .merge(("address", get_addr()))
        .merge(("workers", 1))
}

#[launch]
fn rocket() -> _ {
    init();
    let figment = get_config();

    rocket::custom(figment).mount("/", routes![sensors, ping])
}
