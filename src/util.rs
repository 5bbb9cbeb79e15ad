use std::net::Ipv4Addr;

const DEVICE_PORT: &str = "DEVICE_PORT";

const DEFAULT_PORT: u16 = 80;

pub fn get_port() -> u16 {
    let port_from_env = std::env::var(DEVICE_PORT);
    port_from_env.map_or(DEFAULT_PORT, |res| res.parse().unwrap_or(DEFAULT_PORT))
}

const DEVICE_ADDR: &str = "DEVICE_ADDR";

const DEFAULT_ADDR: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub fn get_addr() -> Ipv4Addr {
    let addr_from_env = std::env::var(DEVICE_ADDR);
    addr_from_env.map_or(DEFAULT_ADDR, |res| res.parse().unwrap_or(DEFAULT_ADDR))
}

const ENVMON_DEVICE: &str = "ENVMON_DEVICE";

/// Device address the monitor should connect to on startup, if any
pub fn get_device() -> Option<String> {
    std::env::var(ENVMON_DEVICE)
        .ok()
        .filter(|device| !device.trim().is_empty())
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
