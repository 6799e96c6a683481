// SPDX-License-Identifier: MPL-2.0

//! Monitor program: Log in to a DSP-W215, print its readings every few
//! seconds and optionally switch it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example plug_monitor -- <host> <pin> [on|off]
//! ```
//!
//! # Example
//!
//! ```bash
//! cargo run --example plug_monitor -- 192.168.0.20 123456 on
//! ```

use std::env;
use std::time::Duration;
use w215_lib::{PlugConfig, PlugDevice, PlugEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 && args.len() != 4 {
        eprintln!("Usage: {} <host> <pin> [on|off]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --example plug_monitor -- 192.168.0.20 123456 on");
        std::process::exit(1);
    }

    let config = PlugConfig::new(&args[1], &args[2]).with_name("Monitored Plug");

    println!("Connecting to {}...", config.host);
    let device = PlugDevice::from_config(&config)?.connect().await;

    if !device.session().is_authenticated() {
        eprintln!("Login failed, check the PIN printed on the plug");
        std::process::exit(1);
    }
    println!("Connected!");

    let mut events = device.subscribe();

    match args.get(3).map(String::as_str) {
        Some("on") => println!("Relay is now {}", on_off(device.write_power(true).await?)),
        Some("off") => println!("Relay is now {}", on_off(device.write_power(false).await?)),
        Some(other) => eprintln!("Ignoring unknown switch argument {other:?}"),
        None => {}
    }

    for _ in 0..5 {
        match device.poll().await {
            Ok(snapshot) => println!(
                "{}: {} W, {:.3} kWh, {:.1} C",
                on_off(snapshot.power()),
                snapshot.instantaneous_power(),
                snapshot.cumulative_energy(),
                snapshot.temperature()
            ),
            Err(e) => println!("Poll failed: {e}"),
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    while let Ok(event) = events.try_recv() {
        if let PlugEvent::SessionChanged { authenticated } = event {
            println!("Session changed (authenticated: {authenticated})");
        }
    }

    println!("Done!");
    Ok(())
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}
