//! picker_sim interactive entry point.

use clap::Parser;
use picker_sim::app::run;
use picker_sim::config::{Args, SimConfig};
use picker_sim::logging::init_logger;

fn main() {
    init_logger();
    let cfg = SimConfig::from(Args::parse());

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Finger Picker  Touch Simulator               ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  1-9 = finger at cursor   drag = move   C = cancel   Q = quit");
    println!();

    if let Err(e) = run(cfg) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
