//! Subcommand execution against a running device actor.

use std::time::Duration;

use aerogarden_control::DeviceHandle;
use aerogarden_core::AccessoryInfo;
use anyhow::Context;

use crate::Command;

/// Run one subcommand to completion.
pub async fn run(light: &DeviceHandle, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Info { name } => {
            print_info(&AccessoryInfo::new(name));
            Ok(())
        }
        Command::GetPower => {
            let on = light.get_power().await?;
            println!("{}", if on { "on" } else { "off" });
            Ok(())
        }
        Command::SetPower { power } => {
            let ack = light.set_power(power.is_on()).await?;
            tracing::info!(device_id = %light.device_id(), "Waiting for acknowledgment");
            ack.await.context("set-power was not acknowledged")?;
            println!("{}", light.state());
            Ok(())
        }
        Command::SetBrightness { value } => {
            light.set_brightness(value).await?;
            println!("{}", light.state());
            Ok(())
        }
        Command::Watch { interval_secs } => watch(light, Duration::from_secs(interval_secs)).await,
    }
}

fn print_info(info: &AccessoryInfo) {
    println!("Name:          {}", info.display_name);
    println!("Manufacturer:  {}", info.manufacturer);
    println!("Model:         {}", info.model);
    println!("Serial number: {}", info.serial_number);
}

async fn watch(light: &DeviceHandle, interval: Duration) -> anyhow::Result<()> {
    let mut states = light.subscribe();
    let mut ticker = tokio::time::interval(interval);
    println!("{}", light.state());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                return Ok(());
            }
            _ = ticker.tick() => {
                light.get_power().await?;
            }
            changed = states.changed() => {
                changed.context("device actor stopped")?;
                let state = *states.borrow_and_update();
                println!("{state}");
            }
        }
    }
}
