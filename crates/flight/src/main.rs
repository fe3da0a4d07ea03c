//! Flyover - headless scripted flight. Reads `flyover.ron` if present.

use anyhow::Result;
use engine_core::Time;
use flight::{spawn_loader, write_snapshot, AircraftModel, FlightConfig, FlightScript, Simulation};
use input::KeyState;
use std::sync::mpsc::TryRecvError;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = FlightConfig::load();
    let session = config.session.clone();
    let script = FlightScript::from_segments(&session.script)?;
    let mut sim = Simulation::new(config)?;

    log::info!(
        "Flying {} ticks ({} scripted) at {} ms per frame",
        session.ticks,
        script.len(),
        session.frame_millis
    );

    let loader = spawn_loader(
        AircraftModel::default(),
        Duration::from_millis(session.aircraft_load_millis),
    );
    let mut loader_open = true;
    let mut keys = KeyState::new();
    let mut time = Time::new();
    let frame = Duration::from_millis(session.frame_millis);

    for tick in 0..session.ticks {
        if loader_open {
            match loader.try_recv() {
                Ok(model) => {
                    sim.attach_aircraft(&model);
                    loader_open = false;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Aircraft loader exited without a model; flying without one");
                    loader_open = false;
                }
            }
        }

        script.apply(tick, &mut keys);
        time.update();
        let report = sim.tick(keys.snapshot(), time.elapsed_millis());

        if tick % session.report_every == 0 {
            log::info!(
                "tick {:>5} | offset ({:>8.2}, {:>8.2}, {:>7.2}) | roll {:>6.3} pitch {:>6.3} yaw {:>5.2} | x{:.1} | clouds {} trail {}{}",
                report.tick,
                report.offset.x,
                report.offset.z,
                report.offset.y,
                report.roll,
                report.pitch,
                report.yaw,
                report.speed_multiplier,
                report.clouds,
                report.trail,
                if report.aircraft_present { "" } else { " | waiting for aircraft" },
            );
        }

        if !frame.is_zero() {
            thread::sleep(frame);
        }
    }

    log::info!(
        "Finished after {} ticks, {:.1} fps average",
        sim.ticks(),
        time.frame_count() as f32 / time.elapsed().as_secs_f32().max(f32::EPSILON)
    );

    if let Some(path) = &session.snapshot {
        write_snapshot(&sim, path, session.snapshot_scale)?;
    }

    Ok(())
}
