use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use anyhow::ensure;
use clap::Parser;
use dining::{DiningHall, HallConfig, MaintainerLimit};
use log::info;

#[derive(Parser, Debug)]
#[command(about = "Run students and cleaners through a shared dining hall")]
struct Args {
    /// Seats in the hall
    #[arg(long, default_value_t = 4)]
    capacity: usize,

    #[arg(long, default_value_t = 8)]
    students: usize,

    #[arg(long, default_value_t = 2)]
    cleaners: usize,

    /// Visits each thread makes
    #[arg(long, default_value_t = 20)]
    rounds: usize,

    /// Let cleaners work side by side instead of one at a time
    #[arg(long)]
    unbounded_cleaners: bool,
}

fn run_dining_hall(args: &Args) -> anyhow::Result<()> {
    let limit = if args.unbounded_cleaners {
        MaintainerLimit::Unbounded
    } else {
        MaintainerLimit::Single
    };
    let hall = DiningHall::new(HallConfig::new(args.capacity).with_maintainer_limit(limit))?;
    let meals = AtomicUsize::new(0);
    let cleanings = AtomicUsize::new(0);
    let violations = AtomicUsize::new(0);

    thread::scope(|s| {
        for id in 0..args.students {
            let (hall, meals, violations) = (&hall, &meals, &violations);
            s.spawn(move || {
                for _ in 0..args.rounds {
                    let seat = hall.student_enter();
                    let snapshot = hall.snapshot();
                    if snapshot.cleaners > 0 || snapshot.students > snapshot.capacity {
                        violations.fetch_add(1, Ordering::Relaxed);
                    }
                    info!("student {id} eating ({}/{})", snapshot.students, snapshot.capacity);
                    thread::sleep(Duration::from_millis(2));
                    meals.fetch_add(1, Ordering::Relaxed);
                    seat.leave();
                }
            });
        }
        for id in 0..args.cleaners {
            let (hall, cleanings, violations) = (&hall, &cleanings, &violations);
            s.spawn(move || {
                for _ in 0..args.rounds {
                    let shift = hall.cleaning_enter();
                    let snapshot = hall.snapshot();
                    if snapshot.students > 0 {
                        violations.fetch_add(1, Ordering::Relaxed);
                    }
                    info!("cleaner {id} cleaning ({} on shift)", snapshot.cleaners);
                    thread::sleep(Duration::from_millis(5));
                    cleanings.fetch_add(1, Ordering::Relaxed);
                    shift.leave();
                }
            });
        }
    });

    let violations = violations.into_inner();
    ensure!(violations == 0, "{violations} admissions broke mutual exclusion");
    info!(
        "served {} meals and {} cleanings",
        meals.into_inner(),
        cleanings.into_inner()
    );
    hall.destroy();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    run_dining_hall(&args)
}
