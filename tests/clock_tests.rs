//! Virtual clock behavior under concurrent readers

use park_simulator::VirtualClock;
use std::sync::Arc;
use std::thread;

#[test]
fn now_is_non_decreasing_under_concurrent_readers() {
    let clock = Arc::new(VirtualClock::new(0.0005));
    clock.start();

    let readers: Vec<_> = (0..6)
        .map(|_| {
            let clock = clock.clone();
            thread::spawn(move || {
                let mut last = 0;
                for _ in 0..2000 {
                    let minute = clock.now();
                    assert!(minute >= last, "clock went backwards: {} after {}", minute, last);
                    last = minute;
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn stop_is_visible_to_all_threads() {
    let clock = Arc::new(VirtualClock::new(0.001));
    clock.start();

    let observers: Vec<_> = (0..4)
        .map(|_| {
            let clock = clock.clone();
            thread::spawn(move || {
                while !clock.should_stop() {
                    thread::yield_now();
                }
            })
        })
        .collect();

    clock.sleep_minutes(5);
    clock.stop();
    for observer in observers {
        observer.join().unwrap(); // only returns once the stop is observed
    }
    assert!(clock.should_stop());
}

#[test]
fn max_minutes_auto_stop_latches_permanently() {
    let clock = Arc::new(VirtualClock::with_max_minutes(0.001, 3));
    clock.start();
    clock.sleep_minutes(4);

    assert!(clock.now() >= 3);
    assert!(clock.should_stop());
    // Still latched on every later read, from any thread
    let clock2 = clock.clone();
    thread::spawn(move || assert!(clock2.should_stop())).join().unwrap();
    clock.now();
    assert!(clock.should_stop());
}

#[test]
fn sleep_does_not_block_concurrent_reads() {
    let clock = Arc::new(VirtualClock::new(0.01));
    clock.start();

    let sleeper = {
        let clock = clock.clone();
        thread::spawn(move || clock.sleep_minutes(20))
    };

    // Reads complete promptly while the other thread sleeps
    for _ in 0..100 {
        let _ = clock.now();
        let _ = clock.should_stop();
    }
    clock.stop();
    sleeper.join().unwrap();
}
