//! Interactive text menu.
//!
//! Presents the numbered mode menu, validates stdin input, and dispatches
//! into [`crate::pipeline`].  Mode errors are printed and control returns
//! to the menu; only "Exit" leaves the loop.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::config::PipelineConfig;
use crate::pipeline;

// ---------------------------------------------------------------------------
// Menu parsing
// ---------------------------------------------------------------------------

/// One selectable menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Record, process, play back and save.
    Batch,
    /// Realtime voice changer (microphone → headphones).
    Realtime,
    /// Quit the program.
    Exit,
}

/// Parse a menu selection line.  Returns `None` for anything that is not
/// exactly 1, 2 or 3.
pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    match line.trim().parse::<u32>() {
        Ok(1) => Some(MenuChoice::Batch),
        Ok(2) => Some(MenuChoice::Realtime),
        Ok(3) => Some(MenuChoice::Exit),
        _ => None,
    }
}

/// Parse a recording duration line: a whole number of seconds, at least 1.
pub fn parse_duration(line: &str) -> Option<u32> {
    match line.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(secs),
    }
}

// ---------------------------------------------------------------------------
// Menu loop
// ---------------------------------------------------------------------------

fn print_menu() {
    println!();
    println!("========================================");
    println!("       VOICE CHANGER");
    println!("========================================");
    println!(" 1. Record, process, listen and save");
    println!(" 2. Realtime voice changer (microphone -> headphones)");
    println!(" 3. Exit");
    println!("========================================");
}

fn prompt(text: &str) -> std::io::Result<String> {
    print!("{text}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// Run the menu loop until the user chooses Exit.
///
/// A failed mode is reported and the loop continues; this function only
/// errors if stdin/stdout themselves break.
pub fn run(config: &PipelineConfig) -> Result<()> {
    loop {
        print_menu();
        let line = prompt("Please enter an option (1-3): ")?;

        match parse_choice(&line) {
            Some(MenuChoice::Batch) => {
                let line = prompt("Recording duration in seconds: ")?;
                match parse_duration(&line) {
                    Some(secs) => {
                        if let Err(e) = pipeline::run_batch(config, secs) {
                            log::error!("batch mode failed: {e:#}");
                            println!("Recording failed: {e:#}");
                        }
                    }
                    None => println!("Invalid duration. Enter a whole number above 0."),
                }
            }

            Some(MenuChoice::Realtime) => {
                if let Err(e) = run_realtime_until_enter(config) {
                    log::error!("realtime mode failed: {e}");
                    println!("Realtime mode failed: {e}");
                }
            }

            Some(MenuChoice::Exit) => {
                println!("Goodbye!");
                return Ok(());
            }

            None => println!("Invalid option. Please enter 1, 2 or 3."),
        }
    }
}

/// Drive the realtime pipeline on a background thread while the main
/// thread waits for Enter, then signal the stop flag and join.
///
/// Session errors are reported as soon as the thread exits: a short grace
/// window catches setup failures (no device, refused stream) before any
/// stdin wait starts, and the Enter wait itself also watches for the
/// session ending on its own.
fn run_realtime_until_enter(config: &PipelineConfig) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));

    let handle = {
        let config = config.clone();
        let stop = Arc::clone(&stop);
        std::thread::Builder::new()
            .name("realtime-session".into())
            .spawn(move || pipeline::run_realtime(&config, stop))
            .expect("failed to spawn realtime session thread")
    };

    if !finished_within(&handle, Duration::from_millis(200)) {
        println!("Realtime voice changer running. Press Enter to stop.");

        // Reading stdin blocks, so park that on its own thread and poll
        // both the Enter signal and the session thread.
        let (enter_tx, enter_rx) = mpsc::channel::<()>();
        std::thread::Builder::new()
            .name("stdin-wait".into())
            .spawn(move || {
                let mut line = String::new();
                let _ = std::io::stdin().lock().read_line(&mut line);
                let _ = enter_tx.send(());
            })
            .expect("failed to spawn stdin wait thread");

        while enter_rx.try_recv().is_err() && !handle.is_finished() {
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    stop.store(true, Ordering::Release);
    handle
        .join()
        .expect("realtime session thread panicked")?;
    Ok(())
}

/// Poll `handle` for up to `window`, returning `true` once its thread has
/// finished.
fn finished_within<T>(handle: &std::thread::JoinHandle<T>, window: Duration) -> bool {
    let deadline = Instant::now() + window;
    while Instant::now() < deadline {
        if handle.is_finished() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    handle.is_finished()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parses_valid_options() {
        assert_eq!(parse_choice("1"), Some(MenuChoice::Batch));
        assert_eq!(parse_choice("2\n"), Some(MenuChoice::Realtime));
        assert_eq!(parse_choice("  3  "), Some(MenuChoice::Exit));
    }

    #[test]
    fn choice_rejects_garbage() {
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("4"), None);
        assert_eq!(parse_choice("two"), None);
        assert_eq!(parse_choice("-1"), None);
        assert_eq!(parse_choice("1.5"), None);
    }

    #[test]
    fn duration_accepts_positive_seconds() {
        assert_eq!(parse_duration("5"), Some(5));
        assert_eq!(parse_duration(" 120 \n"), Some(120));
    }

    #[test]
    fn duration_rejects_zero_negative_and_garbage() {
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("-3"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("2.5"), None);
    }

    /// A session thread that fails right away must be detected inside the
    /// grace window, so its error is reported without waiting on stdin.
    #[test]
    fn finished_within_detects_fast_session_exit() {
        let handle = std::thread::spawn(|| ());
        assert!(finished_within(&handle, Duration::from_secs(2)));
        handle.join().unwrap();
    }

    #[test]
    fn finished_within_times_out_on_running_session() {
        let (hold_tx, hold_rx) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let _ = hold_rx.recv();
        });

        assert!(!finished_within(&handle, Duration::from_millis(50)));

        hold_tx.send(()).unwrap();
        handle.join().unwrap();
    }
}
