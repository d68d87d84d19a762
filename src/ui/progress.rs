use crate::ui::progress_message::{ProgressMessage, ProgressPhase};
use crate::ui::theme;
use crate::ui::Icons;
use indicatif::{HumanDuration, MultiProgress, ProgressBar};
use owo_colors::OwoColorize;
use std::thread;
use std::time::Duration;

pub struct ProgressManager {
    mp: MultiProgress,
    checking: ProgressBar,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProgressManager {
    pub fn new(total_files: usize) -> (Self, crossbeam::channel::Sender<ProgressMessage>) {
        let (tx, rx) = crossbeam::channel::unbounded::<ProgressMessage>();

        let mp = MultiProgress::new();

        let checking = if console::Term::stdout().is_term() {
            mp.add(ProgressBar::new(total_files as u64).with_message("Checking files"))
        } else {
            ProgressBar::hidden()
        };

        let checking_clone = checking.clone();
        let mp_clone = mp.clone();

        let handle = thread::spawn(move || {
            for msg in rx {
                match msg {
                    ProgressMessage::Started {
                        phase: ProgressPhase::Checking,
                        total,
                    } => {
                        checking_clone.set_length(total as u64);
                    }
                    ProgressMessage::Progress {
                        phase: ProgressPhase::Checking,
                        file,
                    } => {
                        checking_clone.inc(1);
                        if let Some(ref f) = file {
                            checking_clone.set_message(format!("Checking: {}", f));
                        }
                    }
                    ProgressMessage::Finished {
                        phase: ProgressPhase::Checking,
                    } => {
                        checking_clone.finish_with_message("Done");
                    }
                    ProgressMessage::Error(message) => {
                        mp_clone.println(format!("{} {}", Icons::WARN, message)).ok();
                    }
                }
            }
        });

        (
            Self {
                mp,
                checking,
                handle: Some(handle),
            },
            tx,
        )
    }

    pub fn clear(&self) {
        self.mp.clear().ok();
    }

    /// Waits for the listener to drain. Every sender must be dropped first.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }

    pub fn finish_with_summary(&mut self, duration: Duration, files: usize, problems: usize) {
        self.join();
        self.checking.finish_and_clear();
        self.clear();
        println!();
        let style = if problems == 0 { theme().success.clone() } else { theme().warn.clone() };
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success.clone()),
            format!("Complete in {}", HumanDuration(duration)).style(style)
        );
        println!(
            "  {} {}  {} {}",
            Icons::FILE.style(theme().info.clone()),
            files,
            Icons::WARN.style(theme().info.clone()),
            problems
        );
    }
}
