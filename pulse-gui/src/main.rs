//! # Pulse - Tap Heart-Rate Estimator
//!
//! This module contains the GUI application for Pulse. The user taps in
//! rhythm with their pulse; the readout shows the running BPM estimate,
//! tinted by heart-rate zone, and flashes the final value when the
//! session ends.
//!
//! ## Architecture
//! - **Main Thread**: Iced application with dark theme; all state mutation
//!   happens in `update` on the event loop
//! - **Idle timeout**: a one-shot deferred task whose message carries an
//!   idle token; stale deliveries are ignored by the estimator
//! - **Flash**: a timer subscription that only exists while a flash
//!   sequence is active and self-terminates with it

mod settings;
mod ui;

use std::time::Instant;

use iced::{self, Element, Subscription, Task, Theme};
use log::{error, info};
use pulse_core::{
    Readout,
    estimator::{EstimatorConfig, IdleToken, TapEstimator},
    flash::{FlashFrame, FlashSequence},
    profile,
    zones::{self, Zone},
};
use settings::SettingsStore;
use ui::main_display::create_main_view;

/// Preset ages offered in the age picker.
pub const AGE_PRESETS: [u8; 11] = [20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70];

/// Main entry point for the Pulse application.
pub fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("starting Pulse");

    iced::application("Pulse", PulseApp::update, PulseApp::view)
        .subscription(PulseApp::subscription)
        .theme(PulseApp::theme)
        .window_size((360.0, 520.0))
        .run()
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    // Measurement
    TapPressed,             // The tap surface was pressed
    IdleElapsed(IdleToken), // The deferred idle timeout fired
    FlashTick,              // Repeating flash timer tick

    // Age selection
    AgePicked(u8),           // A preset age button was pressed
    AgeInputChanged(String), // The custom age field changed
    AgeInputSubmitted,       // The custom age was submitted

    // Application control
    Exit,
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    pub readout: Readout,
    pub zone: Option<Zone>,
    pub age: u8,
    pub max_heart_rate: u16,
    pub age_input: String,
    pub age_notice: Option<String>,
    pub tap_count: usize,
    pub measuring: bool,
}

/// Main application state.
///
/// Owns the estimator value and the settings store; the view renders
/// purely from [`AppDisplayData`] derived on demand.
struct PulseApp {
    estimator: TapEstimator,
    flash: Option<FlashSequence>,
    settings: SettingsStore,
    age_input: String,
    age_notice: Option<String>,
}

impl Default for PulseApp {
    fn default() -> Self {
        let settings = SettingsStore::load(settings::DEFAULT_SETTINGS_FILE);
        let age_input = settings.age().to_string();

        Self {
            estimator: TapEstimator::new(EstimatorConfig::default()),
            flash: None,
            settings,
            age_input,
            age_notice: None,
        }
    }
}

impl PulseApp {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TapPressed => {
                // A tap always starts or extends a live session, so any
                // flash still on screen is cancelled first.
                self.flash = None;

                let outcome = self.estimator.tap(Instant::now());
                if !outcome.accepted {
                    return Task::none();
                }

                // Rearm the idle timeout. The token makes the previous
                // pending timeout a no-op when it eventually fires.
                let token = outcome.idle_token;
                let threshold = self.estimator.config().idle_threshold;
                Task::perform(tokio::time::sleep(threshold), move |_| {
                    Message::IdleElapsed(token)
                })
            }
            Message::IdleElapsed(token) => {
                if let Some(ended) = self.estimator.idle_elapsed(token) {
                    info!(
                        "session ended after {} taps, estimate {:?}",
                        ended.tap_count, ended.final_bpm
                    );
                    self.flash = ended
                        .final_bpm
                        .map(|bpm| FlashSequence::new(bpm, self.estimator.config().flash_toggles));
                }
                Task::none()
            }
            Message::FlashTick => {
                if let Some(flash) = &mut self.flash {
                    if flash.advance() == FlashFrame::Finished {
                        self.flash = None;
                    }
                }
                Task::none()
            }
            Message::AgePicked(age) => {
                self.apply_age(age);
                Task::none()
            }
            Message::AgeInputChanged(input) => {
                self.age_input = input;
                Task::none()
            }
            Message::AgeInputSubmitted => {
                match profile::parse_age(&self.age_input) {
                    Ok(age) => self.apply_age(age),
                    Err(err) => self.age_notice = Some(err.to_string()),
                }
                Task::none()
            }
            Message::Exit => {
                info!("quit requested");
                std::process::exit(0);
            }
        }
    }

    fn apply_age(&mut self, age: u8) {
        match self.settings.set_age(age) {
            Ok(()) => {
                self.age_notice = None;
                self.age_input = self.settings.age().to_string();
            }
            Err(err) => {
                error!("age rejected: {err:#}");
                self.age_notice = Some(err.to_string());
            }
        }
    }

    /// Derives everything the view needs for the current frame.
    fn display_data(&self) -> AppDisplayData {
        let snapshot = self.estimator.snapshot();

        let readout = match &self.flash {
            Some(flash) => match flash.frame() {
                FlashFrame::Bpm(bpm) => Readout::Bpm(bpm),
                FlashFrame::Blank => Readout::Blank,
                FlashFrame::Finished => Readout::Placeholder,
            },
            None => match snapshot.bpm {
                Some(bpm) => Readout::Bpm(bpm),
                None => Readout::Placeholder,
            },
        };

        let max_heart_rate = self.settings.profile().max_heart_rate();
        let zone = match readout {
            Readout::Bpm(bpm) => Some(zones::classify(bpm, max_heart_rate)),
            _ => None,
        };

        AppDisplayData {
            readout,
            zone,
            age: self.settings.age(),
            max_heart_rate,
            age_input: self.age_input.clone(),
            age_notice: self.age_notice.clone(),
            tap_count: snapshot.tap_count,
            measuring: snapshot.measuring,
        }
    }

    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data())
    }

    /// The flash timer only runs while a flash sequence is active.
    fn subscription(&self) -> Subscription<Message> {
        match &self.flash {
            Some(_) => iced::time::every(self.estimator.config().flash_interval)
                .map(|_| Message::FlashTick),
            None => Subscription::none(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
