use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::time::Instant;

use crate::config::AppConfig;
use crate::pricing::{Billing, Quote, TIERS};
use crate::slider::{Outcome, Step, TierSlider, Track};
use crate::store::KeyValueStore;
use crate::theme::ThemeMode;

/// Store key holding "monthly" or "yearly"
pub const BILLING_KEY: &str = "billing";

/// Seconds a status message stays in the info line
const STATUS_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Slider,
    Billing,
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
}

/// Command line overrides applied on top of config and saved preferences
#[derive(Debug, Clone, Copy, Default)]
pub struct StartOptions {
    /// 0-based tier index
    pub tier: Option<usize>,
    pub billing: Option<Billing>,
    pub theme: Option<ThemeMode>,
}

pub struct App {
    pub slider: TierSlider,
    pub billing: Billing,
    pub theme: ThemeMode,
    pub focus: Focus,
    pub popup: Popup,
    pub show_features: bool,

    // Status message (shown in info line, auto-clears after timeout)
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,

    store: Box<dyn KeyValueStore>,
}

impl App {
    pub fn new(config: &AppConfig, store: Box<dyn KeyValueStore>, options: StartOptions) -> Result<Self> {
        let initial = options.tier.unwrap_or_else(|| config.initial_index());
        let slider = TierSlider::new(TIERS.len(), initial)?;

        let saved_billing = store.read(BILLING_KEY).as_deref().and_then(Billing::parse);
        let billing = options
            .billing
            .or(saved_billing)
            .unwrap_or(config.default_billing);

        let theme = options
            .theme
            .unwrap_or_else(|| ThemeMode::load(&*store, config.prefers_dark));

        let app = Self {
            slider,
            billing,
            theme,
            focus: Focus::Slider,
            popup: Popup::None,
            show_features: config.show_features,
            status_message: None,
            status_message_time: None,
            store,
        };

        tracing::info!(
            tier = app.slider.index(),
            billing = app.billing.as_str(),
            theme = app.theme.as_str(),
            "pricing page ready"
        );
        Ok(app)
    }

    pub fn quote(&self) -> Quote {
        Quote::new(self.slider.index(), self.billing)
    }

    /// Set a status message (auto-clears after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_message_time = Some(Instant::now());
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle popups first
        if self.popup != Popup::None {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')) {
                self.popup = Popup::None;
            }
            return Ok(());
        }

        match key.code {
            // Escape abandons a drag in progress
            KeyCode::Esc => {
                if self.slider.is_dragging() {
                    self.slider.pointer_cancel();
                }
            }

            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Slider => Focus::Billing,
                    Focus::Billing => Focus::Theme,
                    Focus::Theme => Focus::Slider,
                };
            }
            KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Slider => Focus::Theme,
                    Focus::Billing => Focus::Slider,
                    Focus::Theme => Focus::Billing,
                };
            }

            KeyCode::Left | KeyCode::Char('h') => match self.focus {
                Focus::Slider => {
                    let outcome = self.slider.step(Step::Back);
                    self.report(outcome);
                }
                Focus::Billing => self.set_billing(Billing::Monthly)?,
                Focus::Theme => {}
            },
            KeyCode::Right | KeyCode::Char('l') => match self.focus {
                Focus::Slider => {
                    let outcome = self.slider.step(Step::Forward);
                    self.report(outcome);
                }
                Focus::Billing => self.set_billing(Billing::Yearly)?,
                Focus::Theme => {}
            },
            KeyCode::Home if self.focus == Focus::Slider => {
                let outcome = self.slider.set_index(0);
                self.report(outcome);
            }
            KeyCode::End if self.focus == Focus::Slider => {
                let last = self.slider.tier_count() - 1;
                let outcome = self.slider.set_index(last);
                self.report(outcome);
            }

            // Direct tier entry, 1-based
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let outcome = self.slider.set_index(index);
                self.report(outcome);
            }

            KeyCode::Char(' ') | KeyCode::Enter => match self.focus {
                Focus::Billing => self.toggle_billing()?,
                Focus::Theme => self.toggle_theme()?,
                Focus::Slider => {}
            },

            KeyCode::Char('y') | KeyCode::Char('b') => self.toggle_billing()?,
            KeyCode::Char('t') => self.toggle_theme()?,

            KeyCode::Char('?') => self.popup = Popup::Help,

            _ => {}
        }
        Ok(())
    }

    /// Mouse input, hit-tested against the layout for a screen of `area`
    pub fn handle_mouse(&mut self, event: MouseEvent, area: Rect) -> Result<()> {
        let regions = crate::ui::layout(area, self.show_features);
        let pos = Position::new(event.column, event.row);
        let x = event.column as f64;

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // A press off the track starts a new gesture the slider does
                // not own, even if the previous release never arrived
                let on_track = self.popup == Popup::None && regions.slider.contains(pos);
                if self.slider.is_dragging() && !on_track {
                    self.slider.pointer_cancel();
                }

                if self.popup != Popup::None {
                    self.popup = Popup::None;
                } else if regions.slider.contains(pos) {
                    self.focus = Focus::Slider;
                    let outcome = self.slider.pointer_down(x, Track::from_rect(regions.slider));
                    self.report(outcome);
                } else if regions.billing_switch.contains(pos) {
                    self.focus = Focus::Billing;
                    self.toggle_billing()?;
                } else if regions.theme_switch.contains(pos) {
                    self.focus = Focus::Theme;
                    self.toggle_theme()?;
                }
            }
            // The gesture owns the pointer until release, wherever it goes
            MouseEventKind::Drag(MouseButton::Left) => {
                let outcome = self.slider.pointer_move(x);
                self.report(outcome);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.slider.pointer_up();
            }
            _ => {}
        }
        Ok(())
    }

    /// Terminal lost focus: a release may never arrive
    pub fn handle_focus_lost(&mut self) {
        if self.slider.is_dragging() {
            tracing::debug!(drag = ?self.slider.drag_state(), "focus lost mid-drag, cancelling gesture");
            self.slider.pointer_cancel();
        }
    }

    /// The captured track geometry is stale after a resize
    pub fn handle_resize(&mut self) {
        if self.slider.is_dragging() {
            tracing::debug!("resized mid-drag, cancelling gesture");
            self.slider.pointer_cancel();
        }
    }

    /// Release anything still held before the terminal is restored
    pub fn shutdown(&mut self) {
        self.slider.release();
    }

    pub fn tick(&mut self) {
        // Clear status message after a few seconds
        if let Some(time) = self.status_message_time {
            if time.elapsed().as_secs() >= STATUS_SECONDS {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    fn report(&self, outcome: Outcome) {
        if outcome.changed() {
            let index = self.slider.index();
            let quote = Quote::new(index, self.billing);
            tracing::debug!(tier = index, price = %quote.display_price, "quote updated");
        }
    }

    fn set_billing(&mut self, billing: Billing) -> Result<()> {
        if self.billing == billing {
            return Ok(());
        }
        self.billing = billing;
        self.set_status(match billing {
            Billing::Monthly => "Monthly billing",
            Billing::Yearly => "Yearly billing: 25% off",
        });
        self.store.write(BILLING_KEY, billing.as_str())?;
        Ok(())
    }

    pub fn toggle_billing(&mut self) -> Result<()> {
        self.set_billing(self.billing.toggled())
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.theme = self.theme.toggled();
        tracing::info!(theme = self.theme.as_str(), "theme switched");
        self.set_status(format!("Theme: {}", self.theme.as_str()));
        self.save_theme()
    }

    /// Persist the current theme as the saved preference
    pub fn save_theme(&mut self) -> Result<()> {
        self.theme.save(&mut *self.store)?;
        Ok(())
    }
}
