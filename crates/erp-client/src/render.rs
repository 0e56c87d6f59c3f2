//! Plain-text rendering of page view models for the console

use crate::error::{ClientError, ClientResult};
use erp_core::Config;
use erp_records::{ChartData, ChartKind, Confirm, StatCard, Toast};
use parking_lot::Mutex;
use serde::Serialize;
use std::{fmt::Write as _, io::BufRead};

const BAR_WIDTH: f64 = 30.0;

/// One `title: value` line per card
pub fn stat_cards(cards: &[StatCard]) -> String {
    let width = cards
        .iter()
        .map(|card| card.title.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for card in cards {
        let pad = width - card.title.chars().count();
        let _ = writeln!(out, "{}{} : {}", card.title, " ".repeat(pad), card.display);
    }
    out
}

/// Horizontal bar per category and series, scaled to the largest value
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn chart(data: &ChartData) -> String {
    let kind = match data.kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
    };
    let mut out = format!("{} ({kind})\n", data.title);

    let max = data
        .points
        .iter()
        .flat_map(|point| point.values.values().copied())
        .fold(0.0_f64, f64::max);

    for point in &data.points {
        for key in &data.y_keys {
            let value = point.values.get(key).copied().unwrap_or(0.0);
            let filled = if max > 0.0 {
                (value / max * BAR_WIDTH).round()
            } else {
                0.0
            };
            let bar = "█".repeat(filled.max(0.0) as usize);
            let tooltip = data
                .tooltip(&point.category, key)
                .unwrap_or_else(|| data.format.render(value));
            let _ = writeln!(out, "{:<10} {bar} {tooltip}", point.category);
        }
    }
    out
}

/// Pretty JSON of any record
///
/// # Errors
///
/// Returns an error if the value cannot be serialised.
pub fn json<T: Serialize + ?Sized>(value: &T) -> ClientResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Notifications, newest last
pub fn toasts(toasts: &[Toast]) -> String {
    toasts.iter().fold(String::new(), |mut out, toast| {
        let _ = writeln!(out, "{toast}");
        out
    })
}

/// Resolved configuration as TOML
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialised.
pub fn config(config: &Config) -> ClientResult<String> {
    toml::to_string_pretty(config).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Confirmation read from a line of input
pub struct LineConfirm<B> {
    input: Mutex<B>,
}

impl<B: BufRead + Send> LineConfirm<B> {
    /// Read answers from `input`
    pub const fn new(input: B) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

impl LineConfirm<std::io::BufReader<std::io::Stdin>> {
    /// Read answers from standard input
    pub fn stdin() -> Self {
        Self::new(std::io::BufReader::new(std::io::stdin()))
    }
}

impl<B: BufRead + Send> Confirm for LineConfirm<B> {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        let mut answer = String::new();
        if self.input.lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "예")
    }
}

impl<B> std::fmt::Debug for LineConfirm<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfirm").finish_non_exhaustive()
    }
}
