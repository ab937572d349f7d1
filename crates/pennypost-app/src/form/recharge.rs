use pennypost_proto::RECHARGE_PRESETS;

use super::TextField;
use crate::KeyInput;

/// Recharge form: free-form amount plus preset buttons.
#[derive(Debug, Clone, Default)]
pub struct RechargeForm {
    /// Amount in credits. Digits only.
    pub amount: TextField,
    /// Index into [`RECHARGE_PRESETS`] of the highlighted preset button.
    pub preset_cursor: usize,
    /// A recharge is in flight.
    pub pending: bool,
}

impl RechargeForm {
    /// Apply an editing key to the amount field. Non-digits are rejected.
    pub fn edit_amount(&mut self, key: KeyInput) -> bool {
        self.amount.apply_filtered(key, |c| c.is_ascii_digit())
    }

    /// Replace the amount with a preset value.
    pub fn select_preset(&mut self, value: u32) {
        self.amount.set(&value.to_string());
    }

    /// Apply the highlighted preset.
    pub fn select_highlighted(&mut self) {
        if let Some(value) = RECHARGE_PRESETS.get(self.preset_cursor) {
            self.select_preset(*value);
        }
    }

    /// Move the preset highlight. Clamped to the available presets.
    pub fn move_preset(&mut self, forward: bool) {
        let last = RECHARGE_PRESETS.len().saturating_sub(1);
        self.preset_cursor = if forward {
            (self.preset_cursor + 1).min(last)
        } else {
            self.preset_cursor.saturating_sub(1)
        };
    }

    /// True if the amount equals this preset.
    pub fn is_selected(&self, preset: u32) -> bool {
        self.amount.value() == preset.to_string()
    }

    /// Positive amount, or `None` if empty, zero, or out of range.
    pub fn parsed_amount(&self) -> Option<u32> {
        self.amount.value().parse::<u32>().ok().filter(|amount| *amount > 0)
    }

    /// Submission needs a non-empty amount and nothing pending.
    ///
    /// A non-empty but invalid amount is still submittable so the user gets
    /// told why it was refused.
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.amount.is_empty()
    }
}
