//! Behavioral invariants over observable App state.
//!
//! Invariants state WHAT must hold after every render, independent of the
//! scenario that led there.

use pennypost_app::{App, Screen};

/// A broken invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Invariant name.
    pub invariant: &'static str,
    /// What was observed.
    pub message: String,
}

/// A property of App state that must always hold.
pub trait Invariant: Send + Sync {
    /// Short identifier.
    fn name(&self) -> &'static str;

    /// Check the property. `Err` carries a description of the breach.
    fn check(&self, app: &App) -> Result<(), String>;
}

/// The dashboard is shown exactly when it is mounted, and only with a
/// session.
pub struct DashboardRequiresSession;

impl Invariant for DashboardRequiresSession {
    fn name(&self) -> &'static str {
        "dashboard_requires_session"
    }

    fn check(&self, app: &App) -> Result<(), String> {
        let on_dashboard = app.screen() == Screen::Dashboard;
        if on_dashboard != app.dashboard().is_some() {
            return Err(format!(
                "screen {:?} but dashboard mounted={}",
                app.screen(),
                app.dashboard().is_some()
            ));
        }
        if on_dashboard && !app.session().is_authenticated() {
            return Err("dashboard shown without a session".to_string());
        }
        Ok(())
    }
}

/// At most five toasts are visible.
pub struct NotificationsBounded;

impl Invariant for NotificationsBounded {
    fn name(&self) -> &'static str {
        "notifications_bounded"
    }

    fn check(&self, app: &App) -> Result<(), String> {
        let visible = app.notifications().items().len();
        if visible > 5 {
            return Err(format!("{visible} notifications visible"));
        }
        Ok(())
    }
}

/// The recharge amount field never holds anything but digits.
pub struct AmountDigitsOnly;

impl Invariant for AmountDigitsOnly {
    fn name(&self) -> &'static str {
        "amount_digits_only"
    }

    fn check(&self, app: &App) -> Result<(), String> {
        let Some(dashboard) = app.dashboard() else {
            return Ok(());
        };
        let amount = dashboard.recharge.amount.value();
        if amount.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(format!("amount field holds {amount:?}"))
        }
    }
}

/// A set of invariants checked together.
#[derive(Default)]
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The common App invariants.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(DashboardRequiresSession);
        registry.add(NotificationsBounded);
        registry.add(AmountDigitsOnly);
        registry
    }

    /// Register an invariant.
    pub fn add(&mut self, invariant: impl Invariant + 'static) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check every invariant, collecting violations.
    pub fn check_all(&self, app: &App) -> Vec<Violation> {
        self.invariants
            .iter()
            .filter_map(|invariant| {
                invariant
                    .check(app)
                    .err()
                    .map(|message| Violation { invariant: invariant.name(), message })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pennypost_app::AppEvent;
    use pennypost_proto::Identity;

    use super::*;

    #[test]
    fn fresh_and_logged_in_apps_pass() {
        let registry = InvariantRegistry::standard();
        let mut app = App::new();
        assert!(registry.check_all(&app).is_empty());

        app.handle(AppEvent::LoggedIn {
            identity: Identity {
                id: 1,
                username: "alice".into(),
                email: String::new(),
                credits: 5,
                created_at: None,
                is_active: true,
            },
        });
        assert!(registry.check_all(&app).is_empty());
    }
}
