use std::time::Duration;

use crate::models::{LoginOutcome, UserProfile};

/// Port for the platform's authentication backend. The engine only sees
/// outcomes; swapping the bundled stand-in for a real backend call is a
/// constructor-time decision of the host.
pub trait AuthBackend: Send + Sync {
    fn login(&self, email: &str, password: &str) -> LoginOutcome;

    /// Logout is advisory; it never fails.
    fn logout(&self);
}

const MIN_PASSWORD_LEN: usize = 6;

/// Stand-in for the real backend: waits a fixed duration, then applies the
/// sign-in form's client rules. Anything that would make the eventual network
/// call impossible is reported as a transient failure, not a panic.
#[derive(Debug, Clone)]
pub struct FixedDelayAuth {
    delay: Duration,
}

impl FixedDelayAuth {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    fn wait(&self) -> Result<(), String> {
        if self.delay.is_zero() {
            return Ok(());
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| format!("failed to build runtime: {err}"))?;
        runtime.block_on(tokio::time::sleep(self.delay));
        Ok(())
    }
}

impl AuthBackend for FixedDelayAuth {
    fn login(&self, email: &str, password: &str) -> LoginOutcome {
        if let Err(detail) = self.wait() {
            return LoginOutcome::TransientFailure { detail };
        }

        let email = email.trim();
        if !email.contains('@') || password.len() < MIN_PASSWORD_LEN {
            return LoginOutcome::InvalidCredentials;
        }

        LoginOutcome::Authenticated {
            user: profile_for(email),
        }
    }

    fn logout(&self) {
        let _ = self.wait();
    }
}

/// The stand-in has no directory to consult; the display name falls back to
/// the email's local part, as the original sign-in flow did.
fn profile_for(email: &str) -> UserProfile {
    let name = email.split('@').next().filter(|part| !part.is_empty());
    UserProfile {
        id: "1".to_string(),
        email: email.to_string(),
        name: name.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> FixedDelayAuth {
        FixedDelayAuth::new(0)
    }

    #[test]
    fn accepts_plausible_credentials() {
        let outcome = auth().login("maria@yachaytube.edu.pe", "secreta1");
        match outcome {
            LoginOutcome::Authenticated { user } => {
                assert_eq!(user.email, "maria@yachaytube.edu.pe");
                assert_eq!(user.name.as_deref(), Some("maria"));
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[test]
    fn rejects_short_passwords_and_bad_emails() {
        assert_eq!(
            auth().login("maria@yachaytube.edu.pe", "corta"),
            LoginOutcome::InvalidCredentials
        );
        assert_eq!(
            auth().login("sin-arroba", "secreta1"),
            LoginOutcome::InvalidCredentials
        );
    }

    #[test]
    fn logout_never_fails() {
        auth().logout();
        FixedDelayAuth::new(1).logout();
    }

    #[test]
    fn delay_is_applied_before_the_outcome() {
        let start = std::time::Instant::now();
        let _ = FixedDelayAuth::new(30).login("a@b.c", "secreta1");
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
