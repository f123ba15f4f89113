use gloo_timers::callback::Timeout;

use selly_chat::ExpiryTicket;
use selly_types::EXPIRY_RESET_DELAY_MS;

/// The delayed reset that follows an expiry warning.
///
/// At most one reset is pending. Dropping or cancelling the timer clears the
/// underlying `setTimeout`.
#[derive(Default)]
pub struct ExpiryTimer {
    armed: Option<(ExpiryTicket, Timeout)>,
}

impl ExpiryTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `reset` with `ticket` after [`EXPIRY_RESET_DELAY_MS`].
    ///
    /// Returns `false` and leaves the pending reset alone when one is already
    /// armed for the same ticket, so repeated warnings do not push it back.
    /// A reset armed for any other ticket is replaced.
    pub fn arm<F>(&mut self, ticket: ExpiryTicket, reset: F) -> bool
    where
        F: FnOnce(ExpiryTicket) + 'static,
    {
        if self.armed_for() == Some(ticket) {
            return false;
        }

        let timeout = Timeout::new(EXPIRY_RESET_DELAY_MS, move || reset(ticket));
        self.armed = Some((ticket, timeout));
        true
    }

    pub fn cancel(&mut self) {
        // Dropping the Timeout clears it
        if let Some((ticket, _timeout)) = self.armed.take() {
            log::debug!("Cancelled expiry reset {:?}", ticket);
        }
    }

    pub fn armed_for(&self) -> Option<ExpiryTicket> {
        self.armed.as_ref().map(|(ticket, _)| *ticket)
    }
}
