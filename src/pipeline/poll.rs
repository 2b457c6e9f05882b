// src/pipeline/poll.rs

//! The polling loop: fetch, validate, interpret, notify, sleep.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{OnError, PollConfig};
use crate::pipeline::validate::{check_response, current_date, parse_status};
use crate::services::{Messenger, Notifier, PracticumClient, Transport};
use crate::utils::unix_now;

/// State carried from one cycle to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    cursor: i64,
    last_message: String,
}

impl PollState {
    pub fn new(cursor: i64) -> Self {
        Self {
            cursor,
            last_message: String::new(),
        }
    }

    /// Start `lookback_secs` before the current time.
    pub fn starting_now(lookback_secs: i64) -> Self {
        Self::new(unix_now() - lookback_secs)
    }

    /// Lower bound (`from_date`) for the next request.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Last message handed to the notifier, empty before the first one.
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Move the cursor to `timestamp`. The cursor never moves backward.
    pub fn advance(&mut self, timestamp: i64) {
        self.cursor = self.cursor.max(timestamp);
    }
}

/// What a successful cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The API reported no homework records
    NoUpdates,
    /// Latest status matches the last message; nothing sent
    Unchanged,
    /// A new message was delivered
    Notified(String),
}

/// Owns the loop state and the two clients.
pub struct Poller<T: Transport, M: Messenger> {
    api: PracticumClient<T>,
    notifier: Notifier<M>,
    state: PollState,
    retry_interval: Duration,
    on_error: OnError,
}

impl<T: Transport, M: Messenger> Poller<T, M> {
    pub fn new(
        api: PracticumClient<T>,
        notifier: Notifier<M>,
        state: PollState,
        config: &PollConfig,
    ) -> Self {
        Self {
            api,
            notifier,
            state,
            retry_interval: config.retry_interval(),
            on_error: config.on_error,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn api(&self) -> &PracticumClient<T> {
        &self.api
    }

    pub fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }

    /// Run one fetch → validate → interpret → notify pass, without sleeping.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let response = self.api.get_api_answer(self.state.cursor).await?;
        if let Some(timestamp) = current_date(&response) {
            self.state.advance(timestamp);
        }

        let homeworks = check_response(&response)?;
        let Some(latest) = homeworks.first() else {
            log::debug!("No new homework statuses in the response");
            return Ok(CycleOutcome::NoUpdates);
        };

        let message = parse_status(latest)?;
        if message == self.state.last_message {
            log::debug!("Homework status unchanged: {}", message);
            return Ok(CycleOutcome::Unchanged);
        }

        self.notifier.send_message(&message).await?;
        self.state.last_message = message.clone();
        Ok(CycleOutcome::Notified(message))
    }

    /// Poll until a cycle fails under [`OnError::Terminate`], or until
    /// `max_cycles` cycles have run. `None` polls forever.
    ///
    /// Every cycle is followed by exactly one sleep of the retry interval,
    /// including a failed cycle whose error is about to be returned.
    pub async fn run(&mut self, max_cycles: Option<u64>) -> Result<()> {
        let mut completed: u64 = 0;
        while max_cycles.is_none_or(|max| completed < max) {
            let failure = match self.run_cycle().await {
                Ok(_) => None,
                Err(e) => {
                    let wrapped = AppError::cycle(e);
                    log::error!("{}", wrapped);
                    Some(wrapped)
                }
            };
            completed += 1;

            tokio::time::sleep(self.retry_interval).await;

            if let Some(error) = failure {
                if self.on_error == OnError::Terminate {
                    return Err(error);
                }
            }
        }
        Ok(())
    }
}
