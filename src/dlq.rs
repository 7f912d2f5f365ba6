use tracing::warn;

use crate::domain::{DeadLetterQueue, Error};

#[derive(Default, Debug)]
pub struct StdErrDLQ {}

impl StdErrDLQ {
    pub fn new() -> Self {
        Self {}
    }
}

impl DeadLetterQueue for StdErrDLQ {
    fn report(&self, error: &Error) {
        warn!(%error, "command rejected");
        eprintln!("rejected: {}", error);
    }
}
