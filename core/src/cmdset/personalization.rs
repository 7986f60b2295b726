use std::rc::Rc;

use crate::apdu::Response;
use crate::cmdset::{execute, new};
use crate::command;
use crate::protocol::Transport;
use crate::{Card, Result};

/// Personalization commands of the NBT applet.
/// Only available until [`Self::finalize_personalization`] succeeds.
pub struct PersonalizationCommandSet<T>
where
    T: Transport,
{
    card: Rc<Card<T>>,
}

impl<T> PersonalizationCommandSet<T>
where
    T: Transport,
{
    new!();

    /// Provisions the value under the DGI.
    pub fn personalize_data(&self, dgi: u16, value: &[u8]) -> Result<Response> {
        execute(
            &self.card,
            "personalize_data",
            command::personalize_data(dgi, value),
        )
    }

    /// Closes the personalization phase.
    pub fn finalize_personalization(&self) -> Result<Response> {
        execute(
            &self.card,
            "finalize_personalization",
            command::finalize_personalization(),
        )
    }

    /// Runs the backend tests selected by the bitmap.
    pub fn backend_test(&self, tests: u8) -> Result<Response> {
        execute(&self.card, "backend_test", command::backend_test(tests))
    }

    /// Disables the backend tests permanently.
    pub fn backend_test_disable(&self) -> Result<Response> {
        execute(
            &self.card,
            "backend_test_disable",
            Ok(command::backend_test_disable()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdset::mock::RecordingTransport;
    use crate::dgi;
    use crate::error::Reason;

    fn command_set() -> PersonalizationCommandSet<RecordingTransport> {
        PersonalizationCommandSet::new(Rc::new(Card::new(Box::new(RecordingTransport::new(
            vec![],
        )))))
    }

    #[test]
    fn test_personalize_then_finalize() {
        let set = command_set();

        set.personalize_data(dgi::tag::NDEF_FILE, &[0x01, 0x02, 0x03])
            .unwrap();
        set.finalize_personalization().unwrap();

        assert_eq!(
            vec![
                vec![0x00, 0xE2, 0x00, 0x00, 0x06, 0xE1, 0x04, 0x03, 0x01, 0x02, 0x03],
                vec![0x00, 0xE2, 0x00, 0x00, 0x03, 0xBF, 0x63, 0x00],
            ],
            set.card().delegate().sent(),
        );
    }

    #[test]
    fn test_backend_tests() {
        let set = command_set();

        set.backend_test(0x05).unwrap();
        set.backend_test_disable().unwrap();
        assert_eq!(
            Reason::IllegalArgument,
            set.backend_test(0xFF).unwrap_err().reason,
        );

        assert_eq!(
            vec![vec![0x00, 0xBE, 0x00, 0x05], vec![0x00, 0xBE, 0xFF, 0x00]],
            set.card().delegate().sent(),
        );
    }
}
