use std::rc::Rc;

use crate::apdu::Response;
use crate::cmdset::{execute, new};
use crate::command;
use crate::protocol::Transport;
use crate::{Card, Result};

/// Configuration commands of the NBT applet.
pub struct ConfigurationCommandSet<T>
where
    T: Transport,
{
    card: Rc<Card<T>>,
}

impl<T> ConfigurationCommandSet<T>
where
    T: Transport,
{
    new!();

    /// Reads the configuration value under the tag.
    pub fn get_configuration(&self, tag: u16) -> Result<Response> {
        execute(
            &self.card,
            "get_configuration",
            Ok(command::get_configuration(tag)),
        )
    }

    /// Writes the configuration value under the tag.
    pub fn set_configuration(&self, tag: u16, value: &[u8]) -> Result<Response> {
        execute(
            &self.card,
            "set_configuration",
            command::set_configuration(tag, value),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmdset::mock::RecordingTransport;
    use crate::error::Reason;

    #[test]
    fn test_get_and_set_configuration() {
        let set = ConfigurationCommandSet::new(Rc::new(Card::new(Box::new(
            RecordingTransport::new(vec![Ok(vec![0x1F, 0x01, 0x01, 0x00, 0x90, 0x00])]),
        ))));

        let response = set.get_configuration(0x1F01).unwrap();
        assert_eq!(vec![0x1F, 0x01, 0x01, 0x00], response.data);

        set.set_configuration(0x1F01, &[0xAA]).unwrap();

        assert_eq!(
            vec![
                vec![0x20, 0x30, 0x00, 0x00, 0x02, 0x1F, 0x01],
                vec![0x20, 0x20, 0x00, 0x00, 0x04, 0x1F, 0x01, 0x01, 0xAA],
            ],
            set.card().delegate().sent(),
        );
    }

    #[test]
    fn test_set_configuration_rejects_long_value() {
        let set = ConfigurationCommandSet::new(Rc::new(Card::new(Box::new(
            RecordingTransport::new(vec![]),
        ))));

        let error = set.set_configuration(0x1F01, &[0x00; 300]).unwrap_err();

        assert_eq!(Reason::IllegalArgument, error.reason);
        assert!(set.card().delegate().sent().is_empty());
    }
}
