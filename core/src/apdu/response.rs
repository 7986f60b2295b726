use crate::apdu;
use crate::error::Reason;
use crate::Result;

/// An response that was received from the applet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Response {
    pub data: Vec<u8>,
    pub sw: u16,
}

impl Response {
    pub fn new(data: Vec<u8>, sw: u16) -> Self {
        Self { data, sw }
    }

    /// Parses a response from the octets.
    /// The last two octets are the status word, the remainder is the data.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [data @ .., sw1, sw2] => Ok(Self {
                data: data.to_vec(),
                sw: u16::from_be_bytes([*sw1, *sw2]),
            }),
            _ => Err(apdu::error("parse", Reason::InvalidResponse)),
        }
    }

    pub fn sw1(&self) -> u8 {
        (self.sw >> 8) as u8
    }

    pub fn sw2(&self) -> u8 {
        (self.sw & 0xFF) as u8
    }

    /// Determines whether the response indicates success or not.
    pub fn is_ok(&self) -> bool {
        self.sw == apdu::SW_SUCCESS
    }

    /// Converts the response back into octets, status word last.
    pub fn to_bytes(&self) -> Vec<u8> {
        [self.data.as_slice(), &self.sw.to_be_bytes()].concat()
    }
}

impl TryFrom<Vec<u8>> for Response {
    type Error = crate::Error;

    /// Parses the octets in place, without copying the data.
    fn try_from(mut bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(apdu::error("parse", Reason::InvalidResponse));
        }

        let sw = bytes.split_off(bytes.len() - 2);

        Ok(Self {
            data: bytes,
            sw: u16::from_be_bytes([sw[0], sw[1]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_only() {
        let response = Response::parse(&[0x90, 0x00]).unwrap();

        assert_eq!(Response::new(vec![], 0x9000), response);
        assert!(response.is_ok());
    }

    #[test]
    fn test_data_and_status() {
        let mut bytes: Vec<u8> = (0xA0..0xB0).collect();
        bytes.extend_from_slice(&[0x90, 0x00]);

        let response = Response::try_from(bytes.clone()).unwrap();

        assert_eq!(16, response.data.len());
        assert_eq!(0x9000, response.sw);
        assert_eq!(response, Response::parse(&bytes).unwrap());
        assert_eq!(bytes, response.to_bytes());
    }

    #[test]
    fn test_error_status_is_not_interpreted() {
        let response = Response::parse(&[0x6A, 0x82]).unwrap();

        assert!(!response.is_ok());
        assert_eq!(0x6A, response.sw1());
        assert_eq!(0x82, response.sw2());
    }

    #[test]
    fn test_too_short() {
        assert_eq!(
            Reason::InvalidResponse,
            Response::parse(&[0x90]).unwrap_err().reason,
        );
        assert_eq!(
            Reason::InvalidResponse,
            Response::try_from(vec![]).unwrap_err().reason,
        );
    }
}
