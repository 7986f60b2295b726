use crate::apdu;
use crate::error::Reason;
use crate::reader::Reader;
use crate::Result;

const SHORT_LC_MAX: usize = 0xFF;
const SHORT_LE_MAX: u16 = 0x100;
const EXTENDED_LC_MAX: usize = 0xFFFF;

/// Expected length of the response data.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Le {
    /// As many octets as the applet has (`00` in short form, `00 00` in extended form).
    Any,

    /// Exactly this many octets, from 1. Values above 256 force the extended form. `Exact(256)`
    /// in short form shares the wire encoding `00` with `Any`.
    Exact(u16),
}

impl Le {
    fn from_wire(value: u16) -> Self {
        match value {
            0 => Self::Any,
            n => Self::Exact(n),
        }
    }

    fn to_wire(self) -> u16 {
        match self {
            Self::Any => 0,
            Self::Exact(n) => n,
        }
    }
}

/// An APDU command to be transmitted
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Command {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
    pub le: Option<Le>,
}

impl Command {
    /// Constructs an command with CLA, INS, P1, and P2.
    /// No payloads will be transmitted or received.
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data: Vec::new(),
            le: None,
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, and Le.
    /// A payload will be received.
    pub fn new_with_le(cla: u8, ins: u8, p1: u8, p2: u8, le: Le) -> Self {
        Self {
            le: Some(le),
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, and a payload.
    /// No payload will be received.
    pub fn new_with_payload(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Constructs an command with CLA, INS, P1, P2, Le, and a payload.
    /// A payload will be received.
    pub fn new_with_payload_le(cla: u8, ins: u8, p1: u8, p2: u8, le: Le, data: Vec<u8>) -> Self {
        Self {
            data,
            le: Some(le),
            ..Self::new(cla, ins, p1, p2)
        }
    }

    /// Length of the command data (Lc).
    pub fn lc(&self) -> usize {
        self.data.len()
    }

    /// P1 and P2 combined as a big-endian `u16`.
    pub fn p1p2(&self) -> u16 {
        u16::from_be_bytes([self.p1, self.p2])
    }

    /// Whether the command needs the extended length form.
    pub fn is_extended(&self) -> bool {
        self.data.len() > SHORT_LC_MAX || matches!(self.le, Some(Le::Exact(n)) if n > SHORT_LE_MAX)
    }

    /// Converts the command into octets.
    ///
    /// Fails if the data is longer than an extended Lc can express, or if `Exact(0)` is expected.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.data.len() > EXTENDED_LC_MAX || self.le == Some(Le::Exact(0)) {
            return Err(apdu::error("to_bytes", Reason::IllegalArgument));
        }

        let extended = self.is_extended();
        let mut buffer: Vec<u8> = Vec::with_capacity(4 + 3 + self.data.len() + 2);
        buffer.extend_from_slice(&[self.cla, self.ins, self.p1, self.p2]);

        if extended {
            buffer.push(0x00);
        }

        if !self.data.is_empty() {
            match extended {
                true => buffer.extend_from_slice(&(self.data.len() as u16).to_be_bytes()),
                _ => buffer.push(self.data.len() as u8),
            }

            buffer.extend_from_slice(&self.data);
        }

        if let Some(le) = self.le {
            match extended {
                true => buffer.extend_from_slice(&le.to_wire().to_be_bytes()),
                _ => buffer.push(le.to_wire() as u8),
            }
        }

        Ok(buffer)
    }

    /// Parses a command from the octets, in either short or extended form.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let invalid = || apdu::error("parse", Reason::IllegalArgument);

        let mut reader = Reader::new(bytes);
        let header = reader.read(4).ok_or_else(invalid)?;
        let mut command = Self::new(header[0], header[1], header[2], header[3]);
        let body = reader.read_rest();

        match body {
            [] => {}
            [le] => command.le = Some(Le::from_wire(*le as u16)),
            [0x00, le_hi, le_lo] => {
                command.le = Some(Le::from_wire(u16::from_be_bytes([*le_hi, *le_lo])))
            }
            [0x00, rest @ ..] => {
                let mut reader = Reader::new(rest);
                let lc = reader.read_u16().ok_or_else(invalid)? as usize;
                if lc == 0 {
                    return Err(invalid());
                }

                command.data = reader.read(lc).ok_or_else(invalid)?.to_vec();
                command.le = match reader.remaining() {
                    0 => None,
                    2 => reader.read_u16().map(Le::from_wire),
                    _ => return Err(invalid()),
                };
            }
            [lc, rest @ ..] => {
                let lc = *lc as usize;
                command.le = match rest.len() {
                    n if n == lc => None,
                    n if n == lc + 1 => Some(Le::from_wire(rest[lc] as u16)),
                    _ => return Err(invalid()),
                };
                command.data = rest[..lc].to_vec();
            }
        }

        Ok(command)
    }
}

impl TryFrom<&Command> for Vec<u8> {
    type Error = crate::Error;

    fn try_from(command: &Command) -> Result<Self> {
        command.to_bytes()
    }
}

impl TryFrom<Command> for Vec<u8> {
    type Error = crate::Error;

    fn try_from(command: Command) -> Result<Self> {
        command.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_only() {
        let command = Command::new(0x00, 0xBE, 0xFF, 0x00);

        assert_eq!(vec![0x00, 0xBE, 0xFF, 0x00], command.to_bytes().unwrap());
        assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
    }

    #[test]
    fn test_le_only() {
        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x10, Le::Exact(0x10));

        assert_eq!(vec![0x00, 0xB0, 0x00, 0x10, 0x10], command.to_bytes().unwrap());
        assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
    }

    #[test]
    fn test_le_any() {
        let command = Command::new_with_le(0x00, 0xCA, 0x00, 0x00, Le::Any);

        assert_eq!(vec![0x00, 0xCA, 0x00, 0x00, 0x00], command.to_bytes().unwrap());
        assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
    }

    #[test]
    fn test_payload_and_le() {
        let command =
            Command::new_with_payload_le(0x00, 0x88, 0x00, 0x00, Le::Any, vec![0x01, 0x02]);

        assert_eq!(
            vec![0x00, 0x88, 0x00, 0x00, 0x02, 0x01, 0x02, 0x00],
            command.to_bytes().unwrap(),
        );
        assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
    }

    #[test]
    fn test_extended_payload() {
        let command = Command::new_with_payload(0x00, 0xE2, 0x00, 0x00, vec![0xAB; 0x100]);
        let bytes = command.to_bytes().unwrap();

        assert!(command.is_extended());
        assert_eq!([0x00, 0xE2, 0x00, 0x00, 0x00, 0x01, 0x00], bytes[..7]);
        assert_eq!(7 + 0x100, bytes.len());
        assert_eq!(command, Command::parse(&bytes).unwrap());
    }

    #[test]
    fn test_extended_le() {
        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, Le::Exact(0x0200));

        assert_eq!(vec![0x00, 0xB0, 0x00, 0x00, 0x00, 0x02, 0x00], command.to_bytes().unwrap());
        assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
    }

    #[test]
    fn test_parse_rejects_inconsistent_lc() {
        assert!(Command::parse(&[0x00, 0xD6]).is_err());
        assert!(Command::parse(&[0x00, 0xD6, 0x00, 0x00, 0x03, 0x01]).is_err());

        let error = Command::parse(&[0x00, 0xD6, 0x00, 0x00, 0x02, 0x01, 0x02, 0x03, 0x04])
            .unwrap_err();
        assert_eq!(Reason::IllegalArgument, error.reason);
    }

    #[test]
    fn test_le_256_is_short() {
        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, Le::Exact(0x0100));
        let bytes = command.to_bytes().unwrap();

        assert_eq!(vec![0x00, 0xB0, 0x00, 0x00, 0x00], bytes);

        let parsed = Command::parse(&bytes).unwrap();
        assert_eq!(Some(Le::Any), parsed.le);
        assert_eq!(bytes, parsed.to_bytes().unwrap());
    }

    #[test]
    fn test_le_exact_zero_is_rejected() {
        let command = Command::new_with_le(0x00, 0xB0, 0x00, 0x00, Le::Exact(0));

        let error = command.to_bytes().unwrap_err();

        assert_eq!(Reason::IllegalArgument, error.reason);
    }

    #[test]
    fn test_oversized_payload_is_rejected() {
        let command = Command::new_with_payload(0x00, 0xD6, 0x00, 0x00, vec![0x00; 0x10000]);

        let error = command.to_bytes().unwrap_err();
        assert_eq!(Reason::IllegalArgument, error.reason);
        assert!(Vec::<u8>::try_from(&command).is_err());

        let command = Command::new_with_payload(0x00, 0xD6, 0x00, 0x00, vec![0x00; 0xFFFF]);
        assert_eq!(0xFFFF + 7, Vec::<u8>::try_from(command).unwrap().len());
    }

    #[test]
    fn test_p1p2() {
        assert_eq!(0xDF3A, Command::new(0x00, 0x30, 0xDF, 0x3A).p1p2());
    }
}
