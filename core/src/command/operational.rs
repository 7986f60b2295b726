//! Operational commands: selection, file access, passwords, applet data and tag authentication.

use crate::apdu::{Command, Le, CLA_DEFAULT};
use crate::command::{check_password_id, error, ins};
use crate::error::Reason;
use crate::Result;

/// AID of the NBT applet.
pub const NBT_AID: [u8; 13] = [
    0xD2, 0x76, 0x00, 0x00, 0x04, 0x15, 0x02, 0x00, 0x00, 0x0B, 0x00, 0x01, 0x01,
];

const SELECT_P1_BY_NAME: u8 = 0x04;
const SELECT_P1_BY_FID: u8 = 0x00;
const SELECT_P2_FCI: u8 = 0x00;
const SELECT_P2_NO_RESPONSE: u8 = 0x0C;

const TAG_READ_PASSWORD: u8 = 0x52;
const TAG_WRITE_PASSWORD: u8 = 0x54;
const PASSWORD_LENGTH: u8 = 4;

const PASSWORD_CHANGE: u8 = 0x40;
const PASSWORD_ID_MASK: u8 = 0x1F;

const READ_LENGTH_MAX: u16 = 0x100;
const UPDATE_LENGTH_MAX: usize = 0xFF;
const PASS_THROUGH_LENGTH_MAX: usize = 0xFFFF;

/// Get-data reference control parameters.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u16)]
pub enum DataReference {
    AppletVersion = 0xDF3A,
    AvailableMemory = 0xDF3B,
}

/// Arguments of the `CREATE PASSWORD` command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreatePassword {
    /// Identifier of the new password, `0x01..=0x1F`.
    pub id: u8,
    pub password: u32,
    /// Response the applet returns once the password is verified.
    pub response: u16,
    /// Number of failed verifications tolerated before the password blocks.
    pub limit: u16,
    pub master_password: Option<u32>,
}

/// Constructs a `SELECT` command for the NBT applet, requesting its FCI.
pub fn select_application() -> Command {
    Command::new_with_payload_le(
        CLA_DEFAULT,
        ins::SELECT,
        SELECT_P1_BY_NAME,
        SELECT_P2_FCI,
        Le::Any,
        NBT_AID.to_vec(),
    )
}

/// Constructs a `SELECT` command for the file with the identifier.
pub fn select_file(fid: u16) -> Command {
    Command::new_with_payload(
        CLA_DEFAULT,
        ins::SELECT,
        SELECT_P1_BY_FID,
        SELECT_P2_NO_RESPONSE,
        fid.to_be_bytes().to_vec(),
    )
}

/// Constructs a `SELECT` command for a password-protected file.
/// Each present password is appended as `tag || 04 || password`.
pub fn select_file_with_password(
    fid: u16,
    read_password: Option<u32>,
    write_password: Option<u32>,
) -> Command {
    let mut data = fid.to_be_bytes().to_vec();
    for (tag, password) in [
        (TAG_READ_PASSWORD, read_password),
        (TAG_WRITE_PASSWORD, write_password),
    ] {
        if let Some(password) = password {
            data.extend_from_slice(&[tag, PASSWORD_LENGTH]);
            data.extend_from_slice(&password.to_be_bytes());
        }
    }

    Command::new_with_payload(
        CLA_DEFAULT,
        ins::SELECT,
        SELECT_P1_BY_FID,
        SELECT_P2_NO_RESPONSE,
        data,
    )
}

/// Constructs a `READ BINARY` command for `length` (`1..=256`) octets at the offset.
pub fn read_binary(offset: u16, length: u16) -> Result<Command> {
    let le = match length {
        0 => return Err(error("read_binary", Reason::IllegalArgument)),
        READ_LENGTH_MAX => Le::Any,
        n if n < READ_LENGTH_MAX => Le::Exact(n),
        _ => return Err(error("read_binary", Reason::IllegalArgument)),
    };
    let [p1, p2] = offset.to_be_bytes();

    Ok(Command::new_with_le(
        CLA_DEFAULT,
        ins::READ_BINARY,
        p1,
        p2,
        le,
    ))
}

/// Constructs an `UPDATE BINARY` command writing the data at the offset.
pub fn update_binary(offset: u16, data: &[u8]) -> Result<Command> {
    if data.is_empty() || data.len() > UPDATE_LENGTH_MAX {
        return Err(error("update_binary", Reason::IllegalArgument));
    }

    let [p1, p2] = offset.to_be_bytes();

    Ok(Command::new_with_payload(
        CLA_DEFAULT,
        ins::UPDATE_BINARY,
        p1,
        p2,
        data.to_vec(),
    ))
}

/// Constructs a `CREATE PASSWORD` command.
pub fn create_password(args: &CreatePassword) -> Result<Command> {
    let id = check_password_id("create_password", args.id)?;

    let mut data = Vec::with_capacity(4 + 1 + 4 + 2 + 2);
    if let Some(master_password) = args.master_password {
        data.extend_from_slice(&master_password.to_be_bytes());
    }
    data.push(id);
    data.extend_from_slice(&args.password.to_be_bytes());
    data.extend_from_slice(&args.response.to_be_bytes());
    data.extend_from_slice(&args.limit.to_be_bytes());

    Ok(Command::new_with_payload(
        CLA_DEFAULT,
        ins::CREATE_PASSWORD,
        0x00,
        id,
        data,
    ))
}

fn change_or_unblock_password(
    function: &'static str,
    id: u8,
    change: bool,
    new_password: Option<u32>,
    master_password: Option<u32>,
) -> Result<Command> {
    let id = check_password_id(function, id)?;
    let mode = match change {
        true => PASSWORD_CHANGE,
        _ => 0x00,
    };
    let p2 = mode | (id & PASSWORD_ID_MASK);

    let data: Vec<u8> = master_password
        .into_iter()
        .chain(new_password)
        .flat_map(u32::to_be_bytes)
        .collect();

    Ok(Command::new_with_payload(
        CLA_DEFAULT,
        ins::CHANGE_OR_UNBLOCK_PASSWORD,
        0x00,
        p2,
        data,
    ))
}

/// Constructs a `CHANGE PASSWORD` command, replacing the password with the new one.
pub fn change_password(id: u8, new_password: u32, master_password: Option<u32>) -> Result<Command> {
    change_or_unblock_password(
        "change_password",
        id,
        true,
        Some(new_password),
        master_password,
    )
}

/// Constructs an `UNBLOCK PASSWORD` command, resetting the retry counter of the password.
pub fn unblock_password(id: u8, master_password: Option<u32>) -> Result<Command> {
    change_or_unblock_password("unblock_password", id, false, None, master_password)
}

/// Constructs a `DELETE PASSWORD` command.
pub fn delete_password(id: u8, master_password: Option<u32>) -> Result<Command> {
    let id = check_password_id("delete_password", id)?;
    let data = master_password
        .map(|password| password.to_be_bytes().to_vec())
        .unwrap_or_default();

    Ok(Command::new_with_payload(
        CLA_DEFAULT,
        ins::DELETE_PASSWORD,
        0x00,
        id,
        data,
    ))
}

/// Constructs a `GET DATA` command for the reference.
pub fn get_data(reference: DataReference) -> Command {
    let [p1, p2] = (reference as u16).to_be_bytes();

    Command::new_with_le(CLA_DEFAULT, ins::GET_DATA, p1, p2, Le::Any)
}

/// Constructs an `AUTHENTICATE TAG` command carrying the challenge.
pub fn authenticate_tag(challenge: &[u8]) -> Result<Command> {
    if challenge.is_empty() {
        return Err(error("authenticate_tag", Reason::IllegalArgument));
    }

    Ok(Command::new_with_payload_le(
        CLA_DEFAULT,
        ins::AUTHENTICATE_TAG,
        0x00,
        0x00,
        Le::Any,
        challenge.to_vec(),
    ))
}

/// Constructs the command fetching data the NFC side left for the host.
pub fn pass_through_fetch_data() -> Command {
    Command::new_with_le(
        CLA_DEFAULT,
        ins::PASS_THROUGH_FETCH_DATA,
        0x00,
        0x00,
        Le::Any,
    )
}

/// Constructs the proprietary frame answering a pass-through request.
/// This is not an APDU: the frame is the data prefixed with its big-endian `u16` length.
pub fn pass_through_put_response(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() || data.len() > PASS_THROUGH_LENGTH_MAX {
        return Err(error("pass_through_put_response", Reason::IllegalArgument));
    }

    Ok([&(data.len() as u16).to_be_bytes(), data].concat())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_application() {
        assert_eq!(
            vec![
                0x00, 0xA4, 0x04, 0x00, 0x0D, 0xD2, 0x76, 0x00, 0x00, 0x04, 0x15, 0x02, 0x00, 0x00,
                0x0B, 0x00, 0x01, 0x01, 0x00,
            ],
            select_application().to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_select_file() {
        assert_eq!(
            vec![0x00, 0xA4, 0x00, 0x0C, 0x02, 0xE1, 0x04],
            select_file(0xE104).to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_select_file_with_password() {
        assert_eq!(
            vec![
                0x00, 0xA4, 0x00, 0x0C, 0x0E, 0xE1, 0xA1, 0x52, 0x04, 0x11, 0x22, 0x33, 0x44, 0x54,
                0x04, 0x55, 0x66, 0x77, 0x88,
            ],
            select_file_with_password(0xE1A1, Some(0x11223344), Some(0x55667788)).to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0xA4, 0x00, 0x0C, 0x08, 0xE1, 0xA1, 0x54, 0x04, 0x55, 0x66, 0x77, 0x88],
            select_file_with_password(0xE1A1, None, Some(0x55667788)).to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_read_binary() {
        assert_eq!(
            vec![0x00, 0xB0, 0x00, 0x10, 0x10],
            read_binary(0x0010, 16).unwrap().to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0xB0, 0x01, 0x00, 0x00],
            read_binary(0x0100, 256).unwrap().to_bytes().unwrap(),
        );
        assert!(read_binary(0, 0).is_err());
        assert!(read_binary(0, 257).is_err());
    }

    #[test]
    fn test_update_binary() {
        assert_eq!(
            vec![0x00, 0xD6, 0x00, 0x02, 0x02, 0xCA, 0xFE],
            update_binary(0x0002, &[0xCA, 0xFE]).unwrap().to_bytes().unwrap(),
        );
        assert_eq!(
            Reason::IllegalArgument,
            update_binary(0, &[]).unwrap_err().reason,
        );
        assert!(update_binary(0, &[0x00; 256]).is_err());
    }

    #[test]
    fn test_create_password() {
        let args = CreatePassword {
            id: 0x03,
            password: 0x31323334,
            response: 0x9000,
            limit: 0x0005,
            master_password: Some(0xAABBCCDD),
        };

        assert_eq!(
            vec![
                0x00, 0xE1, 0x00, 0x03, 0x0D, 0xAA, 0xBB, 0xCC, 0xDD, 0x03, 0x31, 0x32, 0x33, 0x34,
                0x90, 0x00, 0x00, 0x05,
            ],
            create_password(&args).unwrap().to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_change_and_unblock_password() {
        assert_eq!(
            vec![0x00, 0x24, 0x00, 0x45, 0x04, 0x01, 0x02, 0x03, 0x04],
            change_password(0x05, 0x01020304, None).unwrap().to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0x24, 0x00, 0x05, 0x04, 0xAA, 0xBB, 0xCC, 0xDD],
            unblock_password(0x05, Some(0xAABBCCDD)).unwrap().to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0x24, 0x00, 0x1F],
            unblock_password(0x1F, None).unwrap().to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_delete_password() {
        assert_eq!(
            vec![0x00, 0xE4, 0x00, 0x01],
            delete_password(0x01, None).unwrap().to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_password_id_range() {
        for id in [0x00, 0x20, 0xFF] {
            let args = CreatePassword {
                id,
                password: 0,
                response: 0,
                limit: 0,
                master_password: None,
            };

            assert_eq!(
                Reason::IllegalArgument,
                create_password(&args).unwrap_err().reason
            );
            assert_eq!(
                Reason::IllegalArgument,
                change_password(id, 0, None).unwrap_err().reason
            );
            assert_eq!(
                Reason::IllegalArgument,
                unblock_password(id, None).unwrap_err().reason
            );
            assert_eq!(
                Reason::IllegalArgument,
                delete_password(id, None).unwrap_err().reason
            );
        }
    }

    #[test]
    fn test_get_data() {
        assert_eq!(
            vec![0x00, 0x30, 0xDF, 0x3A, 0x00],
            get_data(DataReference::AppletVersion).to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0x30, 0xDF, 0x3B, 0x00],
            get_data(DataReference::AvailableMemory).to_bytes().unwrap(),
        );
    }

    #[test]
    fn test_authenticate_tag() {
        assert_eq!(
            vec![0x00, 0x88, 0x00, 0x00, 0x04, 0xDE, 0xAD, 0xBE, 0xEF, 0x00],
            authenticate_tag(&[0xDE, 0xAD, 0xBE, 0xEF])
                .unwrap()
                .to_bytes().unwrap(),
        );
        assert!(authenticate_tag(&[]).is_err());
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(
            vec![0x00, 0xCA, 0x00, 0x00, 0x00],
            pass_through_fetch_data().to_bytes().unwrap(),
        );
        assert_eq!(
            vec![0x00, 0x03, 0x01, 0x02, 0x03],
            pass_through_put_response(&[0x01, 0x02, 0x03]).unwrap(),
        );
        assert!(pass_through_put_response(&[]).is_err());
    }

    #[test]
    fn test_round_trip_through_parse() {
        let commands = vec![
            select_application(),
            select_file(0xE104),
            read_binary(0x0010, 16).unwrap(),
            update_binary(0x0000, &[0x00, 0x10]).unwrap(),
            change_password(0x02, 0x01020304, Some(0x05060708)).unwrap(),
            get_data(DataReference::AppletVersion),
            authenticate_tag(&[0x01; 8]).unwrap(),
            create_password(&CreatePassword {
                id: 0x03,
                password: 0x31323334,
                response: 0x9000,
                limit: 0x0005,
                master_password: None,
            })
            .unwrap(),
            delete_password(0x03, Some(0xAABBCCDD)).unwrap(),
            unblock_password(0x03, None).unwrap(),
            select_file_with_password(0xE104, Some(0x01020304), Some(0x05060708)),
            pass_through_fetch_data(),
        ];

        for command in commands {
            assert_eq!(command, Command::parse(&command.to_bytes().unwrap()).unwrap());
        }
    }
}
