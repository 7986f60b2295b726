use std::rc::Rc;

use crate::apdu::Response;
use crate::cmdset::{execute, execute_raw, new};
use crate::command::{self, CreatePassword, DataReference};
use crate::protocol::Transport;
use crate::{Card, Result};

/// Operational commands of the NBT applet.
pub struct OperationalCommandSet<T>
where
    T: Transport,
{
    card: Rc<Card<T>>,
}

impl<T> OperationalCommandSet<T>
where
    T: Transport,
{
    new!();

    /// Selects the NBT applet.
    pub fn select_application(&self) -> Result<Response> {
        execute(
            &self.card,
            "select_application",
            Ok(command::select_application()),
        )
    }

    /// Selects the file with the identifier.
    pub fn select_file(&self, fid: u16) -> Result<Response> {
        execute(&self.card, "select_file", Ok(command::select_file(fid)))
    }

    /// Selects a password-protected file, presenting the passwords.
    pub fn select_file_with_password(
        &self,
        fid: u16,
        read_password: Option<u32>,
        write_password: Option<u32>,
    ) -> Result<Response> {
        execute(
            &self.card,
            "select_file_with_password",
            Ok(command::select_file_with_password(
                fid,
                read_password,
                write_password,
            )),
        )
    }

    /// Reads `length` octets at the offset of the selected file.
    pub fn read_binary(&self, offset: u16, length: u16) -> Result<Response> {
        execute(
            &self.card,
            "read_binary",
            command::read_binary(offset, length),
        )
    }

    /// Writes the data at the offset of the selected file.
    pub fn update_binary(&self, offset: u16, data: &[u8]) -> Result<Response> {
        execute(
            &self.card,
            "update_binary",
            command::update_binary(offset, data),
        )
    }

    pub fn create_password(&self, args: &CreatePassword) -> Result<Response> {
        execute(
            &self.card,
            "create_password",
            command::create_password(args),
        )
    }

    pub fn change_password(
        &self,
        id: u8,
        new_password: u32,
        master_password: Option<u32>,
    ) -> Result<Response> {
        execute(
            &self.card,
            "change_password",
            command::change_password(id, new_password, master_password),
        )
    }

    pub fn unblock_password(&self, id: u8, master_password: Option<u32>) -> Result<Response> {
        execute(
            &self.card,
            "unblock_password",
            command::unblock_password(id, master_password),
        )
    }

    pub fn delete_password(&self, id: u8, master_password: Option<u32>) -> Result<Response> {
        execute(
            &self.card,
            "delete_password",
            command::delete_password(id, master_password),
        )
    }

    /// Reads applet data such as its version or the available memory.
    pub fn get_data(&self, reference: DataReference) -> Result<Response> {
        execute(&self.card, "get_data", Ok(command::get_data(reference)))
    }

    /// Asks the applet to authenticate itself over the challenge.
    pub fn authenticate_tag(&self, challenge: &[u8]) -> Result<Response> {
        execute(
            &self.card,
            "authenticate_tag",
            command::authenticate_tag(challenge),
        )
    }

    pub fn pass_through_fetch_data(&self) -> Result<Response> {
        execute(
            &self.card,
            "pass_through_fetch_data",
            Ok(command::pass_through_fetch_data()),
        )
    }

    pub fn pass_through_put_response(&self, data: &[u8]) -> Result<Response> {
        execute_raw(
            &self.card,
            "pass_through_put_response",
            command::pass_through_put_response(data),
        )
    }
}
