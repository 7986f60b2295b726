mod cert;

use std::rc::Rc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dialoguer::Password;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use nbt::apdu::{status, Response};
use nbt::cmdset::{ConfigurationCommandSet, OperationalCommandSet, PersonalizationCommandSet};
use nbt::command::{ins, DataReference};
use nbt::dgi;
use nbt::ndef::types::UriRecord;
use nbt::ndef::{message, Record};
use nbt::pcsc::{Context, PcscCard};
use nbt::Card;

const NDEF_FILE_ID: u16 = 0xE104;
const NLEN_SIZE: u16 = 2;
const READ_CHUNK: u16 = 0xFF;

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("Error occurred on communicating with PC/SC: {0}")]
    Pcsc(#[from] nbt::pcsc::Error),

    #[error("{0}")]
    Nbt(#[from] nbt::Error),

    #[error("Invalid hexadecimal input: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Could not read from the terminal: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not serialize the output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("A password must be 4 bytes long")]
    InvalidPassword,

    #[error("The applet answered {sw:04X}: {text}")]
    Status { sw: u16, text: &'static str },

    #[error("The NDEF file does not fit the offsets READ BINARY can address")]
    FileTooLarge,
}

type Result<T> = std::result::Result<T, Error>;

#[derive(Parser)]
#[command(name = "nbt", version, about = "Operate an NFC Bridge Tag applet through PC/SC")]
struct Cli {
    /// Seconds to wait for a tag; waits forever if omitted
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Selects the applet
    Select,

    /// Reads the applet version
    Version,

    /// Reads the memory available to the applet
    Memory,

    /// Reads octets from a file
    Read {
        /// File identifier, in hex
        #[arg(long, value_parser = parse_u16)]
        fid: u16,

        #[arg(long, default_value_t = 0)]
        offset: u16,

        #[arg(long)]
        length: u16,
    },

    /// Writes octets to a file
    Update {
        /// File identifier, in hex
        #[arg(long, value_parser = parse_u16)]
        fid: u16,

        #[arg(long, default_value_t = 0)]
        offset: u16,

        /// Octets to write, in hex
        data: String,
    },

    /// Reads the NDEF file and prints its records as JSON
    ReadNdef,

    /// Reads a configuration value
    GetConfig {
        /// Configuration tag, in hex
        #[arg(value_parser = parse_u16)]
        tag: u16,
    },

    /// Writes a configuration value
    SetConfig {
        /// Configuration tag, in hex
        #[arg(value_parser = parse_u16)]
        tag: u16,

        /// Value, in hex
        value: String,
    },

    /// Writes a DGI during personalization
    Personalize {
        /// DGI tag, in hex
        #[arg(value_parser = parse_u16)]
        dgi: u16,

        /// Value, in hex
        value: String,
    },

    /// Closes the personalization phase
    Finalize,

    /// Runs the backend self-tests selected by the bitmap
    BackendTest {
        /// Bitmap of the tests, in hex
        #[arg(value_parser = parse_u8, default_value = "7F")]
        tests: u8,

        /// Disables the backend tests for good instead
        #[arg(long)]
        disable: bool,
    },

    /// Changes a password, prompting for the new and master passwords
    ChangePassword {
        #[arg(long)]
        id: u8,

        /// Prompts for the master password too
        #[arg(long)]
        master: bool,
    },

    /// Prints the NDEF message holding a URI record
    NdefUri { uri: String },

    /// Decodes an NDEF message and prints its records as JSON
    NdefDecode {
        /// Message, in hex
        message: String,
    },

    /// Decodes DGI TLVs and prints them as JSON
    DgiDecode {
        /// TLVs, in hex
        data: String,
    },

    /// Explains a status word answered to an instruction
    Status {
        /// Instruction byte, in hex
        #[arg(value_parser = parse_u8)]
        ins: u8,

        /// Status word, in hex
        #[arg(value_parser = parse_u16)]
        sw: u16,
    },
}

fn parse_u8(s: &str) -> std::result::Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn parse_u16(s: &str) -> std::result::Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn connect(timeout: Option<u64>) -> Result<Rc<Card<PcscCard>>> {
    let ctx = Context::try_new()?;
    let device = ctx.open()?;
    let pcsc_card = device.connect(&ctx, timeout.map(Duration::from_secs))?;

    let card = Card::new(Box::new(pcsc_card));
    debug!("ATR: {}", hex::encode(card.activate()?));

    Ok(Rc::new(card))
}

/// Fails with the meaning of the status word unless the command succeeded.
fn check(ins: u8, response: Response) -> Result<Response> {
    match response.is_ok() {
        true => Ok(response),
        _ => Err(Error::Status {
            sw: response.sw,
            text: status::lookup(ins, response.sw).unwrap_or("Unknown status word"),
        }),
    }
}

fn print(ins: u8, response: Response) -> Result<()> {
    let response = check(ins, response)?;
    println!("{}", hex::encode_upper(response.data));

    Ok(())
}

fn prompt_password(prompt: &str) -> Result<u32> {
    let input = Password::new().with_prompt(prompt).interact()?;
    let bytes: [u8; 4] = hex::decode(input)?
        .try_into()
        .map_err(|_| Error::InvalidPassword)?;

    Ok(u32::from_be_bytes(bytes))
}

fn print_records(mut records: Vec<Record>) -> Result<()> {
    for record in &mut records {
        if let Ok(brand_protection) = record.brand_protection_mut() {
            brand_protection.set_certificate_handlers(cert::HANDLERS);
            match brand_protection.get_certificate() {
                Ok(certificate) => {
                    if let Some(subject) = cert::subject(&certificate) {
                        info!("Brand-protection certificate issued to {}", subject);
                    }
                }
                Err(e) => warn!("Could not decode the brand-protection certificate: {}", e),
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}

/// Moves the offset past the chunk just read.
fn advance(offset: u16, length: usize) -> Result<u16> {
    u16::try_from(length)
        .ok()
        .and_then(|length| offset.checked_add(length))
        .ok_or(Error::FileTooLarge)
}

fn read_ndef(operational: &OperationalCommandSet<PcscCard>) -> Result<Vec<Record>> {
    check(ins::SELECT, operational.select_file(NDEF_FILE_ID)?)?;

    let nlen = check(ins::READ_BINARY, operational.read_binary(0, NLEN_SIZE)?)?;
    let nlen = match nlen.data.as_slice() {
        [high, low] => u16::from_be_bytes([*high, *low]),
        _ => 0,
    };

    let mut bytes = Vec::with_capacity(nlen as usize);
    let mut offset = NLEN_SIZE;
    while bytes.len() < nlen as usize {
        let length = (nlen - bytes.len() as u16).min(READ_CHUNK);
        let chunk = check(ins::READ_BINARY, operational.read_binary(offset, length)?)?;
        if chunk.data.is_empty() {
            break;
        }

        offset = advance(offset, chunk.data.len())?;
        bytes.extend(chunk.data);
    }

    Ok(message::decode(&bytes)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Offline commands need no tag.
    match &cli.command {
        Commands::NdefUri { uri } => {
            let record = Record::from(UriRecord::from_uri(uri));
            println!("{}", hex::encode_upper(message::encode(&[record])?));

            return Ok(());
        }
        Commands::NdefDecode { message: input } => {
            return print_records(message::decode(&hex::decode(input)?)?);
        }
        Commands::DgiDecode { data } => {
            let entities = dgi::decode(&hex::decode(data)?)?;
            println!("{}", serde_json::to_string_pretty(&entities)?);

            return Ok(());
        }
        Commands::Status { ins, sw } => {
            println!(
                "{}",
                status::lookup(*ins, *sw).unwrap_or("Unknown status word"),
            );

            return Ok(());
        }
        _ => {}
    }

    let card = connect(cli.timeout)?;
    let operational = OperationalCommandSet::new(Rc::clone(&card));
    let configuration = ConfigurationCommandSet::new(Rc::clone(&card));
    let personalization = PersonalizationCommandSet::new(Rc::clone(&card));

    let selected = operational.select_application()?;
    if let Commands::Select = cli.command {
        return print(ins::SELECT, selected);
    }
    check(ins::SELECT, selected)?;

    match cli.command {
        Commands::Version => print(
            ins::GET_DATA,
            operational.get_data(DataReference::AppletVersion)?,
        ),
        Commands::Memory => print(
            ins::GET_DATA,
            operational.get_data(DataReference::AvailableMemory)?,
        ),
        Commands::Read {
            fid,
            offset,
            length,
        } => {
            check(ins::SELECT, operational.select_file(fid)?)?;
            print(ins::READ_BINARY, operational.read_binary(offset, length)?)
        }
        Commands::Update { fid, offset, data } => {
            check(ins::SELECT, operational.select_file(fid)?)?;
            print(
                ins::UPDATE_BINARY,
                operational.update_binary(offset, &hex::decode(data)?)?,
            )
        }
        Commands::ReadNdef => print_records(read_ndef(&operational)?),
        Commands::GetConfig { tag } => print(
            ins::GET_CONFIGURATION,
            configuration.get_configuration(tag)?,
        ),
        Commands::SetConfig { tag, value } => print(
            ins::SET_CONFIGURATION,
            configuration.set_configuration(tag, &hex::decode(value)?)?,
        ),
        Commands::Personalize { dgi, value } => print(
            ins::PERSONALIZE_DATA,
            personalization.personalize_data(dgi, &hex::decode(value)?)?,
        ),
        Commands::Finalize => print(
            ins::PERSONALIZE_DATA,
            personalization.finalize_personalization()?,
        ),
        Commands::BackendTest { disable: true, .. } => print(
            ins::BACKEND_TEST,
            personalization.backend_test_disable()?,
        ),
        Commands::BackendTest { tests, .. } => {
            print(ins::BACKEND_TEST, personalization.backend_test(tests)?)
        }
        Commands::ChangePassword { id, master } => {
            let new_password = prompt_password("New password (8 hex digits)")?;
            let master_password = match master {
                true => Some(prompt_password("Master password (8 hex digits)")?),
                _ => None,
            };

            print(
                ins::CHANGE_OR_UNBLOCK_PASSWORD,
                operational.change_password(id, new_password, master_password)?,
            )
        }
        Commands::Select
        | Commands::NdefUri { .. }
        | Commands::NdefDecode { .. }
        | Commands::DgiDecode { .. }
        | Commands::Status { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use nbt::ndef::types::BrandProtectionRecord;

    use super::*;

    #[test]
    fn test_advance() {
        assert_eq!(0x0101, advance(NLEN_SIZE, 0xFF).unwrap());
        assert_eq!(0xFFFF, advance(0xFFFE, 1).unwrap());
    }

    #[test]
    fn test_advance_past_addressable_range() {
        assert!(matches!(advance(0xFF02, 0xFF), Err(Error::FileTooLarge)));
        assert!(matches!(advance(0, 0x10000), Err(Error::FileTooLarge)));
    }

    #[test]
    fn test_print_records_with_invalid_certificate() {
        let records = vec![
            Record::from(BrandProtectionRecord::new(vec![0x30, 0x01])),
            Record::from(UriRecord::from_uri("https://example.com/")),
        ];

        assert!(print_records(records).is_ok());
    }
}
