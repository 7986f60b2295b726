//! NDEF (NFC Data Exchange Format) codec.
//!
//! [`record`] frames a single record, [`message`] chains records with the MB/ME flags, and
//! [`registry`] picks the payload decoder for each record type. The payload codecs live in
//! [`types`].
//!
//! ```
//! use nbt::ndef::{message, Record};
//! use nbt::ndef::types::UriRecord;
//!
//! let record = Record::from(UriRecord::from_uri("https://example.com/"));
//! let bytes = message::encode(&[record.clone()]).unwrap();
//!
//! assert_eq!(vec![record], message::decode(&bytes).unwrap());
//! ```

pub mod message;
pub mod record;
pub mod registry;
pub mod types;

pub use self::record::{Record, RecordBody, Tnf};
