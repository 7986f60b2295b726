// Runs in its own test binary: emptying the process-wide registry would race with the unit tests
// decoding records through it.

use nbt::ndef::registry::{release_resource, reset, retrieve_handle};
use nbt::ndef::types::{GenericRecord, UriRecord};
use nbt::ndef::{message, Record, RecordBody, Tnf};

#[test]
fn test_release_resource_and_reset() {
    let bytes = message::encode(&[Record::from(UriRecord::from_uri("https://example.com/"))])
        .unwrap();

    release_resource();

    assert_eq!(
        RecordBody::Generic(GenericRecord::new(vec![0x04, b'e'])),
        retrieve_handle(Tnf::WellKnown, b"U")(&[0x04, b'e'][..]).unwrap(),
    );
    assert!(matches!(
        message::decode(&bytes).unwrap()[0].body,
        RecordBody::Generic(_),
    ));

    reset();

    assert!(matches!(
        retrieve_handle(Tnf::WellKnown, b"U")(&[0x04, b'e'][..]).unwrap(),
        RecordBody::Uri(_),
    ));
    assert_eq!(
        "https://example.com/",
        message::decode(&bytes).unwrap()[0].uri().unwrap().to_uri(),
    );
}
