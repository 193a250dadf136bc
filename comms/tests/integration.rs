use std::borrow::Cow;
use std::io::ErrorKind;

use comms::msg::{Command, Msg, Payload};
use comms::specs::{BatchSpec, DatasetSpec};
use tokio::io::{self, AsyncWriteExt};

#[tokio::test]
async fn control_command_roundtrip() {
    let (one, two) = io::duplex(1024);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    let catalog = vec![DatasetSpec {
        key: "xor".into(),
        len: 4,
        data_shape: vec![2],
        target_shape: vec![1],
    }];
    tx.send(&Msg::Control(Command::Datasets(catalog.clone())))
        .await
        .unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 256];
    match rx.recv_into(&mut buf).await.unwrap() {
        Msg::Control(Command::Datasets(got)) => assert_eq!(got, catalog),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn tensor_frames_roundtrip() {
    let (one, two) = io::duplex(1024);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    let samples = [0.0f32, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0];
    let targets = [1.0f32, 1.0, 0.0, 0.0];
    tx.send(&Msg::Data(Payload::Samples(&samples))).await.unwrap();
    tx.send(&Msg::Data(Payload::Targets(&targets))).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 256];
    match rx.recv_into(&mut buf).await.unwrap() {
        Msg::Data(Payload::Samples(got)) => assert_eq!(got, samples),
        other => panic!("unexpected message: {other:?}"),
    }
    match rx.recv_into(&mut buf).await.unwrap() {
        Msg::Data(Payload::Targets(got)) => assert_eq!(got, targets),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn error_detail_roundtrip() {
    let (one, two) = io::duplex(256);
    let (rx, tx) = io::split(one);
    let (_, mut tx) = comms::channel(rx, tx);

    tx.send(&Msg::Err(Cow::Borrowed("unknown dataset key: cifar")))
        .await
        .unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 64];
    match rx.recv_into(&mut buf).await.unwrap() {
        Msg::Err(detail) => assert_eq!(detail, "unknown dataset key: cifar"),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_kind_byte_is_rejected() {
    let (mut one, two) = io::duplex(64);

    // Hand-built frame: valid length header, bogus kind byte.
    one.write_all(&4u64.to_be_bytes()).await.unwrap();
    one.write_all(&9u32.to_be_bytes()).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 16];
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[tokio::test]
async fn truncated_kind_header_is_rejected() {
    let (mut one, two) = io::duplex(64);

    // Frame body shorter than the 4-byte kind header.
    one.write_all(&2u64.to_be_bytes()).await.unwrap();
    one.write_all(&[0, 1]).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 16];
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[tokio::test]
async fn non_utf8_error_text_is_rejected() {
    let (mut one, two) = io::duplex(64);

    // Err frame whose text is not valid UTF-8.
    one.write_all(&6u64.to_be_bytes()).await.unwrap();
    one.write_all(&0u32.to_be_bytes()).await.unwrap();
    one.write_all(&[0xff, 0xfe]).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 16];
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[tokio::test]
async fn oversized_frame_is_rejected_before_the_body() {
    let (mut one, two) = io::duplex(64);

    // Length header claiming more than any sane frame carries.
    one.write_all(&u64::MAX.to_be_bytes()).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 16];
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[tokio::test]
async fn misaligned_tensor_frame_is_rejected() {
    let (mut one, two) = io::duplex(64);

    // Samples frame whose body is not a whole number of f32s.
    one.write_all(&7u64.to_be_bytes()).await.unwrap();
    one.write_all(&2u32.to_be_bytes()).await.unwrap();
    one.write_all(&[1, 2, 3]).await.unwrap();

    let (rx, tx) = io::split(two);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut buf = vec![0i32; 16];
    let err = rx.recv_into::<Msg, _>(&mut buf).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}

#[test]
fn batch_spec_frame_lengths() {
    let spec = BatchSpec {
        key: "mnist".into(),
        rows: 3,
        data_cols: 784,
        target_cols: 1,
    };
    assert_eq!(spec.samples_len(), 2352);
    assert_eq!(spec.targets_len(), 3);
}
