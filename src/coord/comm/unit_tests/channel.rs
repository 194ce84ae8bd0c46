use std::time::Duration;

use tokio::time::Instant;

use crate::coord::comm::{CommTiming, channel, duplex};
use crate::coord::error::CoordError;

fn fast_timing() -> CommTiming {
    CommTiming {
        send_wait: Duration::from_millis(30),
        settle: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn messages_arrive_in_send_order() {
    let (tx, rx) = channel(8, fast_timing());

    for value in 0..5u32 {
        tx.send(value).await.unwrap();
    }
    for expected in 0..5u32 {
        assert_eq!(rx.recv().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn full_channel_drops_message_after_wait_budget() {
    let (tx, rx) = channel(1, fast_timing());

    tx.send(1u32).await.unwrap();

    let started = Instant::now();
    match tx.send(2u32).await {
        Err(CoordError::Comm(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(30));
    assert!(elapsed < Duration::from_secs(1));

    // Only the first message ever made it into the queue.
    assert_eq!(rx.recv().await.unwrap(), 1);
    match rx.recv_timeout(Duration::from_millis(20)).await {
        Err(CoordError::Comm(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn recv_blocks_until_a_message_is_available() {
    let (tx, rx) = channel(4, fast_timing());

    let producer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(7u32).await.unwrap();
    });

    assert_eq!(rx.recv().await.unwrap(), 7);
    producer.await.unwrap();
}

#[tokio::test]
async fn closed_channel_reports_comm_error_on_both_halves() {
    let (tx, rx) = channel::<u32>(4, fast_timing());
    drop(rx);
    match tx.send(1).await {
        Err(CoordError::Comm(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    let (tx, rx) = channel::<u32>(4, fast_timing());
    drop(tx);
    match rx.recv().await {
        Err(CoordError::Comm(_)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn duplex_directions_are_independent() {
    let (master, slave) = duplex(4, fast_timing());

    master.send(1u32).await.unwrap();
    master.send(2u32).await.unwrap();
    slave.send(9u32).await.unwrap();

    // Traffic toward the slave is unaffected by the opposite direction.
    assert_eq!(slave.recv().await.unwrap(), 1);
    assert_eq!(slave.recv().await.unwrap(), 2);
    assert_eq!(master.recv().await.unwrap(), 9);
}
