use prime_stream::core::driver::{run_driver_until, MESSAGE_PREFIX};
use prime_stream::core::primes::MAX_PRIME_COUNT;
use prime_stream::{run_driver, StreamSettings, ThreadSafeAsyncStream, TomlConfig};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn lines(output: Vec<u8>) -> Vec<String> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_driver_prints_first_three_primes_in_order() {
    let stream = ThreadSafeAsyncStream::new(StreamSettings {
        prime_count: 3,
        report_every: 1,
        queue_capacity: 1,
    });

    let mut output = Vec::new();
    let summary = run_driver(&stream, &mut output).await.unwrap();

    assert_eq!(
        lines(output),
        vec![
            "Received prime from secondary thread: 2",
            "Received prime from secondary thread: 3",
            "Received prime from secondary thread: 5",
        ]
    );
    assert_eq!(summary.delivered, 3);
}

#[tokio::test]
async fn test_driver_prints_nothing_without_deliveries() {
    let stream = ThreadSafeAsyncStream::new(StreamSettings {
        prime_count: 100,
        report_every: 1_000,
        queue_capacity: 16,
    });

    let mut output = Vec::new();
    let summary = run_driver(&stream, &mut output).await.unwrap();

    assert!(output.is_empty());
    assert_eq!(summary.delivered, 0);
    assert!(!summary.cancelled);
}

#[tokio::test]
async fn test_driver_with_default_settings() {
    let stream = ThreadSafeAsyncStream::default();

    let mut output = Vec::new();
    run_driver(&stream, &mut output).await.unwrap();

    let printed = lines(output);
    assert_eq!(printed.len(), 10);
    assert!(printed.iter().all(|l| l.starts_with(MESSAGE_PREFIX)));
    assert_eq!(printed[0], format!("{}7919", MESSAGE_PREFIX));
    assert_eq!(printed[9], format!("{}104729", MESSAGE_PREFIX));
}

#[tokio::test]
async fn test_driver_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[stream]\nprime_count = 10\nreport_every = 5\nqueue_capacity = 2").unwrap();

    let config = TomlConfig::from_file(file.path()).unwrap();
    let stream = ThreadSafeAsyncStream::from_config(&config);

    let mut output = Vec::new();
    run_driver(&stream, &mut output).await.unwrap();

    // 第 5 與第 10 個質數
    assert_eq!(
        lines(output),
        vec![
            format!("{}11", MESSAGE_PREFIX),
            format!("{}29", MESSAGE_PREFIX),
        ]
    );
}

#[tokio::test]
async fn test_shutdown_interrupts_long_stream() {
    let stream = ThreadSafeAsyncStream::new(StreamSettings {
        prime_count: MAX_PRIME_COUNT,
        report_every: 1,
        queue_capacity: 1,
    });

    let mut output = Vec::new();
    let summary = run_driver_until(
        &stream,
        &mut output,
        tokio::time::sleep(Duration::from_millis(20)),
    )
    .await
    .unwrap();

    assert!(summary.cancelled);
    assert!(summary.primes_found < MAX_PRIME_COUNT);
    assert_eq!(lines(output).len() as u32, summary.delivered);
    assert!(!stream.is_running());
}

#[tokio::test]
async fn test_shutdown_without_pending_reports() {
    let stream = ThreadSafeAsyncStream::new(StreamSettings {
        prime_count: MAX_PRIME_COUNT,
        report_every: u32::MAX,
        queue_capacity: 1,
    });

    let mut output = Vec::new();
    let run = run_driver_until(
        &stream,
        &mut output,
        tokio::time::sleep(Duration::from_millis(20)),
    );
    let summary = tokio::time::timeout(Duration::from_secs(3), run)
        .await
        .expect("stream kept running after shutdown")
        .unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.delivered, 0);
    assert!(output.is_empty());
    assert!(!stream.is_running());
}
