//! Sample Transaction Generator
//!
//! Writes a synthetic transactions CSV for exercising the screener by
//! hand: V1..V28 feature columns, Amount, and a raw Time column the
//! screener derives Hour from.

use anyhow::Result;
use rand::Rng;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("generate_transactions=info".parse()?),
        )
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("transactions.csv");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0.1);

    info!(
        output = %output,
        count = count,
        fraud_rate = fraud_rate,
        "Generating sample transactions"
    );

    let mut writer = csv::Writer::from_path(output)?;

    let mut header: Vec<String> = (1..=28).map(|i| format!("V{i}")).collect();
    header.push("Amount".to_string());
    header.push("Time".to_string());
    writer.write_record(&header)?;

    let mut rng = rand::thread_rng();
    let mut legitimate_count = 0;
    let mut suspicious_count = 0;

    for _ in 0..count {
        let record = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generate_suspicious(&mut rng)
        } else {
            legitimate_count += 1;
            generate_legitimate(&mut rng)
        };
        writer.write_record(&record)?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} transactions ({} legitimate, {} suspicious-looking)",
        count, legitimate_count, suspicious_count
    );

    Ok(())
}

/// An ordinary daytime purchase: small feature magnitudes, modest amount.
fn generate_legitimate(rng: &mut impl Rng) -> Vec<String> {
    let mut record: Vec<String> = (0..28)
        .map(|_| format!("{:.6}", rng.gen_range(-2.0..2.0)))
        .collect();
    record.push(format!("{:.2}", rng.gen_range(1.0..500.0)));
    // Daytime seconds (08:00 - 22:00)
    record.push(rng.gen_range(8 * 3600..22 * 3600).to_string());
    record
}

/// A suspicious-looking row: extreme feature magnitudes, high amount,
/// small-hours timestamp.
fn generate_suspicious(rng: &mut impl Rng) -> Vec<String> {
    let mut record: Vec<String> = (0..28)
        .map(|_| format!("{:.6}", rng.gen_range(-8.0..8.0)))
        .collect();
    record.push(format!("{:.2}", rng.gen_range(500.0..5000.0)));
    // Night-time seconds (00:00 - 06:00)
    record.push(rng.gen_range(0..6 * 3600).to_string());
    record
}
