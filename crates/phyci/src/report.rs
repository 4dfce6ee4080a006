use std::fmt::Write;

use crate::sweep::SweepReport;

const RULE_WIDTH: usize = 50;

/// Title and sweep settings.
pub fn header(report: &SweepReport) -> String {
    let range = report.range;
    let mut out = String::new();
    let _ = writeln!(out, "5G PHY CI Pipeline - OFDM Simulation");
    let _ = writeln!(out, "Modulation: {}", report.modulation);
    let _ = writeln!(out, "Bits per simulation: {}", report.bit_count);
    let _ = writeln!(
        out,
        "SNR range: {} to {} dB (step: {})",
        range.start, range.stop, range.step
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out
}

/// Per-point lines, threshold warnings and the closing summary.
pub fn body(report: &SweepReport) -> String {
    let mut out = String::new();
    for point in &report.points {
        let _ = writeln!(out, "SNR: {:2} dB, BER: {:.2e}", point.snr_db, point.ber);
        if point.exceeds_threshold() {
            let _ = writeln!(
                out,
                "WARNING: High BER ({:.2e}) at SNR {} dB",
                point.ber, point.snr_db
            );
        }
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Simulation completed successfully!");
    if let Some(best) = report.best() {
        let _ = writeln!(out, "Best BER: {:.2e} at {} dB", best.ber, best.snr_db);
    }
    out
}
