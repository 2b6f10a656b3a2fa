use std::io::{self, Write};

use tle_fluence::io::text::format_g;
use tle_fluence::{HistogramSet, SpectrumKind};

use super::text::truncate;

const INDENT: &str = "      ";

const BOX_INNER_WIDTH: usize = 62;
const SAFE_TABLE_WIDTH: usize = BOX_INNER_WIDTH - INDENT.len();

/// Largest number of non-empty bins listed per spectrum.
const MAX_ROWS: usize = 12;

pub fn print_run_summary(spectra: &HistogramSet) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let bins = spectra.bins();
    let spacing = if bins.is_log_scale() {
        "logarithmic"
    } else {
        "linear"
    };

    let mut rows = vec![
        (
            "Energy Range",
            format!(
                "{} – {} MeV",
                format_g(bins.min_energy()),
                format_g(bins.max_energy())
            ),
        ),
        ("Bins", format!("{} ({spacing})", bins.bin_count())),
        ("Events", spectra.events().to_string()),
    ];
    for kind in SpectrumKind::ALL {
        let histogram = spectra.histogram(kind);
        rows.push((kind.label(), format!("Σ {}", format_g(histogram.integral()))));
    }

    print_kv_table(&mut out, "Run Summary", &rows);
}

/// Prints the non-empty bins of every spectrum with relative bars.
pub fn print_spectra(spectra: &HistogramSet) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    for kind in SpectrumKind::ALL {
        let rows: Vec<(f64, f64)> = spectra
            .rows(kind)
            .take(spectra.bin_count())
            .filter(|&(_, value)| value != 0.0)
            .collect();
        if rows.is_empty() {
            continue;
        }
        print_spectrum_table(&mut out, kind.histogram_name(), &rows);
    }
}

fn print_spectrum_table(out: &mut impl Write, title: &str, rows: &[(f64, f64)]) {
    let edge_w = 12usize;
    let value_w = 12usize;
    let sep_overhead = 8;
    let bar_w = SAFE_TABLE_WIDTH
        .saturating_sub(edge_w + value_w + sep_overhead)
        .min(24);
    let peak = rows.iter().map(|&(_, v)| v.abs()).fold(0.0, f64::max);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{}┬{}┬{}┐",
        INDENT,
        "─".repeat(edge_w + 2),
        "─".repeat(value_w + 2),
        "─".repeat(bar_w + 2)
    );
    let _ = writeln!(
        out,
        "{}│ {:<edge_w$} │ {:>value_w$} │ {:<bar_w$} │",
        INDENT, "E low (MeV)", "Fluence", "",
    );
    let _ = writeln!(
        out,
        "{}├{}┼{}┼{}┤",
        INDENT,
        "─".repeat(edge_w + 2),
        "─".repeat(value_w + 2),
        "─".repeat(bar_w + 2)
    );

    for &(edge, value) in rows.iter().take(MAX_ROWS) {
        let fraction = if peak > 0.0 { value.abs() / peak } else { 0.0 };
        let _ = writeln!(
            out,
            "{}│ {:<edge_w$} │ {:>value_w$} │ {:<bar_w$} │",
            INDENT,
            format_g(edge),
            format_g(value),
            make_bar(fraction, bar_w),
        );
    }
    if rows.len() > MAX_ROWS {
        let note = format!("… {} more non-empty bins", rows.len() - MAX_ROWS);
        let _ = writeln!(
            out,
            "{}│ {:<width$} │",
            INDENT,
            note,
            width = edge_w + value_w + bar_w + 6
        );
    }

    let _ = writeln!(
        out,
        "{}└{}┴{}┴{}┘",
        INDENT,
        "─".repeat(edge_w + 2),
        "─".repeat(value_w + 2),
        "─".repeat(bar_w + 2)
    );
}

fn print_kv_table(out: &mut impl Write, title: &str, rows: &[(&str, String)]) {
    let key_w = 16usize;
    let sep_overhead = 6;
    let val_w = SAFE_TABLE_WIDTH.saturating_sub(key_w + sep_overhead);

    let _ = writeln!(
        out,
        "{}┌─ {} ─┐",
        INDENT,
        truncate(title, SAFE_TABLE_WIDTH - 6)
    );
    let _ = writeln!(
        out,
        "{}┌{}┬{}┐",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
    for (key, val) in rows {
        let _ = writeln!(
            out,
            "{}│ {:<key_w$} │ {:>val_w$} │",
            INDENT,
            truncate(key, key_w),
            truncate(val, val_w),
        );
    }
    let _ = writeln!(
        out,
        "{}└{}┴{}┘",
        INDENT,
        "─".repeat(key_w + 2),
        "─".repeat(val_w + 2)
    );
}

fn make_bar(fraction: f64, max_width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * max_width as f64).round() as usize;
    let empty = max_width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_scales_with_fraction() {
        assert_eq!(make_bar(1.0, 4), "████");
        assert_eq!(make_bar(0.5, 4), "██░░");
        assert_eq!(make_bar(0.0, 3), "░░░");
        assert_eq!(make_bar(2.0, 2), "██");
    }
}
